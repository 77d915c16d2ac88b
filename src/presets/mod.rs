//! Ready-made metadata preparers.

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestIdPreset, prepare_request_id_metadata};
