//! Tracing setup and span helpers that carry request metadata.

pub mod spans;
pub mod tracing_setup;

pub use spans::{REQUEST_ID_HEADER, current_request_id};
pub use tracing_setup::init_tracing;
