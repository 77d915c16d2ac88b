//! Calling conventions understood by the metadata presets.
//!
//! A handler receives either one context object carrying both the request
//! and the response, or the request and response as two arguments. Argument
//! types declare which one they are through [`HandlerArgs`]; anything else
//! reports [`ArgShape::Unrecognized`].

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

/// Incoming request: anything exposing string headers.
pub trait RequestLike {
    /// Header value, or `None` when missing or not a string.
    fn header(&self, name: &str) -> Option<&str>;
}

/// Outgoing response that accepts headers.
pub trait ResponseLike {
    fn set_header(&self, name: &str, value: &str);
}

impl<T: RequestLike + ?Sized> RequestLike for &T {
    fn header(&self, name: &str) -> Option<&str> {
        (**self).header(name)
    }
}

impl<T: RequestLike + ?Sized> RequestLike for Arc<T> {
    fn header(&self, name: &str) -> Option<&str> {
        (**self).header(name)
    }
}

impl RequestLike for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl RequestLike for BTreeMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl RequestLike for serde_json::Map<String, Value> {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

impl<T: ResponseLike + ?Sized> ResponseLike for &T {
    fn set_header(&self, name: &str, value: &str) {
        (**self).set_header(name, value)
    }
}

impl<T: ResponseLike + ?Sized> ResponseLike for Arc<T> {
    fn set_header(&self, name: &str, value: &str) {
        (**self).set_header(name, value)
    }
}

/// Header sink for responses built outside a web framework.
#[derive(Debug, Default)]
pub struct ResponseHeaders {
    headers: Mutex<BTreeMap<String, String>>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.headers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResponseLike for ResponseHeaders {
    fn set_header(&self, name: &str, value: &str) {
        self.lock().insert(name.to_string(), value.to_string());
    }
}

/// Combined calling convention: one argument carrying request and response.
#[derive(Debug, Clone, Default)]
pub struct RequestContext<Req, Res> {
    pub request: Req,
    pub response: Res,
}

impl<Req, Res> RequestContext<Req, Res> {
    pub fn new(request: Req, response: Res) -> Self {
        Self { request, response }
    }
}

/// Which calling convention an argument value follows.
pub enum ArgShape<'a> {
    Combined {
        request: &'a dyn RequestLike,
        response: &'a dyn ResponseLike,
    },
    Split {
        request: &'a dyn RequestLike,
        response: &'a dyn ResponseLike,
    },
    Unrecognized,
}

impl<'a> ArgShape<'a> {
    pub fn convention(&self) -> &'static str {
        match self {
            Self::Combined { .. } => "combined",
            Self::Split { .. } => "split",
            Self::Unrecognized => "unrecognized",
        }
    }

    pub fn parts(&self) -> Option<(&'a dyn RequestLike, &'a dyn ResponseLike)> {
        match *self {
            Self::Combined { request, response } | Self::Split { request, response } => {
                Some((request, response))
            }
            Self::Unrecognized => None,
        }
    }
}

/// Arguments of a wrapped handler, classified by calling convention.
pub trait HandlerArgs {
    fn shape(&self) -> ArgShape<'_> {
        ArgShape::Unrecognized
    }
}

impl<Req: RequestLike, Res: ResponseLike> HandlerArgs for RequestContext<Req, Res> {
    fn shape(&self) -> ArgShape<'_> {
        ArgShape::Combined {
            request: &self.request,
            response: &self.response,
        }
    }
}

impl<Req: RequestLike, Res: ResponseLike> HandlerArgs for (Req, Res) {
    fn shape(&self) -> ArgShape<'_> {
        ArgShape::Split {
            request: &self.0,
            response: &self.1,
        }
    }
}

impl<T: HandlerArgs + ?Sized> HandlerArgs for &T {
    fn shape(&self) -> ArgShape<'_> {
        (**self).shape()
    }
}

impl<T: HandlerArgs + ?Sized> HandlerArgs for Arc<T> {
    fn shape(&self) -> ArgShape<'_> {
        (**self).shape()
    }
}

impl<T: HandlerArgs + ?Sized> HandlerArgs for Box<T> {
    fn shape(&self) -> ArgShape<'_> {
        (**self).shape()
    }
}

macro_rules! unrecognized_args {
    ($($ty:ty),* $(,)?) => {
        $(impl HandlerArgs for $ty {})*
    };
}

unrecognized_args!(
    (),
    bool,
    u8,
    u16,
    u32,
    u64,
    usize,
    i8,
    i16,
    i32,
    i64,
    isize,
    f32,
    f64,
    str,
    String,
    Value,
);
