mod envelope;
mod service;

pub use envelope::{Envelope, ErrorKind, ResponseStatus};
pub use service::{DecodeFailure, ServiceRecord};
