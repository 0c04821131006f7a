//! Shared response types for the stack control service.

pub mod domain;

pub use domain::*;
