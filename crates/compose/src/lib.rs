//! Wrapper around the container-orchestration CLI (`docker compose` by default).
//!
//! Every stack operation is a subprocess invocation scoped to one manifest
//! and working directory. The [`CommandRunner`] trait is the process
//! boundary; [`ProcessRunner`] is the real implementation.

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod status;

pub use cli::ComposeCli;
pub use config::{StackConfig, StatusDecode};
pub use error::{ComposeError, Result};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
pub use status::{decode_status, StatusListing};
