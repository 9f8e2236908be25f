//! Common utilities module
//!
//! This module contains shared utilities used across the image pipeline.

pub mod border;
pub mod error;

pub use border::reflect_101;
pub use error::{PipelineError, Result};
