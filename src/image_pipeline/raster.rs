//! Raster buffer module
//!
//! The owned sample store every stage consumes and produces.

pub mod types;

pub use types::{DEFAULT_MAX_DIMENSION, RasterBuffer};
