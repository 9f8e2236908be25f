//! TIFF container module
//!
//! Scanline reading and 16-bit Gray/RGB writing on top of the `tiff` crate.

mod standard_tiff_writer;
mod tiff_source;
pub mod types;

pub use standard_tiff_writer::StandardTiffWriter;
pub use tiff_source::TiffScanlineSource;
pub use types::TiffCompression;
