//! Scanline ingestion module
//!
//! Turns a padded, row-oriented container into a dense `RasterBuffer`.

mod scanline_ingestor;
mod source;

#[cfg(test)]
mod tests;

pub use scanline_ingestor::ScanlineIngestor;
pub use source::ScanlineSource;
