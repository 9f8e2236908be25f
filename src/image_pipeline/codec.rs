//! Minimal 16-bit raster codec module
//!
//! Bit-exact binary PGM support used for fixtures and single-channel output,
//! plus the `RasterWriter` seam shared with the TIFF writer.

pub mod endian;
mod pgm;
mod writer;

pub use endian::{HostEndian, swap_for_disk};
pub use pgm::{PgmReader, PgmWriter};
pub use writer::RasterWriter;
