use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::RasterBuffer;

/// Output side of the pipeline: serialises a finished buffer.
pub trait RasterWriter {
    fn write_raster(&self, image: &RasterBuffer, output: &mut dyn Write) -> Result<()>;
}
