use std::io::Write;

use tracing::debug;

use crate::image_pipeline::codec::RasterWriter;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raster::RasterBuffer;
use crate::image_pipeline::tiff::types::TiffCompression;

/// Writes 1-channel buffers as Gray16 and 3-channel buffers as RGB16.
#[derive(Debug, Clone)]
pub struct StandardTiffWriter {
    compression: TiffCompression,
    predictor: Option<u16>,
}

impl Default for StandardTiffWriter {
    fn default() -> Self {
        Self::new(TiffCompression::None, None)
    }
}

impl StandardTiffWriter {
    pub fn new(compression: TiffCompression, predictor: Option<u16>) -> Self {
        Self {
            compression,
            predictor,
        }
    }
}

impl RasterWriter for StandardTiffWriter {
    fn write_raster(&self, image: &RasterBuffer, output: &mut dyn Write) -> Result<()> {
        debug!(
            "Encoding TIFF image: {}x{}x{}",
            image.width(),
            image.height(),
            image.channels()
        );

        let mut buffer = Vec::new();

        let compression = match self.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(
                tiff::encoder::compression::DeflateLevel::Fast,
            ),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(
                tiff::encoder::compression::DeflateLevel::Balanced,
            ),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(
                tiff::encoder::compression::DeflateLevel::Best,
            ),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = self.predictor {
            let predictor = match predictor_val {
                2 => tiff::tags::Predictor::Horizontal,
                _ => tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        let width = image.width() as u32;
        let height = image.height() as u32;
        let written = match image.channels() {
            1 => encoder.write_image::<tiff::encoder::colortype::Gray16>(
                width,
                height,
                image.samples(),
            ),
            3 => encoder.write_image::<tiff::encoder::colortype::RGB16>(
                width,
                height,
                image.samples(),
            ),
            channels => {
                return Err(PipelineError::UnsupportedFormat {
                    bits_per_sample: 16,
                    samples_per_pixel: channels as u32,
                });
            }
        };
        written.map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output
            .write_all(&buffer)
            .map_err(|e| PipelineError::WriteFailure(e.to_string()))?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
