//! Copies a row-padded container into a tightly packed `RasterBuffer`.

use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::ingest::source::ScanlineSource;
use crate::image_pipeline::raster::{DEFAULT_MAX_DIMENSION, RasterBuffer};

const SAMPLE_SIZE: usize = std::mem::size_of::<u16>();
const REQUIRED_BITS_PER_SAMPLE: u32 = 16;
const REQUIRED_SAMPLES_PER_PIXEL: u32 = 1;

pub struct ScanlineIngestor {
    max_dimension: usize,
}

impl Default for ScanlineIngestor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIMENSION)
    }
}

impl ScanlineIngestor {
    pub fn new(max_dimension: usize) -> Self {
        Self { max_dimension }
    }

    /// Read every row of `source` into a single-channel buffer.
    ///
    /// The stored row stride is `ceil(scanline_len / 2)` samples, taken from
    /// the source rather than from its width; only the first `width` samples
    /// of each row are kept. A scanline shorter than `width * 2` bytes is
    /// rejected. Any failure drops the partially filled buffer.
    pub fn ingest(&self, source: &mut dyn ScanlineSource) -> Result<RasterBuffer> {
        let bits_per_sample = source.bits_per_sample();
        let samples_per_pixel = source.samples_per_pixel();
        if bits_per_sample != REQUIRED_BITS_PER_SAMPLE
            || samples_per_pixel != REQUIRED_SAMPLES_PER_PIXEL
        {
            return Err(PipelineError::UnsupportedFormat {
                bits_per_sample,
                samples_per_pixel,
            });
        }

        let width = source.width();
        let height = source.height();
        let scanline_len = source.scanline_len();
        let padded_samples = scanline_len.div_ceil(SAMPLE_SIZE);

        debug!(
            width,
            height, scanline_len, padded_samples, "Ingesting scanlines"
        );

        // Every kept sample must be fully covered by the row's declared bytes.
        if scanline_len < width.saturating_mul(SAMPLE_SIZE) {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        if width > self.max_dimension || height > self.max_dimension {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        if width == 0 || height == 0 {
            return RasterBuffer::allocate_with_limit(width, height, 1, self.max_dimension);
        }

        let scan_bytes = padded_samples
            .checked_mul(SAMPLE_SIZE)
            .ok_or(PipelineError::InvalidDimensions(width, height))?;
        let mut scan = Vec::new();
        scan.try_reserve_exact(scan_bytes)
            .map_err(|_| PipelineError::InvalidDimensions(width, height))?;
        scan.resize(scan_bytes, 0u8);

        // Grows with the rows actually delivered, not the declared height.
        let mut samples: Vec<u16> = Vec::new();
        for row in 0..height {
            let read = source.read_row(row, &mut scan)?;
            if read < scanline_len {
                return Err(PipelineError::TruncatedSource {
                    row,
                    expected: scanline_len,
                    actual: read,
                });
            }
            samples.extend(
                scan.chunks_exact(SAMPLE_SIZE)
                    .take(width)
                    .map(|bytes| u16::from_ne_bytes([bytes[0], bytes[1]])),
            );
        }

        debug!("Ingested {} rows", height);
        RasterBuffer::from_samples(width, height, 1, samples)
    }
}
