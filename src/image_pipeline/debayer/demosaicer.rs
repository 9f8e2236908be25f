//! Bilinear Bayer reconstruction with reflect-101 borders.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::border::reflect_101;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::types::{CfaChannel, CfaPattern};
use crate::image_pipeline::raster::RasterBuffer;

const RGB_CHANNELS: usize = 3;

const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

pub struct BayerDemosaicer {
    pattern: CfaPattern,
}

impl Default for BayerDemosaicer {
    fn default() -> Self {
        Self::new(CfaPattern::rggb())
    }
}

impl BayerDemosaicer {
    pub fn new(pattern: CfaPattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &CfaPattern {
        &self.pattern
    }

    /// Reconstruct an interleaved RGB buffer from a single-channel mosaic.
    ///
    /// Native sites are copied unchanged. A missing colour is the truncated
    /// mean of the orthogonal neighbours carrying it, or of the diagonal
    /// neighbours when no orthogonal one does. Rows are computed in parallel;
    /// each reads only `mosaic` and writes only its own output row.
    #[instrument(skip_all, fields(width = mosaic.width(), height = mosaic.height()))]
    pub fn demosaic(&self, mosaic: &RasterBuffer) -> Result<RasterBuffer> {
        let width = mosaic.width();
        let height = mosaic.height();
        if mosaic.channels() != 1 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        debug!("Running demosaic, CFA={}", self.pattern);

        let mut output = RasterBuffer::allocate_with_limit(width, height, RGB_CHANNELS, usize::MAX)?;
        if output.is_empty() {
            return Ok(output);
        }

        output
            .samples_mut()
            .par_chunks_mut(width * RGB_CHANNELS)
            .enumerate()
            .for_each(|(y, dst_row)| self.demosaic_row(mosaic, y, dst_row));

        Ok(output)
    }

    fn demosaic_row(&self, mosaic: &RasterBuffer, y: usize, dst_row: &mut [u16]) {
        for (x, px) in dst_row.chunks_exact_mut(RGB_CHANNELS).enumerate() {
            let native = self.pattern.channel_at(x, y);
            for channel in CfaChannel::ALL {
                px[channel.index()] = if channel == native {
                    mosaic.at(x, y, 0)
                } else {
                    self.interpolate(mosaic, x, y, channel)
                };
            }
        }
    }

    fn interpolate(&self, mosaic: &RasterBuffer, x: usize, y: usize, channel: CfaChannel) -> u16 {
        let width = mosaic.width();
        let height = mosaic.height();

        for ring in [&ORTHOGONAL, &DIAGONAL] {
            let mut sum = 0u32;
            let mut count = 0u32;
            for &(dx, dy) in ring {
                let nx = reflect_101(x as isize + dx, width);
                let ny = reflect_101(y as isize + dy, height);
                // Judge the neighbour by where it actually landed; on a
                // one-pixel axis reflection can fold back onto another colour.
                if self.pattern.channel_at(nx, ny) == channel {
                    sum += u32::from(mosaic.at(nx, ny, 0));
                    count += 1;
                }
            }
            if count > 0 {
                return (sum / count) as u16;
            }
        }

        // Degenerate strip with no neighbour of this colour.
        mosaic.at(x, y, 0)
    }
}
