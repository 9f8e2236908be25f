//! Variance-gated median filter.
//!
//! Each sample looks at its K x K neighbourhood (reflect-101 at the border).
//! When the population variance of that window is below the threshold the
//! sample is replaced by the window median; otherwise it is passed through,
//! so edges and texture are left alone while flat noisy areas are smoothed.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::image_pipeline::common::border::reflect_101;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raster::RasterBuffer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianConfig {
    /// Odd window side, at least 3.
    pub kernel_size: usize,
    /// Windows with population variance strictly below this are smoothed.
    pub threshold: f64,
}

/// 3x3 window; a variance of 80 is a standard deviation of about 9 counts.
impl Default for MedianConfig {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            threshold: 80.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdaptiveMedianFilter {
    kernel_size: usize,
    threshold: f64,
}

impl AdaptiveMedianFilter {
    pub fn new(kernel_size: usize, threshold: f64) -> Result<Self> {
        if kernel_size < 3 || kernel_size % 2 == 0 {
            return Err(PipelineError::InvalidParameter(format!(
                "kernel size must be odd and >= 3, got {kernel_size}"
            )));
        }
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(PipelineError::InvalidParameter(format!(
                "variance threshold must be finite and non-negative, got {threshold}"
            )));
        }
        Ok(Self {
            kernel_size,
            threshold,
        })
    }

    pub fn from_config(config: &MedianConfig) -> Result<Self> {
        Self::new(config.kernel_size, config.threshold)
    }

    /// Filter every channel of `input` independently.
    #[instrument(skip_all, fields(width = input.width(), height = input.height(), channels = input.channels()))]
    pub fn apply(&self, input: &RasterBuffer) -> Result<RasterBuffer> {
        let mut output = input.clone();
        if output.is_empty() {
            return Ok(output);
        }

        debug!(
            kernel_size = self.kernel_size,
            threshold = self.threshold,
            "Running adaptive median"
        );

        let stride = input.row_stride();
        output
            .samples_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, dst_row)| self.filter_row(input, y, dst_row));

        Ok(output)
    }

    fn filter_row(&self, input: &RasterBuffer, y: usize, dst_row: &mut [u16]) {
        let channels = input.channels();
        let mut window = Vec::with_capacity(self.kernel_size * self.kernel_size);

        for (x, px) in dst_row.chunks_exact_mut(channels).enumerate() {
            for (c, dst) in px.iter_mut().enumerate() {
                self.gather(input, x, y, c, &mut window);
                let (_, variance) = window_stats(&window);
                if variance < self.threshold {
                    let mid = window.len() / 2;
                    *dst = *window.select_nth_unstable(mid).1;
                }
            }
        }
    }

    fn gather(&self, input: &RasterBuffer, x: usize, y: usize, c: usize, window: &mut Vec<u16>) {
        let half = (self.kernel_size / 2) as isize;
        window.clear();
        for dy in -half..=half {
            let sy = reflect_101(y as isize + dy, input.height());
            for dx in -half..=half {
                let sx = reflect_101(x as isize + dx, input.width());
                window.push(input.at(sx, sy, c));
            }
        }
    }
}

/// Mean and population variance (divided by N, not N - 1).
pub(crate) fn window_stats(values: &[u16]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, variance)
}
