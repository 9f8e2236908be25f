//! Dense sample buffer shared by every pipeline stage

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Largest width or height `RasterBuffer::allocate` accepts.
pub const DEFAULT_MAX_DIMENSION: usize = 65_535;

/// Row-major, channel-interleaved 16-bit image.
///
/// The store always holds exactly `width * height * channels` samples. A
/// buffer with zero width or height is valid and simply has nothing to
/// address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u16>,
}

impl RasterBuffer {
    /// Zero-filled buffer, bounded by [`DEFAULT_MAX_DIMENSION`].
    pub fn allocate(width: usize, height: usize, channels: usize) -> Result<Self> {
        Self::allocate_with_limit(width, height, channels, DEFAULT_MAX_DIMENSION)
    }

    pub fn allocate_with_limit(
        width: usize,
        height: usize,
        channels: usize,
        max_dimension: usize,
    ) -> Result<Self> {
        if width > max_dimension || height > max_dimension || channels == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        let len = sample_count(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0u16; len],
        })
    }

    /// Wrap an existing interleaved sample vector.
    pub fn from_samples(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u16>,
    ) -> Result<Self> {
        if channels == 0 || sample_count(width, height, channels)? != data.len() {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Samples per row, all channels included.
    pub fn row_stride(&self) -> usize {
        self.width * self.channels
    }

    pub fn sample(&self, x: usize, y: usize, channel: usize) -> Result<u16> {
        let idx = self.index(x, y, channel)?;
        Ok(self.data[idx])
    }

    pub fn set_sample(&mut self, x: usize, y: usize, channel: usize, value: u16) -> Result<()> {
        let idx = self.index(x, y, channel)?;
        self.data[idx] = value;
        Ok(())
    }

    /// One row of interleaved samples. Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[u16] {
        let stride = self.row_stride();
        &self.data[y * stride..(y + 1) * stride]
    }

    pub fn samples(&self) -> &[u16] {
        &self.data
    }

    pub fn samples_mut(&mut self) -> &mut [u16] {
        &mut self.data
    }

    pub fn into_samples(self) -> Vec<u16> {
        self.data
    }

    /// Unchecked read for hot loops that already clamp their coordinates.
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize, channel: usize) -> u16 {
        debug_assert!(x < self.width && y < self.height && channel < self.channels);
        self.data[(y * self.width + x) * self.channels + channel]
    }

    fn index(&self, x: usize, y: usize, channel: usize) -> Result<usize> {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return Err(PipelineError::OutOfBounds { x, y, channel });
        }
        Ok((y * self.width + x) * self.channels + channel)
    }
}

fn sample_count(width: usize, height: usize, channels: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(PipelineError::InvalidDimensions(width, height))
}
