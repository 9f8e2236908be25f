use crate::image_pipeline::common::error::Result;

/// A container that hands out its pixel data one scanline at a time.
///
/// Samples inside a row are host-order `u16` when `bits_per_sample` is 16.
pub trait ScanlineSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn bits_per_sample(&self) -> u32;
    fn samples_per_pixel(&self) -> u32;
    /// Byte length of one stored scanline, padding included.
    fn scanline_len(&self) -> usize;
    /// Fill `buf` with row `row` and return the number of bytes delivered.
    fn read_row(&mut self, row: usize, buf: &mut [u8]) -> Result<usize>;
}
