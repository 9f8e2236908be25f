//! `ScanlineSource` backed by the `tiff` crate decoder.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::{debug, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::ingest::ScanlineSource;

/// A decoded TIFF page served one scanline at a time.
///
/// Pixel data is only decoded for 16-bit single-sample images; anything else
/// keeps its metadata so the ingestor can reject it.
pub struct TiffScanlineSource {
    width: usize,
    height: usize,
    bits_per_sample: u32,
    samples_per_pixel: u32,
    samples: Vec<u16>,
}

impl TiffScanlineSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(input = %path.display(), "Opening TIFF");
        let file = File::open(path).map_err(|e| {
            PipelineError::InputReadError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut decoder =
            Decoder::new(reader).map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        let color_type = decoder
            .colortype()
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        let (bits_per_sample, samples_per_pixel) = sample_layout(color_type)?;

        debug!(
            width,
            height, bits_per_sample, samples_per_pixel, "TIFF metadata"
        );

        let samples = if bits_per_sample == 16 && samples_per_pixel == 1 {
            match decoder
                .read_image()
                .map_err(|e| PipelineError::DecodeError(e.to_string()))?
            {
                DecodingResult::U16(samples) => samples,
                _ => {
                    return Err(PipelineError::DecodeError(
                        "16-bit TIFF decoded to an unexpected sample type".to_string(),
                    ));
                }
            }
        } else {
            warn!(?color_type, "TIFF is not 16-bit monochrome, pixel data not decoded");
            Vec::new()
        };

        Ok(Self {
            width: width as usize,
            height: height as usize,
            bits_per_sample,
            samples_per_pixel,
            samples,
        })
    }
}

fn sample_layout(color_type: ColorType) -> Result<(u32, u32)> {
    let layout = match color_type {
        ColorType::Gray(bits) => (bits, 1),
        ColorType::GrayA(bits) => (bits, 2),
        ColorType::Palette(bits) => (bits, 1),
        ColorType::RGB(bits) | ColorType::YCbCr(bits) => (bits, 3),
        ColorType::RGBA(bits) | ColorType::CMYK(bits) => (bits, 4),
        other => {
            return Err(PipelineError::DecodeError(format!(
                "unrecognised TIFF color type {other:?}"
            )));
        }
    };
    Ok((u32::from(layout.0), layout.1))
}

impl ScanlineSource for TiffScanlineSource {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn bits_per_sample(&self) -> u32 {
        self.bits_per_sample
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    fn scanline_len(&self) -> usize {
        let bits = self.width * self.bits_per_sample as usize * self.samples_per_pixel as usize;
        bits.div_ceil(8)
    }

    fn read_row(&mut self, row: usize, buf: &mut [u8]) -> Result<usize> {
        let start = row * self.width;
        let Some(src) = self.samples.get(start..start + self.width) else {
            return Ok(0);
        };
        let mut written = 0;
        for (dst, value) in buf.chunks_exact_mut(2).zip(src) {
            dst.copy_from_slice(&value.to_ne_bytes());
            written += 2;
        }
        Ok(written)
    }
}
