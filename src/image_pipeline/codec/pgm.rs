//! 16-bit binary PGM ("P5") reader and writer.
//!
//! The header is exactly three newline-terminated lines, `P5`,
//! `<width> <height>` and `65535`, followed by `width * height` big-endian
//! samples with no row padding.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::image_pipeline::codec::endian::{HostEndian, swap_for_disk};
use crate::image_pipeline::codec::writer::RasterWriter;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::raster::{DEFAULT_MAX_DIMENSION, RasterBuffer};

const MAGIC: &str = "P5";
const MAX_VALUE: &str = "65535";

/// Longest header line we are willing to buffer before giving up.
const MAX_HEADER_LINE: u64 = 64;

/// Parser position. Each transition validates one token and fails closed.
enum ParseState {
    ReadMagic,
    ReadDimensions,
    ReadMaxValue { width: usize, height: usize },
    ReadSamples { width: usize, height: usize },
    Done(RasterBuffer),
}

pub struct PgmReader {
    max_dimension: usize,
}

impl Default for PgmReader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIMENSION)
    }
}

impl PgmReader {
    pub fn new(max_dimension: usize) -> Self {
        Self { max_dimension }
    }

    #[instrument(skip_all)]
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<RasterBuffer> {
        let path = path.as_ref();
        debug!(input = %path.display(), "Reading PGM");
        let file = File::open(path).map_err(|e| {
            PipelineError::InputReadError(format!("{}: {}", path.display(), e))
        })?;
        self.read(&mut BufReader::new(file))
    }

    pub fn read<R: BufRead>(&self, input: &mut R) -> Result<RasterBuffer> {
        let mut state = ParseState::ReadMagic;
        loop {
            state = match state {
                ParseState::ReadMagic => {
                    let line = read_header_line(input)?;
                    if line != MAGIC {
                        return Err(PipelineError::BadMagic(line));
                    }
                    ParseState::ReadDimensions
                }
                ParseState::ReadDimensions => {
                    let line = read_header_line(input)?;
                    let (width, height) = parse_dimensions(&line)?;
                    ParseState::ReadMaxValue { width, height }
                }
                ParseState::ReadMaxValue { width, height } => {
                    let line = read_header_line(input)?;
                    if line != MAX_VALUE {
                        return Err(PipelineError::BadMaxValue(line));
                    }
                    ParseState::ReadSamples { width, height }
                }
                ParseState::ReadSamples { width, height } => {
                    ParseState::Done(self.read_samples(input, width, height)?)
                }
                ParseState::Done(buffer) => {
                    debug!(
                        width = buffer.width(),
                        height = buffer.height(),
                        "PGM decoded"
                    );
                    return Ok(buffer);
                }
            };
        }
    }

    fn read_samples<R: Read>(
        &self,
        input: &mut R,
        width: usize,
        height: usize,
    ) -> Result<RasterBuffer> {
        if width > self.max_dimension || height > self.max_dimension {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(2))
            .ok_or(PipelineError::InvalidDimensions(width, height))?;

        // Grows with the bytes actually present, not with the header's claim.
        let mut bytes = Vec::new();
        input.take(expected as u64).read_to_end(&mut bytes)?;
        if bytes.len() < expected {
            return Err(PipelineError::TruncatedSource {
                row: bytes.len() / (width * 2),
                expected,
                actual: bytes.len(),
            });
        }

        let mut samples: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
            .collect();
        swap_for_disk(&mut samples, HostEndian::native());
        RasterBuffer::from_samples(width, height, 1, samples)
    }
}

/// Read one `\n`-terminated line, without the terminator. EOF yields an
/// empty string, which every state rejects.
fn read_header_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut raw = Vec::new();
    input.by_ref().take(MAX_HEADER_LINE).read_until(b'\n', &mut raw)?;
    if raw.last() == Some(&b'\n') {
        raw.pop();
    }
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

fn parse_dimensions(line: &str) -> Result<(usize, usize)> {
    let mut tokens = line.split(' ');
    let parsed = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(w), Some(h), None) => parse_decimal(w).zip(parse_decimal(h)),
        _ => None,
    };
    match parsed {
        Some((width, height)) if width > 0 && height > 0 => Ok((width, height)),
        Some((width, height)) => Err(PipelineError::InvalidDimensions(width, height)),
        None => Err(PipelineError::InvalidDimensions(0, 0)),
    }
}

/// Plain ASCII digits only; `str::parse` alone would also take a leading `+`.
fn parse_decimal(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

pub struct PgmWriter;

impl PgmWriter {
    /// Full file image: header plus big-endian samples.
    pub fn encode(image: &RasterBuffer) -> Result<Vec<u8>> {
        if image.channels() != 1 {
            return Err(PipelineError::UnsupportedFormat {
                bits_per_sample: 16,
                samples_per_pixel: image.channels() as u32,
            });
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(PipelineError::InvalidDimensions(
                image.width(),
                image.height(),
            ));
        }

        let header = format!("{MAGIC}\n{} {}\n{MAX_VALUE}\n", image.width(), image.height());
        let mut disk_order = image.samples().to_vec();
        swap_for_disk(&mut disk_order, HostEndian::native());

        let mut bytes = Vec::with_capacity(header.len() + disk_order.len() * 2);
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend(disk_order.iter().flat_map(|v| v.to_ne_bytes()));
        Ok(bytes)
    }

    /// Write `image` to `path`. A file that fails mid-write is removed.
    #[instrument(skip_all)]
    pub fn write_file<P: AsRef<Path>>(&self, image: &RasterBuffer, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = Self::encode(image)?;

        let mut file = File::create(path).map_err(|e| {
            PipelineError::WriteFailure(format!("{}: {}", path.display(), e))
        })?;
        if let Err(e) = file.write_all(&bytes).and_then(|_| file.flush()) {
            drop(file);
            let _ = std::fs::remove_file(path);
            return Err(PipelineError::WriteFailure(format!("{}: {}", path.display(), e)));
        }

        debug!("Wrote {} bytes", bytes.len());
        Ok(())
    }
}

impl RasterWriter for PgmWriter {
    fn write_raster(&self, image: &RasterBuffer, output: &mut dyn Write) -> Result<()> {
        let bytes = Self::encode(image)?;
        output
            .write_all(&bytes)
            .map_err(|e| PipelineError::WriteFailure(e.to_string()))
    }
}
