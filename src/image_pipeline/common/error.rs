use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Sample out of bounds: x={x}, y={y}, channel={channel}")]
    OutOfBounds { x: usize, y: usize, channel: usize },

    #[error("Unsupported format: {bits_per_sample} bits per sample, {samples_per_pixel} samples per pixel")]
    UnsupportedFormat {
        bits_per_sample: u32,
        samples_per_pixel: u32,
    },

    #[error("Truncated source at row {row}: expected {expected} bytes, got {actual}")]
    TruncatedSource {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Bad magic token: expected \"P5\", found {0:?}")]
    BadMagic(String),

    #[error("Bad maximum value: expected \"65535\", found {0:?}")]
    BadMaxValue(String),

    #[error("Failed to write output: {0}")]
    WriteFailure(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to decode TIFF image: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
