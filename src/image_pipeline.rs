//! Image processing pipeline module
//!
//! Ingests padded 16-bit monochrome scanlines, reconstructs RGB from a Bayer
//! mosaic, optionally denoises with a variance-gated median, and writes the
//! result as TIFF or 16-bit PGM.

pub mod codec;
pub mod common;
pub mod conversions;
pub mod debayer;
pub mod filter;
pub mod ingest;
pub mod raster;
pub mod tiff;

pub use common::{PipelineError, Result};

pub use raster::{DEFAULT_MAX_DIMENSION, RasterBuffer};

pub use ingest::{ScanlineIngestor, ScanlineSource};

pub use codec::{PgmReader, PgmWriter, RasterWriter};

pub use debayer::{BayerDemosaicer, CfaChannel, CfaPattern};

pub use filter::{AdaptiveMedianFilter, MedianConfig};

pub use self::tiff::{StandardTiffWriter, TiffCompression, TiffScanlineSource};

pub use conversions::{MosaicPipeline, PipelineConfig, PipelineConfigBuilder, PipelineTimings};
