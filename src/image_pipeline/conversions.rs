//! Pipeline conversions module
//!
//! This module contains orchestration logic that chains ingestion,
//! reconstruction, denoising and output.

mod config;
mod mosaic_pipeline;
mod timing;


pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use mosaic_pipeline::MosaicPipeline;
pub use timing::{PipelineTimings, StepTiming, Timer};
