//! Pipeline configuration types

use crate::image_pipeline::debayer::CfaPattern;
use crate::image_pipeline::filter::MedianConfig;
use crate::image_pipeline::raster::DEFAULT_MAX_DIMENSION;
use crate::image_pipeline::tiff::TiffCompression;

/// Configuration for mosaic ingestion, reconstruction and output
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// CFA layout of the sensor
    pub cfa: CfaPattern,
    /// Whether to demosaic to RGB (true) or keep the single-channel mosaic (false)
    pub demosaic: bool,
    /// Adaptive median denoise, skipped when `None`
    pub median: Option<MedianConfig>,
    /// Whether to reject empty or oversized images before processing
    pub validate_dimensions: bool,
    /// Largest accepted width or height
    pub max_dimension: Option<usize>,
    /// Compression used when the output is TIFF
    pub compression: TiffCompression,
    /// Predictor value for TIFF compression (typically 2 for horizontal differencing)
    pub predictor: Option<u16>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cfa: CfaPattern::rggb(),
            demosaic: true,
            median: None,
            validate_dimensions: true,
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
            compression: TiffCompression::None,
            predictor: None,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Allocation bound handed to the ingestor and codecs.
    pub fn allocation_limit(&self) -> usize {
        self.max_dimension.unwrap_or(usize::MAX)
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    cfa: Option<CfaPattern>,
    demosaic: Option<bool>,
    median: Option<Option<MedianConfig>>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
}

impl PipelineConfigBuilder {
    pub fn cfa(mut self, cfa: CfaPattern) -> Self {
        self.cfa = Some(cfa);
        self
    }

    pub fn demosaic(mut self, enable: bool) -> Self {
        self.demosaic = Some(enable);
        self
    }

    pub fn median(mut self, median: Option<MedianConfig>) -> Self {
        self.median = Some(median);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            cfa: self.cfa.unwrap_or(default.cfa),
            demosaic: self.demosaic.unwrap_or(default.demosaic),
            median: self.median.unwrap_or(default.median),
            validate_dimensions: self
                .validate_dimensions
                .unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
        }
    }
}
