use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    codec::{PgmWriter, RasterWriter},
    common::error::{PipelineError, Result},
    conversions::{
        config::PipelineConfig,
        timing::{PipelineTimings, Timer},
    },
    debayer::BayerDemosaicer,
    filter::AdaptiveMedianFilter,
    ingest::{ScanlineIngestor, ScanlineSource},
    raster::RasterBuffer,
    tiff::{StandardTiffWriter, TiffScanlineSource},
};

/// Container -> ingest -> demosaic -> optional median -> writer.
pub struct MosaicPipeline<W: RasterWriter> {
    ingestor: ScanlineIngestor,
    demosaicer: BayerDemosaicer,
    median: Option<AdaptiveMedianFilter>,
    writer: W,
    config: PipelineConfig,
}

impl MosaicPipeline<StandardTiffWriter> {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let writer = StandardTiffWriter::new(config.compression, config.predictor);
        Self::with_custom(writer, config)
    }
}

impl MosaicPipeline<PgmWriter> {
    /// PGM output only holds one channel, so pair this with `demosaic(false)`.
    pub fn with_pgm(config: PipelineConfig) -> Result<Self> {
        Self::with_custom(PgmWriter, config)
    }
}

impl<W: RasterWriter> MosaicPipeline<W> {
    pub fn with_custom(writer: W, config: PipelineConfig) -> Result<Self> {
        let median = config
            .median
            .as_ref()
            .map(AdaptiveMedianFilter::from_config)
            .transpose()?;
        Ok(Self {
            ingestor: ScanlineIngestor::new(config.allocation_limit()),
            demosaicer: BayerDemosaicer::new(config.cfa),
            median,
            writer,
            config,
        })
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(PipelineError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Run every processing stage and hand back the finished buffer.
    pub fn process(&self, source: &mut dyn ScanlineSource) -> Result<RasterBuffer> {
        self.run(source, &mut PipelineTimings::new())
    }

    fn run(
        &self,
        source: &mut dyn ScanlineSource,
        timings: &mut PipelineTimings,
    ) -> Result<RasterBuffer> {
        timed(timings, "validate_dimensions", || {
            self.validate_dimensions(source.width(), source.height())
        })?;

        let mut image = timed(timings, "ingest", || self.ingestor.ingest(source))?;

        if self.config.demosaic {
            image = timed(timings, "demosaic", || self.demosaicer.demosaic(&image))?;
        }

        if let Some(filter) = &self.median {
            image = timed(timings, "adaptive_median", || filter.apply(&image))?;
        }

        Ok(image)
    }

    #[instrument(skip(self, source, output))]
    pub fn convert(&self, source: &mut dyn ScanlineSource, output: &mut dyn Write) -> Result<()> {
        self.convert_with_timings(source, output).map(|_| ())
    }

    #[instrument(skip(self, source, output))]
    pub fn convert_with_timings(
        &self,
        source: &mut dyn ScanlineSource,
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        info!("Starting mosaic conversion");

        let image = self.run(source, &mut timings)?;
        timed(&mut timings, "write_output", || {
            self.writer.write_raster(&image, output)
        })?;

        info!(
            width = image.width(),
            height = image.height(),
            channels = image.channels(),
            "Conversion complete in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        timings.log_summary();
        Ok(timings)
    }

    /// Convert a TIFF on disk. Nothing is left at `output_path` on failure.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let mut source = {
            let _span = tracing::info_span!("open_input_file").entered();
            TiffScanlineSource::open(input_path)?
        };

        let image = self.process(&mut source)?;

        let output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                PipelineError::WriteFailure(format!("{}: {}", output_path.display(), e))
            })?
        };

        let mut output = BufWriter::new(output_file);
        let written = self
            .writer
            .write_raster(&image, &mut output)
            .and_then(|_| {
                output
                    .flush()
                    .map_err(|e| PipelineError::WriteFailure(e.to_string()))
            });
        if let Err(e) = written {
            drop(output);
            let _ = std::fs::remove_file(output_path);
            return Err(e);
        }

        Ok(())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Swap configuration; the writer is kept as constructed.
    pub fn set_config(&mut self, config: PipelineConfig) -> Result<()> {
        self.median = config
            .median
            .as_ref()
            .map(AdaptiveMedianFilter::from_config)
            .transpose()?;
        self.ingestor = ScanlineIngestor::new(config.allocation_limit());
        self.demosaicer = BayerDemosaicer::new(config.cfa);
        self.config = config;
        Ok(())
    }
}

fn timed<T>(
    timings: &mut PipelineTimings,
    name: &'static str,
    step: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let _span = tracing::info_span!("step", name).entered();
    let timer = Timer::start(name);
    let out = step()?;
    let (name, duration) = timer.stop();
    timings.add_step(name, duration);
    Ok(out)
}
