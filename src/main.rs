use std::path::Path;

use anyhow::{Context, bail};
use cfa_pipeline_rs::image_pipeline::{
    MedianConfig, MosaicPipeline, PipelineConfig, PipelineConfigBuilder, TiffCompression,
};
use cfa_pipeline_rs::logger;

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut args: Vec<String> = std::env::args().collect();
    let median = match args.iter().position(|a| a == "--median") {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    };
    if args.len() != 3 {
        bail!(
            "usage: {} [--median] <input.tiff> <output.tiff|output.pgm>",
            args[0]
        );
    }
    let input = Path::new(&args[1]);
    let output = Path::new(&args[2]);

    info!("Starting cfa_pipeline...");

    let to_pgm = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pgm"));

    let mut builder = base_config();
    if median {
        builder = builder.median(Some(MedianConfig::default()));
    }

    let result = if to_pgm {
        // PGM holds a single channel: write the raw mosaic.
        let config = builder.demosaic(false).build();
        let pipeline = MosaicPipeline::with_pgm(config).context("building PGM pipeline")?;
        log_median(pipeline.config());
        pipeline.convert_file(input, output)
    } else {
        let config = builder.demosaic(true).build();
        let pipeline = MosaicPipeline::new(config).context("building TIFF pipeline")?;
        info!("Compression: {:?}", pipeline.config().compression);
        info!("CFA: {}", pipeline.config().cfa);
        log_median(pipeline.config());
        pipeline.convert_file(input, output)
    };

    match result {
        Ok(_) => info!("Conversion successful!"),
        Err(e) => {
            error!("Conversion failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn base_config() -> PipelineConfigBuilder {
    PipelineConfig::builder().compression(TiffCompression::None)
}

fn log_median(config: &PipelineConfig) {
    match &config.median {
        Some(m) => info!(
            "Adaptive median: {}x{} kernel, variance threshold {}",
            m.kernel_size, m.kernel_size, m.threshold
        ),
        None => info!("Adaptive median: disabled"),
    }
}
