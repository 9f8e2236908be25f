use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

use cfa_pipeline_rs::image_pipeline::{
    AdaptiveMedianFilter, BayerDemosaicer, CfaPattern, MosaicPipeline, PgmReader, PgmWriter,
    PipelineConfig, PipelineError, RasterBuffer, RasterWriter, ScanlineIngestor,
    TiffCompression, TiffScanlineSource,
};
use tiff::decoder::{Decoder, DecodingResult};

fn write_gray16_tiff(path: &Path, width: u32, height: u32, data: &[u16]) {
    let file = BufWriter::new(File::create(path).unwrap());
    let mut encoder = tiff::encoder::TiffEncoder::new(file).unwrap();
    encoder
        .write_image::<tiff::encoder::colortype::Gray16>(width, height, data)
        .unwrap();
}

fn ramp(width: usize, height: usize) -> Vec<u16> {
    (0..width * height).map(|i| (i * 613 % 65_536) as u16).collect()
}

#[test]
fn tiff_to_rgb_tiff_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mosaic.tiff");
    let output = dir.path().join("rgb.tiff");
    let data = ramp(8, 6);
    write_gray16_tiff(&input, 8, 6, &data);

    let config = PipelineConfig::builder()
        .compression(TiffCompression::Lzw)
        .build();
    MosaicPipeline::new(config)
        .unwrap()
        .convert_file(&input, &output)
        .unwrap();

    let mut decoder = Decoder::new(File::open(&output).unwrap()).unwrap();
    assert_eq!(decoder.dimensions().unwrap(), (8, 6));
    assert_eq!(decoder.colortype().unwrap(), tiff::ColorType::RGB(16));
    let DecodingResult::U16(rgb) = decoder.read_image().unwrap() else {
        panic!("expected 16-bit samples");
    };

    // Same result as running the stages by hand.
    let mosaic = RasterBuffer::from_samples(8, 6, 1, data).unwrap();
    let expected = BayerDemosaicer::default().demosaic(&mosaic).unwrap();
    assert_eq!(rgb, expected.into_samples());
}

#[test]
fn tiff_to_pgm_mosaic_passthrough() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mosaic.tiff");
    let output = dir.path().join("mosaic.pgm");
    let data = ramp(5, 3);
    write_gray16_tiff(&input, 5, 3, &data);

    let config = PipelineConfig::builder().demosaic(false).build();
    MosaicPipeline::with_pgm(config)
        .unwrap()
        .convert_file(&input, &output)
        .unwrap();

    let decoded = PgmReader::default().read_file(&output).unwrap();
    assert_eq!(decoded.samples(), data.as_slice());
}

#[test]
fn failed_conversion_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mosaic.tiff");
    let output = dir.path().join("out.pgm");
    write_gray16_tiff(&input, 4, 4, &ramp(4, 4));

    // RGB cannot be stored as PGM.
    let err = MosaicPipeline::with_pgm(PipelineConfig::default())
        .unwrap()
        .convert_file(&input, &output)
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    assert!(!output.exists());
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.tiff");
    let err = MosaicPipeline::new(PipelineConfig::default())
        .unwrap()
        .convert_file(dir.path().join("nope.tiff"), &output)
        .unwrap_err();
    assert!(matches!(err, PipelineError::InputReadError(_)));
    assert!(!output.exists());
}

#[test]
fn pgm_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.pgm");
    let mut samples = ramp(9, 7);
    samples[0] = 0;
    samples[1] = u16::MAX;
    samples[2] = 0x00FF;
    samples[3] = 0xFF00;
    let image = RasterBuffer::from_samples(9, 7, 1, samples).unwrap();

    PgmWriter.write_file(&image, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"P5\n9 7\n65535\n"));
    assert_eq!(&bytes[13..15], &[0x00, 0x00]);
    assert_eq!(&bytes[15..17], &[0xFF, 0xFF]);
    assert_eq!(&bytes[17..19], &[0x00, 0xFF]);

    assert_eq!(PgmReader::default().read_file(&path).unwrap(), image);
}

#[test]
fn pgm_fixture_through_demosaic_and_median() {
    // Uniform 2x2 tile: every phase appears once, so nothing gets averaged away.
    let mosaic = RasterBuffer::from_samples(2, 2, 1, vec![0x0101; 4]).unwrap();
    let mut encoded = Vec::new();
    PgmWriter.write_raster(&mosaic, &mut encoded).unwrap();

    let decoded = PgmReader::default().read(&mut Cursor::new(encoded)).unwrap();
    let rgb = BayerDemosaicer::new(CfaPattern::rggb())
        .demosaic(&decoded)
        .unwrap();
    let filtered = AdaptiveMedianFilter::new(3, 1.0).unwrap().apply(&rgb).unwrap();

    assert_eq!(filtered.channels(), 3);
    assert!(filtered.samples().iter().all(|&v| v == 0x0101));
}

#[test]
fn ingest_from_tiff_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mono.tiff");
    let data = ramp(7, 2);
    write_gray16_tiff(&input, 7, 2, &data);

    let mut source = TiffScanlineSource::open(&input).unwrap();
    let buffer = ScanlineIngestor::default().ingest(&mut source).unwrap();
    assert_eq!((buffer.width(), buffer.height()), (7, 2));
    assert_eq!(buffer.samples(), data.as_slice());
}
