use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::ingest::{ScanlineIngestor, ScanlineSource};

/// In-memory container whose rows are `scanline_len` bytes long.
struct MockSource {
    width: usize,
    height: usize,
    bits_per_sample: u32,
    samples_per_pixel: u32,
    scanline_len: usize,
    rows: Vec<Vec<u8>>,
    short_row: Option<usize>,
    rows_read: usize,
}

impl MockSource {
    /// Row `y` holds samples `y * 100 + x` for every padded column.
    fn padded(width: usize, height: usize, scanline_len: usize) -> Self {
        let padded_samples = scanline_len.div_ceil(2);
        let rows = (0..height)
            .map(|y| {
                let mut row: Vec<u8> = (0..padded_samples)
                    .flat_map(|x| ((y * 100 + x) as u16).to_ne_bytes())
                    .collect();
                row.truncate(scanline_len);
                row
            })
            .collect();
        Self {
            width,
            height,
            bits_per_sample: 16,
            samples_per_pixel: 1,
            scanline_len,
            rows,
            short_row: None,
            rows_read: 0,
        }
    }
}

impl ScanlineSource for MockSource {
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
        self.scanline_len
    }

    fn read_row(&mut self, row: usize, buf: &mut [u8]) -> Result<usize> {
        self.rows_read += 1;
        let Some(src) = self.rows.get(row) else {
            return Ok(0);
        };
        let n = if self.short_row == Some(row) {
            src.len() / 2
        } else {
            src.len()
        };
        buf[..n].copy_from_slice(&src[..n]);
        Ok(n)
    }
}

#[test]
fn drops_padding_sample_on_every_row() {
    // Width 5, six padded samples per stored row.
    let mut source = MockSource::padded(5, 4, 12);
    let buffer = ScanlineIngestor::default().ingest(&mut source).unwrap();

    assert_eq!(buffer.width(), 5);
    assert_eq!(buffer.height(), 4);
    assert_eq!(buffer.channels(), 1);
    assert_eq!(buffer.len(), 20);
    for y in 0..4 {
        let expected: Vec<u16> = (0..5).map(|x| (y * 100 + x) as u16).collect();
        assert_eq!(buffer.row(y), expected.as_slice(), "row {y}");
    }
}

#[test]
fn stride_comes_from_scanline_length_not_width() {
    // An odd byte length rounds up: 13 bytes -> 7 samples per stored row.
    let mut source = MockSource::padded(5, 3, 13);
    let buffer = ScanlineIngestor::default().ingest(&mut source).unwrap();
    assert_eq!(buffer.row(2), &[200, 201, 202, 203, 204]);
}

#[test]
fn unpadded_rows_are_copied_verbatim() {
    let mut source = MockSource::padded(4, 2, 8);
    let buffer = ScanlineIngestor::default().ingest(&mut source).unwrap();
    assert_eq!(buffer.samples(), &[0, 1, 2, 3, 100, 101, 102, 103]);
}

#[test]
fn rejects_non_16_bit_sources() {
    let mut source = MockSource::padded(4, 2, 8);
    source.bits_per_sample = 8;
    let err = ScanlineIngestor::default().ingest(&mut source).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::UnsupportedFormat {
            bits_per_sample: 8,
            samples_per_pixel: 1
        }
    ));
    assert_eq!(source.rows_read, 0);
}

#[test]
fn rejects_multi_sample_pixels() {
    let mut source = MockSource::padded(4, 2, 8);
    source.samples_per_pixel = 3;
    let err = ScanlineIngestor::default().ingest(&mut source).unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
}

#[test]
fn short_row_fails_the_whole_ingest() {
    let mut source = MockSource::padded(5, 4, 12);
    source.short_row = Some(2);
    let err = ScanlineIngestor::default().ingest(&mut source).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::TruncatedSource {
            row: 2,
            expected: 12,
            actual: 6
        }
    ));
}

#[test]
fn scanline_shorter_than_width_is_invalid() {
    let mut source = MockSource::padded(5, 2, 8);
    let err = ScanlineIngestor::default().ingest(&mut source).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidDimensions(5, 2)));
}

#[test]
fn empty_source_yields_empty_buffer() {
    let mut source = MockSource::padded(5, 0, 10);
    let buffer = ScanlineIngestor::default().ingest(&mut source).unwrap();
    assert!(buffer.is_empty());
    assert_eq!(source.rows_read, 0);
}

#[test]
fn honours_max_dimension() {
    let mut source = MockSource::padded(5, 4, 10);
    let err = ScanlineIngestor::new(3).ingest(&mut source).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidDimensions(5, 4)));
}

#[test]
fn odd_scanline_must_cover_every_kept_sample() {
    // 13 bytes round up to 7 samples, but the seventh has no high byte.
    let mut source = MockSource::padded(7, 2, 13);
    let err = ScanlineIngestor::default().ingest(&mut source).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidDimensions(7, 2)));
    assert_eq!(source.rows_read, 0);
}

#[test]
fn huge_declared_size_with_no_rows_is_truncated() {
    let mut source = MockSource::padded(65_535, 0, 131_070);
    source.height = 65_535;
    let err = ScanlineIngestor::default().ingest(&mut source).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::TruncatedSource {
            row: 0,
            expected: 131_070,
            actual: 0
        }
    ));
    assert_eq!(source.rows_read, 1);
}
