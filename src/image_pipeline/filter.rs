//! Denoising filters module

mod adaptive_median;

pub use adaptive_median::{AdaptiveMedianFilter, MedianConfig};
