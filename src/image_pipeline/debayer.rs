//! Debayering module for converting Bayer pattern mosaics to RGB

mod demosaicer;
pub mod types;

pub use demosaicer::BayerDemosaicer;
pub use types::{CfaChannel, CfaPattern};
