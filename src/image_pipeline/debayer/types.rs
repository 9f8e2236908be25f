//! Types for debayering operations

use std::fmt;

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Colour sampled by one photosite. The discriminant is the output channel
/// index in an interleaved RGB buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfaChannel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl CfaChannel {
    pub const ALL: [CfaChannel; 3] = [CfaChannel::Red, CfaChannel::Green, CfaChannel::Blue];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CfaChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("R"),
            Self::Green => f.write_str("G"),
            Self::Blue => f.write_str("B"),
        }
    }
}

use CfaChannel::{Blue, Green, Red};

/// 2x2 colour filter tile, looked up by `(y mod 2, x mod 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfaPattern {
    table: [[CfaChannel; 2]; 2],
}

impl Default for CfaPattern {
    fn default() -> Self {
        Self::rggb()
    }
}

impl CfaPattern {
    /// Canonical layout: red at (0,0), blue at (1,1).
    pub const fn rggb() -> Self {
        Self {
            table: [[Red, Green], [Green, Blue]],
        }
    }

    pub const fn bggr() -> Self {
        Self {
            table: [[Blue, Green], [Green, Red]],
        }
    }

    pub const fn grbg() -> Self {
        Self {
            table: [[Green, Red], [Blue, Green]],
        }
    }

    pub const fn gbrg() -> Self {
        Self {
            table: [[Green, Blue], [Red, Green]],
        }
    }

    /// Arbitrary tile given as `table[row][col]`. Every colour must appear
    /// at least once or it could never be reconstructed.
    pub fn from_table(table: [[CfaChannel; 2]; 2]) -> Result<Self> {
        for channel in CfaChannel::ALL {
            if !table.iter().flatten().any(|&c| c == channel) {
                return Err(PipelineError::InvalidParameter(format!(
                    "CFA tile has no {channel} site"
                )));
            }
        }
        Ok(Self { table })
    }

    #[inline]
    pub fn channel_at(&self, x: usize, y: usize) -> CfaChannel {
        self.table[y & 1][x & 1]
    }
}

impl fmt::Display for CfaPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for channel in self.table.iter().flatten() {
            write!(f, "{channel}")?;
        }
        Ok(())
    }
}
