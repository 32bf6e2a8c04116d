//! The QR encoding collaborator boundary.
//!
//! This crate styles and renders bit matrices; it does not produce them.
//! A [`QrEngine`] implementation (Reed-Solomon encoding, version and mask
//! selection) is injected by the application. The only contract is that
//! `dimension` is consistent and `true` means "dark module".

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matrix::BitMatrix;

/// QR error correction level.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

impl Default for EcLevel {
    fn default() -> Self {
        EcLevel::M
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("message of {0} bytes does not fit any supported version")]
    MessageTooLong(usize),
    #[error("encoder failure: {0}")]
    Other(String),
}

/// Produces the boolean matrix for a message. Implementations must be
/// deterministic for equal inputs.
pub trait QrEngine {
    fn encode(&self, message: &[u8], ec_level: EcLevel) -> Result<BitMatrix, EngineError>;
}

/// A deterministic stand-in engine for tests, previews and catalog
/// rendering. It lays out the three finder patterns and fills the data
/// area from a seeded hash of the message; the output is structurally a
/// QR matrix but carries no real payload and will not scan.
pub struct FixtureEngine {
    dimension: usize,
}

impl FixtureEngine {
    /// A 21x21 (version 1 sized) fixture.
    pub fn new() -> Self {
        FixtureEngine { dimension: 21 }
    }

    pub fn with_dimension(dimension: usize) -> Self {
        assert!(dimension >= 21, "QR matrices start at 21x21");
        FixtureEngine { dimension }
    }

    fn finder_at(row: usize, col: usize) -> bool {
        (row == 0 || row == 6 || col == 0 || col == 6)
            || ((2..=4).contains(&row) && (2..=4).contains(&col))
    }
}

impl Default for FixtureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QrEngine for FixtureEngine {
    fn encode(&self, message: &[u8], ec_level: EcLevel) -> Result<BitMatrix, EngineError> {
        let dim = self.dimension;
        let mut seed: u64 = match ec_level {
            EcLevel::L => 0x9e37,
            EcLevel::M => 0x79b9,
            EcLevel::Q => 0x7f4a,
            EcLevel::H => 0x7c15,
        };
        for byte in message {
            seed = seed.wrapping_mul(0x100000001b3).wrapping_add(*byte as u64);
        }
        Ok(BitMatrix::from_fn(dim, |row, col| {
            let anchors = [(0usize, 0usize), (0, dim - 7), (dim - 7, 0)];
            for (ar, ac) in anchors {
                if row >= ar && row < ar + 7 && col >= ac && col < ac + 7 {
                    return Self::finder_at(row - ar, col - ac);
                }
            }
            let mut h = seed
                .wrapping_add((row as u64) << 32)
                .wrapping_add(col as u64)
                .wrapping_mul(0x2545F4914F6CDD1D);
            h ^= h >> 29;
            h & 1 == 1
        }))
    }
}
