//! Genome coverage of the emitted blocks.

use crate::common::BlockInstance;
use crate::graph::JunctionStorage;
use std::fmt;

/// Covered and total base counts over all chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageReport {
    pub covered: usize,
    pub total: usize,
}

impl CoverageReport {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.covered as f64 / self.total as f64
        }
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.ratio())
    }
}

/// Marks `[start, end)` of every block on a per-chromosome mask and
/// counts the marked positions.
pub fn coverage(storage: &JunctionStorage, blocks: &[BlockInstance]) -> CoverageReport {
    let mut masks: Vec<Vec<bool>> = (0..storage.chr_number())
        .map(|chr| vec![false; storage.chr_length(chr) + 1])
        .collect();

    for block in blocks {
        for position in block.start()..block.end() {
            masks[block.chr_id()][position] = true;
        }
    }

    let mut covered = 0;
    let mut total = 0;
    for mask in &masks {
        total += mask.len();
        covered += mask.iter().filter(|&&used| used).count();
    }
    CoverageReport { covered, total }
}
