//! Fork pairs and their canonical order.
//!
//! A fork is an unordered pair of instances meeting at one vertex,
//! either diverging there (a source) or converging there (a sink).
//! Sinks are sorted by the order below and each source is matched to the
//! first sink not less than it, so the order must place the nearest
//! downstream sink first: positions compare ascending on a
//! positive-strand branch and descending on a negative-strand branch.

use crate::algorithm::bubbles::BubbledBranches;
use crate::graph::Instance;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fork {
    branch: [Instance; 2],
}

impl Fork {
    /// Canonicalizes so that `branch(0) <= branch(1)`. At least one
    /// branch must lie on the positive strand.
    pub fn new(a: Instance, b: Instance) -> Self {
        debug_assert!(
            a.is_positive_strand() || b.is_positive_strand(),
            "fork with both branches on the negative strand"
        );
        if a <= b {
            Self { branch: [a, b] }
        } else {
            Self { branch: [b, a] }
        }
    }

    pub fn branch(&self, l: usize) -> Instance {
        self.branch[l]
    }
}

impl Ord for Fork {
    fn cmp(&self, other: &Self) -> Ordering {
        for l in 0..2 {
            match self.branch[l]
                .is_positive_strand()
                .cmp(&other.branch[l].is_positive_strand())
            {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        for l in 0..2 {
            match self.branch[l].chr_id().cmp(&other.branch[l].chr_id()) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        // Strands agree here. A sink downstream of a source on a
        // negative-strand branch has a lower position, hence the flipped
        // comparison.
        for l in 0..2 {
            let ord = if self.branch[l].is_positive_strand() {
                self.branch[l].position().cmp(&other.branch[l].position())
            } else {
                other.branch[l].position().cmp(&self.branch[l].position())
            };
            match ord {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        Ordering::Equal
    }
}

impl PartialOrd for Fork {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Minimum of the two branches' position spans between two forks.
pub fn chain_length(u: &Fork, v: &Fork) -> i64 {
    let span0 = (u.branch(0).position() - v.branch(0).position()).abs();
    let span1 = (u.branch(1).position() - v.branch(1).position()).abs();
    span0.min(span1)
}

/// Classifies the bubble pairs of one vertex into source and sink forks.
///
/// A pair diverging here (forward bubble without a backward one) is a
/// source; a pair converging here is a sink. Every fork has a
/// reverse-complement twin; keeping only forks with at least one
/// positive-strand branch keeps one copy of all-negative twins.
pub fn collect_forks(
    instances: &[Instance],
    forward: &BubbledBranches,
    backward: &BubbledBranches,
    sources: &mut Vec<Fork>,
    sinks: &mut Vec<Fork>,
) {
    for (j, bubbled) in forward.iter().enumerate() {
        for &k in bubbled {
            if !backward[j].contains(&k)
                && (instances[j].is_positive_strand() || instances[k].is_positive_strand())
            {
                sources.push(Fork::new(instances[j], instances[k]));
            }
        }
    }

    for (j, bubbled) in backward.iter().enumerate() {
        for &k in bubbled {
            if !forward[j].contains(&k)
                && (instances[j].is_positive_strand() || instances[k].is_positive_strand())
            {
                sinks.push(Fork::new(instances[j], instances[k]));
            }
        }
    }
}
