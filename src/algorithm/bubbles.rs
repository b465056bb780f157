//! Bubble enumeration around a vertex.
//!
//! Given the instances of one vertex, finds every pair that re-converges
//! within a bounded branch distance in a chosen direction. Two instances
//! share a bubble when their immediate next edges carry the same
//! character, or when their walks meet at a common vertex before the
//! position span exceeds the budget.

use crate::graph::{Instance, JunctionStorage};
use rustc_hash::FxHashMap;

/// `out[j]` lists every `k > j` such that instances `j` and `k` share a
/// bubble.
pub type BubbledBranches = Vec<Vec<usize>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self, storage: &JunctionStorage, inst: Instance) -> Option<Instance> {
        match self {
            Direction::Forward => storage.next_instance(inst),
            Direction::Backward => storage.prev_instance(inst),
        }
    }
}

/// Reusable per-worker buffers for one enumeration call.
#[derive(Default)]
pub struct BubbleScratch {
    parallel_edge: [Vec<usize>; 5],
    visit: FxHashMap<i64, Vec<usize>>,
}

impl BubbleScratch {
    fn clear(&mut self) {
        for bucket in &mut self.parallel_edge {
            bucket.clear();
        }
        self.visit.clear();
    }
}

/// Bucket index for an edge character: A, C, G, T, then everything else.
fn char_bucket(ch: u8) -> usize {
    match ch.to_ascii_uppercase() {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        b'T' => 3,
        _ => 4,
    }
}

pub fn bubbled_branches_forward(
    storage: &JunctionStorage,
    instances: &[Instance],
    max_branch_size: i64,
    scratch: &mut BubbleScratch,
    out: &mut BubbledBranches,
) {
    bubbled_branches(
        storage,
        instances,
        max_branch_size,
        Direction::Forward,
        scratch,
        out,
    );
}

pub fn bubbled_branches_backward(
    storage: &JunctionStorage,
    instances: &[Instance],
    max_branch_size: i64,
    scratch: &mut BubbleScratch,
    out: &mut BubbledBranches,
) {
    bubbled_branches(
        storage,
        instances,
        max_branch_size,
        Direction::Backward,
        scratch,
        out,
    );
}

fn bubbled_branches(
    storage: &JunctionStorage,
    instances: &[Instance],
    max_branch_size: i64,
    direction: Direction,
    scratch: &mut BubbleScratch,
    out: &mut BubbledBranches,
) {
    scratch.clear();
    out.clear();
    out.resize(instances.len(), Vec::new());

    for (branch, &inst) in instances.iter().enumerate() {
        // The parallel-edge character: the outgoing label going forward,
        // the predecessor's outgoing label going backward.
        match direction {
            Direction::Forward => {
                if storage.next_instance(inst).is_some() {
                    scratch.parallel_edge[char_bucket(storage.out_char(inst))].push(branch);
                }
            }
            Direction::Backward => {
                if let Some(prev) = storage.prev_instance(inst) {
                    scratch.parallel_edge[char_bucket(storage.out_char(prev))].push(branch);
                }
            }
        }

        let start = inst.position();
        let mut walk = direction.step(storage, inst);
        while let Some(now) = walk {
            if (start - now.position()).abs() > max_branch_size {
                break;
            }
            scratch
                .visit
                .entry(storage.vertex_id(now))
                .or_default()
                .push(branch);
            walk = direction.step(storage, now);
        }
    }

    for bucket in &scratch.parallel_edge {
        record_pairs(bucket, out);
    }

    for bucket in scratch.visit.values_mut() {
        bucket.sort_unstable();
        bucket.dedup();
        record_pairs(bucket, out);
    }
}

/// Marks every ascending pair of an index bucket, skipping pairs already
/// present.
fn record_pairs(bucket: &[usize], out: &mut BubbledBranches) {
    for (i, &small) in bucket.iter().enumerate() {
        for &large in &bucket[i + 1..] {
            if !out[small].contains(&large) {
                out[small].push(large);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ChromosomeDef, JunctionDef};

    fn two_branch_storage(divergent: bool, reconverge_at: usize) -> JunctionStorage {
        // Two chromosomes carrying vertices 1 and 2; chromosome 1
        // optionally diverges right after vertex 1 and reconverges at
        // vertex 2.
        let k = 4;
        let mut seq0: Vec<u8> = b"AAAACAAAACAAAA".to_vec();
        seq0.resize(reconverge_at + k + 10, b'A');
        let mut seq1 = seq0.clone();
        if divergent {
            seq1[k] = b'G';
        }
        JunctionStorage::new(
            k,
            vec![
                ChromosomeDef {
                    description: "chr0".to_string(),
                    sequence: seq0,
                    junctions: vec![JunctionDef::new(1, 0), JunctionDef::new(2, reconverge_at)],
                },
                ChromosomeDef {
                    description: "chr1".to_string(),
                    sequence: seq1,
                    junctions: vec![JunctionDef::new(1, 0), JunctionDef::new(2, reconverge_at)],
                },
            ],
        )
    }

    fn forward(storage: &JunctionStorage, max_branch_size: i64) -> BubbledBranches {
        let instances: Vec<Instance> = storage.instances(1).collect();
        let mut scratch = BubbleScratch::default();
        let mut out = BubbledBranches::new();
        bubbled_branches_forward(storage, &instances, max_branch_size, &mut scratch, &mut out);
        out
    }

    #[test]
    fn test_parallel_edge_bubble() {
        // Same outgoing character on both branches: bubble regardless of
        // the walk budget.
        let storage = two_branch_storage(false, 10);
        let bubbles = forward(&storage, 0);
        assert_eq!(bubbles[0], vec![1]);
        assert!(bubbles[1].is_empty());
    }

    #[test]
    fn test_visit_bubble_within_budget() {
        // Divergent next characters, reconverging at distance 10.
        let storage = two_branch_storage(true, 10);
        assert!(forward(&storage, 0)[0].is_empty());
        assert_eq!(forward(&storage, 10)[0], vec![1]);
    }

    #[test]
    fn test_visit_bubble_beyond_budget() {
        let storage = two_branch_storage(true, 50);
        assert!(forward(&storage, 49)[0].is_empty());
        assert_eq!(forward(&storage, 50)[0], vec![1]);
    }

    #[test]
    fn test_backward_mirrors_forward() {
        let storage = two_branch_storage(false, 10);
        let instances: Vec<Instance> = storage.instances(2).collect();
        let mut scratch = BubbleScratch::default();
        let mut out = BubbledBranches::new();
        bubbled_branches_backward(&storage, &instances, 0, &mut scratch, &mut out);
        // Incoming edges carry the same character on both branches.
        assert_eq!(out[0], vec![1]);
    }

    #[test]
    fn test_single_instance_no_pairs() {
        let storage = two_branch_storage(false, 10);
        let instances: Vec<Instance> = storage.instances(1).take(1).collect();
        let mut scratch = BubbleScratch::default();
        let mut out = BubbledBranches::new();
        bubbled_branches_forward(&storage, &instances, 100, &mut scratch, &mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_empty());
    }

    #[test]
    fn test_char_bucket_groups_unknown_bases() {
        assert_eq!(char_bucket(b'a'), 0);
        assert_eq!(char_bucket(b'T'), 3);
        assert_eq!(char_bucket(b'N'), 4);
        assert_eq!(char_bucket(b'n'), 4);
    }
}
