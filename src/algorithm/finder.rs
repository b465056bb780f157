//! Block discovery: parallel fork enumeration followed by pairing.
//!
//! Workers sweep the vertex range, classify bubble pairs into source and
//! sink forks, and merge them into two shared lists. A single-threaded
//! pass then matches every source to its nearest downstream sink and
//! emits a signed block instance per branch.

use crate::algorithm::bubbles::{
    bubbled_branches_backward, bubbled_branches_forward, BubbleScratch, BubbledBranches,
};
use crate::algorithm::fork::{chain_length, collect_forks, Fork};
use crate::common::BlockInstance;
use crate::config::FinderParams;
use crate::graph::{Instance, JunctionStorage};
use anyhow::{Context, Result};
use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Per-worker buffers, reused across the worker's vertex range.
#[derive(Default)]
struct VertexScratch {
    instances: Vec<Instance>,
    forward: BubbledBranches,
    backward: BubbledBranches,
    bubble: BubbleScratch,
    sources: Vec<Fork>,
    sinks: Vec<Fork>,
}

pub struct BlocksFinder<'a> {
    storage: &'a JunctionStorage,
    params: FinderParams,
    sources: Vec<Fork>,
    sinks: Vec<Fork>,
    blocks: Vec<BlockInstance>,
    blocks_found: i64,
}

impl<'a> BlocksFinder<'a> {
    /// The junction length of `params` must match the one the storage
    /// was built with; a mismatch is a caller bug.
    pub fn new(storage: &'a JunctionStorage, params: FinderParams) -> Self {
        assert_eq!(
            params.k,
            storage.k(),
            "junction length disagrees with the storage"
        );
        Self {
            storage,
            params,
            sources: Vec::new(),
            sinks: Vec::new(),
            blocks: Vec::new(),
            blocks_found: 0,
        }
    }

    /// Runs the full discovery pipeline.
    pub fn find_blocks(&mut self) -> Result<()> {
        self.sources.clear();
        self.sinks.clear();
        self.blocks.clear();
        self.blocks_found = 0;

        let vertices = self.vertex_list();
        self.enumerate_forks(&vertices)?;
        self.pair_blocks();
        Ok(())
    }

    pub fn blocks(&self) -> &[BlockInstance] {
        &self.blocks
    }

    pub fn blocks_found(&self) -> i64 {
        self.blocks_found
    }

    /// Every valid vertex id with at least one positive-strand instance.
    /// All-negative id classes are covered by their opposite id, so
    /// visiting them would only re-derive reverse-complement twins.
    fn vertex_list(&self) -> Vec<i64> {
        let bound = self.storage.vertices_number();
        let mut vertices = Vec::new();
        for vertex in (1 - bound)..bound {
            if vertex == 0 {
                continue;
            }
            if self
                .storage
                .instances(vertex)
                .any(|inst| inst.is_positive_strand())
            {
                vertices.push(vertex);
            }
        }
        vertices
    }

    fn enumerate_forks(&mut self, vertices: &[i64]) -> Result<()> {
        let sources = Mutex::new(Vec::new());
        let sinks = Mutex::new(Vec::new());
        let progress = AtomicUsize::new(0);

        let storage = self.storage;
        let max_branch_size = self.params.max_branch_size;
        let total = vertices.len();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.params.threads)
            .build()
            .context("building the enumeration thread pool")?;

        pool.install(|| {
            vertices
                .par_iter()
                .for_each_init(VertexScratch::default, |scratch, &vertex| {
                    let done = progress.fetch_add(1, Ordering::Relaxed);
                    if done % 10_000 == 0 {
                        debug!("{} / {} vertices processed", done, total);
                    }

                    scratch.instances.clear();
                    scratch.instances.extend(storage.instances(vertex));
                    if scratch.instances.len() < 2 {
                        return;
                    }

                    bubbled_branches_forward(
                        storage,
                        &scratch.instances,
                        max_branch_size,
                        &mut scratch.bubble,
                        &mut scratch.forward,
                    );
                    bubbled_branches_backward(
                        storage,
                        &scratch.instances,
                        max_branch_size,
                        &mut scratch.bubble,
                        &mut scratch.backward,
                    );

                    scratch.sources.clear();
                    scratch.sinks.clear();
                    collect_forks(
                        &scratch.instances,
                        &scratch.forward,
                        &scratch.backward,
                        &mut scratch.sources,
                        &mut scratch.sinks,
                    );

                    if !scratch.sources.is_empty() {
                        sources.lock().unwrap().append(&mut scratch.sources);
                    }
                    if !scratch.sinks.is_empty() {
                        sinks.lock().unwrap().append(&mut scratch.sinks);
                    }
                });
        });

        self.sources = sources.into_inner().unwrap();
        self.sinks = sinks.into_inner().unwrap();
        debug!(
            "{} source forks, {} sink forks",
            self.sources.len(),
            self.sinks.len()
        );
        Ok(())
    }

    /// Matches each source with its minimum covering sink and emits a
    /// block pair when the chain is long enough.
    fn pair_blocks(&mut self) {
        self.sinks.sort_unstable();
        // Append order varies with work stealing; sorting the sources
        // makes pairing order, ids, and twin selection reproducible.
        self.sources.sort_unstable();

        let k = self.storage.k() as i64;
        let mut emitted: FxHashSet<[(usize, usize, usize); 2]> = FxHashSet::default();

        for source in &self.sources {
            let at = self.sinks.partition_point(|sink| sink < source);
            if at == self.sinks.len() {
                continue;
            }
            let sink = &self.sinks[at];

            // A differing strand class means the search ran past the last
            // sink compatible with this source.
            if (0..2).any(|l| {
                source.branch(l).is_positive_strand() != sink.branch(l).is_positive_strand()
            }) {
                continue;
            }
            if (0..2).any(|l| source.branch(l).chr_id() != sink.branch(l).chr_id()) {
                continue;
            }
            // The sink must lie downstream of the source on both
            // branches, walking each branch in its own direction.
            if !(0..2).all(|l| {
                if sink.branch(l).is_positive_strand() {
                    sink.branch(l).position() > source.branch(l).position()
                } else {
                    sink.branch(l).position() < source.branch(l).position()
                }
            }) {
                continue;
            }
            if chain_length(source, sink) < self.params.min_block_size {
                continue;
            }

            let mut intervals = [(0i64, 0usize, 0usize, 0usize); 2];
            for (l, interval) in intervals.iter_mut().enumerate() {
                let from = source.branch(l);
                let to = sink.branch(l);
                *interval = if to.is_positive_strand() {
                    (
                        1,
                        to.chr_id(),
                        from.position() as usize,
                        (to.position() + k) as usize,
                    )
                } else {
                    (
                        -1,
                        to.chr_id(),
                        (to.position() - k) as usize,
                        from.position() as usize,
                    )
                };
            }

            // A mixed-strand fork and its reverse-complement twin both
            // carry a positive branch and both survive enumeration; they
            // produce the same interval pair with flipped signs. Keep the
            // first.
            let mut key = [
                (intervals[0].1, intervals[0].2, intervals[0].3),
                (intervals[1].1, intervals[1].2, intervals[1].3),
            ];
            key.sort_unstable();
            if !emitted.insert(key) {
                continue;
            }

            self.blocks_found += 1;
            for &(sign, chr, start, end) in &intervals {
                debug_assert!(end <= self.storage.chr_length(chr));
                self.blocks
                    .push(BlockInstance::new(sign * self.blocks_found, chr, start, end));
            }
        }
    }
}
