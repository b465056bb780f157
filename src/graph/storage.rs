//! In-memory junction storage.
//!
//! Chromosomes carry a dense, position-ascending list of junction
//! occurrences. An occurrence is identified by a signed vertex id: `+v`
//! and `-v` name the two strands of the same junction. Instances are
//! cheap `Copy` descriptors (chromosome, index, strand, position) that
//! step along their chromosome through the storage; no pointer graph is
//! ever materialized.

use bio::alphabets::dna;
use std::cmp::Ordering;

/// One junction occurrence supplied to [`JunctionStorage::new`].
#[derive(Debug, Clone, Copy)]
pub struct JunctionDef {
    /// Signed vertex id; must be nonzero.
    pub vertex: i64,
    /// Forward-strand start of the junction k-mer.
    pub position: usize,
}

impl JunctionDef {
    pub fn new(vertex: i64, position: usize) -> Self {
        Self { vertex, position }
    }
}

/// One chromosome supplied to [`JunctionStorage::new`].
#[derive(Debug, Clone)]
pub struct ChromosomeDef {
    pub description: String,
    pub sequence: Vec<u8>,
    /// Occurrences in strictly ascending position order.
    pub junctions: Vec<JunctionDef>,
}

struct Chromosome {
    description: String,
    sequence: Vec<u8>,
    junctions: Vec<JunctionDef>,
}

/// A concrete occurrence of a vertex: chromosome, index into the
/// chromosome's junction list, strand, and strand-adjusted position.
///
/// The position is the k-mer start on the positive strand and the k-mer
/// end on the negative strand, so that walking an instance in its own
/// direction moves the position monotonically and block coordinates fall
/// out of plain position arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instance {
    chr: usize,
    index: usize,
    positive: bool,
    position: i64,
}

impl Instance {
    pub fn chr_id(&self) -> usize {
        self.chr
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_positive_strand(&self) -> bool {
        self.positive
    }

    pub fn position(&self) -> i64 {
        self.position
    }
}

impl Ord for Instance {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.chr.cmp(&other.chr) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match self.index.cmp(&other.index) {
            Ordering::Equal => {}
            ord => return ord,
        }
        self.positive.cmp(&other.positive)
    }
}

impl PartialOrd for Instance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Read-only junction graph over a set of chromosomes.
pub struct JunctionStorage {
    k: usize,
    chromosomes: Vec<Chromosome>,
    /// Indexed by absolute vertex id: (chromosome, junction index) of
    /// every occurrence, in chromosome-then-index order.
    occurrences: Vec<Vec<(u32, u32)>>,
}

impl JunctionStorage {
    /// Builds the storage, validating the junction lists. Out-of-range
    /// positions, zero vertex ids, and non-ascending positions are
    /// caller bugs and abort.
    pub fn new(k: usize, defs: Vec<ChromosomeDef>) -> Self {
        assert!(k > 0, "junction length must be positive");
        let mut max_vertex = 0i64;
        for (chr, def) in defs.iter().enumerate() {
            let mut prev: Option<usize> = None;
            for junction in &def.junctions {
                assert!(junction.vertex != 0, "zero vertex id on chromosome {}", chr);
                assert!(
                    junction.position + k <= def.sequence.len(),
                    "junction at {} overruns chromosome {} (length {})",
                    junction.position,
                    chr,
                    def.sequence.len()
                );
                if let Some(p) = prev {
                    assert!(
                        junction.position > p,
                        "junction positions must ascend on chromosome {}",
                        chr
                    );
                }
                prev = Some(junction.position);
                max_vertex = max_vertex.max(junction.vertex.abs());
            }
        }

        let mut occurrences = vec![Vec::new(); (max_vertex + 1) as usize];
        for (chr, def) in defs.iter().enumerate() {
            for (index, junction) in def.junctions.iter().enumerate() {
                occurrences[junction.vertex.unsigned_abs() as usize]
                    .push((chr as u32, index as u32));
            }
        }

        let chromosomes = defs
            .into_iter()
            .map(|def| Chromosome {
                description: def.description,
                sequence: def.sequence,
                junctions: def.junctions,
            })
            .collect();

        Self {
            k,
            chromosomes,
            occurrences,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Valid vertex ids are `[-V + 1, V - 1]` excluding zero, where `V`
    /// is the returned count.
    pub fn vertices_number(&self) -> i64 {
        self.occurrences.len() as i64
    }

    pub fn chr_number(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn chr_vertices_count(&self, chr: usize) -> usize {
        self.chromosomes[chr].junctions.len()
    }

    pub fn chr_sequence(&self, chr: usize) -> &[u8] {
        &self.chromosomes[chr].sequence
    }

    pub fn chr_description(&self, chr: usize) -> &str {
        &self.chromosomes[chr].description
    }

    pub fn chr_length(&self, chr: usize) -> usize {
        self.chromosomes[chr].sequence.len()
    }

    pub fn instances_count(&self, vertex: i64) -> usize {
        self.occurrences[vertex.unsigned_abs() as usize].len()
    }

    /// All instances of `vertex` across chromosomes, in chromosome and
    /// index order. An occurrence stored as `vertex` is seen on the
    /// positive strand, one stored as `-vertex` on the negative strand.
    pub fn instances(&self, vertex: i64) -> impl Iterator<Item = Instance> + '_ {
        assert!(vertex != 0, "zero is not a vertex id");
        self.occurrences[vertex.unsigned_abs() as usize]
            .iter()
            .map(move |&(chr, index)| {
                let chr = chr as usize;
                let index = index as usize;
                let stored = self.chromosomes[chr].junctions[index].vertex;
                self.make_instance(chr, index, stored == vertex)
            })
    }

    fn make_instance(&self, chr: usize, index: usize, positive: bool) -> Instance {
        let start = self.chromosomes[chr].junctions[index].position as i64;
        let position = if positive {
            start
        } else {
            start + self.k as i64
        };
        Instance {
            chr,
            index,
            positive,
            position,
        }
    }

    /// Vertex id of the junction under `inst`, as seen from the
    /// instance's strand.
    pub fn vertex_id(&self, inst: Instance) -> i64 {
        let stored = self.chromosomes[inst.chr].junctions[inst.index].vertex;
        if inst.positive {
            stored
        } else {
            -stored
        }
    }

    /// Steps one junction forward in the instance's own direction.
    /// Returns None past either chromosome end.
    pub fn next_instance(&self, inst: Instance) -> Option<Instance> {
        if inst.positive {
            if inst.index + 1 < self.chromosomes[inst.chr].junctions.len() {
                return Some(self.make_instance(inst.chr, inst.index + 1, true));
            }
            None
        } else {
            inst.index
                .checked_sub(1)
                .map(|index| self.make_instance(inst.chr, index, false))
        }
    }

    /// Steps one junction backward in the instance's own direction.
    pub fn prev_instance(&self, inst: Instance) -> Option<Instance> {
        if inst.positive {
            inst.index
                .checked_sub(1)
                .map(|index| self.make_instance(inst.chr, index, true))
        } else {
            if inst.index + 1 < self.chromosomes[inst.chr].junctions.len() {
                return Some(self.make_instance(inst.chr, inst.index + 1, false));
            }
            None
        }
    }

    /// Character labeling the instance's outgoing edge. Only meaningful
    /// when the forward neighbor exists.
    pub fn out_char(&self, inst: Instance) -> u8 {
        let start = self.chromosomes[inst.chr].junctions[inst.index].position;
        let sequence = &self.chromosomes[inst.chr].sequence;
        if inst.positive {
            sequence[start + self.k]
        } else {
            assert!(start > 0, "no incoming base before position 0");
            dna::complement(sequence[start - 1])
        }
    }
}
