use std::cmp::Ordering;

/// One placement of a collinear block on a chromosome.
///
/// The id is signed: blocks come in branch pairs sharing the same absolute
/// id, and the sign records the strand of the placement. Coordinates are
/// 0-based, half-open `[start, end)` on the forward strand of the
/// chromosome regardless of the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockInstance {
    id: i64,
    chr: usize,
    start: usize,
    end: usize,
}

impl BlockInstance {
    pub fn new(id: i64, chr: usize, start: usize, end: usize) -> Self {
        assert!(id != 0, "block id must be nonzero");
        assert!(start < end, "empty block interval: {}..{}", start, end);
        Self {
            id,
            chr,
            start,
            end,
        }
    }

    pub fn signed_block_id(&self) -> i64 {
        self.id
    }

    /// Absolute block id, shared by both placements of a pair.
    pub fn block_id(&self) -> i64 {
        self.id.abs()
    }

    pub fn sign(&self) -> i64 {
        self.id.signum()
    }

    pub fn is_forward(&self) -> bool {
        self.id > 0
    }

    pub fn chr_id(&self) -> usize {
        self.chr
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn length(&self) -> usize {
        self.end - self.start
    }

    /// 1-based inclusive start, as written to report files.
    pub fn conventional_start(&self) -> usize {
        self.start + 1
    }

    /// 1-based inclusive end, as written to report files.
    pub fn conventional_end(&self) -> usize {
        self.end
    }
}

/// Order by absolute block id, then chromosome, then start.
/// Groups the two placements of a pair next to each other.
pub fn compare_by_id(a: &BlockInstance, b: &BlockInstance) -> Ordering {
    match a.block_id().cmp(&b.block_id()) {
        Ordering::Equal => {}
        ord => return ord,
    }
    match a.chr_id().cmp(&b.chr_id()) {
        Ordering::Equal => {}
        ord => return ord,
    }
    a.start().cmp(&b.start())
}

/// Order by chromosome, then start, then end. Report file order.
pub fn compare_by_position(a: &BlockInstance, b: &BlockInstance) -> Ordering {
    match a.chr_id().cmp(&b.chr_id()) {
        Ordering::Equal => {}
        ord => return ord,
    }
    match a.start().cmp(&b.start()) {
        Ordering::Equal => {}
        ord => return ord,
    }
    a.end().cmp(&b.end())
}
