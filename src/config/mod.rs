//! Run parameters for the block finder.

/// Parameters controlling block discovery.
#[derive(Debug, Clone, Copy)]
pub struct FinderParams {
    /// Junction (k-mer) length in bases. Must match the length the
    /// junction storage was built with.
    pub k: usize,
    /// Minimum chain length between a source and its sink for a block
    /// pair to be emitted.
    pub min_block_size: i64,
    /// Maximum position span walked when looking for a bubble
    /// reconvergence.
    pub max_branch_size: i64,
    /// Maximum flanking region allowed around a block. Reserved for
    /// flank trimming.
    pub max_flanking_size: i64,
    /// Worker threads for the enumeration phase.
    pub threads: usize,
}

impl Default for FinderParams {
    fn default() -> Self {
        Self {
            k: 25,
            min_block_size: 50,
            max_branch_size: 200,
            max_flanking_size: 200,
            threads: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = FinderParams::default();
        assert_eq!(params.k, 25);
        assert_eq!(params.min_block_size, 50);
        assert_eq!(params.max_branch_size, 200);
        assert_eq!(params.threads, 1);
    }
}
