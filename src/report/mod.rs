//! Output generation for discovered blocks.

pub mod coverage;
pub mod fasta;
pub mod gff;

use crate::common::BlockInstance;
use crate::graph::JunctionStorage;
use anyhow::{Context, Result};
use log::info;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::Path;

/// Writes `blocks_coords.gff` into `out_dir`, logs the run summary, and
/// when `gen_seq` is set also writes one FASTA file per block id under
/// `out_dir/blocks`.
pub fn generate_output(
    storage: &JunctionStorage,
    blocks: &[BlockInstance],
    out_dir: &Path,
    gen_seq: bool,
) -> Result<()> {
    let ids: FxHashSet<i64> = blocks.iter().map(|b| b.block_id()).collect();
    info!("Blocks found: {}", ids.len());
    info!("Coverage: {}", coverage::coverage(storage, blocks));

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let coords = out_dir.join("blocks_coords.gff");
    gff::write_to_file(storage, blocks, &coords)
        .with_context(|| format!("writing {}", coords.display()))?;

    if gen_seq {
        let blocks_dir = out_dir.join("blocks");
        fs::create_dir_all(&blocks_dir)
            .with_context(|| format!("creating {}", blocks_dir.display()))?;
        fasta::write_blocks_dir(storage, blocks, &blocks_dir)
            .with_context(|| format!("writing block sequences in {}", blocks_dir.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ChromosomeDef, JunctionDef};

    fn make_storage() -> JunctionStorage {
        JunctionStorage::new(
            4,
            vec![ChromosomeDef {
                description: "seq_a".to_string(),
                sequence: vec![b'A'; 100],
                junctions: vec![JunctionDef::new(1, 0)],
            }],
        )
    }

    #[test]
    fn test_generate_output_writes_coords() {
        let storage = make_storage();
        let blocks = vec![BlockInstance::new(1, 0, 0, 40)];
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run");

        generate_output(&storage, &blocks, &out, false).unwrap();
        let coords = std::fs::read_to_string(out.join("blocks_coords.gff")).unwrap();
        assert!(coords.starts_with("##gff-version 3"));
        assert!(coords.contains("seq_a"));
        assert!(!out.join("blocks").exists());
    }

    #[test]
    fn test_generate_output_with_sequences() {
        let storage = make_storage();
        let blocks = vec![BlockInstance::new(1, 0, 0, 40)];
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run");

        generate_output(&storage, &blocks, &out, true).unwrap();
        assert!(out.join("blocks").join("1.fa").exists());
    }
}
