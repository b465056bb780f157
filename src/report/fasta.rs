//! Per-block FASTA emission.
//!
//! Each block id gets one file with one record per placement. Headers
//! describe the placement as `<desc>;<start>;<length>;<sign>;<chr_len>`,
//! where a negative-sign record reports its start on the reverse strand
//! and its sequence reverse-complemented.

use crate::common::{compare_by_id, BlockInstance};
use crate::graph::JunctionStorage;
use bio::alphabets::dna;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const LINE_WIDTH: usize = 80;

/// Writes one `<id>.fa` per block id into `directory`.
pub fn write_blocks_dir(
    storage: &JunctionStorage,
    blocks: &[BlockInstance],
    directory: &Path,
) -> io::Result<()> {
    let mut ordered = blocks.to_vec();
    ordered.sort_by(compare_by_id);

    let mut at = 0;
    while at < ordered.len() {
        let id = ordered[at].block_id();
        let group_end = ordered[at..]
            .iter()
            .position(|b| b.block_id() != id)
            .map_or(ordered.len(), |offset| at + offset);

        let file = File::create(directory.join(format!("{}.fa", id)))?;
        let mut writer = BufWriter::new(file);
        write_block_records(storage, &ordered[at..group_end], &mut writer)?;
        at = group_end;
    }
    Ok(())
}

/// Writes the records of one block id group.
pub fn write_block_records<W: Write>(
    storage: &JunctionStorage,
    group: &[BlockInstance],
    writer: &mut W,
) -> io::Result<()> {
    for (seq_index, block) in group.iter().enumerate() {
        let chr = block.chr_id();
        let chr_len = storage.chr_length(chr);
        let description = storage.chr_description(chr);
        let sequence = storage.chr_sequence(chr);
        let body = &sequence[block.start()..block.end()];

        if block.is_forward() {
            writeln!(
                writer,
                ">{}_{} {};{};{};+;{}",
                block.block_id(),
                seq_index,
                description,
                block.start(),
                block.length(),
                chr_len
            )?;
            write_wrapped(body, writer)?;
        } else {
            // Reverse-strand placements report coordinates from the
            // chromosome end.
            writeln!(
                writer,
                ">{}_{} {};{};{};-;{}",
                block.block_id(),
                seq_index,
                description,
                chr_len - block.end(),
                block.length(),
                chr_len
            )?;
            write_wrapped(&dna::revcomp(body), writer)?;
        }
    }
    Ok(())
}

fn write_wrapped<W: Write>(sequence: &[u8], writer: &mut W) -> io::Result<()> {
    for line in sequence.chunks(LINE_WIDTH) {
        writer.write_all(line)?;
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ChromosomeDef, JunctionDef};

    fn make_storage() -> JunctionStorage {
        let sequence: Vec<u8> = (0..200).map(|i| b"ACGT"[i % 4]).collect();
        JunctionStorage::new(
            4,
            vec![ChromosomeDef {
                description: "seq_a test".to_string(),
                sequence,
                junctions: vec![JunctionDef::new(1, 0)],
            }],
        )
    }

    #[test]
    fn test_forward_record() {
        let storage = make_storage();
        let blocks = [BlockInstance::new(1, 0, 0, 8)];
        let mut out = Vec::new();
        write_block_records(&storage, &blocks, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, ">1_0 seq_a test;0;8;+;200\nACGTACGT\n");
    }

    #[test]
    fn test_reverse_record_is_complemented() {
        let storage = make_storage();
        let blocks = [BlockInstance::new(-1, 0, 0, 8)];
        let mut out = Vec::new();
        write_block_records(&storage, &blocks, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        // start reported from the chromosome end: 200 - 8.
        assert_eq!(text, ">1_0 seq_a test;192;8;-;200\nACGTACGT\n");
    }

    #[test]
    fn test_long_record_wraps_at_80() {
        let storage = make_storage();
        let blocks = [BlockInstance::new(1, 0, 0, 200)];
        let mut out = Vec::new();
        write_block_records(&storage, &blocks, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].len(), 80);
        assert_eq!(lines[2].len(), 80);
        assert_eq!(lines[3].len(), 40);
    }

    #[test]
    fn test_one_file_per_block_id() {
        let storage = make_storage();
        let blocks = vec![
            BlockInstance::new(1, 0, 0, 8),
            BlockInstance::new(-1, 0, 20, 28),
            BlockInstance::new(2, 0, 40, 48),
        ];
        let dir = tempfile::tempdir().unwrap();
        write_blocks_dir(&storage, &blocks, dir.path()).unwrap();

        let first = std::fs::read_to_string(dir.path().join("1.fa")).unwrap();
        assert_eq!(first.matches('>').count(), 2);
        assert!(first.contains(">1_0 "));
        assert!(first.contains(">1_1 "));
        let second = std::fs::read_to_string(dir.path().join("2.fa")).unwrap();
        assert_eq!(second.matches('>').count(), 1);
    }
}
