//! GFF3 listing of block coordinates.

use crate::common::{compare_by_position, BlockInstance};
use crate::graph::JunctionStorage;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const SOURCE_FIELD: &str = "locsyn";
const FEATURE_FIELD: &str = "collinear_block";

/// Writes one GFF3 record per block instance, ordered by chromosome and
/// start. Coordinates are 1-based inclusive; the strand column carries
/// the block sign.
pub fn write_gff<W: Write>(
    storage: &JunctionStorage,
    blocks: &[BlockInstance],
    writer: &mut W,
) -> io::Result<()> {
    writeln!(writer, "##gff-version 3")?;

    let mut ordered = blocks.to_vec();
    ordered.sort_by(compare_by_position);

    for block in &ordered {
        let description = storage.chr_description(block.chr_id());
        let seqid = description.split_whitespace().next().unwrap_or("unknown");
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t.\t{}\t.\tID={}",
            seqid,
            SOURCE_FIELD,
            FEATURE_FIELD,
            block.conventional_start(),
            block.conventional_end(),
            if block.is_forward() { '+' } else { '-' },
            block.block_id()
        )?;
    }
    Ok(())
}

/// Writes the GFF listing to `path`.
pub fn write_to_file(
    storage: &JunctionStorage,
    blocks: &[BlockInstance],
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_gff(storage, blocks, &mut writer)
}
