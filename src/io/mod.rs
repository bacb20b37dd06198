use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;

use crate::schema::summary::RunSummaryV1;

pub mod results;
pub mod summary;
pub mod tables;

pub fn write_json(path: &Path, summary: &RunSummaryV1) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

pub(crate) fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let decoder = GzDecoder::new(file);
        Ok(Box::new(decoder))
    } else {
        Ok(Box::new(file))
    }
}

/// Resolve `<dir>/<stem>.tsv` or its gzipped sibling. A missing canonical
/// table is a schema precondition failure, reported before any stage output
/// is produced.
pub(crate) fn resolve_table(dir: &Path, stem: &str) -> Result<PathBuf> {
    let plain = dir.join(format!("{}.tsv", stem));
    if plain.exists() {
        return Ok(plain);
    }
    let gz = dir.join(format!("{}.tsv.gz", stem));
    if gz.exists() {
        return Ok(gz);
    }
    bail!(
        "required table '{}' not found in {} (expected {}.tsv or {}.tsv.gz)",
        stem,
        dir.display(),
        stem,
        stem
    );
}
