//! Readers for the canonical input tables.
//!
//! Tab-separated with a fixed header contract; extra columns are ignored,
//! missing required columns fail fast naming the file and column.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use crate::io::{open_maybe_gz, resolve_table};
use crate::schema::{Label, PeptideMetaRow, ProteinRow, QuantRow, QueryRow, SecRow};

pub fn read_proteins(dir: &Path) -> Result<Vec<ProteinRow>> {
    let table = Table::load(dir, "protein", &["protein_id", "protein_name", "protein_mw"])?;
    table.rows(|line| {
        Ok(ProteinRow {
            protein_id: line.field(0)?.to_string(),
            protein_name: line.field(1)?.to_string(),
            protein_mw: line.parse_f64(2)?,
        })
    })
}

pub fn read_sec(dir: &Path) -> Result<Vec<SecRow>> {
    let table = Table::load(
        dir,
        "sec",
        &["run_id", "sec_id", "sec_mw", "condition_id", "replicate_id"],
    )?;
    table.rows(|line| {
        Ok(SecRow {
            run_id: line.field(0)?.to_string(),
            sec_id: line.parse_u32(1)?,
            sec_mw: line.parse_f64(2)?,
            condition_id: line.field(3)?.to_string(),
            replicate_id: line.field(4)?.to_string(),
        })
    })
}

pub fn read_quantification(dir: &Path) -> Result<Vec<QuantRow>> {
    let table = Table::load(
        dir,
        "quantification",
        &["run_id", "protein_id", "peptide_id", "peptide_intensity"],
    )?;
    table.rows(|line| {
        Ok(QuantRow {
            run_id: line.field(0)?.to_string(),
            protein_id: line.field(1)?.to_string(),
            peptide_id: line.field(2)?.to_string(),
            peptide_intensity: line.parse_f64(3)?,
        })
    })
}

pub fn read_peptide_meta(dir: &Path) -> Result<Vec<PeptideMetaRow>> {
    let table = Table::load(dir, "peptide_meta", &["peptide_id", "peptide_rank"])?;
    table.rows(|line| {
        Ok(PeptideMetaRow {
            peptide_id: line.field(0)?.to_string(),
            peptide_rank: line.parse_u32(1)?,
        })
    })
}

pub fn read_queries(dir: &Path) -> Result<Vec<QueryRow>> {
    let table = Table::load(dir, "query", &["bait_id", "prey_id", "decoy"])?;
    table.rows(|line| {
        Ok(QueryRow {
            bait_id: line.field(0)?.to_string(),
            prey_id: line.field(1)?.to_string(),
            label: Label::from_flag(line.parse_u32(2)? as u8),
        })
    })
}

pub(crate) struct Table {
    path: PathBuf,
    // index of each required column in file order
    columns: Vec<usize>,
    lines: Vec<String>,
}

impl Table {
    pub(crate) fn load(dir: &Path, stem: &str, required: &[&str]) -> Result<Self> {
        let path = resolve_table(dir, stem)?;
        let table = Self::open(&path, required)?;
        // an empty canonical table would only yield a misleading empty result
        if table.is_empty() {
            bail!("{} contains no data rows", table.path().display());
        }
        Ok(table)
    }

    pub(crate) fn open(path: &Path, required: &[&str]) -> Result<Self> {
        let reader = BufReader::new(open_maybe_gz(path)?);
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line.with_context(|| format!("failed to read {}", path.display()))?;
            if !line.is_empty() {
                lines.push(line);
            }
        }
        let Some(header) = lines.first() else {
            bail!("{} is empty", path.display());
        };

        let names: Vec<&str> = header.split('\t').collect();
        let mut columns = Vec::with_capacity(required.len());
        for name in required {
            let Some(idx) = names.iter().position(|n| n == name) else {
                bail!("{} is missing required column '{}'", path.display(), name);
            };
            columns.push(idx);
        }

        lines.remove(0);
        Ok(Self {
            path: path.to_path_buf(),
            columns,
            lines,
        })
    }

    pub(crate) fn rows<T>(&self, mut build: impl FnMut(&Line<'_>) -> Result<T>) -> Result<Vec<T>> {
        let mut rows = Vec::with_capacity(self.lines.len());
        for (offset, raw) in self.lines.iter().enumerate() {
            let line = Line {
                table: self,
                fields: raw.split('\t').collect(),
                number: offset + 2,
            };
            rows.push(build(&line)?);
        }
        Ok(rows)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

pub(crate) struct Line<'a> {
    table: &'a Table,
    fields: Vec<&'a str>,
    number: usize,
}

impl Line<'_> {
    pub(crate) fn field(&self, column: usize) -> Result<&str> {
        let idx = self.table.columns[column];
        self.fields.get(idx).copied().ok_or_else(|| {
            anyhow!(
                "{}: line {} has too few fields",
                self.table.path.display(),
                self.number
            )
        })
    }

    pub(crate) fn parse_f64(&self, column: usize) -> Result<f64> {
        let raw = self.field(column)?;
        raw.parse().map_err(|_| {
            anyhow!(
                "{}: line {}: '{}' is not a number",
                self.table.path.display(),
                self.number,
                raw
            )
        })
    }

    pub(crate) fn parse_u32(&self, column: usize) -> Result<u32> {
        let raw = self.field(column)?;
        raw.parse().map_err(|_| {
            anyhow!(
                "{}: line {}: '{}' is not an integer",
                self.table.path.display(),
                self.number,
                raw
            )
        })
    }
}
