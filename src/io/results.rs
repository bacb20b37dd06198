//! Writers (and reloaders) for the stage output tables.
//!
//! One TSV per table, replaced wholesale on every run. A missing result
//! table on reload is how an interrupted or out-of-order run is detected.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::io::tables::Table;
use crate::schema::{
    DifferentialRow, Entity, FeatureRow, Label, MonomerRow, QuantEntry, ScoredRow,
};

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub fn write_monomers(path: &Path, rows: &[MonomerRow]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "protein_id\tcondition_id\treplicate_id\tmonomer_sec_id")?;
    for r in rows {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            r.protein_id, r.condition_id, r.replicate_id, r.monomer_sec_id
        )?;
    }
    Ok(())
}

const FEATURE_COLUMNS: &str = "bait_id\tprey_id\tdecoy\tcondition_id\treplicate_id\tmic\ttic\t\
                               score\tbait_peptides\tprey_peptides\toverlap\tapex_sec_id\t\
                               bait_apex_sec_id\tprey_apex_sec_id\tsec_lag";

fn write_feature_fields(w: &mut impl Write, f: &FeatureRow) -> Result<()> {
    write!(
        w,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        f.bait_id,
        f.prey_id,
        f.label.as_flag(),
        f.condition_id,
        f.replicate_id,
        f.mic,
        f.tic,
        f.score,
        f.bait_peptides,
        f.prey_peptides,
        f.overlap,
        f.apex_sec_id,
        f.bait_apex_sec_id,
        f.prey_apex_sec_id,
        f.sec_lag()
    )?;
    Ok(())
}

pub fn write_features(path: &Path, rows: &[FeatureRow]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}", FEATURE_COLUMNS)?;
    for f in rows {
        write_feature_fields(&mut w, f)?;
        writeln!(w)?;
    }
    Ok(())
}

pub fn write_feature_scored(path: &Path, rows: &[ScoredRow]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}\tmass_ratio\tpvalue\tqvalue\tpep", FEATURE_COLUMNS)?;
    for r in rows {
        write_feature_fields(&mut w, &r.feature)?;
        writeln!(w, "\t{}\t{}\t{}\t{}", r.mass_ratio, r.pvalue, r.qvalue, r.pep)?;
    }
    Ok(())
}

pub fn write_complex_qm(path: &Path, rows: &[QuantEntry]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "entity_id\tcondition_id\treplicate_id\tvalue")?;
    for r in rows {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            r.entity.id(),
            r.condition_id,
            r.replicate_id,
            r.value
        )?;
    }
    Ok(())
}

pub fn write_edges(
    path: &Path,
    rows: &[DifferentialRow],
    with_log2fc: bool,
    with_level: bool,
) -> Result<()> {
    let mut w = create(path)?;
    write!(
        w,
        "condition_1\tcondition_2\tbait_id\tprey_id\tstatistic\tpvalue\tqvalue"
    )?;
    if with_log2fc {
        write!(w, "\tlog2fc")?;
    }
    if with_level {
        write!(w, "\tlevel")?;
    }
    writeln!(w)?;

    for r in rows {
        let Entity::Edge { bait_id, prey_id } = &r.entity else {
            bail!("node entity in edge table");
        };
        write!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.condition_1, r.condition_2, bait_id, prey_id, r.statistic, r.pvalue, r.qvalue
        )?;
        if with_log2fc {
            write!(w, "\t{}", r.log2fc.unwrap_or(0.0))?;
        }
        if with_level {
            write!(w, "\t{}", r.level.as_deref().unwrap_or(""))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn write_nodes(path: &Path, rows: &[DifferentialRow], with_level: bool) -> Result<()> {
    let mut w = create(path)?;
    write!(w, "condition_1\tcondition_2\tbait_id\tstatistic\tpvalue\tqvalue")?;
    if with_level {
        write!(w, "\tlevel")?;
    }
    writeln!(w)?;

    for r in rows {
        let Entity::Node { protein_id } = &r.entity else {
            bail!("edge entity in node table");
        };
        write!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            r.condition_1, r.condition_2, protein_id, r.statistic, r.pvalue, r.qvalue
        )?;
        if with_level {
            write!(w, "\t{}", r.level.as_deref().unwrap_or(""))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn read_monomers(path: &Path) -> Result<Vec<MonomerRow>> {
    if !path.exists() {
        bail!(
            "{} not found; run the score stage before quantify",
            path.display()
        );
    }
    let table = Table::open(
        path,
        &["protein_id", "condition_id", "replicate_id", "monomer_sec_id"],
    )?;
    table.rows(|line| {
        Ok(MonomerRow {
            protein_id: line.field(0)?.to_string(),
            condition_id: line.field(1)?.to_string(),
            replicate_id: line.field(2)?.to_string(),
            monomer_sec_id: line.parse_u32(3)?,
        })
    })
}

pub fn read_feature_scored(path: &Path) -> Result<Vec<ScoredRow>> {
    if !path.exists() {
        bail!(
            "{} not found; run the score stage before quantify",
            path.display()
        );
    }
    let table = Table::open(
        path,
        &[
            "bait_id",
            "prey_id",
            "decoy",
            "condition_id",
            "replicate_id",
            "mic",
            "tic",
            "score",
            "bait_peptides",
            "prey_peptides",
            "overlap",
            "apex_sec_id",
            "bait_apex_sec_id",
            "prey_apex_sec_id",
            "mass_ratio",
            "pvalue",
            "qvalue",
            "pep",
        ],
    )?;
    table.rows(|line| {
        Ok(ScoredRow {
            feature: FeatureRow {
                bait_id: line.field(0)?.to_string(),
                prey_id: line.field(1)?.to_string(),
                label: Label::from_flag(line.parse_u32(2)? as u8),
                condition_id: line.field(3)?.to_string(),
                replicate_id: line.field(4)?.to_string(),
                mic: line.parse_f64(5)?,
                tic: line.parse_f64(6)?,
                score: line.parse_f64(7)?,
                bait_peptides: line.parse_u32(8)? as usize,
                prey_peptides: line.parse_u32(9)? as usize,
                overlap: line.parse_u32(10)? as usize,
                apex_sec_id: line.parse_u32(11)?,
                bait_apex_sec_id: line.parse_u32(12)?,
                prey_apex_sec_id: line.parse_u32(13)?,
            },
            mass_ratio: line.parse_f64(14)?,
            pvalue: line.parse_f64(15)?,
            qvalue: line.parse_f64(16)?,
            pep: line.parse_f64(17)?,
        })
    })
}
