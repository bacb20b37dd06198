use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::profile::{Calibration, ProfileIndex};
use crate::schema::summary::{ParamsV1, RunSummaryV1};
use crate::schema::{
    DifferentialTables, FeatureRow, MonomerRow, PeptideMetaRow, ProteinRow, QuantEntry, QuantRow,
    QueryRow, ScoredRow, SecRow,
};

/// Scoring and filtering parameters, validated before any stage runs.
#[derive(Debug, Clone)]
pub struct ScoreParams {
    pub complex_threshold_factor: f64,
    pub minimum_peptides: usize,
    pub maximum_peptides: usize,
    pub minimum_overlap: usize,
    pub minimum_mass_ratio: f64,
    pub maximum_sec_lag: f64,
    pub chunk_size: usize,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            complex_threshold_factor: 2.0,
            minimum_peptides: 4,
            maximum_peptides: 4,
            minimum_overlap: 5,
            minimum_mass_ratio: 0.2,
            maximum_sec_lag: 2.0,
            chunk_size: 50_000,
        }
    }
}

impl ScoreParams {
    pub fn validate(&self) -> Result<()> {
        if self.complex_threshold_factor < 1.0 {
            bail!(
                "complex_threshold_factor must be >= 1.0, got {}",
                self.complex_threshold_factor
            );
        }
        if self.minimum_peptides == 0 {
            bail!("minimum_peptides must be at least 1");
        }
        if self.minimum_peptides > self.maximum_peptides {
            bail!(
                "minimum_peptides ({}) exceeds maximum_peptides ({})",
                self.minimum_peptides,
                self.maximum_peptides
            );
        }
        if self.minimum_overlap == 0 {
            bail!("minimum_overlap must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.minimum_mass_ratio) {
            bail!(
                "minimum_mass_ratio must be within [0, 1], got {}",
                self.minimum_mass_ratio
            );
        }
        if self.maximum_sec_lag < 0.0 {
            bail!("maximum_sec_lag must be non-negative, got {}", self.maximum_sec_lag);
        }
        if self.chunk_size == 0 {
            bail!("chunk_size must be at least 1");
        }
        Ok(())
    }

    pub fn to_summary(&self) -> ParamsV1 {
        ParamsV1 {
            complex_threshold_factor: self.complex_threshold_factor,
            minimum_peptides: self.minimum_peptides,
            maximum_peptides: self.maximum_peptides,
            minimum_overlap: self.minimum_overlap,
            minimum_mass_ratio: self.minimum_mass_ratio,
            maximum_sec_lag: self.maximum_sec_lag,
            chunk_size: self.chunk_size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub monomer_path: PathBuf,
    pub feature_path: PathBuf,
    pub feature_scored_path: PathBuf,
    pub complex_qm_path: PathBuf,
    pub edge_directional_path: PathBuf,
    pub edge_path: PathBuf,
    pub edge_level_path: PathBuf,
    pub node_path: PathBuf,
    pub node_level_path: PathBuf,
    pub summary_path: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            monomer_path: out_dir.join("monomer.tsv"),
            feature_path: out_dir.join("feature.tsv"),
            feature_scored_path: out_dir.join("feature_scored.tsv"),
            complex_qm_path: out_dir.join("complex_qm.tsv"),
            edge_directional_path: out_dir.join("edge_directional.tsv"),
            edge_path: out_dir.join("edge.tsv"),
            edge_level_path: out_dir.join("edge_level.tsv"),
            node_path: out_dir.join("node.tsv"),
            node_level_path: out_dir.join("node_level.tsv"),
            summary_path: out_dir.join("summary.json"),
            out_dir,
        }
    }
}

#[derive(Debug)]
pub struct Ctx {
    pub input: PathBuf,
    pub params: ScoreParams,
    pub threads: usize,
    /// Reload monomer and scored-feature tables persisted by a prior
    /// `score` run instead of recomputing them.
    pub load_results: bool,
    pub warnings: Vec<String>,

    pub proteins: Vec<ProteinRow>,
    pub sec: Vec<SecRow>,
    pub quantification: Vec<QuantRow>,
    pub peptide_meta: Vec<PeptideMetaRow>,
    pub queries: Vec<QueryRow>,

    pub calibration: Option<Calibration>,
    pub profiles: Option<ProfileIndex>,

    pub monomers: Option<Vec<MonomerRow>>,
    pub features: Option<Vec<FeatureRow>>,
    pub scored: Option<Vec<ScoredRow>>,
    pub complex_qm: Option<Vec<QuantEntry>>,
    pub differential: Option<DifferentialTables>,

    pub output: OutputPaths,
    pub summary: RunSummaryV1,
}

impl Ctx {
    pub fn new(input: PathBuf, out_dir: PathBuf, params: ScoreParams, tool_version: &str) -> Self {
        let summary = RunSummaryV1::empty(tool_version, params.to_summary());
        Self {
            input,
            params,
            threads: 0,
            load_results: false,
            warnings: Vec::new(),
            proteins: Vec::new(),
            sec: Vec::new(),
            quantification: Vec::new(),
            peptide_meta: Vec::new(),
            queries: Vec::new(),
            calibration: None,
            profiles: None,
            monomers: None,
            features: None,
            scored: None,
            complex_qm: None,
            differential: None,
            output: OutputPaths::new(out_dir),
            summary,
        }
    }

    pub fn calibration(&self) -> Result<&Calibration> {
        self.calibration.as_ref().context("calibration index missing; input stage not run")
    }

    pub fn profiles(&self) -> Result<&ProfileIndex> {
        self.profiles.as_ref().context("profile index missing; input stage not run")
    }

    pub fn monomers(&self) -> Result<&[MonomerRow]> {
        self.monomers.as_deref().context("monomer table missing; monomer stage not run")
    }

    pub fn features(&self) -> Result<&[FeatureRow]> {
        self.features.as_deref().context("feature table missing; feature stage not run")
    }

    pub fn scored(&self) -> Result<&[ScoredRow]> {
        self.scored.as_deref().context("scored feature table missing; significance stage not run")
    }

    pub fn complex_qm(&self) -> Result<&[QuantEntry]> {
        self.complex_qm.as_deref().context("quantitative matrix missing; quantify stage not run")
    }
}
