use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::ctx::ScoreParams;

#[derive(Debug, Parser)]
#[command(name = "coelute", version, about = "SEC-MS co-elution scoring CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect monomers, score candidate interactions and assess significance.
    Score(ScoreArgs),
    /// Build the quantitative matrix and run differential tests over a prior
    /// score run.
    Quantify(QuantifyArgs),
    /// Score and quantify in one pass.
    Run(ScoreArgs),
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    #[arg(long = "in", help = "Directory holding the canonical input tables")]
    pub input: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(
        long,
        default_value_t = 2.0,
        help = "Factor over the monomeric mass above which elution counts as complex"
    )]
    pub complex_threshold_factor: f64,

    #[arg(long, default_value_t = 4, help = "Minimum peptides required per protein")]
    pub minimum_peptides: usize,

    #[arg(long, default_value_t = 4, help = "Maximum top-ranked peptides used per protein")]
    pub maximum_peptides: usize,

    #[arg(long, default_value_t = 5, help = "Minimum co-observed SEC fractions")]
    pub minimum_overlap: usize,

    #[arg(
        long,
        default_value_t = 0.2,
        help = "Minimum observed/expected complex mass ratio"
    )]
    pub minimum_mass_ratio: f64,

    #[arg(
        long,
        default_value_t = 2.0,
        help = "Maximum lag in SEC units between bait and prey peaks"
    )]
    pub maximum_sec_lag: f64,

    #[arg(long, default_value_t = 50_000, help = "Candidates per scoring chunk")]
    pub chunk_size: usize,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct QuantifyArgs {
    #[arg(long = "in", help = "Directory holding the canonical input tables")]
    pub input: PathBuf,

    #[arg(long, help = "Directory holding the score results; receives the quantify tables")]
    pub out: PathBuf,
}

impl ScoreArgs {
    pub fn params(&self) -> ScoreParams {
        ScoreParams {
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
