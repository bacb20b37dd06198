use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{results, tables};
use crate::pipeline::Stage;
use crate::profile::{Calibration, ProfileIndex};

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.proteins = tables::read_proteins(&ctx.input)?;
        ctx.sec = tables::read_sec(&ctx.input)?;
        ctx.quantification = tables::read_quantification(&ctx.input)?;
        ctx.peptide_meta = tables::read_peptide_meta(&ctx.input)?;
        ctx.queries = tables::read_queries(&ctx.input)?;

        info!(
            proteins = ctx.proteins.len(),
            sec_rows = ctx.sec.len(),
            quantification_rows = ctx.quantification.len(),
            peptides = ctx.peptide_meta.len(),
            candidates = ctx.queries.len(),
            "canonical_tables_loaded"
        );

        ctx.calibration = Some(Calibration::from_sec(&ctx.sec));
        ctx.profiles = Some(ProfileIndex::build(
            &ctx.quantification,
            &ctx.sec,
            &ctx.peptide_meta,
        ));

        if ctx.load_results {
            let monomers = results::read_monomers(&ctx.output.monomer_path)?;
            let scored = results::read_feature_scored(&ctx.output.feature_scored_path)?;
            info!(
                monomers = monomers.len(),
                scored = scored.len(),
                "prior_score_results_loaded"
            );
            ctx.monomers = Some(monomers);
            ctx.scored = Some(scored);
        }

        Ok(())
    }
}
