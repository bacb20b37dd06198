use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::significance::assess;

pub struct Stage4Significance;

impl Stage4Significance {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Significance {
    fn name(&self) -> &'static str {
        "stage4_significance"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let outcome = assess(
            ctx.features()?,
            ctx.monomers()?,
            &ctx.proteins,
            ctx.calibration()?,
            &ctx.params,
        );
        info!(scored = outcome.rows.len(), "significance_assessed");
        ctx.warnings.extend(outcome.warnings);
        ctx.summary.table_counts.feature_scored = Some(outcome.rows.len() as u64);
        ctx.scored = Some(outcome.rows);
        Ok(())
    }
}
