use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::coelution::score_candidates;

pub struct Stage3Features;

impl Stage3Features {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Features {
    fn name(&self) -> &'static str {
        "stage3_features"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let calibration = ctx.calibration()?;
        let features = score_candidates(
            &ctx.queries,
            ctx.profiles()?,
            calibration.tags(),
            &ctx.params,
            ctx.threads,
        )?;
        let decoys = features.iter().filter(|f| f.label.is_decoy()).count();
        info!(
            features = features.len(),
            decoys,
            chunk_size = ctx.params.chunk_size,
            "candidates_scored"
        );
        ctx.summary.table_counts.feature = Some(features.len() as u64);
        ctx.features = Some(features);
        Ok(())
    }
}
