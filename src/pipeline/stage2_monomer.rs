use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::monomer::detect_monomers;

pub struct Stage2Monomer;

impl Stage2Monomer {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Monomer {
    fn name(&self) -> &'static str {
        "stage2_monomer"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let monomers = detect_monomers(
            &ctx.proteins,
            ctx.profiles()?,
            ctx.calibration()?,
            ctx.params.complex_threshold_factor,
        );
        info!(monomers = monomers.len(), "monomers_detected");
        ctx.summary.table_counts.monomer = Some(monomers.len() as u64);
        ctx.monomers = Some(monomers);
        Ok(())
    }
}
