use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::quantify::build_matrix;

pub struct Stage5Quantify;

impl Stage5Quantify {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Quantify {
    fn name(&self) -> &'static str {
        "stage5_quantify"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let calibration = ctx.calibration()?;
        let matrix = build_matrix(
            ctx.scored()?,
            ctx.monomers()?,
            ctx.profiles()?,
            calibration.tags(),
        );
        info!(entries = matrix.len(), "quantitative_matrix_built");
        ctx.summary.table_counts.complex_qm = Some(matrix.len() as u64);
        ctx.complex_qm = Some(matrix);
        Ok(())
    }
}
