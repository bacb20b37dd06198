use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{results, write_json};
use crate::pipeline::Stage;

pub struct Stage7Output;

impl Stage7Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage7Output {
    fn name(&self) -> &'static str {
        "stage7_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if let Some(monomers) = &ctx.monomers {
            results::write_monomers(&ctx.output.monomer_path, monomers)?;
        }
        if let Some(features) = &ctx.features {
            results::write_features(&ctx.output.feature_path, features)?;
        }
        if let Some(scored) = &ctx.scored {
            results::write_feature_scored(&ctx.output.feature_scored_path, scored)?;
        }
        if let Some(matrix) = &ctx.complex_qm {
            results::write_complex_qm(&ctx.output.complex_qm_path, matrix)?;
        }
        if let Some(tables) = &ctx.differential {
            results::write_edges(
                &ctx.output.edge_directional_path,
                &tables.edge_directional,
                true,
                false,
            )?;
            results::write_edges(&ctx.output.edge_path, &tables.edge, false, false)?;
            results::write_edges(&ctx.output.edge_level_path, &tables.edge_level, false, true)?;
            results::write_nodes(&ctx.output.node_path, &tables.node, false)?;
            results::write_nodes(&ctx.output.node_level_path, &tables.node_level, true)?;
        }

        ctx.summary.warnings = ctx.warnings.clone();
        write_json(&ctx.output.summary_path, &ctx.summary)?;

        info!(out_dir = %ctx.output.out_dir.display(), "result_tables_written");
        Ok(())
    }
}
