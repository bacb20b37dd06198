use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::quantify::test_differential;

pub struct Stage6Differential;

impl Stage6Differential {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Differential {
    fn name(&self) -> &'static str {
        "stage6_differential"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let tables = test_differential(ctx.complex_qm()?);
        info!(
            edge_directional = tables.edge_directional.len(),
            edge = tables.edge.len(),
            edge_level = tables.edge_level.len(),
            node = tables.node.len(),
            node_level = tables.node_level.len(),
            "differential_tests_complete"
        );
        let counts = &mut ctx.summary.table_counts;
        counts.edge_directional = Some(tables.edge_directional.len() as u64);
        counts.edge = Some(tables.edge.len() as u64);
        counts.edge_level = Some(tables.edge_level.len() as u64);
        counts.node = Some(tables.node.len() as u64);
        counts.node_level = Some(tables.node_level.len() as u64);
        ctx.differential = Some(tables);
        Ok(())
    }
}
