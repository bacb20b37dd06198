use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let counts = &ctx.summary.table_counts;

    let mut out = String::new();
    out.push_str(&format!("coelute v{}\n", version));
    out.push_str(&format!(
        "Input: {} proteins, {} calibration rows, {} quantification rows, {} candidates\n",
        ctx.proteins.len(),
        ctx.sec.len(),
        ctx.quantification.len(),
        ctx.queries.len()
    ));
    if let Some(n) = counts.monomer {
        out.push_str(&format!("Monomers: {}\n", n));
    }
    if let (Some(features), Some(scored)) = (counts.feature, counts.feature_scored) {
        out.push_str(&format!("Features: {} scored, {} significant-tested\n", features, scored));
    }
    if let Some(n) = counts.complex_qm {
        out.push_str(&format!("Quantitative matrix: {} entries\n", n));
    }
    if let (Some(edges), Some(nodes)) = (counts.edge, counts.node) {
        out.push_str(&format!("Differential: {} edge tests, {} node tests\n", edges, nodes));
    }
    out
}
