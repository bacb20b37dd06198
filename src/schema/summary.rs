use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamsV1 {
    pub complex_threshold_factor: f64,
    pub minimum_peptides: usize,
    pub maximum_peptides: usize,
    pub minimum_overlap: usize,
    pub minimum_mass_ratio: f64,
    pub maximum_sec_lag: f64,
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCounts {
    pub monomer: Option<u64>,
    pub feature: Option<u64>,
    pub feature_scored: Option<u64>,
    pub complex_qm: Option<u64>,
    pub edge_directional: Option<u64>,
    pub edge: Option<u64>,
    pub edge_level: Option<u64>,
    pub node: Option<u64>,
    pub node_level: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummaryV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub params: ParamsV1,
    pub table_counts: TableCounts,
    pub warnings: Vec<String>,
}

impl RunSummaryV1 {
    pub fn empty(tool_version: &str, params: ParamsV1) -> Self {
        Self {
            tool: "coelute".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            params,
            table_counts: TableCounts::default(),
            warnings: Vec::new(),
        }
    }
}
