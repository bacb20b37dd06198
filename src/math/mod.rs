pub mod fdr;
pub mod mwu;
pub mod stats;
