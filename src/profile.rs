//! In-memory indexes over the canonical tables: fraction→mass calibration
//! per (condition, replicate) and per-protein peptide chromatograms.
//!
//! Built once after input load; read-only for every downstream stage.

use std::collections::HashMap;

use tracing::debug;

use crate::schema::{PeptideMetaRow, QuantRow, SecRow};

/// A (condition, replicate) pair, the unit every profile and record is
/// tagged with.
pub type Tag = (String, String);

#[derive(Debug)]
pub struct Calibration {
    // (condition, replicate) -> (sec_id, sec_mw) sorted by sec_id
    map: HashMap<Tag, Vec<(u32, f64)>>,
    tags: Vec<Tag>,
}

impl Calibration {
    pub fn from_sec(rows: &[SecRow]) -> Self {
        let mut map: HashMap<Tag, Vec<(u32, f64)>> = HashMap::new();
        for row in rows {
            map.entry((row.condition_id.clone(), row.replicate_id.clone()))
                .or_default()
                .push((row.sec_id, row.sec_mw));
        }
        for curve in map.values_mut() {
            curve.sort_by_key(|&(sec_id, _)| sec_id);
            curve.dedup_by_key(|&mut (sec_id, _)| sec_id);
        }
        let mut tags: Vec<Tag> = map.keys().cloned().collect();
        tags.sort();
        Self { map, tags }
    }

    /// Calibrated mass of a fraction, if the run measured it.
    pub fn mass(&self, tag: &Tag, sec_id: u32) -> Option<f64> {
        let curve = self.map.get(tag)?;
        curve
            .binary_search_by_key(&sec_id, |&(id, _)| id)
            .ok()
            .map(|i| curve[i].1)
    }

    /// Distinct (condition, replicate) tags, sorted for deterministic
    /// iteration.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

#[derive(Debug, Clone)]
pub struct PeptideChromatogram {
    pub peptide_id: String,
    pub peptide_rank: u32,
    // (sec_id, intensity) sorted by sec_id
    pub points: Vec<(u32, f64)>,
}

impl PeptideChromatogram {
    pub fn intensity_at(&self, sec_id: u32) -> f64 {
        self.points
            .binary_search_by_key(&sec_id, |&(id, _)| id)
            .ok()
            .map(|i| self.points[i].1)
            .unwrap_or(0.0)
    }

    /// Zero-filled intensity vector over the inclusive fraction window.
    pub fn window(&self, lo: u32, hi: u32) -> Vec<f64> {
        (lo..=hi).map(|sec_id| self.intensity_at(sec_id)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct ProteinProfile {
    /// Peptides ordered by (peptide_rank, peptide_id); rank 1 first.
    pub peptides: Vec<PeptideChromatogram>,
    pub min_sec: u32,
    pub max_sec: u32,
}

impl ProteinProfile {
    /// Summed intensity of the first `limit` peptides at one fraction.
    pub fn summed_intensity(&self, sec_id: u32, limit: usize) -> f64 {
        self.peptides
            .iter()
            .take(limit)
            .map(|p| p.intensity_at(sec_id))
            .sum()
    }

    /// Fractions with any signal, ascending.
    pub fn observed_fractions(&self) -> Vec<u32> {
        let mut fractions: Vec<u32> = self
            .peptides
            .iter()
            .flat_map(|p| p.points.iter().map(|&(sec_id, _)| sec_id))
            .collect();
        fractions.sort_unstable();
        fractions.dedup();
        fractions
    }
}

#[derive(Debug)]
pub struct ProfileIndex {
    map: HashMap<String, HashMap<Tag, ProteinProfile>>,
}

impl ProfileIndex {
    pub fn build(quant: &[QuantRow], sec: &[SecRow], meta: &[PeptideMetaRow]) -> Self {
        // run_id -> (condition, replicate, sec_id)
        let mut runs: HashMap<&str, (&str, &str, u32)> = HashMap::new();
        for row in sec {
            runs.insert(
                row.run_id.as_str(),
                (row.condition_id.as_str(), row.replicate_id.as_str(), row.sec_id),
            );
        }

        let mut rank_of: HashMap<&str, u32> = HashMap::new();
        for row in meta {
            rank_of.insert(row.peptide_id.as_str(), row.peptide_rank);
        }

        type PeptidePoints = HashMap<String, Vec<(u32, f64)>>;
        let mut accum: HashMap<(String, Tag), PeptidePoints> = HashMap::new();
        let mut orphans = 0usize;
        for row in quant {
            let Some(&(condition, replicate, sec_id)) = runs.get(row.run_id.as_str()) else {
                orphans += 1;
                continue;
            };
            accum
                .entry((
                    row.protein_id.clone(),
                    (condition.to_string(), replicate.to_string()),
                ))
                .or_default()
                .entry(row.peptide_id.clone())
                .or_default()
                .push((sec_id, row.peptide_intensity));
        }
        if orphans > 0 {
            debug!(orphans, "quantification rows without a calibration run dropped");
        }

        let mut map: HashMap<String, HashMap<Tag, ProteinProfile>> = HashMap::new();
        for ((protein_id, tag), peptide_points) in accum {
            let mut peptides: Vec<PeptideChromatogram> = peptide_points
                .into_iter()
                .map(|(peptide_id, mut points)| {
                    points.sort_by_key(|&(sec_id, _)| sec_id);
                    // duplicate injections for a fraction collapse by sum
                    let mut merged: Vec<(u32, f64)> = Vec::with_capacity(points.len());
                    for (sec_id, intensity) in points {
                        match merged.last_mut() {
                            Some(last) if last.0 == sec_id => last.1 += intensity,
                            _ => merged.push((sec_id, intensity)),
                        }
                    }
                    let peptide_rank = rank_of.get(peptide_id.as_str()).copied().unwrap_or(u32::MAX);
                    PeptideChromatogram {
                        peptide_id,
                        peptide_rank,
                        points: merged,
                    }
                })
                .collect();
            peptides.sort_by(|a, b| {
                a.peptide_rank
                    .cmp(&b.peptide_rank)
                    .then_with(|| a.peptide_id.cmp(&b.peptide_id))
            });

            let min_sec = peptides
                .iter()
                .filter_map(|p| p.points.first().map(|&(sec_id, _)| sec_id))
                .min();
            let max_sec = peptides
                .iter()
                .filter_map(|p| p.points.last().map(|&(sec_id, _)| sec_id))
                .max();
            let (Some(min_sec), Some(max_sec)) = (min_sec, max_sec) else {
                continue;
            };

            map.entry(protein_id).or_default().insert(
                tag,
                ProteinProfile {
                    peptides,
                    min_sec,
                    max_sec,
                },
            );
        }

        Self { map }
    }

    pub fn get(&self, protein_id: &str, tag: &Tag) -> Option<&ProteinProfile> {
        self.map.get(protein_id)?.get(tag)
    }
}
