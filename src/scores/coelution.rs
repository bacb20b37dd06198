//! Pairwise MIC/TIC co-elution scoring of candidate interactions.
//!
//! Candidates are scored in fixed-size chunks with no shared mutable state,
//! so the output is invariant to the partitioning and to thread count.

use anyhow::Result;

use crate::ctx::ScoreParams;
use crate::math::stats::{mean, pearson};
use crate::profile::{ProfileIndex, ProteinProfile, Tag};
use crate::schema::{FeatureRow, QueryRow};

#[cfg(feature = "mt")]
use rayon::prelude::*;

pub fn score_candidates(
    queries: &[QueryRow],
    profiles: &ProfileIndex,
    tags: &[Tag],
    params: &ScoreParams,
    threads: usize,
) -> Result<Vec<FeatureRow>> {
    let chunks: Vec<&[QueryRow]> = queries.chunks(params.chunk_size.max(1)).collect();

    #[cfg(feature = "mt")]
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
        let nested: Vec<Vec<FeatureRow>> = pool.install(|| {
            chunks
                .par_iter()
                .map(|chunk| score_chunk(chunk, profiles, tags, params))
                .collect()
        });
        return Ok(nested.into_iter().flatten().collect());
    }

    #[cfg(not(feature = "mt"))]
    {
        let _ = threads;
        return Ok(chunks
            .into_iter()
            .flat_map(|chunk| score_chunk(chunk, profiles, tags, params))
            .collect());
    }
}

fn score_chunk(
    chunk: &[QueryRow],
    profiles: &ProfileIndex,
    tags: &[Tag],
    params: &ScoreParams,
) -> Vec<FeatureRow> {
    let mut out = Vec::new();
    for query in chunk {
        for tag in tags {
            let Some(bait) = profiles.get(&query.bait_id, tag) else {
                continue;
            };
            let Some(prey) = profiles.get(&query.prey_id, tag) else {
                continue;
            };
            if let Some(row) = score_pair(query, tag, bait, prey, params) {
                out.push(row);
            }
        }
    }
    out
}

fn score_pair(
    query: &QueryRow,
    tag: &Tag,
    bait: &ProteinProfile,
    prey: &ProteinProfile,
    params: &ScoreParams,
) -> Option<FeatureRow> {
    let bait_peptides = bait.peptides.len().min(params.maximum_peptides);
    let prey_peptides = prey.peptides.len().min(params.maximum_peptides);
    if bait_peptides < params.minimum_peptides || prey_peptides < params.minimum_peptides {
        return None;
    }

    let lo = bait.min_sec.max(prey.min_sec);
    let hi = bait.max_sec.min(prey.max_sec);
    if lo > hi {
        return None;
    }
    let overlap = (hi - lo + 1) as usize;
    if overlap < params.minimum_overlap {
        return None;
    }

    let bait_windows: Vec<Vec<f64>> = bait.peptides[..bait_peptides]
        .iter()
        .map(|p| p.window(lo, hi))
        .collect();
    let prey_windows: Vec<Vec<f64>> = prey.peptides[..prey_peptides]
        .iter()
        .map(|p| p.window(lo, hi))
        .collect();

    let mut similarities = Vec::with_capacity(bait_windows.len() * prey_windows.len());
    for bait_window in &bait_windows {
        for prey_window in &prey_windows {
            // zero-variance chromatograms carry no shape and are skipped
            if let Some(r) = pearson(bait_window, prey_window) {
                similarities.push(r);
            }
        }
    }
    if similarities.is_empty() {
        return None;
    }

    let mic = similarities.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let tic = mean(&similarities);
    let score = 0.5 * (mic + tic);

    let bait_apex_sec_id = apex(&bait_windows, lo);
    let prey_apex_sec_id = apex(&prey_windows, lo);
    let combined: Vec<Vec<f64>> = bait_windows.into_iter().chain(prey_windows).collect();
    let apex_sec_id = apex(&combined, lo);

    Some(FeatureRow {
        bait_id: query.bait_id.clone(),
        prey_id: query.prey_id.clone(),
        label: query.label,
        condition_id: tag.0.clone(),
        replicate_id: tag.1.clone(),
        mic,
        tic,
        score,
        bait_peptides,
        prey_peptides,
        overlap,
        apex_sec_id,
        bait_apex_sec_id,
        prey_apex_sec_id,
    })
}

/// Fraction with the highest summed intensity; ties go to the earlier
/// (higher-mass) fraction.
fn apex(windows: &[Vec<f64>], lo: u32) -> u32 {
    let len = windows.first().map(|w| w.len()).unwrap_or(0);
    let mut best = (f64::NEG_INFINITY, 0usize);
    for i in 0..len {
        let sum: f64 = windows.iter().map(|w| w[i]).sum();
        if sum > best.0 {
            best = (sum, i);
        }
    }
    lo + best.1 as u32
}
