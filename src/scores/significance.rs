//! Decoy-calibrated significance assessment.
//!
//! Surviving decoy scores form the empirical null; target and decoy groups
//! run through the identical estimation path and differ only by their label.

use std::collections::HashMap;

use tracing::warn;

use crate::ctx::ScoreParams;
use crate::math::fdr::{empirical_pvalue, pi0_lambda_sweep, posterior_error, qvalues};
use crate::profile::Calibration;
use crate::schema::{FeatureRow, Label, MonomerRow, ProteinRow, ScoredRow};

/// Below this many surviving decoys the empirical null is unreliable:
/// pi0 and PEP degrade to their conservative ceilings and a warning is
/// surfaced instead of optimistic q-values.
const MINIMUM_DECOYS: usize = 10;

pub struct SignificanceOutcome {
    pub rows: Vec<ScoredRow>,
    pub warnings: Vec<String>,
}

pub fn assess(
    features: &[FeatureRow],
    monomers: &[MonomerRow],
    proteins: &[ProteinRow],
    calibration: &Calibration,
    params: &ScoreParams,
) -> SignificanceOutcome {
    let catalog_mw: HashMap<&str, f64> = proteins
        .iter()
        .map(|p| (p.protein_id.as_str(), p.protein_mw))
        .collect();
    let monomer_sec: HashMap<(&str, &str, &str), u32> = monomers
        .iter()
        .map(|m| {
            (
                (
                    m.protein_id.as_str(),
                    m.condition_id.as_str(),
                    m.replicate_id.as_str(),
                ),
                m.monomer_sec_id,
            )
        })
        .collect();

    // Monomeric mass under a tag: calibrated mass at the detected monomer
    // fraction when available, catalog mass otherwise.
    let monomeric_mass = |protein_id: &str, feature: &FeatureRow| -> Option<f64> {
        let tag = (
            feature.condition_id.clone(),
            feature.replicate_id.clone(),
        );
        let key = (
            protein_id,
            feature.condition_id.as_str(),
            feature.replicate_id.as_str(),
        );
        if let Some(&sec_id) = monomer_sec.get(&key) {
            if let Some(mass) = calibration.mass(&tag, sec_id) {
                return Some(mass);
            }
        }
        catalog_mw.get(protein_id).copied().filter(|&mw| mw > 0.0)
    };

    // mass-ratio and lag filters; filtered candidates are absent from the
    // output, not flagged
    let mut kept: Vec<(usize, f64)> = Vec::new();
    for (idx, feature) in features.iter().enumerate() {
        if f64::from(feature.sec_lag()) > params.maximum_sec_lag {
            continue;
        }
        let tag = (
            feature.condition_id.clone(),
            feature.replicate_id.clone(),
        );
        let Some(observed) = calibration.mass(&tag, feature.apex_sec_id) else {
            continue;
        };
        let Some(bait_mass) = monomeric_mass(&feature.bait_id, feature) else {
            continue;
        };
        let Some(prey_mass) = monomeric_mass(&feature.prey_id, feature) else {
            continue;
        };
        let mass_ratio = observed / (bait_mass + prey_mass);
        if mass_ratio < params.minimum_mass_ratio {
            continue;
        }
        kept.push((idx, mass_ratio));
    }

    let mut warnings = Vec::new();
    let mut decoy_scores: Vec<f64> = kept
        .iter()
        .filter(|&&(idx, _)| features[idx].label.is_decoy())
        .map(|&(idx, _)| features[idx].score)
        .collect();
    decoy_scores.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let degenerate = decoy_scores.len() < MINIMUM_DECOYS;
    if degenerate {
        let message = format!(
            "only {} decoy candidates survived filtering; null model unreliable, \
             pi0 and PEP pinned to 1.0",
            decoy_scores.len()
        );
        warn!(decoys = decoy_scores.len(), "decoy null too small");
        warnings.push(message);
    }

    let pvalue_of = |score: f64| empirical_pvalue(score, &decoy_scores);

    // assemble rows in feature order, then correct each label group by the
    // same procedure
    let mut rows: Vec<ScoredRow> = kept
        .iter()
        .map(|&(idx, mass_ratio)| ScoredRow {
            feature: features[idx].clone(),
            mass_ratio,
            pvalue: pvalue_of(features[idx].score),
            qvalue: 1.0,
            pep: 1.0,
        })
        .collect();

    for label in [Label::Target, Label::Decoy] {
        let group: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.feature.label == label)
            .map(|(i, _)| i)
            .collect();
        if group.is_empty() {
            continue;
        }
        let pvals: Vec<f64> = group.iter().map(|&i| rows[i].pvalue).collect();
        let scores: Vec<f64> = group.iter().map(|&i| rows[i].feature.score).collect();

        let pi0 = if degenerate { 1.0 } else { pi0_lambda_sweep(&pvals) };
        let qvals = qvalues(&pvals, pi0);
        let peps = if degenerate {
            vec![1.0; group.len()]
        } else {
            posterior_error(&scores, &scores, &decoy_scores, pi0)
        };

        for ((&i, q), pep) in group.iter().zip(qvals).zip(peps) {
            rows[i].qvalue = q;
            rows[i].pep = pep;
        }
    }

    SignificanceOutcome { rows, warnings }
}
