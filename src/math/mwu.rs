//! Mann-Whitney U test, normal approximation with tie and continuity
//! correction.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::math::stats::ranks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alternative {
    /// Distributions differ in either direction.
    TwoSided,
    /// First group stochastically greater than the second.
    Greater,
}

#[derive(Debug, Clone, Copy)]
pub struct MwuResult {
    pub u: f64,
    pub pvalue: f64,
}

/// Compare two independent samples. Returns `None` when either group is
/// empty. A fully tied comparison has no discriminating information and
/// yields p = 1.
pub fn mann_whitney_u(x: &[f64], y: &[f64], alternative: Alternative) -> Option<MwuResult> {
    if x.is_empty() || y.is_empty() {
        return None;
    }
    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let n = n1 + n2;

    let mut combined = Vec::with_capacity(x.len() + y.len());
    combined.extend_from_slice(x);
    combined.extend_from_slice(y);
    let rank = ranks(&combined);

    let r1: f64 = rank[..x.len()].iter().sum();
    let u = r1 - n1 * (n1 + 1.0) / 2.0;
    let mu = n1 * n2 / 2.0;

    // tie correction over rank groups of the pooled sample
    let mut sorted = combined.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        let t = (j - i + 1) as f64;
        tie_term += t * t * t - t;
        i = j + 1;
    }

    let sigma_sq = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if sigma_sq <= 0.0 {
        return Some(MwuResult { u, pvalue: 1.0 });
    }
    let sigma = sigma_sq.sqrt();

    let normal = Normal::new(0.0, 1.0).ok()?;
    let pvalue = match alternative {
        Alternative::TwoSided => {
            let delta = u - mu;
            let z = (delta.abs() - 0.5).max(0.0) / sigma;
            (2.0 * normal.sf(z)).min(1.0)
        }
        Alternative::Greater => {
            let z = (u - mu - 0.5) / sigma;
            normal.sf(z)
        }
    };

    Some(MwuResult { u, pvalue })
}
