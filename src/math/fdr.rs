//! Decoy-calibrated error rate estimation: pi0, Storey q-values and
//! posterior error probabilities.

/// Estimate the proportion of true nulls from a p-value distribution.
///
/// Counts `#{p > lambda} / (m * (1 - lambda))` over the lambda grid
/// 0.05..0.95 and extrapolates a least-squares linear fit to lambda = 1.
/// The estimate is clamped to `[1/m, 1]` so downstream q-values can never
/// collapse to zero across the board.
pub fn pi0_lambda_sweep(pvalues: &[f64]) -> f64 {
    if pvalues.is_empty() {
        return 1.0;
    }
    let m = pvalues.len() as f64;

    let mut xs = Vec::with_capacity(19);
    let mut ys = Vec::with_capacity(19);
    for step in 1..=19u32 {
        let lambda = step as f64 * 0.05;
        let above = pvalues.iter().filter(|&&p| p > lambda).count() as f64;
        xs.push(lambda);
        ys.push(above / (m * (1.0 - lambda)));
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let pi0 = mean_y + slope * (1.0 - mean_x);

    pi0.clamp(1.0 / m, 1.0)
}

/// Storey-scaled q-values, aligned to the input order.
///
/// `q_i = p_i * m * pi0 / rank_i` over ascending p-values, monotonized by a
/// cumulative minimum from the largest p-value downward.
pub fn qvalues(pvalues: &[f64], pi0: f64) -> Vec<f64> {
    let m = pvalues.len();
    if m == 0 {
        return Vec::new();
    }
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| pvalues[a].partial_cmp(&pvalues[b]).unwrap().then(a.cmp(&b)));

    let mut q_sorted = vec![0.0; m];
    for (rank0, &idx) in order.iter().enumerate() {
        q_sorted[rank0] = pvalues[idx] * m as f64 * pi0 / (rank0 + 1) as f64;
    }

    let mut q_min = 1.0f64;
    for q in q_sorted.iter_mut().rev() {
        q_min = q_min.min(*q);
        *q = q_min;
    }

    let mut out = vec![0.0; m];
    for (rank0, &idx) in order.iter().enumerate() {
        out[idx] = q_sorted[rank0].clamp(0.0, 1.0);
    }
    out
}

/// Posterior error probability per evaluation score via the local FDR
/// density ratio `pi0 * f_decoy(s) / f_target(s)`.
///
/// Densities are Gaussian kernel estimates with Silverman bandwidth. When
/// either group is too small or too flat to fit, every PEP degrades to 1.0.
pub fn posterior_error(
    eval: &[f64],
    target_scores: &[f64],
    decoy_scores: &[f64],
    pi0: f64,
) -> Vec<f64> {
    let (target_kde, decoy_kde) = match (Kde::fit(target_scores), Kde::fit(decoy_scores)) {
        (Some(t), Some(d)) => (t, d),
        _ => return vec![1.0; eval.len()],
    };

    eval.iter()
        .map(|&s| {
            let f = target_kde.density(s);
            if f <= f64::MIN_POSITIVE {
                return 1.0;
            }
            (pi0 * decoy_kde.density(s) / f).clamp(0.0, 1.0)
        })
        .collect()
}

struct Kde {
    points: Vec<f64>,
    bandwidth: f64,
}

impl Kde {
    fn fit(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let m = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (n - 1.0);
        let sd = var.sqrt();

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let iqr = sorted[(sorted.len() * 3) / 4] - sorted[sorted.len() / 4];

        let spread = if iqr > 0.0 { sd.min(iqr / 1.34) } else { sd };
        let bandwidth = 0.9 * spread * n.powf(-0.2);
        if bandwidth <= 0.0 {
            return None;
        }
        Some(Self {
            points: values.to_vec(),
            bandwidth,
        })
    }

    fn density(&self, x: f64) -> f64 {
        let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * self.bandwidth);
        let sum: f64 = self
            .points
            .iter()
            .map(|&p| {
                let z = (x - p) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum();
        norm * sum / self.points.len() as f64
    }
}

/// One-sided empirical p-value of `score` against a sorted null, with
/// add-one smoothing so no p-value is exactly zero.
pub fn empirical_pvalue(score: f64, sorted_null_asc: &[f64]) -> f64 {
    let n = sorted_null_asc.len();
    // count of null scores >= score
    let at_or_above = n - sorted_null_asc.partition_point(|&d| d < score);
    (1 + at_or_above) as f64 / (1 + n) as f64
}
