use coelute::math::fdr::{empirical_pvalue, pi0_lambda_sweep, posterior_error, qvalues};

#[test]
fn empirical_pvalue_add_one_smoothing() {
    let null = vec![0.1, 0.2, 0.3, 0.4];
    // above every decoy
    assert!((empirical_pvalue(0.9, &null) - 1.0 / 5.0).abs() < 1e-12);
    // below every decoy
    assert!((empirical_pvalue(0.0, &null) - 1.0).abs() < 1e-12);
    // ties count as at-or-above
    assert!((empirical_pvalue(0.3, &null) - 3.0 / 5.0).abs() < 1e-12);
    // empty null can never yield p = 0
    assert_eq!(empirical_pvalue(0.5, &[]), 1.0);
}

#[test]
fn pi0_uniform_pvalues_near_one() {
    let pvalues: Vec<f64> = (0..1000).map(|i| (i as f64 + 0.5) / 1000.0).collect();
    let pi0 = pi0_lambda_sweep(&pvalues);
    assert!(pi0 > 0.9, "uniform p-values imply pi0 near 1, got {}", pi0);
    assert!(pi0 <= 1.0);
}

#[test]
fn pi0_enriched_pvalues_below_one() {
    // half the p-values pile up near zero
    let mut pvalues: Vec<f64> = (0..500).map(|i| (i as f64 + 0.5) / 10_000.0).collect();
    pvalues.extend((0..500).map(|i| (i as f64 + 0.5) / 500.0));
    let pi0 = pi0_lambda_sweep(&pvalues);
    assert!(pi0 < 0.8, "enriched p-values should lower pi0, got {}", pi0);
    assert!(pi0 >= 1.0 / 1000.0);
}

#[test]
fn pi0_empty_is_one() {
    assert_eq!(pi0_lambda_sweep(&[]), 1.0);
}

#[test]
fn qvalues_monotone_in_pvalue() {
    let pvalues = vec![0.9, 0.01, 0.2, 0.05, 0.5, 0.01];
    let qvals = qvalues(&pvalues, 1.0);
    let mut pairs: Vec<(f64, f64)> = pvalues.iter().copied().zip(qvals.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    for window in pairs.windows(2) {
        assert!(
            window[0].1 <= window[1].1 + 1e-12,
            "q-values must not decrease as p-values increase: {:?}",
            pairs
        );
    }
}

#[test]
fn qvalues_bounded_and_scaled() {
    let pvalues = vec![0.001, 0.5, 1.0];
    let qvals = qvalues(&pvalues, 1.0);
    for q in &qvals {
        assert!((0.0..=1.0).contains(q));
    }
    // smallest p keeps rank 1: q = p * m
    assert!((qvals[0] - 0.003).abs() < 1e-12);
}

#[test]
fn qvalues_pi0_scales_down() {
    let pvalues = vec![0.01, 0.02, 0.03];
    let full = qvalues(&pvalues, 1.0);
    let half = qvalues(&pvalues, 0.5);
    for (f, h) in full.iter().zip(half.iter()) {
        assert!((h - f * 0.5).abs() < 1e-12);
    }
}

#[test]
fn posterior_error_separated_distributions() {
    let targets: Vec<f64> = (0..50).map(|i| 0.8 + (i as f64) * 0.004).collect();
    let decoys: Vec<f64> = (0..50).map(|i| (i as f64) * 0.004).collect();
    let pep = posterior_error(&targets, &targets, &decoys, 0.5);
    // scores far from the decoy mass carry a low posterior error
    assert!(pep.iter().all(|p| (0.0..=1.0).contains(p)));
    assert!(pep[40] < 0.1, "high target score should have low PEP, got {}", pep[40]);
}

#[test]
fn posterior_error_degenerate_groups() {
    let pep = posterior_error(&[0.5, 0.6], &[0.5], &[0.1, 0.2], 1.0);
    assert_eq!(pep, vec![1.0, 1.0]);
    let pep = posterior_error(&[0.5], &[0.4, 0.5], &[], 1.0);
    assert_eq!(pep, vec![1.0]);
}
