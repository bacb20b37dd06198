use coelute::ctx::ScoreParams;
use coelute::profile::Calibration;
use coelute::schema::{FeatureRow, Label, MonomerRow, ProteinRow, SecRow};
use coelute::scores::significance::assess;

// fraction f maps to 500 - 10f kDa
fn calibration() -> Calibration {
    let sec: Vec<SecRow> = (1..=45)
        .map(|sec_id| SecRow {
            run_id: format!("run{}", sec_id),
            sec_id,
            sec_mw: 500.0 - 10.0 * sec_id as f64,
            condition_id: "control".to_string(),
            replicate_id: "1".to_string(),
        })
        .collect();
    Calibration::from_sec(&sec)
}

fn protein(id: &str, mw: f64) -> ProteinRow {
    ProteinRow {
        protein_id: id.to_string(),
        protein_name: format!("{}_HUMAN", id),
        protein_mw: mw,
    }
}

fn feature(bait: &str, prey: &str, label: Label, score: f64, apex: u32, lag: u32) -> FeatureRow {
    FeatureRow {
        bait_id: bait.to_string(),
        prey_id: prey.to_string(),
        label,
        condition_id: "control".to_string(),
        replicate_id: "1".to_string(),
        mic: score,
        tic: score,
        score,
        bait_peptides: 4,
        prey_peptides: 4,
        overlap: 10,
        apex_sec_id: apex,
        bait_apex_sec_id: apex,
        prey_apex_sec_id: apex + lag,
    }
}

fn params() -> ScoreParams {
    ScoreParams::default()
}

/// Enough decoys to keep the empirical null trustworthy.
fn decoy_pool(proteins: &mut Vec<ProteinRow>, features: &mut Vec<FeatureRow>, count: usize) {
    for i in 0..count {
        let bait = format!("DB{}", i);
        let prey = format!("DP{}", i);
        proteins.push(protein(&bait, 10.0));
        proteins.push(protein(&prey, 10.0));
        features.push(feature(
            &bait,
            &prey,
            Label::Decoy,
            (i as f64) * 0.05,
            20,
            0,
        ));
    }
}

#[test]
fn lag_boundary_exact_is_retained() {
    let mut proteins = vec![
        protein("A", 10.0),
        protein("B", 10.0),
        protein("C", 10.0),
        protein("D", 10.0),
    ];
    let mut features = vec![
        feature("A", "B", Label::Target, 0.9, 20, 2),
        feature("C", "D", Label::Target, 0.9, 20, 3),
    ];
    decoy_pool(&mut proteins, &mut features, 12);

    let outcome = assess(&features, &[], &proteins, &calibration(), &params());
    let targets: Vec<&str> = outcome
        .rows
        .iter()
        .filter(|r| !r.feature.label.is_decoy())
        .map(|r| r.feature.bait_id.as_str())
        .collect();
    assert_eq!(targets, vec!["A"]);
}

#[test]
fn mass_ratio_below_minimum_is_dropped() {
    // observed mass at fraction 20 is 300 kDa
    let mut proteins = vec![
        protein("HEAVY1", 1000.0),
        protein("HEAVY2", 1000.0),
        protein("LIGHT1", 100.0),
        protein("LIGHT2", 100.0),
    ];
    let mut features = vec![
        // 300 / 2000 = 0.15 < 0.2
        feature("HEAVY1", "HEAVY2", Label::Target, 0.9, 20, 0),
        // 300 / 200 = 1.5
        feature("LIGHT1", "LIGHT2", Label::Target, 0.9, 20, 0),
    ];
    decoy_pool(&mut proteins, &mut features, 12);

    let outcome = assess(&features, &[], &proteins, &calibration(), &params());
    let targets: Vec<&str> = outcome
        .rows
        .iter()
        .filter(|r| !r.feature.label.is_decoy())
        .map(|r| r.feature.bait_id.as_str())
        .collect();
    assert_eq!(targets, vec!["LIGHT1"]);
}

#[test]
fn monomer_record_overrides_catalog_mass() {
    // catalog masses alone would fail the ratio filter
    let mut proteins = vec![protein("A", 1000.0), protein("B", 1000.0)];
    let mut features = vec![feature("A", "B", Label::Target, 0.9, 20, 0)];
    decoy_pool(&mut proteins, &mut features, 12);

    // detected monomers at fraction 45 put the monomeric mass at 50 kDa
    let monomers: Vec<MonomerRow> = ["A", "B"]
        .iter()
        .map(|id| MonomerRow {
            protein_id: id.to_string(),
            condition_id: "control".to_string(),
            replicate_id: "1".to_string(),
            monomer_sec_id: 45,
        })
        .collect();

    let without = assess(&features, &[], &proteins, &calibration(), &params());
    assert!(without
        .rows
        .iter()
        .all(|r| r.feature.label.is_decoy()));

    let with = assess(&features, &monomers, &proteins, &calibration(), &params());
    let target = with
        .rows
        .iter()
        .find(|r| !r.feature.label.is_decoy())
        .expect("monomer-informed mass should pass the ratio filter");
    assert!((target.mass_ratio - 3.0).abs() < 1e-9);
}

#[test]
fn qvalues_monotone_and_pvalues_present() {
    let mut proteins = Vec::new();
    let mut features = Vec::new();
    for i in 0..8 {
        let bait = format!("T{}", i);
        let prey = format!("U{}", i);
        proteins.push(protein(&bait, 10.0));
        proteins.push(protein(&prey, 10.0));
        features.push(feature(
            &bait,
            &prey,
            Label::Target,
            0.2 + (i as f64) * 0.1,
            20,
            0,
        ));
    }
    decoy_pool(&mut proteins, &mut features, 20);

    let outcome = assess(&features, &[], &proteins, &calibration(), &params());
    let mut targets: Vec<(f64, f64)> = outcome
        .rows
        .iter()
        .filter(|r| !r.feature.label.is_decoy())
        .map(|r| (r.pvalue, r.qvalue))
        .collect();
    assert_eq!(targets.len(), 8);
    for (p, q) in &targets {
        assert!(*p > 0.0 && *p <= 1.0);
        assert!(*q > 0.0 && *q <= 1.0);
    }
    targets.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    for window in targets.windows(2) {
        assert!(window[0].1 <= window[1].1 + 1e-12);
    }
}

#[test]
fn higher_score_never_has_larger_pvalue() {
    let mut proteins = vec![protein("HI", 10.0), protein("HJ", 10.0), protein("LO", 10.0), protein("LP", 10.0)];
    let mut features = vec![
        feature("HI", "HJ", Label::Target, 0.95, 20, 0),
        feature("LO", "LP", Label::Target, 0.10, 20, 0),
    ];
    decoy_pool(&mut proteins, &mut features, 15);

    let outcome = assess(&features, &[], &proteins, &calibration(), &params());
    let high = outcome.rows.iter().find(|r| r.feature.bait_id == "HI").unwrap();
    let low = outcome.rows.iter().find(|r| r.feature.bait_id == "LO").unwrap();
    assert!(high.pvalue < low.pvalue);
}

#[test]
fn tiny_decoy_null_degrades_conservatively() {
    let mut proteins = vec![protein("A", 10.0), protein("B", 10.0)];
    let mut features = vec![feature("A", "B", Label::Target, 0.9, 20, 0)];
    decoy_pool(&mut proteins, &mut features, 3);

    let outcome = assess(&features, &[], &proteins, &calibration(), &params());
    assert!(!outcome.warnings.is_empty(), "small null must surface a warning");
    for row in &outcome.rows {
        assert_eq!(row.pep, 1.0);
        assert!(row.qvalue > 0.0, "q-values must not collapse to zero");
        assert!(row.pvalue > 0.0);
    }
}
