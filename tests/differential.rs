use coelute::profile::ProfileIndex;
use coelute::schema::{
    Entity, FeatureRow, Label, MonomerRow, PeptideMetaRow, QuantEntry, QuantRow, ScoredRow, SecRow,
};
use coelute::scores::quantify::{build_matrix, test_differential};

fn entry(entity: Entity, condition: &str, replicate: &str, value: f64) -> QuantEntry {
    QuantEntry {
        entity,
        condition_id: condition.to_string(),
        replicate_id: replicate.to_string(),
        value,
    }
}

fn node(protein: &str) -> Entity {
    Entity::Node {
        protein_id: protein.to_string(),
    }
}

fn edge(bait: &str, prey: &str) -> Entity {
    Entity::Edge {
        bait_id: bait.to_string(),
        prey_id: prey.to_string(),
    }
}

fn shifted_matrix() -> Vec<QuantEntry> {
    let mut matrix = Vec::new();
    for (replicate, low, high) in [("1", 10.0, 100.0), ("2", 11.0, 110.0), ("3", 12.0, 120.0)] {
        matrix.push(entry(node("X"), "control", replicate, low));
        matrix.push(entry(node("X"), "treated", replicate, high));
        matrix.push(entry(edge("X", "Y"), "control", replicate, low * 2.0));
        matrix.push(entry(edge("X", "Y"), "treated", replicate, high * 2.0));
    }
    matrix
}

#[test]
fn tables_are_populated_per_condition_pair() {
    let tables = test_differential(&shifted_matrix());
    assert_eq!(tables.node.len(), 1);
    assert_eq!(tables.edge.len(), 1);
    assert_eq!(tables.edge_directional.len(), 1);
    // one row per matched replicate
    assert_eq!(tables.node_level.len(), 3);
    assert_eq!(tables.edge_level.len(), 3);

    let row = &tables.node[0];
    assert_eq!(row.condition_1, "control");
    assert_eq!(row.condition_2, "treated");
    assert!(row.pvalue > 0.0 && row.pvalue <= 1.0);
    assert!(row.qvalue > 0.0 && row.qvalue <= 1.0);
    assert!(row.level.is_none());
}

#[test]
fn symmetric_test_invariant_to_condition_order() {
    let matrix = shifted_matrix();
    let mut swapped = matrix.clone();
    for entry in &mut swapped {
        entry.condition_id = match entry.condition_id.as_str() {
            "control" => "treated".to_string(),
            _ => "control".to_string(),
        };
    }
    let forward = test_differential(&matrix);
    let reverse = test_differential(&swapped);
    assert!((forward.node[0].pvalue - reverse.node[0].pvalue).abs() < 1e-12);
    assert!((forward.edge[0].pvalue - reverse.edge[0].pvalue).abs() < 1e-12);
}

#[test]
fn directional_rows_carry_fold_change_sign() {
    let tables = test_differential(&shifted_matrix());
    let row = &tables.edge_directional[0];
    // condition_1 (control) is lower, so log2fc is negative
    let log2fc = row.log2fc.expect("directional rows carry log2fc");
    assert!(log2fc < 0.0);
}

#[test]
fn level_rows_tag_the_replicate() {
    let tables = test_differential(&shifted_matrix());
    let mut levels: Vec<String> = tables
        .node_level
        .iter()
        .map(|r| r.level.clone().expect("level rows carry the replicate id"))
        .collect();
    levels.sort();
    assert_eq!(levels, vec!["1", "2", "3"]);
    for row in &tables.node_level {
        // ~10x shift against mild within-condition variation
        assert!(row.statistic < -3.0);
        assert!(row.pvalue > 0.0 && row.pvalue < 0.5);
    }
}

#[test]
fn entities_missing_one_condition_are_skipped() {
    let matrix = vec![
        entry(node("ONLY_CONTROL"), "control", "1", 5.0),
        entry(node("ONLY_CONTROL"), "control", "2", 6.0),
        entry(node("BOTH"), "control", "1", 5.0),
        entry(node("BOTH"), "control", "2", 6.0),
        entry(node("BOTH"), "treated", "1", 50.0),
        entry(node("BOTH"), "treated", "2", 60.0),
    ];
    let tables = test_differential(&matrix);
    assert_eq!(tables.node.len(), 1);
    assert!(matches!(
        &tables.node[0].entity,
        Entity::Node { protein_id } if protein_id == "BOTH"
    ));
}

fn sec_rows() -> Vec<SecRow> {
    (10..=40)
        .map(|sec_id| SecRow {
            run_id: format!("run{}", sec_id),
            sec_id,
            sec_mw: 500.0 - 10.0 * sec_id as f64,
            condition_id: "control".to_string(),
            replicate_id: "1".to_string(),
        })
        .collect()
}

fn quant(protein_id: &str, peptide_id: &str, points: &[(u32, f64)]) -> Vec<QuantRow> {
    points
        .iter()
        .map(|&(sec_id, peptide_intensity)| QuantRow {
            run_id: format!("run{}", sec_id),
            protein_id: protein_id.to_string(),
            peptide_id: peptide_id.to_string(),
            peptide_intensity,
        })
        .collect()
}

fn scored(bait: &str, prey: &str, label: Label) -> ScoredRow {
    ScoredRow {
        feature: FeatureRow {
            bait_id: bait.to_string(),
            prey_id: prey.to_string(),
            label,
            condition_id: "control".to_string(),
            replicate_id: "1".to_string(),
            mic: 0.9,
            tic: 0.9,
            score: 0.9,
            bait_peptides: 1,
            prey_peptides: 1,
            overlap: 10,
            apex_sec_id: 20,
            bait_apex_sec_id: 20,
            prey_apex_sec_id: 20,
        },
        mass_ratio: 1.0,
        pvalue: 0.01,
        qvalue: 0.01,
        pep: 0.05,
    }
}

fn monomer(protein: &str, sec_id: u32) -> MonomerRow {
    MonomerRow {
        protein_id: protein.to_string(),
        condition_id: "control".to_string(),
        replicate_id: "1".to_string(),
        monomer_sec_id: sec_id,
    }
}

#[test]
fn matrix_sums_only_the_complex_region() {
    let sec = sec_rows();
    let mut rows = quant("X", "X_p1", &[(20, 50.0), (30, 100.0), (35, 10.0)]);
    rows.extend(quant("Y", "Y_p1", &[(20, 30.0), (28, 40.0)]));
    let meta = vec![
        PeptideMetaRow {
            peptide_id: "X_p1".to_string(),
            peptide_rank: 1,
        },
        PeptideMetaRow {
            peptide_id: "Y_p1".to_string(),
            peptide_rank: 1,
        },
    ];
    let profiles = ProfileIndex::build(&rows, &sec, &meta);
    let monomers = vec![monomer("X", 30), monomer("Y", 28)];
    let scored_rows = vec![scored("X", "Y", Label::Target)];
    let tags = vec![("control".to_string(), "1".to_string())];

    let matrix = build_matrix(&scored_rows, &monomers, &profiles, &tags);

    // node X: only fraction 20 sits left of the monomer at 30
    let x = matrix
        .iter()
        .find(|e| matches!(&e.entity, Entity::Node { protein_id } if protein_id == "X"))
        .unwrap();
    assert_eq!(x.value, 50.0);

    // node Y: only fraction 20
    let y = matrix
        .iter()
        .find(|e| matches!(&e.entity, Entity::Node { protein_id } if protein_id == "Y"))
        .unwrap();
    assert_eq!(y.value, 30.0);

    // edge: shared complex fraction 20 sums both proteins
    let xy = matrix
        .iter()
        .find(|e| matches!(&e.entity, Entity::Edge { .. }))
        .unwrap();
    assert_eq!(xy.value, 80.0);
}

#[test]
fn decoy_interactions_never_enter_the_matrix() {
    let sec = sec_rows();
    let mut rows = quant("X", "X_p1", &[(20, 50.0)]);
    rows.extend(quant("Y", "Y_p1", &[(20, 30.0)]));
    let meta = vec![
        PeptideMetaRow {
            peptide_id: "X_p1".to_string(),
            peptide_rank: 1,
        },
        PeptideMetaRow {
            peptide_id: "Y_p1".to_string(),
            peptide_rank: 1,
        },
    ];
    let profiles = ProfileIndex::build(&rows, &sec, &meta);
    let scored_rows = vec![scored("X", "Y", Label::Decoy)];
    let tags = vec![("control".to_string(), "1".to_string())];

    let matrix = build_matrix(&scored_rows, &[], &profiles, &tags);
    assert!(matrix.is_empty());
}

#[test]
fn missing_monomer_baseline_counts_all_fractions() {
    let sec = sec_rows();
    let rows = quant("X", "X_p1", &[(20, 50.0), (30, 100.0)]);
    let meta = vec![PeptideMetaRow {
        peptide_id: "X_p1".to_string(),
        peptide_rank: 1,
    }];
    let profiles = ProfileIndex::build(&rows, &sec, &meta);
    let scored_rows = vec![scored("X", "X2", Label::Target)];
    let tags = vec![("control".to_string(), "1".to_string())];

    let matrix = build_matrix(&scored_rows, &[], &profiles, &tags);
    let x = matrix
        .iter()
        .find(|e| matches!(&e.entity, Entity::Node { protein_id } if protein_id == "X"))
        .unwrap();
    assert_eq!(x.value, 150.0);
}
