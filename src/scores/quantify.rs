//! Complex-region quantification and cross-condition differential testing.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::math::fdr::{empirical_pvalue, pi0_lambda_sweep, qvalues};
use crate::math::mwu::{mann_whitney_u, Alternative};
use crate::math::stats::mean;
use crate::profile::{ProfileIndex, Tag};
use crate::schema::{
    DifferentialRow, DifferentialTables, Entity, MonomerRow, QuantEntry, ScoredRow,
};

/// Aggregate complex-bound signal per entity and (condition, replicate).
///
/// The complex region of a protein is the higher-mass side of its monomer
/// peak (`sec_id < monomer_sec_id`); without a monomer baseline the whole
/// observed profile counts. Edge values sum both proteins over the
/// intersection of their complex regions. Entities without signal produce
/// no row.
pub fn build_matrix(
    scored: &[ScoredRow],
    monomers: &[MonomerRow],
    profiles: &ProfileIndex,
    tags: &[Tag],
) -> Vec<QuantEntry> {
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

    let mut entities: BTreeSet<Entity> = BTreeSet::new();
    for row in scored.iter().filter(|r| !r.feature.label.is_decoy()) {
        entities.insert(Entity::Edge {
            bait_id: row.feature.bait_id.clone(),
            prey_id: row.feature.prey_id.clone(),
        });
        entities.insert(Entity::Node {
            protein_id: row.feature.bait_id.clone(),
        });
        entities.insert(Entity::Node {
            protein_id: row.feature.prey_id.clone(),
        });
    }

    let complex_region = |protein_id: &str, tag: &Tag| -> Option<Vec<u32>> {
        let profile = profiles.get(protein_id, tag)?;
        let boundary = monomer_sec
            .get(&(protein_id, tag.0.as_str(), tag.1.as_str()))
            .copied();
        let fractions: Vec<u32> = profile
            .observed_fractions()
            .into_iter()
            .filter(|&sec_id| boundary.map_or(true, |monomer| sec_id < monomer))
            .collect();
        Some(fractions)
    };

    let region_value = |protein_id: &str, tag: &Tag, fractions: &[u32]| -> f64 {
        let Some(profile) = profiles.get(protein_id, tag) else {
            return 0.0;
        };
        let peptide_count = profile.peptides.len();
        fractions
            .iter()
            .map(|&sec_id| profile.summed_intensity(sec_id, peptide_count))
            .sum()
    };

    let mut out = Vec::new();
    for entity in &entities {
        for tag in tags {
            let value = match entity {
                Entity::Node { protein_id } => {
                    let Some(region) = complex_region(protein_id, tag) else {
                        continue;
                    };
                    region_value(protein_id, tag, &region)
                }
                Entity::Edge { bait_id, prey_id } => {
                    let (Some(bait_region), Some(prey_region)) =
                        (complex_region(bait_id, tag), complex_region(prey_id, tag))
                    else {
                        continue;
                    };
                    let prey_set: BTreeSet<u32> = prey_region.into_iter().collect();
                    let shared: Vec<u32> = bait_region
                        .into_iter()
                        .filter(|sec_id| prey_set.contains(sec_id))
                        .collect();
                    region_value(bait_id, tag, &shared) + region_value(prey_id, tag, &shared)
                }
            };
            if value > 0.0 {
                out.push(QuantEntry {
                    entity: entity.clone(),
                    condition_id: tag.0.clone(),
                    replicate_id: tag.1.clone(),
                    value,
                });
            }
        }
    }
    out
}

/// Cross-condition differential tests over the quantitative matrix.
///
/// For every unordered condition pair: a symmetric two-sided Mann-Whitney
/// comparison per entity (`edge`/`node`), a directional one-sided variant
/// retaining the fold-change sign (`edge_directional`), and per-replicate
/// fold-change rows tested against the pooled within-condition
/// replicate-variation null (`edge_level`/`node_level`). The pi0/q-value
/// correction runs independently within each table.
pub fn test_differential(matrix: &[QuantEntry]) -> DifferentialTables {
    // entity -> condition -> replicate -> value
    let mut values: BTreeMap<&Entity, BTreeMap<&str, BTreeMap<&str, f64>>> = BTreeMap::new();
    let mut conditions: BTreeSet<&str> = BTreeSet::new();
    for entry in matrix {
        conditions.insert(entry.condition_id.as_str());
        values
            .entry(&entry.entity)
            .or_default()
            .entry(entry.condition_id.as_str())
            .or_default()
            .insert(entry.replicate_id.as_str(), entry.value);
    }
    let conditions: Vec<&str> = conditions.into_iter().collect();

    let null = within_condition_null(&values);

    let mut tables = DifferentialTables::default();
    for (i, &condition_1) in conditions.iter().enumerate() {
        for &condition_2 in &conditions[i + 1..] {
            for (entity, by_condition) in &values {
                let (Some(group_1), Some(group_2)) =
                    (by_condition.get(condition_1), by_condition.get(condition_2))
                else {
                    continue;
                };
                let x: Vec<f64> = group_1.values().copied().collect();
                let y: Vec<f64> = group_2.values().copied().collect();

                let symmetric = mann_whitney_u(&x, &y, Alternative::TwoSided);
                let directional = mann_whitney_u(&x, &y, Alternative::Greater);
                let log2fc = fold_change(&x, &y);

                if let Some(result) = symmetric {
                    let row = DifferentialRow {
                        condition_1: condition_1.to_string(),
                        condition_2: condition_2.to_string(),
                        entity: (*entity).clone(),
                        statistic: result.u,
                        pvalue: result.pvalue,
                        qvalue: 1.0,
                        log2fc: None,
                        level: None,
                    };
                    match entity {
                        Entity::Edge { .. } => tables.edge.push(row),
                        Entity::Node { .. } => tables.node.push(row),
                    }
                }

                if let (Entity::Edge { .. }, Some(result), Some(log2fc)) =
                    (entity, directional, log2fc)
                {
                    tables.edge_directional.push(DifferentialRow {
                        condition_1: condition_1.to_string(),
                        condition_2: condition_2.to_string(),
                        entity: (*entity).clone(),
                        statistic: result.u,
                        pvalue: result.pvalue,
                        qvalue: 1.0,
                        log2fc: Some(log2fc),
                        level: None,
                    });
                }

                // matched replicates, one row per shared replicate id
                for (replicate, &value_1) in group_1.iter() {
                    let Some(&value_2) = group_2.get(replicate) else {
                        continue;
                    };
                    if value_1 <= 0.0 || value_2 <= 0.0 {
                        continue;
                    }
                    let ratio = (value_1 / value_2).log2();
                    let pvalue = empirical_pvalue(ratio.abs(), &null);
                    let row = DifferentialRow {
                        condition_1: condition_1.to_string(),
                        condition_2: condition_2.to_string(),
                        entity: (*entity).clone(),
                        statistic: ratio,
                        pvalue,
                        qvalue: 1.0,
                        log2fc: Some(ratio),
                        level: Some(replicate.to_string()),
                    };
                    match entity {
                        Entity::Edge { .. } => tables.edge_level.push(row),
                        Entity::Node { .. } => tables.node_level.push(row),
                    }
                }
            }
        }
    }

    for table in [
        &mut tables.edge_directional,
        &mut tables.edge,
        &mut tables.edge_level,
        &mut tables.node,
        &mut tables.node_level,
    ] {
        correct_table(table);
    }
    tables
}

/// Pooled |log2 ratio| of every within-condition replicate pair: the null
/// for per-replicate fold changes.
fn within_condition_null(
    values: &BTreeMap<&Entity, BTreeMap<&str, BTreeMap<&str, f64>>>,
) -> Vec<f64> {
    let mut null = Vec::new();
    for by_condition in values.values() {
        for by_replicate in by_condition.values() {
            let replicate_values: Vec<f64> = by_replicate.values().copied().collect();
            for (i, &a) in replicate_values.iter().enumerate() {
                for &b in &replicate_values[i + 1..] {
                    if a > 0.0 && b > 0.0 {
                        null.push((a / b).log2().abs());
                    }
                }
            }
        }
    }
    null.sort_by(|a, b| a.partial_cmp(b).unwrap());
    null
}

fn fold_change(x: &[f64], y: &[f64]) -> Option<f64> {
    let mean_x = mean(x);
    let mean_y = mean(y);
    if mean_x <= 0.0 || mean_y <= 0.0 {
        return None;
    }
    Some((mean_x / mean_y).log2())
}

fn correct_table(table: &mut [DifferentialRow]) {
    if table.is_empty() {
        return;
    }
    let pvals: Vec<f64> = table.iter().map(|r| r.pvalue).collect();
    let pi0 = pi0_lambda_sweep(&pvals);
    let qvals = qvalues(&pvals, pi0);
    for (row, q) in table.iter_mut().zip(qvals) {
        row.qvalue = q;
    }
}
