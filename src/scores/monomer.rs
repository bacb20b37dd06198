//! Monomer peak detection against the SEC calibration curve.

use crate::profile::{Calibration, ProfileIndex};
use crate::schema::{MonomerRow, ProteinRow};

/// Locate the monomeric elution fraction per (protein, condition, replicate).
///
/// Fractions whose calibrated mass reaches `complex_threshold_factor` times
/// the protein's monomeric mass elute as assemblies and are never called
/// monomer. Among the remaining fractions with signal, the intensity apex
/// wins; ties break toward the fraction whose calibrated mass is closest to
/// the monomeric mass, then toward the later fraction. Proteins without a
/// qualifying fraction are omitted.
pub fn detect_monomers(
    proteins: &[ProteinRow],
    profiles: &ProfileIndex,
    calibration: &Calibration,
    complex_threshold_factor: f64,
) -> Vec<MonomerRow> {
    let mut out = Vec::new();
    for protein in proteins {
        if protein.protein_mw <= 0.0 {
            continue;
        }
        for tag in calibration.tags() {
            let Some(profile) = profiles.get(&protein.protein_id, tag) else {
                continue;
            };
            let peptide_count = profile.peptides.len();

            // (intensity, mass distance to monomer, sec_id)
            let mut best: Option<(f64, f64, u32)> = None;
            for sec_id in profile.observed_fractions() {
                let Some(mass) = calibration.mass(tag, sec_id) else {
                    continue;
                };
                if mass >= complex_threshold_factor * protein.protein_mw {
                    continue;
                }
                let intensity = profile.summed_intensity(sec_id, peptide_count);
                if intensity <= 0.0 {
                    continue;
                }
                let distance = (mass - protein.protein_mw).abs();
                let better = match best {
                    None => true,
                    Some((best_intensity, best_distance, best_sec)) => {
                        intensity > best_intensity
                            || (intensity == best_intensity && distance < best_distance)
                            || (intensity == best_intensity
                                && distance == best_distance
                                && sec_id > best_sec)
                    }
                };
                if better {
                    best = Some((intensity, distance, sec_id));
                }
            }

            if let Some((_, _, monomer_sec_id)) = best {
                out.push(MonomerRow {
                    protein_id: protein.protein_id.clone(),
                    condition_id: tag.0.clone(),
                    replicate_id: tag.1.clone(),
                    monomer_sec_id,
                });
            }
        }
    }
    out
}
