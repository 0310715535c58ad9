use crate::core::models::atom::AtomRecord;
use crate::core::models::frame::Frame;
use crate::core::models::universe::Universe;
use crate::core::registry::mapping::{CoarseGrainMap, MappingError, one_letter_code};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::{Point3, Vector3};
use tracing::{info, instrument};

/// Run parameters for the coarse-graining workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoarseGrainConfig {
    /// Residue names to collapse into beads; residues outside this list are
    /// dropped from the output.
    pub residues: Vec<String>,
}

/// One bead definition: the topology indices it averages over, resolved once
/// before any frame is touched.
#[derive(Debug, Clone)]
struct BeadDef {
    record: AtomRecord,
    members: Vec<usize>,
    total_mass: f64,
}

/// Collapses each mapped residue segment into a single bead positioned at
/// the segment's mass-weighted center, frame by frame, producing a new
/// coarse-grained universe.
///
/// A selected residue missing from the mapping, or one without a one-letter
/// code, is a fatal configuration error surfaced before any frame is
/// processed.
#[instrument(skip_all, name = "coarse_grain_workflow")]
pub fn run(
    universe: &Universe,
    mapping: &CoarseGrainMap,
    config: &CoarseGrainConfig,
    reporter: &ProgressReporter,
) -> Result<Universe, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Coarse-graining",
    });

    let beads = build_beads(universe, mapping, &config.residues)?;
    info!(
        "Collapsing {} residues into {} beads over {} frames",
        config.residues.len(),
        beads.len(),
        universe.n_frames()
    );

    let atoms: Vec<AtomRecord> = beads.iter().map(|b| b.record.clone()).collect();
    let frames: Vec<Frame> = universe
        .frames()
        .map(|frame| {
            let positions = beads
                .iter()
                .map(|bead| center_of_mass(universe, frame, bead))
                .collect();
            Frame::new(frame.index, positions)
        })
        .collect();

    reporter.report(Progress::PhaseFinish);
    let cg = Universe::from_parts(atoms, frames)?;
    Ok(cg)
}

fn build_beads(
    universe: &Universe,
    mapping: &CoarseGrainMap,
    residues: &[String],
) -> Result<Vec<BeadDef>, EngineError> {
    let mut beads = Vec::new();

    for res_name in residues {
        let segments = mapping.segments(res_name)?;
        let code = one_letter_code(res_name)
            .ok_or_else(|| MappingError::UnknownResidueCode(res_name.clone()))?;
        let resids = universe.resids_with_resnames(std::slice::from_ref(res_name));

        for resid in resids {
            for (segment, member_names) in segments {
                let members: Vec<usize> = universe
                    .atoms()
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| {
                        a.res_name == *res_name
                            && a.res_id == resid
                            && member_names.contains(&a.name)
                    })
                    .map(|(i, _)| i)
                    .collect();
                if members.is_empty() {
                    continue;
                }

                let total_mass: f64 = members.iter().map(|&i| universe.atoms()[i].mass).sum();
                let segment_initial = segment.chars().next().unwrap_or('?');
                let name = format!("{}{}{}", code, segment_initial, resid);
                beads.push(BeadDef {
                    record: AtomRecord::new(name, res_name.clone(), resid)
                        .with_mass(total_mass),
                    members,
                    total_mass,
                });
            }
        }
    }
    Ok(beads)
}

fn center_of_mass(universe: &Universe, frame: &Frame, bead: &BeadDef) -> Point3<f64> {
    let weighted: Vector3<f64> = bead
        .members
        .iter()
        .map(|&i| {
            let mass = universe.atoms()[i].mass;
            frame.positions[i].coords * mass
        })
        .sum();
    Point3::from(weighted / bead.total_mass)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atomistic_universe() -> Universe {
        // One ALA residue of two equal-mass atoms plus one unmapped water.
        let atoms = vec![
            AtomRecord::new("N", "ALA", 1).with_mass(2.0),
            AtomRecord::new("CA", "ALA", 1).with_mass(2.0),
            AtomRecord::new("OH2", "TIP3", 2).with_mass(18.0),
        ];
        let frames = vec![
            Frame::new(
                0,
                vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(2.0, 0.0, 0.0),
                    Point3::new(9.0, 9.0, 9.0),
                ],
            ),
            Frame::new(
                1,
                vec![
                    Point3::new(0.0, 4.0, 0.0),
                    Point3::new(2.0, 0.0, 0.0),
                    Point3::new(9.0, 9.0, 9.0),
                ],
            ),
        ];
        Universe::from_parts(atoms, frames).unwrap()
    }

    fn mapping() -> CoarseGrainMap {
        CoarseGrainMap::from_toml_str(
            r#"
[ALA]
B = ["N", "CA"]
"#,
        )
        .unwrap()
    }

    fn config() -> CoarseGrainConfig {
        CoarseGrainConfig {
            residues: vec!["ALA".to_string()],
        }
    }

    #[test]
    fn beads_sit_at_the_center_of_mass_every_frame() {
        let universe = atomistic_universe();
        let reporter = ProgressReporter::new();
        let cg = run(&universe, &mapping(), &config(), &reporter).unwrap();

        assert_eq!(cg.n_atoms(), 1);
        assert_eq!(cg.n_frames(), 2);
        assert_eq!(cg.frame(0).unwrap().positions[0], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(cg.frame(1).unwrap().positions[0], Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn bead_names_encode_code_segment_and_resid() {
        let universe = atomistic_universe();
        let reporter = ProgressReporter::new();
        let cg = run(&universe, &mapping(), &config(), &reporter).unwrap();

        let bead = &cg.atoms()[0];
        assert_eq!(bead.name, "AB1");
        assert_eq!(bead.res_name, "ALA");
        assert_eq!(bead.res_id, 1);
        assert_eq!(bead.mass, 4.0);
    }

    #[test]
    fn unmapped_residues_are_excluded_from_the_output() {
        let universe = atomistic_universe();
        let reporter = ProgressReporter::new();
        let cg = run(&universe, &mapping(), &config(), &reporter).unwrap();
        assert!(cg.particle_index("OH2").is_none());
    }

    #[test]
    fn residue_missing_from_mapping_is_fatal() {
        let universe = atomistic_universe();
        let reporter = ProgressReporter::new();
        let bad_config = CoarseGrainConfig {
            residues: vec!["TIP3".to_string()],
        };
        let result = run(&universe, &mapping(), &bad_config, &reporter);
        assert!(matches!(
            result,
            Err(EngineError::Mapping {
                source: MappingError::MissingResidue(_)
            })
        ));
    }

    #[test]
    fn unequal_masses_weight_the_center() {
        let atoms = vec![
            AtomRecord::new("N", "ALA", 1).with_mass(1.0),
            AtomRecord::new("CA", "ALA", 1).with_mass(3.0),
        ];
        let frames = vec![Frame::new(
            0,
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0)],
        )];
        let universe = Universe::from_parts(atoms, frames).unwrap();
        let reporter = ProgressReporter::new();

        let cg = run(&universe, &mapping(), &config(), &reporter).unwrap();
        assert_eq!(cg.frame(0).unwrap().positions[0], Point3::new(3.0, 0.0, 0.0));
    }
}
