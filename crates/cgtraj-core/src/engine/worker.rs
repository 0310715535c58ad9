use super::aggregate::{PartialValueMap, PartialValues};
use super::blocks::BlockDescriptor;
use super::error::EngineError;
use super::measure::evaluate;
use super::progress::{Progress, ProgressReporter};
use super::resolver::{measurement_name, resolve_beads};
use crate::core::models::measurement::MeasurementKind;
use crate::core::models::universe::Universe;
use crate::core::registry::templates::ResidueTemplateRegistry;
use nalgebra::Point3;
use std::collections::HashSet;
use tracing::debug;

/// One precomputed measurement instance: the selection is residue- and
/// quantity-static, so it is resolved once at worker start; only the beads'
/// positions vary per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTask {
    pub name: String,
    pub kind: MeasurementKind,
    /// Topology indices of the resolved beads, in template order. May be
    /// shorter than the kind's arity when templates were dropped at a
    /// trajectory edge or a resolved name has no particle; such degenerate
    /// tasks evaluate to undefined on every frame.
    pub beads: Vec<usize>,
}

impl MeasurementTask {
    /// Whether this task can ever produce a value.
    pub fn is_degenerate(&self) -> bool {
        self.beads.len() != self.kind.arity()
    }
}

/// Enumerates every (measurement name x residue) selection the registry
/// defines over the universe, in deterministic registry order.
///
/// Duplicate resolved names collapse to a single task; identical resolved
/// bead sequences must accumulate into the same container exactly once per
/// frame.
pub fn build_tasks(
    universe: &Universe,
    templates: &ResidueTemplateRegistry,
) -> Vec<MeasurementTask> {
    let mut tasks = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (_res_key, template) in templates.iter() {
        let resids = universe.resids_with_resnames(&template.res_names);
        if resids.is_empty() {
            continue;
        }

        for kind in MeasurementKind::ALL {
            for group in template.groups(kind) {
                for &resid in &resids {
                    let resolved = resolve_beads(group, &resids, resid);
                    if resolved.is_empty() {
                        continue;
                    }
                    let name = measurement_name(&resolved);
                    if !seen.insert(name.clone()) {
                        continue;
                    }
                    let beads = resolved
                        .iter()
                        .filter_map(|bead_name| universe.particle_index(bead_name))
                        .collect();
                    tasks.push(MeasurementTask { name, kind, beads });
                }
            }
        }
    }
    tasks
}

/// Runs one block: streams the trajectory, evaluates every precomputed task
/// on the frames inside the block's range that satisfy the stride condition,
/// and returns the accumulated values keyed by measurement name.
///
/// The frame loop is a three-state sweep — frames before the range are
/// skipped, frames inside it are evaluated, and the first frame at or past
/// `stop` ends the sweep early without consuming the rest of the trajectory.
/// Value sequences are created lazily on the first defined result, so fully
/// skipped measurements leave no trace in the output map.
pub fn run_block(
    universe: &Universe,
    templates: &ResidueTemplateRegistry,
    descriptor: &BlockDescriptor,
    reporter: &ProgressReporter,
) -> Result<PartialValueMap, EngineError> {
    debug!(
        "Initiating block {} for frames {} through {} with stride {}",
        descriptor.block_id, descriptor.start, descriptor.stop, descriptor.stride
    );
    reporter.report(Progress::BlockStart {
        block_id: descriptor.block_id,
        start: descriptor.start,
        stop: descriptor.stop,
        stride: descriptor.stride,
    });

    let tasks = build_tasks(universe, templates);
    let mut accumulator = PartialValueMap::new();
    let mut positions: Vec<Point3<f64>> = Vec::with_capacity(4);

    for frame in universe.frames() {
        if frame.index >= descriptor.stop {
            break;
        }
        if frame.index < descriptor.start || frame.index % descriptor.stride != 0 {
            continue;
        }

        for task in &tasks {
            positions.clear();
            for &bead in &task.beads {
                let position =
                    frame
                        .position(bead)
                        .copied()
                        .ok_or(EngineError::CorruptFrame {
                            frame: frame.index,
                            particle: bead,
                        })?;
                positions.push(position);
            }

            if let Some(value) = evaluate(task.kind, &positions) {
                accumulator
                    .entry(task.name.clone())
                    .or_insert_with(|| PartialValues {
                        kind: task.kind,
                        values: Vec::new(),
                    })
                    .values
                    .push(value);
            }
        }
    }

    debug!("Block {} completed", descriptor.block_id);
    reporter.report(Progress::BlockFinish {
        block_id: descriptor.block_id,
    });
    Ok(accumulator)
}
