use crate::core::models::measurement::MeasurementKind;
use crate::core::models::universe::Universe;
use crate::core::registry::templates::ResidueTemplateRegistry;
use crate::engine::aggregate::merge;
use crate::engine::blocks::partition;
use crate::engine::dispatch::run_blocks;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::worker::build_tasks;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Run parameters for the measurement workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureConfig {
    /// Cap on the number of frames considered; `None` means the whole
    /// trajectory.
    pub max_frame: Option<usize>,
    /// Sampling stride over absolute frame indices.
    pub stride: usize,
    /// Number of parallel blocks the frame range is divided into.
    pub block_count: usize,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            max_frame: None,
            stride: 1,
            block_count: 1,
        }
    }
}

/// Advisory summary of a completed measurement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureSummary {
    /// Number of measurement datasets written.
    pub containers: usize,
    /// Total number of sampled values across all datasets.
    pub values: usize,
    /// Selections that can never evaluate because beads were dropped at
    /// trajectory edges. Diagnostic only; such selections produce no output
    /// file and no error.
    pub degenerate_selections: usize,
}

/// Measures every templated quantity over the trajectory and writes one
/// dataset file per measurement name into `output_dir`.
///
/// Configuration problems (zero block count or stride, unreadable output
/// directory) surface before any parallel work starts; a worker failure
/// aborts the whole run.
#[instrument(skip_all, name = "parameterize_workflow")]
pub fn run(
    universe: &Universe,
    templates: &ResidueTemplateRegistry,
    config: &MeasureConfig,
    output_dir: &Path,
    reporter: &ProgressReporter,
) -> Result<MeasureSummary, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Measurement",
    });

    let total_frames = match config.max_frame {
        Some(max) => universe.n_frames().min(max),
        None => universe.n_frames(),
    };
    let descriptors = partition(total_frames, config.block_count, config.stride)?;

    log_measurement_plan(universe, templates, total_frames);
    let degenerate_selections = build_tasks(universe, templates)
        .iter()
        .filter(|t| t.is_degenerate())
        .count();
    if degenerate_selections > 0 {
        debug!(
            "{} selections fall outside valid residue ranges and will be skipped",
            degenerate_selections
        );
    }

    let partials = run_blocks(universe, templates, &descriptors, reporter)?;
    let containers = merge(partials);
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Export" });
    info!(
        "Exporting {} measurement datasets to {}",
        containers.len(),
        output_dir.display()
    );
    std::fs::create_dir_all(output_dir).map_err(|e| EngineError::Output {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let mut values = 0;
    for container in containers.values() {
        values += container.values().len();
        let path = output_dir.join(format!("{}.dat", container.name()));
        container
            .write_to_path(&path)
            .map_err(|e| EngineError::Output { path, source: e })?;
    }
    reporter.report(Progress::Message(format!(
        "{} datasets written to {}",
        containers.len(),
        output_dir.display()
    )));
    reporter.report(Progress::PhaseFinish);

    Ok(MeasureSummary {
        containers: containers.len(),
        values,
        degenerate_selections,
    })
}

fn log_measurement_plan(
    universe: &Universe,
    templates: &ResidueTemplateRegistry,
    total_frames: usize,
) {
    for (res_key, template) in templates.iter() {
        let res_count = universe.resids_with_resnames(&template.res_names).len();
        for kind in MeasurementKind::ALL {
            let group_count = template.groups(kind).len();
            if group_count > 0 {
                info!(
                    "Measuring {} {} {}s in {} residues over {} frames",
                    group_count, res_key, kind, res_count, total_frames
                );
            }
        }
    }
}
