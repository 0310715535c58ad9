use super::aggregate::PartialValueMap;
use super::blocks::BlockDescriptor;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use super::worker::run_block;
use crate::core::models::universe::Universe;
use crate::core::registry::templates::ResidueTemplateRegistry;
use rayon::prelude::*;
use tracing::info;

/// Fans out one block worker per descriptor and collects their partial
/// results.
///
/// A single descriptor runs synchronously in the calling context with no
/// pool involvement. Otherwise workers run on the rayon pool, each building
/// its own frame iterator and its own accumulation map over the shared
/// read-only universe; results come back by value, so no worker ever locks.
///
/// The collect is a fork/join barrier: nothing is returned until every block
/// finishes, and the first worker error fails the whole run tagged with the
/// failing block's identifier. There is no partial-result salvage.
pub fn run_blocks(
    universe: &Universe,
    templates: &ResidueTemplateRegistry,
    descriptors: &[BlockDescriptor],
    reporter: &ProgressReporter,
) -> Result<Vec<PartialValueMap>, EngineError> {
    reporter.report(Progress::RunStart {
        blocks: descriptors.len() as u64,
    });

    let fail = |descriptor: &BlockDescriptor| {
        let block_id = descriptor.block_id;
        move |source: EngineError| EngineError::Block {
            block_id,
            source: Box::new(source),
        }
    };

    if let [descriptor] = descriptors {
        info!("Running a single block in the calling context");
        let partial =
            run_block(universe, templates, descriptor, reporter).map_err(fail(descriptor))?;
        return Ok(vec![partial]);
    }

    info!("Dispatching {} blocks to the worker pool", descriptors.len());
    descriptors
        .par_iter()
        .map(|descriptor| {
            run_block(universe, templates, descriptor, reporter).map_err(fail(descriptor))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomRecord;
    use crate::core::models::frame::Frame;
    use crate::engine::aggregate::merge;
    use crate::engine::blocks::partition;
    use nalgebra::Point3;

    fn bead_universe(frames: usize) -> Universe {
        let atoms = vec![
            AtomRecord::new("A11", "ALA", 1),
            AtomRecord::new("AB1", "ALA", 1),
        ];
        let frames = (0..frames)
            .map(|f| {
                Frame::new(
                    f,
                    vec![
                        Point3::new(0.0, 0.0, 0.0),
                        Point3::new(1.0 + f as f64, 0.0, 0.0),
                    ],
                )
            })
            .collect();
        Universe::from_parts(atoms, frames).unwrap()
    }

    fn bond_registry() -> ResidueTemplateRegistry {
        ResidueTemplateRegistry::from_toml_str(
            r#"
[ALA]
bonds = [["A10", "AB0"]]
"#,
        )
        .unwrap()
    }

    fn sorted_container_values(
        partials: Vec<PartialValueMap>,
        name: &str,
    ) -> Vec<f64> {
        let containers = merge(partials);
        let mut values = containers[name].values().to_vec();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values
    }

    #[test]
    fn multi_block_run_matches_single_block_run() {
        let universe = bead_universe(100);
        let templates = bond_registry();
        let reporter = ProgressReporter::new();

        let single = partition(100, 1, 1).unwrap();
        let single_partials = run_blocks(&universe, &templates, &single, &reporter).unwrap();
        let expected = sorted_container_values(single_partials, "A11_AB1");

        // Both even and uneven divisions of the frame range.
        for block_count in [2, 3, 7, 8] {
            let descriptors = partition(100, block_count, 1).unwrap();
            let partials = run_blocks(&universe, &templates, &descriptors, &reporter).unwrap();
            assert_eq!(partials.len(), block_count);
            assert_eq!(
                sorted_container_values(partials, "A11_AB1"),
                expected,
                "block_count={}",
                block_count
            );
        }
    }

    #[test]
    fn strided_multi_block_run_matches_single_block_run() {
        let universe = bead_universe(100);
        let templates = bond_registry();
        let reporter = ProgressReporter::new();

        let single = partition(100, 1, 5).unwrap();
        let single_partials = run_blocks(&universe, &templates, &single, &reporter).unwrap();
        let expected = sorted_container_values(single_partials, "A11_AB1");
        assert_eq!(expected.len(), 20);

        let descriptors = partition(100, 3, 5).unwrap();
        let partials = run_blocks(&universe, &templates, &descriptors, &reporter).unwrap();
        assert_eq!(sorted_container_values(partials, "A11_AB1"), expected);
    }

    #[test]
    fn every_frame_is_measured_exactly_once_across_blocks() {
        let universe = bead_universe(10);
        let templates = bond_registry();
        let reporter = ProgressReporter::new();

        let descriptors = partition(10, 3, 1).unwrap();
        let partials = run_blocks(&universe, &templates, &descriptors, &reporter).unwrap();
        let values = sorted_container_values(partials, "A11_AB1");

        let expected: Vec<f64> = (0..10).map(|f| 1.0 + f as f64).collect();
        assert_eq!(values, expected);
    }
}
