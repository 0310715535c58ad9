use crate::cli::MeasureArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use cgtraj::{
    core::models::universe::Universe,
    core::registry::templates::ResidueTemplateRegistry,
    engine::progress::ProgressReporter,
    workflows::{self, parameterize::MeasureConfig},
};
use tracing::{info, warn};

pub fn run(args: MeasureArgs) -> Result<()> {
    info!(
        "Loading structure from {:?} and trajectory from {:?}",
        &args.topology, &args.trajectory
    );
    let universe = Universe::open(&args.topology, &args.trajectory)?;
    let templates = ResidueTemplateRegistry::load(&args.templates)?;

    let config = MeasureConfig {
        max_frame: args.max_frame,
        stride: args.stride,
        block_count: args.blocks,
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting trajectory measurement...");
    let summary = workflows::parameterize::run(
        &universe,
        &templates,
        &config,
        &args.output_dir,
        &reporter,
    )?;

    if summary.containers == 0 {
        warn!("Workflow completed but recorded no measurements.");
        println!("Warning: no templated measurement matched the trajectory.");
    } else {
        println!(
            "✓ Wrote {} datasets ({} values) to: {}",
            summary.containers,
            summary.values,
            args.output_dir.display()
        );
        if summary.degenerate_selections > 0 {
            println!(
                "  {} selections fell outside valid residue ranges and were skipped.",
                summary.degenerate_selections
            );
        }
    }

    Ok(())
}
