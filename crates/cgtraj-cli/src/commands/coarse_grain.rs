use crate::cli::CoarseGrainArgs;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use cgtraj::{
    core::io::{dcd::DcdFile, pdb::PdbFile, traits::TopologyFile, traits::TrajectoryFile},
    core::models::universe::Universe,
    core::registry::mapping::CoarseGrainMap,
    engine::progress::ProgressReporter,
    workflows,
};
use tracing::info;

pub fn run(args: CoarseGrainArgs) -> Result<()> {
    info!(
        "Loading structure from {:?} and trajectory from {:?}",
        &args.topology, &args.trajectory
    );
    let universe = Universe::open(&args.topology, &args.trajectory)?;

    let mapping = CoarseGrainMap::load(&args.mapping)?;
    let config = workflows::coarse_grain::CoarseGrainConfig {
        residues: args.residues.clone(),
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting coarse-graining...");
    let cg = workflows::coarse_grain::run(&universe, &mapping, &config, &reporter)?;
    info!(
        "Workflow finished: {} beads over {} frames.",
        cg.n_atoms(),
        cg.n_frames()
    );

    let reference = cg
        .frame(0)
        .ok_or_else(|| CliError::Argument("trajectory contains no frames".to_string()))?;

    std::fs::create_dir_all(&args.output_dir)?;
    let topology_path = args.output_dir.join(format!("{}.pdb", args.name));
    PdbFile::write_to_path(cg.atoms(), &reference.positions, &topology_path).map_err(|e| {
        CliError::FileParsing {
            path: topology_path.clone(),
            source: e.into(),
        }
    })?;

    let trajectory_path = args.output_dir.join(format!("{}.dcd", args.name));
    let frames: Vec<_> = cg.frames().cloned().collect();
    DcdFile::write_to_path(&frames, &trajectory_path).map_err(|e| CliError::FileParsing {
        path: trajectory_path.clone(),
        source: e.into(),
    })?;

    println!(
        "✓ Coarse-grained {} beads over {} frames:",
        cg.n_atoms(),
        cg.n_frames()
    );
    println!("  Topology:   {}", topology_path.display());
    println!("  Trajectory: {}", trajectory_path.display());

    Ok(())
}
