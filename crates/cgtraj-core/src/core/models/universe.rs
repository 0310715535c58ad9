use super::atom::AtomRecord;
use super::frame::Frame;
use crate::core::io::dcd::DcdFile;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::{TopologyFile, TrajectoryFile};
use itertools::Itertools;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("Failed to read topology: {0}")]
    Topology(#[from] crate::core::io::pdb::PdbError),

    #[error("Failed to read trajectory: {0}")]
    Trajectory(#[from] crate::core::io::dcd::DcdError),

    #[error(
        "Frame {frame} carries {got} positions but the topology has {expected} particles"
    )]
    FrameSizeMismatch {
        frame: usize,
        got: usize,
        expected: usize,
    },
}

/// An immutable molecular universe: a topology plus the full trajectory,
/// loaded into memory.
///
/// The universe is strictly read-only once constructed. Iteration state lives
/// in the iterators handed out by [`Universe::frames`], so any number of
/// concurrent workers may stream the same trajectory independently without
/// corrupting each other's view.
#[derive(Debug, Clone)]
pub struct Universe {
    atoms: Vec<AtomRecord>,
    frames: Vec<Frame>,
    /// Particle name -> topology index. Coarse-grained bead names are unique
    /// by construction (they embed the residue index); for atomistic inputs
    /// the first particle with a given name wins.
    name_index: HashMap<String, usize>,
}

impl Universe {
    /// Builds a universe from in-memory parts, validating that every frame
    /// carries exactly one position per topology particle and renumbering
    /// frames densely from zero.
    pub fn from_parts(
        atoms: Vec<AtomRecord>,
        frames: Vec<Frame>,
    ) -> Result<Self, UniverseError> {
        for (i, frame) in frames.iter().enumerate() {
            if frame.positions.len() != atoms.len() {
                return Err(UniverseError::FrameSizeMismatch {
                    frame: i,
                    got: frame.positions.len(),
                    expected: atoms.len(),
                });
            }
        }
        let frames = frames
            .into_iter()
            .enumerate()
            .map(|(i, f)| Frame::new(i, f.positions))
            .collect();
        let name_index = atoms
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), i))
            .rev() // first occurrence wins
            .collect();
        Ok(Self {
            atoms,
            frames,
            name_index,
        })
    }

    /// Opens a universe from a PDB topology and a DCD trajectory.
    pub fn open(topology: &Path, trajectory: &Path) -> Result<Self, UniverseError> {
        let atoms = PdbFile::read_from_path(topology)?;
        let frames = DcdFile::read_from_path(trajectory)?;
        Self::from_parts(atoms, frames)
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Returns a fresh iterator over the trajectory in ascending frame order.
    /// Each call produces an independent view; callers never share iteration
    /// state.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// All residue indices whose residue name matches any of the given
    /// aliases, sorted and deduplicated.
    pub fn resids_with_resnames(&self, res_names: &[String]) -> Vec<isize> {
        self.atoms
            .iter()
            .filter(|a| res_names.iter().any(|n| *n == a.res_name))
            .map(|a| a.res_id)
            .sorted()
            .dedup()
            .collect()
    }

    /// Looks up a particle by its concrete name.
    pub fn particle_index(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }
}
