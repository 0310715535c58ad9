use crate::core::models::atom::AtomRecord;
use crate::core::models::frame::Frame;
use nalgebra::Point3;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

/// Defines the interface for reading and writing topology file formats.
///
/// A topology carries the identity of every particle (name, residue, mass)
/// plus a single reference set of coordinates. Trajectory coordinates are the
/// business of [`TrajectoryFile`].
pub trait TopologyFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads the particle records from a buffered reader.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<AtomRecord>, Self::Error>;

    /// Writes particle records with reference coordinates to a writer.
    fn write_to(
        atoms: &[AtomRecord],
        positions: &[Point3<f64>],
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads the particle records from a file path.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<AtomRecord>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes particle records with reference coordinates to a file path.
    fn write_to_path<P: AsRef<Path>>(
        atoms: &[AtomRecord],
        positions: &[Point3<f64>],
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(atoms, positions, &mut writer)
    }
}

/// Defines the interface for reading and writing trajectory file formats.
pub trait TrajectoryFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads every frame of a trajectory.
    fn read_from(reader: &mut (impl Read + Seek)) -> Result<Vec<Frame>, Self::Error>;

    /// Writes every frame of a trajectory.
    fn write_to(frames: &[Frame], writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads every frame of a trajectory from a file path.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Frame>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes every frame of a trajectory to a file path.
    fn write_to_path<P: AsRef<Path>>(frames: &[Frame], path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(frames, &mut writer)
    }
}
