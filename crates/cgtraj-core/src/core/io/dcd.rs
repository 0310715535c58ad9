use crate::core::io::traits::TrajectoryFile;
use crate::core::models::frame::Frame;
use nalgebra::Point3;
use std::io::{self, Read, Seek, SeekFrom, Write};
use thiserror::Error;

const HEADER_BLOCK_SIZE: i32 = 84;
const TITLE_WIDTH: usize = 80;
const CHARMM_VERSION: i32 = 24;

#[derive(Debug, Error)]
pub enum DcdError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid DCD header: {0}")]
    InvalidHeader(String),

    #[error("Truncated trajectory: expected {expected} frames, found {found}")]
    Truncated { expected: usize, found: usize },
}

/// Reader and writer for CHARMM/NAMD-style DCD binary trajectories.
///
/// The reader detects endianness from the leading Fortran record marker
/// (always 84 for a well-formed header) and tolerates files whose header
/// advertises zero frames by reading until end of stream. The writer always
/// emits little-endian CHARMM-format files without unit cell records.
pub struct DcdFile;

struct DcdHeader {
    n_frames: usize,
    n_atoms: usize,
    has_unit_cell: bool,
    big_endian: bool,
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), DcdError> {
    reader.read_exact(buf)?;
    Ok(())
}

fn read_i32<R: Read>(reader: &mut R, big_endian: bool) -> Result<i32, DcdError> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf)?;
    Ok(if big_endian {
        i32::from_be_bytes(buf)
    } else {
        i32::from_le_bytes(buf)
    })
}

fn read_f32<R: Read>(reader: &mut R, big_endian: bool) -> Result<f32, DcdError> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf)?;
    Ok(if big_endian {
        f32::from_be_bytes(buf)
    } else {
        f32::from_le_bytes(buf)
    })
}

fn detect_endianness<R: Read + Seek>(reader: &mut R) -> Result<bool, DcdError> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf)?;
    reader.seek(SeekFrom::Current(-4))?;

    if i32::from_le_bytes(buf) == HEADER_BLOCK_SIZE {
        Ok(false)
    } else if i32::from_be_bytes(buf) == HEADER_BLOCK_SIZE {
        Ok(true)
    } else {
        Err(DcdError::InvalidHeader(format!(
            "first record marker is {} (LE) / {} (BE), expected {}",
            i32::from_le_bytes(buf),
            i32::from_be_bytes(buf),
            HEADER_BLOCK_SIZE
        )))
    }
}

fn read_header<R: Read + Seek>(reader: &mut R) -> Result<DcdHeader, DcdError> {
    let big_endian = detect_endianness(reader)?;

    let block = read_i32(reader, big_endian)?;
    if block != HEADER_BLOCK_SIZE {
        return Err(DcdError::InvalidHeader(format!(
            "header block size is {}",
            block
        )));
    }

    let mut magic = [0u8; 4];
    read_exact(reader, &mut magic)?;
    if &magic != b"CORD" {
        return Err(DcdError::InvalidHeader(format!(
            "magic is {:?}, expected CORD",
            magic
        )));
    }

    let n_frames = read_i32(reader, big_endian)?;
    if n_frames < 0 {
        return Err(DcdError::InvalidHeader(format!(
            "negative frame count {}",
            n_frames
        )));
    }
    // icntrl[1..8]: start timestep, interval, total steps, four unused,
    // fixed-atom count. None of it affects geometry extraction.
    for _ in 0..8 {
        let _ = read_i32(reader, big_endian)?;
    }
    let _timestep = read_f32(reader, big_endian)?;
    let has_unit_cell = read_i32(reader, big_endian)? != 0;
    for _ in 0..8 {
        let _ = read_i32(reader, big_endian)?;
    }
    let _charmm_version = read_i32(reader, big_endian)?;
    let _block_end = read_i32(reader, big_endian)?;

    // Title block.
    let title_block = read_i32(reader, big_endian)?;
    if title_block < 4 {
        return Err(DcdError::InvalidHeader(format!(
            "title block size is {}",
            title_block
        )));
    }
    let n_titles = read_i32(reader, big_endian)?;
    if n_titles < 0 || 4 + n_titles as i64 * TITLE_WIDTH as i64 > title_block as i64 {
        return Err(DcdError::InvalidHeader(format!(
            "title block of {} bytes cannot hold {} titles",
            title_block, n_titles
        )));
    }
    let mut skip = vec![0u8; (title_block - 4) as usize];
    read_exact(reader, &mut skip)?;
    let _block_end = read_i32(reader, big_endian)?;

    // Atom count block.
    let _block = read_i32(reader, big_endian)?;
    let n_atoms = read_i32(reader, big_endian)?;
    if n_atoms <= 0 {
        return Err(DcdError::InvalidHeader(format!(
            "atom count is {}",
            n_atoms
        )));
    }
    let _block_end = read_i32(reader, big_endian)?;

    Ok(DcdHeader {
        n_frames: n_frames as usize,
        n_atoms: n_atoms as usize,
        has_unit_cell,
        big_endian,
    })
}

fn read_coordinate_block<R: Read>(
    reader: &mut R,
    n_atoms: usize,
    big_endian: bool,
) -> Result<Vec<f32>, DcdError> {
    let _marker = read_i32(reader, big_endian)?;
    let coords = (0..n_atoms)
        .map(|_| read_f32(reader, big_endian))
        .collect::<Result<Vec<_>, _>>()?;
    let _marker = read_i32(reader, big_endian)?;
    Ok(coords)
}

fn read_frame<R: Read>(reader: &mut R, header: &DcdHeader) -> Result<Vec<Point3<f64>>, DcdError> {
    if header.has_unit_cell {
        let _marker = read_i32(reader, header.big_endian)?;
        let mut cell = [0u8; 48];
        read_exact(reader, &mut cell)?;
        let _marker = read_i32(reader, header.big_endian)?;
    }

    let x = read_coordinate_block(reader, header.n_atoms, header.big_endian)?;
    let y = read_coordinate_block(reader, header.n_atoms, header.big_endian)?;
    let z = read_coordinate_block(reader, header.n_atoms, header.big_endian)?;

    Ok((0..header.n_atoms)
        .map(|i| Point3::new(x[i] as f64, y[i] as f64, z[i] as f64))
        .collect())
}

fn write_i32(writer: &mut impl Write, value: i32) -> Result<(), DcdError> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_f32(writer: &mut impl Write, value: f32) -> Result<(), DcdError> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

impl TrajectoryFile for DcdFile {
    type Error = DcdError;

    fn read_from(reader: &mut (impl Read + Seek)) -> Result<Vec<Frame>, Self::Error> {
        let header = read_header(reader)?;
        let mut frames = Vec::with_capacity(header.n_frames);

        loop {
            if header.n_frames > 0 && frames.len() == header.n_frames {
                break;
            }
            match read_frame(reader, &header) {
                Ok(positions) => frames.push(Frame::new(frames.len(), positions)),
                // A header advertising zero frames means "read to EOF".
                Err(DcdError::Io(e))
                    if e.kind() == io::ErrorKind::UnexpectedEof && header.n_frames == 0 =>
                {
                    break;
                }
                Err(DcdError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(DcdError::Truncated {
                        expected: header.n_frames,
                        found: frames.len(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(frames)
    }

    fn write_to(frames: &[Frame], writer: &mut impl Write) -> Result<(), Self::Error> {
        let n_atoms = frames.first().map(|f| f.positions.len()).unwrap_or(0);

        // Main header block.
        write_i32(writer, HEADER_BLOCK_SIZE)?;
        writer.write_all(b"CORD")?;
        write_i32(writer, frames.len() as i32)?;
        write_i32(writer, 1)?; // start timestep
        write_i32(writer, 1)?; // timestep interval
        write_i32(writer, frames.len() as i32)?;
        for _ in 0..5 {
            write_i32(writer, 0)?;
        }
        write_f32(writer, 1.0)?; // integration timestep
        write_i32(writer, 0)?; // no unit cell
        for _ in 0..8 {
            write_i32(writer, 0)?;
        }
        write_i32(writer, CHARMM_VERSION)?;
        write_i32(writer, HEADER_BLOCK_SIZE)?;

        // Title block.
        let title_block = (4 + TITLE_WIDTH) as i32;
        write_i32(writer, title_block)?;
        write_i32(writer, 1)?;
        let mut title = [b' '; TITLE_WIDTH];
        let text = b"Coarse-grained trajectory written by cgtraj";
        title[..text.len()].copy_from_slice(text);
        writer.write_all(&title)?;
        write_i32(writer, title_block)?;

        // Atom count block.
        write_i32(writer, 4)?;
        write_i32(writer, n_atoms as i32)?;
        write_i32(writer, 4)?;

        let coord_block = (n_atoms * 4) as i32;
        for frame in frames {
            for axis in 0..3 {
                write_i32(writer, coord_block)?;
                for position in &frame.positions {
                    write_f32(writer, position[axis] as f32)?;
                }
                write_i32(writer, coord_block)?;
            }
        }
        Ok(())
    }
}
