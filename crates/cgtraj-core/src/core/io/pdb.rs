use crate::core::io::traits::TopologyFile;
use crate::core::models::atom::{AtomRecord, guess_element, mass_for_element};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },

    #[error("Topology contains no ATOM or HETATM records")]
    Empty,

    #[error("Cannot write topology: {atoms} atoms but {positions} reference positions")]
    PositionCountMismatch { atoms: usize, positions: usize },

    #[error("Atom {index}: {field} '{value}' does not fit its fixed columns")]
    FieldOverflow {
        index: usize,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },

    #[error("Invalid float in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },

    #[error("Atom name field is empty")]
    MissingAtomName,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coord(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let field = slice_and_trim(line, start, end);
    field.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: field.to_string(),
        },
    })
}

/// Reader and writer for PDB topologies.
///
/// Only ATOM/HETATM records are interpreted; everything else is passed over.
/// Coordinates in the file are a reference snapshot only; trajectory
/// positions come from the companion DCD.
pub struct PdbFile;

impl PdbFile {
    /// Reads both particle records and their reference coordinates.
    pub fn read_with_positions(
        reader: &mut impl BufRead,
    ) -> Result<(Vec<AtomRecord>, Vec<Point3<f64>>), PdbError> {
        let mut atoms = Vec::new();
        let mut positions = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            if record_type != "ATOM" && record_type != "HETATM" {
                continue;
            }

            let name = slice_and_trim(&line, 12, 16);
            if name.is_empty() {
                return Err(PdbError::Parse {
                    line: line_num,
                    kind: PdbParseErrorKind::MissingAtomName,
                });
            }
            let res_name = slice_and_trim(&line, 17, 21);
            let res_id_str = slice_and_trim(&line, 22, 26);
            let res_id: isize = res_id_str.parse().map_err(|_| PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::InvalidInt {
                    columns: "23-26".into(),
                    value: res_id_str.into(),
                },
            })?;

            let x = parse_coord(&line, line_num, 30, 38)?;
            let y = parse_coord(&line, line_num, 38, 46)?;
            let z = parse_coord(&line, line_num, 46, 54)?;

            let element = slice_and_trim(&line, 76, 78);
            let mass = if element.is_empty() {
                guess_element(name).map(mass_for_element)
            } else {
                Some(mass_for_element(element))
            };

            let mut atom = AtomRecord::new(name, res_name, res_id);
            if let Some(mass) = mass {
                atom = atom.with_mass(mass);
            }
            atoms.push(atom);
            positions.push(Point3::new(x, y, z));
        }

        if atoms.is_empty() {
            return Err(PdbError::Empty);
        }
        Ok((atoms, positions))
    }
}

impl TopologyFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<AtomRecord>, Self::Error> {
        let (atoms, _) = Self::read_with_positions(reader)?;
        Ok(atoms)
    }

    fn write_to(
        atoms: &[AtomRecord],
        positions: &[Point3<f64>],
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        if atoms.len() != positions.len() {
            return Err(PdbError::PositionCountMismatch {
                atoms: atoms.len(),
                positions: positions.len(),
            });
        }

        for (i, (atom, pos)) in atoms.iter().zip(positions.iter()).enumerate() {
            // Oversized fields would shift every later column and silently
            // corrupt the record, so they are rejected instead of truncated.
            if atom.name.len() > 4 {
                return Err(PdbError::FieldOverflow {
                    index: i,
                    field: "name",
                    value: atom.name.clone(),
                });
            }
            if !(-999..=9999).contains(&atom.res_id) {
                return Err(PdbError::FieldOverflow {
                    index: i,
                    field: "residue index",
                    value: atom.res_id.to_string(),
                });
            }
            let element = guess_element(&atom.name).unwrap_or("");
            writeln!(
                writer,
                "ATOM  {serial:>5} {name:<4} {res_name:<4}{chain}{res_id:>4}    {x:>8.3}{y:>8.3}{z:>8.3}{occ:>6.2}{temp:>6.2}          {element:>2}",
                serial = i + 1,
                name = atom.name,
                res_name = atom.res_name,
                chain = 'A',
                res_id = atom.res_id,
                x = pos.x,
                y = pos.y,
                z = pos.z,
                occ = 1.00,
                temp = 0.00,
                element = element,
            )?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    const SAMPLE: &str = "\
REMARK coarse-grained topology
ATOM      1 KB1  LYS A   1      11.000  22.000  33.000  1.00  0.00           C
ATOM      2 KB2  LYS A   1      12.500   0.000  -4.250  1.00  0.00           C
HETATM    3 K11  LYS A   2       0.000   0.000   0.000  1.00  0.00           C
END
";

    #[test]
    fn atom_and_hetatm_records_are_parsed() {
        let mut reader = BufReader::new(SAMPLE.as_bytes());
        let (atoms, positions) = PdbFile::read_with_positions(&mut reader).unwrap();

        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms[0].name, "KB1");
        assert_eq!(atoms[0].res_name, "LYS");
        assert_eq!(atoms[0].res_id, 1);
        assert_eq!(atoms[2].res_id, 2);
        assert_eq!(positions[1], Point3::new(12.5, 0.0, -4.25));
    }

    #[test]
    fn empty_topology_is_an_error() {
        let mut reader = BufReader::new("REMARK nothing here\n".as_bytes());
        assert!(matches!(
            PdbFile::read_from(&mut reader),
            Err(PdbError::Empty)
        ));
    }

    #[test]
    fn malformed_coordinate_reports_line_number() {
        let bad = "ATOM      1 KB1  LYS A   1      xx.000  22.000  33.000  1.00  0.00           C\n";
        let mut reader = BufReader::new(bad.as_bytes());
        let err = PdbFile::read_from(&mut reader).unwrap_err();
        assert!(matches!(err, PdbError::Parse { line: 1, .. }));
    }

    #[test]
    fn written_topology_reads_back() {
        let atoms = vec![
            AtomRecord::new("EB1", "GLU", 4),
            AtomRecord::new("EB2", "GLU", 4),
        ];
        let positions = vec![Point3::new(1.0, 2.0, 3.0), Point3::new(-1.5, 0.25, 9.0)];

        let mut buf = Vec::new();
        PdbFile::write_to(&atoms, &positions, &mut buf).unwrap();

        let mut reader = BufReader::new(buf.as_slice());
        let (read_atoms, read_positions) = PdbFile::read_with_positions(&mut reader).unwrap();
        assert_eq!(read_atoms, atoms);
        assert_eq!(read_positions, positions);
    }

    #[test]
    fn oversized_fields_are_rejected_on_write() {
        // Five-character bead name (stem + resid >= 100).
        let atoms = vec![AtomRecord::new("KB123", "LYS", 123)];
        let positions = vec![Point3::new(0.0, 0.0, 0.0)];
        let mut buf = Vec::new();
        assert!(matches!(
            PdbFile::write_to(&atoms, &positions, &mut buf),
            Err(PdbError::FieldOverflow { field: "name", .. })
        ));

        let atoms = vec![AtomRecord::new("KB1", "LYS", 10000)];
        let mut buf = Vec::new();
        assert!(matches!(
            PdbFile::write_to(&atoms, &positions, &mut buf),
            Err(PdbError::FieldOverflow {
                field: "residue index",
                ..
            })
        ));
    }

    #[test]
    fn mismatched_positions_are_rejected_on_write() {
        let atoms = vec![AtomRecord::new("EB1", "GLU", 4)];
        let mut buf = Vec::new();
        let result = PdbFile::write_to(&atoms, &[], &mut buf);
        assert!(matches!(
            result,
            Err(PdbError::PositionCountMismatch {
                atoms: 1,
                positions: 0
            })
        ));
    }
}
