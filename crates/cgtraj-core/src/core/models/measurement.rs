use std::fmt;

/// The kind of geometric quantity measured between a group of beads,
/// distinguished by the number of beads involved.
///
/// The numeric code (`arity - 2`) is the value written as `mes_type` in
/// exported measurement files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeasurementKind {
    /// Euclidean distance between two beads.
    Bond,
    /// Angle at the middle bead of a triple.
    Angle,
    /// Signed torsion angle across a quadruple.
    Dihedral,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 3] = [
        MeasurementKind::Bond,
        MeasurementKind::Angle,
        MeasurementKind::Dihedral,
    ];

    /// Number of beads this measurement is defined over.
    pub fn arity(self) -> usize {
        match self {
            MeasurementKind::Bond => 2,
            MeasurementKind::Angle => 3,
            MeasurementKind::Dihedral => 4,
        }
    }

    /// Numeric encoding used in exported files (`arity - 2`).
    pub fn code(self) -> u8 {
        match self {
            MeasurementKind::Bond => 0,
            MeasurementKind::Angle => 1,
            MeasurementKind::Dihedral => 2,
        }
    }

    /// Whether exported values must be converted from degrees to radians.
    pub fn is_angular(self) -> bool {
        !matches!(self, MeasurementKind::Bond)
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MeasurementKind::Bond => "bond",
            MeasurementKind::Angle => "angle",
            MeasurementKind::Dihedral => "dihedral",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_and_code_are_consistent() {
        for kind in MeasurementKind::ALL {
            assert_eq!(kind.arity(), kind.code() as usize + 2);
        }
    }

    #[test]
    fn only_bonds_are_exported_unconverted() {
        assert!(!MeasurementKind::Bond.is_angular());
        assert!(MeasurementKind::Angle.is_angular());
        assert!(MeasurementKind::Dihedral.is_angular());
    }
}
