use crate::core::models::measurement::MeasurementKind;
use crate::core::utils::geometry;
use nalgebra::Point3;

/// Evaluates one geometric quantity over a resolved bead group's current
/// positions.
///
/// Returns `None` when the group size does not match the kind's arity — a
/// silently skipped, undefined measurement, not an error. Angles and
/// dihedrals are returned in degrees; conversion to radians happens at
/// export time.
pub fn evaluate(kind: MeasurementKind, positions: &[Point3<f64>]) -> Option<f64> {
    if positions.len() != kind.arity() {
        return None;
    }

    Some(match kind {
        MeasurementKind::Bond => geometry::distance(&positions[0], &positions[1]),
        MeasurementKind::Angle => {
            geometry::angle_deg(&positions[0], &positions[1], &positions[2])
        }
        MeasurementKind::Dihedral => geometry::dihedral_deg(
            &positions[0],
            &positions[1],
            &positions[2],
            &positions[3],
        ),
    })
}
