use nalgebra::Point3;

/// One snapshot of a trajectory: the positions of every particle in the
/// topology at a given timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Dense frame index, stable across iterations of the same trajectory.
    pub index: usize,
    /// One position per topology particle, in topology order (Angstrom).
    pub positions: Vec<Point3<f64>>,
}

impl Frame {
    pub fn new(index: usize, positions: Vec<Point3<f64>>) -> Self {
        Self { index, positions }
    }

    pub fn position(&self, atom_index: usize) -> Option<&Point3<f64>> {
        self.positions.get(atom_index)
    }
}
