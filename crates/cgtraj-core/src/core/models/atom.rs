use phf::phf_map;

/// Atomic masses (in amu) for the elements commonly found in biomolecular
/// topologies. Used to assign masses when the topology format does not carry
/// them explicitly (e.g. PDB).
static ATOMIC_MASSES: phf::Map<&'static str, f64> = phf_map! {
    "H" => 1.008,
    "C" => 12.011,
    "N" => 14.007,
    "O" => 15.999,
    "P" => 30.974,
    "S" => 32.06,
    "FE" => 55.845,
    "MG" => 24.305,
    "ZN" => 65.38,
    "CA" => 40.078,
    "NA" => 22.990,
    "CL" => 35.45,
    "K" => 39.098,
};

/// Fallback mass for atoms whose element cannot be identified.
const DEFAULT_MASS: f64 = 12.011;

/// Looks up the atomic mass for an element symbol, falling back to carbon
/// when the symbol is unknown.
pub fn mass_for_element(element: &str) -> f64 {
    ATOMIC_MASSES
        .get(element.to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_MASS)
}

/// Guesses the element symbol from an atom name when the topology does not
/// record one (first alphabetic character, PDB convention for biomolecules).
pub fn guess_element(atom_name: &str) -> Option<&str> {
    let start = atom_name.find(|c: char| c.is_ascii_alphabetic())?;
    atom_name.get(start..start + 1)
}

/// A single particle in a topology: either a real atom or a coarse-grained
/// bead produced by Stage A. The distinction is purely one of provenance;
/// the measurement engine treats both identically.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Particle name. Coarse-grained bead names encode a one-letter residue
    /// code, a segment initial, and the residue index (e.g. `KB14`).
    pub name: String,
    /// Residue name this particle belongs to.
    pub res_name: String,
    /// Residue index within the topology.
    pub res_id: isize,
    /// Mass in amu; drives center-of-mass computation during coarse-graining.
    pub mass: f64,
}

impl AtomRecord {
    pub fn new(name: impl Into<String>, res_name: impl Into<String>, res_id: isize) -> Self {
        let name = name.into();
        let mass = guess_element(&name)
            .map(mass_for_element)
            .unwrap_or(DEFAULT_MASS);
        Self {
            name,
            res_name: res_name.into(),
            res_id,
            mass,
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_elements_resolve_to_their_masses() {
        assert_eq!(mass_for_element("C"), 12.011);
        assert_eq!(mass_for_element("n"), 14.007);
        assert_eq!(mass_for_element("Fe"), 55.845);
    }

    #[test]
    fn unknown_element_falls_back_to_carbon() {
        assert_eq!(mass_for_element("Xx"), DEFAULT_MASS);
    }

    #[test]
    fn element_is_guessed_from_first_alphabetic_character() {
        assert_eq!(guess_element("CA"), Some("C"));
        assert_eq!(guess_element("1HB"), Some("H"));
        assert_eq!(guess_element("123"), None);
    }

    #[test]
    fn atom_record_derives_mass_from_name() {
        let atom = AtomRecord::new("N", "ALA", 1);
        assert_eq!(atom.mass, 14.007);

        let bead = AtomRecord::new("KB14", "LYS", 14).with_mass(72.0);
        assert_eq!(bead.mass, 72.0);
    }
}
