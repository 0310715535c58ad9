use crate::core::models::measurement::MeasurementKind;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Raw values collected for one measurement name by exactly one block
/// worker, in ascending frame order within that block.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialValues {
    pub kind: MeasurementKind,
    pub values: Vec<f64>,
}

/// The output of one block worker: measurement name -> collected values.
pub type PartialValueMap = HashMap<String, PartialValues>;

/// The aggregate of all sampled values for one measurement name across all
/// blocks.
///
/// Created on first encounter of a name during [`merge`], extended by one
/// `add_values` call per contributing block, and converted/serialized exactly
/// once at export. Cross-block value order carries no meaning; consumers
/// treat the contents as a statistical sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    name: String,
    kind: MeasurementKind,
    values: Vec<f64>,
}

impl Container {
    pub fn new(name: impl Into<String>, kind: MeasurementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    /// Raw values as measured (lengths in Angstrom, angles in degrees).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn add_values(&mut self, values: &[f64]) {
        self.values.extend_from_slice(values);
    }

    /// Values with the export unit policy applied: bond lengths pass through
    /// unconverted, angles and dihedrals convert degrees to radians. The
    /// conversion is deferred to this boundary so the in-memory
    /// representation stays whatever the evaluator naturally produced.
    pub fn converted_values(&self) -> impl Iterator<Item = f64> + '_ {
        let factor = if self.kind.is_angular() {
            PI / 180.0
        } else {
            1.0
        };
        self.values.iter().map(move |v| v * factor)
    }

    /// Serializes the container: line 1 is the integer measurement kind,
    /// every following line one converted value. No trailing metadata and no
    /// newline after the final value.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "mes_type: {}", self.kind.code())?;
        for value in self.converted_values() {
            write!(writer, "\n{}", value)?;
        }
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
    }
}

/// Merges per-block partial value maps into one container per measurement
/// name.
///
/// The fold is commutative and associative over the list of partials: the
/// order in which blocks finished affects only the internal value order of
/// each container, which is not semantically significant. The first sight of
/// a name fixes its container's measurement kind.
pub fn merge(partials: impl IntoIterator<Item = PartialValueMap>) -> HashMap<String, Container> {
    let mut containers: HashMap<String, Container> = HashMap::new();
    for partial in partials {
        for (name, partial_values) in partial {
            containers
                .entry(name.clone())
                .or_insert_with(|| Container::new(name, partial_values.kind))
                .add_values(&partial_values.values);
        }
    }
    containers
}
