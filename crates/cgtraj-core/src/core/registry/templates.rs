use crate::core::models::measurement::MeasurementKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: Box<toml::de::Error>,
    },

    #[error(
        "Residue '{res_key}' declares a {kind} group of {got} beads, but a {kind} takes {expected}"
    )]
    GroupArity {
        res_key: String,
        kind: MeasurementKind,
        got: usize,
        expected: usize,
    },

    #[error("Invalid bead template '{template}' in residue '{res_key}': {reason}")]
    BadBeadTemplate {
        res_key: String,
        template: String,
        reason: &'static str,
    },
}

/// One bead position pattern: a two-character stem (residue-type code plus
/// segment code) and a residue-index offset.
///
/// The offset is parsed once at registry load; resolution at measurement time
/// is pure integer arithmetic on the current residue index, never re-parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeadTemplate {
    pub stem: String,
    pub offset: isize,
}

impl BeadTemplate {
    fn parse(res_key: &str, raw: &str) -> Result<Self, TemplateError> {
        let bad = |reason| TemplateError::BadBeadTemplate {
            res_key: res_key.to_string(),
            template: raw.to_string(),
            reason,
        };

        if raw.len() < 3 || !raw.is_char_boundary(2) {
            return Err(bad("expected a two-character stem followed by an offset"));
        }
        let (stem, offset_str) = raw.split_at(2);
        let offset: isize = offset_str
            .parse()
            .map_err(|_| bad("offset is not an integer"))?;
        Ok(Self {
            stem: stem.to_string(),
            offset,
        })
    }

    /// The concrete bead name this template resolves to for a given residue.
    pub fn resolve(&self, current_resid: isize) -> String {
        format!("{}{}", self.stem, current_resid + self.offset)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawResidueTemplate {
    #[serde(default)]
    bonds: Vec<Vec<String>>,
    #[serde(default)]
    angles: Vec<Vec<String>>,
    #[serde(default)]
    dihedrals: Vec<Vec<String>>,
}

/// The parsed measurement patterns for one residue type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueTemplate {
    /// Residue-name aliases this template applies to (a key like
    /// `"GLU DGLU"` covers both spellings).
    pub res_names: Vec<String>,
    bonds: Vec<Vec<BeadTemplate>>,
    angles: Vec<Vec<BeadTemplate>>,
    dihedrals: Vec<Vec<BeadTemplate>>,
}

impl ResidueTemplate {
    pub fn groups(&self, kind: MeasurementKind) -> &[Vec<BeadTemplate>] {
        match kind {
            MeasurementKind::Bond => &self.bonds,
            MeasurementKind::Angle => &self.angles,
            MeasurementKind::Dihedral => &self.dihedrals,
        }
    }
}

/// Declarative mapping from residue type to named bead-offset patterns for
/// each measurement kind, loaded from TOML:
///
/// ```toml
/// ["GLU DGLU"]
/// bonds = [["E11", "EB1"], ["EB1", "EB2"]]
/// angles = [["E11", "EB1", "EB2"]]
/// dihedrals = [["E11", "EB1", "EB2", "E12"]]
/// ```
///
/// Group arity is validated against the measurement kind at load time, so a
/// structurally invalid template is surfaced before any block executes.
#[derive(Debug, Clone, Default)]
pub struct ResidueTemplateRegistry {
    registry: BTreeMap<String, ResidueTemplate>,
}

impl ResidueTemplateRegistry {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path).map_err(|e| TemplateError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            TemplateError::Toml { source, .. } => TemplateError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, TemplateError> {
        let raw: BTreeMap<String, RawResidueTemplate> =
            toml::from_str(content).map_err(|e| TemplateError::Toml {
                path: "<inline>".to_string(),
                source: Box::new(e),
            })?;

        let mut registry = BTreeMap::new();
        for (res_key, raw_template) in raw {
            let template = Self::parse_template(&res_key, raw_template)?;
            registry.insert(res_key, template);
        }
        Ok(Self { registry })
    }

    fn parse_template(
        res_key: &str,
        raw: RawResidueTemplate,
    ) -> Result<ResidueTemplate, TemplateError> {
        let parse_groups = |kind: MeasurementKind,
                            raw_groups: Vec<Vec<String>>|
         -> Result<Vec<Vec<BeadTemplate>>, TemplateError> {
            raw_groups
                .into_iter()
                .map(|group| {
                    if group.len() != kind.arity() {
                        return Err(TemplateError::GroupArity {
                            res_key: res_key.to_string(),
                            kind,
                            got: group.len(),
                            expected: kind.arity(),
                        });
                    }
                    group
                        .iter()
                        .map(|raw_name| BeadTemplate::parse(res_key, raw_name))
                        .collect()
                })
                .collect()
        };

        Ok(ResidueTemplate {
            res_names: res_key.split_whitespace().map(String::from).collect(),
            bonds: parse_groups(MeasurementKind::Bond, raw.bonds)?,
            angles: parse_groups(MeasurementKind::Angle, raw.angles)?,
            dihedrals: parse_groups(MeasurementKind::Dihedral, raw.dihedrals)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Iterates templates in deterministic (sorted key) order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResidueTemplate)> {
        self.registry.iter()
    }

    pub fn get(&self, res_key: &str) -> Option<&ResidueTemplate> {
        self.registry.get(res_key)
    }
}
