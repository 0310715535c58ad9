use phf::phf_map;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// One-letter codes for the standard amino acids, used to build bead names.
static ONE_LETTER_CODES: phf::Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "ASX" => 'B',
    "CYS" => 'C', "GLU" => 'E', "GLN" => 'Q', "GLX" => 'Z', "GLY" => 'G',
    "HIS" => 'H', "ILE" => 'I', "LEU" => 'L', "LYS" => 'K', "MET" => 'M',
    "PHE" => 'F', "PRO" => 'P', "SER" => 'S', "THR" => 'T', "TRP" => 'W',
    "TYR" => 'Y', "VAL" => 'V',
};

/// Looks up the one-letter code for a residue name. Non-standard residue
/// names (e.g. `DGLU`) match on their trailing three characters.
pub fn one_letter_code(res_name: &str) -> Option<char> {
    let root = if res_name.len() > 3 {
        &res_name[res_name.len() - 3..]
    } else {
        res_name
    };
    ONE_LETTER_CODES.get(root).copied()
}

#[derive(Debug, Error)]
pub enum MappingError {
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
        "Residue '{0}' was not found in the coarse-grain mapping; add its segments to the mapping file"
    )]
    MissingResidue(String),

    #[error("Residue '{0}' has no one-letter code; bead names cannot be generated")]
    UnknownResidueCode(String),

    #[error("Residue '{res_name}' declares segment '{segment}' with no member atoms")]
    EmptySegment { res_name: String, segment: String },
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RawMapping(BTreeMap<String, BTreeMap<String, Vec<String>>>);

/// Declarative coarse-grain mapping: residue name -> segment name -> member
/// atom names, loaded from TOML:
///
/// ```toml
/// [ALA]
/// B = ["N", "CA", "C", "O", "CB"]
/// ```
///
/// Each segment collapses into one bead named from the residue's one-letter
/// code, the segment's initial character, and the residue index.
#[derive(Debug, Clone, Default)]
pub struct CoarseGrainMap {
    registry: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl CoarseGrainMap {
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let content = std::fs::read_to_string(path).map_err(|e| MappingError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            MappingError::Toml { source, .. } => MappingError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, MappingError> {
        let raw: RawMapping = toml::from_str(content).map_err(|e| MappingError::Toml {
            path: "<inline>".to_string(),
            source: Box::new(e),
        })?;

        for (res_name, segments) in &raw.0 {
            for (segment, atoms) in segments {
                if atoms.is_empty() {
                    return Err(MappingError::EmptySegment {
                        res_name: res_name.clone(),
                        segment: segment.clone(),
                    });
                }
            }
        }
        Ok(Self { registry: raw.0 })
    }

    /// The segments of a residue, keyed by segment name in sorted order.
    /// A residue selected for coarse-graining but absent from the mapping is
    /// a configuration error.
    pub fn segments(
        &self,
        res_name: &str,
    ) -> Result<&BTreeMap<String, Vec<String>>, MappingError> {
        let root = if res_name.len() > 3 {
            &res_name[res_name.len() - 3..]
        } else {
            res_name
        };
        self.registry
            .get(root)
            .ok_or_else(|| MappingError::MissingResidue(res_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[ALA]
B = ["N", "CA", "C", "O", "CB"]

[LYS]
1 = ["CB", "CG"]
2 = ["CD", "CE", "NZ"]
B = ["N", "CA", "C", "O"]
"#;

    #[test]
    fn segments_load_in_sorted_order() {
        let mapping = CoarseGrainMap::from_toml_str(SAMPLE).unwrap();
        let segments = mapping.segments("LYS").unwrap();
        let names: Vec<&String> = segments.keys().collect();
        assert_eq!(names, vec!["1", "2", "B"]);
        assert_eq!(segments["2"], vec!["CD", "CE", "NZ"]);
    }

    #[test]
    fn missing_residue_is_a_configuration_error() {
        let mapping = CoarseGrainMap::from_toml_str(SAMPLE).unwrap();
        assert!(matches!(
            mapping.segments("TRP"),
            Err(MappingError::MissingResidue(_))
        ));
    }

    #[test]
    fn prefixed_residue_names_match_their_root() {
        let mapping = CoarseGrainMap::from_toml_str(SAMPLE).unwrap();
        assert!(mapping.segments("DALA").is_ok());
    }

    #[test]
    fn empty_segment_is_rejected_at_load() {
        let bad = "[ALA]\nB = []\n";
        assert!(matches!(
            CoarseGrainMap::from_toml_str(bad),
            Err(MappingError::EmptySegment { .. })
        ));
    }

    #[test]
    fn one_letter_codes_cover_standard_and_prefixed_names() {
        assert_eq!(one_letter_code("LYS"), Some('K'));
        assert_eq!(one_letter_code("DGLU"), Some('E'));
        assert_eq!(one_letter_code("XXX"), None);
    }
}
