use crate::core::models::universe::UniverseError;
use crate::core::registry::mapping::MappingError;
use crate::core::registry::templates::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("block_count must be greater than or equal to 1, but is {0}")]
    InvalidBlockCount(usize),

    #[error("stride must be greater than or equal to 1, but is {0}")]
    InvalidStride(usize),

    #[error("Residue template error: {source}")]
    Template {
        #[from]
        source: TemplateError,
    },

    #[error("Coarse-grain mapping error: {source}")]
    Mapping {
        #[from]
        source: MappingError,
    },

    #[error("Universe error: {source}")]
    Universe {
        #[from]
        source: UniverseError,
    },

    #[error("Block {block_id} failed: {source}")]
    Block {
        block_id: usize,
        source: Box<EngineError>,
    },

    #[error("Frame {frame} is missing a position for particle {particle}")]
    CorruptFrame { frame: usize, particle: usize },

    #[error("Failed to write '{path}': {source}", path = path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}
