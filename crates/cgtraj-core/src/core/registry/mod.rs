pub mod mapping;
pub mod templates;
