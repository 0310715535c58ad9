pub mod atom;
pub mod frame;
pub mod measurement;
pub mod universe;
