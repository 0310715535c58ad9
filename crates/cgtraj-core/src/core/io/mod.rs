pub mod dcd;
pub mod pdb;
pub mod traits;
