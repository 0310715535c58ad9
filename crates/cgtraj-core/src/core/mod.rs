pub mod io;
pub mod models;
pub mod registry;
pub mod utils;
