pub mod coarse_grain;
pub mod measure;
