pub mod aggregate;
pub mod blocks;
pub mod dispatch;
pub mod error;
pub mod measure;
pub mod progress;
pub mod resolver;
pub mod worker;
