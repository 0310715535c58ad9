//! # cgtraj Core Library
//!
//! A library for coarse-graining molecular dynamics trajectories and for
//! measuring geometric parameters (bond lengths, angles, dihedrals) between
//! coarse-grained beads across a trajectory, using block-parallel
//! decomposition for throughput.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   (`Universe`, `Frame`), declarative registries for residue templates and
//!   coarse-grain mappings, pure geometry utilities, and file I/O.
//!
//! - **[`engine`]: The Logic Core.** The block-parallel measurement engine:
//!   frame-range partitioning, selection resolution, per-block workers, the
//!   parallel dispatcher, and order-independent aggregation of results.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer.
//!   It ties the `engine` and `core` together to execute complete procedures:
//!   coarse-graining a trajectory and parameterizing a coarse-grained one.

pub mod core;
pub mod engine;
pub mod workflows;
