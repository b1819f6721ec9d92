//! The migration-application engine.
//!
//! Applies each pending change-unit exactly once, in a deterministic order:
//! activation units as a whole phase strictly precede data units, because
//! activations establish preconditions (installed components) that data
//! units may depend on; within each phase, units run in `(date, sequence,
//! name)` order. Every application is recorded in the [`ledger`] so
//! re-invocation is safe, and per-unit failures are isolated — they are
//! logged and counted, never fatal to the run.
pub mod activation;
pub mod engine;
pub mod ledger;
pub mod name;
pub mod runner;

pub use engine::{MigrationEngine, RunSummary};
pub use name::{UnitKind, UnitName};
