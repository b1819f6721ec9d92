//! Site migration and asset sync engine.
//!
//! Applies a sequence of pending change-units ("migrations") to a target
//! site exactly once each, in a deterministic two-phase order — component
//! activations first, then data changes — recording every application in a
//! durable ledger table so re-runs are safe. A secondary subsystem keeps a
//! tree of binary assets in sync with the site via content hashing.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]** — parse `siteops.toml` from the site root
//! - **[`host`]** — the boundary to the site's admin CLI (mockable for tests)
//! - **[`migrate`]** — name parsing, ledger, dispatchers, and the engine
//! - **[`sync`]** — hash-gated one-way asset synchronisation
//! - **[`commands`]** — top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod host;
pub mod logging;
pub mod migrate;
pub mod sync;
