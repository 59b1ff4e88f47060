//! remapkit library crate — re-exports for integration tests and embedding.
//!
//! The primary interface is the `remapkit` binary. This lib.rs exposes the
//! internal modules so that integration tests (and a build pipeline
//! embedding the crate directly) can exercise channel splitting, table
//! generation, and archive joining without going through the CLI.

pub mod channel;
pub mod config;
pub mod error;
pub mod generate;
pub mod hashstore;
pub mod join;
pub mod names;
pub mod rename;
pub mod table;
