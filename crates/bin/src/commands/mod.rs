//! Subcommand implementations.

pub mod edit;
pub mod merge;
pub mod query;
