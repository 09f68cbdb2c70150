//! Subcommand implementations

pub mod edit;
pub mod join;
pub mod split;
