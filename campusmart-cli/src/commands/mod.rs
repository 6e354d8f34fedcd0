//! Subcommand definitions.

pub mod chat;
pub mod product;
