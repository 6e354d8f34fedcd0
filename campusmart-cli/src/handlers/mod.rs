//! Handlers shared by the commands, returning printable results.

pub mod chat;
pub mod product;
