//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - Command execution with error handling

pub mod command;
