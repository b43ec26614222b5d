// Public modules
pub mod artifact;
pub mod checkout;
pub mod config;
pub mod diff;
pub mod error;
pub mod lint;
pub mod pipeline;
pub mod probe;
pub mod provision;

// Re-export common types for convenience
pub use error::{Error, Result};
