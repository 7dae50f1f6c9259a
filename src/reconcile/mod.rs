//! Reconciliation module containing record scoring and the pairing engine

pub mod engine;
pub mod score;

pub use engine::*;
pub use score::*;
