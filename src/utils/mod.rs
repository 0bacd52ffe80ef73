//! Utility modules

pub mod memory_store;
pub mod rounding;
pub mod validation;

pub use memory_store::*;
pub use rounding::*;
pub use validation::*;
