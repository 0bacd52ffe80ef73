//! Rule-based fee splitting: configuration, rule definitions, and the
//! first-match-wins evaluation engine

pub mod config;
pub mod engine;
pub mod rules;

pub use config::*;
pub use engine::*;
pub use rules::*;
