//! Tabular Q-learning in a slippery grid world whose live goal may be hidden from the agent

/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

pub mod error;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

/// Probabilistic models
pub mod prob;

/// Episode statistics and run summaries
pub mod stats;

mod util;

pub use error::{Error, Result};
