//! Tabular Q-learning for an agent walking an N-dimensional grid of free cells, walls,
//! and a single goal.
//!
//! A run resolves a [`MapSource`](grid::MapSource) into a [`Grid`](grid::Grid), trains
//! a [`QTableAgent`](algo::QTableAgent) on the resulting [`GridWorld`](grid::GridWorld),
//! then freezes it into a [`GreedyPolicy`](algo::GreedyPolicy) whose trajectory can be
//! handed to any renderer.

/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Grid maps, the grid navigation environment, and random map generation
pub mod grid;

/// Terminal dashboard for training metrics
#[cfg(feature = "viz")]
pub mod viz;

mod util;
