/// Tabular methods, which keep one value per state-action pair
pub mod tabular;

pub use tabular::{GreedyPolicy, QTableAgent, QTableAgentConfig};
