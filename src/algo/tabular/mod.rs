pub mod greedy;
pub mod q_table;
pub mod table;

pub use greedy::{Evaluation, GreedyPolicy, Outcome, Trajectory};
pub use q_table::{EpisodeSummary, QTableAgent, QTableAgentConfig};
pub use table::QTable;
