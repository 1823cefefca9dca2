use std::{
    io,
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use crate::algo::tabular::EpisodeSummary;

pub use app::App;

mod app;
mod components;
mod tui;
mod util;

/// Metric names matching the order of [`Update::data`] built from an [`EpisodeSummary`]
pub const SUMMARY_KEYS: [&str; 3] = ["reward", "steps", "epsilon"];

/// Format for updating plot data
pub struct Update {
    pub episode: u32,
    pub data: Vec<f64>,
}

impl From<&EpisodeSummary> for Update {
    fn from(summary: &EpisodeSummary) -> Self {
        Self {
            episode: summary.episode,
            data: vec![
                summary.reward as f64,
                summary.steps as f64,
                summary.epsilon as f64,
            ],
        }
    }
}

/// Route `log` records to the Logs tab and start the dashboard on its own thread
///
/// The dashboard only ever receives data. Dropping the sender leaves the final plots
/// on screen until the user quits with `q`.
pub fn init(
    keys: &[&'static str],
    episodes: u32,
) -> (JoinHandle<io::Result<()>>, Sender<Update>) {
    let captured = install_logger();

    let (tx, rx) = mpsc::channel();
    let mut app = App::new(keys, episodes, captured);
    let handle = thread::spawn(move || app.run(rx));
    (handle, tx)
}

/// Make `tui-logger` the global logger
///
/// Returns `false`, and says so on stderr, if another logger was installed first.
fn install_logger() -> bool {
    match tui_logger::init_logger(log::LevelFilter::Trace) {
        Ok(()) => {
            tui_logger::set_default_level(log::LevelFilter::Debug);
            true
        }
        Err(e) => {
            eprintln!("Dashboard Logs tab disabled: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_logger_install_is_reported() {
        install_logger();
        assert!(!install_logger(), "Only one global logger can exist");
    }

    #[test]
    fn summary_metrics_follow_key_order() {
        let summary = EpisodeSummary {
            episode: 4,
            reward: -12.0,
            steps: 30,
            epsilon: 0.5,
            reached_goal: true,
        };
        let update = Update::from(&summary);
        assert_eq!(update.episode, 4);
        assert_eq!(update.data.len(), SUMMARY_KEYS.len());
        assert_eq!(update.data, [-12.0, 30.0, 0.5]);
    }
}
