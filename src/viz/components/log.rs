use crossterm::event::{Event, KeyCode};
use log::LevelFilter;
use ratatui::{prelude::*, widgets::*};
use tui_logger::{TuiLoggerSmartWidget, TuiWidgetEvent, TuiWidgetState};

use crate::viz::util::event_keycode;

use super::Component;

/// Episode progress and greedy evaluation
const TRAINING_TARGETS: [&str; 2] = [
    concat!(env!("CARGO_CRATE_NAME"), "::algo::tabular::q_table"),
    concat!(env!("CARGO_CRATE_NAME"), "::algo::tabular::greedy"),
];

/// Map sampling attempts and map selection
const MAP_TARGETS: [&str; 2] = [
    concat!(env!("CARGO_CRATE_NAME"), "::grid::generator"),
    concat!(env!("CARGO_CRATE_NAME"), "::grid::source"),
];

/// Which records the Logs tab shows, cycled with `t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Filter {
    /// Everything this crate logs, plus warnings from dependencies
    #[default]
    Crate,
    /// Training progress at info, evaluation outcomes at debug
    Training,
    /// Generator attempt counts at debug, the chosen map at info
    Maps,
    All,
}

impl Filter {
    fn next(self) -> Self {
        match self {
            Filter::Crate => Filter::Training,
            Filter::Training => Filter::Maps,
            Filter::Maps => Filter::All,
            Filter::All => Filter::Crate,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Filter::Crate => "qgrid",
            Filter::Training => "training",
            Filter::Maps => "maps",
            Filter::All => "all targets",
        }
    }

    /// Level for targets without an explicit entry
    fn fallback(self) -> LevelFilter {
        match self {
            Filter::Crate => LevelFilter::Warn,
            Filter::Training | Filter::Maps => LevelFilter::Off,
            Filter::All => LevelFilter::Trace,
        }
    }

    fn levels(self) -> Vec<(&'static str, LevelFilter)> {
        let [progress, evaluation] = TRAINING_TARGETS;
        let [attempts, selection] = MAP_TARGETS;
        match self {
            Filter::Crate => TRAINING_TARGETS
                .into_iter()
                .chain(MAP_TARGETS)
                .map(|t| (t, LevelFilter::Debug))
                .collect(),
            Filter::Training => vec![
                (progress, LevelFilter::Info),
                (evaluation, LevelFilter::Debug),
            ],
            Filter::Maps => vec![
                (attempts, LevelFilter::Debug),
                (selection, LevelFilter::Info),
            ],
            Filter::All => Vec::new(),
        }
    }

    fn widget_state(self) -> TuiWidgetState {
        self.levels().into_iter().fold(
            TuiWidgetState::new().set_default_display_level(self.fallback()),
            |state, (target, level)| state.set_level_for_target(target, level),
        )
    }
}

/// Records captured from the `log` facade, grouped by what produced them
pub struct Logs {
    filter: Filter,
    state: TuiWidgetState,
    captured: bool,
}

impl Logs {
    /// `captured` is whether the dashboard owns the global logger
    pub fn new(captured: bool) -> Self {
        let filter = Filter::default();
        Self {
            filter,
            state: filter.widget_state(),
            captured,
        }
    }

    fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.state = self.filter.widget_state();
    }
}

impl WidgetRef for Logs {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let [header_area, log_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

        let header = if self.captured {
            Line::from(vec![
                " t".bold(),
                " filter  ".dark_gray(),
                "h".bold(),
                " targets  ".dark_gray(),
                "f".bold(),
                " focus".dark_gray(),
            ])
        } else {
            Line::from(" Another logger was installed first, records go there instead".light_red())
        };
        Paragraph::new(header).render(header_area, buf);

        TuiLoggerSmartWidget::default()
            .title_log(format!("Log ({})", self.filter.name()))
            .title_target("Targets")
            .style_error(Style::default().light_red())
            .style_warn(Style::default().light_yellow())
            .style_info(Style::default().cyan())
            .style_debug(Style::default().dark_gray())
            .output_separator(' ')
            .output_timestamp(Some(String::from("%H:%M:%S")))
            .state(&self.state)
            .render(log_area, buf);
    }
}

impl Component for Logs {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        let widget_event = match event_keycode(event) {
            Some(KeyCode::Char('t')) => {
                self.cycle_filter();
                return true;
            }
            Some(KeyCode::Char('h')) => TuiWidgetEvent::HideKey,
            Some(KeyCode::Char('f')) => TuiWidgetEvent::FocusKey,
            Some(KeyCode::Up) => TuiWidgetEvent::UpKey,
            Some(KeyCode::Down) => TuiWidgetEvent::DownKey,
            Some(KeyCode::Left) => TuiWidgetEvent::LeftKey,
            Some(KeyCode::Right) => TuiWidgetEvent::RightKey,
            Some(KeyCode::PageUp) => TuiWidgetEvent::PrevPageKey,
            Some(KeyCode::PageDown) => TuiWidgetEvent::NextPageKey,
            Some(KeyCode::Esc) => TuiWidgetEvent::EscapeKey,
            _ => return false,
        };

        self.state.transition(widget_event);
        true
    }
}
