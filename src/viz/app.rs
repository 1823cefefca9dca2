use std::{
    io,
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use crossterm::event::{self, KeyCode};
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{Component, Logs, Plots},
    tui,
    util::event_keycode,
    Update,
};

const TABS: [&str; 2] = ["Plots", "Logs"];

#[derive(Default, PartialEq)]
enum State {
    #[default]
    Train,
    Done,
    Quit,
}

/// The root TUI component which holds the main app state and runs the render loop
pub struct App {
    state: State,
    episode: u32,
    total_episodes: u32,
    selected_tab: usize,
    plots: Plots,
    logs: Logs,
}

impl App {
    /// `logs_captured` is whether the Logs tab receives the `log` facade's records
    pub fn new(plots: &[&'static str], episodes: u32, logs_captured: bool) -> Self {
        Self {
            state: State::default(),
            episode: 0,
            total_episodes: episodes,
            selected_tab: 0,
            plots: Plots::new(plots.to_vec(), episodes),
            logs: Logs::new(logs_captured),
        }
    }

    fn drain(&mut self, rx: &Receiver<Update>) {
        loop {
            match rx.try_recv() {
                Ok(update) => {
                    self.episode = update.episode + 1;
                    self.plots.update(update);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.state = State::Done;
                    break;
                }
            }
        }
    }

    /// Initialize the terminal and run the main loop until the user quits
    ///
    /// Restores the terminal on exit
    pub fn run(&mut self, rx: Receiver<Update>) -> io::Result<()> {
        let mut terminal = tui::init()?;

        while self.state != State::Quit {
            if self.state == State::Train {
                self.drain(&rx);
            }

            terminal.draw(|frame| frame.render_widget(&*self, frame.size()))?;

            if !event::poll(Duration::from_millis(16))? {
                continue;
            }
            let event = event::read()?;
            match event_keycode(&event) {
                Some(KeyCode::Char('q')) => self.state = State::Quit,
                Some(KeyCode::Tab) => self.selected_tab = (self.selected_tab + 1) % TABS.len(),
                _ => {
                    match self.selected_tab {
                        0 => self.plots.handle_ui_event(&event),
                        _ => self.logs.handle_ui_event(&event),
                    };
                }
            }
        }

        tui::restore()
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Layout
        let [menu_area, main_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        // Menu
        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        // Main
        match self.selected_tab {
            0 => self.plots.render_ref(main_area, buf),
            _ => self.logs.render_ref(main_area, buf),
        }

        // Progress
        let title = match self.state {
            State::Train => "Training",
            State::Done | State::Quit => "Done (q to quit)",
        };
        let ratio = if self.total_episodes == 0 {
            1.0
        } else {
            (self.episode as f64 / self.total_episodes as f64).min(1.0)
        };
        Gauge::default()
            .block(Block::bordered().border_type(BorderType::Rounded).title(title))
            .gauge_style(Style::default().cyan())
            .ratio(ratio)
            .render(progress_area, buf);
    }
}
