use std::collections::VecDeque;

use crossterm::event::{Event, KeyCode};
use ratatui::{prelude::*, style::Stylize, symbols::Marker, widgets::*};

use crate::viz::{util::event_keycode, Update};

use super::Component;

/// Episodes averaged by the trend line
const WINDOW: usize = 100;

/// One metric over episodes: raw points plus a trailing moving average
pub struct Plot {
    pub y_title: String,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_labels: Vec<String>,
    y_labels: Vec<String>,
    data: Vec<(f64, f64)>,
    window: VecDeque<f64>,
    window_sum: f64,
    average: Vec<(f64, f64)>,
}

fn labels(bounds: [f64; 2]) -> Vec<String> {
    bounds.iter().map(|x| format!("{x:.2}")).collect()
}

impl Plot {
    pub fn new(y_label: &str) -> Self {
        Self {
            y_title: String::from(y_label),
            x_bounds: [f64::MAX, f64::MIN],
            y_bounds: [f64::MAX, f64::MIN],
            x_labels: Vec::new(),
            y_labels: Vec::new(),
            data: Vec::new(),
            window: VecDeque::with_capacity(WINDOW),
            window_sum: 0.0,
            average: Vec::new(),
        }
    }

    /// Provide initial x bounds
    pub fn with_x_bounds(mut self, x_bounds: [f64; 2]) -> Self {
        self.x_bounds = x_bounds;
        self.x_labels = labels(x_bounds);
        self
    }

    pub fn update(&mut self, point: (f64, f64)) {
        let (x, y) = point;
        if x < self.x_bounds[0] || x > self.x_bounds[1] {
            self.x_bounds = [self.x_bounds[0].min(x), self.x_bounds[1].max(x)];
            self.x_labels = labels(self.x_bounds);
        }
        if y < self.y_bounds[0] || y > self.y_bounds[1] {
            self.y_bounds = [self.y_bounds[0].min(y), self.y_bounds[1].max(y)];
            self.y_labels = labels(self.y_bounds);
        }

        self.window.push_back(y);
        self.window_sum += y;
        if self.window.len() > WINDOW {
            self.window_sum -= self.window.pop_front().unwrap_or_default();
        }

        self.data.push(point);
        self.average
            .push((x, self.window_sum / self.window.len() as f64));
    }

    /// Latest moving average, if any points have been added
    pub fn trend(&self) -> Option<f64> {
        self.average.last().map(|p| p.1)
    }
}

impl WidgetRef for Plot {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let points = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Scatter)
            .dark_gray()
            .data(&self.data);

        let trend = Dataset::default()
            .name(format!("{WINDOW}-episode average"))
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .cyan()
            .data(&self.average);

        let x_axis = Axis::default()
            .title("Episode")
            .dark_gray()
            .labels(self.x_labels.iter().cloned().map(|l| l.bold()).collect())
            .bounds(self.x_bounds);

        let y_axis = Axis::default()
            .title(self.y_title.as_str())
            .dark_gray()
            .labels(self.y_labels.iter().cloned().map(|l| l.bold()).collect())
            .bounds(self.y_bounds);

        let title = match self.trend() {
            Some(t) => format!("{} (avg {t:.2})", self.y_title),
            None => self.y_title.clone(),
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(title)
            .padding(Padding::uniform(4));

        Chart::new(vec![points, trend])
            .block(block)
            .x_axis(x_axis)
            .y_axis(y_axis)
            .render(area, buf);
    }
}

/// All metric plots, one shown at a time
pub struct Plots {
    plot_names: Vec<&'static str>,
    plots: Vec<Plot>,
    selected: usize,
}

impl Plots {
    pub fn new(names: Vec<&'static str>, episodes: u32) -> Self {
        let plots = names
            .iter()
            .map(|k| Plot::new(k).with_x_bounds([0.0, episodes.into()]))
            .collect();
        Self {
            plot_names: names,
            plots,
            selected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.plot_names.len()
    }

    pub fn next_plot(&mut self) {
        if self.len() > 0 {
            self.selected = (self.selected + 1) % self.len();
        }
    }

    pub fn prev_plot(&mut self) {
        let len = self.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn update(&mut self, update: Update) {
        let Update { episode, data } = update;
        for (plot, metric) in self.plots.iter_mut().zip(data) {
            plot.update((episode as f64, metric));
        }
    }
}

impl WidgetRef for Plots {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let [tabs_area, plot_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

        Tabs::new(self.plot_names.iter().copied())
            .white()
            .highlight_style(Style::default().light_green())
            .select(self.selected)
            .render(tabs_area, buf);

        if let Some(plot) = self.plots.get(self.selected) {
            plot.render_ref(plot_area, buf);
        }
    }
}

impl Component for Plots {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        match event_keycode(event) {
            Some(KeyCode::Left) => self.prev_plot(),
            Some(KeyCode::Right) => self.next_plot(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_uses_trailing_window() {
        let mut plot = Plot::new("reward");
        for i in 0..(WINDOW + 10) {
            plot.update((i as f64, i as f64));
        }
        let last = (WINDOW + 9) as f64;
        let first_in_window = 10.0;
        assert_eq!(plot.trend(), Some((first_in_window + last) / 2.0));
        assert_eq!(plot.y_bounds, [0.0, last]);
    }

    #[test]
    fn plots_route_metrics_by_position() {
        let mut plots = Plots::new(vec!["reward", "steps"], 10);
        plots.update(Update {
            episode: 0,
            data: vec![-5.0, 12.0],
        });
        assert_eq!(plots.plots[0].trend(), Some(-5.0));
        assert_eq!(plots.plots[1].trend(), Some(12.0));

        plots.prev_plot();
        assert_eq!(plots.selected, 1, "Selection wraps around");
    }
}
