use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::{App, Mode};

/// One-line status bar: current path breadcrumb, filter, transient status
/// messages, and the served URL. In search mode it becomes the filter input
/// line.
pub struct StatusBar<'a> {
    app: &'a App,
}

impl<'a> StatusBar<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    fn line(&self) -> Line<'a> {
        let nav = self.app.nav.state();
        if self.app.mode == Mode::Search {
            return Line::from(vec![
                Span::styled("/", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(nav.filter.clone()),
                Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ]);
        }

        let path = if nav.right_path.is_empty() {
            nav.left_path.clone()
        } else {
            nav.right_path.clone()
        };
        let mut spans = vec![
            Span::styled(format!(" {path} "), Style::default().add_modifier(Modifier::BOLD)),
        ];
        if !nav.filter.is_empty() {
            spans.push(Span::raw(format!("[filter: {}] ", nav.filter)));
        }
        if nav.right_loading || nav.left_loading {
            spans.push(Span::raw("… "));
        }
        match &self.app.status_message {
            Some((msg, _)) => spans.push(Span::raw(msg.clone())),
            None => spans.push(Span::styled(
                format!("{} · {} · ? for help", self.app.root_display, self.app.serve_url),
                Style::default().add_modifier(Modifier::DIM),
            )),
        }
        Line::from(spans)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_line(area.x, area.y, &self.line(), area.width);
    }
}
