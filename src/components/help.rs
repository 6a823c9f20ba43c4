use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::commands::Keymap;

/// Modal overlay listing the effective key bindings per action.
pub struct HelpOverlay<'a> {
    keymap: &'a Keymap,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(keymap: &'a Keymap) -> Self {
        Self { keymap }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let key_style = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();
        for (action, keys) in self.keymap.bindings() {
            if keys.is_empty() {
                continue;
            }
            let shown: Vec<String> =
                keys.iter().map(|k| if k == "enter" { "Enter".to_string() } else { k.clone() }).collect();
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<12}", shown.join(", ")), key_style),
                Span::raw(action.description().to_string()),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Tab switches pane, q quits, Esc closes",
            Style::default().add_modifier(Modifier::DIM),
        )));
        lines
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default().title(" Keybinds ").borders(Borders::ALL);
        Paragraph::new(self.lines()).block(block).render(area, buf);
    }
}

/// A rect centered in `area` covering the given percentages of it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
