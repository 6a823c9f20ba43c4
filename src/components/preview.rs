use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::nav::{NavState, PreviewContent};

/// Preview column for the selected right-pane entry: head bytes for text
/// files, a summary line for binary ones.
pub struct PreviewPane<'a> {
    nav: &'a NavState,
}

impl<'a> PreviewPane<'a> {
    pub fn new(nav: &'a NavState) -> Self {
        Self { nav }
    }

    fn title(&self) -> String {
        let scale = self.nav.preview_scale;
        if (scale - 1.0).abs() > f64::EPSILON {
            format!(" Preview ({}%) ", (scale * 100.0).round() as u32)
        } else {
            " Preview ".to_string()
        }
    }

    fn body(&self) -> Vec<Line<'a>> {
        let dim = Style::default().add_modifier(Modifier::DIM);
        if self.nav.preview_loading {
            return vec![Line::from(Span::styled("Loading...", dim))];
        }
        match &self.nav.preview {
            Some(data) => match &data.content {
                PreviewContent::Text(text) => text.lines().map(Line::from).collect(),
                PreviewContent::Binary { size } => {
                    vec![Line::from(Span::styled(
                        format!("binary file ({size} bytes)"),
                        dim,
                    ))]
                }
            },
            None => match self.nav.right_selected_entry() {
                Some(entry) if entry.is_dir => {
                    vec![Line::from(Span::styled(format!("{}/", entry.name), dim))]
                }
                _ => Vec::new(),
            },
        }
    }
}

impl Widget for PreviewPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().title(self.title()).borders(Borders::ALL);
        Paragraph::new(self.body()).block(block).render(area, buf);
    }
}
