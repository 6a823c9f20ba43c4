use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::fs::Entry;

/// One directory pane: a flat list of entries with a selection bar.
///
/// Purely presentational: scrolling keeps the selection visible, a loading
/// pane shows a placeholder instead of (possibly stale) rows.
pub struct PaneList<'a> {
    title: String,
    entries: Vec<&'a Entry>,
    selected: usize,
    active: bool,
    loading: bool,
}

impl<'a> PaneList<'a> {
    pub fn new(
        title: String,
        entries: Vec<&'a Entry>,
        selected: usize,
        active: bool,
        loading: bool,
    ) -> Self {
        Self { title, entries, selected, active, loading }
    }
}

/// First visible row so that `selected` stays inside a `height`-row window.
fn scroll_offset(selected: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    selected.saturating_sub(height - 1)
}

impl Widget for PaneList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.loading {
            buf.set_line(inner.x, inner.y, &Line::from("Loading..."), inner.width);
            return;
        }
        if self.entries.is_empty() {
            let dim = Style::default().add_modifier(Modifier::DIM);
            let line = Line::from(Span::styled("(empty)", dim));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let height = inner.height as usize;
        let offset = scroll_offset(self.selected, height);
        for (row, entry) in self.entries.iter().skip(offset).take(height).enumerate() {
            let index = offset + row;
            let label = if entry.is_dir {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            let style = if index == self.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let line = Line::from(Span::styled(label, style));
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(name: &str) -> Entry {
        Entry { name: name.to_string(), is_dir: true, size: 0, mtime: 0 }
    }

    #[test]
    fn scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 5), 0);
        assert_eq!(scroll_offset(4, 5), 0);
        assert_eq!(scroll_offset(5, 5), 1);
        assert_eq!(scroll_offset(12, 5), 8);
        assert_eq!(scroll_offset(3, 0), 0);
    }

    #[test]
    fn renders_entries_with_dir_suffix() {
        let entries = vec![dir("alpha")];
        let refs: Vec<&Entry> = entries.iter().collect();
        let widget = PaneList::new("/".to_string(), refs, 0, true, false);
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 5));
        widget.render(Rect::new(0, 0, 20, 5), &mut buf);
        let row: String = (1..19).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.starts_with("alpha/"));
    }

    #[test]
    fn loading_pane_hides_rows() {
        let entries = vec![dir("alpha")];
        let refs: Vec<&Entry> = entries.iter().collect();
        let widget = PaneList::new("/".to_string(), refs, 0, false, true);
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 5));
        widget.render(Rect::new(0, 0, 20, 5), &mut buf);
        let row: String = (1..19).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.starts_with("Loading..."));
    }
}
