use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::{App, Mode};
use crate::components::help::{centered_rect, HelpOverlay};
use crate::components::pane::PaneList;
use crate::components::preview::PreviewPane;
use crate::components::status_bar::StatusBar;
use crate::nav::Pane;

/// Render the application UI: two panes plus the preview column (or a
/// maximized preview), the status bar, and any modal overlay. Rendering is a
/// pure function of state; all behavior lives in the controller.
pub fn render(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let nav = app.nav.state();
    if nav.preview_max {
        frame.render_widget(PreviewPane::new(nav), main_area);
    } else {
        let [left_area, right_area, preview_area] = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .areas(main_area);

        let left = PaneList::new(
            nav.left_path.clone(),
            nav.left_dirs(),
            nav.left_selected,
            nav.active_pane == Pane::Left,
            nav.left_loading,
        );
        frame.render_widget(left, left_area);

        let right_title = if nav.right_path.is_empty() {
            "-".to_string()
        } else {
            nav.right_path.clone()
        };
        let right = PaneList::new(
            right_title,
            nav.right_filtered(),
            nav.right_selected,
            nav.active_pane == Pane::Right,
            nav.right_loading,
        );
        frame.render_widget(right, right_area);

        frame.render_widget(PreviewPane::new(nav), preview_area);
    }

    frame.render_widget(StatusBar::new(app), status_area);

    if app.mode == Mode::Help {
        let overlay = centered_rect(60, 70, frame.area());
        frame.render_widget(HelpOverlay::new(&app.keymap), overlay);
    }
}
