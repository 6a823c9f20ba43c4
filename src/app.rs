use std::time::Instant;

use crate::commands::{self, Action, Keymap};
use crate::nav::NavController;

/// Input mode: overlays capture keys away from navigation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// The filter input line is open and editing the right-pane filter.
    Search,
    /// The keybinding overlay is shown.
    Help,
}

/// Main application state: the navigation controller plus UI concerns that
/// sit outside the navigation contract (overlays, status line, quitting).
pub struct App {
    pub nav: NavController,
    pub keymap: Keymap,
    pub mode: Mode,
    pub status_message: Option<(String, Instant)>,
    pub should_quit: bool,
    /// Absolute configured root, shown in the status bar.
    pub root_display: String,
    /// Local API address, shown in the status bar.
    pub serve_url: String,
}

impl App {
    pub fn new(keymap: Keymap, root_display: String, serve_url: String) -> Self {
        Self {
            nav: NavController::new(),
            keymap,
            mode: Mode::Normal,
            status_message: None,
            should_quit: false,
            root_display,
            serve_url,
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Apply an abstract action: navigation actions go to the controller,
    /// overlay actions are handled here.
    pub fn apply(&mut self, action: Action) {
        if commands::dispatch(action, &mut self.nav) {
            return;
        }
        match action {
            Action::Search => self.toggle_search(),
            Action::Help => self.toggle_help(),
            _ => {}
        }
    }

    pub fn toggle_search(&mut self) {
        self.mode = match self.mode {
            Mode::Search => Mode::Normal,
            _ => Mode::Search,
        };
    }

    pub fn close_search(&mut self) {
        if self.mode == Mode::Search {
            self.mode = Mode::Normal;
        }
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            Mode::Help => Mode::Normal,
            _ => Mode::Help,
        };
    }

    /// Append a character to the right-pane filter (search mode).
    pub fn push_filter_char(&mut self, c: char) {
        let mut filter = self.nav.state().filter.clone();
        filter.push(c);
        self.nav.set_filter(filter);
    }

    /// Remove the last character from the filter (search mode backspace).
    pub fn pop_filter_char(&mut self) {
        let mut filter = self.nav.state().filter.clone();
        filter.pop();
        self.nav.set_filter(filter);
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new(
            Keymap::default(),
            "/tmp/root".to_string(),
            "http://127.0.0.1:5173".to_string(),
        );
        app.nav.take_effects();
        app
    }

    #[test]
    fn quit_sets_flag() {
        let mut app = app();
        assert!(!app.should_quit);
        app.quit();
        assert!(app.should_quit);
    }

    #[test]
    fn search_action_toggles_search_mode() {
        let mut app = app();
        app.apply(Action::Search);
        assert_eq!(app.mode, Mode::Search);
        app.apply(Action::Search);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn help_action_toggles_help_mode() {
        let mut app = app();
        app.apply(Action::Help);
        assert_eq!(app.mode, Mode::Help);
        app.apply(Action::Help);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn filter_editing_reaches_the_controller() {
        let mut app = app();
        app.push_filter_char('p');
        app.push_filter_char('n');
        assert_eq!(app.nav.state().filter, "pn");
        app.pop_filter_char();
        assert_eq!(app.nav.state().filter, "p");
        app.pop_filter_char();
        app.pop_filter_char(); // empty pop is harmless
        assert_eq!(app.nav.state().filter, "");
    }

    #[test]
    fn closing_search_keeps_the_filter_applied() {
        let mut app = app();
        app.toggle_search();
        app.push_filter_char('x');
        app.close_search();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.nav.state().filter, "x");
    }

    #[test]
    fn set_status_message_stores_message() {
        let mut app = app();
        app.set_status_message("left pane: not found".to_string());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "left pane: not found");
    }

    #[test]
    fn clear_expired_status_removes_old() {
        let mut app = app();
        app.status_message = Some((
            "old".to_string(),
            Instant::now() - std::time::Duration::from_secs(5),
        ));
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }

    #[test]
    fn clear_expired_status_keeps_recent() {
        let mut app = app();
        app.set_status_message("fresh".to_string());
        app.clear_expired_status();
        assert!(app.status_message.is_some());
    }
}
