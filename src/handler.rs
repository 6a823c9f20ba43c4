use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};

/// Handle a key event, routing by input mode.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.mode {
        Mode::Search => handle_search_key(app, key),
        Mode::Help => handle_help_key(app, key),
        Mode::Normal => handle_normal_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Tab => app.nav.toggle_pane(),
        _ => {
            if let Some(name) = key_name(&key) {
                if let Some(action) = app.keymap.lookup(&name) {
                    app.apply(action);
                }
            }
        }
    }
}

/// While the filter line is open, printable keys edit the filter live; the
/// filter stays applied after the line closes.
fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.close_search(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char(c) => app.push_filter_char(c),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => app.toggle_help(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        _ => {}
    }
}

/// Keymap lookup name for a key: the literal character for printable keys
/// (case distinguishes `G` from `g`), lowercase names for special keys.
fn key_name(key: &KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Char(c) => Some(c.to_string()),
        KeyCode::Enter => Some("enter".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Keymap;
    use crate::fs::{Entry, Listing};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_left_listing() -> App {
        let mut app = App::new(
            Keymap::default(),
            "/tmp/root".to_string(),
            "http://127.0.0.1:5173".to_string(),
        );
        app.nav.take_effects();
        let entries = vec![
            Entry { name: "a".into(), is_dir: true, size: 0, mtime: 0 },
            Entry { name: "b".into(), is_dir: true, size: 0, mtime: 0 },
        ];
        app.nav.on_left_listing(Listing::new("/".into(), entries));
        app.nav.take_effects();
        app
    }

    #[test]
    fn q_quits() {
        let mut app = app_with_left_listing();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        for mode in [Mode::Normal, Mode::Search, Mode::Help] {
            let mut app = app_with_left_listing();
            app.mode = mode;
            handle_key_event(
                &mut app,
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            );
            assert!(app.should_quit, "mode {mode:?}");
        }
    }

    #[test]
    fn bound_keys_dispatch_actions() {
        let mut app = app_with_left_listing();
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.nav.state().left_selected, 1);
        handle_key_event(&mut app, key(KeyCode::Char('k')));
        assert_eq!(app.nav.state().left_selected, 0);
    }

    #[test]
    fn shifted_keys_are_distinct_bindings() {
        let mut app = app_with_left_listing();
        handle_key_event(&mut app, key(KeyCode::Char('G')));
        assert_eq!(app.nav.state().left_selected, 1); // bottom
        handle_key_event(&mut app, key(KeyCode::Char('g')));
        assert_eq!(app.nav.state().left_selected, 0); // top
    }

    #[test]
    fn tab_toggles_active_pane() {
        use crate::nav::Pane;
        let mut app = app_with_left_listing();
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.nav.state().active_pane, Pane::Right);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.nav.state().active_pane, Pane::Left);
    }

    #[test]
    fn search_mode_captures_printable_keys() {
        let mut app = app_with_left_listing();
        handle_key_event(&mut app, key(KeyCode::Char('/')));
        assert_eq!(app.mode, Mode::Search);
        // "j" edits the filter instead of moving the selection.
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.nav.state().filter, "j");
        assert_eq!(app.nav.state().left_selected, 0);
        handle_key_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.nav.state().filter, "");
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn help_overlay_opens_and_closes() {
        let mut app = app_with_left_listing();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.mode, Mode::Help);
        // Navigation keys are inert while help is open.
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.nav.state().left_selected, 0);
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut app = app_with_left_listing();
        handle_key_event(&mut app, key(KeyCode::Char('x')));
        assert!(!app.should_quit);
        assert_eq!(app.nav.state().left_selected, 0);
    }
}
