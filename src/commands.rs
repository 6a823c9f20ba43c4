//! Command layer: abstract actions and the key bindings that trigger them.
//!
//! Actions are decoupled from keys so the keymap can be reconfigured from
//! the config file without touching any navigation logic.

use std::collections::HashMap;

use crate::nav::NavController;

/// Abstract user actions, each bound to zero or more keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Down,
    Up,
    Back,
    Open,
    OpenFile,
    Top,
    Bottom,
    Refresh,
    Search,
    TogglePreviewMax,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Help,
}

impl Action {
    pub const ALL: [Action; 14] = [
        Action::Down,
        Action::Up,
        Action::Back,
        Action::Open,
        Action::OpenFile,
        Action::Top,
        Action::Bottom,
        Action::Refresh,
        Action::Search,
        Action::TogglePreviewMax,
        Action::ZoomIn,
        Action::ZoomOut,
        Action::ZoomReset,
        Action::Help,
    ];

    /// Config-file name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Down => "down",
            Action::Up => "up",
            Action::Back => "back",
            Action::Open => "open",
            Action::OpenFile => "openFile",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::Refresh => "refresh",
            Action::Search => "search",
            Action::TogglePreviewMax => "togglePreviewMax",
            Action::ZoomIn => "zoomIn",
            Action::ZoomOut => "zoomOut",
            Action::ZoomReset => "zoomReset",
            Action::Help => "help",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.name() == name)
    }

    /// Short description shown in the help overlay.
    pub fn description(&self) -> &'static str {
        match self {
            Action::Down => "Move down",
            Action::Up => "Move up",
            Action::Back => "Go parent",
            Action::Open => "Open folder",
            Action::OpenFile => "Open file",
            Action::Top => "Go top",
            Action::Bottom => "Go bottom",
            Action::Refresh => "Reload",
            Action::Search => "Filter entries",
            Action::TogglePreviewMax => "Toggle preview maximize",
            Action::ZoomIn => "Zoom in preview",
            Action::ZoomOut => "Zoom out preview",
            Action::ZoomReset => "Reset preview zoom",
            Action::Help => "Show keybinds",
        }
    }
}

/// Apply a navigation action to the controller. `Search` and `Help` are
/// handled by the app (they open overlays, not navigation), so this returns
/// `false` for them.
pub fn dispatch(action: Action, nav: &mut NavController) -> bool {
    match action {
        Action::Down => nav.move_selection(1),
        Action::Up => nav.move_selection(-1),
        Action::Back => nav.go_parent(),
        Action::Open => nav.open_selected(),
        Action::OpenFile => nav.open_file(),
        Action::Top => nav.go_top(),
        Action::Bottom => nav.go_bottom(),
        Action::Refresh => {
            let pane = nav.state().active_pane;
            nav.refresh(pane);
        }
        Action::TogglePreviewMax => nav.toggle_preview_max(),
        Action::ZoomIn => nav.zoom_in(),
        Action::ZoomOut => nav.zoom_out(),
        Action::ZoomReset => nav.zoom_reset(),
        Action::Search | Action::Help => return false,
    }
    true
}

/// Key-name → action table, defaults merged with config overrides.
///
/// Key names are the literal character for printable keys (case matters:
/// `G` is shift+g) and lowercase names for special keys (`enter`).
#[derive(Debug, Clone)]
pub struct Keymap {
    map: HashMap<String, Action>,
}

impl Keymap {
    pub fn default_bindings() -> Vec<(&'static str, Action)> {
        vec![
            ("j", Action::Down),
            ("k", Action::Up),
            ("h", Action::Back),
            ("l", Action::Open),
            ("enter", Action::OpenFile),
            ("g", Action::Top),
            ("G", Action::Bottom),
            ("r", Action::Refresh),
            ("/", Action::Search),
            ("f", Action::TogglePreviewMax),
            ("+", Action::ZoomIn),
            ("=", Action::ZoomIn),
            ("-", Action::ZoomOut),
            ("_", Action::ZoomOut),
            ("0", Action::ZoomReset),
            ("?", Action::Help),
        ]
    }

    /// Build the effective keymap: defaults overlaid with `[keys]` entries
    /// from the config file. Unknown action names are skipped with a warning.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut map: HashMap<String, Action> = Self::default_bindings()
            .into_iter()
            .map(|(k, a)| (k.to_string(), a))
            .collect();
        for (key, action_name) in overrides {
            match Action::from_name(action_name) {
                Some(action) => {
                    map.insert(key.clone(), action);
                }
                None => tracing::warn!("unknown action {action_name:?} bound to {key:?}"),
            }
        }
        Self { map }
    }

    pub fn lookup(&self, key: &str) -> Option<Action> {
        self.map.get(key).copied()
    }

    /// Bindings grouped per action, in `Action::ALL` order, for the help
    /// overlay and footer.
    pub fn bindings(&self) -> Vec<(Action, Vec<String>)> {
        Action::ALL
            .iter()
            .map(|action| {
                let mut keys: Vec<String> = self
                    .map
                    .iter()
                    .filter(|(_, a)| **a == *action)
                    .map(|(k, _)| k.clone())
                    .collect();
                keys.sort();
                (*action, keys)
            })
            .collect()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::with_overrides(&HashMap::new())
    }
}
