//! Navigation controller: the single owner of the dual-pane state.
//!
//! All mutations go through one reducer-style entry point per operation and
//! run on the event loop thread. Asynchronous listing fetches may complete in
//! any order; arrivals are reconciled against the *current* pending target,
//! so a slow fetch for an abandoned target is stored but never resurrects
//! stale loading UI. The same rule applies to the minimum-visible-loading
//! timer: a settle that fires for a superseded target is ignored.
//!
//! Operations never perform I/O themselves; they record [`Effect`]s that the
//! event loop executes, which is what makes arrival-order races directly
//! testable below.

use crate::fs::{Entry, Listing};
use crate::vpath;

/// Preview zoom bounds and step.
const ZOOM_MIN: f64 = 0.25;
const ZOOM_MAX: f64 = 8.0;
const ZOOM_STEP: f64 = 1.2;

/// One of the two directory panes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Left,
    Right,
}

/// Side effects requested by controller operations, executed by the event
/// loop (fetches, timers, opening files).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchLeft(String),
    FetchRight(String),
    /// Start the minimum-visible-loading timer for a settling right target.
    StartSettle(String),
    FetchPreview(String),
    /// Hand the file at this virtual path to the OS opener.
    OpenFile(String),
}

/// Loaded preview content for the selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewContent {
    Text(String),
    Binary { size: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewData {
    pub path: String,
    pub content: PreviewContent,
}

/// The complete navigation state. Owned exclusively by [`NavController`];
/// rendering reads it, nothing else writes it.
#[derive(Debug, Clone, Default)]
pub struct NavState {
    pub left_path: String,
    pub left_listing: Option<Listing>,
    pub left_selected: usize,
    pub left_loading: bool,

    pub right_path: String,
    pub right_listing: Option<Listing>,
    pub right_selected: usize,
    pub right_loading: bool,
    /// Logical lock against re-entrant pane shifts while one is in flight.
    /// Spans loading and settling; not a concurrency primitive.
    pub right_locked: bool,

    /// The virtual path the right pane is currently supposed to settle on.
    pub pending_right_target: Option<String>,
    /// Child name the left pane must select once its next listing arrives.
    pub pending_left_select: Option<String>,
    /// Set while a left/right refresh fetch is in flight; its arrival
    /// preserves the selection and (for the right pane) completes
    /// immediately instead of deferring.
    pub pending_left_reload: bool,
    pub pending_right_reload: bool,

    pub active_pane: Pane,
    /// Case-insensitive substring filter over the right pane.
    pub filter: String,

    pub preview: Option<PreviewData>,
    pub preview_loading: bool,
    /// Virtual path the preview is loading or showing.
    pub preview_target: Option<String>,
    pub preview_max: bool,
    pub preview_scale: f64,
}

impl NavState {
    /// Directory-only subset of the left listing, in listing order.
    pub fn left_dirs(&self) -> Vec<&Entry> {
        self.left_listing
            .as_ref()
            .map(|l| l.entries.iter().filter(|e| e.is_dir).collect())
            .unwrap_or_default()
    }

    /// Right-pane entries with the substring filter applied.
    pub fn right_filtered(&self) -> Vec<&Entry> {
        let Some(listing) = &self.right_listing else {
            return Vec::new();
        };
        let needle = self.filter.to_lowercase();
        listing
            .entries
            .iter()
            .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn right_selected_entry(&self) -> Option<&Entry> {
        self.right_filtered().get(self.right_selected).copied()
    }
}

/// Owns [`NavState`] and guarantees the two panes never show mutually
/// inconsistent data under rapid input and out-of-order fetch completions.
pub struct NavController {
    state: NavState,
    effects: Vec<Effect>,
}

impl NavController {
    pub fn new() -> Self {
        let mut controller = Self {
            state: NavState { left_path: "/".to_string(), preview_scale: 1.0, ..NavState::default() },
            effects: Vec::new(),
        };
        controller.state.left_loading = true;
        controller.effects.push(Effect::FetchLeft("/".to_string()));
        controller
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    /// Drain the side effects recorded by operations since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // ── Commands ────────────────────────────────────────────────────────────

    /// Point the left pane at a new path and fetch its listing.
    pub fn set_left_path(&mut self, path: &str) {
        self.state.left_path = vpath::normalize(path);
        self.state.left_loading = true;
        self.effects.push(Effect::FetchLeft(self.state.left_path.clone()));
    }

    /// Drill into the selected right-pane directory: the right path is
    /// promoted to become the new left path, with the child pre-selected.
    /// Rejected while a previous shift is still in flight.
    pub fn shift_right_to_left(&mut self) {
        if self.state.active_pane != Pane::Right {
            return;
        }
        if self.state.right_locked || self.state.right_loading {
            return;
        }
        let Some(entry) = self.state.right_selected_entry().cloned() else {
            return;
        };
        if !entry.is_dir {
            return;
        }
        let old_right = self.state.right_path.clone();
        self.state.pending_left_select = Some(entry.name.clone());
        self.state.pending_right_target = Some(vpath::join(&old_right, &entry.name));
        self.state.right_locked = true;
        self.state.right_loading = true;
        self.set_left_path(&old_right);
    }

    /// Move up one level (left pane), or re-focus the parent entry shown on
    /// the left (right pane) without touching any data.
    pub fn go_parent(&mut self) {
        match self.state.active_pane {
            Pane::Right => {
                let dir_name = vpath::basename(&self.state.right_path).to_string();
                if let Some(listing) = &self.state.left_listing {
                    let dirs: Vec<&Entry> =
                        listing.entries.iter().filter(|e| e.is_dir).collect();
                    if let Some(idx) = dirs.iter().position(|e| e.name == dir_name) {
                        self.state.left_selected = idx;
                    }
                }
                self.state.active_pane = Pane::Left;
                self.derive_right();
            }
            Pane::Left => {
                if self.state.left_path == "/" || self.state.left_path.is_empty() {
                    return;
                }
                let child = vpath::basename(&self.state.left_path).to_string();
                self.state.pending_left_select = Some(child);
                let parent = vpath::parent(&self.state.left_path);
                self.set_left_path(&parent);
            }
        }
    }

    /// Adjust the active pane's selection, clamped to its entry count.
    /// No-op on the right pane while it is loading.
    pub fn move_selection(&mut self, delta: isize) {
        match self.state.active_pane {
            Pane::Left => {
                let len = self.state.left_dirs().len();
                self.state.left_selected = step(self.state.left_selected, delta, len);
                self.derive_right();
            }
            Pane::Right => {
                if self.state.right_loading {
                    return;
                }
                let len = self.state.right_filtered().len();
                self.state.right_selected = step(self.state.right_selected, delta, len);
                self.sync_preview();
            }
        }
    }

    pub fn go_top(&mut self) {
        match self.state.active_pane {
            Pane::Left => {
                self.state.left_selected = 0;
                self.derive_right();
            }
            Pane::Right => {
                if self.state.right_loading {
                    return;
                }
                self.state.right_selected = 0;
                self.sync_preview();
            }
        }
    }

    pub fn go_bottom(&mut self) {
        match self.state.active_pane {
            Pane::Left => {
                self.state.left_selected = self.state.left_dirs().len().saturating_sub(1);
                self.derive_right();
            }
            Pane::Right => {
                if self.state.right_loading {
                    return;
                }
                self.state.right_selected =
                    self.state.right_filtered().len().saturating_sub(1);
                self.sync_preview();
            }
        }
    }

    /// Re-issue the listing fetch for a pane without changing its path.
    /// A left refresh re-fetches the right pane too, since right depends on
    /// left; a right refresh completes immediately on arrival instead of
    /// deferring.
    pub fn refresh(&mut self, pane: Pane) {
        match pane {
            Pane::Left => {
                self.state.left_loading = true;
                self.state.pending_left_reload = true;
                self.effects.push(Effect::FetchLeft(self.state.left_path.clone()));
                if !self.state.right_path.is_empty() {
                    self.effects.push(Effect::FetchRight(self.state.right_path.clone()));
                }
            }
            Pane::Right => {
                if self.state.right_path.is_empty() {
                    return;
                }
                self.state.pending_right_reload = true;
                self.state.right_locked = true;
                self.state.right_loading = true;
                self.effects.push(Effect::FetchRight(self.state.right_path.clone()));
            }
        }
    }

    /// `open` action: on the left pane just moves focus to the right; on the
    /// right pane drills into directories. Files are ignored here.
    pub fn open_selected(&mut self) {
        if self.state.active_pane == Pane::Left {
            self.state.active_pane = Pane::Right;
            return;
        }
        if self.state.right_locked || self.state.right_loading {
            return;
        }
        if self.state.right_selected_entry().is_some_and(|e| e.is_dir) {
            self.shift_right_to_left();
        }
    }

    /// `openFile` action: directories drill in like `open`; files emit the
    /// open-file side effect, suppressed while their preview is still
    /// loading so a half-loaded resource is never launched.
    pub fn open_file(&mut self) {
        if self.state.active_pane == Pane::Left {
            self.state.active_pane = Pane::Right;
            return;
        }
        if self.state.right_locked || self.state.right_loading {
            return;
        }
        let Some(entry) = self.state.right_selected_entry().cloned() else {
            return;
        };
        if entry.is_dir {
            self.shift_right_to_left();
            return;
        }
        if self.state.preview_loading {
            return;
        }
        self.effects.push(Effect::OpenFile(vpath::join(&self.state.right_path, &entry.name)));
    }

    pub fn toggle_pane(&mut self) {
        self.state.active_pane = match self.state.active_pane {
            Pane::Left => Pane::Right,
            Pane::Right => Pane::Left,
        };
    }

    /// Replace the right-pane substring filter, keeping the selection inside
    /// the (possibly smaller) filtered set.
    pub fn set_filter(&mut self, filter: String) {
        self.state.filter = filter;
        let len = self.state.right_filtered().len();
        if self.state.right_selected >= len {
            self.state.right_selected = len.saturating_sub(1);
        }
        self.sync_preview();
    }

    // ── Preview zoom ────────────────────────────────────────────────────────

    pub fn toggle_preview_max(&mut self) {
        if self.state.right_selected_entry().is_none_or(|e| e.is_dir) {
            return;
        }
        self.state.preview_max = !self.state.preview_max;
    }

    pub fn zoom_in(&mut self) {
        if self.zoom_blocked() {
            return;
        }
        self.state.preview_scale = (self.state.preview_scale * ZOOM_STEP).min(ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        if self.zoom_blocked() {
            return;
        }
        self.state.preview_scale = (self.state.preview_scale / ZOOM_STEP).max(ZOOM_MIN);
    }

    pub fn zoom_reset(&mut self) {
        if self.zoom_blocked() {
            return;
        }
        self.state.preview_scale = 1.0;
    }

    fn zoom_blocked(&self) -> bool {
        !self.state.preview_max || self.state.right_selected_entry().is_none_or(|e| e.is_dir)
    }

    // ── Fetch completions ───────────────────────────────────────────────────

    /// A left-pane listing arrived. Resolves any pending child selection,
    /// then re-derives the right-pane target.
    pub fn on_left_listing(&mut self, listing: Listing) {
        self.state.left_listing = Some(listing);
        self.state.left_loading = false;

        if self.state.pending_left_reload {
            // Refresh of an unchanged path: keep the selection where it was.
            self.state.pending_left_reload = false;
        } else if let Some(name) = self.state.pending_left_select.take() {
            let dirs = self.state.left_dirs();
            match dirs.iter().position(|e| e.name == name) {
                Some(idx) => self.state.left_selected = idx,
                None => {
                    // The expected child vanished between request and
                    // response; abandon the shift and fall back to a safe
                    // default instead of surfacing an error.
                    self.cancel_pending_shift();
                    self.state.left_selected = 0;
                }
            }
        } else {
            self.state.left_selected = 0;
        }

        let len = self.state.left_dirs().len();
        if self.state.left_selected >= len {
            self.state.left_selected = len.saturating_sub(1);
        }
        self.derive_right();
    }

    /// A left-pane fetch failed: clear the loading flag and abandon any
    /// pending shift so the lock cannot stick.
    pub fn on_left_error(&mut self) {
        self.state.left_loading = false;
        self.cancel_pending_shift();
    }

    /// A right-pane listing arrived. The arrival is always stored (listings
    /// are replaced wholesale), but only an arrival matching the current
    /// pending target may move the pane towards unlocking, and even then only
    /// via the deferred settle timer, so an instant response still shows a
    /// perceptible loading transition. Refresh arrivals complete immediately
    /// and preserve the selection.
    pub fn on_right_listing(&mut self, listing: Listing) {
        let arrived_path = listing.path.clone();
        self.state.right_listing = Some(listing);

        if self.state.pending_right_reload {
            self.state.pending_right_reload = false;
            self.state.right_locked = false;
            self.state.right_loading = false;
            self.clamp_right_selection();
        } else if self.state.pending_right_target.as_deref() == Some(arrived_path.as_str()) {
            self.state.right_selected = 0;
            self.effects.push(Effect::StartSettle(arrived_path));
        } else {
            // Stale with respect to UI affordance (or a dependent refetch
            // after a left refresh): data is stored, flags stay untouched.
            self.clamp_right_selection();
        }
        self.sync_preview();
    }

    /// A right-pane fetch failed. For the current target this means the
    /// target vanished: reset to a safe default. Failures of abandoned
    /// fetches are ignored outright.
    pub fn on_right_error(&mut self, path: &str) {
        let current = self.state.pending_right_target.as_deref() == Some(path)
            || path == self.state.right_path;
        if !current {
            return;
        }
        self.state.right_listing = None;
        self.state.right_selected = 0;
        self.cancel_pending_shift();
        self.sync_preview();
    }

    /// The minimum-visible-loading timer fired. Only honored if its target
    /// is still the pending one; a timer for a superseded target is stale.
    pub fn on_settle(&mut self, target: &str) {
        if self.state.pending_right_target.as_deref() == Some(target) {
            self.state.pending_right_target = None;
            self.state.right_loading = false;
            self.state.right_locked = false;
        }
    }

    /// Preview bytes arrived (`None` on error). Ignored unless they are for
    /// the entry currently being previewed.
    pub fn on_preview(&mut self, path: &str, content: Option<PreviewContent>) {
        if self.state.preview_target.as_deref() != Some(path) {
            return;
        }
        self.state.preview_loading = false;
        self.state.preview =
            content.map(|c| PreviewData { path: path.to_string(), content: c });
    }

    // ── Internal ────────────────────────────────────────────────────────────

    /// Derivation rule: once the left listing reflects the left path, the
    /// right pane must show the selected left directory. A change of target
    /// marks the right pane loading and fetches it; no directory at all
    /// clears the right pane entirely.
    fn derive_right(&mut self) {
        let Some(listing) = &self.state.left_listing else {
            return;
        };
        if listing.path != self.state.left_path {
            // Left has not caught up to its own path yet; right may lag.
            return;
        }
        let dirs: Vec<&Entry> = listing.entries.iter().filter(|e| e.is_dir).collect();
        if dirs.is_empty() {
            self.state.pending_right_target = None;
            self.state.pending_right_reload = false;
            self.state.right_path.clear();
            self.state.right_listing = None;
            self.state.right_selected = 0;
            self.state.right_loading = false;
            self.state.right_locked = false;
            self.sync_preview();
            return;
        }
        let idx = self.state.left_selected.min(dirs.len() - 1);
        let target = vpath::join(&listing.path, &dirs[idx].name);
        if target != self.state.right_path {
            self.state.pending_right_target = Some(target.clone());
            self.state.right_loading = true;
            self.state.right_path = target.clone();
            self.effects.push(Effect::FetchRight(target));
        }
    }

    /// Abandon an in-flight pane shift: clear the pending target and lock.
    fn cancel_pending_shift(&mut self) {
        self.state.pending_left_select = None;
        self.state.pending_right_target = None;
        self.state.pending_right_reload = false;
        self.state.right_loading = false;
        self.state.right_locked = false;
    }

    fn clamp_right_selection(&mut self) {
        let len = self.state.right_filtered().len();
        if self.state.right_selected >= len {
            self.state.right_selected = len.saturating_sub(1);
        }
    }

    /// Keep the preview in step with the selected right-pane entry, fetching
    /// when it points at a file we are not already loading or showing.
    fn sync_preview(&mut self) {
        let target = self.state.right_selected_entry().and_then(|e| {
            if e.is_dir {
                None
            } else {
                Some(vpath::join(&self.state.right_path, &e.name))
            }
        });
        match target {
            None => {
                self.state.preview = None;
                self.state.preview_loading = false;
                self.state.preview_target = None;
                self.state.preview_scale = 1.0;
            }
            Some(path) => {
                if self.state.preview_target.as_deref() == Some(path.as_str()) {
                    return;
                }
                self.state.preview = None;
                self.state.preview_loading = true;
                self.state.preview_target = Some(path.clone());
                self.state.preview_scale = 1.0;
                self.effects.push(Effect::FetchPreview(path));
            }
        }
    }
}

impl Default for NavController {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamped signed step within `[0, len)`; empty lists pin the index to 0.
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = (len - 1) as isize;
    (current as isize + delta).clamp(0, max) as usize
}
