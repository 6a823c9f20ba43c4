use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::fs::{FsError, Listing};
use crate::nav::PreviewContent;

/// Application events. Terminal input and asynchronous fetch completions all
/// arrive through the same channel, so every state mutation happens on the
/// event loop thread.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A periodic tick for rendering.
    Tick,
    /// Terminal resize event.
    Resize(u16, u16),
    /// A left-pane listing fetch completed.
    LeftListing(FetchResult<Listing>),
    /// A right-pane listing fetch completed. `path` identifies the fetch so
    /// errors can be reconciled against the pending target.
    RightListing { path: String, result: FetchResult<Listing> },
    /// The minimum-visible-loading timer for a settling target elapsed.
    Settle { target: String },
    /// Preview bytes for `path` finished loading (`None` on error).
    Preview { path: String, content: Option<PreviewContent> },
}

/// Fetch results carry the service error for status reporting.
pub type FetchResult<T> = std::result::Result<T, FsError>;

/// Async event handler that polls crossterm events and forwards them via a
/// channel, alongside completions sent by spawned fetch tasks.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) => {
                            if event_tx.send(Event::Key(key)).is_err() {
                                break;
                            }
                        }
                        Ok(CrosstermEvent::Resize(w, h)) => {
                            if event_tx.send(Event::Resize(w, h)).is_err() {
                                break;
                            }
                        }
                        _ => {}
                    }
                } else if event_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Get a sender clone for async tasks to send completion events.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (blocks until available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}
