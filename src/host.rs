//! Glue between the hosting page and the viewer.
//!
//! The fetch collaborators, the realtime subscription and user input all
//! push `HostEvent`s into one channel; the adapter applies them in order.

use crate::documents::AttachedDocument;
use crate::platform::{spawn_documents_fetch, PlatformClient};
use crate::viewer::VideoViewer;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Navigation requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Events pushed into the viewer.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// Result of an attached documents fetch.
    Documents(Result<Vec<AttachedDocument>, String>),
    /// The org base URL resolved.
    BaseUrl(Option<String>),
    /// The embedded player failed.
    PlaybackFailed,
    Navigate(Direction),
    /// Attachments of the record changed upstream.
    RefreshRequested,
}

/// Handle to re-run the documents fetch for the current record.
///
/// At most one fetch is in flight; starting a new one aborts the previous
/// one so an older response can never land after a newer one.
pub struct Refetch {
    client: PlatformClient,
    record_id: String,
    event_tx: mpsc::Sender<HostEvent>,
    in_flight: Option<JoinHandle<()>>,
}

impl Refetch {
    pub fn new(client: PlatformClient, record_id: String, event_tx: mpsc::Sender<HostEvent>) -> Self {
        Self {
            client,
            record_id,
            event_tx,
            in_flight: None,
        }
    }

    /// Start a fetch; the result arrives as `HostEvent::Documents`.
    pub fn spawn(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                tracing::debug!("Superseding in-flight documents fetch");
                previous.abort();
            }
        }
        self.in_flight = Some(spawn_documents_fetch(
            self.client.clone(),
            self.record_id.clone(),
            self.event_tx.clone(),
        ));
    }
}

/// Applies pushed events to one viewer instance.
pub struct HostAdapter {
    viewer: VideoViewer,
    events: mpsc::Receiver<HostEvent>,
    refetch: Option<Refetch>,
}

impl HostAdapter {
    pub fn new(viewer: VideoViewer, events: mpsc::Receiver<HostEvent>) -> Self {
        Self {
            viewer,
            events,
            refetch: None,
        }
    }

    pub fn with_refetch(mut self, refetch: Refetch) -> Self {
        self.refetch = Some(refetch);
        self
    }

    pub fn viewer(&self) -> &VideoViewer {
        &self.viewer
    }

    /// Apply a single event.
    pub fn apply(&mut self, event: HostEvent) {
        match event {
            HostEvent::Documents(result) => self.viewer.on_documents(result),
            HostEvent::BaseUrl(raw) => self.viewer.on_base_url(raw.as_deref()),
            HostEvent::PlaybackFailed => self.viewer.on_playback_error(),
            HostEvent::Navigate(Direction::Next) => {
                if !self.viewer.next() {
                    tracing::debug!("Already at the last video");
                }
            }
            HostEvent::Navigate(Direction::Previous) => {
                if !self.viewer.previous() {
                    tracing::debug!("Already at the first video");
                }
            }
            HostEvent::RefreshRequested => match &mut self.refetch {
                Some(refetch) => {
                    tracing::info!("Attachments changed, fetching again");
                    refetch.spawn();
                }
                None => tracing::debug!("Refresh requested but no fetcher configured"),
            },
        }
    }

    /// Drain events, calling `on_change` after each.
    ///
    /// Returns once every sender is gone. A configured `Refetch` holds a
    /// sender itself, so with one attached this only ends when the future
    /// is dropped.
    pub async fn run<F>(mut self, mut on_change: F) -> VideoViewer
    where
        F: FnMut(&VideoViewer),
    {
        while let Some(event) = self.events.recv().await {
            tracing::debug!("Host event: {:?}", event);
            self.apply(event);
            on_change(&self.viewer);
        }
        tracing::info!("Host event channel closed");
        self.viewer
    }
}
