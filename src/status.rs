//! Fetch and playback failure tracking.

use serde::Serialize;

/// Outcome of the latest document fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FetchStatus {
    #[default]
    Loading,
    Loaded,
    Errored,
}

/// Fetch status plus the independent playback failure flag.
#[derive(Debug, Clone, Default)]
pub struct LoadErrorState {
    status: FetchStatus,
    playback_failed: bool,
}

impl LoadErrorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document list arrived. Also recovers from an earlier error.
    pub fn on_data(&mut self) {
        if self.status != FetchStatus::Loaded {
            tracing::debug!("Fetch status {:?} -> Loaded", self.status);
        }
        self.status = FetchStatus::Loaded;
    }

    /// Fetching failed; only the fact is kept.
    pub fn on_error(&mut self) {
        if self.status != FetchStatus::Errored {
            tracing::debug!("Fetch status {:?} -> Errored", self.status);
        }
        self.status = FetchStatus::Errored;
    }

    /// The player reported a runtime error.
    pub fn on_playback_error(&mut self) {
        self.playback_failed = true;
    }

    pub fn clear_playback_error(&mut self) {
        self.playback_failed = false;
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn fetch_failed(&self) -> bool {
        self.status == FetchStatus::Errored
    }

    pub fn playback_failed(&self) -> bool {
        self.playback_failed
    }

    /// Either failure happened.
    pub fn has_error(&self) -> bool {
        self.fetch_failed() || self.playback_failed
    }
}
