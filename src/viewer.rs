//! The video viewer component.
//!
//! Combines the document pagination, fetch/playback status and the
//! configurable surface into the values a view layer renders. All inputs
//! arrive through the `on_*` entry points or user navigation; nothing here
//! blocks or fails.

use crate::dimensions::{resolve_dimension, Breakpoints, FormFactor, Size};
use crate::documents::{into_document_list, AttachedDocument, DOCUMENT_OBJECT_API_NAME};
use crate::navigation::{EnablementFlags, NavigationState};
use crate::status::{FetchStatus, LoadErrorState};
use crate::urls::{build_video_url, DownloadScheme};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Public configuration of the component. Everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    pub title: Option<String>,
    pub muted: bool,
    pub show_video_name: bool,
    pub show_video_description: bool,
    pub show_video_count_in_title: bool,
    pub hide_if_no_video_available: bool,
    pub sizes: Breakpoints,
    /// Shown when there is nothing to play or the fetch failed.
    pub no_video_message: Option<String>,
    /// Shown when the player fails.
    pub error_message: Option<String>,
}

/// Identifiers provided by the hosting record page.
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    pub record_id: Option<String>,
    /// Eg. `Account`, `ContentDocument`.
    pub object_api_name: Option<String>,
    pub form_factor: FormFactor,
}

impl HostContext {
    fn is_document_record(&self) -> bool {
        self.object_api_name.as_deref() == Some(DOCUMENT_OBJECT_API_NAME)
    }
}

/// Which pane the view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pane {
    Loading,
    Video,
    NoVideos,
    FetchFailed,
    PlaybackFailed,
}

/// The playing video as the view sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoView {
    pub url: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub muted: bool,
}

/// Snapshot of everything the view renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub show_component: bool,
    pub title: Option<String>,
    pub size: Size,
    pub pane: Pane,
    pub message: Option<String>,
    pub video: Option<VideoView>,
    /// Present only while a video is on screen with others to page to.
    pub navigation: Option<EnablementFlags>,
}

/// One viewer instance on a record page.
#[derive(Debug, Clone)]
pub struct VideoViewer {
    options: ViewerOptions,
    host: HostContext,
    scheme: DownloadScheme,
    navigation: NavigationState,
    status: LoadErrorState,
    has_no_videos: bool,
    /// Set when a document record page plays the record itself.
    self_video_url: Option<String>,
}

impl VideoViewer {
    pub fn new(options: ViewerOptions, host: HostContext) -> Self {
        Self::with_scheme(options, host, DownloadScheme::default())
    }

    pub fn with_scheme(options: ViewerOptions, host: HostContext, scheme: DownloadScheme) -> Self {
        Self {
            options,
            host,
            scheme,
            navigation: NavigationState::new(),
            status: LoadErrorState::new(),
            has_no_videos: true,
            self_video_url: None,
        }
    }

    /// Apply a pushed document list or fetch failure.
    pub fn on_documents<E: Display>(&mut self, result: Result<Vec<AttachedDocument>, E>) {
        let links = match result {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("Failed to fetch attached documents: {}", e);
                self.status.on_error();
                return;
            }
        };

        tracing::info!("Received {} attached documents", links.len());
        self.status.on_data();
        self.navigation.load(into_document_list(links));

        // A document record with nothing attached plays the record itself.
        let plays_record = self.navigation.is_empty()
            && self.host.is_document_record()
            && self.host.record_id.is_some();
        self.has_no_videos = self.navigation.is_empty() && !plays_record;
        self.recompute_self_video_url(plays_record);
    }

    /// Apply the org base URL once it resolves.
    pub fn on_base_url(&mut self, raw: Option<&str>) {
        let base_video_url = self.scheme.base_video_url(raw);
        tracing::debug!("Base video url resolved to {:?}", base_video_url);
        self.set_base_video_url(base_video_url);
    }

    /// Install an already built download prefix.
    pub fn set_base_video_url(&mut self, base_video_url: String) {
        self.navigation.set_base_video_url(base_video_url);
        let plays_record = self.self_video_url.is_some();
        self.recompute_self_video_url(plays_record);
    }

    fn recompute_self_video_url(&mut self, plays_record: bool) {
        self.self_video_url = match (&self.host.record_id, plays_record) {
            (Some(record_id), true) => Some(build_video_url(
                self.navigation.base_video_url(),
                record_id,
            )),
            _ => None,
        };
    }

    /// The embedded player reported an error.
    pub fn on_playback_error(&mut self) {
        tracing::warn!("Video playback failed for {:?}", self.current_video_url());
        self.status.on_playback_error();
    }

    pub fn clear_playback_error(&mut self) {
        self.status.clear_playback_error();
    }

    pub fn next(&mut self) -> bool {
        self.navigation.next()
    }

    pub fn previous(&mut self) -> bool {
        self.navigation.previous()
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn fetch_status(&self) -> FetchStatus {
        self.status.status()
    }

    pub fn has_error(&self) -> bool {
        self.status.has_error()
    }

    pub fn playback_failed(&self) -> bool {
        self.status.playback_failed()
    }

    pub fn has_no_videos(&self) -> bool {
        self.has_no_videos
    }

    pub fn flags(&self) -> EnablementFlags {
        self.navigation.flags()
    }

    pub fn show_navigation(&self) -> bool {
        self.navigation.show_navigation()
    }

    /// URL of the video to play, empty until one is known.
    pub fn current_video_url(&self) -> &str {
        if let Some(current) = self.navigation.current() {
            return &current.url;
        }
        self.self_video_url.as_deref().unwrap_or("")
    }

    /// Title with the optional `(<total>)` suffix.
    pub fn computed_title(&self) -> Option<String> {
        if !self.options.show_video_count_in_title {
            return self.options.title.clone();
        }
        let total = self.navigation.total();
        Some(match &self.options.title {
            Some(title) => format!("{} ({})", title, total),
            None => format!("({})", total),
        })
    }

    pub fn dimensions(&self) -> &Size {
        resolve_dimension(self.host.form_factor, &self.options.sizes)
    }

    fn has_video(&self) -> bool {
        !self.navigation.is_empty() || self.self_video_url.is_some()
    }

    pub fn show_component(&self) -> bool {
        self.has_video() || !self.options.hide_if_no_video_available
    }

    pub fn pane(&self) -> Pane {
        if self.status.is_loading() {
            Pane::Loading
        } else if self.status.fetch_failed() {
            Pane::FetchFailed
        } else if self.has_no_videos {
            Pane::NoVideos
        } else if self.status.playback_failed() {
            Pane::PlaybackFailed
        } else {
            Pane::Video
        }
    }

    /// Message text for the current pane, if it has one.
    pub fn message(&self) -> Option<&str> {
        match self.pane() {
            Pane::NoVideos | Pane::FetchFailed => self.options.no_video_message.as_deref(),
            Pane::PlaybackFailed => self.options.error_message.as_deref(),
            Pane::Loading | Pane::Video => None,
        }
    }

    pub fn view_model(&self) -> ViewModel {
        let pane = self.pane();
        let video = (pane == Pane::Video).then(|| {
            let current = self.navigation.current();
            VideoView {
                url: self.current_video_url().to_string(),
                name: current
                    .filter(|_| self.options.show_video_name)
                    .map(|c| c.title.clone()),
                description: current
                    .filter(|_| self.options.show_video_description)
                    .map(|c| c.description.clone()),
                muted: self.options.muted,
            }
        });

        ViewModel {
            show_component: self.show_component(),
            title: self.computed_title(),
            size: self.dimensions().clone(),
            pane,
            message: self.message().map(str::to_string),
            video,
            navigation: (pane == Pane::Video && self.show_navigation()).then(|| self.flags()),
        }
    }
}
