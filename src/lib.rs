//! Paginated video viewer for record pages.
//!
//! Resolves playable URLs for the videos attached to a record and tracks
//! navigation, loading and failure state for a view layer to render.

pub mod config;
pub mod dimensions;
pub mod documents;
pub mod host;
pub mod navigation;
pub mod platform;
pub mod realtime;
pub mod status;
pub mod urls;
pub mod viewer;

pub use host::{Direction, HostAdapter, HostEvent};
pub use viewer::{Pane, VideoViewer, ViewModel, ViewerOptions};
