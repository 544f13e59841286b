//! Pagination over the attached documents.
//!
//! Tracks the current position, the fields derived from it and which
//! navigation buttons are disabled. Moving past either end is a no-op.

use crate::documents::{Document, DocumentList};
use crate::urls::build_video_url;
use serde::Serialize;

/// Fields of the document at the current position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CurrentVideo {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// Disabled state of the previous/next buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnablementFlags {
    pub previous_disabled: bool,
    pub next_disabled: bool,
}

impl EnablementFlags {
    /// Flags for a fresh position at the start of `total` items.
    fn at_start(total: usize) -> Self {
        Self {
            previous_disabled: true,
            next_disabled: total <= 1,
        }
    }
}

/// Position within the document list.
#[derive(Debug, Clone)]
pub struct NavigationState {
    items: DocumentList,
    index: usize,
    base_video_url: String,
    flags: EnablementFlags,
    /// Derived from `items[index]`; `None` while empty.
    current: Option<CurrentVideo>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: 0,
            base_video_url: String::new(),
            flags: EnablementFlags::at_start(0),
            current: None,
        }
    }

    /// Replace the list and move to its first document.
    pub fn load(&mut self, items: DocumentList) {
        self.items = items;
        self.index = 0;
        self.flags = EnablementFlags::at_start(self.items.len());
        self.recompute_derived_fields();

        tracing::debug!(
            "Loaded {} documents, navigation {}",
            self.total(),
            if self.show_navigation() { "shown" } else { "hidden" }
        );
    }

    /// Set the download prefix and refresh the current URL.
    pub fn set_base_video_url(&mut self, base_video_url: String) {
        self.base_video_url = base_video_url;
        self.recompute_derived_fields();
    }

    /// Advance one document. Returns whether the position changed.
    pub fn next(&mut self) -> bool {
        let total = self.total();
        if total == 0 || self.index >= total - 1 {
            return false;
        }

        self.index += 1;
        self.recompute_derived_fields();
        self.flags.previous_disabled = false;
        if self.index == total - 1 {
            self.flags.next_disabled = true;
        }
        true
    }

    /// Step back one document. Returns whether the position changed.
    pub fn previous(&mut self) -> bool {
        if self.index == 0 || self.is_empty() {
            return false;
        }

        self.index -= 1;
        self.recompute_derived_fields();
        self.flags.next_disabled = false;
        if self.index == 0 {
            self.flags.previous_disabled = true;
        }
        true
    }

    /// Rebuild title, description and URL from `items[index]`.
    fn recompute_derived_fields(&mut self) {
        self.current = self.items.get(self.index).map(|doc| CurrentVideo {
            title: doc.title.clone(),
            description: doc.description.clone(),
            url: build_video_url(&self.base_video_url, &doc.id),
        });
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current position, only meaningful when not empty.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&CurrentVideo> {
        self.current.as_ref()
    }

    pub fn current_document(&self) -> Option<&Document> {
        self.items.get(self.index)
    }

    pub fn flags(&self) -> EnablementFlags {
        self.flags
    }

    pub fn base_video_url(&self) -> &str {
        &self.base_video_url
    }

    /// Navigation controls are only useful with more than one document.
    pub fn show_navigation(&self) -> bool {
        self.total() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(n: usize) -> DocumentList {
        (1..=n)
            .map(|i| Document {
                id: format!("069{}", i),
                title: format!("Test File {}", i),
                description: format!("Description for Test File {}", i),
            })
            .collect()
    }

    fn loaded(n: usize) -> NavigationState {
        let mut nav = NavigationState::new();
        nav.set_base_video_url("http://localhost/".to_string());
        nav.load(docs(n));
        nav
    }

    #[test]
    fn load_starts_at_first_document() {
        for n in 1..=5 {
            let nav = loaded(n);
            assert_eq!(nav.index(), 0);
            assert_eq!(nav.total(), n);
            assert!(nav.flags().previous_disabled);
            assert_eq!(nav.flags().next_disabled, n == 1);
        }
    }

    #[test]
    fn load_derives_current_fields() {
        let nav = loaded(2);
        let current = nav.current().expect("current video");
        assert_eq!(current.title, "Test File 1");
        assert_eq!(current.description, "Description for Test File 1");
        assert_eq!(current.url, "http://localhost/0691");
    }

    #[test]
    fn empty_list_has_no_current() {
        let nav = loaded(0);
        assert!(nav.is_empty());
        assert!(nav.current().is_none());
        assert!(!nav.show_navigation());
        assert!(nav.flags().previous_disabled);
        assert!(nav.flags().next_disabled);
    }

    #[test]
    fn next_to_last_disables_next() {
        let mut nav = loaded(2);
        assert!(nav.next());
        assert_eq!(nav.index(), 1);
        assert_eq!(
            nav.flags(),
            EnablementFlags {
                previous_disabled: false,
                next_disabled: true
            }
        );
        assert_eq!(nav.current().map(|c| c.title.as_str()), Some("Test File 2"));
    }

    #[test]
    fn middle_position_enables_both() {
        let mut nav = loaded(3);
        nav.next();
        assert_eq!(
            nav.flags(),
            EnablementFlags {
                previous_disabled: false,
                next_disabled: false
            }
        );
    }

    #[test]
    fn next_at_end_is_noop() {
        let mut nav = loaded(2);
        nav.next();
        assert!(!nav.next());
        assert_eq!(nav.index(), 1);
        assert!(nav.flags().next_disabled);
    }

    #[test]
    fn previous_at_start_is_noop() {
        let mut nav = loaded(2);
        assert!(!nav.previous());
        assert_eq!(nav.index(), 0);
        assert!(nav.flags().previous_disabled);
        assert!(!nav.flags().next_disabled);
    }

    #[test]
    fn navigation_on_empty_is_noop() {
        let mut nav = loaded(0);
        assert!(!nav.next());
        assert!(!nav.previous());
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn next_then_previous_round_trips() {
        for n in 2..=5 {
            let mut nav = loaded(n);
            for start in 0..n - 1 {
                while nav.index() < start {
                    nav.next();
                }
                let index = nav.index();
                let flags = nav.flags();
                nav.next();
                nav.previous();
                assert_eq!(nav.index(), index, "n={} start={}", n, start);
                assert_eq!(nav.flags(), flags, "n={} start={}", n, start);
            }
        }
    }

    #[test]
    fn back_to_start_disables_previous() {
        let mut nav = loaded(3);
        nav.next();
        nav.previous();
        assert!(nav.flags().previous_disabled);
        assert!(!nav.flags().next_disabled);
    }

    #[test]
    fn navigation_shown_only_with_several_documents() {
        assert!(!loaded(0).show_navigation());
        assert!(!loaded(1).show_navigation());
        assert!(loaded(2).show_navigation());
    }

    #[test]
    fn late_base_url_updates_current_url() {
        let mut nav = NavigationState::new();
        nav.load(docs(2));
        assert_eq!(nav.current().map(|c| c.url.as_str()), Some("0691"));

        nav.set_base_video_url("https://org/download/".to_string());
        assert_eq!(
            nav.current().map(|c| c.url.as_str()),
            Some("https://org/download/0691")
        );
    }

    #[test]
    fn reload_resets_position() {
        let mut nav = loaded(3);
        nav.next();
        nav.next();
        nav.load(docs(2));
        assert_eq!(nav.index(), 0);
        assert!(nav.flags().previous_disabled);
        assert!(!nav.flags().next_disabled);
    }
}
