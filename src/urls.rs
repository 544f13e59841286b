//! Playable video URL construction.

use serde::Deserialize;

/// Marker inserted after the org's first host label.
pub const CUSTOM_PART: &str = "--c";

/// File download path on the document domain.
pub const DOWNLOAD_PART: &str = ".documentforce.com/sfc/servlet.shepherd/document/download/";

/// How an org base URL maps to its download prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DownloadScheme {
    pub custom_part: String,
    pub download_path: String,
}

impl Default for DownloadScheme {
    fn default() -> Self {
        Self {
            custom_part: CUSTOM_PART.to_string(),
            download_path: DOWNLOAD_PART.to_string(),
        }
    }
}

impl DownloadScheme {
    /// Download prefix for an org, or an empty string while unresolved.
    pub fn base_video_url(&self, raw_base_url: Option<&str>) -> String {
        match raw_base_url {
            Some(raw) if !raw.is_empty() => {
                let domain = raw.split('.').next().unwrap_or(raw);
                format!("{}{}{}", domain, self.custom_part, self.download_path)
            }
            _ => String::new(),
        }
    }
}

/// Download prefix using the default scheme.
pub fn build_base_video_url(raw_base_url: Option<&str>) -> String {
    DownloadScheme::default().base_video_url(raw_base_url)
}

/// Playable URL for one document. `base_video_url` must end with a separator.
pub fn build_video_url(base_video_url: &str, document_id: &str) -> String {
    format!("{}{}", base_video_url, document_id)
}
