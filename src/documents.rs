//! Attached document records.
//!
//! The platform returns one link record per attachment; only the nested
//! document fields matter to the viewer.

use serde::{Deserialize, Serialize};

/// Object api name of a document record page.
pub const DOCUMENT_OBJECT_API_NAME: &str = "ContentDocument";

/// A video file attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Ordered documents in display order.
pub type DocumentList = Vec<Document>;

/// Link record as pushed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttachedDocument {
    #[serde(default)]
    pub content_document_id: Option<String>,
    pub content_document: ContentDocument,
}

/// Nested document fields of a link record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContentDocument {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<AttachedDocument> for Document {
    fn from(link: AttachedDocument) -> Self {
        let doc = link.content_document;
        Self {
            id: doc.id,
            title: doc.title.unwrap_or_default(),
            description: doc.description.unwrap_or_default(),
        }
    }
}

/// Flatten a pushed link list, keeping order.
pub fn into_document_list(links: Vec<AttachedDocument>) -> DocumentList {
    links.into_iter().map(Document::from).collect()
}
