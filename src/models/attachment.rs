use serde::{Deserialize, Serialize};

/// A file attached to an assignment or announcement.
///
/// Attachments are cached under their parent's id, independently of the
/// parent entity itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub size: Option<i64>,
}
