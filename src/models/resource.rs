use serde::{Deserialize, Serialize};

/// A file or folder in a course's resource tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    /// Path of the containing collection, e.g. `/group/<site>/Lectures/`.
    pub container: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub size: Option<i64>,
}

impl Resource {
    /// Folders are served as `collection` entries; everything else is a file.
    pub fn is_folder(&self) -> bool {
        self.content_type.as_deref() == Some("collection")
    }
}
