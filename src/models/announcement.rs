use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An announcement posted to a course site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(rename = "announcementId")]
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    #[serde(rename = "siteId")]
    pub site_id: Option<String>,
    #[serde(rename = "createdByDisplayName")]
    pub created_by: Option<String>,
    /// Epoch millis.
    #[serde(rename = "createdOn")]
    pub created_on: Option<i64>,
}

impl Announcement {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_on?).single()
    }
}
