//! HTTP client for the academic portal's `direct` REST API.
//!
//! This module provides the `PortalClient` struct for fetching course,
//! resource, assignment, announcement, and gradebook data, plus the two
//! session endpoints the keep-alive job exercises.

use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::models::{Announcement, Assignment, Attachment, Course, Grade, Resource};
use crate::session::UserSession;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow portal responses while failing fast enough that the
/// repositories can fall back to cache.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
struct SiteCollection {
    site_collection: Vec<Course>,
}

#[derive(Debug, Deserialize)]
struct ContentCollection {
    content_collection: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct AssignmentCollection {
    assignment_collection: Vec<Assignment>,
}

#[derive(Debug, Deserialize)]
struct AnnouncementCollection {
    announcement_collection: Vec<Announcement>,
}

#[derive(Debug, Deserialize)]
struct GradebookSite {
    assignments: Vec<Grade>,
}

#[derive(Debug, Deserialize)]
struct ItemWithAttachments {
    #[serde(default)]
    attachments: Vec<Attachment>,
}

/// API client for the portal.
/// Clone is cheap - reqwest::Client uses Arc internally, so clones share the
/// connection pool and the cookie jar carrying the session.
#[derive(Clone)]
pub struct PortalClient {
    client: Client,
    base_url: String,
}

impl PortalClient {
    /// Create a new portal client for the given base URL.
    ///
    /// The cookie jar is enabled because the portal's session is
    /// cookie-borne; cookie persistence is owned entirely by this client.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_store(true)
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit
    /// (should retry), or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status() == StatusCode::TOO_MANY_REQUESTS {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(url)
                .header(header::ACCEPT, "application/json")
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let text = response.text().await?;
                    return serde_json::from_str(&text)
                        .map_err(|err| ApiError::InvalidResponse(format!("{url}: {err}")));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""));
                    }
                    warn!(url, retry = retries, backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    // ===== Data Fetching Methods =====

    /// Fetch all course sites visible to the session user.
    pub async fn fetch_sites(&self) -> Result<Vec<Course>, ApiError> {
        let url = format!("{}/direct/site.json", self.base_url);
        let response: SiteCollection = self.get_json(&url).await?;
        Ok(response.site_collection)
    }

    /// Fetch the resource tree of a course site.
    pub async fn fetch_resources(&self, site_id: &str) -> Result<Vec<Resource>, ApiError> {
        let url = format!("{}/direct/content/site/{}.json", self.base_url, site_id);
        let response: ContentCollection = self.get_json(&url).await?;
        Ok(response.content_collection)
    }

    /// Fetch all assignments posted to a course site.
    pub async fn fetch_assignments(&self, site_id: &str) -> Result<Vec<Assignment>, ApiError> {
        let url = format!("{}/direct/assignment/site/{}.json", self.base_url, site_id);
        let response: AssignmentCollection = self.get_json(&url).await?;
        Ok(response.assignment_collection)
    }

    /// Fetch all announcements posted to a course site.
    pub async fn fetch_announcements(&self, site_id: &str) -> Result<Vec<Announcement>, ApiError> {
        let url = format!("{}/direct/announcement/site/{}.json", self.base_url, site_id);
        let response: AnnouncementCollection = self.get_json(&url).await?;
        Ok(response.announcement_collection)
    }

    /// Fetch the gradebook entries of a course site.
    pub async fn fetch_grades(&self, site_id: &str) -> Result<Vec<Grade>, ApiError> {
        let url = format!("{}/direct/gradebook/site/{}.json", self.base_url, site_id);
        let response: GradebookSite = self.get_json(&url).await?;
        Ok(response.assignments)
    }

    /// Fetch the attachments of one assignment.
    pub async fn fetch_assignment_attachments(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<Attachment>, ApiError> {
        let url = format!("{}/direct/assignment/item/{}.json", self.base_url, assignment_id);
        let response: ItemWithAttachments = self.get_json(&url).await?;
        Ok(response.attachments)
    }

    /// Fetch the attachments of one announcement.
    pub async fn fetch_announcement_attachments(
        &self,
        announcement_id: &str,
    ) -> Result<Vec<Attachment>, ApiError> {
        let url = format!(
            "{}/direct/announcement/message/{}.json",
            self.base_url, announcement_id
        );
        let response: ItemWithAttachments = self.get_json(&url).await?;
        Ok(response.attachments)
    }

    // ===== Session Endpoints =====

    /// Ask the portal who the current session belongs to.
    /// A `null` user id in the response means the session has expired.
    pub async fn current_session(&self) -> Result<UserSession, ApiError> {
        let url = format!("{}/direct/session/current.json", self.base_url);
        self.get_json(&url).await
    }

    /// Request the portal landing page to keep the session alive.
    ///
    /// The backend extends session lifetime on ordinary page access, the same
    /// way it does for a browser, so this request imitates genuine traffic
    /// instead of calling a side-channel health endpoint. Returns `None` when
    /// the portal serves an empty page.
    pub async fn refresh_portal(&self) -> Result<Option<String>, ApiError> {
        let url = format!("{}/portal", self.base_url);
        let response = self.client.get(&url).send().await?;
        let response = Self::check_response(response).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(body))
        }
    }
}
