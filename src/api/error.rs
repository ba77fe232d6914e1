use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(#[from] reqwest::Error),

    #[error("Remote rejected request (status {status}): {body}")]
    RemoteRejected { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::RemoteRejected {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_keeps_short_bodies() {
        let err = ApiError::from_status(reqwest::StatusCode::FORBIDDEN, "no access");
        match err {
            ApiError::RemoteRejected { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "no access");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_status_truncates_long_bodies() {
        let long = "x".repeat(2000);
        let err = ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &long);
        match err {
            ApiError::RemoteRejected { status, body } => {
                assert_eq!(status, 500);
                assert!(body.len() < 600);
                assert!(body.contains("truncated"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
