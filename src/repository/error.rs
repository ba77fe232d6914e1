use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum RepoError {
    /// The remote call failed and the caller asked for fresh data only.
    #[error("Remote request failed: {0}")]
    Remote(#[from] ApiError),

    /// Nothing cached and the remote fetch failed; there is nothing to return.
    #[error("No cached {kind} for scope {scope} and the remote fetch failed")]
    CacheMiss {
        kind: &'static str,
        scope: String,
        #[source]
        source: ApiError,
    },
}
