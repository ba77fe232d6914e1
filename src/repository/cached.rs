use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::cache::CacheStore;
use crate::models::Attachment;

use super::RepoError;

/// Cache namespace shared by every attachment-bearing entity family.
/// Entries are keyed by the parent entity's id.
pub const ATTACHMENT_KIND: &str = "attachments";

/// Remote side of one entity family.
///
/// Implementations wrap one `PortalClient` endpoint; tests substitute
/// scripted fakes. Futures are `Send` so repository calls can run on
/// spawned tasks.
pub trait EntityGateway: Send + Sync {
    type Entity: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// Cache namespace for this entity family.
    const KIND: &'static str;

    fn list(&self, scope: &str) -> impl Future<Output = Result<Vec<Self::Entity>, ApiError>> + Send;

    /// Ids of entities whose attachments should be pulled alongside a fresh
    /// fetch. Families without attachments keep the default.
    fn attachment_parents(_entities: &[Self::Entity]) -> Vec<String> {
        Vec::new()
    }

    fn attachments(
        &self,
        _parent_id: &str,
    ) -> impl Future<Output = Result<Vec<Attachment>, ApiError>> + Send {
        std::future::ready(Ok(Vec::new()))
    }
}

/// Generic cache-backed repository over one entity family.
///
/// Stateless itself: all mutable state lives in the cache store and the
/// portal. The invariant throughout is that a failed fetch never touches
/// the cache - stale-but-present data always beats no data.
pub struct CachedRepository<G> {
    gateway: G,
    cache: Arc<CacheStore>,
}

impl<G: EntityGateway> CachedRepository<G> {
    pub fn new(gateway: G, cache: Arc<CacheStore>) -> Self {
        Self { gateway, cache }
    }

    /// Serve from cache when an entry exists; fetch and write through
    /// otherwise. A fetch failure with nothing cached is a `CacheMiss`.
    pub async fn get(&self, scope: &str) -> Result<Vec<G::Entity>, RepoError> {
        if let Some(cached) = self.read_cached(scope) {
            debug!(kind = G::KIND, scope, "cache hit");
            return Ok(cached);
        }
        self.get_fresh(scope).await
    }

    /// Fetch fresh data, falling back to whatever is cached (even if stale)
    /// when the portal is unreachable.
    pub async fn get_fresh(&self, scope: &str) -> Result<Vec<G::Entity>, RepoError> {
        match self.fetch_and_store(scope).await {
            Ok(fresh) => Ok(fresh),
            Err(err) => match self.read_cached(scope) {
                Some(stale) => {
                    warn!(kind = G::KIND, scope, error = %err, "Fetch failed, serving cached data");
                    Ok(stale)
                }
                None => Err(RepoError::CacheMiss {
                    kind: G::KIND,
                    scope: scope.to_string(),
                    source: err,
                }),
            },
        }
    }

    /// Unconditionally fetch fresh data. On failure the existing cache entry
    /// is left untouched and the remote error surfaces as-is.
    pub async fn refresh(&self, scope: &str) -> Result<Vec<G::Entity>, RepoError> {
        self.fetch_and_store(scope).await.map_err(RepoError::from)
    }

    /// Cached attachments of one parent entity. Attachments are best-effort,
    /// so absence here never blocks the parent data path.
    pub fn cached_attachments(&self, parent_id: &str) -> Vec<Attachment> {
        match self.cache.load::<Vec<Attachment>>(ATTACHMENT_KIND, parent_id) {
            Ok(Some(cached)) => cached.data,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(parent_id, error = %err, "Attachment cache read failed");
                Vec::new()
            }
        }
    }

    fn read_cached(&self, scope: &str) -> Option<Vec<G::Entity>> {
        match self.cache.load::<Vec<G::Entity>>(G::KIND, scope) {
            Ok(Some(cached)) => Some(cached.data),
            Ok(None) => None,
            Err(err) => {
                // Unreadable entries count as absent; the next successful
                // fetch overwrites them.
                warn!(kind = G::KIND, scope, error = %err, "Cache read failed");
                None
            }
        }
    }

    async fn fetch_and_store(&self, scope: &str) -> Result<Vec<G::Entity>, ApiError> {
        let fresh = self.gateway.list(scope).await?;
        if let Err(err) = self.cache.save(G::KIND, scope, &fresh) {
            warn!(kind = G::KIND, scope, error = %err, "Cache write failed, returning uncached data");
        }
        self.store_attachments(&fresh).await;
        Ok(fresh)
    }

    /// Pull attachments for every parent in the fresh result set.
    /// Failures log and move on; the parent's cache write already happened.
    async fn store_attachments(&self, entities: &[G::Entity]) {
        let parents = G::attachment_parents(entities);
        if parents.is_empty() {
            return;
        }

        let fetches = parents
            .iter()
            .map(|id| async move { (id.as_str(), self.gateway.attachments(id).await) });

        for (parent_id, result) in join_all(fetches).await {
            match result {
                Ok(items) => {
                    if let Err(err) = self.cache.save(ATTACHMENT_KIND, parent_id, &items) {
                        warn!(parent_id, error = %err, "Attachment cache write failed");
                    }
                }
                Err(err) => {
                    warn!(parent_id, error = %err, "Attachment fetch failed");
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
