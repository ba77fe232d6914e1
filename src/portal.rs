//! Top-level composition of the data layer.
//!
//! `Portal` wires one shared client and one shared cache store into the
//! five repositories with plain constructors.

use std::sync::Arc;

use anyhow::Result;

use crate::api::PortalClient;
use crate::cache::CacheStore;
use crate::config::Config;
use crate::repository::{
    AnnouncementGateway, AssignmentGateway, CachedRepository, CourseGateway, GradeGateway,
    ResourceGateway,
};
use crate::scheduler::{Connectivity, JobScheduler};
use crate::session::register_keep_alive;

/// The assembled data layer: five cache-backed repositories over one portal
/// client and one cache store.
pub struct Portal {
    client: Arc<PortalClient>,
    pub courses: CachedRepository<CourseGateway>,
    pub resources: CachedRepository<ResourceGateway>,
    pub assignments: CachedRepository<AssignmentGateway>,
    pub announcements: CachedRepository<AnnouncementGateway>,
    pub grades: CachedRepository<GradeGateway>,
}

impl Portal {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Arc::new(PortalClient::new(&config.base_url)?);
        let cache = Arc::new(CacheStore::new(config.cache_dir()?)?);
        Ok(Self::with_parts(client, cache))
    }

    /// Assemble from pre-built collaborators.
    pub fn with_parts(client: Arc<PortalClient>, cache: Arc<CacheStore>) -> Self {
        Self {
            courses: CachedRepository::new(
                CourseGateway::new(Arc::clone(&client)),
                Arc::clone(&cache),
            ),
            resources: CachedRepository::new(
                ResourceGateway::new(Arc::clone(&client)),
                Arc::clone(&cache),
            ),
            assignments: CachedRepository::new(
                AssignmentGateway::new(Arc::clone(&client)),
                Arc::clone(&cache),
            ),
            announcements: CachedRepository::new(
                AnnouncementGateway::new(Arc::clone(&client)),
                Arc::clone(&cache),
            ),
            grades: CachedRepository::new(
                GradeGateway::new(Arc::clone(&client)),
                cache,
            ),
            client,
        }
    }

    pub fn client(&self) -> &Arc<PortalClient> {
        &self.client
    }

    /// Start keeping the portal session alive in the background. The job
    /// shares this portal's client, so the refreshed cookies are the ones
    /// every repository rides on.
    pub fn start_keep_alive<C: Connectivity>(&self, scheduler: &mut JobScheduler<C>) {
        register_keep_alive(scheduler, Arc::clone(&self.client));
    }
}
