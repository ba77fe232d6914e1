//! campuscache - client-side data layer for an academic portal.
//!
//! Keeps a local cache of remote academic records (courses, assignments,
//! grades, announcements, resources) synchronized with the portal, and
//! keeps the authenticated session alive across idle periods with a
//! recurring background job.
//!
//! The two moving parts:
//!
//! - [`repository::CachedRepository`] - a generic cache-backed repository
//!   that serves from the local cache when possible, writes through fresh
//!   fetches, and falls back to stale data when the portal is unreachable.
//!   Five gateway instantiations cover the domain entities.
//! - [`session::KeepAliveJob`] - a periodic background job that checks
//!   session validity and exercises the session by requesting the portal
//!   page the way a browser would, scheduled through
//!   [`scheduler::JobScheduler`] with replace-on-reregister uniqueness.
//!
//! [`portal::Portal`] assembles the whole layer with explicit constructor
//! wiring.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod portal;
pub mod repository;
pub mod scheduler;
pub mod session;

pub use api::{ApiError, PortalClient};
pub use cache::{CacheStore, CachedData};
pub use config::Config;
pub use portal::Portal;
pub use repository::{CachedRepository, EntityGateway, RepoError};
pub use scheduler::{Connectivity, JobOutcome, JobScheduler, JobSpec, PeriodicJob};
pub use session::{KeepAliveJob, SessionService, UserSession};
