//! Cache-backed repositories.
//!
//! One generic synchronization unit, `CachedRepository`, decides per call
//! whether to serve from the local cache or fetch from the portal, and five
//! thin gateway instantiations configure it per entity family.

pub mod cached;
pub mod error;
pub mod gateways;

pub use cached::{CachedRepository, EntityGateway, ATTACHMENT_KIND};
pub use error::RepoError;
pub use gateways::{
    AnnouncementGateway, AssignmentGateway, CourseGateway, GradeGateway, ResourceGateway,
};
