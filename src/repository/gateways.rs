//! The five concrete entity gateways.
//!
//! Each one is declarative configuration for `CachedRepository`: a cache
//! namespace plus the portal endpoint that backs it. Assignments and
//! announcements additionally own the attachment concern.

use std::future::Future;
use std::sync::Arc;

use crate::api::{ApiError, PortalClient};
use crate::models::{Announcement, Assignment, Attachment, Course, Grade, Resource};

use super::EntityGateway;

/// Course sites. The portal lists every enrolled site for the session user,
/// so the scope key is ignored; callers conventionally pass `"all"`.
pub struct CourseGateway {
    client: Arc<PortalClient>,
}

impl CourseGateway {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self { client }
    }
}

impl EntityGateway for CourseGateway {
    type Entity = Course;
    const KIND: &'static str = "courses";

    fn list(&self, _scope: &str) -> impl Future<Output = Result<Vec<Course>, ApiError>> + Send {
        self.client.fetch_sites()
    }
}

/// Course resources, scoped by site id.
pub struct ResourceGateway {
    client: Arc<PortalClient>,
}

impl ResourceGateway {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self { client }
    }
}

impl EntityGateway for ResourceGateway {
    type Entity = Resource;
    const KIND: &'static str = "resources";

    fn list(&self, scope: &str) -> impl Future<Output = Result<Vec<Resource>, ApiError>> + Send {
        self.client.fetch_resources(scope)
    }
}

/// Assignments, scoped by site id, with per-assignment attachments.
pub struct AssignmentGateway {
    client: Arc<PortalClient>,
}

impl AssignmentGateway {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self { client }
    }
}

impl EntityGateway for AssignmentGateway {
    type Entity = Assignment;
    const KIND: &'static str = "assignments";

    fn list(&self, scope: &str) -> impl Future<Output = Result<Vec<Assignment>, ApiError>> + Send {
        self.client.fetch_assignments(scope)
    }

    fn attachment_parents(entities: &[Assignment]) -> Vec<String> {
        entities.iter().map(|a| a.id.clone()).collect()
    }

    fn attachments(
        &self,
        parent_id: &str,
    ) -> impl Future<Output = Result<Vec<Attachment>, ApiError>> + Send {
        self.client.fetch_assignment_attachments(parent_id)
    }
}

/// Announcements, scoped by site id, with per-announcement attachments.
pub struct AnnouncementGateway {
    client: Arc<PortalClient>,
}

impl AnnouncementGateway {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self { client }
    }
}

impl EntityGateway for AnnouncementGateway {
    type Entity = Announcement;
    const KIND: &'static str = "announcements";

    fn list(&self, scope: &str) -> impl Future<Output = Result<Vec<Announcement>, ApiError>> + Send {
        self.client.fetch_announcements(scope)
    }

    fn attachment_parents(entities: &[Announcement]) -> Vec<String> {
        entities.iter().map(|a| a.id.clone()).collect()
    }

    fn attachments(
        &self,
        parent_id: &str,
    ) -> impl Future<Output = Result<Vec<Attachment>, ApiError>> + Send {
        self.client.fetch_announcement_attachments(parent_id)
    }
}

/// Gradebook entries, scoped by site id.
pub struct GradeGateway {
    client: Arc<PortalClient>,
}

impl GradeGateway {
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self { client }
    }
}

impl EntityGateway for GradeGateway {
    type Entity = Grade;
    const KIND: &'static str = "grades";

    fn list(&self, scope: &str) -> impl Future<Output = Result<Vec<Grade>, ApiError>> + Send {
        self.client.fetch_grades(scope)
    }
}
