//! REST client module for the academic portal.
//!
//! This module provides the `PortalClient` for talking to the portal's
//! `direct` REST endpoints: course sites, resources, assignments,
//! announcements, gradebook, and the session endpoints used by the
//! keep-alive job.
//!
//! Authentication rides on session cookies held in the client's cookie
//! jar; this crate never persists them itself.

pub mod client;
pub mod error;

pub use client::PortalClient;
pub use error::ApiError;
