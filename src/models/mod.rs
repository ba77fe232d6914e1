//! Domain models for the academic portal.
//!
//! These types mirror the JSON served by the portal's `direct` REST
//! endpoints, with serde renames for the portal's camelCase fields.

pub mod announcement;
pub mod assignment;
pub mod attachment;
pub mod course;
pub mod grade;
pub mod resource;

pub use announcement::Announcement;
pub use assignment::{Assignment, DueTime};
pub use attachment::Attachment;
pub use course::Course;
pub use grade::Grade;
pub use resource::Resource;
