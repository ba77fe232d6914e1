//! Background job scheduling.
//!
//! Named periodic jobs run on spawned tokio tasks, off any foreground path.
//! Registration is idempotent per name: re-registering replaces the pending
//! instance, so at most one task per name is ever scheduled.

pub mod registry;

pub use registry::{AlwaysOnline, Connectivity, JobOutcome, JobScheduler, JobSpec, PeriodicJob};
