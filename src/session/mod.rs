//! Session keep-alive.
//!
//! The portal expires idle sessions server-side. The keep-alive job runs on
//! a fixed interval in the background, checks whether the session is still
//! attached to a user, and exercises it by requesting the portal page the
//! way a browser would.

pub mod keepalive;

pub use keepalive::{
    register_keep_alive, KeepAliveJob, SessionService, UserSession, KEEP_ALIVE_INTERVAL,
    KEEP_ALIVE_JOB_NAME,
};
