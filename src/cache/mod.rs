//! Local cache of portal data.
//!
//! One JSON file per (entity kind, scope key). Absence of an entry is the
//! only staleness signal: entries stay valid until the next successful
//! refresh replaces them.

pub mod store;

pub use store::{CacheStore, CachedData};
