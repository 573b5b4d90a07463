//! In-process caches.

mod showcase_cache;

pub use showcase_cache::TtlShowcaseCache;
