//! Showcase Cache Port (Driven Port)
//!
//! Holds full showcase listings between catalog writes. Every invalidation
//! starts a new generation; a listing read under an older generation is
//! never stored.

use std::sync::Arc;

use crate::domain::catalog::{ShowcaseEntry, ShowcaseKind};

/// Port for caching showcase listings.
pub trait ShowcaseCache: Send + Sync {
    /// Cached listing, if present and fresh.
    fn get(&self, kind: ShowcaseKind) -> Option<Arc<Vec<ShowcaseEntry>>>;

    /// Current generation. Take it before reading the listing to store.
    fn generation(&self) -> u64;

    /// Store a listing read during `generation`. Returns false and stores
    /// nothing when an invalidation happened since.
    fn put(&self, kind: ShowcaseKind, generation: u64, entries: Arc<Vec<ShowcaseEntry>>) -> bool;

    /// Drop every listing and start a new generation.
    fn invalidate_all(&self);
}

/// Cache that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShowcaseCache;

impl ShowcaseCache for NoShowcaseCache {
    fn get(&self, _kind: ShowcaseKind) -> Option<Arc<Vec<ShowcaseEntry>>> {
        None
    }

    fn generation(&self) -> u64 {
        0
    }

    fn put(&self, _kind: ShowcaseKind, _generation: u64, _entries: Arc<Vec<ShowcaseEntry>>) -> bool {
        false
    }

    fn invalidate_all(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::ShopId;

    #[test]
    fn no_cache_never_hits() {
        let cache = NoShowcaseCache;
        assert!(!cache.put(ShowcaseKind::Promotions, cache.generation(), Arc::new(vec![])));
        assert!(cache.get(ShowcaseKind::Promotions).is_none());
        assert!(cache.get(ShowcaseKind::Shop(ShopId::new(1))).is_none());
    }
}
