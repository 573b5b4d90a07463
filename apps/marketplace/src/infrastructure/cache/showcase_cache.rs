//! Showcase cache with a fixed time to live.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::application::ports::ShowcaseCache;
use crate::domain::catalog::{ShowcaseEntry, ShowcaseKind};

struct Slot {
    stored_at: Instant,
    entries: Arc<Vec<ShowcaseEntry>>,
}

/// [`ShowcaseCache`] that keeps each listing for `ttl`; a zero TTL disables it.
///
/// The generation only changes while the slot lock is held for writing, so a
/// `put` that sees a matching generation cannot interleave with an
/// invalidation.
pub struct TtlShowcaseCache {
    ttl: Duration,
    generation: AtomicU64,
    slots: RwLock<HashMap<ShowcaseKind, Slot>>,
}

impl TtlShowcaseCache {
    /// Cache listings for `ttl_secs` seconds.
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            generation: AtomicU64::new(0),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored listings, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl ShowcaseCache for TtlShowcaseCache {
    fn get(&self, kind: ShowcaseKind) -> Option<Arc<Vec<ShowcaseEntry>>> {
        let slots = self.slots.read();
        let slot = slots.get(&kind)?;
        (slot.stored_at.elapsed() < self.ttl).then(|| Arc::clone(&slot.entries))
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn put(&self, kind: ShowcaseKind, generation: u64, entries: Arc<Vec<ShowcaseEntry>>) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        let mut slots = self.slots.write();
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        slots.insert(
            kind,
            Slot {
                stored_at: Instant::now(),
                entries,
            },
        );
        true
    }

    fn invalidate_all(&self) {
        let mut slots = self.slots.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{ItemId, Money, ShopId};

    fn entries() -> Arc<Vec<ShowcaseEntry>> {
        Arc::new(vec![ShowcaseEntry {
            item_id: ItemId::new(1),
            name: "Mug".to_string(),
            price: Money::from_cents(250),
            image: None,
        }])
    }

    #[test]
    fn stores_per_kind() {
        let cache = TtlShowcaseCache::new(60);
        assert!(cache.put(ShowcaseKind::Offers, cache.generation(), entries()));

        assert_eq!(cache.get(ShowcaseKind::Offers).map(|e| e.len()), Some(1));
        assert!(cache.get(ShowcaseKind::Promotions).is_none());
        assert!(cache.get(ShowcaseKind::Shop(ShopId::new(1))).is_none());
    }

    #[test]
    fn invalidate_clears_everything() {
        let cache = TtlShowcaseCache::new(60);
        let generation = cache.generation();
        cache.put(ShowcaseKind::Offers, generation, entries());
        cache.put(ShowcaseKind::Shop(ShopId::new(2)), generation, entries());
        assert_eq!(cache.len(), 2);

        cache.invalidate_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn listing_read_before_invalidation_is_not_stored() {
        let cache = TtlShowcaseCache::new(60);
        let generation = cache.generation();
        assert!(cache.get(ShowcaseKind::Offers).is_none());

        cache.invalidate_all();
        assert!(!cache.put(ShowcaseKind::Offers, generation, entries()));
        assert!(cache.get(ShowcaseKind::Offers).is_none());
        assert!(cache.is_empty());

        assert!(cache.put(ShowcaseKind::Offers, cache.generation(), entries()));
        assert!(cache.get(ShowcaseKind::Offers).is_some());
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache = TtlShowcaseCache::new(0);
        assert!(!cache.put(ShowcaseKind::Offers, cache.generation(), entries()));
        assert!(cache.get(ShowcaseKind::Offers).is_none());
        assert!(cache.is_empty());
    }
}
