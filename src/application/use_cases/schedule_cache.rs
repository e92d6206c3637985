//! Single-slot in-memory cache for the projected schedule.
//!
//! The schedule is one global resource, so there is no key: the slot holds
//! the last successful result and the instant it was stored.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::domain::schedule::ScheduleItem;

#[derive(Debug)]
struct CachedSchedule {
    items: Arc<Vec<ScheduleItem>>,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct ScheduleCache {
    ttl: Duration,
    slot: Mutex<Option<CachedSchedule>>,
}

impl ScheduleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Items stored less than `ttl` ago.
    pub fn get(&self) -> Option<Arc<Vec<ScheduleItem>>> {
        self.get_at(Instant::now())
    }

    pub fn put(&self, items: Arc<Vec<ScheduleItem>>) {
        self.put_at(items, Instant::now());
    }

    fn get_at(&self, now: Instant) -> Option<Arc<Vec<ScheduleItem>>> {
        let slot = self.lock();
        slot.as_ref()
            .filter(|cached| now.saturating_duration_since(cached.stored_at) < self.ttl)
            .map(|cached| Arc::clone(&cached.items))
    }

    fn put_at(&self, items: Arc<Vec<ScheduleItem>>, now: Instant) {
        *self.lock() = Some(CachedSchedule {
            items,
            stored_at: now,
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CachedSchedule>> {
        // poisoning cannot leave the slot half-written
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
