//! Per-battery activity generations.
//!
//! The store flag says whether a battery may charge; it cannot tell two
//! activities for the same battery apart. After `stop` clears the flag and
//! a fresh `start` raises it again, the old activity (still asleep) would
//! find the flag set and keep charging. Each admitted activity therefore
//! carries a [`Lease`] on a generation number, and every write it makes
//! happens under the battery's slot lock after checking that its
//! generation is still the current one.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Slot = Arc<Mutex<u64>>;

#[derive(Clone, Default)]
pub struct Generations {
    slots: Arc<DashMap<String, Slot>>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock a battery's slot. Admission must hold this across the permit
    /// acquire so no activity write can interleave with it.
    pub async fn lock(&self, battery_id: &str) -> SlotGuard {
        let slot = self
            .slots
            .entry(battery_id.to_string())
            .or_default()
            .clone();
        let guard = slot.clone().lock_owned().await;
        SlotGuard { slot, guard }
    }
}

pub struct SlotGuard {
    slot: Slot,
    guard: OwnedMutexGuard<u64>,
}

impl SlotGuard {
    /// Bump the generation, superseding every earlier lease.
    pub fn issue(mut self) -> Lease {
        *self.guard += 1;
        Lease {
            slot: self.slot,
            generation: *self.guard,
        }
    }
}

/// An activity's claim on one generation of its battery's slot.
pub struct Lease {
    slot: Slot,
    generation: u64,
}

impl Lease {
    /// Lock the slot for one tick. `None` when a later generation was issued.
    pub async fn hold(&self) -> Option<OwnedMutexGuard<u64>> {
        let guard = self.slot.clone().lock_owned().await;
        (*guard == self.generation).then_some(guard)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
