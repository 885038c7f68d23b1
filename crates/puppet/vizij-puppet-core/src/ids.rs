//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Handle to a playable clip action owned by a [`crate::host::PlaybackHost`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub u32);

/// Handle to a pending deferred callback in a [`crate::scheduler::Scheduler`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Monotonic allocator for ActionId and TimerId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_action: u32,
    next_timer: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_action(&mut self) -> ActionId {
        let id = ActionId(self.next_action);
        self.next_action = self.next_action.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_timer(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        id
    }
}
