//! Cancellable one-shot deferred callbacks driven by frame time.
//!
//! Time only moves when [`Scheduler::advance`] is called with the frame delta, so
//! deadlines stay in step with the playback clock.

use crate::ids::{IdAllocator, TimerId};

#[derive(Debug)]
struct Pending<T> {
    id: TimerId,
    due_ms: f64,
    payload: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    ids: IdAllocator,
    now_ms: f64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            ids: IdAllocator::new(),
            now_ms: 0.0,
            pending: Vec::new(),
        }
    }

    /// Milliseconds of frame time elapsed since creation.
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Milliseconds left before `id` fires, if it is still pending.
    pub fn remaining_ms(&self, id: TimerId) -> Option<f64> {
        self.pending
            .iter()
            .find(|p| p.id == id)
            .map(|p| (p.due_ms - self.now_ms).max(0.0))
    }

    /// Arm a callback `delay_ms` from now. Negative or NaN delays fire on the next advance.
    pub fn schedule(&mut self, delay_ms: f64, payload: T) -> TimerId {
        let delay = if delay_ms > 0.0 { delay_ms } else { 0.0 };
        let id = self.ids.alloc_timer();
        self.pending.push(Pending {
            id,
            due_ms: self.now_ms + delay,
            payload,
        });
        id
    }

    /// Drop a pending callback. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Move time forward by `dt` seconds and return the callbacks that came due,
    /// earliest deadline first (ties in scheduling order).
    pub fn advance(&mut self, dt: f32) -> Vec<(TimerId, T)> {
        if dt.is_finite() && dt > 0.0 {
            self.now_ms += dt as f64 * 1000.0;
        }
        let now = self.now_ms;
        let mut due: Vec<Pending<T>> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_ms <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)));
        due.into_iter().map(|p| (p.id, p.payload)).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
