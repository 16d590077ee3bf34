//! Frame-coalesced mutation scheduling.
//!
//! During a drag, pointer-move events can arrive much faster than the host
//! repaints. The engine schedules at most one pending mutation per animation
//! frame: a newer one replaces the pending one (latest-wins, never a queue),
//! so the scene always reflects the most recent pointer position and the
//! engine never falls behind the input stream.
//!
//! The host drives `take()` from whatever frame primitive it has —
//! `requestAnimationFrame` in the wasm bridge, an explicit tick in tests.

use grip_core::{Bounds, ObjectId, Point};

/// One unit of deferred scene work, produced by a sub-machine during
/// pointer-move and applied on the next frame tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingMutation {
    /// Batched new origins (single-object moves are a one-entry batch).
    Moves(Vec<(ObjectId, Point)>),
    /// Replacement vertex list for a path being edited.
    PathPoints(ObjectId, Vec<Point>),
    /// Replacement bounds for an object being resized.
    Resize(ObjectId, Bounds),
}

/// Holds at most one unit of deferred work.
#[derive(Debug, Default)]
pub struct FrameScheduler<T> {
    pending: Option<T>,
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Schedule work for the next frame, replacing anything already pending.
    pub fn schedule(&mut self, work: T) {
        self.pending = Some(work);
    }

    /// Consume the pending work, if any. Called once per frame by the host,
    /// and on pointer-up so the final position is never dropped.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_wins() {
        let mut sched = FrameScheduler::new();
        sched.schedule(1);
        sched.schedule(2);
        sched.schedule(3);
        assert_eq!(sched.take(), Some(3));
        assert_eq!(sched.take(), None);
    }

    #[test]
    fn cancel_drops_pending() {
        let mut sched = FrameScheduler::new();
        sched.schedule("move");
        sched.cancel();
        assert!(!sched.has_pending());
        assert_eq!(sched.take(), None);
    }
}
