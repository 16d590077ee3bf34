//! Shared gesture machinery: the drag session, the clone preview, and the
//! per-gesture capability context handed to sub-machines.
//!
//! One `DragSession` exists at a time; the controller enforces mutual
//! exclusion. All session state is externally invisible and dies with the
//! gesture.

use crate::effects::{CommitLabel, EngineEffect};
use crate::snap::AlignmentDetector;
use grip_core::{Bounds, ObjectId, Point, SceneOps};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Engine tuning knobs. Plain values, no config files.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Minimum pointer displacement (device px, zoom-independent) before a
    /// pointer-down is classified as a drag rather than a click.
    pub drag_threshold: f32,
    /// Snap attraction distance in scene units at zoom 1.0 (scaled by 1/zoom
    /// so the perceived distance is constant).
    pub snap_threshold: f32,
    /// Hit tolerance for small control handles, device px at zoom 1.0.
    pub handle_tolerance: f32,
    /// Floor for object dimensions during resize, scene units.
    pub min_object_size: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 3.0,
            snap_threshold: 6.0,
            handle_tolerance: 10.0,
            min_object_size: 50.0,
        }
    }
}

/// What kind of gesture a session is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Path,
    Object,
    ObjectGroup,
    Resize,
    Marquee,
    Pan,
}

/// Non-committal placeholder shown while alt-dragging: "a copy will appear
/// here". Promoted into real objects on release away from the library zone,
/// discarded otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ClonePreview {
    pub bounds: Bounds,
    pub sources: SmallVec<[ObjectId; 4]>,
    pub over_library: bool,
}

impl ClonePreview {
    pub fn new(bounds: Bounds, sources: impl IntoIterator<Item = ObjectId>) -> Self {
        Self {
            bounds,
            sources: sources.into_iter().collect(),
            over_library: false,
        }
    }
}

/// Transient per-gesture state, created on pointer-down and destroyed on
/// pointer-up/cancel.
#[derive(Debug)]
pub struct DragSession {
    pub kind: DragKind,
    /// Pointer-down position, scene coordinates.
    pub start: Point,
    /// Bounds of every participating object at gesture start.
    pub start_bounds: HashMap<ObjectId, Bounds>,
    /// True once displacement has exceeded the drag threshold.
    pub moved: bool,
    /// True when this gesture drives a clone preview instead of the
    /// originals. Decided once, on the first frame past the threshold.
    pub cloning: bool,
    clone_decided: bool,
}

impl DragSession {
    pub fn new(kind: DragKind, start: Point) -> Self {
        Self {
            kind,
            start,
            start_bounds: HashMap::new(),
            moved: false,
            cloning: false,
            clone_decided: false,
        }
    }

    /// Record a pointer position. Returns false while the gesture is still
    /// below the drag threshold — callers must not mutate anything then.
    ///
    /// The threshold compares *device* distance (`scene distance ×
    /// device_scale`) against a fixed pixel count, so zoom level never
    /// changes how far a click can wobble. The clone decision is sampled
    /// from `alt_held` exactly once, on the first frame past the threshold,
    /// and is immutable afterwards — releasing or re-pressing the modifier
    /// mid-drag changes nothing.
    pub fn register_move(
        &mut self,
        current: Point,
        device_scale: f32,
        threshold_px: f32,
        alt_held: bool,
    ) -> bool {
        if !self.moved {
            if self.start.distance(current) * device_scale < threshold_px {
                return false;
            }
            self.moved = true;
            if !self.clone_decided {
                self.clone_decided = true;
                self.cloning = alt_held;
            }
        }
        true
    }

    /// Cumulative displacement from the session start.
    pub fn delta(&self, current: Point) -> Point {
        current.delta_from(self.start)
    }
}

/// The capability set a sub-machine may use during one gesture. Constructed
/// by the controller per event; sub-machines consume only what they need.
pub struct GestureContext<'a> {
    pub scene: &'a mut dyn SceneOps,
    pub config: &'a EngineConfig,
    pub detector: &'a mut AlignmentDetector,
    /// Scene-to-device distance factor (`zoom × dpr`) for threshold checks.
    pub device_scale: f32,
    /// Current zoom, for zoom-invariant snap distances.
    pub zoom: f32,
    /// Whether the pointer is currently over the library drop zone.
    pub over_library: bool,
}

/// What a finished sub-machine hands back to the controller.
#[derive(Debug, Default)]
pub struct GestureOutcome {
    pub commit: Option<CommitLabel>,
    pub effects: Vec<EngineEffect>,
}

impl GestureOutcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn commit(label: CommitLabel) -> Self {
        Self {
            commit: Some(label),
            effects: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_is_never_a_drag() {
        let mut s = DragSession::new(DragKind::Object, Point::new(100.0, 100.0));
        // 2px at device scale 1.0, threshold 3px
        assert!(!s.register_move(Point::new(102.0, 100.0), 1.0, 3.0, false));
        assert!(!s.moved);
    }

    #[test]
    fn threshold_is_zoom_independent() {
        // 2 scene units at zoom 2.0 = 4 device px: past a 3px threshold
        let mut s = DragSession::new(DragKind::Object, Point::new(0.0, 0.0));
        assert!(s.register_move(Point::new(2.0, 0.0), 2.0, 3.0, false));

        // The same 2 scene units at zoom 0.5 = 1 device px: still a click
        let mut s = DragSession::new(DragKind::Object, Point::new(0.0, 0.0));
        assert!(!s.register_move(Point::new(2.0, 0.0), 0.5, 3.0, false));
    }

    #[test]
    fn clone_decision_is_frozen_after_first_frame() {
        let mut s = DragSession::new(DragKind::Object, Point::new(0.0, 0.0));
        assert!(s.register_move(Point::new(10.0, 0.0), 1.0, 3.0, true));
        assert!(s.cloning);

        // Releasing alt later does not un-decide the clone
        s.register_move(Point::new(50.0, 0.0), 1.0, 3.0, false);
        assert!(s.cloning);

        // And the inverse: a drag that started plain never becomes a clone
        let mut s = DragSession::new(DragKind::Object, Point::new(0.0, 0.0));
        s.register_move(Point::new(10.0, 0.0), 1.0, 3.0, false);
        s.register_move(Point::new(50.0, 0.0), 1.0, 3.0, true);
        assert!(!s.cloning);
    }
}
