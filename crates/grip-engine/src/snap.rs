//! Alignment detection against sibling objects.
//!
//! At gesture start the detector snapshots every other visible object's
//! bounds into an immutable cache; during the drag it compares the moving
//! box's edges and center lines against the cached ones. The cache is frozen
//! on purpose — it represents "where the other objects were when the drag
//! started" and is never updated mid-gesture.

use grip_core::{Bounds, ObjectId, Point, SceneOps};

/// Guide orientation: `X` is a vertical line at `position` on the x axis,
/// `Y` a horizontal line on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideKind {
    Edge,
    Center,
}

/// A visual alignment line to render while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentGuide {
    pub axis: Axis,
    pub position: f32,
    pub kind: GuideKind,
}

/// Outcome of one snap query: the corrective delta to add to the dragged
/// position, plus the guides to display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapResult {
    pub delta: Point,
    pub guides: Vec<AlignmentGuide>,
}

/// Candidate lines of a box along one axis: low edge, center, high edge.
fn lines(low: f32, size: f32) -> [(f32, GuideKind); 3] {
    [
        (low, GuideKind::Edge),
        (low + size / 2.0, GuideKind::Center),
        (low + size, GuideKind::Edge),
    ]
}

#[derive(Debug, Clone, Copy)]
struct AxisMatch {
    delta: f32,
    position: f32,
    kind: GuideKind,
}

/// Smallest-delta match of the dragging lines against one sibling's lines.
fn best_axis_match(
    drag: &[(f32, GuideKind); 3],
    sibling: &[(f32, GuideKind); 3],
    limit: f32,
    best: &mut Option<AxisMatch>,
) {
    for (drag_line, _) in drag {
        for (sib_line, sib_kind) in sibling {
            let delta = sib_line - drag_line;
            if delta.abs() <= limit
                && best.is_none_or(|b| delta.abs() < b.delta.abs())
            {
                *best = Some(AxisMatch {
                    delta,
                    position: *sib_line,
                    kind: *sib_kind,
                });
            }
        }
    }
}

/// Detects edge/center alignment of a dragged box against cached siblings.
#[derive(Debug, Default)]
pub struct AlignmentDetector {
    cache: Vec<Bounds>,
    guides: Vec<AlignmentGuide>,
}

impl AlignmentDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot bounds of all other visible objects. Replaces any previous
    /// cache (idempotent if called twice for the same gesture).
    pub fn begin_session(&mut self, scene: &dyn SceneOps, exclude: &[ObjectId]) {
        self.cache = scene
            .list_visible()
            .into_iter()
            .filter(|id| !exclude.contains(id))
            .filter_map(|id| scene.get_bounds(id))
            .collect();
        self.guides.clear();
    }

    /// Compute the corrective delta and guides for `dragging`.
    ///
    /// The perceived snap distance is zoom-invariant: `threshold` is given in
    /// scene units at zoom 1.0 and scaled by `1/zoom` here. Axes resolve
    /// independently; the nearest qualifying sibling line wins per axis.
    /// Pure with respect to the cache — the same input always yields the
    /// same result; the returned guides are also remembered for rendering.
    pub fn snap(&mut self, dragging: Bounds, threshold: f32, zoom: f32) -> SnapResult {
        let limit = threshold / zoom.max(f32::EPSILON);
        let drag_x = lines(dragging.x, dragging.width);
        let drag_y = lines(dragging.y, dragging.height);

        let mut best_x: Option<AxisMatch> = None;
        let mut best_y: Option<AxisMatch> = None;
        for sibling in &self.cache {
            best_axis_match(&drag_x, &lines(sibling.x, sibling.width), limit, &mut best_x);
            best_axis_match(&drag_y, &lines(sibling.y, sibling.height), limit, &mut best_y);
        }

        let mut result = SnapResult::default();
        if let Some(m) = best_x {
            result.delta.x = m.delta;
        }
        if let Some(m) = best_y {
            result.delta.y = m.delta;
        }

        // Guides for every sibling line that lands exactly on the winning
        // alignment, deduplicated by (axis, position).
        for sibling in &self.cache {
            if let Some(m) = best_x {
                for (line, kind) in lines(sibling.x, sibling.width) {
                    if (line - m.position).abs() < 1e-3 {
                        push_guide(&mut result.guides, Axis::X, line, kind);
                    }
                }
            }
            if let Some(m) = best_y {
                for (line, kind) in lines(sibling.y, sibling.height) {
                    if (line - m.position).abs() < 1e-3 {
                        push_guide(&mut result.guides, Axis::Y, line, kind);
                    }
                }
            }
        }

        self.guides = result.guides.clone();
        result
    }

    /// Guides from the most recent `snap` call, for the renderer.
    pub fn guides(&self) -> &[AlignmentGuide] {
        &self.guides
    }

    /// Drop cache and guides. Called on drag end and on cancel so stale
    /// guides never outlive a gesture.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.guides.clear();
    }
}

fn push_guide(guides: &mut Vec<AlignmentGuide>, axis: Axis, position: f32, kind: GuideKind) {
    let dup = guides
        .iter()
        .any(|g| g.axis == axis && (g.position - position).abs() < 1e-3);
    if !dup {
        guides.push(AlignmentGuide {
            axis,
            position,
            kind,
        });
    }
}
