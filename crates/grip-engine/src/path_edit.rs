//! Path editing sub-machine.
//!
//! Owns a gesture on the currently selected path: dragging a single vertex
//! handle, dragging the whole path body, and the alt-drag clone variant of a
//! body drag. Vertex handles are only reachable on the selected path — the
//! controller never routes an unselected path here.

use crate::effects::{CommitLabel, EngineEffect, LibraryItemKind, LibrarySource};
use crate::gesture::{ClonePreview, DragKind, DragSession, GestureContext, GestureOutcome};
use crate::scheduler::PendingMutation;
use grip_core::{Bounds, ObjectId, Point};

/// Smallest scale factor an aspect-locked vertex drag may produce.
const MIN_SCALE: f32 = 0.05;

#[derive(Debug)]
enum Mode {
    /// Dragging one vertex handle.
    Handle {
        index: usize,
        start_points: Vec<Point>,
        /// Locked-aspect scaling of a closed 4-vertex path.
        aspect_locked: bool,
    },
    /// Dragging the whole path.
    Body { start_bounds: Bounds },
}

/// One path-edit gesture, pointer-down to pointer-up.
#[derive(Debug)]
pub struct PathEditSession {
    pub id: ObjectId,
    mode: Mode,
    session: DragSession,
    preview: Option<ClonePreview>,
}

impl PathEditSession {
    /// Start dragging vertex `index`. `aspect_locked` is sampled from the
    /// modifier state at pointer-down and only applies to closed 4-vertex
    /// paths.
    pub fn vertex(
        id: ObjectId,
        index: usize,
        start_points: Vec<Point>,
        start: Point,
        aspect_locked: bool,
    ) -> Self {
        let locked = aspect_locked && start_points.len() == 4;
        Self {
            id,
            mode: Mode::Handle {
                index,
                start_points,
                aspect_locked: locked,
            },
            session: DragSession::new(DragKind::Path, start),
            preview: None,
        }
    }

    /// Start dragging the whole path body.
    pub fn body(id: ObjectId, start_bounds: Bounds, start: Point) -> Self {
        let mut session = DragSession::new(DragKind::Path, start);
        session.start_bounds.insert(id, start_bounds);
        Self {
            id,
            mode: Mode::Body { start_bounds },
            session,
            preview: None,
        }
    }

    pub fn preview(&self) -> Option<&ClonePreview> {
        self.preview.as_ref()
    }

    /// Handle a pointer-move. Returns the scene mutation to schedule, if the
    /// gesture is past the drag threshold and not in clone mode.
    pub fn update(
        &mut self,
        ctx: &mut GestureContext<'_>,
        p: Point,
        alt_held: bool,
    ) -> Option<PendingMutation> {
        if !self.session.register_move(
            p,
            ctx.device_scale,
            ctx.config.drag_threshold,
            alt_held,
        ) {
            return None;
        }
        let delta = self.session.delta(p);

        match &self.mode {
            Mode::Handle {
                index,
                start_points,
                aspect_locked,
            } => {
                let new_points = if *aspect_locked {
                    scale_quad_about_center(start_points, *index, delta)
                } else {
                    let mut pts = start_points.clone();
                    if let Some(v) = pts.get_mut(*index) {
                        *v = start_points[*index].offset(delta.x, delta.y);
                    }
                    pts
                };
                Some(PendingMutation::PathPoints(self.id, new_points))
            }
            Mode::Body { start_bounds } => {
                if self.session.cloning {
                    // Only the placeholder moves; the original stays put.
                    let moved = start_bounds.translated(delta.x, delta.y);
                    let preview = self
                        .preview
                        .get_or_insert_with(|| ClonePreview::new(*start_bounds, [self.id]));
                    preview.bounds = moved;
                    preview.over_library = ctx.over_library;
                    None
                } else {
                    let candidate = start_bounds.translated(delta.x, delta.y);
                    let snap = ctx
                        .detector
                        .snap(candidate, ctx.config.snap_threshold, ctx.zoom);
                    let pos = candidate.origin().offset(snap.delta.x, snap.delta.y);
                    Some(PendingMutation::Moves(vec![(self.id, pos)]))
                }
            }
        }
    }

    /// Finalize on pointer-up (or cancel). At most one commit results.
    pub fn finish(&mut self, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        if !self.session.moved {
            self.preview = None;
            return GestureOutcome::none();
        }

        match &self.mode {
            Mode::Handle { .. } => GestureOutcome::commit(CommitLabel::EditPath),
            Mode::Body { .. } => {
                if !self.session.cloning {
                    return GestureOutcome::commit(CommitLabel::MovePath);
                }
                let Some(preview) = self.preview.take() else {
                    return GestureOutcome::none();
                };
                // The drop target is judged at release, not at the last move
                if ctx.over_library {
                    // Library drop: original unchanged, nothing inserted.
                    let points = ctx.scene.path_points(self.id).unwrap_or_default();
                    let bounds = ctx
                        .scene
                        .get_bounds(self.id)
                        .unwrap_or(preview.bounds);
                    GestureOutcome {
                        commit: None,
                        effects: vec![EngineEffect::AddToLibrary {
                            kind: LibraryItemKind::Path,
                            source: LibrarySource::PathPoints(points),
                            width: bounds.width,
                            height: bounds.height,
                        }],
                    }
                } else if let Some(new_id) = ctx.scene.clone_object(self.id) {
                    ctx.scene.move_object(new_id, preview.bounds.origin());
                    GestureOutcome::commit(CommitLabel::ClonePaths)
                } else {
                    log::debug!("clone of {} failed; dropping preview", self.id);
                    GestureOutcome::none()
                }
            }
        }
    }
}

/// Scale all four vertices of a closed quad about its center, driven by the
/// projection of the drag vector onto the dragged vertex's diagonal. Aspect
/// ratio and center are preserved exactly.
fn scale_quad_about_center(start_points: &[Point], index: usize, delta: Point) -> Vec<Point> {
    let bounds = grip_core::path_bounds(start_points);
    let center = bounds.center();
    let dragged = start_points[index];
    let diag = dragged.delta_from(center);
    let diag_len = (diag.x * diag.x + diag.y * diag.y).sqrt();
    if diag_len <= f32::EPSILON {
        return start_points.to_vec();
    }
    let unit = Point::new(diag.x / diag_len, diag.y / diag_len);
    let along = delta.x * unit.x + delta.y * unit.y;
    let factor = ((diag_len + along) / diag_len).max(MIN_SCALE);

    start_points
        .iter()
        .map(|p| {
            Point::new(
                center.x + (p.x - center.x) * factor,
                center.y + (p.y - center.y) * factor,
            )
        })
        .collect()
}
