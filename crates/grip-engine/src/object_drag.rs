//! Image/model drag and resize sub-machines.
//!
//! Drag covers three shapes of the same gesture: a single object, an
//! explicit multi-selection, and block-membership expansion (dragging one
//! member of a selected group block drags all of its siblings). Every shape
//! has an alt-drag clone variant that moves a preview instead of the
//! originals.

use crate::effects::{CommitLabel, EngineEffect, LibraryItemKind, LibrarySource};
use crate::gesture::{ClonePreview, DragKind, DragSession, GestureContext, GestureOutcome};
use crate::scheduler::PendingMutation;
use grip_core::{Bounds, ObjectId, ObjectKind, Point, SceneOps, union_bounds};
use smallvec::SmallVec;

/// Resolve which ids a drag starting on `hit` actually moves.
///
/// Starting on a selected object drags the whole selection; a block in that
/// set contributes its members (never itself); a member of a selected block
/// pulls in its siblings.
pub fn expand_drag_ids(
    scene: &dyn SceneOps,
    selection: &[ObjectId],
    hit: ObjectId,
) -> SmallVec<[ObjectId; 4]> {
    let mut out: SmallVec<[ObjectId; 4]> = SmallVec::new();
    let push = |out: &mut SmallVec<[ObjectId; 4]>, id: ObjectId| {
        if !out.contains(&id) {
            out.push(id);
        }
    };

    let base: Vec<ObjectId> = if selection.contains(&hit) {
        selection.to_vec()
    } else {
        vec![hit]
    };

    for id in base {
        if scene.get(id).is_some_and(|o| o.is_block()) {
            for m in scene.block_members(id) {
                push(&mut out, m);
            }
            continue;
        }
        push(&mut out, id);
        if let Some(block) = scene.member_of_block(id)
            && selection.contains(&block)
        {
            for m in scene.block_members(block) {
                push(&mut out, m);
            }
        }
    }
    out
}

/// One object-drag gesture over images/models.
#[derive(Debug)]
pub struct ObjectDragSession {
    ids: SmallVec<[ObjectId; 4]>,
    union_start: Bounds,
    session: DragSession,
    preview: Option<ClonePreview>,
}

impl ObjectDragSession {
    /// Snapshot start bounds for every dragged id. Returns `None` when no
    /// draggable object remains (the controller logs and aborts).
    pub fn begin(scene: &dyn SceneOps, ids: SmallVec<[ObjectId; 4]>, start: Point) -> Option<Self> {
        let kind = if ids.len() > 1 {
            DragKind::ObjectGroup
        } else {
            DragKind::Object
        };
        let mut session = DragSession::new(kind, start);
        let mut all_bounds = Vec::new();
        for id in &ids {
            let b = scene.get_bounds(*id)?;
            session.start_bounds.insert(*id, b);
            all_bounds.push(b);
        }
        let union_start = union_bounds(&all_bounds)?;
        Some(Self {
            ids,
            union_start,
            session,
            preview: None,
        })
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn preview(&self) -> Option<&ClonePreview> {
        self.preview.as_ref()
    }

    /// Handle a pointer-move. Non-clone drags return the batch to schedule;
    /// clone drags move only the preview.
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

        if self.session.cloning {
            let moved = self.union_start.translated(delta.x, delta.y);
            let preview = self
                .preview
                .get_or_insert_with(|| ClonePreview::new(self.union_start, self.ids.clone()));
            preview.bounds = moved;
            preview.over_library = ctx.over_library;
            return None;
        }

        // Group drags snap the union once and shift every member uniformly;
        // single drags snap the object itself.
        let snap_delta = if self.ids.len() > 1 {
            let union_candidate = self.union_start.translated(delta.x, delta.y);
            ctx.detector
                .snap(union_candidate, ctx.config.snap_threshold, ctx.zoom)
                .delta
        } else {
            let id = self.ids[0];
            let candidate = self.session.start_bounds[&id].translated(delta.x, delta.y);
            ctx.detector
                .snap(candidate, ctx.config.snap_threshold, ctx.zoom)
                .delta
        };

        let batch: Vec<(ObjectId, Point)> = self
            .ids
            .iter()
            .map(|id| {
                let start = self.session.start_bounds[id];
                (
                    *id,
                    Point::new(
                        start.x + delta.x + snap_delta.x,
                        start.y + delta.y + snap_delta.y,
                    ),
                )
            })
            .collect();
        Some(PendingMutation::Moves(batch))
    }

    /// Finalize on pointer-up. The controller has already flushed any
    /// pending scheduled move.
    pub fn finish(&mut self, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        if !self.session.moved {
            self.preview = None;
            return GestureOutcome::none();
        }
        if !self.session.cloning {
            return GestureOutcome::commit(CommitLabel::MoveImage);
        }

        let Some(preview) = self.preview.take() else {
            return GestureOutcome::none();
        };
        // The drop target is judged at release, not at the last move
        if ctx.over_library {
            // Library drop: one add per object, nothing enters the scene.
            let mut effects = Vec::new();
            for id in &self.ids {
                if let Some(effect) = library_add_effect(ctx.scene, *id) {
                    effects.push(effect);
                }
            }
            return GestureOutcome {
                commit: None,
                effects,
            };
        }

        let offset = preview.bounds.origin().delta_from(self.union_start.origin());
        let mut any = false;
        for id in &self.ids {
            let Some(new_id) = ctx.scene.clone_object(*id) else {
                log::debug!("clone of {id} failed; skipping");
                continue;
            };
            let start = self.session.start_bounds[id];
            ctx.scene
                .move_object(new_id, start.origin().offset(offset.x, offset.y));
            any = true;
        }
        if any {
            GestureOutcome::commit(CommitLabel::CloneImage)
        } else {
            GestureOutcome::none()
        }
    }
}

pub(crate) fn library_add_effect(scene: &dyn SceneOps, id: ObjectId) -> Option<EngineEffect> {
    let object = scene.get(id)?;
    let (kind, source) = match &object.kind {
        ObjectKind::Image { src, .. } => (LibraryItemKind::Image, LibrarySource::Url(src.clone())),
        ObjectKind::Model3d { src } => (LibraryItemKind::Model3d, LibrarySource::Url(src.clone())),
        ObjectKind::Path { points, .. } => (
            LibraryItemKind::Path,
            LibrarySource::PathPoints(points.clone()),
        ),
        ObjectKind::Block { .. } => return None,
    };
    Some(EngineEffect::AddToLibrary {
        kind,
        source,
        width: object.bounds.width,
        height: object.bounds.height,
    })
}

// ─── Resize ──────────────────────────────────────────────────────────────

/// Which corner handle a resize gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn position(self, b: &Bounds) -> Point {
        match self {
            Corner::TopLeft => Point::new(b.x, b.y),
            Corner::TopRight => Point::new(b.x + b.width, b.y),
            Corner::BottomLeft => Point::new(b.x, b.y + b.height),
            Corner::BottomRight => Point::new(b.x + b.width, b.y + b.height),
        }
    }

    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// One corner-resize gesture, anchored at the opposite corner.
#[derive(Debug)]
pub struct ResizeSession {
    pub id: ObjectId,
    corner: Corner,
    start_bounds: Bounds,
    anchor: Point,
    session: DragSession,
}

impl ResizeSession {
    pub fn begin(id: ObjectId, corner: Corner, start_bounds: Bounds, start: Point) -> Self {
        Self {
            id,
            corner,
            start_bounds,
            anchor: corner.opposite().position(&start_bounds),
            session: DragSession::new(DragKind::Resize, start),
        }
    }

    /// Handle a pointer-move. Locked-aspect by default; `shift` frees the
    /// aspect ratio. Both modes clamp to the minimum size floor.
    pub fn update(
        &mut self,
        ctx: &mut GestureContext<'_>,
        p: Point,
        mods_shift: bool,
    ) -> Option<PendingMutation> {
        if !self.session.register_move(
            p,
            ctx.device_scale,
            ctx.config.drag_threshold,
            false,
        ) {
            return None;
        }
        let min = ctx.config.min_object_size;

        let (width, height) = if mods_shift {
            (
                (p.x - self.anchor.x).abs().max(min),
                (p.y - self.anchor.y).abs().max(min),
            )
        } else {
            self.locked_aspect_size(p, min)
        };

        // The anchor corner never moves; the box extends toward the side
        // the grabbed corner started on.
        let corner_start = self.corner.position(&self.start_bounds);
        let x = if corner_start.x < self.anchor.x {
            self.anchor.x - width
        } else {
            self.anchor.x
        };
        let y = if corner_start.y < self.anchor.y {
            self.anchor.y - height
        } else {
            self.anchor.y
        };

        Some(PendingMutation::Resize(
            self.id,
            Bounds::new(x, y, width, height),
        ))
    }

    /// Project the pointer's displacement from the anchor onto the shape's
    /// original diagonal; width follows the projection, height follows the
    /// fixed aspect ratio.
    fn locked_aspect_size(&self, p: Point, min: f32) -> (f32, f32) {
        let w0 = self.start_bounds.width.max(1e-3);
        let h0 = self.start_bounds.height.max(1e-3);
        let aspect = w0 / h0;
        let corner_start = self.corner.position(&self.start_bounds);
        let diag = corner_start.delta_from(self.anchor);
        let diag_len = (diag.x * diag.x + diag.y * diag.y).sqrt().max(1e-3);
        let unit = Point::new(diag.x / diag_len, diag.y / diag_len);

        let disp = p.delta_from(self.anchor);
        let along = (disp.x * unit.x + disp.y * unit.y).max(0.0);
        let mut width = along * w0 / diag_len;
        let mut height = along * h0 / diag_len;
        if width < min {
            width = min;
            height = width / aspect;
        }
        if height < min {
            height = min;
            width = height * aspect;
        }
        (width, height)
    }

    pub fn finish(&mut self) -> GestureOutcome {
        if self.session.moved {
            GestureOutcome::commit(CommitLabel::ResizeImage)
        } else {
            GestureOutcome::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::EngineConfig;
    use crate::snap::AlignmentDetector;
    use grip_core::{Scene, SceneObject};
    use pretty_assertions::assert_eq;

    fn image(id: &str, x: f32, y: f32, w: f32, h: f32) -> SceneObject {
        SceneObject::new(
            ObjectId::intern(id),
            ObjectKind::Image {
                src: format!("{id}.png"),
                natural_width: w,
                natural_height: h,
            },
            Bounds::new(x, y, w, h),
        )
    }

    fn ctx<'a>(
        scene: &'a mut Scene,
        config: &'a EngineConfig,
        detector: &'a mut AlignmentDetector,
    ) -> GestureContext<'a> {
        GestureContext {
            scene,
            config,
            detector,
            device_scale: 1.0,
            zoom: 1.0,
            over_library: false,
        }
    }

    #[test]
    fn expansion_pulls_in_block_siblings() {
        let mut scene = Scene::new();
        let a = scene.insert_object(image("ex_a", 0.0, 0.0, 10.0, 10.0));
        let b = scene.insert_object(image("ex_b", 20.0, 0.0, 10.0, 10.0));
        let loose = scene.insert_object(image("ex_loose", 50.0, 0.0, 10.0, 10.0));
        let block = scene.add_block(&[a, b], "pair").unwrap();

        // Selected block, drag starts on member a → both members, no block
        let ids = expand_drag_ids(&scene, &[block], a);
        assert!(ids.contains(&a) && ids.contains(&b));
        assert!(!ids.contains(&block));

        // Selecting the block itself expands to members
        let ids = expand_drag_ids(&scene, &[block], block);
        assert_eq!(ids.len(), 2);

        // Unselected hit drags only itself
        let ids = expand_drag_ids(&scene, &[block], loose);
        assert_eq!(ids.as_slice(), [loose]);
    }

    #[test]
    fn group_drag_moves_members_uniformly() {
        let mut scene = Scene::new();
        let a = scene.insert_object(image("gd_a", 0.0, 0.0, 10.0, 10.0));
        let b = scene.insert_object(image("gd_b", 10.0, 10.0, 10.0, 10.0));
        let block = scene.add_block(&[a, b], "pair").unwrap();
        let config = EngineConfig::default();
        let mut detector = AlignmentDetector::new();
        detector.begin_session(&scene, &[a, b, block]);

        let ids = expand_drag_ids(&scene, &[block], a);
        let mut s = ObjectDragSession::begin(&scene, ids, Point::new(5.0, 5.0)).unwrap();
        let mut c = ctx(&mut scene, &config, &mut detector);

        let update = s.update(&mut c, Point::new(10.0, 10.0), false).unwrap();
        let PendingMutation::Moves(batch) = update else {
            panic!("expected Moves");
        };
        assert_eq!(batch.len(), 2);
        let pos_a = batch.iter().find(|(id, _)| *id == a).unwrap().1;
        let pos_b = batch.iter().find(|(id, _)| *id == b).unwrap().1;
        assert_eq!(pos_a, Point::new(5.0, 5.0));
        assert_eq!(pos_b, Point::new(15.0, 15.0));
    }

    #[test]
    fn clone_drag_keeps_originals_and_materializes_on_release() {
        let mut scene = Scene::new();
        let a = scene.insert_object(image("cd_a", 0.0, 0.0, 20.0, 20.0));
        let b = scene.insert_object(image("cd_b", 40.0, 0.0, 20.0, 20.0));
        let config = EngineConfig::default();
        let mut detector = AlignmentDetector::new();

        let ids = expand_drag_ids(&scene, &[a, b], a);
        let mut s = ObjectDragSession::begin(&scene, ids, Point::new(10.0, 10.0)).unwrap();
        let mut c = ctx(&mut scene, &config, &mut detector);

        assert_eq!(s.update(&mut c, Point::new(40.0, 10.0), true), None);
        assert_eq!(c.scene.get_bounds(a).unwrap().origin(), Point::ZERO);

        // The single preview spans the union of both dragged objects
        let preview = s.preview().unwrap();
        assert_eq!(preview.bounds.width, 60.0);
        assert_eq!(preview.bounds.origin(), Point::new(30.0, 0.0));

        let visible_before = c.scene.list_visible().len();
        let outcome = s.finish(&mut c);
        assert_eq!(outcome.commit, Some(CommitLabel::CloneImage));
        // Two clones landed, originals still in place
        assert_eq!(c.scene.list_visible().len(), visible_before + 2);
        assert_eq!(c.scene.get_bounds(a).unwrap().origin(), Point::ZERO);
        assert_eq!(
            c.scene.get_bounds(b).unwrap().origin(),
            Point::new(40.0, 0.0)
        );
    }

    #[test]
    fn library_drop_adds_each_object_without_cloning() {
        let mut scene = Scene::new();
        let a = scene.insert_object(image("ld_a", 0.0, 0.0, 20.0, 20.0));
        let config = EngineConfig::default();
        let mut detector = AlignmentDetector::new();

        let ids = expand_drag_ids(&scene, &[], a);
        let mut s = ObjectDragSession::begin(&scene, ids, Point::new(10.0, 10.0)).unwrap();
        let mut c = ctx(&mut scene, &config, &mut detector);
        c.over_library = true;
        s.update(&mut c, Point::new(60.0, 10.0), true);

        let visible_before = c.scene.list_visible().len();
        let outcome = s.finish(&mut c);
        assert_eq!(outcome.commit, None);
        assert_eq!(outcome.effects.len(), 1);
        assert!(matches!(
            outcome.effects[0],
            EngineEffect::AddToLibrary {
                kind: LibraryItemKind::Image,
                ..
            }
        ));
        assert_eq!(c.scene.list_visible().len(), visible_before);
    }

    #[test]
    fn locked_resize_preserves_aspect_exactly() {
        let mut scene = Scene::new();
        let id = scene.insert_object(image("rz", 0.0, 0.0, 100.0, 50.0));
        let config = EngineConfig::default();
        let mut detector = AlignmentDetector::new();
        let start = scene.get_bounds(id).unwrap();

        let mut s = ResizeSession::begin(id, Corner::TopLeft, start, Point::new(0.0, 0.0));
        let mut c = ctx(&mut scene, &config, &mut detector);
        let update = s.update(&mut c, Point::new(20.0, 20.0), false).unwrap();

        let PendingMutation::Resize(_, b) = update else {
            panic!("expected Resize");
        };
        assert_eq!(b.width / b.height, 2.0);
        // Anchor (bottom-right) stays fixed
        assert_eq!(b.x + b.width, 100.0);
        assert_eq!(b.y + b.height, 50.0);

        assert_eq!(s.finish().commit, Some(CommitLabel::ResizeImage));
    }

    #[test]
    fn free_resize_clamps_to_floor() {
        let mut scene = Scene::new();
        let id = scene.insert_object(image("rz_free", 0.0, 0.0, 100.0, 100.0));
        let config = EngineConfig::default();
        let mut detector = AlignmentDetector::new();
        let start = scene.get_bounds(id).unwrap();

        let mut s = ResizeSession::begin(id, Corner::BottomRight, start, Point::new(100.0, 100.0));
        let mut c = ctx(&mut scene, &config, &mut detector);
        // Drag almost onto the anchor (top-left)
        let update = s.update(&mut c, Point::new(3.0, 3.0), true).unwrap();

        let PendingMutation::Resize(_, b) = update else {
            panic!("expected Resize");
        };
        assert_eq!(b.width, config.min_object_size);
        assert_eq!(b.height, config.min_object_size);
        assert_eq!(b.origin(), Point::ZERO);
    }
}
