//! Group drag across a mixed multi-selection.
//!
//! When the selection mixes loose paths and group blocks, a drag started on
//! any selected member must move everything coherently. Blocks are pure
//! projections: the session snapshots their *members'* positions, never the
//! block's own derived bounds, and the scene store recomputes each frame
//! after the batch move. A block is never translated as an object.

use crate::effects::CommitLabel;
use crate::gesture::{ClonePreview, DragKind, DragSession, GestureContext, GestureOutcome};
use crate::object_drag::library_add_effect;
use crate::scheduler::PendingMutation;
use grip_core::{Bounds, ObjectId, Point, SceneOps, union_bounds};

/// One mixed-selection drag gesture.
#[derive(Debug)]
pub struct GroupDragSession {
    /// Every concrete item to move (loose objects and block members) with
    /// its start origin.
    items: Vec<(ObjectId, Point)>,
    union_start: Bounds,
    session: DragSession,
    preview: Option<ClonePreview>,
    all_paths: bool,
}

impl GroupDragSession {
    /// Partition the selection into loose items and block members and
    /// snapshot their positions. Returns `None` for an empty selection.
    pub fn begin(scene: &dyn SceneOps, selection: &[ObjectId], start: Point) -> Option<Self> {
        let mut items: Vec<(ObjectId, Point)> = Vec::new();
        let mut all_bounds: Vec<Bounds> = Vec::new();
        let mut all_paths = true;
        let mut push = |id: ObjectId, items: &mut Vec<(ObjectId, Point)>| {
            if items.iter().any(|(existing, _)| *existing == id) {
                return;
            }
            if let Some(object) = scene.get(id) {
                items.push((id, object.bounds.origin()));
                all_bounds.push(object.bounds);
                if !object.is_path() {
                    all_paths = false;
                }
            }
        };

        for id in selection {
            if scene.get(*id).is_some_and(|o| o.is_block()) {
                for member in scene.block_members(*id) {
                    push(member, &mut items);
                }
            } else {
                push(*id, &mut items);
            }
        }
        if items.is_empty() {
            return None;
        }

        let union_start = union_bounds(&all_bounds)?;
        Some(Self {
            items,
            union_start,
            session: DragSession::new(DragKind::ObjectGroup, start),
            preview: None,
            all_paths,
        })
    }

    pub fn preview(&self) -> Option<&ClonePreview> {
        self.preview.as_ref()
    }

    /// Ids of every concrete item this gesture moves.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.items.iter().map(|(id, _)| *id).collect()
    }

    /// Handle a pointer-move: one displacement vector applied to every
    /// snapshot, snapped once against the union bounds.
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
            let sources: Vec<ObjectId> = self.items.iter().map(|(id, _)| *id).collect();
            let preview = self
                .preview
                .get_or_insert_with(|| ClonePreview::new(self.union_start, sources));
            preview.bounds = self.union_start.translated(delta.x, delta.y);
            preview.over_library = ctx.over_library;
            return None;
        }

        let union_candidate = self.union_start.translated(delta.x, delta.y);
        let snap = ctx
            .detector
            .snap(union_candidate, ctx.config.snap_threshold, ctx.zoom);

        let batch: Vec<(ObjectId, Point)> = self
            .items
            .iter()
            .map(|(id, start)| {
                (
                    *id,
                    Point::new(
                        start.x + delta.x + snap.delta.x,
                        start.y + delta.y + snap.delta.y,
                    ),
                )
            })
            .collect();
        Some(PendingMutation::Moves(batch))
    }

    pub fn finish(&mut self, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        if !self.session.moved {
            self.preview = None;
            return GestureOutcome::none();
        }
        if !self.session.cloning {
            return GestureOutcome::commit(CommitLabel::MoveItems);
        }

        let Some(preview) = self.preview.take() else {
            return GestureOutcome::none();
        };
        // The drop target is judged at release, not at the last move
        if ctx.over_library {
            let effects = self
                .items
                .iter()
                .filter_map(|(id, _)| library_add_effect(ctx.scene, *id))
                .collect();
            return GestureOutcome {
                commit: None,
                effects,
            };
        }

        let offset = preview.bounds.origin().delta_from(self.union_start.origin());
        let mut any = false;
        for (id, start) in &self.items {
            let Some(new_id) = ctx.scene.clone_object(*id) else {
                log::debug!("clone of {id} failed; skipping");
                continue;
            };
            ctx.scene
                .move_object(new_id, start.offset(offset.x, offset.y));
            any = true;
        }
        if !any {
            return GestureOutcome::none();
        }
        let label = if self.all_paths {
            CommitLabel::ClonePaths
        } else {
            CommitLabel::CloneImage
        };
        GestureOutcome::commit(label)
    }
}
