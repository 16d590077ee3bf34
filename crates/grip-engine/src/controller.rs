//! The interaction controller: the top-level gesture dispatcher.
//!
//! Raw pointer/keyboard events enter here. The controller classifies the
//! current tool mode, hit-tests the scene to decide ownership, and delegates
//! to exactly one sub-machine for the duration of the gesture. On pointer-up
//! the owning sub-machine finalizes and the controller emits at most one
//! history commit, then clears ownership unconditionally — the engine can
//! never get stuck mid-gesture.
//!
//! Dispatch priority on pointer-down (select-like tools):
//! 1. space-pan, 2. upload hotspot, 3. resize handle, 4. path edit on the
//! selected path, 5. selection-click resolution (object drag / group drag /
//! marquee), 6. the active drawing tool.

use crate::effects::{CommitLabel, EngineEffect};
use crate::gesture::{ClonePreview, EngineConfig, GestureContext, GestureOutcome};
use crate::group_drag::GroupDragSession;
use crate::input::Modifiers;
use crate::object_drag::{Corner, ObjectDragSession, ResizeSession, expand_drag_ids};
use crate::path_edit::PathEditSession;
use crate::scheduler::{FrameScheduler, PendingMutation};
use crate::selection::{SelectFilter, Selection};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::snap::{AlignmentDetector, AlignmentGuide};
use grip_core::{Bounds, CanvasTransform, ObjectId, ObjectKind, Point, SceneOps};
use smallvec::SmallVec;

/// Radius of the upload hotspot on empty 3D placeholders, scene units at
/// zoom 1.0.
const UPLOAD_HOTSPOT_RADIUS: f32 = 16.0;

/// Minimum marquee extent (scene units) before it counts as a box select
/// rather than an empty-canvas click.
const MARQUEE_MIN: f32 = 2.0;

/// The active tool mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMode {
    Select,
    Marquee,
    DrawPath,
    DrawLine,
    DrawRect,
    DrawCircle,
    PlaceImage,
    Place3d,
    Text,
    QuickUpload,
}

impl ToolMode {
    /// Tools whose pointer-down goes through selection/gesture resolution.
    pub fn is_select_like(self) -> bool {
        matches!(self, ToolMode::Select | ToolMode::Marquee)
    }
}

/// Hover feedback for the UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    Move,
    Grab,
    Grabbing,
    Crosshair,
    Pointer,
    ResizeNwse,
    ResizeNesw,
}

impl CursorStyle {
    pub fn as_css(self) -> &'static str {
        match self {
            CursorStyle::Default => "default",
            CursorStyle::Move => "move",
            CursorStyle::Grab => "grab",
            CursorStyle::Grabbing => "grabbing",
            CursorStyle::Crosshair => "crosshair",
            CursorStyle::Pointer => "pointer",
            CursorStyle::ResizeNwse => "nwse-resize",
            CursorStyle::ResizeNesw => "nesw-resize",
        }
    }
}

/// The drawing-tool collaborator. Drafting algorithms are outside the
/// engine; the controller only routes ownership of the gesture.
pub trait DrawDelegate {
    /// Returns true if the delegate claims the gesture.
    fn pointer_down(
        &mut self,
        scene: &mut dyn SceneOps,
        tool: ToolMode,
        p: Point,
        mods: &Modifiers,
    ) -> bool;

    fn pointer_move(&mut self, scene: &mut dyn SceneOps, p: Point, mods: &Modifiers);

    /// Finalize; return a label when the draw changed the scene.
    fn pointer_up(
        &mut self,
        scene: &mut dyn SceneOps,
        p: Point,
        mods: &Modifiers,
    ) -> Option<CommitLabel>;
}

/// Default delegate for hosts that wire no drawing tools.
pub struct NullDraw;

impl DrawDelegate for NullDraw {
    fn pointer_down(
        &mut self,
        _scene: &mut dyn SceneOps,
        _tool: ToolMode,
        _p: Point,
        _mods: &Modifiers,
    ) -> bool {
        false
    }

    fn pointer_move(&mut self, _scene: &mut dyn SceneOps, _p: Point, _mods: &Modifiers) {}

    fn pointer_up(
        &mut self,
        _scene: &mut dyn SceneOps,
        _p: Point,
        _mods: &Modifiers,
    ) -> Option<CommitLabel> {
        None
    }
}

/// Which sub-machine owns the current gesture. At most one at a time.
enum ActiveGesture {
    None,
    PathEdit(PathEditSession),
    ObjectDrag(ObjectDragSession),
    GroupDrag(GroupDragSession),
    Resize(ResizeSession),
    Marquee { start: Point, rect: Bounds },
    Pan { last_device: Point },
    Draw,
}

/// The orchestrator. Owns selection, snapping, scheduling, and the gesture
/// state machine; consumes the scene through `SceneOps` only.
pub struct Controller {
    pub config: EngineConfig,
    tool: ToolMode,
    /// Latest-value cell: updated by the host whenever pan/zoom/dpr change,
    /// read only inside event handlers.
    transform: CanvasTransform,
    pub selection: Selection,
    detector: AlignmentDetector,
    gesture: ActiveGesture,
    scheduler: FrameScheduler<PendingMutation>,
    effects: Vec<EngineEffect>,
    /// Library panel drop zone, device coordinates.
    library_zone: Option<Bounds>,
    library_hover: bool,
    space_held: bool,
    draw: Box<dyn DrawDelegate>,
}

impl Controller {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            tool: ToolMode::Select,
            transform: CanvasTransform::default(),
            selection: Selection::new(),
            detector: AlignmentDetector::new(),
            gesture: ActiveGesture::None,
            scheduler: FrameScheduler::new(),
            effects: Vec::new(),
            library_zone: None,
            library_hover: false,
            space_held: false,
            draw: Box::new(NullDraw),
        }
    }

    pub fn set_draw_delegate(&mut self, draw: Box<dyn DrawDelegate>) {
        self.draw = draw;
    }

    pub fn set_transform(&mut self, transform: CanvasTransform) {
        self.transform = transform;
    }

    pub fn transform(&self) -> CanvasTransform {
        self.transform
    }

    pub fn set_tool(&mut self, tool: ToolMode) {
        self.tool = tool;
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    /// Tell the engine where the library panel sits, device coordinates.
    pub fn set_library_zone(&mut self, zone: Option<Bounds>) {
        self.library_zone = zone;
    }

    /// Live "drag-over library" signal for the drop-target highlight.
    pub fn library_hover(&self) -> bool {
        self.library_hover
    }

    /// Alignment guides from the current drag, for the renderer.
    pub fn guides(&self) -> &[AlignmentGuide] {
        self.detector.guides()
    }

    /// The clone preview of the active gesture, if one is showing.
    pub fn clone_preview(&self) -> Option<&ClonePreview> {
        match &self.gesture {
            ActiveGesture::PathEdit(s) => s.preview(),
            ActiveGesture::ObjectDrag(s) => s.preview(),
            ActiveGesture::GroupDrag(s) => s.preview(),
            _ => None,
        }
    }

    /// The marquee rectangle while rubber-band selecting.
    pub fn marquee_rect(&self) -> Option<Bounds> {
        match &self.gesture {
            ActiveGesture::Marquee { rect, .. } => Some(*rect),
            _ => None,
        }
    }

    /// Take all effects queued since the last drain.
    pub fn drain_effects(&mut self) -> Vec<EngineEffect> {
        std::mem::take(&mut self.effects)
    }

    /// The most recently queued commit, without draining the queue.
    pub fn peek_commit(&self) -> Option<CommitLabel> {
        self.effects.iter().rev().find_map(|e| match e {
            EngineEffect::Commit(label) => Some(*label),
            _ => None,
        })
    }

    fn device_scale(&self) -> f32 {
        self.transform.zoom * self.transform.dpr
    }

    fn over_library(&self, device: Point) -> bool {
        self.library_zone.is_some_and(|z| z.contains(device))
    }

    // ─── Pointer events ──────────────────────────────────────────────────

    pub fn pointer_down(&mut self, scene: &mut dyn SceneOps, device: Point, mods: Modifiers) {
        if !matches!(self.gesture, ActiveGesture::None) {
            // Mutual exclusion invariant: never start a second session.
            log::debug!("pointer-down while a gesture is active; ignored");
            return;
        }
        if mods.space {
            self.space_held = true;
        }
        let p = self.transform.to_scene(device);

        // (1) space-pan
        if self.space_held && self.tool.is_select_like() {
            self.gesture = ActiveGesture::Pan {
                last_device: device,
            };
            return;
        }

        if self.tool == ToolMode::Marquee {
            self.begin_marquee(p, &mods);
            return;
        }

        if self.tool == ToolMode::Select {
            self.select_pointer_down(scene, p, &mods);
            return;
        }

        // (6) drawing tools own everything else
        if self.draw.pointer_down(scene, self.tool, p, &mods) {
            self.gesture = ActiveGesture::Draw;
        }
    }

    fn select_pointer_down(&mut self, scene: &mut dyn SceneOps, p: Point, mods: &Modifiers) {
        let zoom = self.transform.zoom;
        let handle_tol = self.config.handle_tolerance / zoom;
        let hit = scene.hit_test(p, 0.0);

        // (2) upload hotspot on empty 3D placeholders
        if let Some(hit_id) = hit
            && let Some(object) = scene.get(hit_id)
            && matches!(&object.kind, ObjectKind::Model3d { src } if src.is_empty())
            && object.bounds.center().distance(p) <= UPLOAD_HOTSPOT_RADIUS / zoom
        {
            self.effects.push(EngineEffect::UploadRequested(hit_id));
            return;
        }

        // (3) resize handle on the primary selection
        if let Some(primary) = self.selection.primary(scene)
            && scene.get(primary).is_some_and(|o| o.is_block_member_kind())
            && let Some(bounds) = scene.get_bounds(primary)
        {
            for corner in Corner::ALL {
                if corner.position(&bounds).distance(p) <= handle_tol {
                    self.gesture =
                        ActiveGesture::Resize(ResizeSession::begin(primary, corner, bounds, p));
                    return;
                }
            }
        }

        // (4) path editing on the currently selected path only
        if let Some(primary) = self.selection.primary(scene)
            && let Some(points) = scene.path_points(primary)
        {
            if let Some(index) = points.iter().position(|v| v.distance(p) <= handle_tol) {
                let closed = matches!(
                    scene.get(primary).map(|o| &o.kind),
                    Some(ObjectKind::Path { closed: true, .. })
                );
                self.gesture = ActiveGesture::PathEdit(PathEditSession::vertex(
                    primary,
                    index,
                    points,
                    p,
                    mods.shift && closed,
                ));
                return;
            }
            // Body drag owns the gesture only when this path is the sole
            // selection; otherwise the whole selection moves below.
            if self.selection.len() == 1
                && hit == Some(primary)
                && let Some(bounds) = scene.get_bounds(primary)
            {
                self.detector
                    .begin_session(scene, &snap_exclusions(scene, &[primary]));
                self.gesture = ActiveGesture::PathEdit(PathEditSession::body(primary, bounds, p));
                return;
            }
        }

        // (5) generic selection-click resolution
        let Some(hit_id) = hit else {
            self.begin_marquee(p, mods);
            return;
        };

        if mods.shift {
            // Toggle membership; no drag starts from a shift-click.
            self.selection.toggle(hit_id);
            return;
        }
        // Clicking a member of a selected block keeps the block selection —
        // the drag below expands to all of its members.
        let member_of_selected_block = scene
            .member_of_block(hit_id)
            .is_some_and(|block| self.selection.contains(block));
        if !self.selection.contains(hit_id) && !member_of_selected_block {
            self.selection.set_primary(hit_id);
        }

        let ids = self.selection.ids(scene);
        let mixed = ids.len() > 1
            && ids
                .iter()
                .any(|id| scene.get(*id).is_some_and(|o| o.is_path() || o.is_block()));

        if mixed {
            match GroupDragSession::begin(scene, &ids, p) {
                Some(session) => {
                    self.detector
                        .begin_session(scene, &snap_exclusions(scene, &session.ids()));
                    self.gesture = ActiveGesture::GroupDrag(session);
                }
                None => log::debug!("group drag aborted: nothing draggable in selection"),
            }
            return;
        }

        if scene.get(hit_id).is_some_and(|o| o.is_path()) {
            if let Some(bounds) = scene.get_bounds(hit_id) {
                self.detector
                    .begin_session(scene, &snap_exclusions(scene, &[hit_id]));
                self.gesture = ActiveGesture::PathEdit(PathEditSession::body(hit_id, bounds, p));
            }
            return;
        }

        let drag_ids = expand_drag_ids(scene, &ids, hit_id);
        match ObjectDragSession::begin(scene, drag_ids, p) {
            Some(session) => {
                self.detector
                    .begin_session(scene, &snap_exclusions(scene, session.ids()));
                self.gesture = ActiveGesture::ObjectDrag(session);
            }
            None => log::debug!("object drag aborted: no draggable bounds"),
        }
    }

    fn begin_marquee(&mut self, p: Point, mods: &Modifiers) {
        if !mods.shift {
            self.selection.clear();
        }
        self.gesture = ActiveGesture::Marquee {
            start: p,
            rect: Bounds::new(p.x, p.y, 0.0, 0.0),
        };
    }

    pub fn pointer_move(&mut self, scene: &mut dyn SceneOps, device: Point, mods: Modifiers) {
        let p = self.transform.to_scene(device);
        let over_library = self.over_library(device);
        let device_scale = self.device_scale();
        let zoom = self.transform.zoom;

        let mut gesture = std::mem::replace(&mut self.gesture, ActiveGesture::None);
        match &mut gesture {
            ActiveGesture::None => {} // hover feedback only
            ActiveGesture::Pan { last_device } => {
                self.transform
                    .pan_by_device(device.x - last_device.x, device.y - last_device.y);
                *last_device = device;
            }
            ActiveGesture::Marquee { start, rect } => {
                *rect = Bounds::from_corners(*start, p);
            }
            ActiveGesture::PathEdit(session) => {
                let mutation = {
                    let mut ctx = GestureContext {
                        scene,
                        config: &self.config,
                        detector: &mut self.detector,
                        device_scale,
                        zoom,
                        over_library,
                    };
                    session.update(&mut ctx, p, mods.alt)
                };
                if let Some(m) = mutation {
                    self.scheduler.schedule(m);
                }
            }
            ActiveGesture::ObjectDrag(session) => {
                let mutation = {
                    let mut ctx = GestureContext {
                        scene,
                        config: &self.config,
                        detector: &mut self.detector,
                        device_scale,
                        zoom,
                        over_library,
                    };
                    session.update(&mut ctx, p, mods.alt)
                };
                if let Some(m) = mutation {
                    self.scheduler.schedule(m);
                }
            }
            ActiveGesture::GroupDrag(session) => {
                let mutation = {
                    let mut ctx = GestureContext {
                        scene,
                        config: &self.config,
                        detector: &mut self.detector,
                        device_scale,
                        zoom,
                        over_library,
                    };
                    session.update(&mut ctx, p, mods.alt)
                };
                if let Some(m) = mutation {
                    self.scheduler.schedule(m);
                }
            }
            ActiveGesture::Resize(session) => {
                let mutation = {
                    let mut ctx = GestureContext {
                        scene,
                        config: &self.config,
                        detector: &mut self.detector,
                        device_scale,
                        zoom,
                        over_library,
                    };
                    session.update(&mut ctx, p, mods.shift)
                };
                if let Some(m) = mutation {
                    self.scheduler.schedule(m);
                }
            }
            ActiveGesture::Draw => self.draw.pointer_move(scene, p, &mods),
        }
        self.gesture = gesture;

        // Library-hover signal: purely cosmetic, reversible
        let hovering = self
            .clone_preview()
            .is_some_and(|preview| preview.over_library);
        if hovering != self.library_hover {
            self.library_hover = hovering;
            self.effects.push(EngineEffect::LibraryHover(hovering));
        }
    }

    /// Apply the frame-coalesced mutation, if one is pending. The host calls
    /// this once per animation frame.
    pub fn on_frame(&mut self, scene: &mut dyn SceneOps) {
        if let Some(mutation) = self.scheduler.take() {
            apply_mutation(scene, mutation);
        }
    }

    pub fn pointer_up(&mut self, scene: &mut dyn SceneOps, device: Point, mods: Modifiers) {
        let p = self.transform.to_scene(device);
        let over_library = self.over_library(device);
        let device_scale = self.device_scale();
        let zoom = self.transform.zoom;

        // Flush so the final position is never dropped
        if let Some(mutation) = self.scheduler.take() {
            apply_mutation(scene, mutation);
        }

        let mut gesture = std::mem::replace(&mut self.gesture, ActiveGesture::None);
        let outcome = match &mut gesture {
            ActiveGesture::None | ActiveGesture::Pan { .. } => GestureOutcome::none(),
            ActiveGesture::Marquee { rect, .. } => {
                if rect.width > MARQUEE_MIN || rect.height > MARQUEE_MIN {
                    let hits = scene.objects_in_rect(*rect);
                    if mods.shift {
                        self.selection.extend(hits);
                    } else {
                        self.selection.set_multi(hits);
                    }
                }
                GestureOutcome::none()
            }
            ActiveGesture::PathEdit(session) => {
                let mut ctx = GestureContext {
                    scene,
                    config: &self.config,
                    detector: &mut self.detector,
                    device_scale,
                    zoom,
                    over_library,
                };
                session.finish(&mut ctx)
            }
            ActiveGesture::ObjectDrag(session) => {
                let mut ctx = GestureContext {
                    scene,
                    config: &self.config,
                    detector: &mut self.detector,
                    device_scale,
                    zoom,
                    over_library,
                };
                session.finish(&mut ctx)
            }
            ActiveGesture::GroupDrag(session) => {
                let mut ctx = GestureContext {
                    scene,
                    config: &self.config,
                    detector: &mut self.detector,
                    device_scale,
                    zoom,
                    over_library,
                };
                session.finish(&mut ctx)
            }
            ActiveGesture::Resize(session) => session.finish(),
            ActiveGesture::Draw => {
                let commit = self.draw.pointer_up(scene, p, &mods);
                GestureOutcome {
                    commit,
                    effects: Vec::new(),
                }
            }
        };

        self.effects.extend(outcome.effects);
        if let Some(label) = outcome.commit {
            self.effects.push(EngineEffect::Commit(label));
        }

        // Unconditional cleanup — even a partially failed gesture ends here.
        self.detector.clear();
        self.scheduler.cancel();
        if self.library_hover {
            self.library_hover = false;
            self.effects.push(EngineEffect::LibraryHover(false));
        }
    }

    /// Window blur / visibility-hidden / explicit cancel: treated as an
    /// implicit pointer-up with `moved` preserved. Already-applied motion
    /// stands; no further movement is applied.
    pub fn cancel(&mut self, scene: &mut dyn SceneOps) {
        if let Some(mutation) = self.scheduler.take() {
            apply_mutation(scene, mutation);
        }

        let mut gesture = std::mem::replace(&mut self.gesture, ActiveGesture::None);
        let outcome = match &mut gesture {
            ActiveGesture::PathEdit(session) => {
                let mut ctx = self.cancel_ctx(scene);
                session.finish(&mut ctx)
            }
            ActiveGesture::ObjectDrag(session) => {
                let mut ctx = self.cancel_ctx(scene);
                session.finish(&mut ctx)
            }
            ActiveGesture::GroupDrag(session) => {
                let mut ctx = self.cancel_ctx(scene);
                session.finish(&mut ctx)
            }
            ActiveGesture::Resize(session) => session.finish(),
            _ => GestureOutcome::none(),
        };

        self.effects.extend(outcome.effects);
        if let Some(label) = outcome.commit {
            self.effects.push(EngineEffect::Commit(label));
        }

        self.space_held = false;
        self.detector.clear();
        self.scheduler.cancel();
        if self.library_hover {
            self.library_hover = false;
            self.effects.push(EngineEffect::LibraryHover(false));
        }
    }

    fn cancel_ctx<'a>(&'a mut self, scene: &'a mut dyn SceneOps) -> GestureContext<'a> {
        GestureContext {
            scene,
            config: &self.config,
            detector: &mut self.detector,
            device_scale: self.transform.zoom * self.transform.dpr,
            zoom: self.transform.zoom,
            over_library: false,
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Resolve and apply a keyboard shortcut. Undo/Redo resolve but execute
    /// in the host; everything else is handled here.
    pub fn handle_key(
        &mut self,
        scene: &mut dyn SceneOps,
        key: &str,
        mods: Modifiers,
    ) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(key, mods.ctrl, mods.shift, mods.alt, mods.meta)?;
        match action {
            ShortcutAction::Delete => {
                self.delete_selected(scene);
            }
            ShortcutAction::Deselect => self.selection.clear(),
            ShortcutAction::SelectAll => self.selection.select_all(scene, SelectFilter::ALL),
            ShortcutAction::PanStart => self.space_held = true,
            ShortcutAction::ToolSelect => self.tool = ToolMode::Select,
            ShortcutAction::ToolMarquee => self.tool = ToolMode::Marquee,
            ShortcutAction::ToolDrawPath => self.tool = ToolMode::DrawPath,
            ShortcutAction::ToolDrawLine => self.tool = ToolMode::DrawLine,
            ShortcutAction::ToolDrawRect => self.tool = ToolMode::DrawRect,
            ShortcutAction::ToolDrawCircle => self.tool = ToolMode::DrawCircle,
            ShortcutAction::ToolPlaceImage => self.tool = ToolMode::PlaceImage,
            ShortcutAction::ToolPlace3d => self.tool = ToolMode::Place3d,
            ShortcutAction::ToolText => self.tool = ToolMode::Text,
            ShortcutAction::ToolQuickUpload => self.tool = ToolMode::QuickUpload,
            ShortcutAction::Undo | ShortcutAction::Redo => {}
        }
        Some(action)
    }

    /// Key release. Space ends the pan modifier (and any pan in flight).
    pub fn key_up(&mut self, key: &str) {
        if key == " " {
            self.space_held = false;
            if matches!(self.gesture, ActiveGesture::Pan { .. }) {
                self.gesture = ActiveGesture::None;
            }
        }
    }

    /// Delete every selected object as one stateless command.
    ///
    /// Blocks are deleted first; their member ids are recorded so the
    /// generic pass never deletes a member twice (duplicate deletes are
    /// idempotent no-ops in the scene anyway).
    pub fn delete_selected(&mut self, scene: &mut dyn SceneOps) -> bool {
        let ids = self.selection.ids(scene);
        if ids.is_empty() {
            return false;
        }

        let mut deleted_members: SmallVec<[ObjectId; 8]> = SmallVec::new();
        for id in &ids {
            if scene.get(*id).is_some_and(|o| o.is_block()) {
                let members = scene.block_members(*id);
                scene.delete_object(*id);
                for member in members {
                    scene.delete_object(member);
                    deleted_members.push(member);
                }
            }
        }
        for id in &ids {
            if deleted_members.contains(id) {
                continue;
            }
            scene.delete_object(*id);
        }

        self.selection.clear();
        self.effects
            .push(EngineEffect::Commit(CommitLabel::DeleteItems));
        true
    }

    // ─── Hover feedback ──────────────────────────────────────────────────

    pub fn cursor_style(&self, scene: &dyn SceneOps, device: Point) -> CursorStyle {
        if matches!(self.gesture, ActiveGesture::Pan { .. }) {
            return CursorStyle::Grabbing;
        }
        if self.space_held {
            return CursorStyle::Grab;
        }
        if matches!(
            self.gesture,
            ActiveGesture::Resize(_)
                | ActiveGesture::PathEdit(_)
                | ActiveGesture::ObjectDrag(_)
                | ActiveGesture::GroupDrag(_)
        ) {
            return CursorStyle::Move;
        }

        let p = self.transform.to_scene(device);
        let zoom = self.transform.zoom;
        let handle_tol = self.config.handle_tolerance / zoom;

        if self.tool.is_select_like() {
            if let Some(primary) = self.selection.primary(scene) {
                if scene.get(primary).is_some_and(|o| o.is_block_member_kind())
                    && let Some(bounds) = scene.get_bounds(primary)
                {
                    for corner in Corner::ALL {
                        if corner.position(&bounds).distance(p) <= handle_tol {
                            return match corner {
                                Corner::TopLeft | Corner::BottomRight => CursorStyle::ResizeNwse,
                                Corner::TopRight | Corner::BottomLeft => CursorStyle::ResizeNesw,
                            };
                        }
                    }
                }
                if let Some(points) = scene.path_points(primary)
                    && points.iter().any(|v| v.distance(p) <= handle_tol)
                {
                    return CursorStyle::Pointer;
                }
            }
            if scene.hit_test(p, 0.0).is_some() {
                return CursorStyle::Move;
            }
            return CursorStyle::Default;
        }
        CursorStyle::Crosshair
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

/// Snap exclusion set for a drag: the dragged ids plus any block frame that
/// contains one of them (the frame follows its members, so it must never
/// attract them).
fn snap_exclusions(scene: &dyn SceneOps, ids: &[ObjectId]) -> Vec<ObjectId> {
    let mut out: Vec<ObjectId> = ids.to_vec();
    for id in ids {
        if let Some(block) = scene.member_of_block(*id)
            && !out.contains(&block)
        {
            out.push(block);
        }
    }
    out
}

fn apply_mutation(scene: &mut dyn SceneOps, mutation: PendingMutation) {
    match mutation {
        PendingMutation::Moves(batch) => {
            if batch.len() == 1 {
                let (id, pos) = batch[0];
                scene.move_object(id, pos);
            } else {
                scene.move_objects(&batch);
            }
        }
        PendingMutation::PathPoints(id, points) => scene.set_path_points(id, points),
        PendingMutation::Resize(id, bounds) => scene.resize_object(id, bounds),
    }
}
