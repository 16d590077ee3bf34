//! WASM bridge for Grip — exposes the interaction engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and loaded by the editor
//! shell. The shell forwards raw pointer/keyboard events in device
//! coordinates, drives `on_animation_frame` from `requestAnimationFrame`,
//! and drains typed effects (history commits, library adds) after each
//! event.

use grip_core::{Bounds, CanvasTransform, ObjectId, ObjectKind, Point, Scene, SceneObject, SceneOps};
use grip_engine::{
    Controller, EngineEffect, LibrarySource, Modifiers, ShortcutAction, ToolMode,
};
use wasm_bindgen::prelude::*;

/// The main WASM-facing canvas controller.
///
/// Owns the scene store and the interaction engine. All interaction from
/// the shell goes through this struct.
#[wasm_bindgen]
pub struct GripCanvas {
    scene: Scene,
    controller: Controller,
}

#[wasm_bindgen]
impl GripCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            scene: Scene::new(),
            controller: Controller::new(),
        }
    }

    /// Update the device↔scene transform (pan in CSS px, zoom, dpr).
    /// Called by the shell whenever the viewport changes.
    pub fn set_transform(&mut self, pan_x: f32, pan_y: f32, zoom: f32, dpr: f32) {
        self.controller
            .set_transform(CanvasTransform::new(Point::new(pan_x, pan_y), zoom, dpr));
    }

    /// Where the library panel sits, device coordinates.
    pub fn set_library_zone(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.controller
            .set_library_zone(Some(Bounds::new(x, y, width, height)));
    }

    pub fn clear_library_zone(&mut self) {
        self.controller.set_library_zone(None);
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    pub fn set_tool(&mut self, name: &str) {
        self.controller.set_tool(tool_from_name(name));
    }

    pub fn get_tool_name(&self) -> String {
        tool_to_name(self.controller.tool()).to_string()
    }

    // ─── Pointer events ──────────────────────────────────────────────────

    /// Handle pointer down. Returns true if a re-render is needed.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        space: bool,
    ) -> bool {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
            space,
        };
        self.controller
            .pointer_down(&mut self.scene, Point::new(x, y), mods);
        true
    }

    /// Handle pointer move. Returns true if a re-render is needed.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        space: bool,
    ) -> bool {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
            space,
        };
        self.controller
            .pointer_move(&mut self.scene, Point::new(x, y), mods);
        // Hover cursor may change even outside a gesture; repaints are cheap
        true
    }

    /// Handle pointer up. Returns a JSON string:
    /// `{"changed":bool,"commit":"<label>"|null}`
    pub fn handle_pointer_up(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
            space: false,
        };
        self.controller
            .pointer_up(&mut self.scene, Point::new(x, y), mods);

        // Peek for a commit without consuming the queue; the shell drains
        // effects right after this call.
        let commit = self
            .controller
            .peek_commit()
            .map(|label| format!("\"{}\"", label.as_str()))
            .unwrap_or_else(|| "null".to_string());
        format!(r#"{{"changed":true,"commit":{commit}}}"#)
    }

    /// Apply the frame-coalesced mutation, if any. Returns true if the
    /// scene changed. Driven from `requestAnimationFrame`.
    pub fn on_animation_frame(&mut self) -> bool {
        self.controller.on_frame(&mut self.scene);
        true
    }

    /// Window blur / visibility hidden: terminate any gesture safely.
    pub fn cancel(&mut self) {
        self.controller.cancel(&mut self.scene);
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a key down. Returns a JSON string:
    /// `{"action":"<name>","tool":"<name>"}` (action `"none"` if unbound).
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
            space: false,
        };
        let action = self.controller.handle_key(&mut self.scene, key, mods);
        let action_name = action.map(action_to_name).unwrap_or("none");
        let tool_name = tool_to_name(self.controller.tool());
        format!(r#"{{"action":"{action_name}","tool":"{tool_name}"}}"#)
    }

    pub fn handle_key_up(&mut self, key: &str) {
        self.controller.key_up(key);
    }

    // ─── Render-state queries ────────────────────────────────────────────

    /// CSS cursor for the given device position.
    pub fn cursor_style(&self, x: f32, y: f32) -> String {
        self.controller
            .cursor_style(&self.scene, Point::new(x, y))
            .as_css()
            .to_string()
    }

    /// Live "drag-over library" signal for the drop-target highlight.
    pub fn library_hover(&self) -> bool {
        self.controller.library_hover()
    }

    /// Current alignment guides as JSON:
    /// `[{"axis":"x","position":104.0,"kind":"edge"}, ...]`
    pub fn guides_json(&self) -> String {
        let guides: Vec<serde_json::Value> = self
            .controller
            .guides()
            .iter()
            .map(|g| {
                serde_json::json!({
                    "axis": match g.axis {
                        grip_engine::Axis::X => "x",
                        grip_engine::Axis::Y => "y",
                    },
                    "position": g.position,
                    "kind": match g.kind {
                        grip_engine::GuideKind::Edge => "edge",
                        grip_engine::GuideKind::Center => "center",
                    },
                })
            })
            .collect();
        serde_json::Value::Array(guides).to_string()
    }

    /// The clone preview, or `null`:
    /// `{"x":..,"y":..,"width":..,"height":..,"overLibrary":bool}`
    pub fn clone_preview_json(&self) -> String {
        match self.controller.clone_preview() {
            Some(preview) => serde_json::json!({
                "x": preview.bounds.x,
                "y": preview.bounds.y,
                "width": preview.bounds.width,
                "height": preview.bounds.height,
                "overLibrary": preview.over_library,
            })
            .to_string(),
            None => "null".to_string(),
        }
    }

    /// The marquee rectangle while rubber-band selecting, or `null`.
    pub fn marquee_json(&self) -> String {
        match self.controller.marquee_rect() {
            Some(rect) => serde_json::json!({
                "x": rect.x,
                "y": rect.y,
                "width": rect.width,
                "height": rect.height,
            })
            .to_string(),
            None => "null".to_string(),
        }
    }

    /// Drain all queued effects as a JSON array.
    pub fn drain_effects_json(&mut self) -> String {
        let effects: Vec<serde_json::Value> = self
            .controller
            .drain_effects()
            .into_iter()
            .map(effect_to_json)
            .collect();
        serde_json::Value::Array(effects).to_string()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// All selected object ids as a JSON array.
    pub fn get_selected_ids(&self) -> String {
        let ids: Vec<String> = self
            .controller
            .selection
            .ids(&self.scene)
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    /// Select a node by its id (e.g. from the layer tree). Empty string
    /// clears the selection. Returns true if the object was found.
    pub fn select_by_id(&mut self, object_id: &str) -> bool {
        if object_id.is_empty() {
            self.controller.selection.clear();
            return true;
        }
        let id = ObjectId::intern(object_id);
        if self.scene.exists(id) {
            self.controller.selection.set_primary(id);
            true
        } else {
            false
        }
    }

    /// Delete the current selection. Returns true if anything was deleted.
    pub fn delete_selected(&mut self) -> bool {
        self.controller.delete_selected(&mut self.scene)
    }

    // ─── Scene building (called by the shell on asset placement) ─────────

    /// Place an image. Returns its id.
    pub fn add_image(&mut self, src: &str, x: f32, y: f32, width: f32, height: f32) -> String {
        let id = ObjectId::with_prefix("image");
        self.scene.insert_object(SceneObject::new(
            id,
            ObjectKind::Image {
                src: src.to_string(),
                natural_width: width,
                natural_height: height,
            },
            Bounds::new(x, y, width, height),
        ));
        id.as_str().to_string()
    }

    /// Place a 3D-model placeholder. Returns its id.
    pub fn add_model(&mut self, src: &str, x: f32, y: f32, width: f32, height: f32) -> String {
        let id = ObjectId::with_prefix("model");
        self.scene.insert_object(SceneObject::new(
            id,
            ObjectKind::Model3d {
                src: src.to_string(),
            },
            Bounds::new(x, y, width, height),
        ));
        id.as_str().to_string()
    }

    /// Add a path from a JSON array of `[x, y]` pairs. Returns its id, or
    /// an empty string on malformed input.
    pub fn add_path(&mut self, points_json: &str, closed: bool) -> String {
        let pairs: Vec<(f32, f32)> = match serde_json::from_str(points_json) {
            Ok(p) => p,
            Err(_) => return String::new(),
        };
        let points: Vec<Point> = pairs.into_iter().map(|(x, y)| Point::new(x, y)).collect();
        let id = ObjectId::with_prefix("path");
        self.scene
            .insert_object(SceneObject::path(id, points, closed));
        id.as_str().to_string()
    }

    /// Group the currently selected images/models into a block. Returns the
    /// block id, or an empty string when nothing groupable is selected.
    pub fn group_selected(&mut self, title: &str) -> String {
        let ids = self.controller.selection.ids(&self.scene);
        match self.scene.add_block(&ids, title) {
            Some(block) => {
                self.controller.selection.set_primary(block);
                block.as_str().to_string()
            }
            None => String::new(),
        }
    }

    /// Bounds of an object as JSON, or `null` if missing.
    pub fn object_bounds_json(&self, object_id: &str) -> String {
        match self.scene.get_bounds(ObjectId::intern(object_id)) {
            Some(b) => serde_json::json!({
                "x": b.x, "y": b.y, "width": b.width, "height": b.height,
            })
            .to_string(),
            None => "null".to_string(),
        }
    }

    /// Visible object ids in z-order as a JSON array.
    pub fn list_visible(&self) -> String {
        let ids: Vec<String> = self
            .scene
            .list_visible()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for GripCanvas {
    fn default() -> Self {
        Self::new()
    }
}

fn effect_to_json(effect: EngineEffect) -> serde_json::Value {
    match effect {
        EngineEffect::Commit(label) => serde_json::json!({
            "type": "commit",
            "label": label.as_str(),
        }),
        EngineEffect::AddToLibrary {
            kind,
            source,
            width,
            height,
        } => {
            let kind_name = match kind {
                grip_engine::LibraryItemKind::Path => "path",
                grip_engine::LibraryItemKind::Image => "image",
                grip_engine::LibraryItemKind::Model3d => "model3d",
            };
            let source_value = match source {
                LibrarySource::Url(url) => serde_json::json!({ "url": url }),
                LibrarySource::PathPoints(points) => {
                    let pairs: Vec<[f32; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
                    serde_json::json!({ "points": pairs })
                }
            };
            serde_json::json!({
                "type": "addToLibrary",
                "kind": kind_name,
                "source": source_value,
                "width": width,
                "height": height,
            })
        }
        EngineEffect::UploadRequested(id) => serde_json::json!({
            "type": "uploadRequested",
            "id": id.as_str(),
        }),
        EngineEffect::LibraryHover(hovering) => serde_json::json!({
            "type": "libraryHover",
            "hovering": hovering,
        }),
    }
}

fn tool_from_name(name: &str) -> ToolMode {
    match name {
        "select" => ToolMode::Select,
        "marquee" => ToolMode::Marquee,
        "draw-path" => ToolMode::DrawPath,
        "draw-line" => ToolMode::DrawLine,
        "draw-rect" => ToolMode::DrawRect,
        "draw-circle" => ToolMode::DrawCircle,
        "place-image" => ToolMode::PlaceImage,
        "place-3d" => ToolMode::Place3d,
        "text" => ToolMode::Text,
        "quick-upload" => ToolMode::QuickUpload,
        _ => ToolMode::Select,
    }
}

fn tool_to_name(tool: ToolMode) -> &'static str {
    match tool {
        ToolMode::Select => "select",
        ToolMode::Marquee => "marquee",
        ToolMode::DrawPath => "draw-path",
        ToolMode::DrawLine => "draw-line",
        ToolMode::DrawRect => "draw-rect",
        ToolMode::DrawCircle => "draw-circle",
        ToolMode::PlaceImage => "place-image",
        ToolMode::Place3d => "place-3d",
        ToolMode::Text => "text",
        ToolMode::QuickUpload => "quick-upload",
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::ToolSelect => "tool-select",
        ShortcutAction::ToolMarquee => "tool-marquee",
        ShortcutAction::ToolDrawPath => "tool-draw-path",
        ShortcutAction::ToolDrawLine => "tool-draw-line",
        ShortcutAction::ToolDrawRect => "tool-draw-rect",
        ShortcutAction::ToolDrawCircle => "tool-draw-circle",
        ShortcutAction::ToolPlaceImage => "tool-place-image",
        ShortcutAction::ToolPlace3d => "tool-place-3d",
        ShortcutAction::ToolText => "tool-text",
        ShortcutAction::ToolQuickUpload => "tool-quick-upload",
        ShortcutAction::Delete => "delete",
        ShortcutAction::SelectAll => "select-all",
        ShortcutAction::Deselect => "deselect",
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::PanStart => "pan-start",
    }
}

/// Panic messages go to the browser console instead of vanishing.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                web_sys::console::error_1(&info.to_string().into());
            }));
        });
    }
}
