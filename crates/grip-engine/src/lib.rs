//! The direct-manipulation interaction engine of the Grip canvas editor.
//!
//! Turns a stream of low-level pointer/keyboard events into coherent,
//! committable edits of a mutable 2D scene. The controller resolves which of
//! many mutually exclusive gestures a pointer-down starts (resize handle,
//! path handle, path drag, object drag, marquee, space-pan, drawing), then
//! delegates to exactly one sub-machine until pointer-up, which yields at
//! most one history commit.

pub mod controller;
pub mod effects;
pub mod gesture;
pub mod group_drag;
pub mod input;
pub mod object_drag;
pub mod path_edit;
pub mod scheduler;
pub mod selection;
pub mod shortcuts;
pub mod snap;

pub use controller::{Controller, CursorStyle, DrawDelegate, NullDraw, ToolMode};
pub use effects::{CommitLabel, EngineEffect, LibraryItemKind, LibrarySource};
pub use gesture::{ClonePreview, DragKind, DragSession, EngineConfig, GestureContext};
pub use input::Modifiers;
pub use scheduler::{FrameScheduler, PendingMutation};
pub use selection::{SelectFilter, Selection};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use snap::{AlignmentDetector, AlignmentGuide, Axis, GuideKind, SnapResult};
