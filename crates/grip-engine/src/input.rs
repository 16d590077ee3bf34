//! Normalized input state.
//!
//! The browser shell forwards raw pointer/keyboard events; the engine only
//! sees scene-space positions plus this modifier snapshot.

/// Modifier keys sampled at event time.
///
/// `alt` drives clone-drag, `shift` drives multi-select toggle and free
/// (aspect-unlocked) resize, `space` drives canvas panning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub space: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
        space: false,
    };

    /// Platform-neutral "command": ctrl on Linux/Windows, meta on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}
