//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the wasm bridge and native tests share one source of truth.
//! Undo/Redo resolve here but execute in the host — history is an external
//! collaborator.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolSelect,
    ToolMarquee,
    ToolDrawPath,
    ToolDrawLine,
    ToolDrawRect,
    ToolDrawCircle,
    ToolPlaceImage,
    ToolPlace3d,
    ToolText,
    ToolQuickUpload,

    // ── Edit ──
    Delete,
    SelectAll,
    Deselect,
    Undo,
    Redo,

    // ── View ──
    PanStart,
}

/// Resolves key events into shortcut actions.
///
/// Platform-aware modifier detection: on macOS `meta` is ⌘, elsewhere
/// `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "v" | "V" => Some(ShortcutAction::ToolSelect),
            "m" | "M" => Some(ShortcutAction::ToolMarquee),
            "p" | "P" => Some(ShortcutAction::ToolDrawPath),
            "l" | "L" => Some(ShortcutAction::ToolDrawLine),
            "r" | "R" => Some(ShortcutAction::ToolDrawRect),
            "o" | "O" => Some(ShortcutAction::ToolDrawCircle),
            "i" | "I" => Some(ShortcutAction::ToolPlaceImage),
            "d" | "D" => Some(ShortcutAction::ToolPlace3d),
            "t" | "T" => Some(ShortcutAction::ToolText),
            "u" | "U" => Some(ShortcutAction::ToolQuickUpload),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            " " => Some(ShortcutAction::PanStart),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_tool_shortcuts() {
        assert_eq!(
            ShortcutMap::resolve("v", false, false, false, false),
            Some(ShortcutAction::ToolSelect)
        );
        assert_eq!(
            ShortcutMap::resolve("p", false, false, false, false),
            Some(ShortcutAction::ToolDrawPath)
        );
        assert_eq!(
            ShortcutMap::resolve("i", false, false, false, false),
            Some(ShortcutAction::ToolPlaceImage)
        );
    }

    #[test]
    fn resolve_undo_redo() {
        // Cmd+Z and Ctrl+Z both undo
        assert_eq!(
            ShortcutMap::resolve("z", false, false, false, true),
            Some(ShortcutAction::Undo)
        );
        assert_eq!(
            ShortcutMap::resolve("z", true, false, false, false),
            Some(ShortcutAction::Undo)
        );
        // Cmd+Shift+Z and Cmd+Y both redo
        assert_eq!(
            ShortcutMap::resolve("z", false, true, false, true),
            Some(ShortcutAction::Redo)
        );
        assert_eq!(
            ShortcutMap::resolve("y", false, false, false, true),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn resolve_delete_and_escape() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::Deselect)
        );
    }

    #[test]
    fn resolve_space_pan() {
        assert_eq!(
            ShortcutMap::resolve(" ", false, false, false, false),
            Some(ShortcutAction::PanStart)
        );
    }

    #[test]
    fn resolve_unknown_key() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("7", false, false, false, false), None);
    }

    #[test]
    fn plain_z_is_not_undo() {
        assert_eq!(ShortcutMap::resolve("z", false, false, false, false), None);
    }
}
