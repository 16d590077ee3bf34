//! Typed commands flowing out of the engine.
//!
//! The engine never talks to collaborators through a string-keyed event bus.
//! Everything it wants from the outside world — a history commit, a
//! library-add, an upload prompt — is a variant of `EngineEffect`, drained by
//! the host after each input event.

use grip_core::{ObjectId, Point};

/// History commit labels. One commit per finished gesture, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitLabel {
    MoveImage,
    ResizeImage,
    CloneImage,
    ClonePaths,
    MovePath,
    EditPath,
    MoveItems,
    DeleteItems,
    DrawShape,
}

impl CommitLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitLabel::MoveImage => "move-image",
            CommitLabel::ResizeImage => "resize-image",
            CommitLabel::CloneImage => "clone-image",
            CommitLabel::ClonePaths => "clone-paths",
            CommitLabel::MovePath => "move-path",
            CommitLabel::EditPath => "edit-path",
            CommitLabel::MoveItems => "move-items",
            CommitLabel::DeleteItems => "delete-items",
            CommitLabel::DrawShape => "draw-shape",
        }
    }
}

/// What kind of item lands in the personal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryItemKind {
    Path,
    Image,
    Model3d,
}

/// Payload of a library-add: a URL for placed assets, vertex data for paths.
#[derive(Debug, Clone, PartialEq)]
pub enum LibrarySource {
    Url(String),
    PathPoints(Vec<Point>),
}

/// A command emitted by the engine for one of its collaborators.
///
/// `Commit` is fire-and-forget: a host that fails to persist it loses an
/// undo entry, never scene state.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEffect {
    /// Ask the history/autosave collaborator to record the finished gesture.
    Commit(CommitLabel),

    /// Add a dropped object to the personal library panel.
    AddToLibrary {
        kind: LibraryItemKind,
        source: LibrarySource,
        width: f32,
        height: f32,
    },

    /// The user clicked the upload hotspot of a placeholder.
    UploadRequested(ObjectId),

    /// The clone preview entered/left the library drop zone.
    LibraryHover(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(CommitLabel::MoveImage.as_str(), "move-image");
        assert_eq!(CommitLabel::ClonePaths.as_str(), "clone-paths");
        assert_eq!(CommitLabel::ResizeImage.as_str(), "resize-image");
    }
}
