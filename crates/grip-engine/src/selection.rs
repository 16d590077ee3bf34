//! Selection model.
//!
//! Holds weak references into the scene — ids only, pruned against the scene
//! on every read so a deleted object can never linger in the selection.

use grip_core::{ObjectId, ObjectKind, SceneOps};

/// Which object kinds `select_all` picks up.
#[derive(Debug, Clone, Copy)]
pub struct SelectFilter {
    pub paths: bool,
    pub images: bool,
    pub models: bool,
    pub blocks: bool,
}

impl SelectFilter {
    pub const ALL: SelectFilter = SelectFilter {
        paths: true,
        images: true,
        models: true,
        blocks: true,
    };

    fn matches(&self, kind: &ObjectKind) -> bool {
        match kind {
            ObjectKind::Path { .. } => self.paths,
            ObjectKind::Image { .. } => self.images,
            ObjectKind::Model3d { .. } => self.models,
            ObjectKind::Block { .. } => self.blocks,
        }
    }
}

/// Current selection: a primary object plus the multi-selection set.
///
/// Invariant: whenever `multi` is non-empty, `primary` is one of its
/// entries.
#[derive(Debug, Default)]
pub struct Selection {
    primary: Option<ObjectId>,
    multi: Vec<ObjectId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole selection with a single object.
    pub fn set_primary(&mut self, id: ObjectId) {
        self.primary = Some(id);
        self.multi = vec![id];
    }

    /// Add or remove an object from the multi-selection.
    pub fn toggle(&mut self, id: ObjectId) {
        if let Some(pos) = self.multi.iter().position(|m| *m == id) {
            self.multi.remove(pos);
            if self.primary == Some(id) {
                self.primary = self.multi.first().copied();
            }
        } else {
            self.multi.push(id);
            if self.primary.is_none() {
                self.primary = Some(id);
            }
        }
    }

    /// Replace the selection with an explicit id list.
    pub fn set_multi(&mut self, ids: Vec<ObjectId>) {
        self.primary = ids.first().copied();
        self.multi = ids;
    }

    /// Add ids, keeping existing entries (marquee with shift held).
    pub fn extend(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        for id in ids {
            if !self.multi.contains(&id) {
                self.multi.push(id);
            }
        }
        if self.primary.is_none() {
            self.primary = self.multi.first().copied();
        }
    }

    pub fn select_all(&mut self, scene: &dyn SceneOps, filter: SelectFilter) {
        let ids: Vec<ObjectId> = scene
            .list_visible()
            .into_iter()
            .filter(|id| scene.get(*id).is_some_and(|o| filter.matches(&o.kind)))
            .collect();
        self.set_multi(ids);
    }

    pub fn clear(&mut self) {
        self.primary = None;
        self.multi.clear();
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.multi.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.multi.is_empty()
    }

    pub fn len(&self) -> usize {
        self.multi.len()
    }

    /// The primary object, pruned against the scene.
    pub fn primary(&self, scene: &dyn SceneOps) -> Option<ObjectId> {
        self.primary.filter(|id| scene.exists(*id))
    }

    /// All selected ids still present in the scene.
    pub fn ids(&self, scene: &dyn SceneOps) -> Vec<ObjectId> {
        self.multi
            .iter()
            .copied()
            .filter(|id| scene.exists(*id))
            .collect()
    }

    /// Drop ids that no longer exist, restoring the primary invariant.
    pub fn prune(&mut self, scene: &dyn SceneOps) {
        self.multi.retain(|id| scene.exists(*id));
        match self.primary {
            Some(p) if self.multi.contains(&p) => {}
            _ => self.primary = self.multi.first().copied(),
        }
    }
}
