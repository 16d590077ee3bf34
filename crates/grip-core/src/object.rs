//! Scene object model.
//!
//! Every object is a tagged variant — structural facts like "this is a group
//! block" or "this is a 3D placeholder" live in the type, never in a
//! free-form metadata bag.

use crate::geom::{Bounds, Point};
use crate::id::ObjectId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The object kinds the interaction engine manipulates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Vector path with draggable vertices.
    Path { points: Vec<Point>, closed: bool },

    /// Placed raster image.
    Image {
        src: String,
        natural_width: f32,
        natural_height: f32,
    },

    /// 3D-model placeholder. Interacts like an image, plus an upload
    /// hotspot affordance while `src` is empty.
    Model3d { src: String },

    /// A group block: a derived visual frame over image/model members.
    /// Its bounds are a projection of member bounds — never written directly.
    Block {
        members: SmallVec<[ObjectId; 4]>,
        title: String,
    },
}

/// A single object in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Axis-aligned bounds in scene coordinates. For `Block` this is derived
    /// from members by the scene store.
    pub bounds: Bounds,
    pub visible: bool,
    pub locked: bool,
    /// Weak reference into the external layer tree, if any.
    pub layer: Option<ObjectId>,
}

impl SceneObject {
    pub fn new(id: ObjectId, kind: ObjectKind, bounds: Bounds) -> Self {
        Self {
            id,
            kind,
            bounds,
            visible: true,
            locked: false,
            layer: None,
        }
    }

    /// A path object with bounds computed from its points.
    pub fn path(id: ObjectId, points: Vec<Point>, closed: bool) -> Self {
        let bounds = path_bounds(&points);
        Self::new(id, ObjectKind::Path { points, closed }, bounds)
    }

    pub fn is_path(&self) -> bool {
        matches!(self.kind, ObjectKind::Path { .. })
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, ObjectKind::Block { .. })
    }

    /// Images and 3D placeholders can be members of a group block.
    pub fn is_block_member_kind(&self) -> bool {
        matches!(self.kind, ObjectKind::Image { .. } | ObjectKind::Model3d { .. })
    }
}

/// Bounds of a point list. Empty input yields a zero box at the origin,
/// which is fine for a path that has no vertices yet.
pub fn path_bounds(points: &[Point]) -> Bounds {
    let Some(first) = points.first() else {
        return Bounds::default();
    };
    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_bounds_from_points() {
        let pts = vec![
            Point::new(10.0, 20.0),
            Point::new(40.0, 5.0),
            Point::new(25.0, 60.0),
        ];
        let b = path_bounds(&pts);
        assert_eq!(b, Bounds::new(10.0, 5.0, 30.0, 55.0));
    }

    #[test]
    fn block_member_kinds() {
        let img = SceneObject::new(
            ObjectId::intern("i1"),
            ObjectKind::Image {
                src: "a.png".into(),
                natural_width: 100.0,
                natural_height: 50.0,
            },
            Bounds::new(0.0, 0.0, 100.0, 50.0),
        );
        assert!(img.is_block_member_kind());

        let path = SceneObject::path(ObjectId::intern("p1"), vec![], false);
        assert!(!path.is_block_member_kind());
        assert!(path.is_path());
    }
}
