//! The scene store: a containment graph of scene objects.
//!
//! The interaction engine consumes this through the `SceneOps` trait — it
//! never owns objects, only ids. Root children are loose objects and group
//! blocks; block children are their member images/models.
//!
//! Block invariants enforced here (not by the engine):
//! - a block's `members` list always matches its graph children;
//! - block bounds are recomputed from members after every member mutation;
//! - a block whose last member is deleted is deleted too.

use crate::geom::{Bounds, Point, union_bounds};
use crate::id::ObjectId;
use crate::object::{ObjectKind, SceneObject, path_bounds};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::HashMap;

/// Padding of a block frame around the union of its member bounds.
pub const BLOCK_PADDING: f32 = 12.0;

/// Validity floor for object dimensions. UX-level minimums are the
/// engine's concern; this only keeps the store free of degenerate boxes.
const MIN_DIMENSION: f32 = 1.0;

/// The scene-graph / rendering collaborator as the engine sees it.
///
/// Implementations are single-writer: during a gesture only the owning
/// sub-machine calls the mutating operations.
pub trait SceneOps {
    fn exists(&self, id: ObjectId) -> bool;
    fn get(&self, id: ObjectId) -> Option<&SceneObject>;
    fn get_bounds(&self, id: ObjectId) -> Option<Bounds>;

    /// Topmost visible object at `p`, with the hit box inflated by
    /// `tolerance` on every side.
    fn hit_test(&self, p: Point, tolerance: f32) -> Option<ObjectId>;

    /// All visible objects intersecting `rect` (marquee selection).
    fn objects_in_rect(&self, rect: Bounds) -> Vec<ObjectId>;

    /// Visible objects in z-order (back to front). Blocks are listed along
    /// with their members.
    fn list_visible(&self) -> Vec<ObjectId>;

    /// Set the object's origin. No-op for locked, missing, or block objects.
    fn move_object(&mut self, id: ObjectId, pos: Point);

    /// Batched variant of `move_object`; block frames refresh once at the end.
    fn move_objects(&mut self, batch: &[(ObjectId, Point)]);

    /// Replace the object's bounds. Dimensions are clamped to a validity
    /// floor; non-finite input is rejected.
    fn resize_object(&mut self, id: ObjectId, bounds: Bounds);

    /// Duplicate an object in place as a loose root child. Blocks are not
    /// cloneable; returns `None` for them and for missing ids.
    fn clone_object(&mut self, id: ObjectId) -> Option<ObjectId>;

    /// Remove an object. Idempotent — deleting a missing id is a no-op.
    fn delete_object(&mut self, id: ObjectId);

    fn path_points(&self, id: ObjectId) -> Option<Vec<Point>>;
    fn set_path_points(&mut self, id: ObjectId, points: Vec<Point>);

    fn block_members(&self, id: ObjectId) -> Vec<ObjectId>;

    /// The block this object is a member of, if any.
    fn member_of_block(&self, id: ObjectId) -> Option<ObjectId>;

    /// Add a new loose object. Returns its id.
    fn insert_object(&mut self, object: SceneObject) -> ObjectId;
}

/// Internal graph node: the root anchor or a real object.
#[derive(Debug, Clone)]
enum Node {
    Root,
    Object(SceneObject),
}

impl Node {
    fn object(&self) -> Option<&SceneObject> {
        match self {
            Node::Root => None,
            Node::Object(o) => Some(o),
        }
    }

    fn object_mut(&mut self) -> Option<&mut SceneObject> {
        match self {
            Node::Root => None,
            Node::Object(o) => Some(o),
        }
    }
}

/// Concrete scene store backing the wasm bridge and the test suites.
#[derive(Debug, Clone)]
pub struct Scene {
    graph: StableDiGraph<Node, ()>,
    root: NodeIndex,
    id_index: HashMap<ObjectId, NodeIndex>,
}

impl Scene {
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(Node::Root);
        Self {
            graph,
            root,
            id_index: HashMap::new(),
        }
    }

    fn index_of(&self, id: ObjectId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Children in deterministic document order.
    fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    fn add_child(&mut self, parent: NodeIndex, object: SceneObject) -> NodeIndex {
        let id = object.id;
        let idx = self.graph.add_node(Node::Object(object));
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        idx
    }

    /// Add a group block over existing image/model members.
    /// Members that are not block-member kinds are skipped.
    pub fn add_block(&mut self, members: &[ObjectId], title: &str) -> Option<ObjectId> {
        let member_ids: Vec<ObjectId> = members
            .iter()
            .copied()
            .filter(|id| self.get(*id).is_some_and(|o| o.is_block_member_kind()))
            .collect();
        if member_ids.is_empty() {
            return None;
        }

        let block_id = ObjectId::with_prefix("block");
        let block = SceneObject::new(
            block_id,
            ObjectKind::Block {
                members: member_ids.iter().copied().collect(),
                title: title.to_string(),
            },
            Bounds::default(),
        );
        let block_idx = self.add_child(self.root, block);

        for id in &member_ids {
            if let Some(idx) = self.index_of(*id) {
                self.reparent(idx, block_idx);
            }
        }
        self.refresh_block(block_id);
        Some(block_id)
    }

    fn reparent(&mut self, child: NodeIndex, new_parent: NodeIndex) {
        if let Some(old_parent) = self.parent(child)
            && let Some(edge) = self.graph.find_edge(old_parent, child)
        {
            self.graph.remove_edge(edge);
        }
        self.graph.add_edge(new_parent, child, ());
    }

    /// Recompute a block's derived frame from its members.
    fn refresh_block(&mut self, block_id: ObjectId) {
        let Some(block_idx) = self.index_of(block_id) else {
            return;
        };
        let member_bounds: Vec<Bounds> = self
            .children(block_idx)
            .iter()
            .filter_map(|idx| self.graph[*idx].object().map(|o| o.bounds))
            .collect();
        if let Some(u) = union_bounds(&member_bounds)
            && let Some(block) = self.graph[block_idx].object_mut()
        {
            block.bounds = Bounds::new(
                u.x - BLOCK_PADDING,
                u.y - BLOCK_PADDING,
                u.width + 2.0 * BLOCK_PADDING,
                u.height + 2.0 * BLOCK_PADDING,
            );
        }
    }

    /// Refresh the frame of the block containing `id`, if any.
    fn refresh_block_of(&mut self, id: ObjectId) {
        if let Some(block_id) = self.member_of_block(id) {
            self.refresh_block(block_id);
        }
    }

    fn set_origin(&mut self, id: ObjectId, pos: Point) {
        let Some(idx) = self.index_of(id) else {
            log::debug!("move of missing object {id}");
            return;
        };
        let Some(object) = self.graph[idx].object_mut() else {
            return;
        };
        if object.locked || object.is_block() {
            return;
        }
        let dx = pos.x - object.bounds.x;
        let dy = pos.y - object.bounds.y;
        object.bounds.x = pos.x;
        object.bounds.y = pos.y;
        if let ObjectKind::Path { points, .. } = &mut object.kind {
            for p in points.iter_mut() {
                p.x += dx;
                p.y += dy;
            }
        }
    }

    fn hit_test_node(&self, idx: NodeIndex, p: Point, tolerance: f32) -> Option<ObjectId> {
        // Check children in reverse (last painted = topmost)
        for child in self.children(idx).iter().rev() {
            if let Some(hit) = self.hit_test_node(*child, p, tolerance) {
                return Some(hit);
            }
        }

        let object = self.graph[idx].object()?;
        if object.visible && object.bounds.contains_with_tolerance(p, tolerance) {
            return Some(object.id);
        }
        None
    }

    fn collect_visible(&self, idx: NodeIndex, out: &mut Vec<ObjectId>) {
        if let Some(object) = self.graph[idx].object() {
            if !object.visible {
                return;
            }
            out.push(object.id);
        }
        for child in self.children(idx) {
            self.collect_visible(child, out);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneOps for Scene {
    fn exists(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.index_of(id).and_then(|idx| self.graph[idx].object())
    }

    fn get_bounds(&self, id: ObjectId) -> Option<Bounds> {
        self.get(id).map(|o| o.bounds)
    }

    fn hit_test(&self, p: Point, tolerance: f32) -> Option<ObjectId> {
        self.hit_test_node(self.root, p, tolerance)
    }

    fn objects_in_rect(&self, rect: Bounds) -> Vec<ObjectId> {
        let mut all = Vec::new();
        self.collect_visible(self.root, &mut all);
        all.into_iter()
            .filter(|id| {
                self.get_bounds(*id)
                    .is_some_and(|b| b.intersects(&rect))
            })
            .collect()
    }

    fn list_visible(&self) -> Vec<ObjectId> {
        let mut out = Vec::new();
        self.collect_visible(self.root, &mut out);
        out
    }

    fn move_object(&mut self, id: ObjectId, pos: Point) {
        self.set_origin(id, pos);
        self.refresh_block_of(id);
    }

    fn move_objects(&mut self, batch: &[(ObjectId, Point)]) {
        for (id, pos) in batch {
            self.set_origin(*id, *pos);
        }
        // One refresh per affected block, after the whole batch
        let mut refreshed: Vec<ObjectId> = Vec::new();
        for (id, _) in batch {
            if let Some(block_id) = self.member_of_block(*id)
                && !refreshed.contains(&block_id)
            {
                self.refresh_block(block_id);
                refreshed.push(block_id);
            }
        }
    }

    fn resize_object(&mut self, id: ObjectId, bounds: Bounds) {
        if !bounds.x.is_finite()
            || !bounds.y.is_finite()
            || !bounds.width.is_finite()
            || !bounds.height.is_finite()
        {
            log::debug!("rejecting non-finite resize of {id}");
            return;
        }
        let Some(idx) = self.index_of(id) else {
            return;
        };
        let Some(object) = self.graph[idx].object_mut() else {
            return;
        };
        if object.locked || object.is_block() {
            return;
        }
        let old = object.bounds;
        let new = Bounds::new(
            bounds.x,
            bounds.y,
            bounds.width.max(MIN_DIMENSION),
            bounds.height.max(MIN_DIMENSION),
        );
        object.bounds = new;
        // Paths scale their points into the new box
        if let ObjectKind::Path { points, .. } = &mut object.kind
            && old.width > 0.0
            && old.height > 0.0
        {
            let sx = new.width / old.width;
            let sy = new.height / old.height;
            for p in points.iter_mut() {
                p.x = new.x + (p.x - old.x) * sx;
                p.y = new.y + (p.y - old.y) * sy;
            }
        }
        self.refresh_block_of(id);
    }

    fn clone_object(&mut self, id: ObjectId) -> Option<ObjectId> {
        let original = self.get(id)?;
        if original.is_block() {
            return None;
        }
        let prefix = match original.kind {
            ObjectKind::Path { .. } => "path",
            ObjectKind::Image { .. } => "image",
            ObjectKind::Model3d { .. } => "model",
            ObjectKind::Block { .. } => unreachable!(),
        };
        let mut cloned = original.clone();
        cloned.id = ObjectId::with_prefix(prefix);
        let new_id = cloned.id;
        self.add_child(self.root, cloned);
        Some(new_id)
    }

    fn delete_object(&mut self, id: ObjectId) {
        let Some(idx) = self.index_of(id) else {
            return; // idempotent
        };

        if self.graph[idx].object().is_some_and(|o| o.is_block()) {
            // Members outlive their frame: reparent to root first
            for child in self.children(idx) {
                self.reparent(child, self.root);
            }
            self.graph.remove_node(idx);
            self.id_index.remove(&id);
            return;
        }

        let parent_block = self.member_of_block(id);
        self.graph.remove_node(idx);
        self.id_index.remove(&id);

        if let Some(block_id) = parent_block
            && let Some(block_idx) = self.index_of(block_id)
        {
            let remaining = self.children(block_idx);
            if let Some(ObjectKind::Block { members, .. }) =
                self.graph[block_idx].object_mut().map(|o| &mut o.kind)
            {
                members.retain(|m| *m != id);
            }
            if remaining.is_empty() {
                // Last member gone — the frame goes with it
                self.graph.remove_node(block_idx);
                self.id_index.remove(&block_id);
            } else {
                self.refresh_block(block_id);
            }
        }
    }

    fn path_points(&self, id: ObjectId) -> Option<Vec<Point>> {
        match &self.get(id)?.kind {
            ObjectKind::Path { points, .. } => Some(points.clone()),
            _ => None,
        }
    }

    fn set_path_points(&mut self, id: ObjectId, new_points: Vec<Point>) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        let Some(object) = self.graph[idx].object_mut() else {
            return;
        };
        if object.locked {
            return;
        }
        if let ObjectKind::Path { points, .. } = &mut object.kind {
            *points = new_points;
            object.bounds = path_bounds(points);
        }
    }

    fn block_members(&self, id: ObjectId) -> Vec<ObjectId> {
        match self.get(id).map(|o| &o.kind) {
            Some(ObjectKind::Block { members, .. }) => members.iter().copied().collect(),
            _ => Vec::new(),
        }
    }

    fn member_of_block(&self, id: ObjectId) -> Option<ObjectId> {
        let idx = self.index_of(id)?;
        let parent = self.parent(idx)?;
        let parent_obj = self.graph[parent].object()?;
        parent_obj.is_block().then_some(parent_obj.id)
    }

    fn insert_object(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id;
        self.add_child(self.root, object);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn hit_test_topmost_wins() {
        let mut scene = Scene::new();
        let a = scene.insert_object(image("under", 0.0, 0.0, 100.0, 100.0));
        let b = scene.insert_object(image("over", 50.0, 50.0, 100.0, 100.0));

        // Overlap region: the later insert is painted on top
        assert_eq!(scene.hit_test(Point::new(75.0, 75.0), 0.0), Some(b));
        // Only the lower object covers (10, 10)
        assert_eq!(scene.hit_test(Point::new(10.0, 10.0), 0.0), Some(a));
        assert_eq!(scene.hit_test(Point::new(500.0, 500.0), 0.0), None);
    }

    #[test]
    fn block_bounds_derive_from_members() {
        let mut scene = Scene::new();
        let a = scene.insert_object(image("m_a", 0.0, 0.0, 40.0, 40.0));
        let b = scene.insert_object(image("m_b", 100.0, 0.0, 40.0, 40.0));
        let block = scene.add_block(&[a, b], "hero pair").unwrap();

        let fb = scene.get_bounds(block).unwrap();
        assert_eq!(fb.x, -BLOCK_PADDING);
        assert_eq!(fb.width, 140.0 + 2.0 * BLOCK_PADDING);

        // Moving a member drags the frame along
        scene.move_object(a, Point::new(-50.0, 0.0));
        let fb = scene.get_bounds(block).unwrap();
        assert_eq!(fb.x, -50.0 - BLOCK_PADDING);
    }

    #[test]
    fn deleting_last_member_deletes_block() {
        let mut scene = Scene::new();
        let a = scene.insert_object(image("solo", 0.0, 0.0, 40.0, 40.0));
        let block = scene.add_block(&[a], "one").unwrap();

        scene.delete_object(a);
        assert!(!scene.exists(a));
        assert!(!scene.exists(block));

        // Deleting again is a no-op
        scene.delete_object(a);
    }

    #[test]
    fn deleting_block_keeps_members() {
        let mut scene = Scene::new();
        let a = scene.insert_object(image("kept_a", 0.0, 0.0, 40.0, 40.0));
        let b = scene.insert_object(image("kept_b", 60.0, 0.0, 40.0, 40.0));
        let block = scene.add_block(&[a, b], "pair").unwrap();

        scene.delete_object(block);
        assert!(!scene.exists(block));
        assert!(scene.exists(a));
        assert!(scene.exists(b));
        assert_eq!(scene.member_of_block(a), None);
    }

    #[test]
    fn locked_objects_ignore_moves() {
        let mut scene = Scene::new();
        let mut obj = image("pinned", 10.0, 10.0, 40.0, 40.0);
        obj.locked = true;
        let id = scene.insert_object(obj);

        scene.move_object(id, Point::new(500.0, 500.0));
        assert_eq!(
            scene.get_bounds(id).unwrap().origin(),
            Point::new(10.0, 10.0)
        );
    }

    #[test]
    fn moving_a_path_translates_its_points() {
        let mut scene = Scene::new();
        let pts = vec![Point::new(0.0, 0.0), Point::new(30.0, 40.0)];
        let id = scene.insert_object(SceneObject::path(ObjectId::intern("seg"), pts, false));

        scene.move_object(id, Point::new(10.0, 10.0));
        let moved = scene.path_points(id).unwrap();
        assert_eq!(moved[0], Point::new(10.0, 10.0));
        assert_eq!(moved[1], Point::new(40.0, 50.0));
    }

    #[test]
    fn clone_lands_beside_original() {
        let mut scene = Scene::new();
        let id = scene.insert_object(image("orig", 5.0, 5.0, 40.0, 40.0));
        let copy = scene.clone_object(id).unwrap();
        assert_ne!(copy, id);
        assert_eq!(scene.get_bounds(copy), scene.get_bounds(id));
    }

    #[test]
    fn resize_clamps_degenerate_boxes() {
        let mut scene = Scene::new();
        let id = scene.insert_object(image("tiny", 0.0, 0.0, 40.0, 40.0));
        scene.resize_object(id, Bounds::new(0.0, 0.0, 0.0, -5.0));
        let b = scene.get_bounds(id).unwrap();
        assert!(b.width >= 1.0);
        assert!(b.height >= 1.0);

        scene.resize_object(id, Bounds::new(f32::NAN, 0.0, 10.0, 10.0));
        assert!(scene.get_bounds(id).unwrap().x.is_finite());
    }

    #[test]
    fn batch_move_refreshes_block_once_with_final_positions() {
        let mut scene = Scene::new();
        let a = scene.insert_object(image("pair_a", 0.0, 0.0, 10.0, 10.0));
        let b = scene.insert_object(image("pair_b", 10.0, 10.0, 10.0, 10.0));
        let block = scene.add_block(&[a, b], "pair").unwrap();

        scene.move_objects(&[(a, Point::new(5.0, 5.0)), (b, Point::new(15.0, 15.0))]);
        assert_eq!(scene.get_bounds(a).unwrap().origin(), Point::new(5.0, 5.0));
        assert_eq!(
            scene.get_bounds(b).unwrap().origin(),
            Point::new(15.0, 15.0)
        );
        let fb = scene.get_bounds(block).unwrap();
        assert_eq!(fb.x, 5.0 - BLOCK_PADDING);
        assert_eq!(fb.y, 5.0 - BLOCK_PADDING);
    }
}
