pub mod geom;
pub mod id;
pub mod object;
pub mod scene;

pub use geom::{Bounds, CanvasTransform, Point, union_bounds};
pub use id::ObjectId;
pub use object::{ObjectKind, SceneObject, path_bounds};
pub use scene::{BLOCK_PADDING, Scene, SceneOps};
