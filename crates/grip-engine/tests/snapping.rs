//! Alignment snapping driven through the controller: guides appear while
//! dragging near a sibling, the corrective delta lands in the scene, and
//! everything clears when the gesture ends.

use grip_core::{Bounds, ObjectId, ObjectKind, Point, Scene, SceneObject, SceneOps};
use grip_engine::{Axis, Controller, Modifiers};
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
fn drag_snaps_to_sibling_edge_and_shows_a_guide() {
    let mut scene = Scene::new();
    let moving = scene.insert_object(image("sn_moving", 0.0, 300.0, 50.0, 50.0));
    scene.insert_object(image("sn_anchor", 104.0, 300.0, 50.0, 50.0));

    let mut ctl = Controller::new();
    ctl.pointer_down(&mut scene, Point::new(25.0, 325.0), Modifiers::NONE);
    // Drag until the moving right edge sits 4 units from the anchor's left
    ctl.pointer_move(&mut scene, Point::new(75.0, 325.0), Modifiers::NONE);

    // Guides are live during the drag
    assert!(ctl
        .guides()
        .iter()
        .any(|g| g.axis == Axis::X && (g.position - 104.0).abs() < 1e-3));

    ctl.pointer_up(&mut scene, Point::new(75.0, 325.0), Modifiers::NONE);

    // 50 raw + 4 snap: the right edge lands exactly on the sibling's left
    let b = scene.get_bounds(moving).unwrap();
    assert_eq!(b.x + b.width, 104.0);

    // Guides never outlive the gesture
    assert!(ctl.guides().is_empty());
}

#[test]
fn group_drag_snaps_union_and_keeps_members_rigid() {
    let mut scene = Scene::new();
    let a = scene.insert_object(image("gu_a", 0.0, 0.0, 20.0, 20.0));
    let b = scene.insert_object(image("gu_b", 30.0, 0.0, 20.0, 20.0));
    let block = scene.add_block(&[a, b], "pair").unwrap();
    // Anchor to the right: its left edge at x = 150
    scene.insert_object(image("gu_anchor", 150.0, 0.0, 40.0, 40.0));

    let mut ctl = Controller::new();
    ctl.selection.set_primary(block);

    // Union spans x 0..50; drag right by 96 so the union's right edge
    // (146) is 4 away from the anchor's left edge (150)
    ctl.pointer_down(&mut scene, Point::new(10.0, 10.0), Modifiers::NONE);
    ctl.pointer_move(&mut scene, Point::new(106.0, 10.0), Modifiers::NONE);
    ctl.pointer_up(&mut scene, Point::new(106.0, 10.0), Modifiers::NONE);

    // One corrective delta applied uniformly: members stayed rigid
    let ba = scene.get_bounds(a).unwrap();
    let bb = scene.get_bounds(b).unwrap();
    assert_eq!(ba.origin(), Point::new(100.0, 0.0));
    assert_eq!(bb.origin(), Point::new(130.0, 0.0));
    assert_eq!(bb.x - ba.x, 30.0);
}

#[test]
fn snapping_ignores_the_dragged_objects_own_block() {
    let mut scene = Scene::new();
    let a = scene.insert_object(image("ob_a", 0.0, 0.0, 20.0, 20.0));
    let b = scene.insert_object(image("ob_b", 30.0, 0.0, 20.0, 20.0));
    let block = scene.add_block(&[a, b], "pair").unwrap();

    let mut ctl = Controller::new();
    ctl.selection.set_primary(block);

    // No other objects: nothing to snap against, including the block frame
    ctl.pointer_down(&mut scene, Point::new(10.0, 10.0), Modifiers::NONE);
    ctl.pointer_move(&mut scene, Point::new(17.0, 10.0), Modifiers::NONE);
    ctl.pointer_up(&mut scene, Point::new(17.0, 10.0), Modifiers::NONE);

    assert_eq!(scene.get_bounds(a).unwrap().origin(), Point::new(7.0, 0.0));
    assert!(ctl.guides().is_empty());
    assert!(scene.exists(block));
}

#[test]
fn far_objects_do_not_deflect_the_drag() {
    let mut scene = Scene::new();
    let moving = scene.insert_object(image("fr_moving", 0.0, 0.0, 50.0, 50.0));
    scene.insert_object(image("fr_far", 400.0, 400.0, 50.0, 50.0));

    let mut ctl = Controller::new();
    ctl.pointer_down(&mut scene, Point::new(25.0, 25.0), Modifiers::NONE);
    ctl.pointer_move(&mut scene, Point::new(45.0, 30.0), Modifiers::NONE);
    ctl.pointer_up(&mut scene, Point::new(45.0, 30.0), Modifiers::NONE);

    // Exactly the raw delta: no snap, no guides
    assert_eq!(
        scene.get_bounds(moving).unwrap().origin(),
        Point::new(20.0, 5.0)
    );
}
