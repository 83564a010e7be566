mod common;

use nalgebra::{Point3, Vector3};
use orbview_core::{
    mesh_builder, GpuError, KeyAction, KeyMap, LoopControl, Material, Menu, Mesh, RenderMode,
    Selection, StatusSnapshot, Transform, Vertex, ViewId, ViewRect, Viewer, ViewerConfig,
    ViewerError,
};

use common::RecordingGpu;

type TestViewer = Viewer<RecordingGpu, StatusSnapshot>;

fn viewer(width: u32, height: u32) -> TestViewer {
    Viewer::new(
        RecordingGpu::default(),
        StatusSnapshot::default(),
        ViewerConfig::default(),
        Menu::builtin(),
        width,
        height,
    )
    .unwrap()
}

fn eye_of(view: &nalgebra::Matrix4<f32>) -> Point3<f32> {
    view.try_inverse().unwrap().transform_point(&Point3::origin())
}

#[test]
fn startup_uploads_default_shape_before_first_frame() {
    let mut viewer = viewer(800, 600);
    assert_eq!(viewer.active_model().mesh, Mesh::cube(2.0).centered());
    assert!(!viewer.status().busy);

    assert_eq!(viewer.tick(16.0), LoopControl::Continue);
    let draws = &viewer.gpu().draws;
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].viewport, ViewRect::new(0, 0, 800, 600));
    assert_eq!(draws[0].scissor, Some(ViewRect::new(0, 0, 800, 600)));
    assert_eq!(viewer.gpu().clears, 1);
    assert!(!viewer.gpu().scissor_enabled());
}

#[test]
fn stereo_draws_left_then_right_with_offset_eyes() {
    let mut viewer = viewer(800, 600);
    for _ in 0..5 {
        viewer.key_pressed("]");
    }
    assert_eq!(viewer.select("Stereo").unwrap(), Selection::ModeChanged(RenderMode::Stereo));
    viewer.tick(16.0);

    let draws = &viewer.gpu().draws;
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].viewport, ViewRect::new(0, 0, 400, 600));
    assert_eq!(draws[1].viewport, ViewRect::new(400, 0, 400, 600));

    let left = eye_of(&draws[0].uniforms.view);
    let right = eye_of(&draws[1].uniforms.view);
    assert!((left - Point3::new(-0.05, 0.0, 2.0)).norm() < 1e-4);
    assert!((right - Point3::new(0.05, 0.0, 2.0)).norm() < 1e-4);

    for draw in draws {
        // Up vector survives as +Y in view space
        let up = draw.uniforms.view.transform_vector(&Vector3::y());
        assert!(up.y > 0.99);
    }
    assert_eq!(draws[0].uniforms.projection, viewer.layout().projection(ViewId::Left).matrix);
    assert_eq!(draws[1].uniforms.projection, viewer.layout().projection(ViewId::Right).matrix);
}

#[test]
fn leaving_stereo_clears_hud_and_keeps_layout() {
    let mut viewer = viewer(800, 600);
    let layout = viewer.layout().clone();

    viewer.select("Stereo").unwrap();
    assert_eq!(viewer.status().hud.as_deref(), Some("eye separation: 0.00"));
    viewer.select("Mono").unwrap();

    assert_eq!(viewer.status().hud, None);
    assert_eq!(viewer.layout(), &layout);
    viewer.tick(0.0);
    assert_eq!(viewer.gpu().draws.len(), 1);
}

#[test]
fn eye_keys_refresh_hud_only_in_stereo() {
    let mut viewer = viewer(800, 600);
    viewer.key_pressed("]");
    assert_eq!(viewer.status().hud, None);

    viewer.set_mode(RenderMode::Stereo);
    viewer.key_pressed("]");
    assert_eq!(viewer.status().hud.as_deref(), Some("eye separation: 0.02"));
}

#[test]
fn frame_model_transform_follows_input() {
    let mut viewer = viewer(800, 600);
    viewer.key_pressed("w");
    viewer.pointer_moved(450.0, 250.0, 800.0, 600.0);
    viewer.tick(0.0);

    let input = viewer.input();
    let expected = Transform::compose_model(&input.viewpoint, &input.mouse);
    assert_eq!(viewer.gpu().draws[0].uniforms.model, expected);
    assert_eq!(viewer.active_model().uniforms.model, nalgebra::Matrix4::identity());
}

#[test]
fn build_swaps_model_and_releases_previous() {
    let mut viewer = viewer(800, 600);
    let old = viewer.active_model().buffers;

    let Selection::Build(ticket) = viewer.select("Tetrahedron").unwrap() else {
        panic!("expected a build");
    };
    assert!(viewer.status().busy);
    assert!(viewer.is_busy());

    assert!(viewer.complete_build(ticket).unwrap());
    assert_eq!(viewer.active_model().mesh, Mesh::tetrahedron(2.0).centered());
    assert!(!viewer.status().busy);
    assert_eq!(viewer.gpu().released, vec![old]);
    assert_eq!(viewer.gpu().live.len(), 1);

    viewer.tick(0.0);
    assert_eq!(viewer.gpu().draws[0].buffers, viewer.active_model().buffers);
}

#[test]
fn failed_build_keeps_model_and_clears_busy() {
    let mut viewer = viewer(800, 600);
    let before = viewer.active_model().mesh.clone();

    let ticket = viewer.request_build(
        "broken",
        mesh_builder(|| Err(ViewerError::MeshBuild("out of turtles".into()))),
    );
    assert!(viewer.status().busy);

    let err = viewer.complete_build(ticket).unwrap_err();
    assert_eq!(err, ViewerError::MeshBuild("out of turtles".into()));
    assert_eq!(viewer.active_model().mesh, before);
    assert!(!viewer.status().busy);
    assert_eq!(viewer.tick(0.0), LoopControl::Continue);
}

#[test]
fn empty_mesh_is_rejected() {
    let mut viewer = viewer(800, 600);
    let ticket = viewer.request_build("nothing", mesh_builder(|| Ok(Mesh::new())));
    assert_eq!(
        viewer.complete_build(ticket).unwrap_err(),
        ViewerError::Gpu(GpuError::EmptyMesh)
    );
    assert!(!viewer.status().busy);
}

#[test]
fn custom_keymap_and_material_reach_the_frame() {
    let material = Material {
        shininess: 8.0,
        ..Material::default()
    };
    let config = ViewerConfig::default().with_material(material);
    let mut viewer = Viewer::new(
        RecordingGpu::default(),
        StatusSnapshot::default(),
        config,
        Menu::builtin(),
        800,
        600,
    )
    .unwrap()
    .with_keymap(KeyMap::default().bind("k", KeyAction::Forward));

    let depth = viewer.input().viewpoint.translation().z;
    viewer.key_pressed("k");
    assert!(viewer.input().viewpoint.translation().z > depth);

    viewer.tick(0.0);
    let draw = viewer.gpu().draws.last().unwrap();
    assert_eq!(draw.uniforms.material, material);
}

#[test]
fn mesh_with_out_of_range_indices_is_rejected() {
    let mut viewer = viewer(800, 600);
    let before = viewer.active_model().mesh.clone();
    let ticket = viewer.request_build(
        "broken",
        mesh_builder(|| {
            let mut mesh = Mesh::new();
            mesh.vertices.push(Vertex::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0));
            mesh.indices = vec![0, 1, 99];
            Ok(mesh)
        }),
    );

    assert!(matches!(
        viewer.complete_build(ticket),
        Err(ViewerError::Gpu(GpuError::InvalidMesh(_)))
    ));
    assert!(!viewer.status().busy);
    assert_eq!(viewer.active_model().mesh, before);
    assert_eq!(viewer.gpu().live.len(), 1);
    assert_eq!(viewer.tick(0.0), LoopControl::Continue);
}

#[test]
fn overlapping_builds_last_finish_wins() {
    let mut viewer = viewer(800, 600);
    let Selection::Build(first) = viewer.select("Octahedron").unwrap() else {
        panic!("expected a build");
    };
    let Selection::Build(second) = viewer.select("Tower").unwrap() else {
        panic!("expected a build");
    };

    viewer.complete_build(second).unwrap();
    assert!(viewer.status().busy);
    viewer.complete_build(first).unwrap();
    assert!(!viewer.status().busy);

    assert_eq!(viewer.active_model().mesh, Mesh::octahedron(2.5).centered());
    assert_eq!(viewer.gpu().live.len(), 1);
}

#[test]
fn cancelled_build_never_runs() {
    let mut viewer = viewer(800, 600);
    let Selection::Build(ticket) = viewer.select("Lattice").unwrap() else {
        panic!("expected a build");
    };
    assert!(viewer.cancel_build(ticket));
    assert!(!viewer.status().busy);
    assert!(!viewer.complete_build(ticket).unwrap());
    assert_eq!(viewer.active_model().mesh, Mesh::cube(2.0).centered());
    assert!(!viewer.cancel_build(ticket));
}

#[test]
fn resize_during_pending_build_is_used_at_draw_time() {
    let mut viewer = viewer(800, 600);
    let Selection::Build(ticket) = viewer.select("Cube").unwrap() else {
        panic!("expected a build");
    };
    viewer.resize(1024, 768);
    viewer.complete_build(ticket).unwrap();
    viewer.tick(0.0);

    let draw = &viewer.gpu().draws[0];
    assert_eq!(draw.viewport, ViewRect::new(0, 0, 1024, 768));
    assert_eq!(draw.uniforms.projection, viewer.layout().projection(ViewId::Normal).matrix);
}

#[test]
fn degenerate_resize_is_clamped() {
    let mut viewer = viewer(800, 600);
    viewer.resize(0, 0);
    assert_eq!(viewer.layout().canvas_size(), (1, 1));
    assert_eq!(viewer.tick(0.0), LoopControl::Continue);
}

#[test]
fn unknown_menu_entry_is_an_error() {
    let mut viewer = viewer(800, 600);
    let input = viewer.input().clone();
    assert_eq!(
        viewer.select("Teapot").unwrap_err(),
        ViewerError::UnknownMenuEntry("Teapot".into())
    );
    assert_eq!(viewer.input(), &input);
    assert!(!viewer.status().busy);
}

#[test]
fn frame_counter_advances() {
    let mut viewer = viewer(320, 240);
    for i in 0..10 {
        viewer.tick(i as f64 * 16.0);
    }
    assert_eq!(viewer.animation().frame_index(), 10);
}
