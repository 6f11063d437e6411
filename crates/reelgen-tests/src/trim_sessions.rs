//! Integration tests for drag sessions.
//!
//! Drives `DragController` from pointer-down to commit against an
//! `InMemoryStore` laid out through `TrackLayout`.

use crate::fixtures::{container, press, press_element, store_for, track_with, TestClip};
use reelgen_core::EditorConfig;
use reelgen_timeline::{ClipPlacement, Keyframe, MediaItem, MediaKind, Project, TrackKind};
use reelgen_ui::{
    BoundsUnavailable, ClipElement, DragController, DragPhase, DragTarget, PixelSpan,
    SessionRefused, TrimEdge,
};

const EPS: f64 = 1e-6;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn setup() -> (EditorConfig, DragController) {
    let config = EditorConfig::default();
    let controller = DragController::new(&config);
    (config, controller)
}

// ── Left trim ──────────────────────────────────────────────────

#[test]
fn left_trim_by_half_a_second_commits_exact_values() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(2000.0, 4000.0, 1000.0, 6000.0)]);
    let store = store_for(&project);

    // Clip spans 200..600px; 50px is 500ms.
    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Left),
        200.0,
        container(),
    )
    .unwrap();
    controller.pointer_move(250.0, &store).unwrap();
    let outcome = controller.pointer_up(&store).unwrap().unwrap();

    assert_eq!(outcome.placement, ClipPlacement::new(2500.0, 3500.0, 1500.0));
    assert!(outcome.wrote);

    let keyframe = store.keyframe(ids[0]).unwrap();
    assert_eq!(keyframe.timestamp, 2500.0);
    assert_eq!(keyframe.duration, 3500.0);
    assert_eq!(keyframe.start_offset, 1500.0);
    assert_eq!(store.write_log().len(), 1);
    assert_eq!(store.invalidation_count(project.id), 1);
}

#[test]
fn left_trim_dragged_left_never_reveals_earlier_source() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(2000.0, 4000.0, 1000.0, 6000.0)]);
    let store = store_for(&project);

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Left),
        200.0,
        container(),
    )
    .unwrap();
    controller.pointer_move(50.0, &store).unwrap();
    let outcome = controller.pointer_up(&store).unwrap().unwrap();

    assert_eq!(outcome.placement, ClipPlacement::new(2000.0, 4000.0, 1000.0));
}

#[test]
fn left_trim_stops_at_minimum_duration() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(2000.0, 4000.0, 1000.0, 6000.0)]);
    let store = store_for(&project);

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Left),
        200.0,
        container(),
    )
    .unwrap();
    controller.pointer_move(2000.0, &store).unwrap();
    let outcome = controller.pointer_up(&store).unwrap().unwrap();

    assert_eq!(outcome.placement, ClipPlacement::new(5500.0, 500.0, 4500.0));
}

// ── Right trim ─────────────────────────────────────────────────

#[test]
fn right_trim_at_source_end_cannot_grow() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(0.0, 1000.0, 5000.0, 6000.0)]);
    let store = store_for(&project);

    // Clip spans 0..100px; dragging to 300px asks for 3000ms.
    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Right),
        100.0,
        container(),
    )
    .unwrap();
    controller.pointer_move(300.0, &store).unwrap();
    let (_, step) = controller.current().unwrap();
    assert_eq!(step.placement.duration, 1000.0);

    let outcome = controller.pointer_up(&store).unwrap().unwrap();
    assert_eq!(outcome.placement, ClipPlacement::new(0.0, 1000.0, 5000.0));
    assert_eq!(store.keyframe(ids[0]).unwrap().duration, 1000.0);
}

#[test]
fn right_trim_below_minimum_is_floored() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(2000.0, 4000.0, 1000.0, 6000.0)]);
    let store = store_for(&project);

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Right),
        600.0,
        container(),
    )
    .unwrap();
    // 10px wide would be 100ms.
    controller.pointer_move(210.0, &store).unwrap();
    let outcome = controller.pointer_up(&store).unwrap().unwrap();

    assert_eq!(outcome.placement, ClipPlacement::new(2000.0, 500.0, 1000.0));
}

#[test]
fn right_trim_stops_at_next_clip() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[
        TestClip::new(0.0, 2000.0, 0.0, 10_000.0),
        TestClip::new(3000.0, 2000.0, 0.0, 10_000.0),
    ]);
    let store = store_for(&project);

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Right),
        200.0,
        container(),
    )
    .unwrap();
    controller.pointer_move(500.0, &store).unwrap();
    let outcome = controller.pointer_up(&store).unwrap().unwrap();

    assert_eq!(outcome.placement.duration, 3000.0);
}

#[test]
fn right_trim_commit_does_not_round_into_next_clip() {
    let (config, mut controller) = setup();
    // The next clip was moved off the rounding grid.
    let (project, ids) = track_with(&[
        TestClip::new(0.0, 2000.0, 0.0, 20_000.0),
        TestClip::new(4070.0, 2000.0, 0.0, 20_000.0),
    ]);
    let store = store_for(&project);

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Right),
        200.0,
        container(),
    )
    .unwrap();
    controller.pointer_move(1200.0, &store).unwrap();
    let outcome = controller.pointer_up(&store).unwrap().unwrap();

    assert!(outcome.placement.end() <= 4070.0 + EPS);
    assert!(approx(outcome.placement.duration, 4070.0));
    assert!(approx(store.keyframe(ids[0]).unwrap().duration, 4070.0));
}

#[test]
fn left_trim_commit_keeps_right_edge_in_place() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(2000.0, 4000.0, 1000.0, 6000.0)]);
    let store = store_for(&project);

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Left),
        200.0,
        container(),
    )
    .unwrap();
    // 46px trims 460ms; the commit rounds the trim, not the edges.
    controller.pointer_move(246.0, &store).unwrap();
    let outcome = controller.pointer_up(&store).unwrap().unwrap();

    assert_eq!(outcome.placement, ClipPlacement::new(2500.0, 3500.0, 1500.0));
    assert_eq!(outcome.placement.end(), 6000.0);
}

#[test]
fn unknown_source_length_falls_back_to_default() {
    let (config, mut controller) = setup();
    let mut project = Project::new("Fallback");
    let track = project.add_track(TrackKind::Voiceover, "Voiceover");
    let media = project.add_media(MediaItem::new(MediaKind::Voiceover));
    let clip = project
        .add_keyframe(Keyframe::new(
            track,
            media,
            MediaKind::Voiceover,
            0.0,
            4000.0,
        ))
        .unwrap();
    let store = store_for(&project);

    press(
        &mut controller,
        &config,
        &project,
        clip,
        DragTarget::Handle(TrimEdge::Right),
        400.0,
        container(),
    )
    .unwrap();
    controller.pointer_move(800.0, &store).unwrap();
    let outcome = controller.pointer_up(&store).unwrap().unwrap();

    assert_eq!(outcome.placement.duration, 5000.0);
}

// ── Move ───────────────────────────────────────────────────────

#[test]
fn move_is_clamped_to_previous_clip() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[
        TestClip::new(0.0, 3000.0, 0.0, 10_000.0),
        TestClip::new(6000.0, 3000.0, 0.0, 10_000.0),
    ]);
    let store = store_for(&project);

    let element = ClipElement {
        container: Some(PixelSpan::new(0.0, 1000.0)),
        clip: PixelSpan::new(200.0, 100.0),
        previous: Some(PixelSpan::new(0.0, 100.0)),
        next: None,
    };
    press_element(
        &mut controller,
        &config,
        &project,
        ids[1],
        DragTarget::Body,
        250.0,
        &element,
    )
    .unwrap();

    // Target left edge 50px lands on the previous clip's right edge.
    controller.pointer_move(100.0, &store).unwrap();
    let (_, step) = controller.current().unwrap();
    assert_eq!(step.pixels.left, 100.0);
    assert!(approx(step.placement.timestamp, 3000.0));
    assert!(approx(store.keyframe(ids[1]).unwrap().timestamp, 3000.0));

    let outcome = controller.pointer_up(&store).unwrap().unwrap();
    assert!(!outcome.wrote);
    assert_eq!(outcome.placement.duration, 3000.0);
    assert_eq!(store.write_log().len(), 1);
    assert_eq!(store.invalidation_count(project.id), 1);
}

#[test]
fn move_persists_every_step() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(2000.0, 4000.0, 1000.0, 6000.0)]);
    let store = store_for(&project);

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Body,
        300.0,
        container(),
    )
    .unwrap();
    for x in [320.0, 340.0, 360.0] {
        controller.pointer_move(x, &store).unwrap();
    }
    assert_eq!(store.write_log().len(), 3);
    assert!(approx(store.keyframe(ids[0]).unwrap().timestamp, 2600.0));

    controller.pointer_up(&store).unwrap();
    let keyframe = store.keyframe(ids[0]).unwrap();
    assert_eq!(keyframe.duration, 4000.0);
    assert_eq!(keyframe.start_offset, 1000.0);
}

// ── Session lifecycle ──────────────────────────────────────────

#[test]
fn detached_clip_never_starts_a_session() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(2000.0, 4000.0, 1000.0, 6000.0)]);
    let store = store_for(&project);

    let element = ClipElement::detached(PixelSpan::new(200.0, 400.0));
    let refused = press_element(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Body,
        300.0,
        &element,
    );

    assert_eq!(
        refused,
        Err(SessionRefused::Bounds(BoundsUnavailable::Detached))
    );
    assert_eq!(controller.phase(), DragPhase::Idle);
    assert_eq!(controller.registry().live_captures(), 0);
    assert_eq!(controller.pointer_move(400.0, &store).unwrap(), None);
    assert!(controller.pointer_up(&store).unwrap().is_none());
    assert!(store.write_log().is_empty());
    assert_eq!(store.invalidation_count(project.id), 0);
}

#[test]
fn zero_width_track_is_refused() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(2000.0, 4000.0, 1000.0, 6000.0)]);

    let element = ClipElement {
        container: Some(PixelSpan::new(0.0, 0.0)),
        clip: PixelSpan::new(0.0, 0.0),
        previous: None,
        next: None,
    };
    let refused = press_element(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Right),
        0.0,
        &element,
    );

    assert_eq!(
        refused,
        Err(SessionRefused::Bounds(BoundsUnavailable::ZeroWidth))
    );
    assert_eq!(controller.registry().live_captures(), 0);
}

#[test]
fn short_source_refuses_resize_but_allows_move() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(0.0, 400.0, 0.0, 400.0)]);

    let refused = press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Left),
        0.0,
        container(),
    );
    assert_eq!(refused, Err(SessionRefused::SourceTooShort));

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Body,
        20.0,
        container(),
    )
    .unwrap();
    assert_eq!(controller.phase(), DragPhase::Active);
}

#[test]
fn second_press_is_ignored_while_dragging() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[
        TestClip::new(0.0, 2000.0, 0.0, 10_000.0),
        TestClip::new(3000.0, 2000.0, 0.0, 10_000.0),
    ]);

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Body,
        100.0,
        container(),
    )
    .unwrap();
    let refused = press(
        &mut controller,
        &config,
        &project,
        ids[1],
        DragTarget::Body,
        400.0,
        container(),
    );

    assert_eq!(refused, Err(SessionRefused::AlreadyActive));
    assert_eq!(controller.active_clip(), Some(ids[0]));
    assert_eq!(controller.registry().live_captures(), 1);
}

#[test]
fn failed_commit_still_releases_and_invalidates() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(2000.0, 4000.0, 1000.0, 6000.0)]);
    let store = store_for(&project);

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Right),
        600.0,
        container(),
    )
    .unwrap();
    controller.pointer_move(550.0, &store).unwrap();
    store.set_read_only(true);

    assert!(controller.pointer_up(&store).is_err());
    assert_eq!(controller.phase(), DragPhase::Idle);
    assert_eq!(controller.registry().live_captures(), 0);
    assert_eq!(store.invalidation_count(project.id), 1);
    assert_eq!(store.keyframe(ids[0]).unwrap().duration, 4000.0);
}

#[test]
fn teardown_commits_the_active_resize() {
    let (config, mut controller) = setup();
    let (project, ids) = track_with(&[TestClip::new(2000.0, 4000.0, 1000.0, 6000.0)]);
    let store = store_for(&project);

    press(
        &mut controller,
        &config,
        &project,
        ids[0],
        DragTarget::Handle(TrimEdge::Right),
        600.0,
        container(),
    )
    .unwrap();
    controller.pointer_move(540.0, &store).unwrap();
    let outcome = controller.teardown(&store).unwrap().unwrap();

    assert_eq!(outcome.placement.duration, 3400.0);
    assert_eq!(store.keyframe(ids[0]).unwrap().duration, 3400.0);
    assert_eq!(controller.registry().live_captures(), 0);
    assert!(controller.teardown(&store).unwrap().is_none());
}
