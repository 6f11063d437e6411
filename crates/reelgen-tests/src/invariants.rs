//! Property tests over whole drag sessions.

use crate::fixtures::{element_for, press_element, store_for, track_with, TestClip};
use proptest::prelude::*;
use reelgen_core::EditorConfig;
use reelgen_timeline::ClipPlacement;
use reelgen_ui::{
    commit_placement, resolve_bounds, round_placement, DragController, DragTarget, PixelSpan,
    TrimEdge, TrimLimits,
};

const EPS: f64 = 1e-6;

/// The target clip sits between two neighbours with the given gaps, ms.
#[derive(Debug, Clone, Copy)]
struct Scenario {
    gap_before: f64,
    duration: f64,
    start_offset: f64,
    spare_source: f64,
    gap_after: f64,
    width: f64,
}

fn scenario() -> impl Strategy<Value = Scenario> {
    (
        0u32..5000,
        500u32..5000,
        0u32..5000,
        0u32..5000,
        0u32..5000,
        300u32..4000,
    )
        .prop_map(
            |(gap_before, duration, start_offset, spare_source, gap_after, width)| Scenario {
                gap_before: gap_before as f64,
                duration: duration as f64,
                start_offset: start_offset as f64,
                spare_source: spare_source as f64,
                gap_after: gap_after as f64,
                width: width as f64,
            },
        )
}

fn target() -> impl Strategy<Value = DragTarget> {
    prop_oneof![
        Just(DragTarget::Body),
        Just(DragTarget::Handle(TrimEdge::Left)),
        Just(DragTarget::Handle(TrimEdge::Right)),
    ]
}

fn clips(s: &Scenario) -> [TestClip; 3] {
    let timestamp = 1000.0 + s.gap_before;
    [
        TestClip::new(0.0, 1000.0, 0.0, 10_000.0),
        TestClip::new(
            timestamp,
            s.duration,
            s.start_offset,
            s.start_offset + s.duration + s.spare_source,
        ),
        TestClip::new(timestamp + s.duration + s.gap_after, 1000.0, 0.0, 10_000.0),
    ]
}

proptest! {
    #[test]
    fn committed_resize_stays_inside_source(
        s in scenario(),
        edge in prop_oneof![Just(TrimEdge::Left), Just(TrimEdge::Right)],
        moves in prop::collection::vec(-3000i32..3000, 1..6),
    ) {
        let config = EditorConfig::default();
        let mut controller = DragController::new(&config);
        let track = clips(&s);
        let (project, ids) = track_with(&track);
        let store = store_for(&project);
        let container = PixelSpan::new(0.0, s.width);
        let element = element_for(&project, ids[1], container, config.scale());

        press_element(
            &mut controller, &config, &project, ids[1],
            DragTarget::Handle(edge), 0.0, &element,
        ).unwrap();
        for dx in moves {
            controller.pointer_move(dx as f64, &store).unwrap();
        }
        let outcome = controller.pointer_up(&store).unwrap().unwrap();

        let source = track[1].source;
        let placed = outcome.placement;
        prop_assert!(placed.start_offset >= 0.0);
        prop_assert!(placed.start_offset + placed.duration <= source + EPS);
        prop_assert!(placed.duration >= 500.0);
        prop_assert!(placed.timestamp >= 0.0);
    }

    #[test]
    fn dragged_clip_stays_between_neighbours(
        s in scenario(),
        target in target(),
        moves in prop::collection::vec(-3000i32..3000, 1..6),
    ) {
        let config = EditorConfig::default();
        let mut controller = DragController::new(&config);
        let (project, ids) = track_with(&clips(&s));
        let store = store_for(&project);
        let container = PixelSpan::new(0.0, s.width);
        let element = element_for(&project, ids[1], container, config.scale());
        let bounds = resolve_bounds(&element).unwrap();
        let start_width = element.clip.width;

        press_element(
            &mut controller, &config, &project, ids[1], target, 0.0, &element,
        ).unwrap();
        for dx in moves {
            controller.pointer_move(dx as f64, &store).unwrap();
            let (_, step) = controller.current().unwrap();
            prop_assert!(step.pixels.left >= bounds.left_bound_px - EPS);
            prop_assert!(step.pixels.right() <= bounds.right_bound_px + start_width + EPS);
        }
        let committed = controller.pointer_up(&store).unwrap().unwrap().placement;
        prop_assert_eq!(controller.registry().live_captures(), 0);

        // Rounding at release must not undo the bounds either.
        let scale = config.scale();
        let min_timestamp = scale.px_to_ms(bounds.left_bound_px, s.width);
        let max_end = scale.px_to_ms(bounds.right_bound_px + start_width, s.width);
        prop_assert!(committed.timestamp >= min_timestamp - 1e-4);
        prop_assert!(committed.end() <= max_end + 1e-4);
    }

    #[test]
    fn rounding_pass_is_idempotent(
        timestamp in 0.0f64..60_000.0,
        duration in 0.0f64..60_000.0,
        start_offset in 0.0f64..60_000.0,
    ) {
        let placement = ClipPlacement::new(timestamp, duration, start_offset);
        let once = round_placement(placement, 100.0);
        prop_assert_eq!(round_placement(once, 100.0), once);
    }

    #[test]
    fn commit_floors_duration(
        duration in 0.0f64..500.0,
        start_offset in 0.0f64..5000.0,
        source in 500.0f64..20_000.0,
    ) {
        let limits = TrimLimits::from_config(&EditorConfig::default());
        let placement = ClipPlacement::new(1000.0, duration, start_offset);
        let committed = commit_placement(placement, source, &limits);
        prop_assert!(committed.duration >= 500.0);
        prop_assert!(committed.start_offset + committed.duration <= source + EPS);
    }
}
