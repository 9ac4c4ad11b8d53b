use super::*;
use crate::surface::trace::{TraceOp, TraceSurface, CHAR_W};
use crate::viewport::Viewport;

const CONFIG: ScrollConfig = ScrollConfig {
    step_px: 3,
    delay_ticks: 2,
    bidir_limit_pct: 100,
};

fn surface() -> TraceSurface {
    TraceSurface::new(100, 64)
}

fn viewport() -> Viewport {
    Viewport::new(0, 0, 0, 100, 64)
}

fn descriptor() -> LineDescriptor {
    LineDescriptor {
        style: Style::XY_PIXELS,
        height: 8,
        ..LineDescriptor::default()
    }
}

/// 30 chars * 6 px = 180 px rendered width.
const LONG: &str = "abcdefghijklmnopqrstuvwxyz0123";
/// 42 chars * 6 px = 252 px rendered width.
const VERY_LONG: &str = "abcdefghijklmnopqrstuvwxyz0123456789abcdef";
const SHORT: &str = "ok";

#[test]
fn fitting_text_renders_without_a_slot() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), SHORT, 0, 0);

    assert_eq!(engine.active_lines(), 0);
    assert!(surface.texts().count() == 1);
}

#[test]
fn resubmitting_the_same_line_is_idempotent() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), LONG, 0, 0);
    let before = engine.slot_info(0, 0, 0).unwrap();
    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), LONG, 0, 0);

    assert_eq!(engine.active_lines(), 1);
    assert_eq!(engine.slot_info(0, 0, 0).unwrap(), before);
}

#[test]
fn update_preserves_animation_phase() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), LONG, 0, 0);
    engine.advance(&mut surface, 2);
    engine.advance(&mut surface, 3);
    let moved = engine.slot_info(0, 0, 0).unwrap();
    assert_eq!(moved.offset, 6);

    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), VERY_LONG, 0, 4);
    let updated = engine.slot_info(0, 0, 0).unwrap();
    assert_eq!(updated.offset, moved.offset);
    assert_eq!(updated.backward, moved.backward);
    assert_eq!(updated.start_tick, moved.start_tick);
    // 252 px in a 100 px rectangle is no longer bounce-eligible
    assert!(!updated.bidir);
}

#[test]
fn shrunk_content_retires_the_slot() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), LONG, 0, 0);
    assert_eq!(engine.active_lines(), 1);

    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), SHORT, 0, 1);
    assert_eq!(engine.active_lines(), 0);

    surface.clear_ops();
    engine.advance(&mut surface, 100);
    assert!(surface.ops.is_empty());
}

#[test]
fn motion_waits_for_the_start_delay() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), LONG, 0, 10);
    engine.advance(&mut surface, 11);
    assert_eq!(engine.slot_info(0, 0, 0).unwrap().offset, 0);

    engine.advance(&mut surface, 12);
    assert_eq!(engine.slot_info(0, 0, 0).unwrap().offset, 3);
}

#[test]
fn bidirectional_bounce_stays_within_bounds() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    // 180 px in a 100 px rectangle with a 100% limit: 180 < 200, bounce.
    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), LONG, 0, 0);
    assert!(engine.slot_info(0, 0, 0).unwrap().bidir);
    let max_offset = 180 - 100;

    let mut now = CONFIG.delay_ticks;
    let mut offsets = std::vec::Vec::new();
    for _ in 0..120 {
        engine.advance(&mut surface, now);
        offsets.push(engine.slot_info(0, 0, 0).unwrap().offset);
        now += 1;
    }

    assert!(offsets.iter().all(|&o| (0..=max_offset).contains(&o)));
    assert!(offsets.contains(&max_offset));

    // each leg is monotonic: direction only changes at an extreme
    let mut rising = true;
    for pair in offsets.windows(2) {
        match pair[1].cmp(&pair[0]) {
            core::cmp::Ordering::Greater => {
                assert!(rising || pair[0] == 0, "rose mid-descent at {pair:?}");
                rising = true;
            }
            core::cmp::Ordering::Less => {
                assert!(!rising || pair[0] == max_offset, "fell mid-ascent at {pair:?}");
                rising = false;
            }
            core::cmp::Ordering::Equal => {}
        }
    }
}

#[test]
fn wide_text_wraps_forward_only() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    // 252 px is not within 100 px * 200%: forward wrap mode.
    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), VERY_LONG, 0, 0);
    assert!(!engine.slot_info(0, 0, 0).unwrap().bidir);
    let max_offset = 252 - 100;

    let mut now = CONFIG.delay_ticks;
    let mut wrapped = false;
    let mut previous = 0;
    for _ in 0..80 {
        engine.advance(&mut surface, now);
        let offset = engine.slot_info(0, 0, 0).unwrap().offset;
        assert!(offset <= max_offset);
        if offset < previous {
            assert_eq!(offset, 0);
            wrapped = true;
        }
        previous = offset;
        now += 1;
    }
    assert!(wrapped);
}

#[test]
fn full_table_rejects_the_newest_line() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    for row in 0..5 {
        engine.submit(&mut surface, &vp, 0, row * 8, &descriptor(), LONG, 0, 0);
    }

    assert_eq!(engine.active_lines(), 4);
    assert!(engine.slot_info(0, 0, 3 * 8).is_some());
    assert!(engine.slot_info(0, 0, 4 * 8).is_none());
}

#[test]
fn distinct_position_keys_do_not_share_slots() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();
    let mut other_vp = viewport();
    other_vp.id = 1;

    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), LONG, 0, 0);
    engine.submit(&mut surface, &other_vp, 0, 0, &descriptor(), LONG, 0, 0);

    assert_eq!(engine.active_lines(), 2);
}

#[test]
fn stop_rect_removes_only_intersecting_slots() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), LONG, 0, 0);
    engine.submit(&mut surface, &vp, 0, 16, &descriptor(), LONG, 0, 0);

    engine.stop_rect(vp.id, Rect::new(0, 0, 100, 8));

    assert_eq!(engine.active_lines(), 1);
    assert!(engine.slot_info(0, 0, 0).is_none());
    assert!(engine.slot_info(0, 0, 16).is_some());
}

#[test]
fn custom_painter_receives_its_token() {
    fn paint(surface: &mut TraceSurface, ctx: &ScrollContext<'_>) {
        assert_eq!(ctx.token, 42);
        let vp = *ctx.viewport;
        surface.draw_text(&vp, ctx.rect.x, ctx.rect.y, ctx.offset, "custom");
    }

    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    engine.submit_custom(
        &mut surface,
        &vp,
        0,
        0,
        &descriptor(),
        LONG,
        0,
        SlotPainter::Custom { paint, token: 42 },
        0,
    );

    surface.clear_ops();
    engine.advance(&mut surface, CONFIG.delay_ticks);
    assert!(surface.ops.iter().any(|op| matches!(
        op,
        TraceOp::Text { text, .. } if text.as_str() == "custom"
    )));
}

#[test]
fn put_line_registers_overflowing_text() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let mut vp = viewport();
    let desc = LineDescriptor {
        scroll: true,
        ..descriptor()
    };

    engine.put_line(
        &mut surface,
        &mut vp,
        0,
        0,
        &desc,
        "$i$t",
        &[LineArg::Icon(None), LineArg::Text(LONG)],
        0,
    );

    // the slot sits after the icon cell
    assert_eq!(engine.active_lines(), 1);
    assert!(engine.slot_info(0, 7, 0).is_some());
}

#[test]
fn put_line_leaves_fitting_text_static() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let mut vp = viewport();
    let desc = LineDescriptor {
        scroll: true,
        ..descriptor()
    };

    engine.put_line(&mut surface, &mut vp, 0, 0, &desc, "$t", &[LineArg::Text(SHORT)], 0);
    assert_eq!(engine.active_lines(), 0);
}

#[test]
fn engines_per_display_are_independent() {
    let main: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let remote: ScrollEngine<TraceSurface, 2> = ScrollEngine::new(CONFIG);
    let mut main_surface = surface();
    let mut remote_surface = TraceSurface::new(80, 32);
    let vp = viewport();
    let mut remote_vp = Viewport::new(0, 0, 0, 80, 32);
    remote_vp.id = 7;

    main.submit(&mut main_surface, &vp, 0, 0, &descriptor(), LONG, 0, 0);
    remote.submit(&mut remote_surface, &remote_vp, 0, 0, &descriptor(), LONG, 0, 0);

    main.stop_all();
    assert_eq!(main.active_lines(), 0);
    assert_eq!(remote.active_lines(), 1);
}

#[test]
fn oversized_content_is_truncated_not_overflowed() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    let mut giant = std::string::String::new();
    for _ in 0..600 {
        giant.push('a');
    }
    engine.submit(&mut surface, &vp, 0, 0, &descriptor(), &giant, 0, 0);

    assert_eq!(engine.active_lines(), 1);
    // cached width reflects the truncated copy
    let max_offset = (SCROLL_LINE_BYTES as i32) * CHAR_W - 100;
    let mut now = CONFIG.delay_ticks;
    for _ in 0..4 {
        engine.advance(&mut surface, now);
        assert!(engine.slot_info(0, 0, 0).unwrap().offset <= max_offset);
        now += 1;
    }
}

#[test]
fn advance_repaints_exactly_the_slot_rectangle() {
    let engine: ScrollEngine<TraceSurface, 4> = ScrollEngine::new(CONFIG);
    let mut surface = surface();
    let vp = viewport();

    engine.submit(&mut surface, &vp, 4, 8, &descriptor(), LONG, 0, 0);
    surface.clear_ops();
    engine.advance(&mut surface, CONFIG.delay_ticks);

    match &surface.ops[0] {
        TraceOp::FillRect { rect, .. } => assert_eq!(*rect, Rect::new(4, 8, 96, 8)),
        other => panic!("expected styled repaint, got {other:?}"),
    }
    match surface.ops.iter().find(|op| matches!(op, TraceOp::Text { .. })) {
        Some(TraceOp::Text { x, skip_px, .. }) => {
            assert_eq!(*x, 4);
            assert_eq!(*skip_px, 3);
        }
        other => panic!("expected repaint text, got {other:?}"),
    }
}
