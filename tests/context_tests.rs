//! Editing-session behavior: trim edits, crop gestures, playback position

use webpcut::app::AppContext;
use webpcut::domain::geometry::RawCrop;
use webpcut::domain::model::{TrimField, VideoMetadata};

fn session() -> AppContext {
    let metadata = VideoMetadata::new(1920, 1080, 10.0).unwrap();
    AppContext::new(metadata, 30, 80, 1.0)
}

#[test]
fn fresh_session_covers_the_whole_source() {
    let ctx = session();
    let params = ctx.params();
    assert!((params.trim.start - 0.0).abs() < 1e-9);
    assert!((params.trim.end - 10.0).abs() < 1e-9);
    assert_eq!((params.crop.x, params.crop.y), (0, 0));
    assert_eq!((params.crop.w, params.crop.h), (1920, 1080));
    assert_eq!((params.resize_w, params.resize_h), (1920, 1080));
    assert!(params.validate(ctx.metadata()).is_ok());
}

#[test]
fn trim_edit_clamps_the_playhead_back_into_the_window() {
    let mut ctx = session();
    ctx.set_playhead(8.0);
    ctx.apply_trim_edit(TrimField::End, 5.0);
    assert!((ctx.playhead() - 5.0).abs() < 1e-9);
}

#[test]
fn playhead_setters_route_through_the_trim_window() {
    let mut ctx = session();
    ctx.apply_trim_edit(TrimField::Start, 2.0);
    ctx.apply_trim_edit(TrimField::End, 6.0);

    ctx.set_playhead(1.0);
    assert!((ctx.playhead() - 2.0).abs() < 1e-9);

    ctx.set_playhead(4.0);
    ctx.tick_playhead(1.0);
    assert!((ctx.playhead() - 5.0).abs() < 1e-9);

    // Reaching the end loops back to the start.
    ctx.tick_playhead(2.0);
    assert!((ctx.playhead() - 2.0).abs() < 1e-9);
}

#[test]
fn trim_markers_follow_the_playhead() {
    let mut ctx = session();
    ctx.set_playhead(3.0);
    ctx.set_start_from_playhead();
    ctx.set_playhead(7.0);
    ctx.set_end_from_playhead();

    let trim = ctx.trim();
    assert!((trim.start - 3.0).abs() < 1e-9);
    assert!((trim.end - 7.0).abs() < 1e-9);
}

#[test]
fn corner_drag_resizes_through_the_stage_scale() {
    let mut ctx = session();
    // The stage renders the 1920x1080 frame at half size.
    ctx.begin_drag(7, "se", 500.0, 400.0, 960.0, 540.0);
    assert!(ctx.drag_active());

    // 480px left and 270px up on stage is 960 and 540 frame units.
    ctx.update_drag(7, 20.0, 130.0);
    let crop = ctx.crop();
    assert_eq!((crop.x, crop.y), (0, 0));
    assert_eq!((crop.w, crop.h), (960, 540));

    ctx.end_drag(7);
    assert!(!ctx.drag_active());
    assert_eq!(ctx.crop(), crop);
}

#[test]
fn events_from_other_pointers_are_ignored() {
    let mut ctx = session();
    ctx.begin_drag(1, "move", 0.0, 0.0, 960.0, 540.0);
    let before = ctx.crop();

    ctx.update_drag(2, 300.0, 300.0);
    assert_eq!(ctx.crop(), before);

    ctx.end_drag(2);
    assert!(ctx.drag_active());
    ctx.end_drag(1);
    assert!(!ctx.drag_active());
}

#[test]
fn crop_reset_restores_the_full_frame_and_resize() {
    let mut ctx = session();
    ctx.apply_crop_input(RawCrop::new(10.0, 20.0, 640.0, 360.0));
    ctx.snap_resize_to_crop();
    assert_eq!((ctx.crop().w, ctx.crop().h), (640, 360));

    ctx.reset_crop();
    let params = ctx.params();
    assert_eq!((params.crop.w, params.crop.h), (1920, 1080));
    assert_eq!((params.resize_w, params.resize_h), (1920, 1080));
}

#[test]
fn edits_are_ignored_while_processing() {
    let mut ctx = session();
    ctx.begin_processing();

    ctx.apply_trim_edit(TrimField::End, 5.0);
    ctx.apply_crop_input(RawCrop::new(0.0, 0.0, 100.0, 100.0));
    ctx.set_fps(10);
    ctx.begin_drag(1, "se", 0.0, 0.0, 960.0, 540.0);

    let params = ctx.params();
    assert!((params.trim.end - 10.0).abs() < 1e-9);
    assert_eq!((params.crop.w, params.crop.h), (1920, 1080));
    assert_eq!(params.fps, 30);
    assert!(!ctx.drag_active());

    ctx.end_processing();
    ctx.set_fps(10);
    assert_eq!(ctx.params().fps, 10);
}

#[test]
fn parameter_setters_clamp_to_their_domains() {
    let mut ctx = session();
    ctx.set_fps(200);
    ctx.set_quality(0);
    ctx.set_speed(99.0);

    let params = ctx.params();
    assert_eq!(params.fps, 60);
    assert_eq!(params.quality, 1);
    assert!((params.speed - 4.0).abs() < 1e-9);
}
