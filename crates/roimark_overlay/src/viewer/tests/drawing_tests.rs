//! Tests for drawing new rectangles.

use super::*;
use crate::event::PointerEventKind;
use crate::gesture::InteractionSession;

#[test]
fn test_forward_drag_creates_annotation() {
    let mut remote = Remote::new();
    let mut viewer = loaded_viewer(&mut remote, settings());

    drag(&mut viewer, (0.0, 0.0), (50.0, 40.0));
    remote.settle(&mut viewer);

    let annotations = viewer.annotations();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].rect, Rect::new(0, 0, 50, 40));
    assert_eq!(annotations[0].label, "nodule");
    assert_eq!(annotations[0].image, key_for(&sequence()[0]));
    assert_eq!(annotations[0].id, 101);
}

#[test]
fn test_reverse_small_drag_is_discarded() {
    let mut remote = Remote::new();
    let mut viewer = loaded_viewer(&mut remote, settings());

    drag(&mut viewer, (10.0, 10.0), (5.0, 5.0));
    remote.settle(&mut viewer);

    assert!(viewer.annotations().is_empty());
    assert!(
        !remote
            .log
            .iter()
            .any(|call| matches!(call, SyncRequest::Create(_)))
    );
    assert!(viewer.session().is_idle());
}

#[test]
fn test_committed_rect_is_normalized_in_every_direction() {
    let cases = [
        ((30.0, 30.0), (0.0, 80.0), Rect::new(0, 30, 30, 50)),
        ((200.0, 150.0), (120.0, 100.0), Rect::new(120, 100, 80, 50)),
        ((40.0, 90.0), (75.0, 20.0), Rect::new(40, 20, 35, 70)),
    ];
    for (from, to, expected) in cases {
        let mut remote = Remote::new();
        let mut viewer = loaded_viewer(&mut remote, settings());
        drag(&mut viewer, from, to);
        remote.settle(&mut viewer);
        assert_eq!(viewer.annotations()[0].rect, expected, "drag {:?} -> {:?}", from, to);
    }
}

#[test]
fn test_thin_drag_is_discarded() {
    let mut remote = Remote::new();
    let mut viewer = loaded_viewer(&mut remote, settings());

    drag(&mut viewer, (0.0, 0.0), (200.0, 9.0));
    remote.settle(&mut viewer);

    assert!(viewer.annotations().is_empty());
}

#[test]
fn test_working_rect_follows_pointer_and_clears_on_release() {
    let mut remote = Remote::new();
    let mut viewer = loaded_viewer(&mut remote, settings());

    viewer.handle_pointer(at(PointerEventKind::Down, 60.0, 60.0));
    viewer.handle_pointer(at(PointerEventKind::Move, 20.0, 90.0));
    assert_eq!(viewer.working_rect(), Some(Rect::new(20, 60, 40, 30)));
    assert!(matches!(viewer.session(), InteractionSession::Drawing { .. }));

    viewer.handle_pointer(at(PointerEventKind::Up, 20.0, 90.0));
    // Cleared before the create request is answered
    assert_eq!(viewer.working_rect(), None);
    assert!(viewer.annotations().is_empty());
    assert_eq!(viewer.pending_requests(), 1);

    remote.settle(&mut viewer);
    assert_eq!(viewer.annotations().len(), 1);
}

#[test]
fn test_failed_create_never_appends() {
    let mut remote = Remote::new();
    let mut viewer = loaded_viewer(&mut remote, settings());
    remote.fail_mutations = true;

    drag(&mut viewer, (0.0, 0.0), (50.0, 40.0));
    remote.settle(&mut viewer);

    assert!(viewer.annotations().is_empty());
    assert!(viewer.load_error().is_none());
    assert_eq!(viewer.pending_requests(), 0);
}

#[test]
fn test_press_before_image_resolves_is_ignored() {
    let mut viewer = Viewer::new(settings(), Navigator::new(sequence()));
    viewer.open(sequence()[0].clone());

    viewer.handle_pointer(at(PointerEventKind::Down, 0.0, 0.0));
    assert!(viewer.session().is_idle());
}

#[test]
fn test_pointer_uses_bounds_of_each_event() {
    let mut remote = Remote::new();
    let mut viewer = loaded_viewer(&mut remote, settings());

    let press = PointerEvent::new(
        PointerEventKind::Down,
        ScreenPoint::new(110.0, 60.0),
        OverlayBounds::new(100.0, 50.0, 512.0, 512.0),
    );
    // The container scrolled before the release
    let moved = OverlayBounds::new(100.25, 29.5, 512.0, 512.0);
    let release = PointerEvent::new(PointerEventKind::Up, ScreenPoint::new(150.75, 70.0), moved);

    viewer.handle_pointer(press);
    viewer.handle_pointer(release);
    remote.settle(&mut viewer);

    // (150.75 - 100.25, 70.0 - 29.5) = (50.5, 40.5) rounds up to (51, 41)
    assert_eq!(viewer.annotations()[0].rect, Rect::new(10, 10, 41, 31));
}
