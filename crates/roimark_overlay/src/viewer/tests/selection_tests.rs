//! Tests for selection, deletion and the label list operations.

use super::*;
use crate::event::PointerEventKind;
use crate::geometry::Handle;

fn two_annotations() -> (Viewer, Remote) {
    let mut remote = Remote::new();
    remote.seed(&sequence()[0], 1, Rect::new(10, 10, 40, 40));
    remote.seed(&sequence()[0], 2, Rect::new(30, 30, 40, 40));
    let viewer = loaded_viewer(&mut remote, settings());
    (viewer, remote)
}

#[test]
fn test_click_selects_and_background_clears() {
    let (mut viewer, _remote) = two_annotations();

    click(&mut viewer, 15.0, 15.0);
    assert_eq!(viewer.selected(), Some(1));

    click(&mut viewer, 300.0, 300.0);
    assert_eq!(viewer.selected(), None);
    assert!(viewer.session().is_idle());
}

#[test]
fn test_overlap_selects_topmost() {
    let (mut viewer, _remote) = two_annotations();
    click(&mut viewer, 40.0, 40.0);
    assert_eq!(viewer.selected(), Some(2));
}

#[test]
fn test_body_press_does_not_start_drawing() {
    let (mut viewer, _remote) = two_annotations();
    viewer.handle_pointer(at(PointerEventKind::Down, 15.0, 15.0));
    viewer.handle_pointer(at(PointerEventKind::Move, 200.0, 200.0));
    assert_eq!(viewer.working_rect(), None);
    assert!(viewer.session().is_idle());
}

#[test]
fn test_double_click_deletes_and_clears_selection() {
    let (mut viewer, mut remote) = two_annotations();
    click(&mut viewer, 15.0, 15.0);

    viewer.handle_pointer(at(PointerEventKind::DoubleClick, 15.0, 15.0));
    assert_eq!(viewer.selected(), None);
    assert!(viewer.store().get(1).is_none());

    remote.settle(&mut viewer);
    assert!(remote.log.contains(&SyncRequest::Delete { id: 1 }));
    assert_eq!(remote.annotations.len(), 1);
}

#[test]
fn test_double_click_other_annotation_keeps_selection() {
    let (mut viewer, mut remote) = two_annotations();
    viewer.select_from_list(2);

    viewer.handle_pointer(at(PointerEventKind::DoubleClick, 15.0, 15.0));
    remote.settle(&mut viewer);

    assert_eq!(viewer.selected(), Some(2));
    assert_eq!(viewer.annotations().len(), 1);
}

#[test]
fn test_double_click_on_background_does_nothing() {
    let (mut viewer, mut remote) = two_annotations();
    viewer.handle_pointer(at(PointerEventKind::DoubleClick, 300.0, 300.0));
    remote.settle(&mut viewer);
    assert_eq!(viewer.annotations().len(), 2);
}

#[test]
fn test_failed_delete_stays_deleted_by_default() {
    let (mut viewer, mut remote) = two_annotations();
    remote.fail_mutations = true;

    assert!(viewer.delete_annotation(1));
    remote.settle(&mut viewer);

    assert!(viewer.store().get(1).is_none());
    assert_eq!(remote.annotations.len(), 2);
}

#[test]
fn test_failed_delete_restores_position_with_rollback() {
    let mut remote = Remote::new();
    for id in 1..=3 {
        remote.seed(&sequence()[0], id, Rect::new(0, 0, 20, 20));
    }
    let mut viewer = loaded_viewer(
        &mut remote,
        ViewerSettings {
            rollback_failed_mutations: true,
            ..settings()
        },
    );
    remote.fail_mutations = true;

    viewer.delete_annotation(2);
    remote.settle(&mut viewer);

    let ids: Vec<_> = viewer.annotations().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    // Selection is not brought back
    assert_eq!(viewer.selected(), None);
}

#[test]
fn test_select_from_list() {
    let (mut viewer, _remote) = two_annotations();
    assert!(viewer.select_from_list(1));
    assert!(!viewer.select_from_list(1));
    assert!(!viewer.select_from_list(42));
    assert_eq!(viewer.selected(), Some(1));
    assert!(viewer.clear_selection());
    assert!(!viewer.clear_selection());
}

#[test]
fn test_rename_sends_label_only_patch() {
    let (mut viewer, mut remote) = two_annotations();

    assert!(viewer.rename_annotation(2, "cyst"));
    assert!(!viewer.rename_annotation(2, "cyst"));
    assert!(!viewer.rename_annotation(42, "cyst"));
    remote.settle(&mut viewer);

    assert_eq!(viewer.store().get(2).map(|a| a.label.as_str()), Some("cyst"));
    assert!(remote.log.contains(&SyncRequest::Update {
        id: 2,
        patch: crate::model::AnnotationPatch::relabel("cyst"),
    }));
    assert_eq!(remote.annotations[1].rect, Rect::new(30, 30, 40, 40));
}

#[test]
fn test_handle_rects_only_for_selection() {
    let (mut viewer, _remote) = two_annotations();
    assert!(viewer.handle_rects().is_empty());

    viewer.select_from_list(1);
    let handles = viewer.handle_rects();
    assert_eq!(handles.len(), 4);
    assert!(handles.contains(&(Handle::BottomRight, Rect::new(46, 46, 8, 8))));
}
