use super::*;
use crate::foundation::core::HexColor;
use crate::overlay::model::Sticker;

fn setup() -> (OverlayModel, OverlayId, OverlayId) {
    let mut m = OverlayModel::with_seed(3);
    let t = m.add_text("drag me", HexColor::WHITE).unwrap();
    let s = m.add_sticker(Sticker::Star);
    (m, t, s)
}

fn container() -> Rect {
    Rect::new(100.0, 50.0, 500.0, 250.0)
}

#[test]
fn move_tracks_pointer_absolutely() {
    let (mut m, t, _) = setup();
    let mut d = DragController::new();
    d.pointer_down(&m, t, container()).unwrap();

    assert_eq!(
        d.pointer_move(&mut m, Point::new(300.0, 150.0)),
        Some((50.0, 50.0))
    );
    assert_eq!(
        d.pointer_move(&mut m, Point::new(200.0, 100.0)),
        Some((25.0, 25.0))
    );
    assert_eq!(m.get(t).unwrap().position(), (25.0, 25.0));
}

#[test]
fn pointers_outside_container_clamp() {
    let (mut m, _, s) = setup();
    let mut d = DragController::new();
    d.pointer_down(&m, s, container()).unwrap();

    d.pointer_move(&mut m, Point::new(-1000.0, 9000.0));
    assert_eq!(m.get(s).unwrap().position(), (0.0, 100.0));
    d.pointer_move(&mut m, Point::new(501.0, 49.0));
    assert_eq!(m.get(s).unwrap().position(), (100.0, 0.0));
}

#[test]
fn up_releases_and_later_moves_are_ignored() {
    let (mut m, t, _) = setup();
    let mut d = DragController::new();
    d.pointer_down(&m, t, container()).unwrap();
    assert_eq!(d.pointer_up(), Some(t));
    assert_eq!(d.state(), DragState::Idle);

    let before = m.get(t).unwrap().position();
    assert_eq!(d.pointer_move(&mut m, Point::new(120.0, 60.0)), None);
    assert_eq!(m.get(t).unwrap().position(), before);
}

#[test]
fn last_capture_wins() {
    let (mut m, t, s) = setup();
    let mut d = DragController::new();
    d.pointer_down(&m, t, container()).unwrap();
    d.pointer_down(&m, s, container()).unwrap();
    assert_eq!(d.dragging(), Some(s));

    let text_before = m.get(t).unwrap().position();
    d.pointer_move(&mut m, Point::new(140.0, 90.0));
    assert_eq!(m.get(t).unwrap().position(), text_before);
    assert_eq!(m.get(s).unwrap().position(), (10.0, 20.0));
}

#[test]
fn degenerate_container_is_refused() {
    let (m, t, _) = setup();
    let mut d = DragController::new();
    assert!(d.pointer_down(&m, t, Rect::new(0.0, 0.0, 0.0, 10.0)).is_err());
    assert!(
        d.pointer_down(&m, t, Rect::new(0.0, 0.0, f64::INFINITY, 10.0))
            .is_err()
    );
    assert_eq!(d.state(), DragState::Idle);
}

#[test]
fn removed_item_ends_drag() {
    let (mut m, t, _) = setup();
    let mut d = DragController::new();
    d.pointer_down(&m, t, container()).unwrap();
    m.remove(t);
    assert_eq!(d.pointer_move(&mut m, Point::new(200.0, 100.0)), None);
    assert_eq!(d.dragging(), None);
}

#[test]
fn cancel_releases_capture() {
    let (m, t, _) = setup();
    let mut d = DragController::new();
    d.pointer_down(&m, t, container()).unwrap();
    d.cancel();
    assert_eq!(d.pointer_up(), None);
}
