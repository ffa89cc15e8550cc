use lyon::geom::Angle;
use pathforge_core::{Point, Rect};
use pathforge_designer::matrix::transform_point;
use pathforge_designer::{
    Document, HandleDescriptor, HandlePosition, Matrix, NodeHost, NodeId, Operation,
    TransformAction, TransformKind, UndoService,
};

/// Runs one pointer gesture the way an editor does: snapshot, track, commit.
fn drag(
    doc: &mut Document,
    history: &mut UndoService,
    transform: TransformAction,
    to: &[Point],
) {
    let mut action = history.get_action(transform.kind().label());
    action.init(&*doc, Operation::Transform(transform)).unwrap();
    history.start_action(&mut *doc, action, false).unwrap();

    let action = history.last_action_mut().unwrap();
    for point in to {
        action.transform_by_mouse(&mut *doc, *point);
    }
    action.commit(&*doc).unwrap();
}

fn ellipse(doc: &mut Document) -> NodeId {
    doc.add_ellipse(None, Point::new(10.0, 10.0), 10.0, 5.0).unwrap()
}

#[test]
fn test_rotate_gesture_is_undoable() {
    let mut doc = Document::new();
    let node = ellipse(&mut doc);
    let mut history = UndoService::new(20);

    let rotate = TransformAction::new(
        TransformKind::Rotate,
        node,
        Point::new(20.0, 10.0),
        HandleDescriptor::default(),
    );
    drag(
        &mut doc,
        &mut history,
        rotate,
        &[Point::new(18.0, 16.0), Point::new(10.0, 20.0)],
    );

    let rotated = transform_point(&doc.matrix(node), Point::new(20.0, 10.0));
    assert!(rotated.approx_eq(&Point::new(10.0, 20.0), 1e-9), "{rotated:?}");
    assert_eq!(doc.number(node, "rx").unwrap(), 10.0);

    assert!(history.undo(&mut doc));
    assert!(doc.attribute(node, "transform").is_none());

    assert!(history.redo(&mut doc));
    let rotated = transform_point(&doc.matrix(node), Point::new(20.0, 10.0));
    assert!(rotated.approx_eq(&Point::new(10.0, 20.0), 1e-9));
}

#[test]
fn test_scale_ellipse_rewrites_geometry() {
    let mut doc = Document::new();
    let node = ellipse(&mut doc);
    let mut history = UndoService::new(20);

    let scale = TransformAction::new(
        TransformKind::Scale,
        node,
        Point::new(20.0, 15.0),
        HandleDescriptor::new(HandlePosition::BottomRight),
    );
    drag(&mut doc, &mut history, scale, &[Point::new(40.0, 25.0)]);

    assert_eq!(doc.number(node, "cx").unwrap(), 20.0);
    assert_eq!(doc.number(node, "cy").unwrap(), 15.0);
    assert_eq!(doc.number(node, "rx").unwrap(), 20.0);
    assert_eq!(doc.number(node, "ry").unwrap(), 10.0);
    assert!(doc.attribute(node, "transform").is_none());

    history.undo(&mut doc);
    assert_eq!(doc.number(node, "cx").unwrap(), 10.0);
    assert_eq!(doc.number(node, "rx").unwrap(), 10.0);
}

#[test]
fn test_translate_path_inside_scaled_group() {
    let mut doc = Document::new();
    let group = doc.add_group(None).unwrap();
    doc.set_matrix(group, Matrix::scale(2.0, 2.0)).unwrap();
    let path = doc
        .add_path(Some(group), "M0,0 L10,0".parse().unwrap())
        .unwrap();
    let mut history = UndoService::new(20);

    let translate = TransformAction::new(
        TransformKind::Translate,
        path,
        Point::new(0.0, 0.0),
        HandleDescriptor::default(),
    );
    drag(&mut doc, &mut history, translate, &[Point::new(10.0, 6.0)]);

    // Ten screen pixels are five units inside a 2x group.
    assert_eq!(doc.path_data(path).unwrap().to_string(), "M5,3 L15,3");
    assert!(doc.attribute(path, "transform").is_none());

    history.undo(&mut doc);
    assert_eq!(doc.path_data(path).unwrap().to_string(), "M0,0 L10,0");
}

#[test]
fn test_translate_keeps_arc_radii_order() {
    let mut doc = Document::new();
    let path = doc
        .add_path(None, "M0 0 A3 5 0 0 1 10 0".parse().unwrap())
        .unwrap();
    let mut history = UndoService::new(20);

    let translate = TransformAction::new(
        TransformKind::Translate,
        path,
        Point::new(0.0, 0.0),
        HandleDescriptor::default(),
    );
    drag(&mut doc, &mut history, translate, &[Point::new(1.0, 0.0)]);

    assert_eq!(
        doc.path_data(path).unwrap().to_string(),
        "M1,0 A3,5,0,0,1,11,0"
    );
}

#[test]
fn test_rotate_keeps_existing_matrix() {
    let mut doc = Document::new();
    let rect = doc.add_rect(None, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
    doc.set_matrix(rect, Matrix::translation(100.0, 0.0)).unwrap();
    let mut history = UndoService::new(20);

    // Screen center of the rect is (105, 5).
    let rotate = TransformAction::new(
        TransformKind::Rotate,
        rect,
        Point::new(115.0, 5.0),
        HandleDescriptor::default(),
    );
    drag(&mut doc, &mut history, rotate, &[Point::new(105.0, 15.0)]);

    let expected = Matrix::rotation(Angle::degrees(90.0));
    let local = doc.matrix(rect);
    let corner = transform_point(&local, Point::new(10.0, 5.0));
    assert!(corner.approx_eq(&Point::new(105.0, 10.0), 1e-9), "{corner:?}");
    assert!((local.m11 - expected.m11).abs() < 1e-9);
    assert!((local.m12 - expected.m12).abs() < 1e-9);

    history.undo(&mut doc);
    let restored = doc.matrix(rect);
    assert!((restored.m31 - 100.0).abs() < 1e-12);
    assert!((restored.m11 - 1.0).abs() < 1e-12);
}

#[test]
fn test_abandoned_gesture_can_be_removed() {
    let mut doc = Document::new();
    let node = ellipse(&mut doc);
    let mut history = UndoService::new(20);

    let mut action = history.get_action("Move");
    let id = action.id();
    action
        .init(
            &doc,
            Operation::Transform(TransformAction::new(
                TransformKind::Translate,
                node,
                Point::ZERO,
                HandleDescriptor::default(),
            )),
        )
        .unwrap();
    history.start_action(&mut doc, action, false).unwrap();
    assert!(!history.can_undo());

    assert!(history.remove(id).is_some());
    let drag_again = TransformAction::new(
        TransformKind::Translate,
        node,
        Point::ZERO,
        HandleDescriptor::default(),
    );
    drag(&mut doc, &mut history, drag_again, &[Point::new(3.0, 4.0)]);
    assert_eq!(doc.number(node, "cx").unwrap(), 13.0);
    assert_eq!(history.len(), 1);
}
