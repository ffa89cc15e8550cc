use pathforge_core::{HistoryError, Rect};
use pathforge_designer::{
    Action, AttrValue, CommandType, Document, NodeHost, NodeId, Operation, PathEdit, UndoService,
};

fn set_width(doc: &Document, service: &UndoService, node: NodeId, width: f64) -> Action {
    let mut action = service.get_action(format!("Width {width}"));
    action
        .init(
            doc,
            Operation::SetAttributes {
                node,
                values: vec![("width".to_string(), Some(AttrValue::Number(width)))],
            },
        )
        .unwrap();
    action
}

fn setup() -> (Document, NodeId, UndoService) {
    let mut doc = Document::new();
    let rect = doc.add_rect(None, Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
    (doc, rect, UndoService::new(50))
}

#[test]
fn test_undo_service_creation() {
    let service = UndoService::new(50);
    assert!(!service.can_undo());
    assert!(!service.can_redo());
    assert_eq!(service.undo_depth(), 0);
    assert_eq!(service.redo_depth(), 0);
    assert_eq!(service.active_index(), None);
}

#[test]
fn test_record_single_action() {
    let (mut doc, rect, mut service) = setup();
    let action = set_width(&doc, &service, rect, 4.0);
    service.start_action(&mut doc, action, true).unwrap();

    assert!(service.can_undo());
    assert!(!service.can_redo());
    assert_eq!(service.undo_depth(), 1);
    assert_eq!(service.undo_description(), Some("Width 4".to_string()));
    assert_eq!(doc.number(rect, "width").unwrap(), 4.0);
}

#[test]
fn test_new_action_discards_redo_branch() {
    let (mut doc, rect, mut service) = setup();

    let a = set_width(&doc, &service, rect, 2.0);
    let a_id = a.id();
    service.start_action(&mut doc, a, true).unwrap();
    let b = set_width(&doc, &service, rect, 3.0);
    service.start_action(&mut doc, b, true).unwrap();

    assert!(service.undo(&mut doc));
    assert_eq!(doc.number(rect, "width").unwrap(), 2.0);

    let c = set_width(&doc, &service, rect, 5.0);
    let c_id = c.id();
    service.start_action(&mut doc, c, true).unwrap();

    let ids: Vec<_> = service.actions().iter().map(Action::id).collect();
    assert_eq!(ids, vec![a_id, c_id]);
    assert_eq!(service.active_index(), Some(1));
    assert!(!service.can_redo());
    assert_eq!(doc.number(rect, "width").unwrap(), 5.0);
}

#[test]
fn test_go_to_action_walks_both_ways() {
    let (mut doc, rect, mut service) = setup();
    let mut ids = Vec::new();
    for width in [2.0, 3.0, 4.0, 5.0] {
        let action = set_width(&doc, &service, rect, width);
        ids.push(action.id());
        service.start_action(&mut doc, action, true).unwrap();
    }

    assert!(service.go_to_action(&mut doc, ids[0]).unwrap());
    assert_eq!(service.active_index(), Some(0));
    assert_eq!(doc.number(rect, "width").unwrap(), 2.0);
    assert_eq!(service.redo_depth(), 3);

    assert!(service.go_to_action(&mut doc, ids[2]).unwrap());
    assert_eq!(service.active_index(), Some(2));
    assert_eq!(doc.number(rect, "width").unwrap(), 4.0);
    assert_eq!(service.redo_description(), Some("Width 5".to_string()));

    let unknown = uuid::Uuid::new_v4();
    assert!(matches!(
        service.go_to_action(&mut doc, unknown),
        Err(HistoryError::UnknownAction { .. })
    ));
}

#[test]
fn test_undo_all_restores_original() {
    let (mut doc, rect, mut service) = setup();
    for width in [2.0, 3.0, 4.0] {
        let action = set_width(&doc, &service, rect, width);
        service.start_action(&mut doc, action, true).unwrap();
    }
    while service.undo(&mut doc) {}
    assert_eq!(doc.number(rect, "width").unwrap(), 1.0);
    assert_eq!(service.undo_depth(), 0);
    assert_eq!(service.redo_depth(), 3);
    assert_eq!(service.len(), 3);
}

#[test]
fn test_path_edits_replay_from_snapshots() {
    let mut doc = Document::new();
    let node = doc
        .add_path(None, "M0,0 L10,0 L10,10 L0,10 Z".parse().unwrap())
        .unwrap();
    let mut service = UndoService::new(50);

    let edits = [
        ("Convert to curve", PathEdit::ConvertCommand { index: 1, to: CommandType::CubicTo }),
        ("Split", PathEdit::SplitCommand { index: 2, t: 0.5 }),
        ("Delete point", PathEdit::RemoveCommand(4)),
    ];
    let mut states = vec![doc.path_data(node).unwrap().to_string()];
    for (label, edit) in edits {
        let mut action = service.get_action(label);
        action.init(&doc, Operation::PathEdit { node, edit }).unwrap();
        service.start_action(&mut doc, action, true).unwrap();
        states.push(doc.path_data(node).unwrap().to_string());
    }

    for expected in states.iter().rev().skip(1) {
        assert!(service.undo(&mut doc));
        assert_eq!(&doc.path_data(node).unwrap().to_string(), expected);
    }
    for expected in states.iter().skip(1) {
        assert!(service.redo(&mut doc));
        assert_eq!(&doc.path_data(node).unwrap().to_string(), expected);
    }
}

#[test]
fn test_clear_and_summary() {
    let (mut doc, rect, mut service) = setup();
    for width in [2.0, 3.0] {
        let action = set_width(&doc, &service, rect, width);
        service.start_action(&mut doc, action, true).unwrap();
    }
    service.undo(&mut doc);

    let summary = service.summary();
    assert_eq!(summary.len(), 2);
    assert!(summary[0].applied);
    assert!(!summary[1].applied);

    service.clear();
    assert!(service.is_empty());
    assert!(!service.can_undo());
    assert!(!service.can_redo());
    // Clearing history leaves the document as it is.
    assert_eq!(doc.number(rect, "width").unwrap(), 2.0);
}

#[test]
fn test_double_init_is_rejected() {
    let (doc, rect, service) = setup();
    let mut action = set_width(&doc, &service, rect, 2.0);
    let again = action.init(
        &doc,
        Operation::SetAttributes {
            node: rect,
            values: Vec::new(),
        },
    );
    assert!(matches!(again, Err(HistoryError::InvalidOperation { .. })));
}
