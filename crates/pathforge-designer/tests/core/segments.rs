use pathforge_designer::{CommandType, PathData};
use proptest::prelude::*;

fn assert_segments_well_formed(data: &PathData) {
    let ranges = data.segments();
    let mut covered = 0;
    for range in &ranges {
        assert_eq!(range.start, covered, "segments must tile the path");
        covered = range.end;

        let commands = &data.commands()[range.clone()];
        assert_eq!(commands[0].kind(), CommandType::MoveTo);
        let closes = commands
            .iter()
            .filter(|c| c.kind() == CommandType::Close)
            .count();
        assert!(closes <= 1);
        let ends_closed = commands.last().map(|c| c.kind()) == Some(CommandType::Close);
        assert_eq!(ends_closed, data.is_segment_closed(range.start));
        assert_eq!(closes == 1, ends_closed);
    }
    assert_eq!(covered, data.len());
}

#[test]
fn test_segment_lookup() {
    let data: PathData = "M0,0 L1,0 L1,1 Z L5,5 M9,9 L8,8".parse().unwrap();
    // The line after Z starts a new subpath at the closed one's start.
    assert_eq!(data.segments(), vec![0..4, 4..6, 6..8]);
    assert_eq!(data.segment_range(5), Some(4..6));
    assert_eq!(data.segment(7).map(<[_]>::len), Some(2));
    assert!(data.is_segment_closed(2));
    assert!(!data.is_segment_closed(5));
    assert_segments_well_formed(&data);
}

#[test]
fn test_prev_and_next_stop_at_path_ends() {
    let data: PathData = "M0,0 L1,0 Z M3,3 L4,4".parse().unwrap();
    assert_eq!(data.prev(0), None);
    assert_eq!(data.next(4), None);
    assert_eq!(data.prev(3), Some(2));
    assert_eq!(data.next(1), Some(2));
}

#[test]
fn test_close_segment_then_remove_segment() {
    let mut data: PathData = "M0,0 L1,0 L1,1 M5,5 L6,6".parse().unwrap();
    data.close_segment(1).unwrap();
    assert_eq!(data.to_string(), "M0,0 L1,0 L1,1 Z M5,5 L6,6");
    assert_segments_well_formed(&data);

    data.remove_segment(0).unwrap();
    assert_eq!(data.to_string(), "M5,5 L6,6");
    assert_segments_well_formed(&data);
}

fn edit_script() -> impl Strategy<Value = Vec<(u8, prop::sample::Index)>> {
    prop::collection::vec((0u8..4, any::<prop::sample::Index>()), 1..10)
}

proptest! {
    #[test]
    fn edits_keep_segments_well_formed(script in edit_script()) {
        let mut data: PathData =
            "M0,0 L10,0 C15,5 15,10 10,15 Z M20,20 Q25,30 30,20 T40,20 L40,40 M50,50 H60 V60"
                .parse()
                .unwrap();
        for (op, pick) in script {
            if data.is_empty() {
                break;
            }
            let index = pick.index(data.len());
            let _ = match op {
                0 => data.remove_command(index),
                1 => data.split_command(index, 0.5),
                2 => data.close_segment(index),
                _ => data.convert_command(index, CommandType::LineTo),
            };
            assert_segments_well_formed(&data);
        }
    }
}
