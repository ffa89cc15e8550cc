use pathforge_designer::PathData;

fn removed(input: &str, index: usize) -> String {
    let mut data: PathData = input.parse().expect("valid path");
    data.remove_command(index).expect("index in range");
    data.to_string()
}

#[test]
fn test_remove_leading_move_reanchors_first_subpath() {
    assert_eq!(
        removed("M0,0 L1,1 L2,2 M3,3 L4,4 L5,5", 0),
        "M1,1 L2,2 M3,3 L4,4 L5,5"
    );
}

#[test]
fn test_remove_inside_closed_subpath_reopens_it() {
    assert_eq!(removed("M0,0 L1,1 L2,2 L3,3 Z", 2), "M2,2 L3,3 L0,0 L1,1");
}

#[test]
fn test_remove_move_of_single_edge_empties_path() {
    assert_eq!(removed("M0,0 L1,1", 0), "");
}

#[test]
fn test_remove_in_second_subpath_leaves_first_alone() {
    assert_eq!(
        removed("M0,0 L1,1 M3,3 L4,4 L5,5", 4),
        "M0,0 L1,1 M3,3 L4,4"
    );
}

#[test]
fn test_remove_last_edge_of_closed_subpath_skips_zero_length_close() {
    // The explicit edge back to the start already closes the shape.
    assert_eq!(removed("M0,0 L1,0 L1,1 L0,0 Z", 1), "M1,0 L1,1 L0,0");
}

#[test]
fn test_relative_letters_survive_removal() {
    assert_eq!(removed("m0,0 l1,0 l0,1 l1,0", 1), "m1,0 l0,1 l1,0");
}

#[test]
fn test_removal_keeps_path_starting_with_move() {
    let mut data: PathData = "M0,0 L1,1 L2,2 Z M5,5 L6,6".parse().unwrap();
    while !data.is_empty() {
        data.remove_command(data.len() - 1).unwrap();
        if let Some(first) = data.command(0) {
            assert_eq!(first.kind(), pathforge_designer::CommandType::MoveTo);
        }
    }
}
