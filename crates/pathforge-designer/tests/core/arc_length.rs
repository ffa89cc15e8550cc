use std::f64::consts::PI;

use pathforge_core::{EditorSettings, Point};
use pathforge_designer::PathData;

const SEMICIRCLE: &str = "M0,0 A50,50 0 0,1 100,0";

#[test]
fn test_semicircle_length_close_to_analytic() {
    let data: PathData = SEMICIRCLE.parse().unwrap();
    let length = data.command_length(1, 300).unwrap();
    let expected = PI * 50.0;
    assert!(
        ((length - expected) / expected).abs() < 0.005,
        "length {length} vs {expected}"
    );
}

#[test]
fn test_coarser_sampling_never_overshoots() {
    let data: PathData = SEMICIRCLE.parse().unwrap();
    let coarse = data.command_length(1, 8).unwrap();
    let fine = data.command_length(1, 300).unwrap();
    assert!(coarse <= fine);
    assert!(fine <= PI * 50.0 + 1e-9);
}

#[test]
fn test_straight_curves_measure_their_chord() {
    let data: PathData = "M0,0 C1,0 2,0 3,0 Q4,0 5,0 L5,4".parse().unwrap();
    assert!((data.command_length(1, 300).unwrap() - 3.0).abs() < 1e-3);
    assert!((data.command_length(2, 300).unwrap() - 2.0).abs() < 1e-3);
    assert!((data.total_length(300) - 9.0).abs() < 1e-3);
}

#[test]
fn test_segment_length_counts_one_subpath() {
    let data: PathData = "M0,0 L3,4 M10,10 H20 V15 Z".parse().unwrap();
    assert!((data.segment_length(1, 300).unwrap() - 5.0).abs() < 1e-12);
    let second = data.segment_length(4, 300).unwrap();
    assert!((second - (10.0 + 5.0 + 125f64.sqrt())).abs() < 1e-9);
    assert!(data.segment_length(42, 300).is_none());
}

#[test]
fn test_point_at_length_on_arc() {
    let data: PathData = SEMICIRCLE.parse().unwrap();
    let settings = EditorSettings::default();
    let half = data.total_length(settings.arc_length_resolution) / 2.0;
    let mid = data.point_at_length(half, &settings).unwrap();
    assert!(mid.approx_eq(&Point::new(50.0, -50.0), 0.5), "{mid:?}");
}

#[test]
fn test_point_at_length_clamps_and_handles_empty() {
    let settings = EditorSettings::default();
    let data: PathData = "M0,0 L10,0 L10,10".parse().unwrap();
    assert_eq!(data.point_at_length(0.0, &settings), Some(Point::new(0.0, 0.0)));
    let on_second = data.point_at_length(15.0, &settings).unwrap();
    assert!(on_second.approx_eq(&Point::new(10.0, 5.0), 0.05));
    assert_eq!(data.point_at_length(1e6, &settings), Some(Point::new(10.0, 10.0)));
    assert_eq!(PathData::new().point_at_length(1.0, &settings), None);
}
