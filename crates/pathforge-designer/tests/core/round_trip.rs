//! Property tests: serialized path data parses back to the same geometry.

use pathforge_designer::PathData;
use proptest::prelude::*;

/// Quarter-unit coordinates stay exact through three-digit formatting.
fn coord() -> impl Strategy<Value = f64> {
    (-400i32..=400).prop_map(|v| v as f64 / 4.0)
}

fn radius() -> impl Strategy<Value = f64> {
    (1i32..=200).prop_map(|v| v as f64 / 4.0)
}

fn command() -> impl Strategy<Value = String> {
    let letter = |upper: char| {
        any::<bool>().prop_map(move |rel| if rel { upper.to_ascii_lowercase() } else { upper })
    };
    let join = |values: Vec<f64>| {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    prop_oneof![
        (letter('M'), coord(), coord()).prop_map(move |(l, x, y)| format!("{l}{}", join(vec![x, y]))),
        (letter('L'), coord(), coord()).prop_map(move |(l, x, y)| format!("{l}{}", join(vec![x, y]))),
        (letter('H'), coord()).prop_map(move |(l, x)| format!("{l}{}", join(vec![x]))),
        (letter('V'), coord()).prop_map(move |(l, y)| format!("{l}{}", join(vec![y]))),
        (letter('C'), prop::collection::vec(coord(), 6))
            .prop_map(move |(l, v)| format!("{l}{}", join(v))),
        (letter('S'), prop::collection::vec(coord(), 4))
            .prop_map(move |(l, v)| format!("{l}{}", join(v))),
        (letter('Q'), prop::collection::vec(coord(), 4))
            .prop_map(move |(l, v)| format!("{l}{}", join(v))),
        (letter('T'), coord(), coord()).prop_map(move |(l, x, y)| format!("{l}{}", join(vec![x, y]))),
        (
            letter('A'),
            radius(),
            radius(),
            coord(),
            any::<bool>(),
            any::<bool>(),
            coord(),
            coord()
        )
            .prop_map(move |(l, rx, ry, rot, large, sweep, x, y)| {
                format!(
                    "{l}{} {} {} {} {}",
                    join(vec![rx, ry, rot]),
                    u8::from(large),
                    u8::from(sweep),
                    x,
                    y
                )
            }),
        letter('Z').prop_map(|l| l.to_string()),
    ]
}

fn path_string() -> impl Strategy<Value = String> {
    prop::collection::vec(command(), 1..12).prop_map(|commands| commands.join(" "))
}

proptest! {
    #[test]
    fn serialized_path_reparses_to_same_geometry(input in path_string()) {
        let first: PathData = input.parse().expect("generated path parses");
        let text = first.to_string();
        let second: PathData = text.parse().expect("serialized path parses");

        prop_assert_eq!(first.len(), second.len(), "{} -> {}", input, text);
        for (a, b) in first.commands().iter().zip(second.commands()) {
            prop_assert_eq!(a.kind(), b.kind());
            prop_assert_eq!(a.is_relative(), b.is_relative());
            prop_assert!(a.point().approx_eq(&b.point(), 1e-9), "{} -> {}", input, text);
            for (x, y) in a.values().iter().zip(b.values()) {
                prop_assert!((x - y).abs() < 1e-9);
            }
        }
        prop_assert_eq!(second.to_string(), text);
    }

    #[test]
    fn absolute_form_keeps_points(input in path_string()) {
        let data: PathData = input.parse().expect("generated path parses");
        let absolute: PathData = data.to_absolute().to_string().parse().expect("parses");
        prop_assert_eq!(data.len(), absolute.len());
        for (a, b) in data.commands().iter().zip(absolute.commands()) {
            prop_assert!(!b.is_relative());
            prop_assert!(a.point().approx_eq(&b.point(), 1e-9));
        }
    }
}

#[test]
fn test_literal_round_trip() {
    let input = "M10,10 l5,5 h-3 V2 c1,1 2,2 3,3 s4,4 5,5 Q1,1 2,2 t3,3 a5,5 0 1,0 4,4 z";
    let data: PathData = input.parse().unwrap();
    assert_eq!(
        data.to_string(),
        "M10,10 l5,5 h-3 V2 c1,1,2,2,3,3 s4,4,5,5 Q1,1,2,2 t3,3 a5,5,0,1,0,4,4 z"
    );
}
