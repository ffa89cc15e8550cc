use pathforge_core::Point;
use pathforge_designer::{CommandType, PathData};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    (-200i32..=200).prop_map(|v| v as f64 / 2.0)
}

fn drawing_command() -> impl Strategy<Value = String> {
    let pair = || (coord(), coord()).prop_map(|(x, y)| format!("{x},{y}"));
    prop_oneof![
        pair().prop_map(|p| format!("L{p}")),
        (pair(), pair(), pair()).prop_map(|(a, b, c)| format!("C{a} {b} {c}")),
        (pair(), pair()).prop_map(|(a, b)| format!("Q{a} {b}")),
        (pair(), pair()).prop_map(|(a, b)| format!("S{a} {b}")),
        pair().prop_map(|p| format!("T{p}")),
    ]
}

fn target() -> impl Strategy<Value = CommandType> {
    prop_oneof![
        Just(CommandType::LineTo),
        Just(CommandType::CubicTo),
        Just(CommandType::QuadTo),
        Just(CommandType::SmoothCubicTo),
        Just(CommandType::SmoothQuadTo),
    ]
}

fn samples(data: &PathData, index: usize) -> Vec<Point> {
    [0.0, 0.3, 0.7, 1.0]
        .iter()
        .filter_map(|t| data.command_point_at(index, *t))
        .collect()
}

fn same_points(a: &[Point], b: &[Point]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(p, q)| p.approx_eq(q, 1e-9))
}

proptest! {
    #[test]
    fn conversion_keeps_neighbours_and_is_idempotent(
        commands in prop::collection::vec(drawing_command(), 1..8),
        pick in any::<prop::sample::Index>(),
        to in target(),
    ) {
        let input = format!("M0,0 {}", commands.join(" "));
        let original: PathData = input.parse().unwrap();
        let index = 1 + pick.index(original.len() - 1);

        let mut converted = original.clone();
        if converted.convert_command(index, to).is_err() {
            prop_assert_eq!(&converted, &original);
            return Ok(());
        }

        prop_assert_eq!(converted.len(), original.len());
        prop_assert_eq!(converted.command(index).unwrap().kind(), to);
        prop_assert!(converted
            .command(index)
            .unwrap()
            .point()
            .approx_eq(&original.command(index).unwrap().point(), 1e-9));
        for other in (0..original.len()).filter(|i| *i != index) {
            prop_assert!(
                same_points(&samples(&original, other), &samples(&converted, other)),
                "{} converting {} to {:?} moved command {}",
                input,
                index,
                to,
                other
            );
        }

        let once = converted.to_string();
        converted.convert_command(index, to).unwrap();
        prop_assert_eq!(converted.to_string(), once);
    }
}

#[test]
fn test_line_to_curves_keep_the_line() {
    let mut data: PathData = "M0,0 L6,3".parse().unwrap();
    let before = samples(&data, 1);
    data.convert_command(1, CommandType::CubicTo).unwrap();
    assert!(same_points(&before, &samples(&data, 1)));
    data.convert_command(1, CommandType::LineTo).unwrap();
    data.convert_command(1, CommandType::QuadTo).unwrap();
    assert!(same_points(&before, &samples(&data, 1)));
}

#[test]
fn test_arc_to_cubic_stays_on_circle() {
    let mut data: PathData = "M0,0 A50,50 0 1,1 0,100".parse().unwrap();
    data.convert_command(1, CommandType::CubicTo).unwrap();
    assert!(data.len() > 2);
    assert!(data
        .commands()
        .iter()
        .skip(1)
        .all(|c| c.kind() == CommandType::CubicTo));
    assert!(data.commands().last().unwrap().point().approx_eq(&Point::new(0.0, 100.0), 1e-9));

    let center = Point::new(0.0, 50.0);
    for index in 1..data.len() {
        for t in [0.25, 0.5, 0.75] {
            let p = data.command_point_at(index, t).unwrap();
            assert!((p.distance_to(&center) - 50.0).abs() < 0.05, "{p:?}");
        }
    }
}

#[test]
fn test_unsupported_conversion_reports_letters() {
    let mut data: PathData = "M0,0 C1,1 2,2 3,0".parse().unwrap();
    let err = data.convert_command(1, CommandType::HorizontalTo).unwrap_err();
    assert!(err.to_string().contains('C'));
    assert!(err.to_string().contains('H'));
}
