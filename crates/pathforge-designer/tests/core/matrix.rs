use lyon::geom::Angle;
use pathforge_core::Point;
use pathforge_designer::matrix::{
    decompose_matrix, from_svg, generate_rotate_matrix, generate_skew_matrix, transform_point,
};
use pathforge_designer::{DecomposedMatrix, Matrix};
use proptest::prelude::*;

fn assert_matrix_eq(a: &Matrix, b: &Matrix, epsilon: f64) {
    for (x, y) in a.to_array().iter().zip(b.to_array().iter()) {
        assert!((x - y).abs() < epsilon, "{a:?} != {b:?}");
    }
}

#[test]
fn test_identity_decomposes_to_defaults() {
    let d = decompose_matrix(&Matrix::identity());
    let expected = DecomposedMatrix::default();
    assert!((d.scale_x - expected.scale_x).abs() < 1e-12);
    assert!((d.scale_y - expected.scale_y).abs() < 1e-12);
    assert!(d.rotate_z.abs() < 1e-12);
    assert!(d.skew_x.abs() < 1e-12);
    assert_matrix_eq(&d.compose(), &Matrix::identity(), 1e-12);
}

#[test]
fn test_quarter_turn_with_offset() {
    let m = Matrix::rotation(Angle::degrees(90.0)).then_translate(lyon::geom::vector(4.0, -2.0));
    let d = decompose_matrix(&m);
    assert!((d.rotate_z - 90.0).abs() < 1e-9);
    assert!((d.translate_x - 4.0).abs() < 1e-12);
    assert!((d.translate_y + 2.0).abs() < 1e-12);
    assert_matrix_eq(&d.compose(), &m, 1e-9);
}

#[test]
fn test_rotation_about_pivot_keeps_pivot() {
    let pivot = Point::new(3.0, 7.0);
    let m = generate_rotate_matrix(90.0, pivot);
    assert!(transform_point(&m, pivot).approx_eq(&pivot, 1e-9));
    // y grows downward on screen, so +90 turns +x into +y.
    let p = transform_point(&m, Point::new(4.0, 7.0));
    assert!(p.approx_eq(&Point::new(3.0, 8.0), 1e-9));
}

#[test]
fn test_skew_about_pivot_keeps_pivot_row() {
    let pivot = Point::new(0.0, 10.0);
    let m = generate_skew_matrix(45.0, 0.0, pivot);
    assert!(transform_point(&m, Point::new(5.0, 10.0)).approx_eq(&Point::new(5.0, 10.0), 1e-9));
    assert!(transform_point(&m, Point::new(0.0, 0.0)).approx_eq(&Point::new(-10.0, 0.0), 1e-9));
}

#[test]
fn test_components_add() {
    let a = decompose_matrix(&from_svg(2.0, 0.0, 0.0, 2.0, 1.0, 1.0));
    let b = decompose_matrix(&from_svg(3.0, 0.0, 0.0, 0.5, 2.0, 0.0));
    let sum = a + b;
    assert!((sum.scale_x - 6.0).abs() < 1e-12);
    assert!((sum.scale_y - 1.0).abs() < 1e-12);
    assert!((sum.translate_x - 3.0).abs() < 1e-12);
    assert_matrix_eq(&sum.matrix, &sum.compose(), 1e-12);
}

proptest! {
    #[test]
    fn decomposition_recomposes(
        a in -5.0f64..5.0,
        b in -5.0f64..5.0,
        c in -5.0f64..5.0,
        d in -5.0f64..5.0,
        e in -100.0f64..100.0,
        f in -100.0f64..100.0,
    ) {
        prop_assume!((a * d - b * c).abs() > 0.1);
        let m = from_svg(a, b, c, d, e, f);
        let recomposed = decompose_matrix(&m).compose();
        for (x, y) in m.to_array().iter().zip(recomposed.to_array().iter()) {
            prop_assert!((x - y).abs() < 1e-8, "{:?} -> {:?}", m, recomposed);
        }
    }
}
