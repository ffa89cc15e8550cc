//! Affine matrix algebra for the transform tools.
//!
//! Matrices are `lyon` transforms in `f64` using the row-vector convention of
//! SVG's `matrix(a b c d e f)`: `m11 = a`, `m12 = b`, `m21 = c`, `m22 = d`,
//! `m31 = e`, `m32 = f`, and `a.then(&b)` applies `a` first.

use lyon::geom::{point, vector, Angle};
use pathforge_core::Point;
use serde::{Deserialize, Serialize};
use std::ops::Add;

pub type Matrix = lyon::geom::Transform<f64>;

/// Largest finite factor a scale tool is allowed to produce.
pub const MAX_SCALE: f64 = f64::MAX;

pub fn transform_point(m: &Matrix, p: Point) -> Point {
    let q = m.transform_point(point(p.x, p.y));
    Point::new(q.x, q.y)
}

pub fn transform_vector(m: &Matrix, v: Point) -> Point {
    let q = m.transform_vector(vector(v.x, v.y));
    Point::new(q.x, q.y)
}

/// True when the matrix only translates and scales along the axes.
pub fn is_axis_aligned(m: &Matrix) -> bool {
    m.m12.abs() < f64::EPSILON && m.m21.abs() < f64::EPSILON
}

/// Builds `matrix(a b c d e f)`.
pub fn from_svg(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Matrix {
    Matrix::new(a, b, c, d, e, f)
}

/// Skew by the given angles, in degrees.
pub fn skew_matrix(skew_x: f64, skew_y: f64) -> Matrix {
    Matrix::new(
        1.0,
        skew_y.to_radians().tan(),
        skew_x.to_radians().tan(),
        1.0,
        0.0,
        0.0,
    )
}

/// Scale about `pivot`: translate to the pivot, scale, translate back.
pub fn generate_scale_matrix(sx: f64, sy: f64, pivot: Point) -> Matrix {
    Matrix::translation(-pivot.x, -pivot.y)
        .then_scale(sx, sy)
        .then_translate(vector(pivot.x, pivot.y))
}

/// Rotation about `pivot` by `degrees`.
pub fn generate_rotate_matrix(degrees: f64, pivot: Point) -> Matrix {
    Matrix::translation(-pivot.x, -pivot.y)
        .then_rotate(Angle::degrees(degrees))
        .then_translate(vector(pivot.x, pivot.y))
}

/// Skew about `pivot` by the given angles, in degrees.
pub fn generate_skew_matrix(skew_x: f64, skew_y: f64, pivot: Point) -> Matrix {
    Matrix::translation(-pivot.x, -pivot.y)
        .then(&skew_matrix(skew_x, skew_y))
        .then_translate(vector(pivot.x, pivot.y))
}

/// Re-expresses a transform captured in screen space in element space.
///
/// `element_to_screen` is the element's full matrix to the screen, captured
/// when the gesture started. Returns `None` when it cannot be inverted.
pub fn convert_screen_matrix_to_element_matrix(
    screen: &Matrix,
    element_to_screen: &Matrix,
) -> Option<Matrix> {
    let screen_to_element = element_to_screen.inverse()?;
    Some(element_to_screen.then(screen).then(&screen_to_element))
}

/// A matrix split into translate, rotate, skew and scale components.
///
/// Recomposition order is scale, then skew, then rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecomposedMatrix {
    pub translate_x: f64,
    pub translate_y: f64,
    /// Rotation in degrees.
    pub rotate_z: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Skew along X in degrees.
    pub skew_x: f64,
    /// Skew along Y in degrees. Decomposition always folds skew into X.
    pub skew_y: f64,
    pub matrix: Matrix,
}

impl Default for DecomposedMatrix {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            rotate_z: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
            matrix: Matrix::identity(),
        }
    }
}

impl DecomposedMatrix {
    /// Recomposes the stored components into a matrix.
    pub fn compose(&self) -> Matrix {
        Matrix::scale(self.scale_x, self.scale_y)
            .then(&skew_matrix(self.skew_x, self.skew_y))
            .then_rotate(Angle::degrees(self.rotate_z))
            .then_translate(vector(self.translate_x, self.translate_y))
    }

    fn with_matrix(mut self) -> Self {
        self.matrix = self.compose();
        self
    }
}

/// Additive combination: translation, rotation and skew add, scales multiply.
impl Add for DecomposedMatrix {
    type Output = DecomposedMatrix;

    fn add(self, rhs: DecomposedMatrix) -> DecomposedMatrix {
        DecomposedMatrix {
            translate_x: self.translate_x + rhs.translate_x,
            translate_y: self.translate_y + rhs.translate_y,
            rotate_z: self.rotate_z + rhs.rotate_z,
            scale_x: self.scale_x * rhs.scale_x,
            scale_y: self.scale_y * rhs.scale_y,
            skew_x: self.skew_x + rhs.skew_x,
            skew_y: self.skew_y + rhs.skew_y,
            matrix: Matrix::identity(),
        }
        .with_matrix()
    }
}

/// Decomposes an affine matrix.
///
/// The 2x2 linear part is normalized row by row (Gram–Schmidt). A negative
/// determinant is resolved by negating whichever scale has the smaller dot
/// product with its unrotated axis.
pub fn decompose_matrix(m: &Matrix) -> DecomposedMatrix {
    let mut row0 = Point::new(m.m11, m.m12);
    let mut row1 = Point::new(m.m21, m.m22);

    let mut scale_x = row0.length();
    if scale_x > 0.0 {
        row0 = row0 * (1.0 / scale_x);
    }

    let mut shear = row0.x * row1.x + row0.y * row1.y;
    row1 = row1 - row0 * shear;

    let mut scale_y = row1.length();
    if scale_y > 0.0 {
        row1 = row1 * (1.0 / scale_y);
        shear /= scale_y;
    }

    let determinant = m.m11 * m.m22 - m.m12 * m.m21;
    if determinant < 0.0 {
        shear = -shear;
        if row0.x < row1.y {
            scale_x = -scale_x;
            row0 = -row0;
        } else {
            scale_y = -scale_y;
            row1 = -row1;
        }
    }

    let rotate_z = row0.y.atan2(row0.x).to_degrees();

    DecomposedMatrix {
        translate_x: m.m31,
        translate_y: m.m32,
        rotate_z,
        scale_x,
        scale_y,
        skew_x: shear.atan().to_degrees(),
        skew_y: 0.0,
        matrix: *m,
    }
}

/// Ellipse radii and x-axis rotation (degrees) after a linear map.
///
/// The ellipse is the image of the unit circle under
/// `rotate(phi) * diag(rx, ry)`; the new radii are the singular values of
/// the mapped matrix and the rotation is its left singular direction.
/// The first radius stays on the image of the original x radius and the
/// rotation is kept within 90 degrees of `phi_degrees`.
pub fn transform_ellipse_radii(m: &Matrix, rx: f64, ry: f64, phi_degrees: f64) -> (f64, f64, f64) {
    if is_axis_aligned(m) && m.m11.abs() == m.m22.abs() {
        let scale = m.m11.abs();
        let rotation = if m.m11 * m.m22 < 0.0 {
            -phi_degrees
        } else {
            phi_degrees
        };
        return (rx * scale, ry * scale, rotation);
    }

    let (sin_phi, cos_phi) = phi_degrees.to_radians().sin_cos();
    // Column-vector form of the linear part.
    let (a, b, c, d) = (m.m11, m.m21, m.m12, m.m22);
    let n11 = (a * cos_phi + b * sin_phi) * rx;
    let n12 = (-a * sin_phi + b * cos_phi) * ry;
    let n21 = (c * cos_phi + d * sin_phi) * rx;
    let n22 = (-c * sin_phi + d * cos_phi) * ry;

    let e = (n11 + n22) / 2.0;
    let f = (n11 - n22) / 2.0;
    let g = (n21 + n12) / 2.0;
    let h = (n21 - n12) / 2.0;
    let q = e.hypot(h);
    let r = f.hypot(g);
    let a1 = g.atan2(f);
    let a2 = h.atan2(e);

    let mut new_rx = q + r;
    let mut new_ry = (q - r).abs();
    let mut rotation = ((a2 + a1) / 2.0).to_degrees();

    // (n11, n21) is where the x radius went.
    let (sin_rot, cos_rot) = rotation.to_radians().sin_cos();
    let along = (cos_rot * n11 + sin_rot * n21).abs();
    let across = (cos_rot * n21 - sin_rot * n11).abs();
    if along < across {
        std::mem::swap(&mut new_rx, &mut new_ry);
        rotation += 90.0;
    }

    let turns = ((rotation - phi_degrees - 90.0) / 180.0).ceil();
    rotation -= turns * 180.0;
    (new_rx, new_ry, rotation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_decompose_identity() {
        let d = decompose_matrix(&Matrix::identity());
        assert!(approx(d.scale_x, 1.0) && approx(d.scale_y, 1.0));
        assert!(approx(d.rotate_z, 0.0));
        assert!(approx(d.translate_x, 0.0) && approx(d.translate_y, 0.0));
    }

    #[test]
    fn test_decompose_rotation() {
        let d = decompose_matrix(&from_svg(0.0, 1.0, -1.0, 0.0, 0.0, 0.0));
        assert!(approx(d.rotate_z, 90.0));
        assert!(approx(d.scale_x, 1.0) && approx(d.scale_y, 1.0));
    }

    #[test]
    fn test_decompose_flip() {
        let d = decompose_matrix(&Matrix::scale(-2.0, 3.0));
        assert!(approx(d.scale_x, -2.0));
        assert!(approx(d.scale_y, 3.0));
        assert!(approx(d.rotate_z, 0.0));
    }

    #[test]
    fn test_scale_matrix_keeps_pivot() {
        let pivot = Point::new(10.0, 20.0);
        let m = generate_scale_matrix(3.0, 0.5, pivot);
        assert!(transform_point(&m, pivot).approx_eq(&pivot, 1e-12));
        let p = transform_point(&m, Point::new(12.0, 24.0));
        assert!(p.approx_eq(&Point::new(16.0, 22.0), 1e-12));
    }

    #[test]
    fn test_screen_to_element_translation() {
        // Element drawn at 2x zoom: a 10px screen move is 5 units locally.
        let element_to_screen = Matrix::scale(2.0, 2.0);
        let screen = Matrix::translation(10.0, 0.0);
        let local = convert_screen_matrix_to_element_matrix(&screen, &element_to_screen).unwrap();
        assert!(transform_point(&local, Point::ZERO).approx_eq(&Point::new(5.0, 0.0), 1e-12));
    }

    #[test]
    fn test_singular_frame_has_no_conversion() {
        let singular = Matrix::scale(0.0, 1.0);
        assert!(convert_screen_matrix_to_element_matrix(&Matrix::identity(), &singular).is_none());
    }

    #[test]
    fn test_ellipse_radii_under_rotation() {
        let m = Matrix::rotation(Angle::degrees(30.0)).then_scale(2.0, 2.0);
        let (rx, ry, rotation) = transform_ellipse_radii(&m, 5.0, 3.0, 0.0);
        assert!(approx(rx, 10.0));
        assert!(approx(ry, 6.0));
        assert!(approx(rotation, 30.0));
    }

    #[test]
    fn test_ellipse_radii_keep_order_under_translation() {
        let m = Matrix::translation(1.0, 0.0);
        assert_eq!(transform_ellipse_radii(&m, 3.0, 5.0, 0.0), (3.0, 5.0, 0.0));
        let mirror = Matrix::scale(-2.0, 2.0);
        assert_eq!(transform_ellipse_radii(&mirror, 3.0, 5.0, 20.0), (6.0, 10.0, -20.0));
    }

    #[test]
    fn test_ellipse_radii_follow_x_axis() {
        let m = Matrix::rotation(Angle::degrees(90.0));
        let (rx, ry, rotation) = transform_ellipse_radii(&m, 3.0, 5.0, 0.0);
        assert!(approx(rx, 3.0) && approx(ry, 5.0));
        assert!(approx(rotation, 90.0));

        let (rx, ry, rotation) = transform_ellipse_radii(&Matrix::scale(1.0, 2.0), 3.0, 5.0, 0.0);
        assert!(approx(rx, 3.0) && approx(ry, 10.0));
        assert!(approx(rotation, 0.0));
    }
}
