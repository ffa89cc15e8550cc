//! Curve primitives: elliptical arcs and quadratic/cubic Béziers.
//!
//! Everything here is a pure function of its inputs. Bézier lengths are
//! integrated with a 20-point Gauss–Legendre rule on the speed function;
//! elliptical arc lengths are approximated by a polyline with a configurable
//! number of samples. The arc approximation is intentionally inexact and
//! callers pick the resolution (see [`EditorSettings`]).
//!
//! [`EditorSettings`]: pathforge_core::EditorSettings

use lyon::geom::{point, vector, Angle, Box2D, CubicBezierSegment, QuadraticBezierSegment};
use pathforge_core::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Positive abscissae of the 20-point Gauss–Legendre rule on [-1, 1].
const GAUSS_ABSCISSAE: [f64; 10] = [
    0.076_526_521_133_497_33,
    0.227_785_851_141_645_08,
    0.373_706_088_715_419_56,
    0.510_867_001_950_827_1,
    0.636_053_680_726_515_0,
    0.746_331_906_460_150_8,
    0.839_116_971_822_218_8,
    0.912_234_428_251_325_9,
    0.963_971_927_277_913_8,
    0.993_128_599_185_094_9,
];

/// Weights matching [`GAUSS_ABSCISSAE`] (each used for +x and -x).
const GAUSS_WEIGHTS: [f64; 10] = [
    0.152_753_387_130_725_85,
    0.149_172_986_472_603_75,
    0.142_096_109_318_382_05,
    0.131_688_638_449_176_63,
    0.118_194_531_961_518_42,
    0.101_930_119_817_240_44,
    0.083_276_741_576_704_75,
    0.062_672_048_334_109_06,
    0.040_601_429_800_386_94,
    0.017_614_007_139_152_118,
];

pub fn cubic_point(p: &[Point; 4], t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p[0].x + b * p[1].x + c * p[2].x + d * p[3].x,
        a * p[0].y + b * p[1].y + c * p[2].y + d * p[3].y,
    )
}

pub fn cubic_derivative(p: &[Point; 4], t: f64) -> Point {
    let mt = 1.0 - t;
    let a = 3.0 * mt * mt;
    let b = 6.0 * mt * t;
    let c = 3.0 * t * t;
    Point::new(
        a * (p[1].x - p[0].x) + b * (p[2].x - p[1].x) + c * (p[3].x - p[2].x),
        a * (p[1].y - p[0].y) + b * (p[2].y - p[1].y) + c * (p[3].y - p[2].y),
    )
}

pub fn quadratic_point(p: &[Point; 3], t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt;
    let b = 2.0 * mt * t;
    let c = t * t;
    Point::new(
        a * p[0].x + b * p[1].x + c * p[2].x,
        a * p[0].y + b * p[1].y + c * p[2].y,
    )
}

pub fn quadratic_derivative(p: &[Point; 3], t: f64) -> Point {
    let mt = 1.0 - t;
    Point::new(
        2.0 * mt * (p[1].x - p[0].x) + 2.0 * t * (p[2].x - p[1].x),
        2.0 * mt * (p[1].y - p[0].y) + 2.0 * t * (p[2].y - p[1].y),
    )
}

/// Integrates `|speed(u)|` over `[0, t]` with the Gauss–Legendre rule.
fn integrate_speed<F: Fn(f64) -> Point>(speed: F, t: f64) -> f64 {
    let half = t / 2.0;
    let mut sum = 0.0;
    for (x, w) in GAUSS_ABSCISSAE.iter().zip(GAUSS_WEIGHTS.iter()) {
        sum += w * speed(half * x + half).length();
        sum += w * speed(-half * x + half).length();
    }
    half * sum
}

/// Length of the cubic from `t = 0` up to `t`.
pub fn cubic_length(p: &[Point; 4], t: f64) -> f64 {
    integrate_speed(|u| cubic_derivative(p, u), t.clamp(0.0, 1.0))
}

/// Length of the quadratic from `t = 0` up to `t`.
pub fn quadratic_length(p: &[Point; 3], t: f64) -> f64 {
    integrate_speed(|u| quadratic_derivative(p, u), t.clamp(0.0, 1.0))
}

/// Splits a cubic at `t` (de Casteljau), returning both halves.
pub fn split_cubic(p: &[Point; 4], t: f64) -> ([Point; 4], [Point; 4]) {
    let p01 = p[0].lerp(&p[1], t);
    let p12 = p[1].lerp(&p[2], t);
    let p23 = p[2].lerp(&p[3], t);
    let p012 = p01.lerp(&p12, t);
    let p123 = p12.lerp(&p23, t);
    let mid = p012.lerp(&p123, t);
    ([p[0], p01, p012, mid], [mid, p123, p23, p[3]])
}

/// Splits a quadratic at `t` (de Casteljau), returning both halves.
pub fn split_quadratic(p: &[Point; 3], t: f64) -> ([Point; 3], [Point; 3]) {
    let p01 = p[0].lerp(&p[1], t);
    let p12 = p[1].lerp(&p[2], t);
    let mid = p01.lerp(&p12, t);
    ([p[0], p01, mid], [mid, p12, p[2]])
}

fn to_lyon(p: Point) -> lyon::geom::Point<f64> {
    point(p.x, p.y)
}

fn rect_from_box(b: Box2D<f64>) -> Rect {
    Rect::from_corners(Point::new(b.min.x, b.min.y), Point::new(b.max.x, b.max.y))
}

pub fn cubic_bounds(p: &[Point; 4]) -> Rect {
    let segment = CubicBezierSegment {
        from: to_lyon(p[0]),
        ctrl1: to_lyon(p[1]),
        ctrl2: to_lyon(p[2]),
        to: to_lyon(p[3]),
    };
    rect_from_box(segment.bounding_box())
}

pub fn quadratic_bounds(p: &[Point; 3]) -> Rect {
    let segment = QuadraticBezierSegment {
        from: to_lyon(p[0]),
        ctrl: to_lyon(p[1]),
        to: to_lyon(p[2]),
    };
    rect_from_box(segment.bounding_box())
}

/// An elliptical arc in SVG endpoint parameterization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndpointArc {
    pub from: Point,
    pub rx: f64,
    pub ry: f64,
    /// Rotation of the ellipse x axis, in degrees.
    pub x_rotation: f64,
    pub large_arc: bool,
    pub sweep: bool,
    pub to: Point,
}

/// The same arc in center parameterization. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterArc {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    pub phi: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl CenterArc {
    pub fn point_at_angle(&self, angle: f64) -> Point {
        let (sin_a, cos_a) = angle.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Point::new(
            self.center.x + self.rx * cos_a * cos_phi - self.ry * sin_a * sin_phi,
            self.center.y + self.rx * cos_a * sin_phi + self.ry * sin_a * cos_phi,
        )
    }
}

fn angle_between(u: Point, v: Point) -> f64 {
    let dot = u.x * v.x + u.y * v.y;
    let det = u.x * v.y - u.y * v.x;
    det.atan2(dot)
}

impl EndpointArc {
    /// Converts to center parameterization.
    ///
    /// Returns `None` when the arc degenerates to a straight line: coincident
    /// endpoints or a zero radius.
    pub fn to_center(&self) -> Option<CenterArc> {
        if self.from.approx_eq(&self.to, f64::EPSILON)
            || self.rx.abs() < f64::EPSILON
            || self.ry.abs() < f64::EPSILON
        {
            return None;
        }

        let mut rx = self.rx.abs();
        let mut ry = self.ry.abs();
        let phi = self.x_rotation.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        let dx2 = (self.from.x - self.to.x) / 2.0;
        let dy2 = (self.from.y - self.to.y) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        // Radii too small to span the endpoints are scaled up uniformly.
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let denom = rx2 * y1p * y1p + ry2 * x1p * x1p;
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let numer = (rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p).max(0.0);

        let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
        let coef = sign * (numer / denom).sqrt();
        let cxp = coef * (rx * y1p / ry);
        let cyp = coef * (-ry * x1p / rx);

        let center = Point::new(
            cos_phi * cxp - sin_phi * cyp + (self.from.x + self.to.x) / 2.0,
            sin_phi * cxp + cos_phi * cyp + (self.from.y + self.to.y) / 2.0,
        );

        let u = Point::new((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v = Point::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let start_angle = angle_between(Point::new(1.0, 0.0), u);
        let mut sweep_angle = angle_between(u, v);
        if !self.sweep && sweep_angle > 0.0 {
            sweep_angle -= TAU;
        } else if self.sweep && sweep_angle < 0.0 {
            sweep_angle += TAU;
        }

        Some(CenterArc {
            center,
            rx,
            ry,
            phi,
            start_angle,
            sweep_angle,
        })
    }

    /// Point at angular fraction `t` of the sweep.
    pub fn point_at(&self, t: f64) -> Point {
        match self.to_center() {
            Some(arc) => arc.point_at_angle(arc.start_angle + arc.sweep_angle * t),
            None => self.from.lerp(&self.to, t),
        }
    }

    /// Derivative with respect to the angular fraction `t`.
    pub fn derivative(&self, t: f64) -> Point {
        match self.to_center() {
            Some(arc) => {
                let angle = arc.start_angle + arc.sweep_angle * t;
                let (sin_a, cos_a) = angle.sin_cos();
                let (sin_phi, cos_phi) = arc.phi.sin_cos();
                Point::new(
                    arc.sweep_angle * (-arc.rx * sin_a * cos_phi - arc.ry * cos_a * sin_phi),
                    arc.sweep_angle * (-arc.rx * sin_a * sin_phi + arc.ry * cos_a * cos_phi),
                )
            }
            None => self.to - self.from,
        }
    }

    /// Polyline length of the whole arc using `resolution` samples.
    pub fn length(&self, resolution: usize) -> f64 {
        self.length_at(1.0, resolution)
    }

    /// Polyline length from the start up to angular fraction `t`.
    pub fn length_at(&self, t: f64, resolution: usize) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let Some(arc) = self.to_center() else {
            return self.from.distance_to(&self.to) * t;
        };

        let samples = ((resolution.max(1) as f64) * t).ceil().max(1.0) as usize;
        let mut previous = arc.point_at_angle(arc.start_angle);
        let mut length = 0.0;
        for i in 1..=samples {
            let fraction = t * i as f64 / samples as f64;
            let current = arc.point_at_angle(arc.start_angle + arc.sweep_angle * fraction);
            length += previous.distance_to(&current);
            previous = current;
        }
        length
    }

    pub fn bounds(&self) -> Rect {
        match self.to_center() {
            Some(arc) => {
                let lyon_arc = lyon::geom::Arc {
                    center: to_lyon(arc.center),
                    radii: vector(arc.rx, arc.ry),
                    start_angle: Angle::radians(arc.start_angle),
                    sweep_angle: Angle::radians(arc.sweep_angle),
                    x_rotation: Angle::radians(arc.phi),
                };
                rect_from_box(lyon_arc.bounding_box())
            }
            None => Rect::from_corners(self.from, self.to),
        }
    }
}

/// Finds the curve parameter whose partial length equals `length`.
///
/// Starts at `length / total` and walks with a shrinking step. Stops once the
/// error drops below `tolerance` or after `max_iterations`; the result is an
/// approximation by construction.
pub fn t_at_length<F: Fn(f64) -> f64>(
    length: f64,
    total: f64,
    length_at: F,
    tolerance: f64,
    max_iterations: usize,
) -> f64 {
    if !(total > 0.0) || length <= 0.0 {
        return 0.0;
    }
    if length >= total {
        return 1.0;
    }

    let mut t = length / total;
    let mut step = 0.1;
    let mut error = (length_at(t) - length).abs();
    let mut iterations = 0;

    while error >= tolerance && iterations < max_iterations {
        let up = (t + step).min(1.0);
        let down = (t - step).max(0.0);
        let error_up = (length_at(up) - length).abs();
        let error_down = (length_at(down) - length).abs();

        if error_up < error && error_up <= error_down {
            t = up;
            error = error_up;
        } else if error_down < error {
            t = down;
            error = error_down;
        } else {
            step /= 2.0;
        }
        iterations += 1;
    }

    t
}
