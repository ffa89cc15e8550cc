//! A single path command and its absolute-coordinate view.

use pathforge_core::{PathError, Point};
use smallvec::SmallVec;

use crate::geometry::EndpointArc;
use crate::matrix::{transform_ellipse_radii, transform_point, Matrix};

/// The ten SVG command kinds. Letter case is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    MoveTo,
    LineTo,
    HorizontalTo,
    VerticalTo,
    CubicTo,
    SmoothCubicTo,
    QuadTo,
    SmoothQuadTo,
    ArcTo,
    Close,
}

impl CommandType {
    /// Parses one of the 20 path letters into a kind and a relative flag.
    pub fn from_letter(letter: char) -> Option<(Self, bool)> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => Self::MoveTo,
            'L' => Self::LineTo,
            'H' => Self::HorizontalTo,
            'V' => Self::VerticalTo,
            'C' => Self::CubicTo,
            'S' => Self::SmoothCubicTo,
            'Q' => Self::QuadTo,
            'T' => Self::SmoothQuadTo,
            'A' => Self::ArcTo,
            'Z' => Self::Close,
            _ => return None,
        };
        Some((kind, letter.is_ascii_lowercase()))
    }

    /// The absolute (uppercase) letter.
    pub fn letter(self) -> char {
        match self {
            Self::MoveTo => 'M',
            Self::LineTo => 'L',
            Self::HorizontalTo => 'H',
            Self::VerticalTo => 'V',
            Self::CubicTo => 'C',
            Self::SmoothCubicTo => 'S',
            Self::QuadTo => 'Q',
            Self::SmoothQuadTo => 'T',
            Self::ArcTo => 'A',
            Self::Close => 'Z',
        }
    }

    pub fn operand_count(self) -> usize {
        match self {
            Self::Close => 0,
            Self::HorizontalTo | Self::VerticalTo => 1,
            Self::MoveTo | Self::LineTo | Self::SmoothQuadTo => 2,
            Self::SmoothCubicTo | Self::QuadTo => 4,
            Self::CubicTo => 6,
            Self::ArcTo => 7,
        }
    }

    pub fn is_cubic(self) -> bool {
        matches!(self, Self::CubicTo | Self::SmoothCubicTo)
    }

    pub fn is_quadratic(self) -> bool {
        matches!(self, Self::QuadTo | Self::SmoothQuadTo)
    }

    /// Commands whose first control point is implied by their predecessor.
    pub fn is_smooth(self) -> bool {
        matches!(self, Self::SmoothCubicTo | Self::SmoothQuadTo)
    }
}

/// Derived absolute points, recomputed whenever the owning path changes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct AbsoluteCache {
    pub start: Point,
    pub end: Point,
    pub handle_a: Option<Point>,
    pub handle_b: Option<Point>,
}

pub(crate) type Operands = SmallVec<[f64; 7]>;

/// One command of a [`PathData`](super::PathData).
///
/// Operands are always stored in absolute coordinates; `save_as_relative`
/// only decides the letter case used when the path is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub(crate) kind: CommandType,
    pub(crate) values: Operands,
    pub(crate) save_as_relative: bool,
    pub(crate) cache: AbsoluteCache,
}

impl PathCommand {
    /// Builds an absolute command, checking the operand count.
    pub fn new(kind: CommandType, values: &[f64]) -> Result<Self, PathError> {
        if values.len() != kind.operand_count() {
            return Err(PathError::OperandCount {
                letter: kind.letter(),
                expected: kind.operand_count(),
                actual: values.len(),
            });
        }
        Ok(Self::from_operands(kind, values.iter().copied().collect()))
    }

    pub(crate) fn from_operands(kind: CommandType, values: Operands) -> Self {
        Self {
            kind,
            values,
            save_as_relative: false,
            cache: AbsoluteCache::default(),
        }
    }

    pub fn move_to(p: Point) -> Self {
        Self::from_operands(CommandType::MoveTo, [p.x, p.y].into_iter().collect())
    }

    pub fn line_to(p: Point) -> Self {
        Self::from_operands(CommandType::LineTo, [p.x, p.y].into_iter().collect())
    }

    pub fn cubic_to(c1: Point, c2: Point, p: Point) -> Self {
        Self::from_operands(
            CommandType::CubicTo,
            [c1.x, c1.y, c2.x, c2.y, p.x, p.y].into_iter().collect(),
        )
    }

    pub fn quad_to(c: Point, p: Point) -> Self {
        Self::from_operands(CommandType::QuadTo, [c.x, c.y, p.x, p.y].into_iter().collect())
    }

    pub fn arc_to(rx: f64, ry: f64, x_rotation: f64, large_arc: bool, sweep: bool, p: Point) -> Self {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        Self::from_operands(
            CommandType::ArcTo,
            [rx, ry, x_rotation, flag(large_arc), flag(sweep), p.x, p.y]
                .into_iter()
                .collect(),
        )
    }

    pub fn close() -> Self {
        Self::from_operands(CommandType::Close, Operands::new())
    }

    pub fn kind(&self) -> CommandType {
        self.kind
    }

    /// Letter as it will be serialized, honoring the relative preference.
    pub fn letter(&self) -> char {
        let letter = self.kind.letter();
        if self.save_as_relative {
            letter.to_ascii_lowercase()
        } else {
            letter
        }
    }

    pub fn is_relative(&self) -> bool {
        self.save_as_relative
    }

    pub fn set_relative(&mut self, relative: bool) {
        self.save_as_relative = relative;
    }

    /// Absolute operands.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Absolute end point.
    pub fn point(&self) -> Point {
        self.cache.end
    }

    /// Absolute point the command starts from.
    pub fn start(&self) -> Point {
        self.cache.start
    }

    /// First control point of a curve, including the implied one of `S`/`T`.
    pub fn handle_a(&self) -> Option<Point> {
        self.cache.handle_a
    }

    /// Second control point of a cubic.
    pub fn handle_b(&self) -> Option<Point> {
        self.cache.handle_b
    }

    /// Control polygon of a cubic command.
    pub fn cubic_points(&self) -> Option<[Point; 4]> {
        match (self.kind.is_cubic(), self.cache.handle_a, self.cache.handle_b) {
            (true, Some(a), Some(b)) => Some([self.cache.start, a, b, self.cache.end]),
            _ => None,
        }
    }

    /// Control polygon of a quadratic command.
    pub fn quadratic_points(&self) -> Option<[Point; 3]> {
        match (self.kind.is_quadratic(), self.cache.handle_a) {
            (true, Some(a)) => Some([self.cache.start, a, self.cache.end]),
            _ => None,
        }
    }

    /// Endpoint parameterization of an arc command.
    pub fn arc(&self) -> Option<EndpointArc> {
        if self.kind != CommandType::ArcTo {
            return None;
        }
        let v = &self.values;
        Some(EndpointArc {
            from: self.cache.start,
            rx: v[0],
            ry: v[1],
            x_rotation: v[2],
            large_arc: v[3] != 0.0,
            sweep: v[4] != 0.0,
            to: self.cache.end,
        })
    }

    /// Indices of the operands that hold x/y coordinate pairs.
    fn coordinate_pairs(&self) -> &'static [usize] {
        match self.kind {
            CommandType::MoveTo | CommandType::LineTo | CommandType::SmoothQuadTo => &[0],
            CommandType::SmoothCubicTo | CommandType::QuadTo => &[0, 2],
            CommandType::CubicTo => &[0, 2, 4],
            CommandType::ArcTo => &[5],
            CommandType::HorizontalTo | CommandType::VerticalTo | CommandType::Close => &[],
        }
    }

    /// Translates every coordinate operand.
    pub fn offset(&mut self, dx: f64, dy: f64) {
        for &i in self.coordinate_pairs() {
            self.values[i] += dx;
            self.values[i + 1] += dy;
        }
        match self.kind {
            CommandType::HorizontalTo => self.values[0] += dx,
            CommandType::VerticalTo => self.values[0] += dy,
            _ => {}
        }
    }

    /// Applies an affine matrix to the operands.
    ///
    /// `H`/`V` stay valid only under axis-aligned matrices; the owning path
    /// rewrites them as lines before applying anything else.
    pub fn apply_matrix(&mut self, m: &Matrix) {
        for &i in self.coordinate_pairs() {
            let p = transform_point(m, Point::new(self.values[i], self.values[i + 1]));
            self.values[i] = p.x;
            self.values[i + 1] = p.y;
        }
        match self.kind {
            CommandType::HorizontalTo => self.values[0] = m.m11 * self.values[0] + m.m31,
            CommandType::VerticalTo => self.values[0] = m.m22 * self.values[0] + m.m32,
            CommandType::ArcTo => {
                let (rx, ry, rotation) =
                    transform_ellipse_radii(m, self.values[0], self.values[1], self.values[2]);
                self.values[0] = rx;
                self.values[1] = ry;
                self.values[2] = rotation;
                if m.determinant() < 0.0 {
                    self.values[4] = if self.values[4] != 0.0 { 0.0 } else { 1.0 };
                }
            }
            _ => {}
        }
    }

    /// Operands as they are written out: relative to the start point when
    /// the command is saved as relative.
    pub(crate) fn output_values(&self) -> Operands {
        let mut out = self.values.clone();
        if !self.save_as_relative {
            return out;
        }
        let origin = self.cache.start;
        for &i in self.coordinate_pairs() {
            out[i] -= origin.x;
            out[i + 1] -= origin.y;
        }
        match self.kind {
            CommandType::HorizontalTo => out[0] -= origin.x,
            CommandType::VerticalTo => out[0] -= origin.y,
            _ => {}
        }
        out
    }
}
