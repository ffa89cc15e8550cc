//! Interactive translate / scale / rotate / skew tools.
//!
//! A [`TransformAction`] captures the node's starting geometry in
//! [`TransformAction::init`] and then recomputes the whole transform from that
//! snapshot on every pointer move, so rounding never accumulates. Translate
//! and rotate are measured on screen and converted to the element frame;
//! scale and skew are measured directly in the element frame against its
//! bounding box.

use pathforge_core::{HostError, Point, Rect};
use serde::{Deserialize, Serialize};

use crate::matrix::{
    convert_screen_matrix_to_element_matrix, generate_rotate_matrix, generate_scale_matrix,
    generate_skew_matrix, transform_point, Matrix, MAX_SCALE,
};
use crate::node::{
    AttrValue, NodeHost, NodeId, NodeKind, ELLIPSE_ATTRS, PATH_DATA_ATTR, RECT_ATTRS,
    TRANSFORM_ATTR,
};
use crate::path::PathData;

const MATRIX_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    Translate,
    Scale,
    Rotate,
    Skew,
}

impl TransformKind {
    pub fn label(self) -> &'static str {
        match self {
            TransformKind::Translate => "Move",
            TransformKind::Scale => "Scale",
            TransformKind::Rotate => "Rotate",
            TransformKind::Skew => "Skew",
        }
    }
}

/// Where the computed transform is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformTarget {
    /// The node's `transform` matrix.
    Matrix,
    /// `x`/`y`/`width`/`height` of a rect.
    Rect,
    /// `cx`/`cy`/`rx`/`ry` of an ellipse.
    Ellipse,
    /// The path data itself.
    Path,
}

impl TransformTarget {
    /// Paths always bake the transform into their data. Rects and ellipses
    /// edit their geometry for moves and scales, which stay axis aligned,
    /// and fall back to the matrix for rotation and skew.
    pub fn select(kind: TransformKind, node: NodeKind) -> Self {
        match (node, kind) {
            (NodeKind::Path, _) => TransformTarget::Path,
            (NodeKind::Rect, TransformKind::Translate | TransformKind::Scale) => {
                TransformTarget::Rect
            }
            (NodeKind::Ellipse, TransformKind::Translate | TransformKind::Scale) => {
                TransformTarget::Ellipse
            }
            _ => TransformTarget::Matrix,
        }
    }

    /// Attributes written by this target.
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            TransformTarget::Matrix => &[TRANSFORM_ATTR],
            TransformTarget::Rect => &RECT_ATTRS,
            TransformTarget::Ellipse => &ELLIPSE_ATTRS,
            TransformTarget::Path => &[PATH_DATA_ATTR],
        }
    }
}

/// The eight bounding-box handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandlePosition {
    TopLeft,
    Top,
    TopRight,
    Right,
    #[default]
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl HandlePosition {
    /// Horizontal and vertical placement in `-1..=1`, with `-1` at min.
    fn offsets(self) -> (f64, f64) {
        match self {
            HandlePosition::TopLeft => (-1.0, -1.0),
            HandlePosition::Top => (0.0, -1.0),
            HandlePosition::TopRight => (1.0, -1.0),
            HandlePosition::Right => (1.0, 0.0),
            HandlePosition::BottomRight => (1.0, 1.0),
            HandlePosition::Bottom => (0.0, 1.0),
            HandlePosition::BottomLeft => (-1.0, 1.0),
            HandlePosition::Left => (-1.0, 0.0),
        }
    }

    pub fn point(self, bbox: &Rect) -> Point {
        let (ox, oy) = self.offsets();
        let center = bbox.center();
        Point::new(
            center.x + ox * bbox.width / 2.0,
            center.y + oy * bbox.height / 2.0,
        )
    }

    pub fn opposite(self) -> Self {
        match self {
            HandlePosition::TopLeft => HandlePosition::BottomRight,
            HandlePosition::Top => HandlePosition::Bottom,
            HandlePosition::TopRight => HandlePosition::BottomLeft,
            HandlePosition::Right => HandlePosition::Left,
            HandlePosition::BottomRight => HandlePosition::TopLeft,
            HandlePosition::Bottom => HandlePosition::Top,
            HandlePosition::BottomLeft => HandlePosition::TopRight,
            HandlePosition::Left => HandlePosition::Right,
        }
    }

    pub fn moves_x(self) -> bool {
        self.offsets().0 != 0.0
    }

    pub fn moves_y(self) -> bool {
        self.offsets().1 != 0.0
    }
}

/// Which handle a gesture grabbed and how it is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandleDescriptor {
    pub position: HandlePosition,
    /// Scale about the bbox center instead of the opposite handle.
    pub from_center: bool,
    /// Scale both axes by the same factor.
    pub keep_ratio: bool,
}

impl HandleDescriptor {
    pub fn new(position: HandlePosition) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Node geometry captured when the gesture starts.
#[derive(Debug, Clone, PartialEq)]
enum InitialGeometry {
    Matrix(Matrix),
    Rect(Rect),
    Ellipse { center: Point, rx: f64, ry: f64 },
    Path(PathData),
}

#[derive(Debug, Clone, PartialEq)]
struct Captured {
    target: TransformTarget,
    geometry: InitialGeometry,
    bbox: Rect,
    element_to_screen: Matrix,
    screen_to_element: Option<Matrix>,
}

/// One interactive transform gesture on a single node.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformAction {
    kind: TransformKind,
    node: NodeId,
    start: Point,
    handle: HandleDescriptor,
    captured: Option<Captured>,
    current: Matrix,
}

/// Replaces NaN with 1 and clamps infinities to the largest finite scale.
fn sanitize_scale(factor: f64) -> f64 {
    if factor.is_nan() {
        1.0
    } else if factor.is_infinite() {
        MAX_SCALE.copysign(factor)
    } else {
        factor
    }
}

fn scale_factor(moved_to: f64, anchor: f64, pivot: f64) -> f64 {
    let extent = anchor - pivot;
    if extent.abs() < f64::EPSILON {
        return 1.0;
    }
    sanitize_scale((moved_to - pivot) / extent)
}

fn matrices_equal(a: &Matrix, b: &Matrix) -> bool {
    a.to_array()
        .iter()
        .zip(b.to_array().iter())
        .all(|(x, y)| (x - y).abs() <= MATRIX_EPSILON)
}

impl TransformAction {
    /// A gesture of `kind` on `node` starting at `screen_start`.
    ///
    /// `handle` is only consulted by scale and skew.
    pub fn new(
        kind: TransformKind,
        node: NodeId,
        screen_start: Point,
        handle: HandleDescriptor,
    ) -> Self {
        Self {
            kind,
            node,
            start: screen_start,
            handle,
            captured: None,
            current: Matrix::identity(),
        }
    }

    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn handle(&self) -> HandleDescriptor {
        self.handle
    }

    /// Target chosen at `init`, if initialized.
    pub fn target(&self) -> Option<TransformTarget> {
        self.captured.as_ref().map(|c| c.target)
    }

    /// Element-frame matrix applied by the last pointer move.
    pub fn current_matrix(&self) -> Matrix {
        self.current
    }

    /// Captures starting geometry, bounding box and screen frame.
    pub fn init(&mut self, host: &dyn NodeHost) -> Result<(), HostError> {
        let id = self.node;
        let node_kind = host.kind(id).ok_or(HostError::NodeNotFound { id })?;
        let target = TransformTarget::select(self.kind, node_kind);

        let geometry = match target {
            TransformTarget::Matrix => InitialGeometry::Matrix(host.matrix(id)),
            TransformTarget::Rect => InitialGeometry::Rect(Rect::new(
                host.number(id, "x")?,
                host.number(id, "y")?,
                host.number(id, "width")?,
                host.number(id, "height")?,
            )),
            TransformTarget::Ellipse => InitialGeometry::Ellipse {
                center: Point::new(host.number(id, "cx")?, host.number(id, "cy")?),
                rx: host.number(id, "rx")?,
                ry: host.number(id, "ry")?,
            },
            TransformTarget::Path => InitialGeometry::Path(host.path_data(id)?),
        };

        let element_to_screen = host.screen_ctm(id).ok_or(HostError::NodeNotFound { id })?;
        let bbox = host.bbox(id).unwrap_or_default();
        tracing::debug!(id, kind = ?self.kind, ?target, "Transform started");

        self.captured = Some(Captured {
            target,
            geometry,
            bbox,
            element_to_screen,
            screen_to_element: element_to_screen.inverse(),
        });
        self.current = Matrix::identity();
        Ok(())
    }

    /// Element-frame transform for the pointer at `screen`, or `None` when
    /// the geometry is degenerate.
    fn compute(&self, captured: &Captured, screen: Point) -> Option<Matrix> {
        let to_element = captured.screen_to_element?;
        let bbox = &captured.bbox;

        match self.kind {
            TransformKind::Translate => {
                let delta = screen - self.start;
                convert_screen_matrix_to_element_matrix(
                    &Matrix::translation(delta.x, delta.y),
                    &captured.element_to_screen,
                )
            }
            TransformKind::Rotate => {
                let pivot = transform_point(&captured.element_to_screen, bbox.center());
                let from = self.start - pivot;
                let to = screen - pivot;
                if from.length() < f64::EPSILON || to.length() < f64::EPSILON {
                    return None;
                }
                let degrees = (to.y.atan2(to.x) - from.y.atan2(from.x)).to_degrees();
                convert_screen_matrix_to_element_matrix(
                    &generate_rotate_matrix(degrees, pivot),
                    &captured.element_to_screen,
                )
            }
            TransformKind::Scale => {
                let start = transform_point(&to_element, self.start);
                let current = transform_point(&to_element, screen);
                let anchor = self.handle.position.point(bbox);
                let moved = anchor + (current - start);
                let pivot = if self.handle.from_center {
                    bbox.center()
                } else {
                    self.handle.position.opposite().point(bbox)
                };

                let mut sx = if self.handle.position.moves_x() {
                    scale_factor(moved.x, anchor.x, pivot.x)
                } else {
                    1.0
                };
                let mut sy = if self.handle.position.moves_y() {
                    scale_factor(moved.y, anchor.y, pivot.y)
                } else {
                    1.0
                };
                if self.handle.keep_ratio {
                    let factor = match (self.handle.position.moves_x(), self.handle.position.moves_y()) {
                        (true, false) => sx,
                        (false, true) => sy,
                        _ if sx.abs() >= sy.abs() => sx,
                        _ => sy,
                    };
                    sx = factor;
                    sy = factor;
                }
                Some(generate_scale_matrix(sx, sy, pivot))
            }
            TransformKind::Skew => {
                let start = transform_point(&to_element, self.start);
                let current = transform_point(&to_element, screen);
                let delta = current - start;
                let anchor = self.handle.position.point(bbox);
                let pivot = self.handle.position.opposite().point(bbox);

                if self.handle.position.moves_y() {
                    let extent = anchor.y - pivot.y;
                    if extent.abs() < f64::EPSILON {
                        return None;
                    }
                    let angle = (delta.x / extent).atan().to_degrees();
                    Some(generate_skew_matrix(angle, 0.0, pivot))
                } else {
                    let extent = anchor.x - pivot.x;
                    if extent.abs() < f64::EPSILON {
                        return None;
                    }
                    let angle = (delta.y / extent).atan().to_degrees();
                    Some(generate_skew_matrix(0.0, angle, pivot))
                }
            }
        }
    }

    /// Attribute values produced by `local`, or `None` when any of them is
    /// not finite.
    fn updated_values(
        &self,
        captured: &Captured,
        local: &Matrix,
    ) -> Option<Vec<(&'static str, AttrValue)>> {
        let numbers = |names: [&'static str; 4], values: [f64; 4]| {
            values.iter().all(|v| v.is_finite()).then(|| {
                names
                    .into_iter()
                    .zip(values)
                    .map(|(name, v)| (name, AttrValue::Number(v)))
                    .collect::<Vec<_>>()
            })
        };

        match &captured.geometry {
            InitialGeometry::Matrix(initial) => {
                let matrix = local.then(initial);
                matrix
                    .to_array()
                    .iter()
                    .all(|v| v.is_finite())
                    .then(|| vec![(TRANSFORM_ATTR, AttrValue::Matrix(matrix))])
            }
            InitialGeometry::Path(data) => {
                let mut data = data.clone();
                data.apply_matrix(local);
                data.is_finite()
                    .then(|| vec![(PATH_DATA_ATTR, AttrValue::Path(data))])
            }
            InitialGeometry::Rect(rect) => {
                let moved = Rect::from_corners(
                    transform_point(local, rect.min()),
                    transform_point(local, rect.max()),
                );
                numbers(RECT_ATTRS, [moved.x, moved.y, moved.width, moved.height])
            }
            InitialGeometry::Ellipse { center, rx, ry } => {
                let c = transform_point(local, *center);
                numbers(
                    ELLIPSE_ATTRS,
                    [c.x, c.y, rx * local.m11.abs(), ry * local.m22.abs()],
                )
            }
        }
    }

    /// Recomputes the transform for the pointer at `screen` and writes it.
    ///
    /// Returns `true` when the node changed. Degenerate input (uninitialized
    /// action, singular screen frame, zero-size box, a result that is not
    /// finite) leaves the node alone and returns `false`.
    pub fn transform_by_mouse(&mut self, host: &mut dyn NodeHost, screen: Point) -> bool {
        let Some(captured) = self.captured.as_ref() else {
            tracing::warn!(node = self.node, "Transform used before init");
            return false;
        };
        let Some(local) = self.compute(captured, screen) else {
            return false;
        };
        if !local.to_array().iter().all(|v| v.is_finite()) || matrices_equal(&local, &self.current) {
            return false;
        }

        let Some(values) = self.updated_values(captured, &local) else {
            tracing::warn!(node = self.node, "Transform overflows the geometry, ignored");
            return false;
        };
        for (name, value) in values {
            if let Err(err) = host.set_attribute(self.node, name, Some(value)) {
                tracing::warn!(node = self.node, %err, "Transform could not be applied");
                return false;
            }
        }
        self.current = local;
        true
    }
}
