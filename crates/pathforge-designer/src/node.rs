//! Collaborator interface between the editing core and the document tree.
//!
//! The transform tools and the undo service only ever touch nodes through
//! [`NodeHost`]. Attribute values are typed so that snapshots can restore
//! them exactly.

use pathforge_core::{HostError, Rect};
use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;
use crate::path::PathData;

pub type NodeId = u64;

/// Name of the attribute holding a node's local transform.
pub const TRANSFORM_ATTR: &str = "transform";
/// Name of the attribute holding a path node's data.
pub const PATH_DATA_ATTR: &str = "d";

pub const RECT_ATTRS: [&str; 4] = ["x", "y", "width", "height"];
pub const ELLIPSE_ATTRS: [&str; 4] = ["cx", "cy", "rx", "ry"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Group,
    Rect,
    Ellipse,
    Path,
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Number(f64),
    Text(String),
    Matrix(Matrix),
    Path(PathData),
}

impl AttrValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            AttrValue::Matrix(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathData> {
        match self {
            AttrValue::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<Matrix> for AttrValue {
    fn from(value: Matrix) -> Self {
        AttrValue::Matrix(value)
    }
}

impl From<PathData> for AttrValue {
    fn from(value: PathData) -> Self {
        AttrValue::Path(value)
    }
}

/// Narrow view of the document used by transforms and undo.
pub trait NodeHost {
    fn kind(&self, id: NodeId) -> Option<NodeKind>;

    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Position of the node among its parent's (or the root's) children.
    fn child_index(&self, id: NodeId) -> Option<usize>;

    fn attribute(&self, id: NodeId, name: &str) -> Option<AttrValue>;

    /// Sets (`Some`) or removes (`None`) an attribute and notifies observers.
    fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: Option<AttrValue>,
    ) -> Result<(), HostError>;

    fn is_selected(&self, id: NodeId) -> bool;

    /// Bounding box in the node's own (untransformed) coordinates.
    fn bbox(&self, id: NodeId) -> Option<Rect>;

    /// Full matrix from the node's coordinates to the screen.
    fn screen_ctm(&self, id: NodeId) -> Option<Matrix>;

    /// Local transform; identity when unset.
    fn matrix(&self, id: NodeId) -> Matrix {
        self.attribute(id, TRANSFORM_ATTR)
            .and_then(|value| value.as_matrix().copied())
            .unwrap_or_else(Matrix::identity)
    }

    fn set_matrix(&mut self, id: NodeId, matrix: Matrix) -> Result<(), HostError> {
        self.set_attribute(id, TRANSFORM_ATTR, Some(AttrValue::Matrix(matrix)))
    }

    fn number(&self, id: NodeId, name: &str) -> Result<f64, HostError> {
        match self.attribute(id, name) {
            Some(AttrValue::Number(n)) => Ok(n),
            Some(_) => Err(HostError::WrongAttributeType {
                id,
                name: name.to_string(),
                expected: "number".to_string(),
            }),
            None => Err(HostError::MissingAttribute {
                id,
                name: name.to_string(),
            }),
        }
    }

    fn path_data(&self, id: NodeId) -> Result<PathData, HostError> {
        match self.attribute(id, PATH_DATA_ATTR) {
            Some(AttrValue::Path(data)) => Ok(data),
            Some(_) => Err(HostError::WrongAttributeType {
                id,
                name: PATH_DATA_ATTR.to_string(),
                expected: "path".to_string(),
            }),
            None => Err(HostError::MissingAttribute {
                id,
                name: PATH_DATA_ATTR.to_string(),
            }),
        }
    }
}
