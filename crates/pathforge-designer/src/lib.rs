//! # PathForge Designer
//!
//! This crate provides the geometric model and the editing engine behind an
//! SVG-style vector editor: path data with exact absolute/relative handling,
//! affine transform tools, and an undo/redo history that every edit commits
//! into.
//!
//! ## Core Components
//!
//! ### Geometry
//! - **Curves**: Points, derivatives, lengths and bounds of arcs and Béziers
//! - **Matrix**: Affine decomposition, pivot-based scale/rotate/skew, frame conversion
//!
//! ### Path Model
//! - **PathData**: Parsed command list, subpath queries, structural edits
//! - **Converter**: Geometry-preserving command type conversion
//!
//! ### Editing
//! - **Transform**: Translate, scale, rotate and skew gestures per node kind
//! - **History/Undo-Redo**: Two-phase commit actions with a linear history
//! - **Selection**: Path point selection with range anchors
//! - **Document**: Reference node tree implementing [`NodeHost`]
//!
//! ## Architecture
//!
//! ```text
//! Document (NodeHost)
//!   ├── Viewport (zoom/pan → screen matrix)
//!   └── Nodes (group, rect, ellipse, path)
//!
//! UndoService
//!   └── Action (init → execute/commit → replay)
//!         ├── TransformAction (pointer-driven)
//!         └── PathEdit / SetAttributes
//!
//! PathData
//!   ├── PathCommand (absolute operands + cached points)
//!   └── Geometry (arc / Bézier primitives)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pathforge_designer::{Document, NodeHost, Operation, PathData, PathEdit, UndoService};
//!
//! let mut doc = Document::new();
//! let data: PathData = "M0,0 L1,1 L2,2".parse().unwrap();
//! let node = doc.add_path(None, data).unwrap();
//!
//! let mut history = UndoService::new(100);
//! let mut action = history.get_action("Delete point");
//! action
//!     .init(&doc, Operation::PathEdit { node, edit: PathEdit::RemoveCommand(2) })
//!     .unwrap();
//! history.start_action(&mut doc, action, true).unwrap();
//! assert_eq!(doc.path_data(node).unwrap().to_string(), "M0,0 L1,1");
//!
//! history.undo(&mut doc);
//! assert_eq!(doc.path_data(node).unwrap().to_string(), "M0,0 L1,1 L2,2");
//! ```

pub mod document;
pub mod geometry;
pub mod history;
pub mod matrix;
pub mod node;
pub mod path;
pub mod selection;
pub mod transform;
pub mod viewport;

pub use document::{Document, DocumentListener, ListenerHandle, Node};
pub use geometry::{CenterArc, EndpointArc};
pub use history::{
    Action, ActionState, ActionSummary, Operation, PathEdit, Snapshot, UndoService,
};
pub use matrix::{
    convert_screen_matrix_to_element_matrix, decompose_matrix, generate_scale_matrix,
    DecomposedMatrix, Matrix,
};
pub use node::{AttrValue, NodeHost, NodeId, NodeKind};
pub use path::{parse_path, CommandType, PathCommand, PathData, RawCommand};
pub use selection::{PointRef, PointSelection, SelectionContext, SelectionMode};
pub use transform::{
    HandleDescriptor, HandlePosition, TransformAction, TransformKind, TransformTarget,
};
pub use viewport::Viewport;
