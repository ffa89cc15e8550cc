//! In-memory document tree implementing [`NodeHost`].

use std::collections::{BTreeMap, HashMap};

use pathforge_core::{HostError, Point, Rect};

use crate::matrix::{transform_point, Matrix};
use crate::node::{
    AttrValue, NodeHost, NodeId, NodeKind, ELLIPSE_ATTRS, PATH_DATA_ATTR, RECT_ATTRS,
};
use crate::path::PathData;
use crate::viewport::Viewport;

/// Handle for a registered document listener.
///
/// Uniquely identifies a listener subscription. Can be used to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub String);

/// Listener trait for document changes
///
/// Implement this trait to receive notifications after the document changes.
pub trait DocumentListener {
    /// Called after an attribute was set or removed
    fn on_attribute_changed(&self, _id: NodeId, _name: &str, _value: Option<&AttrValue>) {}

    /// Called after a node's selection flag changed
    fn on_selection_changed(&self, _id: NodeId, _selected: bool) {}
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub attributes: BTreeMap<String, AttrValue>,
    pub selected: bool,
}

#[derive(Default)]
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: NodeId,
    viewport: Viewport,
    listeners: Vec<(ListenerHandle, Box<dyn DocumentListener>)>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots)
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node under `parent` (or at the root).
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        parent: Option<NodeId>,
        attributes: impl IntoIterator<Item = (&'static str, AttrValue)>,
    ) -> Result<NodeId, HostError> {
        if let Some(parent_id) = parent {
            if !self.nodes.contains_key(&parent_id) {
                return Err(HostError::NodeNotFound { id: parent_id });
            }
        }

        self.next_id += 1;
        let id = self.next_id;
        let node = Node {
            id,
            kind,
            parent,
            children: Vec::new(),
            attributes: attributes
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            selected: false,
        };
        self.nodes.insert(id, node);
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }
        tracing::debug!(id, ?kind, "Added node");
        Ok(id)
    }

    pub fn add_group(&mut self, parent: Option<NodeId>) -> Result<NodeId, HostError> {
        self.add_node(NodeKind::Group, parent, [])
    }

    pub fn add_rect(&mut self, parent: Option<NodeId>, rect: Rect) -> Result<NodeId, HostError> {
        let values = [rect.x, rect.y, rect.width, rect.height];
        self.add_node(
            NodeKind::Rect,
            parent,
            RECT_ATTRS
                .into_iter()
                .zip(values)
                .map(|(name, v)| (name, AttrValue::Number(v))),
        )
    }

    pub fn add_ellipse(
        &mut self,
        parent: Option<NodeId>,
        center: Point,
        rx: f64,
        ry: f64,
    ) -> Result<NodeId, HostError> {
        let values = [center.x, center.y, rx, ry];
        self.add_node(
            NodeKind::Ellipse,
            parent,
            ELLIPSE_ATTRS
                .into_iter()
                .zip(values)
                .map(|(name, v)| (name, AttrValue::Number(v))),
        )
    }

    pub fn add_path(&mut self, parent: Option<NodeId>, data: PathData) -> Result<NodeId, HostError> {
        self.add_node(
            NodeKind::Path,
            parent,
            [(PATH_DATA_ATTR, AttrValue::Path(data))],
        )
    }

    pub fn set_selected(&mut self, id: NodeId, selected: bool) -> Result<(), HostError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(HostError::NodeNotFound { id })?;
        if node.selected != selected {
            node.selected = selected;
            for (_, listener) in &self.listeners {
                listener.on_selection_changed(id, selected);
            }
        }
        Ok(())
    }

    /// Ids of selected nodes, in ascending order.
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.selected)
            .map(|node| node.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn add_listener(&mut self, listener: Box<dyn DocumentListener>) -> ListenerHandle {
        let handle = ListenerHandle(uuid::Uuid::new_v4().to_string());
        self.listeners.push((handle.clone(), listener));
        handle
    }

    pub fn remove_listener(&mut self, handle: &ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| h != handle);
        self.listeners.len() != before
    }

    fn number_attr(node: &Node, name: &str) -> Option<f64> {
        node.attributes.get(name).and_then(AttrValue::as_number)
    }
}

impl NodeHost for Document {
    fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(&id).map(|node| node.kind)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    fn child_index(&self, id: NodeId) -> Option<usize> {
        let node = self.nodes.get(&id)?;
        let siblings = match node.parent {
            Some(parent) => &self.nodes.get(&parent)?.children,
            None => &self.roots,
        };
        siblings.iter().position(|&sibling| sibling == id)
    }

    fn attribute(&self, id: NodeId, name: &str) -> Option<AttrValue> {
        self.nodes.get(&id)?.attributes.get(name).cloned()
    }

    fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: Option<AttrValue>,
    ) -> Result<(), HostError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(HostError::NodeNotFound { id })?;
        match value.clone() {
            Some(value) => {
                node.attributes.insert(name.to_string(), value);
            }
            None => {
                node.attributes.remove(name);
            }
        }
        for (_, listener) in &self.listeners {
            listener.on_attribute_changed(id, name, value.as_ref());
        }
        Ok(())
    }

    fn is_selected(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.selected)
    }

    fn bbox(&self, id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        match node.kind {
            NodeKind::Rect => Some(Rect::new(
                Self::number_attr(node, "x").unwrap_or(0.0),
                Self::number_attr(node, "y").unwrap_or(0.0),
                Self::number_attr(node, "width")?,
                Self::number_attr(node, "height")?,
            )),
            NodeKind::Ellipse => {
                let cx = Self::number_attr(node, "cx").unwrap_or(0.0);
                let cy = Self::number_attr(node, "cy").unwrap_or(0.0);
                let rx = Self::number_attr(node, "rx")?;
                let ry = Self::number_attr(node, "ry")?;
                Some(Rect::new(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry))
            }
            NodeKind::Path => node.attributes.get(PATH_DATA_ATTR)?.as_path()?.bounds(),
            NodeKind::Group => {
                let corners = node.children.iter().flat_map(|&child| {
                    let matrix = self.matrix(child);
                    self.bbox(child)
                        .map(|b| {
                            [
                                b.min(),
                                Point::new(b.max().x, b.min().y),
                                b.max(),
                                Point::new(b.min().x, b.max().y),
                            ]
                            .map(|p| transform_point(&matrix, p))
                        })
                        .into_iter()
                        .flatten()
                });
                Rect::from_points(corners)
            }
        }
    }

    fn screen_ctm(&self, id: NodeId) -> Option<Matrix> {
        let mut ctm = Matrix::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(&node_id)?;
            ctm = ctm.then(&self.matrix(node_id));
            current = node.parent;
        }
        Some(ctm.then(&self.viewport.matrix()))
    }
}
