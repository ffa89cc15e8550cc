//! Path point selection.
//!
//! Points are addressed by node and command index. The anchor of range
//! selection lives in an explicit [`SelectionContext`] that the caller
//! threads through every selection call.

use std::collections::BTreeSet;

use pathforge_core::Point;
use serde::{Deserialize, Serialize};

use crate::node::NodeId;
use crate::path::{CommandType, PathData};

/// One on-curve point: the end point of a path command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointRef {
    pub node: NodeId,
    pub index: usize,
}

impl PointRef {
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

/// How a click combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Select only the clicked point.
    Replace,
    /// Flip the clicked point (Ctrl+click).
    Toggle,
    /// Select every point between the anchor and the clicked one (Shift+click).
    Range,
}

/// Anchor state carried between selection calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionContext {
    anchor: Option<PointRef>,
}

impl SelectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The point a range selection extends from.
    pub fn anchor(&self) -> Option<PointRef> {
        self.anchor
    }

    pub fn reset(&mut self) {
        self.anchor = None;
    }
}

/// Manages the set of selected path points.
///
/// # Selection Model
///
/// - **Replace**: clears the set and selects the clicked point, which becomes
///   the anchor
/// - **Toggle**: adds or removes the clicked point, which becomes the anchor
/// - **Range**: selects the inclusive run from the anchor to the clicked point
///   within one subpath; the anchor stays where it was. Without a usable
///   anchor (none, another node, another subpath) it behaves like Replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointSelection {
    points: BTreeSet<PointRef>,
}

impl PointSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, point: PointRef) -> bool {
        self.points.contains(&point)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PointRef> + '_ {
        self.points.iter().copied()
    }

    /// Selected command indices of `node`, ascending.
    pub fn indices(&self, node: NodeId) -> Vec<usize> {
        self.points
            .iter()
            .filter(|p| p.node == node)
            .map(|p| p.index)
            .collect()
    }

    pub fn clear(&mut self, context: &mut SelectionContext) {
        self.points.clear();
        context.reset();
    }

    /// Applies a click on `point` of `path` (the data of `point.node`).
    ///
    /// # Arguments
    ///
    /// * `context` - Anchor state, updated in place
    /// * `path` - The path the clicked point belongs to
    /// * `point` - The clicked point
    /// * `mode` - How the click combines with the current selection
    ///
    /// # Returns
    ///
    /// `false` when `point` does not address a selectable command of `path`.
    pub fn select(
        &mut self,
        context: &mut SelectionContext,
        path: &PathData,
        point: PointRef,
        mode: SelectionMode,
    ) -> bool {
        match path.command(point.index) {
            Some(command) if command.kind() != CommandType::Close => {}
            _ => return false,
        }

        match mode {
            SelectionMode::Replace => self.replace(context, point),
            SelectionMode::Toggle => {
                if !self.points.remove(&point) {
                    self.points.insert(point);
                }
                context.anchor = Some(point);
            }
            SelectionMode::Range => {
                let anchor = context
                    .anchor
                    .filter(|a| a.node == point.node)
                    .filter(|a| path.segment_range(a.index) == path.segment_range(point.index));
                match anchor {
                    Some(anchor) => {
                        let (lo, hi) = if anchor.index <= point.index {
                            (anchor.index, point.index)
                        } else {
                            (point.index, anchor.index)
                        };
                        for index in lo..=hi {
                            let selectable = path
                                .command(index)
                                .is_some_and(|c| c.kind() != CommandType::Close);
                            if selectable {
                                self.points.insert(PointRef::new(point.node, index));
                            }
                        }
                    }
                    None => self.replace(context, point),
                }
            }
        }
        true
    }

    fn replace(&mut self, context: &mut SelectionContext, point: PointRef) {
        self.points.clear();
        self.points.insert(point);
        context.anchor = Some(point);
    }
}

/// Index of the on-curve point of `path` closest to `target` within
/// `tolerance`. Close commands are skipped since they end on their Move.
pub fn hit_test(path: &PathData, target: Point, tolerance: f64) -> Option<usize> {
    path.commands()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind() != CommandType::Close)
        .map(|(i, c)| (i, c.point().distance_to(&target)))
        .filter(|(_, d)| *d <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
