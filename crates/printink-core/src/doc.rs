//! Design document: the serializable aggregate of nodes, selection,
//! and canvas configuration.

use crate::config::CanvasConfig;
use crate::nodes::{DesignNode, NodeId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// The aggregate root for one design.
///
/// `nodes` order is paint order: index 0 is painted first (bottom), the
/// last index lands on top. Selection is a set of ids that must always
/// reference existing nodes; every mutator here maintains that invariant,
/// the data structure itself does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDoc {
    pub nodes: Vec<DesignNode>,
    pub selected_ids: Vec<NodeId>,
    pub canvas: CanvasConfig,
}

impl DesignDoc {
    /// Create an empty document with the given canvas configuration.
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            nodes: Vec::new(),
            selected_ids: Vec::new(),
            canvas,
        }
    }

    /// Append a node on top of the paint order.
    pub fn add_node(&mut self, node: DesignNode) -> NodeId {
        let id = node.id();
        self.nodes.push(node);
        id
    }

    /// Remove a node; its id is also dropped from the selection.
    pub fn remove_node(&mut self, id: NodeId) -> Option<DesignNode> {
        let idx = self.nodes.iter().position(|n| n.id() == id)?;
        self.selected_ids.retain(|&sel| sel != id);
        Some(self.nodes.remove(idx))
    }

    /// Remove several nodes at once.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> Vec<DesignNode> {
        ids.iter().filter_map(|&id| self.remove_node(id)).collect()
    }

    /// Remove all nodes and clear the selection.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.selected_ids.clear();
    }

    pub fn node(&self, id: NodeId) -> Option<&DesignNode> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut DesignNode> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    /// Apply an edit to a node by id. Returns false for unknown ids.
    pub fn update_node(&mut self, id: NodeId, f: impl FnOnce(&mut DesignNode)) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                f(node);
                true
            }
            None => false,
        }
    }

    /// Duplicate a node with a fresh id, nudged so the copy is visible.
    /// The copy is placed on top of the paint order.
    pub fn duplicate_node(&mut self, id: NodeId, offset: Vec2) -> Option<NodeId> {
        let mut copy = self.node(id)?.clone();
        copy.regenerate_id();
        copy.translate(offset);
        Some(self.add_node(copy))
    }

    /// Replace the selection; unknown ids are dropped.
    pub fn set_selection(&mut self, ids: Vec<NodeId>) {
        self.selected_ids = ids
            .into_iter()
            .filter(|&id| self.node(id).is_some())
            .collect();
    }

    /// Select a single node (clears the previous selection).
    pub fn select(&mut self, id: NodeId) {
        self.set_selection(vec![id]);
    }

    /// Add a node to the selection if it exists.
    pub fn add_to_selection(&mut self, id: NodeId) {
        if self.node(id).is_some() && !self.selected_ids.contains(&id) {
            self.selected_ids.push(id);
        }
    }

    pub fn deselect(&mut self, id: NodeId) {
        self.selected_ids.retain(|&sel| sel != id);
    }

    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected_ids.contains(&id)
    }

    /// Move a node to the top of the paint order.
    pub fn bring_to_front(&mut self, id: NodeId) {
        if let Some(idx) = self.nodes.iter().position(|n| n.id() == id) {
            let node = self.nodes.remove(idx);
            self.nodes.push(node);
        }
    }

    /// Move a node to the bottom of the paint order.
    pub fn send_to_back(&mut self, id: NodeId) {
        if let Some(idx) = self.nodes.iter().position(|n| n.id() == id) {
            let node = self.nodes.remove(idx);
            self.nodes.insert(0, node);
        }
    }

    /// Move a node one layer towards the front.
    /// Returns true if the node moved, false if already at the front.
    pub fn bring_forward(&mut self, id: NodeId) -> bool {
        if let Some(idx) = self.nodes.iter().position(|n| n.id() == id) {
            if idx + 1 < self.nodes.len() {
                self.nodes.swap(idx, idx + 1);
                return true;
            }
        }
        false
    }

    /// Move a node one layer towards the back.
    pub fn send_backward(&mut self, id: NodeId) -> bool {
        if let Some(idx) = self.nodes.iter().position(|n| n.id() == id) {
            if idx > 0 {
                self.nodes.swap(idx, idx - 1);
                return true;
            }
        }
        false
    }

    /// Combined bounding box of all nodes, or None for an empty document.
    pub fn bounds(&self) -> Option<Rect> {
        self.nodes
            .iter()
            .map(|n| n.bounds())
            .reduce(|acc, b| acc.union(b))
    }

    /// Nodes under a canvas-local point, front-most first.
    /// Locked and hidden nodes are skipped (they refuse interaction).
    pub fn nodes_at_point(&self, point: Point, tolerance: f64) -> Vec<NodeId> {
        self.nodes
            .iter()
            .rev()
            .filter(|n| n.is_visible() && !n.is_locked() && n.hit_test(point, tolerance))
            .map(|n| n.id())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Serialize to the persistence-boundary JSON shape
    /// (`{ "nodes": [...], "selectedIds": [...], "canvas": {...} }`).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for DesignDoc {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Rectangle;

    fn rect_at(x: f64, y: f64) -> DesignNode {
        DesignNode::Rect(Rectangle::new(Point::new(x, y), 100.0, 100.0))
    }

    #[test]
    fn test_add_and_remove() {
        let mut doc = DesignDoc::default();
        let id = doc.add_node(rect_at(0.0, 0.0));
        assert_eq!(doc.len(), 1);
        assert!(doc.remove_node(id).is_some());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_selection_subset_invariant_on_delete() {
        let mut doc = DesignDoc::default();
        let a = doc.add_node(rect_at(0.0, 0.0));
        let b = doc.add_node(rect_at(50.0, 50.0));
        doc.set_selection(vec![a, b]);

        doc.remove_node(a);
        assert!(!doc.is_selected(a));
        assert_eq!(doc.selected_ids, vec![b]);
        // No dangling ids survive
        assert!(doc.selected_ids.iter().all(|&id| doc.node(id).is_some()));
    }

    #[test]
    fn test_set_selection_drops_unknown_ids() {
        let mut doc = DesignDoc::default();
        let a = doc.add_node(rect_at(0.0, 0.0));
        doc.set_selection(vec![a, uuid::Uuid::new_v4()]);
        assert_eq!(doc.selected_ids, vec![a]);
    }

    #[test]
    fn test_paint_order_ops() {
        let mut doc = DesignDoc::default();
        let a = doc.add_node(rect_at(0.0, 0.0));
        let b = doc.add_node(rect_at(10.0, 10.0));
        let c = doc.add_node(rect_at(20.0, 20.0));

        let order = |doc: &DesignDoc| doc.nodes.iter().map(|n| n.id()).collect::<Vec<_>>();
        assert_eq!(order(&doc), vec![a, b, c]);

        doc.bring_to_front(a);
        assert_eq!(order(&doc), vec![b, c, a]);

        doc.send_to_back(a);
        assert_eq!(order(&doc), vec![a, b, c]);

        assert!(doc.bring_forward(a));
        assert_eq!(order(&doc), vec![b, a, c]);

        assert!(doc.send_backward(a));
        assert_eq!(order(&doc), vec![a, b, c]);

        // Edge positions are no-ops
        assert!(!doc.send_backward(a));
        assert!(!doc.bring_forward(c));
    }

    #[test]
    fn test_nodes_at_point_front_first() {
        let mut doc = DesignDoc::default();
        let a = doc.add_node(rect_at(0.0, 0.0));
        let b = doc.add_node(rect_at(50.0, 50.0));

        let hits = doc.nodes_at_point(Point::new(75.0, 75.0), 0.0);
        assert_eq!(hits, vec![b, a]);

        let hits = doc.nodes_at_point(Point::new(25.0, 25.0), 0.0);
        assert_eq!(hits, vec![a]);
    }

    #[test]
    fn test_locked_nodes_skip_hit_testing() {
        let mut doc = DesignDoc::default();
        let a = doc.add_node(rect_at(0.0, 0.0));
        doc.update_node(a, |n| n.set_locked(true));
        assert!(doc.nodes_at_point(Point::new(50.0, 50.0), 0.0).is_empty());
    }

    #[test]
    fn test_duplicate_node() {
        let mut doc = DesignDoc::default();
        let a = doc.add_node(rect_at(0.0, 0.0));
        let copy = doc.duplicate_node(a, Vec2::new(10.0, 10.0)).unwrap();
        assert_ne!(copy, a);
        assert_eq!(doc.len(), 2);
        let bounds = doc.node(copy).unwrap().bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_boundary_shape() {
        let mut doc = DesignDoc::default();
        let a = doc.add_node(rect_at(0.0, 0.0));
        doc.select(a);

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"nodes\""));
        assert!(json.contains("\"selectedIds\""));
        assert!(json.contains("\"canvas\""));

        let back = DesignDoc::from_json(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.selected_ids, vec![a]);
    }

    #[test]
    fn test_bounds_union() {
        let mut doc = DesignDoc::default();
        assert!(doc.bounds().is_none());
        doc.add_node(rect_at(0.0, 0.0));
        doc.add_node(rect_at(200.0, 200.0));
        let bounds = doc.bounds().unwrap();
        assert!((bounds.x1 - 300.0).abs() < f64::EPSILON);
    }
}
