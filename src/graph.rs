//! Graph model: identifiers, nodes, edges and the serialized input format

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shape::{CircleShape, LabelSize, Margins};
use crate::vector::Vector2;

/// Radius of the ring new nodes are placed on when the input has no position
const INITIAL_RING_RADIUS: f64 = 100.0;
/// Diameter used for nodes that declare neither a size nor a label size
const DEFAULT_NODE_SIZE: f64 = 16.0;

/// Stable, unique node identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Stable, unique edge identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node under layout
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    /// Current position; written only by the simulation driver
    pub position: Vector2,
    pub mass: f64,
    /// Fixed nodes keep their position and are excluded from simulation
    pub fixed: bool,
    pub hidden: bool,
    pub selected: bool,
    pub shape: CircleShape,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, position: Vector2) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            position,
            mass: 1.0,
            fixed: false,
            hidden: false,
            selected: false,
            shape: CircleShape::with_diameter(DEFAULT_NODE_SIZE),
        }
    }

    pub fn with_shape(mut self, shape: CircleShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Effective visual radius
    pub fn distance_to_border(&self) -> f64 {
        self.shape.distance_to_border()
    }
}

/// A connection between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub hidden: bool,
}

/// Node and edge storage, keyed by id and kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct Body {
    nodes: HashMap<NodeId, Node>,
    node_order: Vec<NodeId>,
    edges: HashMap<EdgeId, Edge>,
    edge_order: Vec<EdgeId>,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node
    pub fn insert_node(&mut self, node: Node) {
        if !self.nodes.contains_key(&node.id) {
            self.node_order.push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        self.node_order.retain(|n| n != id);
        Some(node)
    }

    /// Insert or replace an edge
    pub fn insert_edge(&mut self, edge: Edge) {
        if !self.edges.contains_key(&edge.id) {
            self.edge_order.push(edge.id.clone());
        }
        self.edges.insert(edge.id.clone(), edge);
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(id)?;
        self.edge_order.retain(|e| e != id);
        Some(edge)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edge_order.iter().filter_map(|id| self.edges.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Build a body from parsed graph data
    ///
    /// Nodes without a position are spread on a ring around the origin.
    /// Edges without an id get `"<from>-><to>#<index>"`.
    pub fn from_graph_data(graph: &GraphData) -> Self {
        let mut body = Body::new();
        let total = graph.nodes.len().max(1);

        for (index, entry) in graph.nodes.iter().enumerate() {
            let position = match (entry.x, entry.y) {
                (Some(x), Some(y)) => Vector2::new(x, y),
                _ => {
                    let angle = 2.0 * std::f64::consts::PI * (index as f64) / (total as f64);
                    Vector2::new(
                        INITIAL_RING_RADIUS * angle.cos(),
                        INITIAL_RING_RADIUS * angle.sin(),
                    )
                }
            };

            let shape = match entry.label_size {
                Some(label) => CircleShape::new(
                    label,
                    entry.margin.unwrap_or_default(),
                    entry.selected_width_delta,
                ),
                None => CircleShape::new(
                    LabelSize {
                        width: entry.size.unwrap_or(DEFAULT_NODE_SIZE),
                        height: entry.size.unwrap_or(DEFAULT_NODE_SIZE),
                    },
                    entry.margin.unwrap_or(Margins::NONE),
                    entry.selected_width_delta,
                ),
            };

            let mut node = Node::new(entry.id.clone(), position).with_shape(shape);
            node.label = entry.label.clone().unwrap_or_else(|| entry.id.clone());
            node.mass = entry.mass;
            node.fixed = entry.fixed;
            node.hidden = entry.hidden;
            body.insert_node(node);
        }

        for (index, entry) in graph.edges.iter().enumerate() {
            let id = entry
                .id
                .clone()
                .unwrap_or_else(|| format!("{}->{}#{}", entry.from, entry.to, index));
            body.insert_edge(Edge {
                id: EdgeId::new(id),
                from: NodeId::new(entry.from.clone()),
                to: NodeId::new(entry.to.clone()),
                hidden: entry.hidden,
            });
        }

        body
    }
}

/// Serialized graph input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// A node in the serialized input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    /// Diameter for unlabelled circles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    /// Measured label box, when the renderer has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_size: Option<LabelSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margins>,

    #[serde(default)]
    pub selected_width_delta: f64,

    #[serde(default = "default_mass")]
    pub mass: f64,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fixed: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

fn default_mass() -> f64 {
    1.0
}

/// An edge in the serialized input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GraphData {
        serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": "a", "x": 1.0, "y": 2.0, "size": 20},
                    {"id": "b", "label": "Bee", "fixed": true},
                    {"id": "c", "label_size": {"width": 30, "height": 10}}
                ],
                "edges": [
                    {"from": "a", "to": "b"},
                    {"id": "bc", "from": "b", "to": "c"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn builds_body_in_insertion_order() {
        let body = Body::from_graph_data(&sample());
        let ids: Vec<&str> = body.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(body.edge_count(), 2);
    }

    #[test]
    fn explicit_positions_are_kept() {
        let body = Body::from_graph_data(&sample());
        let a = body.node(&NodeId::from("a")).unwrap();
        assert_eq!(a.position, Vector2::new(1.0, 2.0));
        assert_eq!(a.distance_to_border(), 10.0);
    }

    #[test]
    fn missing_positions_are_placed_on_ring() {
        let body = Body::from_graph_data(&sample());
        let b = body.node(&NodeId::from("b")).unwrap();
        assert!((b.position.length() - INITIAL_RING_RADIUS).abs() < 1e-9);
        assert!(b.fixed);
        assert_eq!(b.label, "Bee");
    }

    #[test]
    fn labelled_nodes_use_default_margins() {
        let body = Body::from_graph_data(&sample());
        let c = body.node(&NodeId::from("c")).unwrap();
        assert_eq!(c.shape.diameter(), 40.0);
        assert_eq!(c.label, "c");
    }

    #[test]
    fn generated_edge_ids() {
        let body = Body::from_graph_data(&sample());
        let ids: Vec<String> = body.edges().map(|e| e.id.to_string()).collect();
        assert_eq!(ids, ["a->b#0", "bc"]);
    }

    #[test]
    fn removing_node_keeps_order_of_others() {
        let mut body = Body::from_graph_data(&sample());
        assert!(body.remove_node(&NodeId::from("b")).is_some());
        assert!(body.remove_node(&NodeId::from("b")).is_none());
        let ids: Vec<&str> = body.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn reinserting_node_replaces_without_duplicating() {
        let mut body = Body::from_graph_data(&sample());
        body.insert_node(Node::new("a", Vector2::new(5.0, 5.0)));
        assert_eq!(body.node_count(), 3);
        assert_eq!(body.nodes().count(), 3);
        assert_eq!(
            body.node(&NodeId::from("a")).unwrap().position,
            Vector2::new(5.0, 5.0)
        );
    }
}
