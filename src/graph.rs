//! Graph Model
//!
//! The mutable in-memory graph of nodes and connections, plus selection,
//! playing flag, and view state. Every operation is a synchronous atomic
//! transition; intents against stale ids are absorbed as silent no-ops so
//! queued UI events can never corrupt the graph.

use crate::registry::{default_params, NodeType, ParamValue, PortKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum zoom factor for the canvas
pub const MIN_ZOOM: f32 = 0.25;
/// Maximum zoom factor for the canvas
pub const MAX_ZOOM: f32 = 2.0;

/// A point in graph coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One end of a connection: a node id and the port kind on that node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(rename = "nodeId")]
    pub node: String,
    pub port: PortKind,
}

impl Endpoint {
    /// The output side of a wire
    pub fn output(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: PortKind::Output,
        }
    }

    /// The input side of a wire
    pub fn input(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: PortKind::Input,
        }
    }
}

/// A directed wire from one node's output to another node's input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Connection {
    pub fn new(id: impl Into<String>, from: Endpoint, to: Endpoint) -> Self {
        Self {
            id: id.into(),
            from,
            to,
        }
    }

    /// Whether either endpoint references the given node
    pub fn references(&self, node_id: &str) -> bool {
        self.from.node == node_id || self.to.node == node_id
    }

    fn same_endpoints(&self, from: &Endpoint, to: &Endpoint) -> bool {
        self.from == *from && self.to == *to
    }
}

/// A node placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub position: Position,
    /// Current parameter overrides; type defaults fill any missing key
    pub params: HashMap<String, ParamValue>,
}

impl GraphNode {
    /// Create a node with its type's default parameters
    pub fn new(id: impl Into<String>, node_type: NodeType, position: Position) -> Self {
        Self {
            id: id.into(),
            node_type,
            position,
            params: default_params(node_type),
        }
    }

    /// Override a parameter value (builder style, used by preset data)
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Canvas pan offset and zoom; purely presentational
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub offset: Position,
    pub zoom: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            offset: Position::default(),
            zoom: 1.0,
        }
    }
}

/// Whole-state aggregate of the graph model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub connections: Vec<Connection>,
    pub selected: Option<String>,
    pub playing: bool,
    pub view: ViewState,
}

impl GraphSnapshot {
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Monotonic id source owned by a model instance.
///
/// Ids are never reused after deletion; a recycled id would break the
/// cascade and dedup logic that keys off id identity.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn node_id(&mut self) -> String {
        let id = format!("node_{}", self.next);
        self.next += 1;
        id
    }

    pub fn connection_id(&mut self) -> String {
        let id = format!("conn_{}", self.next);
        self.next += 1;
        id
    }

    /// Ensure the counter is past `n`, so no future id can carry a
    /// numeric suffix at or below it
    pub fn reserve(&mut self, n: u64) {
        if n >= self.next {
            self.next = n + 1;
        }
    }
}

/// Trailing number of a `prefix_N` style id, if it has one
fn numeric_suffix(id: &str) -> Option<u64> {
    id.rsplit_once('_')?.1.parse().ok()
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// The mutable graph the user edits.
///
/// Insertion order of nodes doubles as render z-order and drives the
/// display-name suffixes in generated code; it carries no signal-flow
/// meaning.
#[derive(Debug, Clone)]
pub struct GraphModel {
    nodes: Vec<GraphNode>,
    connections: Vec<Connection>,
    selected: Option<String>,
    playing: bool,
    view: ViewState,
    ids: IdAllocator,
}

impl GraphModel {
    /// Create a model seeded with the singleton output sink
    pub fn new() -> Self {
        Self {
            nodes: vec![GraphNode::new(
                "destination_0",
                NodeType::Destination,
                Position::new(600.0, 250.0),
            )],
            connections: Vec::new(),
            selected: None,
            playing: false,
            view: ViewState::default(),
            ids: IdAllocator::new(),
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Clone the full state into an aggregate
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
            selected: self.selected.clone(),
            playing: self.playing,
            view: self.view,
        }
    }

    /// Add a node of the given type with its default parameters.
    ///
    /// Returns the freshly allocated node id. Never fails.
    pub fn add_node(&mut self, node_type: NodeType, position: Position) -> String {
        let id = self.ids.node_id();
        self.nodes.push(GraphNode::new(&id, node_type, position));
        id
    }

    /// Remove a node, cascading removal of every connection that
    /// references it and clearing a matching selection. No-op if absent.
    pub fn remove_node(&mut self, node_id: &str) {
        self.nodes.retain(|n| n.id != node_id);
        self.connections.retain(|c| !c.references(node_id));
        if self.selected.as_deref() == Some(node_id) {
            self.selected = None;
        }
    }

    /// Replace a node's position. No-op if absent.
    pub fn move_node(&mut self, node_id: &str, position: Position) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) {
            node.position = position;
        }
    }

    /// Add a connection unless one with identical endpoints exists.
    ///
    /// Returns the new connection's id, or `None` when the duplicate was
    /// suppressed. Endpoints are trusted as proposed; port legality is the
    /// drafting layer's responsibility.
    pub fn add_connection(&mut self, from: Endpoint, to: Endpoint) -> Option<String> {
        if self.connections.iter().any(|c| c.same_endpoints(&from, &to)) {
            return None;
        }
        let id = self.ids.connection_id();
        self.connections.push(Connection {
            id: id.clone(),
            from,
            to,
        });
        Some(id)
    }

    /// Remove a connection by id. No-op if absent.
    pub fn remove_connection(&mut self, connection_id: &str) {
        self.connections.retain(|c| c.id != connection_id);
    }

    /// Set a parameter value unconditionally; no schema validation at this
    /// layer. No-op if the node is absent.
    pub fn update_param(&mut self, node_id: &str, key: &str, value: impl Into<ParamValue>) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) {
            node.params.insert(key.to_string(), value.into());
        }
    }

    /// Select a node, or clear the selection with `None`
    pub fn select_node(&mut self, node_id: Option<&str>) {
        self.selected = node_id.map(|s| s.to_string());
    }

    /// Set pan offset and zoom, clamping zoom to the configured range
    pub fn set_view(&mut self, offset: Position, zoom: f32) {
        self.view = ViewState {
            offset,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        };
    }

    /// Flip the playing flag; materialization is driven externally by
    /// observing this transition
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Replace nodes and connections wholesale, clearing the selection and
    /// forcing playback off. The caller must stop any live materialization
    /// first; the model knows nothing about runtime resources.
    ///
    /// The allocator is advanced past every numeric suffix among the
    /// loaded ids, so later allocations can never duplicate an authored
    /// id (and in turn corrupt removal and dedup, which key off id
    /// identity).
    pub fn load_preset(&mut self, nodes: Vec<GraphNode>, connections: Vec<Connection>) {
        let ids = nodes
            .iter()
            .map(|n| n.id.as_str())
            .chain(connections.iter().map(|c| c.id.as_str()));
        for id in ids {
            if let Some(n) = numeric_suffix(id) {
                self.ids.reserve(n);
            }
        }
        self.nodes = nodes;
        self.connections = connections;
        self.selected = None;
        self.playing = false;
    }
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new()
    }
}
