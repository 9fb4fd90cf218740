//! Runtime Synchronizer
//!
//! Keeps a materialized runtime graph of audio primitives in step with
//! the graph model: a full teardown-and-rebuild per play start, plus
//! targeted parameter pushes to live primitives while playing. The
//! platform backend is a capability trait; the synchronizer never
//! inspects concrete backend types and tags every handle with its node
//! type at construction time.

use crate::graph::{Connection, GraphNode};
use crate::registry::{meta_of, NodeType, ParamValue};
use std::collections::HashMap;

/// Error reported by a platform audio backend.
///
/// `build` swallows these per primitive and per connection so one bad
/// node never prevents the rest of the graph from materializing; the
/// graph model itself is never touched by a materialization failure.
#[derive(Debug, Clone)]
pub enum BackendError {
    /// The backend could not construct a primitive of the requested kind
    CreateFailed(String),
    /// The backend rejected a connection between two primitives
    ConnectFailed(String),
    /// The backend rejected a control value
    ControlRejected(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::CreateFailed(msg) => write!(f, "create failed: {}", msg),
            BackendError::ConnectFailed(msg) => write!(f, "connect failed: {}", msg),
            BackendError::ControlRejected(msg) => write!(f, "control rejected: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

/// Capability surface of the platform audio layer.
///
/// All calls are fire-and-forget from the core's perspective; `resume`
/// is the one-time readiness step a session needs before the first
/// `build` is safe.
pub trait AudioBackend {
    /// Opaque handle to one live primitive
    type Handle: Clone;

    /// Bring the backend out of its suspended state. Called at most once
    /// per session by [`Engine::resume`].
    fn resume(&mut self);

    /// The pre-existing singleton output sink
    fn destination(&self) -> Self::Handle;

    /// Construct a primitive realizing the given node type
    fn create(&mut self, node_type: NodeType) -> Result<Self::Handle, BackendError>;

    /// Route one primitive's output into another primitive
    fn connect(&mut self, from: &Self::Handle, to: &Self::Handle) -> Result<(), BackendError>;

    /// Drop all routes out of a primitive
    fn disconnect(&mut self, handle: &Self::Handle);

    /// Start a generating source
    fn start(&mut self, source: &Self::Handle);

    /// Stop a running source
    fn stop(&mut self, source: &Self::Handle);

    /// Set a live control value on a primitive
    fn set_param(
        &mut self,
        handle: &Self::Handle,
        key: &str,
        value: &ParamValue,
    ) -> Result<(), BackendError>;
}

/// A live primitive handle tagged with the node type it realizes
#[derive(Debug, Clone)]
pub struct Materialized<H> {
    pub handle: H,
    pub kind: NodeType,
}

/// Owns the single materialized runtime graph.
///
/// The graph model never holds runtime handles; this is the only place
/// primitive lifetimes live, so teardown can never leak into the model.
pub struct Engine<B: AudioBackend> {
    backend: B,
    primitives: HashMap<String, Materialized<B::Handle>>,
    /// Node ids of started sources, in node order
    sources: Vec<String>,
    resumed: bool,
}

impl<B: AudioBackend> Engine<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            primitives: HashMap::new(),
            sources: Vec::new(),
            resumed: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Whether anything is currently materialized
    pub fn is_active(&self) -> bool {
        !self.primitives.is_empty()
    }

    /// Perform the backend's readiness step, exactly once per session.
    /// Safe to call repeatedly; later calls are no-ops.
    pub fn resume(&mut self) {
        if !self.resumed {
            self.backend.resume();
            self.resumed = true;
        }
    }

    /// Rebuild the runtime graph to mirror `(nodes, connections)`.
    ///
    /// Always tears down the previous materialization completely, then
    /// constructs and configures one primitive per node (the sink reuses
    /// the backend's pre-existing handle), wires every connection in flat
    /// list order (cycles need no special handling), and finally starts
    /// every source, so feedback topologies are fully wired before any
    /// signal flows. Backend failures are skipped per item, best-effort.
    pub fn build(&mut self, nodes: &[GraphNode], connections: &[Connection]) {
        self.stop();

        for node in nodes {
            let materialized = match node.node_type {
                NodeType::Destination => Some(Materialized {
                    handle: self.backend.destination(),
                    kind: NodeType::Destination,
                }),
                kind => match self.backend.create(kind) {
                    Ok(handle) => Some(Materialized { handle, kind }),
                    Err(_) => None,
                },
            };
            let Some(materialized) = materialized else {
                continue;
            };
            self.configure(node, &materialized);
            if node.node_type.is_source() {
                self.sources.push(node.id.clone());
            }
            self.primitives.insert(node.id.clone(), materialized);
        }

        for conn in connections {
            let from = self.primitives.get(&conn.from.node);
            let to = self.primitives.get(&conn.to.node);
            // A missing endpoint should be impossible under the model's
            // cascade invariant; skip it and keep wiring.
            if let (Some(from), Some(to)) = (from, to) {
                let _ = self.backend.connect(&from.handle, &to.handle);
            }
        }

        for id in &self.sources {
            if let Some(m) = self.primitives.get(id) {
                self.backend.start(&m.handle);
            }
        }
    }

    /// Tear down the materialized graph: stop every running source,
    /// disconnect every primitive, and drop all handles. Idempotent.
    pub fn stop(&mut self) {
        for id in &self.sources {
            if let Some(m) = self.primitives.get(id) {
                self.backend.stop(&m.handle);
            }
        }
        for m in self.primitives.values() {
            self.backend.disconnect(&m.handle);
        }
        self.primitives.clear();
        self.sources.clear();
    }

    /// Push a single parameter edit to the live primitive for `node_id`.
    ///
    /// The routing whitelist is the registry's own parameter schema for
    /// the primitive's kind, so a key is live exactly when the inspector
    /// can edit it. Unknown ids and undeclared keys are silently ignored;
    /// no rebuild, no disconnects.
    pub fn update_param(&mut self, node_id: &str, key: &str, value: &ParamValue) {
        let Some(m) = self.primitives.get(node_id) else {
            return;
        };
        if meta_of(m.kind).param(key).is_none() {
            return;
        }
        let _ = self.backend.set_param(&m.handle, key, value);
    }

    /// Live handle for a node, if materialized
    pub fn primitive(&self, node_id: &str) -> Option<&Materialized<B::Handle>> {
        self.primitives.get(node_id)
    }

    /// Live handle for a node, only if it realizes the queried kind
    pub fn primitive_of(&self, node_id: &str, kind: NodeType) -> Option<&B::Handle> {
        self.primitives
            .get(node_id)
            .filter(|m| m.kind == kind)
            .map(|m| &m.handle)
    }

    /// Live analyser handle for the visualizer, if materialized
    pub fn analyser(&self, node_id: &str) -> Option<&B::Handle> {
        self.primitive_of(node_id, NodeType::Analyser)
    }

    fn configure(&mut self, node: &GraphNode, materialized: &Materialized<B::Handle>) {
        for spec in meta_of(materialized.kind).params {
            let value = node
                .params
                .get(spec.key)
                .cloned()
                .unwrap_or_else(|| spec.default.value());
            let _ = self
                .backend
                .set_param(&materialized.handle, spec.key, &value);
        }
    }
}
