//! Connection Drafting
//!
//! Explicit state machine for the wire-drag gesture: pointer-down over a
//! port starts a draft, pointer-moves update only the visual feedback
//! position, and pointer-up either commits a connection to the graph
//! model or discards the draft. Driven by discrete events in graph
//! coordinates, with no knowledge of the input-event delivery mechanism.

use crate::graph::{Endpoint, GraphModel, GraphNode, Position};
use crate::registry::{meta_of, PortKind};

/// Snap radius around a port, in graph units at zoom 1
pub const SNAP_DISTANCE: f32 = 20.0;

/// State of an in-progress wire drag
#[derive(Debug, Clone, PartialEq)]
pub enum DraftState {
    Idle,
    Dragging {
        /// Node the drag started from
        source: String,
        /// Kind of the port the drag started from
        port: PortKind,
        /// World position of the source port, the wire's fixed end
        anchor: Position,
        /// Current pointer position, the wire's free end
        pointer: Position,
    },
}

/// Tracks one wire-drag gesture from pointer-down to pointer-up
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDraft {
    state: DraftState,
}

impl ConnectionDraft {
    pub fn new() -> Self {
        Self {
            state: DraftState::Idle,
        }
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DraftState::Dragging { .. })
    }

    /// Pointer-down over a port: capture the port's world position as the
    /// wire anchor and enter `Dragging`
    pub fn begin(&mut self, source: impl Into<String>, port: PortKind, anchor: Position) {
        self.state = DraftState::Dragging {
            source: source.into(),
            port,
            anchor,
            pointer: anchor,
        };
    }

    /// Pointer-move: update the wire's free end. Pure visual feedback, no
    /// graph mutation; no-op while idle.
    pub fn drag(&mut self, position: Position) {
        if let DraftState::Dragging { pointer, .. } = &mut self.state {
            *pointer = position;
        }
    }

    /// Pointer-up: try to commit the draft against the graph.
    ///
    /// Scans all nodes other than the source in iteration order and
    /// accepts the first one exposing a port of the opposite kind within
    /// [`SNAP_DISTANCE`] of the release point; ties between overlapping
    /// ports resolve by iteration order, not distance. `port_position`
    /// supplies live port world positions from the layout. The committed
    /// connection is always oriented output to input, regardless of which
    /// end the drag started from. Returns the new connection's id, or
    /// `None` when the draft is discarded. Always returns to `Idle`.
    pub fn release<F>(
        &mut self,
        release_point: Position,
        model: &mut GraphModel,
        port_position: F,
    ) -> Option<String>
    where
        F: Fn(&GraphNode, PortKind) -> Position,
    {
        let state = std::mem::replace(&mut self.state, DraftState::Idle);
        let (source, port) = match state {
            DraftState::Idle => return None,
            DraftState::Dragging { source, port, .. } => (source, port),
        };

        let wanted = port.opposite();
        let target = model
            .nodes()
            .iter()
            .filter(|n| n.id != source)
            .filter(|n| meta_of(n.node_type).has_port(wanted))
            .find(|n| port_position(n, wanted).distance_to(release_point) < SNAP_DISTANCE)
            .map(|n| n.id.clone())?;

        let (from, to) = match port {
            PortKind::Output => (Endpoint::output(source), Endpoint::input(target)),
            PortKind::Input => (Endpoint::output(target), Endpoint::input(source)),
        };
        model.add_connection(from, to)
    }
}

impl Default for ConnectionDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NodeType;

    // Layout stub: every node's ports sit at the node's own position
    fn port_at_node(node: &GraphNode, _kind: PortKind) -> Position {
        node.position
    }

    #[test]
    fn test_idle_until_begun() {
        let mut draft = ConnectionDraft::new();
        assert_eq!(*draft.state(), DraftState::Idle);
        draft.drag(Position::new(10.0, 10.0)); // ignored while idle
        assert_eq!(*draft.state(), DraftState::Idle);
    }

    #[test]
    fn test_drag_updates_pointer_only() {
        let mut model = GraphModel::new();
        let osc = model.add_node(NodeType::Oscillator, Position::new(0.0, 50.0));

        let mut draft = ConnectionDraft::new();
        draft.begin(&osc, PortKind::Output, Position::new(0.0, 50.0));
        draft.drag(Position::new(40.0, 40.0));

        match draft.state() {
            DraftState::Dragging {
                anchor, pointer, ..
            } => {
                assert_eq!(*anchor, Position::new(0.0, 50.0));
                assert_eq!(*pointer, Position::new(40.0, 40.0));
            }
            DraftState::Idle => panic!("expected dragging"),
        }
        assert!(model.connections().is_empty());
    }

    #[test]
    fn test_release_snaps_within_threshold() {
        let mut model = GraphModel::new();
        let a = model.add_node(NodeType::Oscillator, Position::new(0.0, 50.0));
        let b = model.add_node(NodeType::Gain, Position::new(3.0, 50.0));

        let mut draft = ConnectionDraft::new();
        draft.begin(&a, PortKind::Output, Position::new(0.0, 50.0));
        // Release at (3, 48): distance 2 to b's input port, well under 20
        let id = draft.release(Position::new(3.0, 48.0), &mut model, port_at_node);

        let conn = model.connection(&id.unwrap()).unwrap();
        assert_eq!(conn.from, Endpoint::output(&a));
        assert_eq!(conn.to, Endpoint::input(&b));
        assert!(!draft.is_dragging());
    }

    #[test]
    fn test_release_over_empty_space_discards() {
        let mut model = GraphModel::new();
        let a = model.add_node(NodeType::Oscillator, Position::new(0.0, 0.0));

        let mut draft = ConnectionDraft::new();
        draft.begin(&a, PortKind::Output, Position::new(0.0, 0.0));
        let id = draft.release(Position::new(300.0, 300.0), &mut model, port_at_node);

        assert_eq!(id, None);
        assert!(model.connections().is_empty());
        assert_eq!(*draft.state(), DraftState::Idle);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let mut model = GraphModel::new();
        let src = model.add_node(NodeType::Oscillator, Position::new(100.0, 100.0));
        // Two candidates inside the snap radius; the nearer one is added
        // second, so iteration order must pick the farther, earlier one.
        let first = model.add_node(NodeType::Gain, Position::new(10.0, 0.0));
        let _second = model.add_node(NodeType::Delay, Position::new(1.0, 0.0));

        let mut draft = ConnectionDraft::new();
        draft.begin(&src, PortKind::Output, Position::new(100.0, 100.0));
        let id = draft.release(Position::new(0.0, 0.0), &mut model, port_at_node);

        let conn = model.connection(&id.unwrap()).unwrap();
        assert_eq!(conn.to, Endpoint::input(&first));
    }

    #[test]
    fn test_drag_from_input_orients_output_to_input() {
        let mut model = GraphModel::new();
        let osc = model.add_node(NodeType::Oscillator, Position::new(0.0, 0.0));
        let gain = model.add_node(NodeType::Gain, Position::new(200.0, 0.0));

        // Drag starts on the gain's input and releases over the
        // oscillator's output; the stored wire still runs osc -> gain.
        let mut draft = ConnectionDraft::new();
        draft.begin(&gain, PortKind::Input, Position::new(200.0, 0.0));
        let id = draft.release(Position::new(1.0, 1.0), &mut model, port_at_node);

        let conn = model.connection(&id.unwrap()).unwrap();
        assert_eq!(conn.from, Endpoint::output(&osc));
        assert_eq!(conn.to, Endpoint::input(&gain));
    }

    #[test]
    fn test_source_node_is_never_a_candidate() {
        let mut model = GraphModel::new();
        let gain = model.add_node(NodeType::Gain, Position::new(0.0, 0.0));

        // Releasing right back on the source node finds nothing, even
        // though the gain has a port of the opposite kind at distance 0.
        let mut draft = ConnectionDraft::new();
        draft.begin(&gain, PortKind::Output, Position::new(0.0, 0.0));
        let id = draft.release(Position::new(0.0, 0.0), &mut model, port_at_node);
        assert_eq!(id, None);
    }

    #[test]
    fn test_nodes_without_opposite_port_are_skipped() {
        let mut model = GraphModel::new();
        let osc_a = model.add_node(NodeType::Oscillator, Position::new(0.0, 0.0));
        // Another oscillator has no input port, so it cannot accept the
        // wire even at distance 0; the sink behind it can.
        let _osc_b = model.add_node(NodeType::Oscillator, Position::new(100.0, 0.0));
        model.move_node("destination_0", Position::new(105.0, 0.0));

        let mut draft = ConnectionDraft::new();
        draft.begin(&osc_a, PortKind::Output, Position::new(0.0, 0.0));
        let id = draft.release(Position::new(100.0, 0.0), &mut model, port_at_node);

        let conn = model.connection(&id.unwrap()).unwrap();
        assert_eq!(conn.to, Endpoint::input("destination_0"));
    }
}
