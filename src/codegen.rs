//! Code Generation
//!
//! Pure translation from the visual graph to the equivalent Web Audio
//! JavaScript program. Recomputed from scratch on every call, with no
//! incremental state, so the emitted text is a deterministic function
//! of `(nodes, connections)`. The output is documentation for the user,
//! never parsed back in.

use crate::graph::{Connection, GraphNode};
use crate::registry::{meta_of, NodeType, ParamValue};
use std::collections::HashMap;

/// Generate the Web Audio program equivalent to the given graph.
///
/// Statement order: one construct + configure block per non-sink node in
/// node order, then one connect per connection in stored order, then one
/// `start()` per source in node order. The sink keeps the reserved
/// `ctx.destination` name; other nodes are named `{type}`, `{type}2`,
/// `{type}3`, … by per-type counters over node order.
pub fn generate_code(nodes: &[GraphNode], connections: &[Connection]) -> String {
    if nodes.is_empty() {
        return "// Add nodes and connect them to build a graph".to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut names: HashMap<&str, String> = HashMap::new();
    let mut counters: HashMap<&'static str, usize> = HashMap::new();

    for node in nodes {
        if node.node_type == NodeType::Destination {
            names.insert(&node.id, "ctx.destination".to_string());
            continue;
        }
        let base = node.node_type.key();
        let count = counters.entry(base).or_insert(0);
        *count += 1;
        let name = if *count > 1 {
            format!("{}{}", base, count)
        } else {
            base.to_string()
        };
        names.insert(&node.id, name);
    }

    lines.push("const ctx = new AudioContext();".to_string());
    lines.push(String::new());

    for node in nodes {
        if node.node_type == NodeType::Destination {
            continue;
        }
        let name = &names[node.id.as_str()];
        lines.push(format!(
            "const {} = {};",
            name,
            constructor_expr(node.node_type)
        ));
        for spec in meta_of(node.node_type).params {
            let value = node
                .params
                .get(spec.key)
                .cloned()
                .unwrap_or_else(|| spec.default.value());
            if let Some(line) = configure_line(name, node.node_type, spec.key, &value) {
                lines.push(line);
            }
        }
        lines.push(String::new());
    }

    if !connections.is_empty() {
        for conn in connections {
            let from = names.get(conn.from.node.as_str());
            let to = names.get(conn.to.node.as_str());
            // Unresolvable endpoints are skipped, never an error
            if let (Some(from), Some(to)) = (from, to) {
                lines.push(format!("{}.connect({});", from, to));
            }
        }
        lines.push(String::new());
    }

    for node in nodes {
        if node.node_type.is_source() {
            if let Some(name) = names.get(node.id.as_str()) {
                lines.push(format!("{}.start();", name));
            }
        }
    }

    lines.join("\n")
}

fn constructor_expr(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Oscillator => "ctx.createOscillator()",
        NodeType::Gain => "ctx.createGain()",
        NodeType::Destination => "ctx.destination",
        NodeType::Analyser => "ctx.createAnalyser()",
        NodeType::BiquadFilter => "ctx.createBiquadFilter()",
        NodeType::Delay => "ctx.createDelay(5)",
        NodeType::StereoPanner => "ctx.createStereoPanner()",
        NodeType::DynamicsCompressor => "ctx.createDynamicsCompressor()",
    }
}

/// Render one configure statement, or `None` when the value is elided
fn configure_line(
    name: &str,
    node_type: NodeType,
    key: &str,
    value: &ParamValue,
) -> Option<String> {
    // A zero detune adds nothing; keep the oscillator block minimal
    if node_type == NodeType::Oscillator && key == "detune" && value.as_number() == Some(0.0) {
        return None;
    }
    let line = match key {
        "type" => format!("{}.type = '{}';", name, raw_value(value)),
        "fftSize" => format!("{}.fftSize = {};", name, raw_value(value)),
        _ => format!("{}.{}.value = {};", name, key, raw_value(value)),
    };
    Some(line)
}

fn raw_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Number(n) => format!("{}", n),
        ParamValue::Choice(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Endpoint, GraphModel, Position};

    #[test]
    fn test_oscillator_to_destination_program() {
        let mut model = GraphModel::new();
        let osc = model.add_node(NodeType::Oscillator, Position::default());
        model.add_connection(Endpoint::output(&osc), Endpoint::input("destination_0"));

        let code = generate_code(model.nodes(), model.connections());
        let expected = "\
const ctx = new AudioContext();

const oscillator = ctx.createOscillator();
oscillator.type = 'sine';
oscillator.frequency.value = 440;

oscillator.connect(ctx.destination);

oscillator.start();";
        assert_eq!(code, expected);
    }

    #[test]
    fn test_pure_and_deterministic() {
        let mut model = GraphModel::new();
        let osc = model.add_node(NodeType::Oscillator, Position::default());
        let gain = model.add_node(NodeType::Gain, Position::default());
        model.add_connection(Endpoint::output(&osc), Endpoint::input(&gain));
        model.add_connection(Endpoint::output(&gain), Endpoint::input("destination_0"));

        let first = generate_code(model.nodes(), model.connections());
        let second = generate_code(model.nodes(), model.connections());
        assert_eq!(first, second);
    }

    #[test]
    fn test_per_type_suffixes() {
        let mut model = GraphModel::new();
        model.add_node(NodeType::Oscillator, Position::default());
        model.add_node(NodeType::Oscillator, Position::default());
        model.add_node(NodeType::Gain, Position::default());
        model.add_node(NodeType::Oscillator, Position::default());

        let code = generate_code(model.nodes(), model.connections());
        assert!(code.contains("const oscillator = "));
        assert!(code.contains("const oscillator2 = "));
        assert!(code.contains("const oscillator3 = "));
        // Suffix counters are per type, not global
        assert!(code.contains("const gain = "));
        assert!(!code.contains("gain2"));
        // Every source starts, in node order
        let starts: Vec<&str> = code.lines().filter(|l| l.ends_with(".start();")).collect();
        assert_eq!(
            starts,
            vec![
                "oscillator.start();",
                "oscillator2.start();",
                "oscillator3.start();"
            ]
        );
    }

    #[test]
    fn test_nonzero_detune_is_emitted() {
        let mut model = GraphModel::new();
        let osc = model.add_node(NodeType::Oscillator, Position::default());
        model.update_param(&osc, "detune", 25.0);

        let code = generate_code(model.nodes(), model.connections());
        assert!(code.contains("oscillator.detune.value = 25;"));
    }

    #[test]
    fn test_unresolvable_connection_skipped() {
        let mut model = GraphModel::new();
        let osc = model.add_node(NodeType::Oscillator, Position::default());
        model.add_connection(Endpoint::output(&osc), Endpoint::input("destination_0"));
        // Forge a snapshot-level dangling connection; the serializer must
        // skip it without failing (defensive, the model cascades these).
        let mut connections = model.connections().to_vec();
        connections.push(Connection {
            id: "conn_ghost".to_string(),
            from: Endpoint::output(&osc),
            to: Endpoint::input("ghost"),
        });

        let code = generate_code(model.nodes(), &connections);
        let connects: Vec<&str> = code.lines().filter(|l| l.contains(".connect(")).collect();
        assert_eq!(connects, vec!["oscillator.connect(ctx.destination);"]);
    }

    #[test]
    fn test_select_params_render_as_attributes() {
        let mut model = GraphModel::new();
        let filter = model.add_node(NodeType::BiquadFilter, Position::default());
        let analyser = model.add_node(NodeType::Analyser, Position::default());
        model.update_param(&filter, "type", "highpass");
        model.update_param(&analyser, "fftSize", "512");

        let code = generate_code(model.nodes(), model.connections());
        assert!(code.contains("biquadFilter.type = 'highpass';"));
        assert!(code.contains("biquadFilter.frequency.value = 1000;"));
        assert!(code.contains("biquadFilter.Q.value = 1;"));
        // fftSize is a plain numeric attribute, unquoted
        assert!(code.contains("analyser.fftSize = 512;"));
    }

    #[test]
    fn test_compressor_configure_block() {
        let mut model = GraphModel::new();
        model.add_node(NodeType::DynamicsCompressor, Position::default());

        let code = generate_code(model.nodes(), model.connections());
        assert!(code.contains("const dynamicsCompressor = ctx.createDynamicsCompressor();"));
        assert!(code.contains("dynamicsCompressor.threshold.value = -24;"));
        assert!(code.contains("dynamicsCompressor.knee.value = 30;"));
        assert!(code.contains("dynamicsCompressor.ratio.value = 12;"));
        assert!(code.contains("dynamicsCompressor.attack.value = 0.003;"));
        assert!(code.contains("dynamicsCompressor.release.value = 0.25;"));
    }

    #[test]
    fn test_empty_graph_placeholder() {
        let code = generate_code(&[], &[]);
        assert!(code.starts_with("//"));
    }

    #[test]
    fn test_node_order_changes_only_names() {
        let mut model = GraphModel::new();
        let a = model.add_node(NodeType::Oscillator, Position::default());
        let b = model.add_node(NodeType::Oscillator, Position::default());
        model.add_connection(Endpoint::output(&a), Endpoint::input("destination_0"));
        model.add_connection(Endpoint::output(&b), Endpoint::input("destination_0"));

        let forward = generate_code(model.nodes(), model.connections());

        let mut reversed: Vec<GraphNode> = model.nodes().to_vec();
        reversed.reverse();
        let backward = generate_code(&reversed, model.connections());

        // Same statements either way, only the suffix assignment moves
        let count =
            |code: &str| code.lines().filter(|l| l.contains(".connect(")).count();
        assert_eq!(count(&forward), 2);
        assert_eq!(count(&backward), 2);
        assert!(forward.contains("oscillator2.connect(ctx.destination);"));
        assert!(backward.contains("oscillator2.connect(ctx.destination);"));
    }
}
