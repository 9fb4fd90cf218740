//! Preset Library
//!
//! Ready-made graphs that demonstrate one Web Audio concept each, ordered
//! as a small curriculum from a bare oscillator up to feedback echo and
//! stereo placement. Loading a preset replaces the whole graph; the ids
//! inside a preset are authored by hand, and the model reserves their
//! numeric suffixes so later allocations stay unique.
//!
//! # Example
//!
//! ```
//! use waveboard::prelude::*;
//!
//! let library = PresetLibrary::new();
//! let mut model = GraphModel::new();
//!
//! let preset = library.get("hello-sound").unwrap();
//! preset.apply(&mut model);
//! assert_eq!(model.nodes().len(), 2);
//! ```

use crate::graph::{Connection, Endpoint, GraphModel, GraphNode, Position};
use crate::registry::NodeType;

/// A complete replacement graph with a human-readable blurb
#[derive(Debug, Clone)]
pub struct Preset {
    /// Stable identifier, used for lookup
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-sentence description of the concept the preset teaches
    pub description: &'static str,
    pub nodes: Vec<GraphNode>,
    pub connections: Vec<Connection>,
}

impl Preset {
    /// Load this preset into the model, replacing the current graph.
    /// Selection is cleared and playback stops.
    pub fn apply(&self, model: &mut GraphModel) {
        model.load_preset(self.nodes.clone(), self.connections.clone());
    }
}

/// The built-in preset collection
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    presets: Vec<Preset>,
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self {
            presets: vec![
                hello_sound(),
                volume_control(),
                see_waveform(),
                filter_tone(),
                echo_feedback(),
                additive_synth(),
                stereo_panning(),
            ],
        }
    }

    /// All presets in curriculum order
    pub fn list(&self) -> &[Preset] {
        &self.presets
    }

    /// Look up a preset by id
    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }
}

// =============================================================================
// Preset definitions
// =============================================================================

fn node(id: &str, node_type: NodeType, x: f32, y: f32) -> GraphNode {
    GraphNode::new(id, node_type, Position::new(x, y))
}

fn wire(id: &str, from: &str, to: &str) -> Connection {
    Connection::new(id, Endpoint::output(from), Endpoint::input(to))
}

fn hello_sound() -> Preset {
    Preset {
        id: "hello-sound",
        name: "1. First Sound",
        description: "The smallest possible graph: an oscillator wired straight \
                      to the destination. Covers the AudioContext basics.",
        nodes: vec![
            node("osc_1", NodeType::Oscillator, 100.0, 200.0),
            node("destination_0", NodeType::Destination, 500.0, 200.0),
        ],
        connections: vec![wire("conn_1", "osc_1", "destination_0")],
    }
}

fn volume_control() -> Preset {
    Preset {
        id: "volume-control",
        name: "2. Taming the Volume",
        description: "A gain node between source and destination controls \
                      loudness. Try gain values between 0 and 1.",
        nodes: vec![
            node("osc_1", NodeType::Oscillator, 80.0, 200.0),
            node("gain_1", NodeType::Gain, 340.0, 200.0).with_param("gain", 0.3),
            node("destination_0", NodeType::Destination, 600.0, 200.0),
        ],
        connections: vec![
            wire("conn_1", "osc_1", "gain_1"),
            wire("conn_2", "gain_1", "destination_0"),
        ],
    }
}

fn see_waveform() -> Preset {
    Preset {
        id: "see-waveform",
        name: "3. Seeing the Waveform",
        description: "An analyser taps the signal for visualization. Switch \
                      between waveform and spectrum views.",
        nodes: vec![
            node("osc_1", NodeType::Oscillator, 60.0, 200.0)
                .with_param("type", "sawtooth")
                .with_param("frequency", 220.0),
            node("gain_1", NodeType::Gain, 280.0, 200.0).with_param("gain", 0.3),
            node("analyser_1", NodeType::Analyser, 500.0, 120.0),
            node("destination_0", NodeType::Destination, 500.0, 320.0),
        ],
        connections: vec![
            wire("conn_1", "osc_1", "gain_1"),
            wire("conn_2", "gain_1", "analyser_1"),
            wire("conn_3", "gain_1", "destination_0"),
        ],
    }
}

fn filter_tone() -> Preset {
    Preset {
        id: "filter-tone",
        name: "4. Shaping the Tone",
        description: "A biquad filter carves harmonics out of a sawtooth. Move \
                      the cutoff frequency and Q to hear the difference.",
        nodes: vec![
            node("osc_1", NodeType::Oscillator, 60.0, 200.0)
                .with_param("type", "sawtooth")
                .with_param("frequency", 220.0),
            node("filter_1", NodeType::BiquadFilter, 280.0, 200.0)
                .with_param("frequency", 800.0)
                .with_param("Q", 5.0),
            node("gain_1", NodeType::Gain, 500.0, 200.0).with_param("gain", 0.3),
            node("destination_0", NodeType::Destination, 720.0, 200.0),
        ],
        connections: vec![
            wire("conn_1", "osc_1", "filter_1"),
            wire("conn_2", "filter_1", "gain_1"),
            wire("conn_3", "gain_1", "destination_0"),
        ],
    }
}

fn echo_feedback() -> Preset {
    Preset {
        id: "echo-feedback",
        name: "5. Building an Echo",
        description: "A delay node in a feedback loop produces echoes. Adjust \
                      delayTime and the feedback gain.",
        nodes: vec![
            node("osc_1", NodeType::Oscillator, 60.0, 180.0),
            node("gain_dry", NodeType::Gain, 280.0, 120.0).with_param("gain", 0.4),
            node("delay_1", NodeType::Delay, 280.0, 280.0).with_param("delayTime", 0.3),
            node("gain_fb", NodeType::Gain, 500.0, 280.0).with_param("gain", 0.4),
            node("gain_master", NodeType::Gain, 560.0, 120.0).with_param("gain", 0.5),
            node("destination_0", NodeType::Destination, 780.0, 180.0),
        ],
        connections: vec![
            wire("conn_1", "osc_1", "gain_dry"),
            wire("conn_2", "osc_1", "delay_1"),
            wire("conn_3", "delay_1", "gain_fb"),
            // The loop: feedback gain returns into the delay
            wire("conn_4", "gain_fb", "delay_1"),
            wire("conn_5", "gain_fb", "gain_master"),
            wire("conn_6", "gain_dry", "gain_master"),
            wire("conn_7", "gain_master", "destination_0"),
        ],
    }
}

fn additive_synth() -> Preset {
    Preset {
        id: "additive-synth",
        name: "6. Additive Synthesis",
        description: "Three oscillators at different frequencies sum into a \
                      richer timbre. Rebalance the per-voice gains.",
        nodes: vec![
            node("osc_1", NodeType::Oscillator, 60.0, 80.0).with_param("frequency", 220.0),
            node("osc_2", NodeType::Oscillator, 60.0, 220.0).with_param("frequency", 440.0),
            node("osc_3", NodeType::Oscillator, 60.0, 360.0).with_param("frequency", 660.0),
            node("gain_1", NodeType::Gain, 300.0, 80.0).with_param("gain", 0.3),
            node("gain_2", NodeType::Gain, 300.0, 220.0).with_param("gain", 0.15),
            node("gain_3", NodeType::Gain, 300.0, 360.0).with_param("gain", 0.1),
            node("gain_master", NodeType::Gain, 540.0, 220.0).with_param("gain", 0.5),
            node("destination_0", NodeType::Destination, 760.0, 220.0),
        ],
        connections: vec![
            wire("conn_1", "osc_1", "gain_1"),
            wire("conn_2", "osc_2", "gain_2"),
            wire("conn_3", "osc_3", "gain_3"),
            wire("conn_4", "gain_1", "gain_master"),
            wire("conn_5", "gain_2", "gain_master"),
            wire("conn_6", "gain_3", "gain_master"),
            wire("conn_7", "gain_master", "destination_0"),
        ],
    }
}

fn stereo_panning() -> Preset {
    Preset {
        id: "stereo-panning",
        name: "7. Stereo Space",
        description: "A stereo panner places the sound in the stereo field. \
                      Sweep pan from -1 (left) to 1 (right).",
        nodes: vec![
            node("osc_1", NodeType::Oscillator, 60.0, 200.0)
                .with_param("type", "square")
                .with_param("frequency", 330.0),
            node("gain_1", NodeType::Gain, 280.0, 200.0).with_param("gain", 0.2),
            node("panner_1", NodeType::StereoPanner, 500.0, 200.0).with_param("pan", -0.7),
            node("destination_0", NodeType::Destination, 720.0, 200.0),
        ],
        connections: vec![
            wire("conn_1", "osc_1", "gain_1"),
            wire("conn_2", "gain_1", "panner_1"),
            wire("conn_3", "panner_1", "destination_0"),
        ],
    }
}
