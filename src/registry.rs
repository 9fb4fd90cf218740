//! Node Type Registry
//!
//! Static catalog of every node type the playground can place on the
//! canvas: display label, category, port declarations, and parameter
//! schemas with defaults. Read-only after process start; every other
//! layer treats this as the single source of truth for what a type *is*.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Closed set of node types available on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Oscillator,
    Gain,
    Destination,
    Analyser,
    BiquadFilter,
    Delay,
    StereoPanner,
    DynamicsCompressor,
}

impl NodeType {
    /// All node types, in palette order
    pub const ALL: [NodeType; 8] = [
        NodeType::Oscillator,
        NodeType::Gain,
        NodeType::Destination,
        NodeType::Analyser,
        NodeType::BiquadFilter,
        NodeType::Delay,
        NodeType::StereoPanner,
        NodeType::DynamicsCompressor,
    ];

    /// Stable string key, used for display names in generated code
    pub fn key(self) -> &'static str {
        match self {
            NodeType::Oscillator => "oscillator",
            NodeType::Gain => "gain",
            NodeType::Destination => "destination",
            NodeType::Analyser => "analyser",
            NodeType::BiquadFilter => "biquadFilter",
            NodeType::Delay => "delay",
            NodeType::StereoPanner => "stereoPanner",
            NodeType::DynamicsCompressor => "dynamicsCompressor",
        }
    }

    /// Whether this type is a generating source that must be started
    pub fn is_source(self) -> bool {
        meta_of(self).category == NodeCategory::Source
    }
}

/// Category for palette grouping and node coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Source,
    Effect,
    Analysis,
    Output,
}

impl NodeCategory {
    /// Theme color used by the rendering layer
    pub fn theme_color(self) -> &'static str {
        match self {
            NodeCategory::Source => "#3b82f6",
            NodeCategory::Effect => "#22c55e",
            NodeCategory::Analysis => "#a855f7",
            NodeCategory::Output => "#f97316",
        }
    }
}

/// Direction of a port on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Input,
    Output,
}

impl PortKind {
    pub fn opposite(self) -> PortKind {
        match self {
            PortKind::Input => PortKind::Output,
            PortKind::Output => PortKind::Input,
        }
    }
}

/// Declaration of a port on a node type.
///
/// A node accepts incoming or outgoing wires exactly when it declares a
/// port of that kind; no type declares more than one port per kind.
#[derive(Debug, Clone, Copy)]
pub struct PortDecl {
    pub kind: PortKind,
    pub label: &'static str,
}

/// One entry in a select parameter's option list
#[derive(Debug, Clone, Copy)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub value: &'static str,
}

/// How a parameter is edited and constrained
#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
    /// Continuous value within `[min, max]`, edited in `step` increments
    Range { min: f64, max: f64, step: f64 },
    /// One value out of a fixed option list
    Select { options: &'static [ChoiceOption] },
}

/// Default value carried by a parameter schema
#[derive(Debug, Clone, Copy)]
pub enum ParamDefault {
    Number(f64),
    Choice(&'static str),
}

impl ParamDefault {
    /// Materialize the default as an owned runtime value
    pub fn value(&self) -> ParamValue {
        match self {
            ParamDefault::Number(n) => ParamValue::Number(*n),
            ParamDefault::Choice(s) => ParamValue::Choice((*s).to_string()),
        }
    }
}

/// Runtime value of a parameter on a node instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Choice(String),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Choice(_) => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            ParamValue::Number(_) => None,
            ParamValue::Choice(s) => Some(s.as_str()),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Choice(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Choice(s)
    }
}

/// Schema for a single parameter of a node type
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Key, unique within the node type
    pub key: &'static str,
    /// Human-readable label for the inspector
    pub label: &'static str,
    pub kind: ParamKind,
    pub default: ParamDefault,
}

/// Metadata for one node type
#[derive(Debug, Clone, Copy)]
pub struct NodeMeta {
    pub node_type: NodeType,
    pub label: &'static str,
    pub category: NodeCategory,
    pub ports: &'static [PortDecl],
    pub params: &'static [ParamSpec],
    pub description: &'static str,
}

impl NodeMeta {
    /// The node's port of the given kind, if it declares one
    pub fn port(&self, kind: PortKind) -> Option<&'static PortDecl> {
        self.ports.iter().find(|p| p.kind == kind)
    }

    pub fn has_port(&self, kind: PortKind) -> bool {
        self.port(kind).is_some()
    }

    /// Parameter schema for `key`, if the type declares it
    pub fn param(&self, key: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.key == key)
    }
}

static OSCILLATOR: NodeMeta = NodeMeta {
    node_type: NodeType::Oscillator,
    label: "Oscillator",
    category: NodeCategory::Source,
    ports: &[PortDecl {
        kind: PortKind::Output,
        label: "out",
    }],
    params: &[
        ParamSpec {
            key: "type",
            label: "Waveform",
            kind: ParamKind::Select {
                options: &[
                    ChoiceOption {
                        label: "Sine",
                        value: "sine",
                    },
                    ChoiceOption {
                        label: "Square",
                        value: "square",
                    },
                    ChoiceOption {
                        label: "Sawtooth",
                        value: "sawtooth",
                    },
                    ChoiceOption {
                        label: "Triangle",
                        value: "triangle",
                    },
                ],
            },
            default: ParamDefault::Choice("sine"),
        },
        ParamSpec {
            key: "frequency",
            label: "Frequency",
            kind: ParamKind::Range {
                min: 20.0,
                max: 2000.0,
                step: 1.0,
            },
            default: ParamDefault::Number(440.0),
        },
        ParamSpec {
            key: "detune",
            label: "Detune",
            kind: ParamKind::Range {
                min: -100.0,
                max: 100.0,
                step: 1.0,
            },
            default: ParamDefault::Number(0.0),
        },
    ],
    description: "Generates a periodic waveform. Realized by an OscillatorNode.",
};

static GAIN: NodeMeta = NodeMeta {
    node_type: NodeType::Gain,
    label: "Gain",
    category: NodeCategory::Effect,
    ports: &[
        PortDecl {
            kind: PortKind::Input,
            label: "in",
        },
        PortDecl {
            kind: PortKind::Output,
            label: "out",
        },
    ],
    params: &[ParamSpec {
        key: "gain",
        label: "Gain",
        kind: ParamKind::Range {
            min: 0.0,
            max: 1.0,
            step: 0.01,
        },
        default: ParamDefault::Number(0.5),
    }],
    description: "Scales signal amplitude. Realized by a GainNode.",
};

static DESTINATION: NodeMeta = NodeMeta {
    node_type: NodeType::Destination,
    label: "Destination",
    category: NodeCategory::Output,
    ports: &[PortDecl {
        kind: PortKind::Input,
        label: "in",
    }],
    params: &[],
    description: "Final audio output (the speakers). Realized by the AudioDestinationNode.",
};

static ANALYSER: NodeMeta = NodeMeta {
    node_type: NodeType::Analyser,
    label: "Analyser",
    category: NodeCategory::Analysis,
    ports: &[
        PortDecl {
            kind: PortKind::Input,
            label: "in",
        },
        PortDecl {
            kind: PortKind::Output,
            label: "out",
        },
    ],
    params: &[ParamSpec {
        key: "fftSize",
        label: "FFT Size",
        kind: ParamKind::Select {
            options: &[
                ChoiceOption {
                    label: "256",
                    value: "256",
                },
                ChoiceOption {
                    label: "512",
                    value: "512",
                },
                ChoiceOption {
                    label: "1024",
                    value: "1024",
                },
                ChoiceOption {
                    label: "2048",
                    value: "2048",
                },
                ChoiceOption {
                    label: "4096",
                    value: "4096",
                },
            ],
        },
        default: ParamDefault::Choice("2048"),
    }],
    description: "Taps the signal for waveform and spectrum display. Realized by an AnalyserNode.",
};

static BIQUAD_FILTER: NodeMeta = NodeMeta {
    node_type: NodeType::BiquadFilter,
    label: "BiquadFilter",
    category: NodeCategory::Effect,
    ports: &[
        PortDecl {
            kind: PortKind::Input,
            label: "in",
        },
        PortDecl {
            kind: PortKind::Output,
            label: "out",
        },
    ],
    params: &[
        ParamSpec {
            key: "type",
            label: "Filter Type",
            kind: ParamKind::Select {
                options: &[
                    ChoiceOption {
                        label: "Lowpass",
                        value: "lowpass",
                    },
                    ChoiceOption {
                        label: "Highpass",
                        value: "highpass",
                    },
                    ChoiceOption {
                        label: "Bandpass",
                        value: "bandpass",
                    },
                    ChoiceOption {
                        label: "Notch",
                        value: "notch",
                    },
                    ChoiceOption {
                        label: "Peaking",
                        value: "peaking",
                    },
                ],
            },
            default: ParamDefault::Choice("lowpass"),
        },
        ParamSpec {
            key: "frequency",
            label: "Frequency",
            kind: ParamKind::Range {
                min: 20.0,
                max: 20000.0,
                step: 1.0,
            },
            default: ParamDefault::Number(1000.0),
        },
        ParamSpec {
            key: "Q",
            label: "Q",
            kind: ParamKind::Range {
                min: 0.1,
                max: 20.0,
                step: 0.1,
            },
            default: ParamDefault::Number(1.0),
        },
    ],
    description: "Second-order filter in several configurations. Realized by a BiquadFilterNode.",
};

static DELAY: NodeMeta = NodeMeta {
    node_type: NodeType::Delay,
    label: "Delay",
    category: NodeCategory::Effect,
    ports: &[
        PortDecl {
            kind: PortKind::Input,
            label: "in",
        },
        PortDecl {
            kind: PortKind::Output,
            label: "out",
        },
    ],
    params: &[ParamSpec {
        key: "delayTime",
        label: "Delay Time",
        kind: ParamKind::Range {
            min: 0.0,
            max: 5.0,
            step: 0.01,
        },
        default: ParamDefault::Number(0.5),
    }],
    description: "Delays the signal, enabling echo and feedback loops. Realized by a DelayNode.",
};

static STEREO_PANNER: NodeMeta = NodeMeta {
    node_type: NodeType::StereoPanner,
    label: "StereoPanner",
    category: NodeCategory::Effect,
    ports: &[
        PortDecl {
            kind: PortKind::Input,
            label: "in",
        },
        PortDecl {
            kind: PortKind::Output,
            label: "out",
        },
    ],
    params: &[ParamSpec {
        key: "pan",
        label: "Pan",
        kind: ParamKind::Range {
            min: -1.0,
            max: 1.0,
            step: 0.01,
        },
        default: ParamDefault::Number(0.0),
    }],
    description: "Places the signal in the stereo field. Realized by a StereoPannerNode.",
};

static DYNAMICS_COMPRESSOR: NodeMeta = NodeMeta {
    node_type: NodeType::DynamicsCompressor,
    label: "Compressor",
    category: NodeCategory::Effect,
    ports: &[
        PortDecl {
            kind: PortKind::Input,
            label: "in",
        },
        PortDecl {
            kind: PortKind::Output,
            label: "out",
        },
    ],
    params: &[
        ParamSpec {
            key: "threshold",
            label: "Threshold",
            kind: ParamKind::Range {
                min: -100.0,
                max: 0.0,
                step: 1.0,
            },
            default: ParamDefault::Number(-24.0),
        },
        ParamSpec {
            key: "knee",
            label: "Knee",
            kind: ParamKind::Range {
                min: 0.0,
                max: 40.0,
                step: 1.0,
            },
            default: ParamDefault::Number(30.0),
        },
        ParamSpec {
            key: "ratio",
            label: "Ratio",
            kind: ParamKind::Range {
                min: 1.0,
                max: 20.0,
                step: 0.5,
            },
            default: ParamDefault::Number(12.0),
        },
        ParamSpec {
            key: "attack",
            label: "Attack",
            kind: ParamKind::Range {
                min: 0.0,
                max: 1.0,
                step: 0.001,
            },
            default: ParamDefault::Number(0.003),
        },
        ParamSpec {
            key: "release",
            label: "Release",
            kind: ParamKind::Range {
                min: 0.0,
                max: 1.0,
                step: 0.01,
            },
            default: ParamDefault::Number(0.25),
        },
    ],
    description: "Compresses dynamic range. Realized by a DynamicsCompressorNode.",
};

/// Look up the metadata for a node type.
///
/// Total over the closed [`NodeType`] set; never fails.
pub fn meta_of(node_type: NodeType) -> &'static NodeMeta {
    match node_type {
        NodeType::Oscillator => &OSCILLATOR,
        NodeType::Gain => &GAIN,
        NodeType::Destination => &DESTINATION,
        NodeType::Analyser => &ANALYSER,
        NodeType::BiquadFilter => &BIQUAD_FILTER,
        NodeType::Delay => &DELAY,
        NodeType::StereoPanner => &STEREO_PANNER,
        NodeType::DynamicsCompressor => &DYNAMICS_COMPRESSOR,
    }
}

/// Build the default parameter mapping for a node type
pub fn default_params(node_type: NodeType) -> HashMap<String, ParamValue> {
    meta_of(node_type)
        .params
        .iter()
        .map(|p| (p.key.to_string(), p.default.value()))
        .collect()
}

/// Node types shown in the palette (everything except the sink)
pub fn palette() -> impl Iterator<Item = &'static NodeMeta> {
    NodeType::ALL
        .iter()
        .filter(|t| **t != NodeType::Destination)
        .map(|t| meta_of(*t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_of_total() {
        for t in NodeType::ALL {
            let meta = meta_of(t);
            assert_eq!(meta.node_type, t);
            assert!(!meta.label.is_empty());
            assert!(!meta.description.is_empty());
        }
    }

    #[test]
    fn test_at_most_one_port_per_kind() {
        for t in NodeType::ALL {
            let meta = meta_of(t);
            for kind in [PortKind::Input, PortKind::Output] {
                let count = meta.ports.iter().filter(|p| p.kind == kind).count();
                assert!(count <= 1, "{}: multiple {:?} ports", meta.label, kind);
            }
        }
    }

    #[test]
    fn test_default_params_cover_every_key() {
        for t in NodeType::ALL {
            let defaults = default_params(t);
            let meta = meta_of(t);
            assert_eq!(defaults.len(), meta.params.len());
            for spec in meta.params {
                assert_eq!(defaults.get(spec.key), Some(&spec.default.value()));
            }
        }
    }

    #[test]
    fn test_oscillator_defaults() {
        let defaults = default_params(NodeType::Oscillator);
        assert_eq!(defaults.get("type"), Some(&ParamValue::from("sine")));
        assert_eq!(defaults.get("frequency"), Some(&ParamValue::Number(440.0)));
        assert_eq!(defaults.get("detune"), Some(&ParamValue::Number(0.0)));
    }

    #[test]
    fn test_palette_excludes_sink() {
        let types: Vec<NodeType> = palette().map(|m| m.node_type).collect();
        assert_eq!(types.len(), NodeType::ALL.len() - 1);
        assert!(!types.contains(&NodeType::Destination));
    }

    #[test]
    fn test_only_oscillator_is_source() {
        for t in NodeType::ALL {
            assert_eq!(t.is_source(), t == NodeType::Oscillator);
        }
    }

    #[test]
    fn test_port_capabilities() {
        assert!(meta_of(NodeType::Oscillator).has_port(PortKind::Output));
        assert!(!meta_of(NodeType::Oscillator).has_port(PortKind::Input));
        assert!(meta_of(NodeType::Destination).has_port(PortKind::Input));
        assert!(!meta_of(NodeType::Destination).has_port(PortKind::Output));
        assert!(meta_of(NodeType::Gain).has_port(PortKind::Input));
        assert!(meta_of(NodeType::Gain).has_port(PortKind::Output));
    }

    #[test]
    fn test_param_lookup() {
        let meta = meta_of(NodeType::BiquadFilter);
        assert!(meta.param("frequency").is_some());
        assert!(meta.param("Q").is_some());
        assert!(meta.param("gain").is_none());
    }

    #[test]
    fn test_node_type_serde_key() {
        let json = serde_json::to_string(&NodeType::BiquadFilter).unwrap();
        assert_eq!(json, "\"biquadFilter\"");
        let back: NodeType = serde_json::from_str("\"stereoPanner\"").unwrap();
        assert_eq!(back, NodeType::StereoPanner);
    }

    #[test]
    fn test_param_value_untagged_serde() {
        let n: ParamValue = serde_json::from_str("440").unwrap();
        assert_eq!(n, ParamValue::Number(440.0));
        let s: ParamValue = serde_json::from_str("\"sawtooth\"").unwrap();
        assert_eq!(s.as_choice(), Some("sawtooth"));
    }
}
