//! # Waveboard: Visual Audio Graph Playground Core
//!
//! `waveboard` is the headless core of a node-based Web Audio learning
//! playground. Users place audio nodes on a canvas, wire them together by
//! dragging between ports, tweak parameters, and hear the result while
//! reading the equivalent JavaScript.
//!
//! ## Architecture
//!
//! The library is organized around one source of truth and three consumers:
//!
//! - **Graph Model** - nodes, connections, selection, view state, and id
//!   allocation; every mutation goes through it
//! - **Node Registry** - static schemas for the eight supported node types,
//!   driving defaults, parameter validation, and the palette
//! - **Audio Engine** - synchronizes a backend (behind the [`engine::AudioBackend`]
//!   trait) with the model by full rebuild, plus live parameter pushes
//! - **Code Generation** - pure rendering of the graph as a Web Audio
//!   JavaScript program
//!
//! Connection drafting and the preset library sit on top of the model.
//!
//! ## Quick Start
//!
//! ```rust
//! use waveboard::prelude::*;
//!
//! // A fresh graph always contains the destination sink
//! let mut model = GraphModel::new();
//!
//! // Add an oscillator and wire it to the output
//! let osc = model.add_node(NodeType::Oscillator, Position::new(100.0, 200.0));
//! model.add_connection(Endpoint::output(&osc), Endpoint::input("destination_0"));
//!
//! // Tweak a parameter
//! model.update_param(&osc, "frequency", 220.0);
//!
//! // Render the equivalent JavaScript
//! let js = generate_code(model.nodes(), model.connections());
//! assert!(js.contains("ctx.createOscillator()"));
//! ```

pub mod codegen;
pub mod draft;
pub mod engine;
pub mod graph;
pub mod presets;
pub mod registry;

/// Prelude module for convenient imports
pub mod prelude {
    // Graph model
    pub use crate::graph::{
        Connection, Endpoint, GraphModel, GraphNode, GraphSnapshot, IdAllocator, Position,
        ViewState, MAX_ZOOM, MIN_ZOOM,
    };

    // Node registry
    pub use crate::registry::{
        default_params, meta_of, palette, NodeCategory, NodeMeta, NodeType, ParamKind, ParamSpec,
        ParamValue, PortDecl, PortKind,
    };

    // Connection drafting
    pub use crate::draft::{ConnectionDraft, DraftState, SNAP_DISTANCE};

    // Audio engine
    pub use crate::engine::{AudioBackend, BackendError, Engine, Materialized};

    // Code generation
    pub use crate::codegen::generate_code;

    // Presets
    pub use crate::presets::{Preset, PresetLibrary};
}

// Re-export key types at crate root for convenience
pub use prelude::*;
