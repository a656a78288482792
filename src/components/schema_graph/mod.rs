//! Schema diagram canvas: grid layout, edge clipping, pan/zoom and the pointer
//! state machine, plus the Leptos component that hosts them.

pub mod clip;
mod component;
pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod render;
pub mod state;
pub mod types;
pub mod viewport;

pub use component::SchemaGraphCanvas;
pub use config::{LayoutConfig, StyleTable};
pub use error::GraphError;
pub use layout::LayoutPolicy;
pub use state::{Action, InteractionState, Modifiers, SchemaGraphState};
pub use types::{Edge, Graph, Node, Point};
