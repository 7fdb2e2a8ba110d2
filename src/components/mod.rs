//! UI components.

pub mod resource_graph;
