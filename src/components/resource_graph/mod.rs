//! Incident resource topology component.
//!
//! Draws the upstream dependencies of an entity as horizontal rank bands on
//! an HTML canvas, with:
//! - Deterministic band layout, one band per rank/category
//! - Reversible expansion of aggregated nodes into child combos
//! - Clamped pan, dominant-axis scroll and cursor-anchored zoom
//! - Click highlighting of a node's neighbourhood, with a popover
//!
//! Everything except `canvas` and `component` is plain Rust and runs without
//! a browser.
//!
//! # Example
//!
//! ```ignore
//! use incident_resource_graph::{ResourceGraphCanvas, TopologyLoad};
//!
//! let load = TopologyLoad::Loaded { query, response };
//! view! {
//!     <ResourceGraphCanvas
//!         data=Signal::derive(move || load.clone())
//!         on_to_detail=Callback::new(|node| log::info!("{node:?}"))
//!     />
//! }
//! ```

mod aggregation;
mod canvas;
mod component;
pub mod config;
mod error;
mod geometry;
mod graph;
mod layout;
mod model;
mod render;
mod renderer;
mod selection;
pub mod theme;
mod types;
mod viewport;

#[cfg(test)]
mod fixtures;

pub use aggregation::{AggregationChange, AggregationController};
pub use component::{ResourceGraphCanvas, TopologyLoad};
pub use config::GraphConfig;
pub use error::{NoDataReason, TopologyError};
pub use graph::{ClickOutcome, GraphEvent, Phase, TooltipContent, TopologyGraph};
pub use geometry::BBox;
pub use layout::RankLayout;
pub use model::{Aggregation, Combo, Edge, EdgeEndpoint, Entity, GraphModel, Node};
pub use renderer::{EdgePath, ItemRef, Renderer};
pub use selection::{ItemState, SelectionState, TooltipState};
pub use theme::Theme;
pub use types::{TopologyPayload, TopologyQuery, TopologyResponse};
pub use viewport::{ViewTransform, ViewportController};
