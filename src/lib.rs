//! incident-resource-graph: upstream resource topology of an incident entity.
//!
//! This crate provides a WASM canvas component that lays out the resources an
//! entity depends on as rank bands, lets aggregated nodes be expanded in place
//! and collapsed again, and supports clamped pan, zoom and click highlighting.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::resource_graph::{
	GraphConfig, NoDataReason, Node, ResourceGraphCanvas, TopologyError, TopologyGraph,
	TopologyLoad, TopologyPayload,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("resource-graph: logging initialized");
}

/// Text of the `<script id=...>` element, if present.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load the topology from a script element with id="topology-data".
/// Expected format: `{ incident_id, entity_id, response }` or
/// `{ incident_id, entity_id, error }`.
fn load_topology_data() -> TopologyLoad {
	let Some(json_text) = script_text("topology-data") else {
		warn!("resource-graph: no topology-data element on the page");
		return TopologyLoad::Failed(TopologyError::NoData(NoDataReason::EmptyResponse));
	};

	let parsed = serde_json::from_str::<TopologyPayload>(&json_text)
		.map_err(TopologyError::from)
		.and_then(TopologyPayload::into_parts);
	match &parsed {
		Ok((query, response)) => info!(
			"resource-graph: loaded incident {} with {} ranks, {} edges",
			query.incident_id,
			response.ranks.len(),
			response.edges.len()
		),
		Err(e) => warn!("resource-graph: topology unavailable: {}", e),
	}
	parsed.into()
}

/// Load optional view configuration from a script element with id="graph-config".
fn load_graph_config() -> GraphConfig {
	let Some(json_text) = script_text("graph-config") else {
		return GraphConfig::default();
	};
	serde_json::from_str(&json_text).unwrap_or_else(|e| {
		warn!("resource-graph: ignoring invalid graph config: {}", e);
		GraphConfig::default()
	})
}

/// Main application component.
/// Loads the topology from the DOM and renders the resource graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let load = load_topology_data();
	let topology = Signal::derive(move || load.clone());
	let config = load_graph_config();

	let on_to_detail = Callback::new(|node: Node| {
		info!("resource-graph: detail requested for `{}`", node.entity.id);
	});
	let on_collapse_resource = Callback::new(|_: ()| {
		info!("resource-graph: resource panel collapse requested");
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Incident Resource Topology" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ResourceGraphCanvas
				data=topology
				config=config
				on_to_detail=on_to_detail
				on_collapse_resource=on_collapse_resource
			/>
			<div class="graph-overlay">
				<h1>"Resource topology"</h1>
				<p class="subtitle">"Click an aggregated node to expand it. Scroll to pan, ctrl + scroll to zoom."</p>
			</div>
		</div>
	}
}
