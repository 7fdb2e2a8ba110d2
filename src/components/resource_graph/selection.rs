//! Click-driven highlighting and tooltip placement.
//!
//! Clicking a node dims everything, then lifts the node, its incident edges
//! and their opposite endpoints back out as highlighted. Clicking an edge
//! does the same for the edge and its two endpoints. Clicking the empty
//! canvas clears every state.

use std::collections::HashMap;

use super::config::TooltipConfig;
use super::geometry::BBox;
use super::model::{EdgeId, GraphModel, NodeId};
use super::renderer::ItemRef;

/// Visual state flags of a node or edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemState {
	pub highlight: bool,
	pub dark: bool,
}

impl ItemState {
	pub const DARK: ItemState = ItemState {
		highlight: false,
		dark: true,
	};
	pub const HIGHLIGHT: ItemState = ItemState {
		highlight: true,
		dark: false,
	};
}

/// Highlight/dark flags for every item, plus the current selection.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
	nodes: HashMap<NodeId, ItemState>,
	edges: HashMap<EdgeId, ItemState>,
	selected: Option<ItemRef>,
}

impl SelectionState {
	pub fn selected(&self) -> Option<&ItemRef> {
		self.selected.as_ref()
	}

	pub fn node_state(&self, id: &str) -> ItemState {
		self.nodes.get(id).copied().unwrap_or_default()
	}

	pub fn edge_state(&self, id: &str) -> ItemState {
		self.edges.get(id).copied().unwrap_or_default()
	}

	/// Whether any item is currently dimmed.
	pub fn is_active(&self) -> bool {
		self.selected.is_some()
	}

	pub fn select_node(&mut self, model: &GraphModel, node_id: &str) {
		self.dim_all(model);
		self.nodes.insert(node_id.to_string(), ItemState::HIGHLIGHT);
		for edge in model.edges_of(node_id) {
			self.edges.insert(edge.id.clone(), ItemState::HIGHLIGHT);
			if let Some(other) = edge.opposite(node_id) {
				self.nodes.insert(other.to_string(), ItemState::HIGHLIGHT);
			}
		}
		self.selected = Some(ItemRef::Node(node_id.to_string()));
	}

	pub fn select_edge(&mut self, model: &GraphModel, edge_id: &str) {
		let Some(edge) = model.edge(edge_id) else {
			return;
		};
		self.dim_all(model);
		self.edges.insert(edge.id.clone(), ItemState::HIGHLIGHT);
		for end in [edge.source.node_id(), edge.target.node_id()] {
			self.nodes.insert(end.to_string(), ItemState::HIGHLIGHT);
		}
		self.selected = Some(ItemRef::Edge(edge_id.to_string()));
	}

	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
		self.selected = None;
	}

	fn dim_all(&mut self, model: &GraphModel) {
		self.clear();
		for node in &model.nodes {
			self.nodes.insert(node.id.clone(), ItemState::DARK);
		}
		for edge in &model.edges {
			self.edges.insert(edge.id.clone(), ItemState::DARK);
		}
	}
}

/// Popover shown for the last clicked item.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipState {
	target: Option<ItemRef>,
	position: (f64, f64),
}

impl TooltipState {
	pub fn target(&self) -> Option<&ItemRef> {
		self.target.as_ref()
	}

	/// Top-left corner in canvas pixels.
	pub fn position(&self) -> Option<(f64, f64)> {
		self.target.as_ref().map(|_| self.position)
	}

	pub fn is_visible(&self) -> bool {
		self.target.is_some()
	}

	/// Show the popover for `item`, or hide it if it was already showing `item`.
	/// Returns whether the popover is visible afterwards.
	pub fn toggle(
		&mut self,
		item: ItemRef,
		anchor: &BBox,
		viewport: (f64, f64),
		config: &TooltipConfig,
	) -> bool {
		if self.target.as_ref() == Some(&item) {
			self.hide();
			return false;
		}
		self.position = place_tooltip(anchor, (config.width, config.height), viewport, config.gap);
		self.target = Some(item);
		true
	}

	pub fn hide(&mut self) {
		self.target = None;
	}
}

/// Top-left corner of a `size` popover next to `anchor` (screen space).
///
/// Prefers the right of and below the anchor, flips to the left/above on
/// overflow, then clamps into the viewport.
pub fn place_tooltip(anchor: &BBox, size: (f64, f64), viewport: (f64, f64), gap: f64) -> (f64, f64) {
	let (w, h) = size;
	let (vw, vh) = viewport;

	let mut x = anchor.max_x + gap;
	if x + w > vw {
		x = anchor.min_x - gap - w;
	}
	let mut y = anchor.max_y + gap;
	if y + h > vh {
		y = anchor.min_y - gap - h;
	}

	(x.min(vw - w).max(0.0), y.min(vh - h).max(0.0))
}

#[cfg(test)]
mod tests {
	use super::super::aggregation::AggregationController;
	use super::super::config::LayoutConfig;
	use super::super::fixtures;
	use super::*;

	#[test]
	fn node_click_highlights_neighbourhood_and_dims_the_rest() {
		let model = fixtures::wide_model();
		let mut selection = SelectionState::default();
		selection.select_node(&model, "pod-a");

		for id in ["pod-a", "svc-a", "svc-b", "host-a"] {
			assert_eq!(selection.node_state(id), ItemState::HIGHLIGHT, "{id}");
		}
		for id in ["svc-c", "pod-b"] {
			assert_eq!(selection.node_state(id), ItemState::DARK, "{id}");
		}
		assert_eq!(selection.edge_state("svc-a-pod-a"), ItemState::HIGHLIGHT);
		assert_eq!(selection.edge_state("pod-a-host-a"), ItemState::HIGHLIGHT);
		assert_eq!(selection.edge_state("pod-b-host-a"), ItemState::DARK);
		assert_eq!(selection.selected(), Some(&ItemRef::Node("pod-a".into())));
	}

	#[test]
	fn rewired_edges_still_count_as_incident() {
		let mut model = fixtures::scenario_model();
		AggregationController::new()
			.expand(&mut model, "n1", &LayoutConfig::default())
			.unwrap();
		let mut selection = SelectionState::default();
		selection.select_node(&model, "n2");

		assert_eq!(selection.node_state("n1"), ItemState::HIGHLIGHT);
		assert_eq!(selection.node_state("p1"), ItemState::DARK);
		assert_eq!(selection.edge_state("n1-n2"), ItemState::HIGHLIGHT);
	}

	#[test]
	fn edge_click_highlights_both_ends() {
		let model = fixtures::wide_model();
		let mut selection = SelectionState::default();
		selection.select_edge(&model, "svc-b-pod-b");

		assert_eq!(selection.node_state("svc-b"), ItemState::HIGHLIGHT);
		assert_eq!(selection.node_state("pod-b"), ItemState::HIGHLIGHT);
		assert_eq!(selection.node_state("svc-c"), ItemState::DARK);
		assert_eq!(selection.edge_state("svc-c-pod-b"), ItemState::DARK);
	}

	#[test]
	fn canvas_click_clears_everything() {
		let model = fixtures::wide_model();
		let mut selection = SelectionState::default();
		selection.select_node(&model, "pod-a");
		selection.clear();

		assert!(!selection.is_active());
		assert_eq!(selection.node_state("svc-c"), ItemState::default());
		assert_eq!(selection.edge_state("pod-b-host-a"), ItemState::default());
	}

	#[test]
	fn tooltip_toggles_on_the_same_item() {
		let mut tooltip = TooltipState::default();
		let config = TooltipConfig::default();
		let anchor = BBox::new(100.0, 100.0, 140.0, 140.0);

		assert!(tooltip.toggle(ItemRef::Node("a".into()), &anchor, (1000.0, 800.0), &config));
		assert_eq!(tooltip.position(), Some((148.0, 148.0)));
		assert!(tooltip.toggle(ItemRef::Node("b".into()), &anchor, (1000.0, 800.0), &config));
		assert_eq!(tooltip.target(), Some(&ItemRef::Node("b".into())));
		assert!(!tooltip.toggle(ItemRef::Node("b".into()), &anchor, (1000.0, 800.0), &config));
		assert_eq!(tooltip.position(), None);
	}

	#[test]
	fn tooltip_flips_and_clamps_inside_viewport() {
		let size = (300.0, 200.0);
		let near_corner = BBox::new(900.0, 700.0, 940.0, 740.0);
		assert_eq!(
			place_tooltip(&near_corner, size, (1000.0, 800.0), 8.0),
			(592.0, 492.0)
		);

		let near_origin = BBox::new(-50.0, -50.0, -10.0, -10.0);
		assert_eq!(place_tooltip(&near_origin, size, (1000.0, 800.0), 8.0), (0.0, 0.0));

		let tiny_viewport = place_tooltip(&near_corner, size, (200.0, 100.0), 8.0);
		assert_eq!(tiny_viewport, (0.0, 0.0));
	}
}
