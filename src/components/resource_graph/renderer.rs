//! Drawing seam between the graph model and a concrete backend.
//!
//! Layout and aggregation never talk to the DOM. A [`Renderer`] receives one
//! call per item per frame and can answer bounding-box queries afterwards,
//! which is all the width correction needs.

use std::collections::HashMap;

use super::geometry::BBox;
use super::model::{Combo, ComboId, Edge, Node};
use super::selection::ItemState;
use super::viewport::ViewTransform;

/// Reference to a drawable item by id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemRef {
	Node(String),
	Edge(String),
	Combo(String),
}

/// World-space line segment an edge is drawn along.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePath {
	pub from: (f64, f64),
	pub to: (f64, f64),
}

/// A drawing backend.
pub trait Renderer {
	/// Start a frame. Clears whatever the previous frame recorded.
	fn begin_frame(&mut self, transform: &ViewTransform, width: f64, height: f64);

	fn draw_combo(&mut self, combo: &Combo, state: ItemState);

	/// `node_radius` is how far plain endpoints sit from the path ends.
	fn draw_edge(&mut self, edge: &Edge, path: EdgePath, node_radius: f64, state: ItemState);

	fn draw_node(&mut self, node: &Node, radius: f64, state: ItemState);

	fn end_frame(&mut self) {}

	/// World-space box of an item as last drawn, including its content for
	/// combos.
	fn measure_bounding_box(&self, item: &ItemRef) -> Option<BBox>;
}

/// Bounding-box bookkeeping shared by renderers.
///
/// Combo boxes grow to cover the nodes drawn inside them, and child combos
/// also grow their parent band.
#[derive(Clone, Debug, Default)]
pub struct BoxRecorder {
	boxes: HashMap<ItemRef, BBox>,
	parents: HashMap<ComboId, ComboId>,
}

impl BoxRecorder {
	pub fn clear(&mut self) {
		self.boxes.clear();
		self.parents.clear();
	}

	pub fn get(&self, item: &ItemRef) -> Option<BBox> {
		self.boxes.get(item).copied()
	}

	pub fn record_combo(&mut self, combo: &Combo) {
		let bbox = combo.bbox();
		if let Some(parent) = &combo.parent_id {
			self.parents.insert(combo.id.clone(), parent.clone());
			self.grow(ItemRef::Combo(parent.clone()), bbox);
		}
		self.grow(ItemRef::Combo(combo.id.clone()), bbox);
	}

	pub fn record_edge(&mut self, edge: &Edge, path: EdgePath) {
		let bbox = BBox::new(
			path.from.0.min(path.to.0),
			path.from.1.min(path.to.1),
			path.from.0.max(path.to.0),
			path.from.1.max(path.to.1),
		);
		self.boxes.insert(ItemRef::Edge(edge.id.clone()), bbox);
	}

	/// Record a node box and grow its combo, plus the band above it.
	pub fn record_node(&mut self, node: &Node, bbox: BBox) {
		self.boxes.insert(ItemRef::Node(node.id.clone()), bbox);
		self.grow(ItemRef::Combo(node.combo_id.clone()), bbox);
		if let Some(parent) = self.parents.get(&node.combo_id).cloned() {
			self.grow(ItemRef::Combo(parent), bbox);
		}
	}

	fn grow(&mut self, item: ItemRef, bbox: BBox) {
		self.boxes
			.entry(item)
			.and_modify(|b| *b = b.union(&bbox))
			.or_insert(bbox);
	}
}

#[cfg(test)]
mod tests {
	use super::super::aggregation::AggregationController;
	use super::super::config::LayoutConfig;
	use super::super::fixtures;
	use super::super::layout::RankLayout;
	use super::*;

	#[test]
	fn node_boxes_grow_their_combo_and_band() {
		let mut model = fixtures::wide_model();
		let layout = RankLayout::default();
		layout.compute(&mut model, 400.0, 600.0);
		AggregationController::new()
			.expand(&mut model, "svc-b", &LayoutConfig::default())
			.unwrap();
		layout.compute(&mut model, 400.0, 600.0);

		let mut recorder = BoxRecorder::default();
		for combo in &model.combos {
			recorder.record_combo(combo);
		}
		let far = model.node("svc-c").unwrap().clone();
		recorder.record_node(&far, BBox::centered(2000.0, far.y, 36.0, 36.0));
		let peer = model.node("svc-b3").unwrap().clone();
		recorder.record_node(&peer, BBox::centered(peer.x, peer.y, 900.0, 36.0));

		let band = recorder.get(&ItemRef::Combo("0".into())).unwrap();
		assert_eq!(band.max_x, 2018.0);
		let child = recorder.get(&ItemRef::Combo("0::svc-b".into())).unwrap();
		assert_eq!(child.max_x, peer.x + 450.0);
		assert!(recorder.get(&ItemRef::Combo("1".into())).unwrap().max_x < 2018.0);

		recorder.clear();
		assert_eq!(recorder.get(&ItemRef::Combo("0".into())), None);
	}
}
