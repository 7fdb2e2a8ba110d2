//! Reversible expansion of aggregated nodes into child combos.
//!
//! Expanding a node moves its peers into a synthetic child combo and repoints
//! the node's edges at an anchor inside that combo. Collapsing undoes every
//! step exactly, so `collapse(expand(g))` has the same shape as `g`.
//!
//! Only one child combo is open at a time: expanding a second node first
//! collapses whatever is open.

use std::collections::{BTreeMap, HashSet};

use log::info;

use super::config::LayoutConfig;
use super::error::TopologyError;
use super::model::{
	Aggregation, Combo, ComboId, EdgeEndpoint, GraphModel, NodeId, anchor_endpoint_id,
	child_combo_id,
};

/// What a successful aggregation call changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AggregationChange {
	Expanded {
		origin: ComboId,
		child: ComboId,
		anchor: NodeId,
	},
	Collapsed {
		origin: ComboId,
		child: ComboId,
		anchor: NodeId,
	},
}

impl AggregationChange {
	/// Band whose layout must be recomputed.
	pub fn origin(&self) -> &str {
		match self {
			AggregationChange::Expanded { origin, .. } | AggregationChange::Collapsed { origin, .. } => {
				origin
			}
		}
	}
}

/// Tracks which child combo is open for which origin band.
#[derive(Clone, Debug, Default)]
pub struct AggregationController {
	/// origin combo id -> open child combo id
	open: BTreeMap<ComboId, ComboId>,
}

impl AggregationController {
	pub fn new() -> Self {
		Self::default()
	}

	/// Child combo currently open for `origin`.
	pub fn open_child(&self, origin: &str) -> Option<&ComboId> {
		self.open.get(origin)
	}

	pub fn open_count(&self) -> usize {
		self.open.len()
	}

	pub fn is_open(&self, child: &str) -> bool {
		self.open.values().any(|c| c == child)
	}

	/// Expand a collapsed node or collapse the child combo it anchors.
	pub fn toggle(
		&mut self,
		model: &mut GraphModel,
		node_id: &str,
		config: &LayoutConfig,
	) -> Result<Vec<AggregationChange>, TopologyError> {
		let node = model
			.node(node_id)
			.ok_or_else(|| TopologyError::UnknownNode(node_id.to_string()))?;
		if node.is_expanded() {
			let child = node.combo_id.clone();
			return Ok(vec![self.collapse(model, &child)?]);
		}
		self.expand(model, node_id, config)
	}

	/// Expand `node_id` into its own child combo.
	///
	/// Returns the changes applied in order: a collapse of the previously open
	/// combo, if any, followed by the expansion.
	pub fn expand(
		&mut self,
		model: &mut GraphModel,
		node_id: &str,
		config: &LayoutConfig,
	) -> Result<Vec<AggregationChange>, TopologyError> {
		let node = model
			.node(node_id)
			.ok_or_else(|| TopologyError::UnknownNode(node_id.to_string()))?;
		if model.combo(&node.combo_id).is_some_and(Combo::is_child) {
			return Err(TopologyError::NestedExpansion(node_id.to_string()));
		}
		if !node.is_collapsed() {
			return Err(TopologyError::NotAggregated(node_id.to_string()));
		}
		let live: HashSet<&str> = model.nodes.iter().map(|n| n.id.as_str()).collect();
		if let Some(peer) = node
			.aggregated_peers()
			.iter()
			.find(|p| live.contains(p.id.as_str()))
		{
			return Err(TopologyError::DuplicateNode(peer.id.clone()));
		}

		let mut changes = Vec::new();
		let open: Vec<ComboId> = self.open.values().cloned().collect();
		for child in open {
			changes.push(self.collapse(model, &child)?);
		}

		let index = model
			.node_index(node_id)
			.ok_or_else(|| TopologyError::UnknownNode(node_id.to_string()))?;
		let origin = model.nodes[index].combo_id.clone();
		let child = child_combo_id(&origin, node_id);

		let node = &mut model.nodes[index];
		let peers = match std::mem::take(&mut node.aggregation) {
			Aggregation::Collapsed(peers) => peers,
			other => {
				node.aggregation = other;
				return Err(TopologyError::NotAggregated(node_id.to_string()));
			}
		};
		node.origin_combo_id = Some(origin.clone());
		node.combo_id = child.clone();
		node.aggregation = Aggregation::Expanded(peers.clone());
		let (anchor_x, anchor_y) = (node.x, node.y);
		let label = format!("{} ({})", node.entity.entity_type, peers.len() + 1);

		let width = (peers.len() + 1) as f64 * config.node_spacing;
		let height = 2.0 * (config.node_radius + config.child_combo_padding);
		let combo = Combo {
			id: child.clone(),
			label,
			parent_id: Some(origin.clone()),
			anchor_node_id: Some(node_id.to_string()),
			rank_id: model.combo(&origin).map(|c| c.rank_id).unwrap_or_default(),
			is_sub_rank: false,
			total: peers.len() as u32 + 1,
			anomaly_count: peers.iter().filter(|p| p.entity.is_anomaly).count() as u32,
			x: anchor_x + width / 2.0 - config.node_spacing / 2.0,
			y: anchor_y,
			width,
			height,
			label_offset: (-width / 2.0 + config.label_padding, -height / 2.0),
			divider_half_width: width / 2.0,
		};

		let moved = peers.into_iter().enumerate().map(|(k, mut peer)| {
			peer.combo_id = child.clone();
			peer.origin_combo_id = None;
			peer.x = anchor_x + (k + 1) as f64 * config.node_spacing;
			peer.y = anchor_y;
			peer
		});
		model.nodes.splice(index + 1..index + 1, moved);
		model.combos.push(combo);

		let anchor = anchor_endpoint_id(&child, node_id);
		for edge in &mut model.edges {
			if matches!(&edge.source, EdgeEndpoint::Direct(id) if id == node_id) {
				edge.source.rewire(anchor.clone());
			}
			if matches!(&edge.target, EdgeEndpoint::Direct(id) if id == node_id) {
				edge.target.rewire(anchor.clone());
			}
		}

		self.open.insert(origin.clone(), child.clone());
		info!("resource-graph: expanded `{node_id}` into `{child}`");
		changes.push(AggregationChange::Expanded {
			origin,
			child,
			anchor: node_id.to_string(),
		});
		Ok(changes)
	}

	/// Fold an open child combo back into its anchor node.
	pub fn collapse(
		&mut self,
		model: &mut GraphModel,
		child: &str,
	) -> Result<AggregationChange, TopologyError> {
		if !self.is_open(child) {
			return Err(TopologyError::ComboNotOpen(child.to_string()));
		}
		let combo = model
			.combo(child)
			.ok_or_else(|| TopologyError::UnknownCombo(child.to_string()))?;
		let anchor_id = combo
			.anchor_node_id
			.clone()
			.ok_or_else(|| TopologyError::ComboNotOpen(child.to_string()))?;
		let anchor = model
			.node(&anchor_id)
			.ok_or_else(|| TopologyError::UnknownNode(anchor_id.clone()))?;
		let (Some(origin), true) = (anchor.origin_combo_id.clone(), anchor.is_expanded()) else {
			return Err(TopologyError::ComboNotOpen(child.to_string()));
		};

		if let Some(node) = model.node_mut(&anchor_id) {
			node.combo_id = origin.clone();
			node.origin_combo_id = None;
			if let Aggregation::Expanded(backup) = std::mem::take(&mut node.aggregation) {
				node.aggregation = Aggregation::Collapsed(backup);
			}
		}
		model.nodes.retain(|n| n.combo_id != child);
		for edge in &mut model.edges {
			if edge.source.original_id() == Some(anchor_id.as_str()) {
				edge.source.restore();
			}
			if edge.target.original_id() == Some(anchor_id.as_str()) {
				edge.target.restore();
			}
		}
		model.combos.retain(|c| c.id != child);
		self.open.retain(|_, c| *c != child);

		info!("resource-graph: collapsed `{child}` back into `{anchor_id}`");
		Ok(AggregationChange::Collapsed {
			origin,
			child: child.to_string(),
			anchor: anchor_id,
		})
	}

	/// Collapse every open child combo.
	pub fn collapse_all(
		&mut self,
		model: &mut GraphModel,
	) -> Result<Vec<AggregationChange>, TopologyError> {
		let open: Vec<ComboId> = self.open.values().cloned().collect();
		open.iter().map(|child| self.collapse(model, child)).collect()
	}
}
