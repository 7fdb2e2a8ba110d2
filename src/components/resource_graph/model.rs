//! Normalized node/edge/combo collections.
//!
//! [`GraphModel::normalize`] turns the raw `{ranks, edges}` response into the
//! single source of truth every other controller reads and mutates. Aggregated
//! peers stay nested inside their representative node until expanded.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, warn};

use super::error::{NoDataReason, TopologyError};
use super::geometry::BBox;
use super::types::{RawEdge, RawEdgeEvent, RawNode, TopologyQuery, TopologyResponse};

pub type NodeId = String;
pub type ComboId = String;
pub type EdgeId = String;

/// Entity attributes the view needs for drawing and tooltips.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entity {
	pub id: String,
	pub name: String,
	pub entity_type: String,
	pub is_anomaly: bool,
	pub is_root: bool,
	pub is_feedback_root: bool,
	pub is_on_alert: bool,
	pub alert_all_recovered: bool,
	pub anomaly_score: f64,
	pub rank_name: String,
	pub bk_biz_id: Option<i64>,
}

/// Peer bookkeeping of a node.
///
/// A representative node either shows its peers folded into itself
/// (`Collapsed`) or has moved them into a child combo and keeps a copy to
/// restore (`Expanded`). Never both.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Aggregation {
	#[default]
	Plain,
	Collapsed(Vec<Node>),
	Expanded(Vec<Node>),
}

/// A drawable node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	/// Combo the node is currently drawn in.
	pub combo_id: ComboId,
	/// Band the node came from while it anchors an expanded child combo.
	pub origin_combo_id: Option<ComboId>,
	pub entity: Entity,
	pub aggregation: Aggregation,
	pub total_count: u32,
	pub anomaly_count: u32,
	pub x: f64,
	pub y: f64,
}

impl Node {
	/// Peers currently folded into this node.
	pub fn aggregated_peers(&self) -> &[Node] {
		match &self.aggregation {
			Aggregation::Collapsed(peers) => peers,
			_ => &[],
		}
	}

	/// Peers saved while this node is expanded.
	pub fn aggregated_peers_backup(&self) -> &[Node] {
		match &self.aggregation {
			Aggregation::Expanded(peers) => peers,
			_ => &[],
		}
	}

	pub fn is_collapsed(&self) -> bool {
		!self.aggregated_peers().is_empty()
	}

	pub fn is_expanded(&self) -> bool {
		matches!(self.aggregation, Aggregation::Expanded(_))
	}

	fn from_raw(raw: &RawNode, combo_id: &str) -> Self {
		let peers: Vec<Node> = raw
			.aggregated_nodes
			.iter()
			.map(|peer| Node::from_raw(peer, combo_id))
			.collect();
		let aggregation = if peers.is_empty() {
			Aggregation::Plain
		} else {
			Aggregation::Collapsed(peers)
		};
		let entity = &raw.entity;
		Self {
			id: raw.id.clone(),
			combo_id: combo_id.to_string(),
			origin_combo_id: None,
			entity: Entity {
				id: if entity.entity_id.is_empty() {
					raw.id.clone()
				} else {
					entity.entity_id.clone()
				},
				name: entity.entity_name.clone(),
				entity_type: entity.entity_type.clone(),
				is_anomaly: entity.is_anomaly,
				is_root: entity.is_root,
				is_feedback_root: raw.is_feedback_root,
				is_on_alert: raw.is_on_alert || entity.is_on_alert,
				alert_all_recovered: raw.alert_all_recovered,
				anomaly_score: entity.anomaly_score,
				rank_name: entity.rank_name.clone(),
				bk_biz_id: raw.bk_biz_id.or(entity.bk_biz_id),
			},
			aggregation,
			total_count: raw.total_count.max(raw.aggregated_nodes.len() as u32 + 1),
			anomaly_count: raw.anomaly_count,
			x: 0.0,
			y: 0.0,
		}
	}
}

/// One end of an edge.
///
/// `Rewired` points at a synthetic anchor inside an expanded child combo and
/// remembers the node id it replaced so the rewire can be undone exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EdgeEndpoint {
	Direct(NodeId),
	Rewired { anchor: String, original: NodeId },
}

impl EdgeEndpoint {
	/// Id the endpoint currently resolves to.
	pub fn id(&self) -> &str {
		match self {
			EdgeEndpoint::Direct(id) => id,
			EdgeEndpoint::Rewired { anchor, .. } => anchor,
		}
	}

	/// Id saved before the rewire, if any.
	pub fn original_id(&self) -> Option<&str> {
		match self {
			EdgeEndpoint::Direct(_) => None,
			EdgeEndpoint::Rewired { original, .. } => Some(original),
		}
	}

	/// The model node behind this endpoint, rewired or not.
	pub fn node_id(&self) -> &str {
		self.original_id().unwrap_or_else(|| self.id())
	}

	pub fn is_rewired(&self) -> bool {
		matches!(self, EdgeEndpoint::Rewired { .. })
	}

	/// Point a direct endpoint at `anchor`. Already rewired endpoints keep
	/// their first original.
	pub fn rewire(&mut self, anchor: String) {
		if let EdgeEndpoint::Direct(id) = self {
			let original = std::mem::take(id);
			*self = EdgeEndpoint::Rewired { anchor, original };
		}
	}

	/// Undo [`rewire`](Self::rewire).
	pub fn restore(&mut self) {
		if let EdgeEndpoint::Rewired { original, .. } = self {
			let original = std::mem::take(original);
			*self = EdgeEndpoint::Direct(original);
		}
	}
}

/// A directed dependency edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: EdgeId,
	pub source: EdgeEndpoint,
	pub target: EdgeEndpoint,
	pub edge_type: String,
	pub is_anomaly: bool,
	/// Number of backend edges merged into this one.
	pub count: u32,
	pub aggregated: bool,
	pub events: Vec<RawEdgeEvent>,
}

impl Edge {
	pub fn is_aggregated_to_combo(&self) -> bool {
		self.source.is_rewired() || self.target.is_rewired()
	}

	/// Whether either end belongs to `node_id`, looking through rewires.
	pub fn touches(&self, node_id: &str) -> bool {
		self.source.node_id() == node_id || self.target.node_id() == node_id
	}

	/// The node at the other end from `node_id`.
	pub fn opposite(&self, node_id: &str) -> Option<&str> {
		if self.source.node_id() == node_id {
			Some(self.target.node_id())
		} else if self.target.node_id() == node_id {
			Some(self.source.node_id())
		} else {
			None
		}
	}
}

/// A band (top-level) or an expanded aggregation (child) grouping nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Combo {
	pub id: ComboId,
	pub label: String,
	/// Set only on synthetic child combos.
	pub parent_id: Option<ComboId>,
	/// Node whose expansion created this child combo.
	pub anchor_node_id: Option<NodeId>,
	pub rank_id: i64,
	pub is_sub_rank: bool,
	pub total: u32,
	pub anomaly_count: u32,
	/// Centre.
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	/// Label position relative to the centre.
	pub label_offset: (f64, f64),
	/// Half length of the bottom divider, relative to the centre.
	pub divider_half_width: f64,
}

impl Combo {
	pub fn is_child(&self) -> bool {
		self.parent_id.is_some()
	}

	pub fn bbox(&self) -> BBox {
		BBox::centered(self.x, self.y, self.width, self.height)
	}
}

/// Id of the child combo created when `anchor` expands inside `origin`.
pub fn child_combo_id(origin: &str, anchor: &str) -> ComboId {
	format!("{origin}::{anchor}")
}

/// Synthetic endpoint id an edge is repointed to while its node is expanded.
pub fn anchor_endpoint_id(combo_id: &str, node_id: &str) -> String {
	format!("{combo_id}{node_id}")
}

/// Comparable outline of a graph: what the expand/collapse inverse law checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphShape {
	pub node_ids: BTreeSet<NodeId>,
	pub edge_endpoints: BTreeSet<(String, String)>,
	pub combo_ids: BTreeSet<ComboId>,
}

/// The normalized graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	/// Top-level bands in display order, followed by child combos.
	pub combos: Vec<Combo>,
}

impl GraphModel {
	/// Build the model from a query response.
	pub fn normalize(
		query: &TopologyQuery,
		response: &TopologyResponse,
	) -> Result<Self, TopologyError> {
		if query.entity_id.as_deref().is_none_or(str::is_empty) {
			return Err(TopologyError::NoData(NoDataReason::MissingEntity));
		}
		if response.is_empty() {
			return Err(TopologyError::NoData(NoDataReason::EmptyResponse));
		}

		let mut ranks: Vec<_> = response
			.ranks
			.iter()
			.filter(|rank| !rank.nodes.is_empty())
			.collect();
		if ranks.is_empty() {
			return Err(TopologyError::NoData(NoDataReason::EmptyResponse));
		}
		ranks.sort_by_key(|rank| rank.rank_id);

		let mut model = GraphModel::default();
		let mut seen_rank_ids: HashMap<i64, usize> = HashMap::new();
		let mut known: HashSet<NodeId> = HashSet::new();
		// peer id -> representative node id
		let mut representative: HashMap<NodeId, NodeId> = HashMap::new();

		for rank in ranks {
			let repeat = seen_rank_ids.entry(rank.rank_id).or_insert(0);
			let combo_id = if *repeat == 0 {
				rank.rank_id.to_string()
			} else {
				format!("{}-{}", rank.rank_id, repeat)
			};
			*repeat += 1;

			model.combos.push(Combo {
				id: combo_id.clone(),
				label: rank.label(),
				parent_id: None,
				anchor_node_id: None,
				rank_id: rank.rank_id,
				is_sub_rank: rank.is_sub_rank,
				total: rank.total,
				anomaly_count: rank.anomaly_count,
				x: 0.0,
				y: 0.0,
				width: 0.0,
				height: 0.0,
				label_offset: (0.0, 0.0),
				divider_half_width: 0.0,
			});

			for raw in &rank.nodes {
				if !known.insert(raw.id.clone()) {
					warn!("resource-graph: duplicate node `{}` dropped", raw.id);
					continue;
				}
				for peer in &raw.aggregated_nodes {
					representative.insert(peer.id.clone(), raw.id.clone());
				}
				model.nodes.push(Node::from_raw(raw, &combo_id));
			}
		}

		let resolve = |id: &str| -> Option<NodeId> {
			if known.contains(id) {
				Some(id.to_string())
			} else {
				representative.get(id).cloned()
			}
		};

		let mut edge_index: HashMap<(NodeId, NodeId), usize> = HashMap::new();
		for raw in &response.edges {
			let (Some(source), Some(target)) = (resolve(&raw.source), resolve(&raw.target)) else {
				warn!(
					"resource-graph: edge {} -> {} references an unknown node, dropped",
					raw.source, raw.target
				);
				continue;
			};
			if source == target {
				continue;
			}
			match edge_index.get(&(source.clone(), target.clone())) {
				Some(&i) => merge_edge(&mut model.edges[i], raw),
				None => {
					edge_index.insert((source.clone(), target.clone()), model.edges.len());
					model.edges.push(Edge {
						id: format!("{source}-{target}"),
						source: EdgeEndpoint::Direct(source),
						target: EdgeEndpoint::Direct(target),
						edge_type: raw.edge_type.clone(),
						is_anomaly: raw.is_anomaly,
						count: raw.count.max(1),
						aggregated: raw.aggregated,
						events: raw.events.clone(),
					});
				}
			}
		}

		if model.nodes.len() == 1 && model.edges.is_empty() && !model.nodes[0].is_collapsed() {
			return Err(TopologyError::NoData(NoDataReason::NoDependents));
		}

		debug!(
			"resource-graph: normalized {} combos, {} nodes, {} edges",
			model.combos.len(),
			model.nodes.len(),
			model.edges.len()
		);
		Ok(model)
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.id == id)
	}

	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.edges.iter().find(|e| e.id == id)
	}

	pub fn combo(&self, id: &str) -> Option<&Combo> {
		self.combos.iter().find(|c| c.id == id)
	}

	pub fn combo_mut(&mut self, id: &str) -> Option<&mut Combo> {
		self.combos.iter_mut().find(|c| c.id == id)
	}

	/// Bands in display order.
	pub fn top_level_combos(&self) -> impl Iterator<Item = &Combo> {
		self.combos.iter().filter(|c| !c.is_child())
	}

	pub fn child_combos(&self) -> impl Iterator<Item = &Combo> {
		self.combos.iter().filter(|c| c.is_child())
	}

	/// Child combo anchored on `node_id`, if that node is expanded.
	pub fn child_combo_of(&self, node_id: &str) -> Option<&Combo> {
		self.child_combos()
			.find(|c| c.anchor_node_id.as_deref() == Some(node_id))
	}

	/// Top-level band a combo belongs to.
	pub fn band_of_combo<'a>(&'a self, combo_id: &'a str) -> &'a str {
		self.combo(combo_id)
			.and_then(|c| c.parent_id.as_deref())
			.unwrap_or(combo_id)
	}

	/// Nodes drawn inside `combo_id`, in model order.
	pub fn nodes_in_combo<'a>(&'a self, combo_id: &'a str) -> impl Iterator<Item = &'a Node> {
		self.nodes.iter().filter(move |n| n.combo_id == combo_id)
	}

	pub fn edges_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> {
		self.edges.iter().filter(move |e| e.touches(node_id))
	}

	pub fn shape(&self) -> GraphShape {
		GraphShape {
			node_ids: self.nodes.iter().map(|n| n.id.clone()).collect(),
			edge_endpoints: self
				.edges
				.iter()
				.map(|e| (e.source.id().to_string(), e.target.id().to_string()))
				.collect(),
			combo_ids: self.combos.iter().map(|c| c.id.clone()).collect(),
		}
	}
}

fn merge_edge(edge: &mut Edge, raw: &RawEdge) {
	edge.count += raw.count.max(1);
	edge.is_anomaly |= raw.is_anomaly;
	edge.aggregated = true;
	edge.events.extend(raw.events.iter().cloned());
}
