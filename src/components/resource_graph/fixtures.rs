//! Canned topology payloads shared by the unit tests.

use std::collections::HashMap;

use proptest::prelude::*;
use proptest::sample::Index;
use serde_json::json;

use super::geometry::BBox;
use super::model::{Combo, Edge, GraphModel, Node, NodeId};
use super::renderer::{BoxRecorder, EdgePath, ItemRef, Renderer};
use super::selection::ItemState;
use super::types::{RankCategory, RawEdge, RawNode, TopologyQuery, TopologyResponse};
use super::viewport::ViewTransform;

pub fn query() -> TopologyQuery {
	TopologyQuery {
		incident_id: 7,
		entity_id: Some("n2".into()),
	}
}

/// Two bands: `1` holds `n1` (peers `p1`, `p2`), `2` holds `n2`; one edge `n1 -> n2`.
pub fn scenario_response() -> TopologyResponse {
	serde_json::from_value(json!({
		"ranks": [
			{
				"rank_id": 1,
				"rank_alias": "Pods",
				"nodes": [{
					"id": "n1",
					"entity": {"entity_id": "n1", "entity_name": "pod-a", "entity_type": "BcsPod"},
					"aggregated_nodes": [
						{"id": "p1", "entity": {"entity_id": "p1", "entity_name": "pod-b", "entity_type": "BcsPod", "is_anomaly": true}},
						{"id": "p2", "entity": {"entity_id": "p2", "entity_name": "pod-c", "entity_type": "BcsPod"}}
					]
				}]
			},
			{
				"rank_id": 2,
				"rank_alias": "Hosts",
				"nodes": [{
					"id": "n2",
					"entity": {"entity_id": "n2", "entity_name": "10.0.0.2", "entity_type": "BkNodeHost", "is_root": true}
				}]
			}
		],
		"edges": [{"source": "n1", "target": "n2", "edge_type": "dependency"}]
	}))
	.expect("scenario fixture is valid")
}

pub fn scenario_model() -> GraphModel {
	GraphModel::normalize(&query(), &scenario_response()).expect("scenario fixture normalizes")
}

/// Three bands with two aggregated nodes in different bands and a few plain ones.
pub fn wide_response() -> TopologyResponse {
	serde_json::from_value(json!({
		"ranks": [
			{
				"rank_id": 0,
				"rank_alias": "Services",
				"nodes": [
					{"id": "svc-a"},
					{"id": "svc-b", "aggregated_nodes": [{"id": "svc-b1"}, {"id": "svc-b2"}, {"id": "svc-b3"}]},
					{"id": "svc-c"}
				]
			},
			{
				"rank_id": 1,
				"rank_alias": "Pods",
				"nodes": [
					{"id": "pod-a", "aggregated_nodes": [{"id": "pod-a1"}]},
					{"id": "pod-b"}
				]
			},
			{
				"rank_id": 2,
				"rank_alias": "Hosts",
				"nodes": [{"id": "host-a"}]
			}
		],
		"edges": [
			{"source": "svc-a", "target": "pod-a"},
			{"source": "svc-b", "target": "pod-a", "is_anomaly": true},
			{"source": "svc-b", "target": "pod-b"},
			{"source": "svc-c", "target": "pod-b"},
			{"source": "pod-a", "target": "host-a"},
			{"source": "pod-b", "target": "host-a"}
		]
	}))
	.expect("wide fixture is valid")
}

pub fn wide_model() -> GraphModel {
	GraphModel::normalize(&query(), &wide_response()).expect("wide fixture normalizes")
}

/// Random responses: 2-4 bands of 1-3 nodes, each node with 0-3 peers, and
/// edges between any two ids, peers included. Every other band reuses the
/// previous rank id. Edges may be mirrored, and the first one is always sent
/// twice so there is something to merge.
pub fn arb_response() -> impl Strategy<Value = TopologyResponse> {
	let bands = prop::collection::vec(prop::collection::vec(0usize..4, 1..4), 2..5);
	let edges = prop::collection::vec((any::<Index>(), any::<Index>(), any::<bool>()), 0..16);
	(bands, edges).prop_map(|(bands, edges)| build_response(&bands, &edges))
}

fn build_response(bands: &[Vec<usize>], edges: &[(Index, Index, bool)]) -> TopologyResponse {
	let mut ids: Vec<String> = Vec::new();
	let mut ranks = Vec::with_capacity(bands.len());
	for (b, peer_counts) in bands.iter().enumerate() {
		let mut nodes = Vec::with_capacity(peer_counts.len());
		for (n, &peers) in peer_counts.iter().enumerate() {
			let id = format!("b{b}n{n}");
			ids.push(id.clone());
			let mut aggregated_nodes = Vec::with_capacity(peers);
			for p in 0..peers {
				let peer = format!("{id}p{p}");
				ids.push(peer.clone());
				aggregated_nodes.push(RawNode {
					id: peer,
					..Default::default()
				});
			}
			nodes.push(RawNode {
				id,
				aggregated_nodes,
				..Default::default()
			});
		}
		ranks.push(RankCategory {
			rank_id: (b / 2) as i64,
			is_sub_rank: b % 2 == 1,
			nodes,
			..Default::default()
		});
	}

	let mut raw_edges = Vec::new();
	for (source, target, mirrored) in edges {
		let (source, target) = (source.get(&ids).clone(), target.get(&ids).clone());
		if *mirrored {
			raw_edges.push(RawEdge {
				source: target.clone(),
				target: source.clone(),
				..Default::default()
			});
		}
		raw_edges.push(RawEdge {
			source,
			target,
			is_anomaly: *mirrored,
			..Default::default()
		});
	}
	if let Some(first) = raw_edges.first().cloned() {
		raw_edges.push(first);
	}

	TopologyResponse {
		ranks,
		edges: raw_edges,
	}
}

/// Renderer stub that logs draw calls and records boxes like the canvas does.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
	/// `"combo:<id>"`, `"edge:<id>"` or `"node:<id>"` per draw call, in order.
	pub calls: Vec<String>,
	pub node_states: HashMap<NodeId, ItemState>,
	pub edge_paths: HashMap<String, EdgePath>,
	/// Overrides the drawn width of a node, standing in for a long label.
	pub label_widths: HashMap<NodeId, f64>,
	pub frames: usize,
	boxes: BoxRecorder,
}

impl Renderer for RecordingRenderer {
	fn begin_frame(&mut self, _transform: &ViewTransform, _width: f64, _height: f64) {
		self.calls.clear();
		self.node_states.clear();
		self.edge_paths.clear();
		self.boxes.clear();
	}

	fn draw_combo(&mut self, combo: &Combo, _state: ItemState) {
		self.calls.push(format!("combo:{}", combo.id));
		self.boxes.record_combo(combo);
	}

	fn draw_edge(&mut self, edge: &Edge, path: EdgePath, _node_radius: f64, _state: ItemState) {
		self.calls.push(format!("edge:{}", edge.id));
		self.edge_paths.insert(edge.id.clone(), path);
		self.boxes.record_edge(edge, path);
	}

	fn draw_node(&mut self, node: &Node, radius: f64, state: ItemState) {
		self.calls.push(format!("node:{}", node.id));
		self.node_states.insert(node.id.clone(), state);
		let diameter = 2.0 * radius;
		let width = self.label_widths.get(&node.id).copied().unwrap_or(diameter);
		self.boxes
			.record_node(node, BBox::centered(node.x, node.y, width, diameter));
	}

	fn end_frame(&mut self) {
		self.frames += 1;
	}

	fn measure_bounding_box(&self, item: &ItemRef) -> Option<BBox> {
		self.boxes.get(item)
	}
}
