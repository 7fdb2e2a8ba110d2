//! Wire format of the upstream topology query.
//!
//! Mirrors the `{ranks, edges}` payload returned for an `(incident, entity)`
//! pair. Every field the view does not strictly need is defaulted so older or
//! partial payloads still deserialize.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::error::{NoDataReason, TopologyError};

/// Key of a topology query.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TopologyQuery {
	pub incident_id: i64,
	/// Entity whose upstream graph is requested. `None` means nothing is selected.
	#[serde(default)]
	pub entity_id: Option<String>,
}

/// What the host page embeds: the query plus either its response or the
/// error the fetch failed with.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TopologyPayload {
	#[serde(flatten)]
	pub query: TopologyQuery,
	#[serde(default)]
	pub response: Option<TopologyResponse>,
	#[serde(default)]
	pub error: Option<Value>,
}

impl TopologyPayload {
	/// Split into a query/response pair, or the error to show instead.
	pub fn into_parts(self) -> Result<(TopologyQuery, TopologyResponse), TopologyError> {
		if let Some(error) = &self.error {
			return Err(TopologyError::from_fetch_payload(error));
		}
		match self.response {
			Some(response) => Ok((self.query, response)),
			None => Err(TopologyError::NoData(NoDataReason::EmptyResponse)),
		}
	}
}

/// Raw response: rank bands plus the edges between their nodes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TopologyResponse {
	#[serde(default)]
	pub ranks: Vec<RankCategory>,
	#[serde(default)]
	pub edges: Vec<RawEdge>,
}

impl TopologyResponse {
	/// True when no rank carries a node and there are no edges.
	pub fn is_empty(&self) -> bool {
		self.edges.is_empty() && self.ranks.iter().all(|rank| rank.nodes.is_empty())
	}
}

/// Category a rank belongs to (host, pod, service, data centre...).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryInfo {
	pub category_id: i64,
	pub category_name: String,
	pub category_alias: String,
}

/// One rank band of the response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankCategory {
	pub rank_id: i64,
	pub rank_name: String,
	pub rank_alias: String,
	pub rank_category: Option<CategoryInfo>,
	/// Set on every band after the first one of the same rank.
	pub is_sub_rank: bool,
	/// Entities in the rank, aggregated peers included.
	pub total: u32,
	pub anomaly_count: u32,
	pub nodes: Vec<RawNode>,
}

impl RankCategory {
	/// Human readable band title.
	pub fn label(&self) -> String {
		if !self.rank_alias.is_empty() {
			self.rank_alias.clone()
		} else if let Some(category) = &self.rank_category {
			if category.category_alias.is_empty() {
				category.category_name.clone()
			} else {
				category.category_alias.clone()
			}
		} else {
			self.rank_name.clone()
		}
	}
}

/// A node as sent by the backend; peers are nested under `aggregated_nodes`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawNode {
	pub id: String,
	#[serde(rename = "comboId")]
	pub combo_id: Option<String>,
	#[serde(rename = "subComboId")]
	pub sub_combo_id: Option<String>,
	pub aggregated_nodes: Vec<RawNode>,
	pub entity: RawEntity,
	pub total_count: u32,
	pub anomaly_count: u32,
	pub is_feedback_root: bool,
	pub is_on_alert: bool,
	#[serde(rename = "alert_all_recorved", alias = "alert_all_recovered")]
	pub alert_all_recovered: bool,
	pub bk_biz_id: Option<i64>,
	pub bk_biz_name: Option<String>,
}

/// Entity attributes attached to a node.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawEntity {
	pub entity_id: String,
	pub entity_name: String,
	pub entity_type: String,
	pub is_anomaly: bool,
	pub is_root: bool,
	pub is_on_alert: bool,
	pub anomaly_score: f64,
	pub anomaly_type: String,
	pub rank_name: String,
	pub bk_biz_id: Option<i64>,
	pub dimensions: BTreeMap<String, Value>,
}

/// Event recorded on an edge.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawEdgeEvent {
	pub event_type: String,
	pub event_name: String,
	pub event_time: i64,
	pub direction: String,
	pub metric_name: String,
}

/// A directed dependency edge.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawEdge {
	pub source: String,
	pub target: String,
	pub source_type: String,
	pub target_type: String,
	/// How many backend edges this one stands for.
	pub count: u32,
	pub aggregated: bool,
	pub is_anomaly: bool,
	pub anomaly_score: f64,
	pub edge_type: String,
	pub events: Vec<RawEdgeEvent>,
}

impl Default for RawEdge {
	fn default() -> Self {
		Self {
			source: String::new(),
			target: String::new(),
			source_type: String::new(),
			target_type: String::new(),
			count: 1,
			aggregated: false,
			is_anomaly: false,
			anomaly_score: 0.0,
			edge_type: String::new(),
			events: Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn parses_backend_shape() {
		let response: TopologyResponse = serde_json::from_value(json!({
			"ranks": [{
				"rank_id": 3,
				"rank_name": "host",
				"rank_alias": "Hosts",
				"rank_category": {"category_id": 2, "category_name": "host", "category_alias": "Host"},
				"is_sub_rank": false,
				"total": 3,
				"anomaly_count": 1,
				"nodes": [{
					"id": "h1",
					"comboId": "2",
					"aggregated_nodes": [{"id": "h2", "entity": {"entity_id": "h2", "entity_type": "BkNodeHost"}}],
					"entity": {"entity_id": "h1", "entity_name": "10.0.0.1", "entity_type": "BkNodeHost", "is_anomaly": true},
					"total_count": 2,
					"alert_all_recorved": true
				}]
			}],
			"edges": [{"source": "h1", "target": "p1", "edge_type": "dependency"}]
		}))
		.unwrap();

		let rank = &response.ranks[0];
		assert_eq!(rank.label(), "Hosts");
		assert_eq!(rank.nodes[0].aggregated_nodes.len(), 1);
		assert!(rank.nodes[0].entity.is_anomaly);
		assert!(rank.nodes[0].alert_all_recovered);
		assert_eq!(response.edges[0].count, 1);
		assert!(!response.is_empty());
	}

	#[test]
	fn label_falls_back_to_category_then_rank_name() {
		let mut rank = RankCategory {
			rank_name: "pod".into(),
			..Default::default()
		};
		assert_eq!(rank.label(), "pod");
		rank.rank_category = Some(CategoryInfo {
			category_name: "k8s".into(),
			..Default::default()
		});
		assert_eq!(rank.label(), "k8s");
	}

	#[test]
	fn embedded_payload_splits_into_query_and_response() {
		let payload: TopologyPayload = serde_json::from_value(json!({
			"incident_id": 42,
			"entity_id": "h1",
			"response": {"ranks": [], "edges": []}
		}))
		.unwrap();
		let (query, response) = payload.into_parts().unwrap();
		assert_eq!(query.incident_id, 42);
		assert_eq!(query.entity_id.as_deref(), Some("h1"));
		assert!(response.is_empty());
	}

	#[test]
	fn embedded_error_wins_over_response() {
		let payload: TopologyPayload = serde_json::from_value(json!({
			"incident_id": 42,
			"error": {"message": "timeout"},
			"response": {"ranks": []}
		}))
		.unwrap();
		assert_eq!(
			payload.into_parts().unwrap_err(),
			TopologyError::Fetch {
				message: "timeout".into()
			}
		);

		let bare: TopologyPayload = serde_json::from_value(json!({"incident_id": 1})).unwrap();
		assert!(bare.into_parts().unwrap_err().is_no_data());
	}

	#[test]
	fn empty_payload_is_empty() {
		let response: TopologyResponse = serde_json::from_value(json!({})).unwrap();
		assert!(response.is_empty());
	}
}
