//! Error taxonomy for loading and mutating the resource graph.

use serde_json::Value;
use thiserror::Error;

/// Why a topology response produced no drawable graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoDataReason {
	/// The query carried no entity id.
	MissingEntity,
	/// The response held no ranks with nodes and no edges.
	EmptyResponse,
	/// The entity is alone in the response: nothing depends on it.
	NoDependents,
}

impl std::fmt::Display for NoDataReason {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let text = match self {
			NoDataReason::MissingEntity => "no entity selected",
			NoDataReason::EmptyResponse => "empty topology response",
			NoDataReason::NoDependents => "entity has no upstream dependents",
		};
		f.write_str(text)
	}
}

/// Errors raised by the topology engine.
///
/// `NoData` and `Fetch` are runtime conditions the view renders as
/// placeholders. Everything else is a rejected operation: the model is left
/// exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TopologyError {
	#[error("no data: {0}")]
	NoData(NoDataReason),
	#[error("failed to fetch topology: {message}")]
	Fetch { message: String },
	#[error("malformed topology payload: {0}")]
	Parse(String),
	#[error("unknown node `{0}`")]
	UnknownNode(String),
	#[error("unknown edge `{0}`")]
	UnknownEdge(String),
	#[error("unknown combo `{0}`")]
	UnknownCombo(String),
	#[error("node `{0}` has no aggregated peers")]
	NotAggregated(String),
	#[error("node `{0}` already sits inside an expanded combo")]
	NestedExpansion(String),
	#[error("aggregated peer `{0}` collides with an existing node")]
	DuplicateNode(String),
	#[error("combo `{0}` is not an open aggregation")]
	ComboNotOpen(String),
	#[error("width correction requested before the layout was rendered")]
	CorrectionBeforeRender,
	#[error("another graph mutation is still settling")]
	Busy,
}

impl TopologyError {
	/// Build a `Fetch` error from whatever the backend sent back.
	///
	/// Looks for `message`, then `error.message`, then `detail`, then a bare
	/// string payload.
	pub fn from_fetch_payload(payload: &Value) -> Self {
		let message = payload
			.get("message")
			.and_then(Value::as_str)
			.or_else(|| {
				payload
					.get("error")
					.and_then(|e| e.get("message"))
					.and_then(Value::as_str)
			})
			.or_else(|| payload.get("error").and_then(Value::as_str))
			.or_else(|| payload.get("detail").and_then(Value::as_str))
			.or_else(|| payload.as_str())
			.filter(|m| !m.trim().is_empty())
			.unwrap_or("unknown error");
		TopologyError::Fetch {
			message: message.to_string(),
		}
	}

	/// Whether the view should show the empty-state placeholder.
	pub fn is_no_data(&self) -> bool {
		matches!(self, TopologyError::NoData(_))
	}
}

impl From<serde_json::Error> for TopologyError {
	fn from(err: serde_json::Error) -> Self {
		TopologyError::Parse(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn fetch_message_prefers_top_level_message() {
		let err = TopologyError::from_fetch_payload(&json!({
			"message": "incident 42 not found",
			"detail": "ignored",
		}));
		assert_eq!(
			err,
			TopologyError::Fetch {
				message: "incident 42 not found".into()
			}
		);
	}

	#[test]
	fn fetch_message_falls_back_through_nested_shapes() {
		let nested = TopologyError::from_fetch_payload(&json!({"error": {"message": "timeout"}}));
		assert_eq!(nested.to_string(), "failed to fetch topology: timeout");

		let detail = TopologyError::from_fetch_payload(&json!({"detail": "forbidden"}));
		assert_eq!(detail.to_string(), "failed to fetch topology: forbidden");

		let bare = TopologyError::from_fetch_payload(&json!("gateway down"));
		assert_eq!(bare.to_string(), "failed to fetch topology: gateway down");
	}

	#[test]
	fn fetch_message_defaults_when_payload_is_opaque() {
		let err = TopologyError::from_fetch_payload(&json!({"code": 500, "message": "  "}));
		assert_eq!(
			err,
			TopologyError::Fetch {
				message: "unknown error".into()
			}
		);
	}

	#[test]
	fn only_no_data_is_flagged_as_empty_state() {
		assert!(TopologyError::NoData(NoDataReason::EmptyResponse).is_no_data());
		assert!(!TopologyError::Busy.is_no_data());
	}
}
