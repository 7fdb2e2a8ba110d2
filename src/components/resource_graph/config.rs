//! Tunable geometry and interaction constants.
//!
//! Every section deserializes with defaults, so a host page can override a
//! single value without restating the rest:
//!
//! ```json
//! { "layout": { "node_spacing": 140 }, "viewport": { "drag_margin": 60 } }
//! ```

use serde::Deserialize;

/// Band and node placement parameters, in world pixels.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Vertical space subtracted from the viewport height before splitting it into bands.
	pub margin: f64,
	/// Lower bound for a band's height.
	pub min_combo_height: f64,
	/// X of the first node in a band.
	pub node_begin_offset: f64,
	/// Horizontal distance between consecutive node centres.
	pub node_spacing: f64,
	/// Drawn node radius; also used for hit testing.
	pub node_radius: f64,
	/// Inset of a child combo inside its band.
	pub child_combo_padding: f64,
	/// Extra gap left after a child combo before the next node.
	pub child_combo_gap: f64,
	/// Distance of the band label from the band's left edge.
	pub label_padding: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			margin: 40.0,
			min_combo_height: 120.0,
			node_begin_offset: 80.0,
			node_spacing: 120.0,
			node_radius: 18.0,
			child_combo_padding: 12.0,
			child_combo_gap: 24.0,
			label_padding: 12.0,
		}
	}
}

/// Pan, scroll and zoom limits.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
	/// How far the outermost combo edge may travel inside the viewport.
	pub drag_margin: f64,
	/// Multiplier applied to wheel deltas when scrolling.
	pub scroll_sensitivity: f64,
	pub min_zoom: f64,
	pub max_zoom: f64,
	/// Zoom factor applied per wheel notch.
	pub zoom_step: f64,
	/// Quiet period before a burst of resize events triggers a relayout, in ms.
	pub resize_debounce_ms: i32,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			drag_margin: 100.0,
			scroll_sensitivity: 2.0,
			min_zoom: 0.2,
			max_zoom: 4.0,
			zoom_step: 1.1,
			resize_debounce_ms: 150,
		}
	}
}

/// Popover geometry, in canvas pixels.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
	pub width: f64,
	pub height: f64,
	/// Distance kept between the popover and its anchor.
	pub gap: f64,
}

impl Default for TooltipConfig {
	fn default() -> Self {
		Self {
			width: 320.0,
			height: 180.0,
			gap: 8.0,
		}
	}
}

/// Complete configuration of a graph instance.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub layout: LayoutConfig,
	pub viewport: ViewportConfig,
	pub tooltip: TooltipConfig,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn partial_override_keeps_other_defaults() {
		let config: GraphConfig = serde_json::from_value(json!({
			"layout": {"node_spacing": 140.0},
			"viewport": {"drag_margin": 0.0}
		}))
		.unwrap();

		assert_eq!(config.layout.node_spacing, 140.0);
		assert_eq!(config.layout.margin, LayoutConfig::default().margin);
		assert_eq!(config.viewport.drag_margin, 0.0);
		assert_eq!(config.viewport.scroll_sensitivity, 2.0);
		assert_eq!(config.tooltip, TooltipConfig::default());
	}
}
