//! Deterministic rank-band layout.
//!
//! Each top-level combo gets an equal horizontal band of the viewport; its
//! nodes are placed left to right along the band's centre line in model
//! order. An expanded child combo takes the slot of its anchor node and pushes
//! the following nodes to the right.

use std::collections::HashSet;

use log::debug;

use super::config::LayoutConfig;
use super::error::TopologyError;
use super::model::{ComboId, GraphModel};

/// Band layout driven by a [`LayoutConfig`].
#[derive(Clone, Debug, Default)]
pub struct RankLayout {
	pub config: LayoutConfig,
}

impl RankLayout {
	pub fn new(config: LayoutConfig) -> Self {
		Self { config }
	}

	/// Height of one band when `count` bands share a viewport `height` tall.
	pub fn combo_height(&self, height: f64, count: usize) -> f64 {
		if count == 0 {
			return self.config.min_combo_height;
		}
		((height - self.config.margin) / count as f64).max(self.config.min_combo_height)
	}

	/// Lay out every band.
	pub fn compute(&self, model: &mut GraphModel, width: f64, height: f64) {
		let bands: Vec<ComboId> = model.top_level_combos().map(|c| c.id.clone()).collect();
		let band_height = self.combo_height(height, bands.len());
		for (index, band) in bands.iter().enumerate() {
			self.place_band(model, band, index, band_height, width);
		}
		debug!(
			"resource-graph: laid out {} bands at {:.1}px each",
			bands.len(),
			band_height
		);
	}

	/// Lay out a single band, leaving the others untouched.
	pub fn compute_band(
		&self,
		model: &mut GraphModel,
		band_id: &str,
		width: f64,
		height: f64,
	) -> Result<(), TopologyError> {
		let bands: Vec<ComboId> = model.top_level_combos().map(|c| c.id.clone()).collect();
		let index = bands
			.iter()
			.position(|id| id == band_id)
			.ok_or_else(|| TopologyError::UnknownCombo(band_id.to_string()))?;
		let band_height = self.combo_height(height, bands.len());
		self.place_band(model, band_id, index, band_height, width);
		Ok(())
	}

	fn place_band(
		&self,
		model: &mut GraphModel,
		band_id: &str,
		index: usize,
		band_height: f64,
		viewport_width: f64,
	) {
		let cfg = &self.config;
		let top = cfg.margin / 2.0 + index as f64 * band_height;
		let center_y = top + band_height / 2.0;

		let members: Vec<(usize, ComboId)> = model
			.nodes
			.iter()
			.enumerate()
			.filter(|(_, n)| model.band_of_combo(&n.combo_id) == band_id)
			.map(|(i, n)| (i, n.combo_id.clone()))
			.collect();

		let mut cursor = cfg.node_begin_offset;
		let mut positions: Vec<(usize, f64)> = Vec::with_capacity(members.len());
		let mut children: Vec<(ComboId, f64, f64)> = Vec::new();
		let mut placed: HashSet<&str> = HashSet::new();

		for (idx, combo_id) in &members {
			if combo_id == band_id {
				positions.push((*idx, cursor));
				cursor += cfg.node_spacing;
				continue;
			}
			if !placed.insert(combo_id.as_str()) {
				continue;
			}
			let inside: Vec<usize> = members
				.iter()
				.filter(|(_, c)| c == combo_id)
				.map(|(i, _)| *i)
				.collect();
			for (k, i) in inside.iter().enumerate() {
				positions.push((*i, cursor + k as f64 * cfg.node_spacing));
			}
			let span = inside.len() as f64 * cfg.node_spacing;
			let child_x = cursor + (inside.len() as f64 - 1.0) * cfg.node_spacing / 2.0;
			children.push((combo_id.clone(), child_x, span));
			cursor += span + cfg.child_combo_gap;
		}

		for (i, x) in positions {
			let node = &mut model.nodes[i];
			node.x = x;
			node.y = center_y;
		}

		let child_height = (band_height - 2.0 * cfg.child_combo_padding)
			.max(2.0 * (cfg.node_radius + cfg.child_combo_padding));
		for (id, x, width) in children {
			if let Some(child) = model.combo_mut(&id) {
				child.x = x;
				child.y = center_y;
				child.width = width;
				child.height = child_height;
				child.label_offset = (
					-width / 2.0 + cfg.label_padding,
					-child_height / 2.0 + cfg.label_padding,
				);
				child.divider_half_width = width / 2.0;
			}
		}

		let extent = cursor - cfg.node_spacing / 2.0;
		let label_padding = cfg.label_padding;
		if let Some(band) = model.combo_mut(band_id) {
			// Bands never shrink below a width the correction already gave them.
			let width = band.width.max(viewport_width).max(extent);
			band.width = width;
			band.height = band_height;
			band.x = width / 2.0;
			band.y = center_y;
			band.label_offset = (
				-width / 2.0 + label_padding,
				-band_height / 2.0 + label_padding,
			);
			band.divider_half_width = width / 2.0;
		}
	}
}
