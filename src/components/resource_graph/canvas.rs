//! `CanvasRenderingContext2d` backend.
//!
//! Draws in world space under the view transform and records the world box
//! of everything it draws, labels included, so the width correction can
//! measure what is actually on screen.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::BBox;
use super::model::{Combo, Edge, Node};
use super::renderer::{BoxRecorder, EdgePath, ItemRef, Renderer};
use super::selection::ItemState;
use super::theme::{Color, Theme};
use super::viewport::ViewTransform;

/// Gap between a node and its label.
const LABEL_GAP: f64 = 4.0;
/// Label line height used for boxes.
const LABEL_HEIGHT: f64 = 14.0;
const BADGE_RADIUS: f64 = 7.0;

pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	boxes: BoxRecorder,
	band_index: usize,
	k: f64,
}

impl CanvasRenderer {
	pub fn new(ctx: CanvasRenderingContext2d, theme: Theme) -> Self {
		Self {
			ctx,
			theme,
			boxes: BoxRecorder::default(),
			band_index: 0,
			k: 1.0,
		}
	}

	/// Wipe the canvas, e.g. when the graph is torn down.
	pub fn clear(&mut self, width: f64, height: f64) {
		self.boxes.clear();
		self.ctx.set_fill_style_str(&self.theme.background.to_css());
		self.ctx.fill_rect(0.0, 0.0, width, height);
	}

	fn text_width(&self, text: &str) -> f64 {
		self.ctx
			.measure_text(text)
			.map(|m| m.width())
			.unwrap_or(text.chars().count() as f64 * 7.0)
	}

	fn circle(&self, x: f64, y: f64, radius: f64) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	}

	fn badge(&self, x: f64, y: f64, fill: Color, text: Option<&str>) {
		let ctx = &self.ctx;
		self.circle(x, y, BADGE_RADIUS);
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();
		if let Some(text) = text {
			ctx.set_fill_style_str(&self.theme.node.badge_text.to_css());
			ctx.set_font(&self.theme.node.badge_font);
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			let _ = ctx.fill_text(text, x, y);
		}
	}
}

impl Renderer for CanvasRenderer {
	fn begin_frame(&mut self, transform: &ViewTransform, width: f64, height: f64) {
		self.boxes.clear();
		self.band_index = 0;
		self.k = transform.k;

		let ctx = &self.ctx;
		ctx.set_fill_style_str(&self.theme.background.to_css());
		ctx.fill_rect(0.0, 0.0, width, height);

		ctx.save();
		let _ = ctx.translate(transform.x, transform.y);
		let _ = ctx.scale(transform.k, transform.k);
	}

	fn draw_combo(&mut self, combo: &Combo, _state: ItemState) {
		let style = &self.theme.combo;
		let ctx = &self.ctx;
		let bbox = combo.bbox();

		if combo.is_child() {
			ctx.set_fill_style_str(&style.child_fill.to_css());
			ctx.fill_rect(bbox.min_x, bbox.min_y, bbox.width(), bbox.height());
			ctx.set_stroke_style_str(&style.child_border.to_css());
			ctx.set_line_width(1.0 / self.k);
			ctx.stroke_rect(bbox.min_x, bbox.min_y, bbox.width(), bbox.height());
		} else {
			let fill = style.band_fills[self.band_index % style.band_fills.len()];
			self.band_index += 1;
			ctx.set_fill_style_str(&fill.to_css());
			ctx.fill_rect(bbox.min_x, bbox.min_y, bbox.width(), bbox.height());

			ctx.begin_path();
			ctx.move_to(combo.x - combo.divider_half_width, bbox.max_y);
			ctx.line_to(combo.x + combo.divider_half_width, bbox.max_y);
			ctx.set_stroke_style_str(&style.divider.to_css());
			ctx.set_line_width(1.0 / self.k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&style.label.to_css());
		ctx.set_font(&style.label_font);
		ctx.set_text_align("left");
		ctx.set_text_baseline("top");
		let _ = ctx.fill_text(
			&combo.label,
			combo.x + combo.label_offset.0,
			combo.y + combo.label_offset.1,
		);

		self.boxes.record_combo(combo);
	}

	fn draw_edge(&mut self, edge: &Edge, path: EdgePath, node_radius: f64, state: ItemState) {
		let style = &self.theme.edge;
		let ctx = &self.ctx;

		let (x1, y1) = path.from;
		let (x2, y2) = path.to;
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let start_inset = if edge.source.is_rewired() { 0.0 } else { node_radius };
		let end_inset = if edge.target.is_rewired() { 0.0 } else { node_radius };

		let (color, width) = if state.highlight {
			(style.highlight, style.highlight_width)
		} else if state.dark {
			(style.dark.with_alpha(style.dark_alpha), style.line_width)
		} else if edge.is_anomaly {
			(style.anomaly, style.line_width)
		} else {
			(style.color, style.line_width)
		};

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(width);
		if edge.is_aggregated_to_combo() {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0),
				&JsValue::from_f64(4.0),
			));
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		let (tip_x, tip_y) = (x2 - ux * end_inset, y2 - uy * end_inset);
		ctx.begin_path();
		ctx.move_to(x1 + ux * start_inset, y1 + uy * start_inset);
		ctx.line_to(tip_x - ux * style.arrow_size, tip_y - uy * style.arrow_size);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		let (back_x, back_y) = (tip_x - ux * style.arrow_size, tip_y - uy * style.arrow_size);
		let (px, py) = (-uy * style.arrow_size * 0.5, ux * style.arrow_size * 0.5);
		ctx.set_fill_style_str(&color.to_css());
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		self.boxes.record_edge(edge, path);
	}

	fn draw_node(&mut self, node: &Node, radius: f64, state: ItemState) {
		let style = &self.theme.node;
		let ctx = &self.ctx;
		let (x, y, r) = (node.x, node.y, radius);

		ctx.set_global_alpha(if state.dark { style.dark_alpha } else { 1.0 });

		self.circle(x, y, r);
		ctx.set_fill_style_str(&style.fill.to_css());
		ctx.fill();

		let border = if state.highlight {
			style.highlight
		} else if node.entity.is_anomaly {
			style.anomaly
		} else if node.entity.alert_all_recovered {
			style.recovered
		} else {
			style.border
		};
		self.circle(x, y, r);
		ctx.set_stroke_style_str(&border.to_css());
		ctx.set_line_width(style.border_width);
		ctx.stroke();

		if node.entity.is_root {
			self.badge(x + r * 0.7, y - r * 0.7, style.root, None);
		} else if node.entity.is_feedback_root {
			self.badge(x + r * 0.7, y - r * 0.7, style.feedback_root, None);
		}
		if node.is_collapsed() {
			let count = (node.aggregated_peers().len() + 1).to_string();
			self.badge(x + r * 0.7, y + r * 0.7, style.badge_fill, Some(&count));
		}

		let label = if node.entity.name.is_empty() {
			node.id.as_str()
		} else {
			node.entity.name.as_str()
		};
		ctx.set_fill_style_str(&style.label.to_css());
		ctx.set_font(&style.label_font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		let label_y = y + r + LABEL_GAP;
		let _ = ctx.fill_text(label, x, label_y);
		let label_width = self.text_width(label);

		ctx.set_global_alpha(1.0);

		let circle = BBox::centered(x, y, 2.0 * r, 2.0 * r);
		let text = BBox::new(
			x - label_width / 2.0,
			label_y,
			x + label_width / 2.0,
			label_y + LABEL_HEIGHT,
		);
		self.boxes.record_node(node, circle.union(&text));
	}

	fn end_frame(&mut self) {
		self.ctx.restore();
	}

	fn measure_bounding_box(&self, item: &ItemRef) -> Option<BBox> {
		self.boxes.get(item)
	}
}
