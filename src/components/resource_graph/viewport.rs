//! Pan, scroll and zoom of the graph view, plus the width correction pass.
//!
//! The graph is laid out in world coordinates; `ViewTransform` maps them to
//! canvas pixels as `screen = world * k + t`. Translation is clamped so the
//! bands can never be dragged more than `drag_margin` pixels away from the
//! viewport edge they are leaving.

use log::debug;

use super::config::ViewportConfig;
use super::geometry::BBox;
use super::model::GraphModel;
use super::renderer::{ItemRef, Renderer};

/// Widths closer than this are treated as equal by the correction pass.
const WIDTH_EPSILON: f64 = 0.5;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(x * self.k + self.x, y * self.k + self.y)
	}

	pub fn to_world(&self, x: f64, y: f64) -> (f64, f64) {
		((x - self.x) / self.k, (y - self.y) / self.k)
	}

	pub fn bbox_to_screen(&self, bbox: &BBox) -> BBox {
		let (min_x, min_y) = self.to_screen(bbox.min_x, bbox.min_y);
		let (max_x, max_y) = self.to_screen(bbox.max_x, bbox.max_y);
		BBox::new(min_x, min_y, max_x, max_y)
	}
}

/// Tracks an in-progress canvas pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
}

/// Owns the view transform and the viewport size.
#[derive(Clone, Debug)]
pub struct ViewportController {
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	pub pan: PanState,
	config: ViewportConfig,
}

impl ViewportController {
	pub fn new(config: ViewportConfig, width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform::default(),
			width,
			height,
			pan: PanState::default(),
			config,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn reset(&mut self) {
		self.transform = ViewTransform::default();
		self.pan = PanState::default();
	}

	/// Drop the axis of `(dx, dy)` that would pull the bands too far inside
	/// the viewport. Each axis is all or nothing.
	pub fn clamp_delta(&self, model: &GraphModel, dx: f64, dy: f64) -> (f64, f64) {
		let margin = self.config.drag_margin;
		let mut bands = model.top_level_combos();
		let Some(first) = bands.next() else {
			return (0.0, 0.0);
		};
		let (mut top, mut bottom, mut widest) = (first, first, first);
		for band in bands {
			bottom = band;
			if band.width > widest.width {
				widest = band;
			}
		}
		let top = self.transform.bbox_to_screen(&top.bbox());
		let bottom = self.transform.bbox_to_screen(&bottom.bbox());
		let widest = self.transform.bbox_to_screen(&widest.bbox());

		let dy = if (dy < 0.0 && bottom.max_y + dy + margin < self.height)
			|| (dy > 0.0 && top.min_y + dy - margin > 0.0)
		{
			0.0
		} else {
			dy
		};
		let dx = if (dx < 0.0 && widest.max_x + dx + margin < self.width)
			|| (dx > 0.0 && widest.min_x + dx - margin > 0.0)
		{
			0.0
		} else {
			dx
		};
		(dx, dy)
	}

	/// Translate by a clamped delta. Returns whether the view moved.
	pub fn pan_by(&mut self, model: &GraphModel, dx: f64, dy: f64) -> bool {
		let (dx, dy) = self.clamp_delta(model, dx, dy);
		self.transform.x += dx;
		self.transform.y += dy;
		dx != 0.0 || dy != 0.0
	}

	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			last_x: x,
			last_y: y,
		};
	}

	/// Continue a pan to pointer position `(x, y)`.
	pub fn pan_to(&mut self, model: &GraphModel, x: f64, y: f64) -> bool {
		if !self.pan.active {
			return false;
		}
		let (dx, dy) = (x - self.pan.last_x, y - self.pan.last_y);
		self.pan.last_x = x;
		self.pan.last_y = y;
		self.pan_by(model, dx, dy)
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Wheel scroll: moves along the dominant axis only.
	pub fn scroll(&mut self, model: &GraphModel, delta_x: f64, delta_y: f64) -> bool {
		let sensitivity = self.config.scroll_sensitivity;
		let (dx, dy) = if delta_x.abs() > delta_y.abs() {
			(-delta_x * sensitivity, 0.0)
		} else {
			(0.0, -delta_y * sensitivity)
		};
		self.pan_by(model, dx, dy)
	}

	/// Zoom one step around canvas point `(x, y)`.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			1.0 / self.config.zoom_step
		} else {
			self.config.zoom_step
		};
		let t = &mut self.transform;
		let new_k = (t.k * factor).clamp(self.config.min_zoom, self.config.max_zoom);
		let ratio = new_k / t.k;
		t.x = x - (x - t.x) * ratio;
		t.y = y - (y - t.y) * ratio;
		t.k = new_k;
	}

	/// Give every band the same width: the widest rendered extent or the
	/// viewport width, whichever is larger. Returns whether anything changed.
	pub fn normalize_widths<R: Renderer + ?Sized>(
		&self,
		model: &mut GraphModel,
		renderer: &R,
		label_padding: f64,
	) -> bool {
		let mut target = self.width / self.transform.k;
		for band in model.top_level_combos() {
			let left = band.x - band.width / 2.0;
			let measured = renderer
				.measure_bounding_box(&ItemRef::Combo(band.id.clone()))
				.unwrap_or_else(|| band.bbox());
			target = target.max(measured.max_x - left);
		}

		let mut changed = false;
		for band in model.combos.iter_mut().filter(|c| !c.is_child()) {
			if (band.width - target).abs() <= WIDTH_EPSILON
				&& (band.x - target / 2.0).abs() <= WIDTH_EPSILON
			{
				continue;
			}
			band.width = target;
			band.x = target / 2.0;
			band.label_offset.0 = -target / 2.0 + label_padding;
			band.divider_half_width = target / 2.0;
			changed = true;
		}
		if changed {
			debug!("resource-graph: bands normalized to {target:.1}px");
		}
		changed
	}
}
