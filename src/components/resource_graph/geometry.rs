//! Axis-aligned boxes shared by layout, viewport and renderer code.

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBox {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl BBox {
	pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
		Self {
			min_x,
			min_y,
			max_x,
			max_y,
		}
	}

	/// Box of the given size centred on `(cx, cy)`.
	pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
		Self::new(
			cx - width / 2.0,
			cy - height / 2.0,
			cx + width / 2.0,
			cy + height / 2.0,
		)
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn union(&self, other: &BBox) -> BBox {
		BBox::new(
			self.min_x.min(other.min_x),
			self.min_y.min(other.min_y),
			self.max_x.max(other.max_x),
			self.max_y.max(other.max_y),
		)
	}
}

/// Distance from `(px, py)` to the segment `a`-`b`.
pub fn distance_to_segment(px: f64, py: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len_sq = dx * dx + dy * dy;
	if len_sq < f64::EPSILON {
		return ((px - a.0).powi(2) + (py - a.1).powi(2)).sqrt();
	}
	let t = (((px - a.0) * dx + (py - a.1) * dy) / len_sq).clamp(0.0, 1.0);
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}
