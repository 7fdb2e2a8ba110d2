//! Visual theming for the resource graph.
//!
//! Colors for bands, nodes and edges in each highlight state.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parses `#RRGGBB`. Anything else falls back to mid grey.
	pub fn from_hex(hex: &str) -> Self {
		let channel = |range: std::ops::Range<usize>| {
			hex.get(range)
				.and_then(|s| u8::from_str_radix(s, 16).ok())
				.unwrap_or(128)
		};
		if hex.starts_with('#') && hex.len() == 7 {
			Color::rgb(channel(1..3), channel(3..5), channel(5..7))
		} else {
			Color::rgb(128, 128, 128)
		}
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Band and child combo style.
#[derive(Clone, Debug)]
pub struct ComboStyle {
	/// Alternating band fills, top band first
	pub band_fills: [Color; 2],
	pub child_fill: Color,
	pub child_border: Color,
	pub divider: Color,
	pub label: Color,
	pub label_font: String,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub fill: Color,
	pub border: Color,
	pub border_width: f64,
	pub anomaly: Color,
	pub root: Color,
	pub feedback_root: Color,
	pub recovered: Color,
	pub highlight: Color,
	/// Alpha of dimmed nodes
	pub dark_alpha: f64,
	pub badge_fill: Color,
	pub badge_text: Color,
	pub label: Color,
	pub label_font: String,
	pub badge_font: String,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	pub anomaly: Color,
	pub highlight: Color,
	pub dark: Color,
	pub line_width: f64,
	pub highlight_width: f64,
	pub arrow_size: f64,
	/// Alpha of dimmed edges
	pub dark_alpha: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	pub combo: ComboStyle,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
}

impl Theme {
	/// Light incident-console look.
	pub fn light() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			combo: ComboStyle {
				band_fills: [Color::from_hex("#F5F7FA"), Color::from_hex("#FAFBFD")],
				child_fill: Color::from_hex("#F0F1F5"),
				child_border: Color::from_hex("#DCDEE5"),
				divider: Color::from_hex("#DCDEE5"),
				label: Color::from_hex("#979BA5"),
				label_font: "12px sans-serif".into(),
			},
			node: NodeStyle {
				fill: Color::rgb(255, 255, 255),
				border: Color::from_hex("#699DF4"),
				border_width: 2.0,
				anomaly: Color::from_hex("#F55555"),
				root: Color::from_hex("#EA3636"),
				feedback_root: Color::from_hex("#FF9C01"),
				recovered: Color::from_hex("#2DCB56"),
				highlight: Color::from_hex("#3A84FF"),
				dark_alpha: 0.3,
				badge_fill: Color::from_hex("#3A84FF"),
				badge_text: Color::rgb(255, 255, 255),
				label: Color::from_hex("#63656E"),
				label_font: "12px sans-serif".into(),
				badge_font: "bold 10px sans-serif".into(),
			},
			edge: EdgeStyle {
				color: Color::from_hex("#C4C6CC"),
				anomaly: Color::from_hex("#F55555"),
				highlight: Color::from_hex("#3A84FF"),
				dark: Color::from_hex("#63656E"),
				line_width: 1.0,
				highlight_width: 2.0,
				arrow_size: 6.0,
				dark_alpha: 0.3,
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
