//! Visual theming for the force graph.
//!
//! A [`Theme`] is the style sheet applied on engine init: one rule for nodes
//! (fixed size, label taken from the node) and one for edges (arrowed, curved,
//! label taken from the edge), plus background and palette.

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

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Scales the alpha channel, e.g. to dim an element.
	pub fn fade(self, factor: f64) -> Self {
		self.with_alpha(self.a * factor.clamp(0.0, 1.0))
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		let down = |c: u8| (c as f64 * f) as u8;
		Self {
			r: down(self.r),
			g: down(self.g),
			b: down(self.b),
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node fill colors, assigned round-robin by node position.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Slate blues and teals
	pub fn slate() -> Self {
		Self::from_rgb(&[
			(94, 129, 172),
			(129, 161, 193),
			(100, 148, 160),
			(136, 160, 175),
			(108, 142, 173),
			(119, 158, 165),
		])
	}

	/// Muted oranges and browns
	pub fn earth() -> Self {
		Self::from_rgb(&[
			(180, 136, 100),
			(160, 125, 100),
			(170, 145, 115),
			(145, 120, 95),
			(175, 150, 120),
		])
	}

	/// Soft pastels
	pub fn pastel() -> Self {
		Self::from_rgb(&[
			(200, 180, 190),
			(180, 195, 205),
			(190, 200, 180),
			(205, 195, 180),
			(185, 190, 200),
		])
	}

	/// Deep blues
	pub fn ocean() -> Self {
		Self::from_rgb(&[
			(70, 110, 140),
			(80, 130, 150),
			(100, 145, 160),
			(90, 125, 145),
			(85, 135, 155),
		])
	}

	/// Cool teals and purples
	pub fn aurora() -> Self {
		Self::from_rgb(&[
			(100, 145, 135),
			(115, 135, 155),
			(130, 120, 150),
			(105, 140, 145),
			(120, 130, 160),
		])
	}

	fn from_rgb(colors: &[(u8, u8, u8)]) -> Self {
		Self {
			colors: colors.iter().map(|&(r, g, b)| Color::rgb(r, g, b)).collect(),
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Center color of the radial gradient, when enabled.
	pub color_secondary: Color,
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Style rule applied to every node.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Fixed size multiplier over the base radius from the scale config.
	pub size: f64,
	/// Whether nodes get a lit-sphere gradient instead of a flat fill.
	pub use_gradient: bool,
	/// Border/stroke width in screen pixels (0 = no border)
	pub border_width: f64,
	pub border_color: Color,
	/// Draw [`Node::label`](super::Node::label) next to each node.
	pub show_labels: bool,
	pub label_color: Color,
}

/// Style rule applied to every edge.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	/// Draw an arrow head at the target end.
	pub arrows: bool,
	pub curved: bool,
	/// Curve tension (0.0 = straight, 1.0 = very curved)
	pub curve_tension: f64,
	/// Draw [`Edge::label`](super::Edge::label) at the middle of each edge.
	pub show_labels: bool,
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
	pub palette: NodePalette,
}

impl Theme {
	/// Names accepted by [`Theme::by_name`].
	pub const NAMES: [&'static str; 5] = ["default", "midnight", "ember", "deep_sea", "minimal"];

	/// Looks up a preset by name.
	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"default" => Some(Self::default_theme()),
			"midnight" => Some(Self::midnight()),
			"ember" => Some(Self::ember()),
			"deep_sea" => Some(Self::deep_sea()),
			"minimal" => Some(Self::minimal()),
			_ => None,
		}
	}

	/// Clean dark theme with curved, labeled edges (default)
	pub fn default_theme() -> Self {
		Self::preset(
			"default",
			(Color::rgb(22, 27, 34), Color::rgb(30, 35, 42)),
			Color::rgba(140, 160, 180, 0.6),
			NodePalette::slate(),
		)
	}

	pub fn midnight() -> Self {
		Self::preset(
			"midnight",
			(Color::rgb(18, 20, 28), Color::rgb(25, 28, 38)),
			Color::rgba(100, 120, 150, 0.55),
			NodePalette::aurora(),
		)
	}

	pub fn ember() -> Self {
		Self::preset(
			"ember",
			(Color::rgb(28, 24, 22), Color::rgb(35, 30, 28)),
			Color::rgba(160, 130, 110, 0.55),
			NodePalette::earth(),
		)
	}

	pub fn deep_sea() -> Self {
		Self::preset(
			"deep_sea",
			(Color::rgb(15, 25, 35), Color::rgb(20, 32, 45)),
			Color::rgba(90, 130, 160, 0.55),
			NodePalette::ocean(),
		)
	}

	/// Flat fills, no gradients
	pub fn minimal() -> Self {
		let mut theme = Self::preset(
			"minimal",
			(Color::rgb(25, 28, 35), Color::rgb(25, 28, 35)),
			Color::rgba(130, 145, 165, 0.5),
			NodePalette::pastel(),
		);
		theme.background.use_gradient = false;
		theme.background.vignette = 0.0;
		theme.node.use_gradient = false;
		theme
	}

	fn preset(
		name: &'static str,
		(color, color_secondary): (Color, Color),
		edge_color: Color,
		palette: NodePalette,
	) -> Self {
		Self {
			name,
			background: BackgroundStyle {
				color,
				color_secondary,
				use_gradient: true,
				vignette: 0.15,
			},
			node: NodeStyle {
				size: 1.6,
				use_gradient: true,
				border_width: 1.0,
				border_color: Color::rgba(255, 255, 255, 0.25),
				show_labels: true,
				label_color: Color::rgba(255, 255, 255, 0.85),
			},
			edge: EdgeStyle {
				color: edge_color,
				arrows: true,
				curved: true,
				curve_tension: 0.35,
				show_labels: true,
				label_color: edge_color.lighten(0.4).with_alpha(0.8),
			},
			palette,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
