//! Zoom-dependent sizing for graph visuals.
//!
//! Drawing happens in world space after the canvas transform is applied, so a
//! value that should keep a constant on-screen size has to be divided by the
//! zoom factor `k`. [`ScaleBehavior`] captures the three ways a size can react
//! to zoom, and [`ScaledValues`] resolves the whole [`ScaleConfig`] once per
//! frame.

/// How a size reacts to the zoom level.
#[derive(Clone, Debug, PartialEq)]
#[allow(
	dead_code,
	reason = "World completes the set for callers customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size in pixels.
	Screen,
	/// World-space size whose on-screen size is kept within bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Resolves a base size to world units at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Opacity that fades in between two zoom levels.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomFade {
	/// Invisible at or below this zoom.
	pub hidden_below: f64,
	/// Fully visible at or above this zoom.
	pub visible_above: f64,
}

impl ZoomFade {
	pub fn alpha(&self, k: f64) -> f64 {
		if self.visible_above <= self.hidden_below {
			return if k >= self.visible_above { 1.0 } else { 0.0 };
		}
		((k - self.hidden_below) / (self.visible_above - self.hidden_below)).clamp(0.0, 1.0)
	}
}

#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Base node radius in world units, before the theme's size multiplier.
	pub radius: f64,
	pub radius_behavior: ScaleBehavior,
	/// Pointer hit radius in world units.
	pub hit_radius: f64,
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Below this zoom the label font stops shrinking.
	pub label_min_k: f64,
}

#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// Arrow head length in world units.
	pub arrow_size: f64,
	pub arrow_behavior: ScaleBehavior,
	/// Edge label font size in screen pixels.
	pub label_size: f64,
	/// Edge labels disappear when zoomed far out.
	pub label_fade: ZoomFade,
}

#[derive(Clone, Debug)]
pub struct RingScaleConfig {
	/// Hover ring stroke width in screen pixels.
	pub width: f64,
	/// Gap between node and ring in screen pixels.
	pub offset: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub ring: RingScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 6.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 5.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 12.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 6.0,
					max_screen: f64::INFINITY,
				},
				label_size: 11.0,
				label_min_k: 0.5,
			},
			edge: EdgeScaleConfig {
				line_width: 1.5,
				arrow_size: 7.0,
				arrow_behavior: ScaleBehavior::Clamped {
					min_screen: 4.0,
					max_screen: 16.0,
				},
				label_size: 9.0,
				label_fade: ZoomFade {
					hidden_below: 0.35,
					visible_above: 0.7,
				},
			},
			ring: RingScaleConfig {
				width: 1.5,
				offset: 2.0,
			},
		}
	}
}

/// Scale values resolved for one zoom level, all in world units.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub node_radius: f64,
	pub hit_radius: f64,
	pub node_font: String,
	pub edge_line_width: f64,
	pub arrow_size: f64,
	pub edge_font: String,
	pub edge_label_alpha: f64,
	pub ring_width: f64,
	pub ring_offset: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let node_font_size = config.node.label_size / k.max(config.node.label_min_k);
		let edge_font_size = config.edge.label_size / k.max(config.node.label_min_k);

		Self {
			k,
			node_radius: config.node.radius_behavior.apply(config.node.radius, k),
			hit_radius: config.node.hit_behavior.apply(config.node.hit_radius, k),
			node_font: format!("{node_font_size}px sans-serif"),
			edge_line_width: config.edge.line_width / k,
			arrow_size: config.edge.arrow_behavior.apply(config.edge.arrow_size, k),
			edge_font: format!("{edge_font_size}px sans-serif"),
			edge_label_alpha: config.edge.label_fade.alpha(k),
			ring_width: config.ring.width / k,
			ring_offset: config.ring.offset / k,
		}
	}
}
