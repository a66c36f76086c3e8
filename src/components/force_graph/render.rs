//! Canvas rendering for the force graph.
//!
//! Back to front: background (screen space), then edges with arrow heads and
//! labels, dimmed nodes, highlighted nodes (world space, under the view
//! transform), and finally the vignette.

use std::f64::consts::TAU;

use force_graph::Node;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, NodeInfo};
use super::theme::{Color, EdgeStyle, Theme};

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);
	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bg = &theme.background;
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let gradient = bg
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, state.width.max(state.height) * 0.8)
				.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &bg.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &bg.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&bg.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let Ok(gradient) = ctx.create_radial_gradient(
		cx,
		cy,
		state.width.min(state.height) * 0.3,
		cx,
		cy,
		state.width.max(state.height) * 0.7,
	) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&Color::rgba(0, 0, 0, theme.background.vignette).to_css(),
	);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

type Point = (f64, f64);

/// Geometry of one edge, trimmed so it starts and ends at the node rims.
struct EdgePath {
	start: Point,
	/// Quadratic control point for curved edges.
	control: Option<Point>,
	/// End of the stroked line, where the arrow head begins.
	end: Point,
	/// Point the arrow head touches on the target rim.
	tip: Point,
	/// Unit direction of travel at the tip.
	heading: Point,
	/// Where the label is anchored.
	middle: Point,
}

impl EdgePath {
	fn between(
		from: Point,
		to: Point,
		from_radius: f64,
		to_radius: f64,
		arrow: f64,
		style: &EdgeStyle,
	) -> Option<Self> {
		let dist = distance(from, to);
		if dist < from_radius + to_radius + arrow {
			return None;
		}

		let control = style.curved.then(|| {
			let (ux, uy) = unit(from, to);
			let bend = dist * style.curve_tension * 0.3;
			(
				(from.0 + to.0) / 2.0 - uy * bend,
				(from.1 + to.1) / 2.0 + ux * bend,
			)
		});

		let toward_start = control.unwrap_or(to);
		let toward_end = control.unwrap_or(from);
		let (sx, sy) = unit(from, toward_start);
		let (hx, hy) = unit(toward_end, to);

		let start = (from.0 + sx * from_radius, from.1 + sy * from_radius);
		let tip = (to.0 - hx * to_radius, to.1 - hy * to_radius);
		let end = (tip.0 - hx * arrow, tip.1 - hy * arrow);
		let middle = match control {
			Some(c) => (
				0.25 * from.0 + 0.5 * c.0 + 0.25 * to.0,
				0.25 * from.1 + 0.5 * c.1 + 0.25 * to.1,
			),
			None => ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0),
		};

		Some(Self {
			start,
			control,
			end,
			tip,
			heading: (hx, hy),
			middle,
		})
	}

	fn stroke(&self, ctx: &CanvasRenderingContext2d) {
		ctx.begin_path();
		ctx.move_to(self.start.0, self.start.1);
		match self.control {
			Some((cx, cy)) => ctx.quadratic_curve_to(cx, cy, self.end.0, self.end.1),
			None => ctx.line_to(self.end.0, self.end.1),
		}
		ctx.stroke();
	}

	fn fill_arrow(&self, ctx: &CanvasRenderingContext2d, size: f64) {
		let (hx, hy) = self.heading;
		let (px, py) = (-hy * size * 0.5, hx * size * 0.5);
		let (bx, by) = (self.tip.0 - hx * size, self.tip.1 - hy * size);
		ctx.begin_path();
		ctx.move_to(self.tip.0, self.tip.1);
		ctx.line_to(bx + px, by + py);
		ctx.line_to(bx - px, by - py);
		ctx.close_path();
		ctx.fill();
	}
}

fn distance(a: Point, b: Point) -> f64 {
	((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

fn unit(a: Point, b: Point) -> Point {
	let d = distance(a, b).max(f64::EPSILON);
	((b.0 - a.0) / d, (b.1 - a.1) / d)
}

fn node_radius(node: &Node<NodeInfo>, scale: &ScaledValues) -> f64 {
	scale.node_radius * node.data.user_data.size
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let style = &theme.edge;
	let peak = smooth_step(state.highlight.peak());
	let arrow = if style.arrows { scale.arrow_size } else { 0.0 };

	ctx.set_font(&scale.edge_font);
	ctx.set_text_align("center");

	state.graph.visit_edges(|n1, n2, edge| {
		let Some(path) = EdgePath::between(
			(n1.x() as f64, n1.y() as f64),
			(n2.x() as f64, n2.y() as f64),
			node_radius(n1, scale),
			node_radius(n2, scale),
			arrow,
			style,
		) else {
			return;
		};

		let t = smooth_step(state.highlight.edge(n1.index(), n2.index()));
		let emphasis = if t > 0.01 {
			1.0 + 0.6 * t
		} else {
			1.0 - 0.6 * peak
		};
		let color = style.color.with_alpha((style.color.a * emphasis).min(1.0));

		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(scale.edge_line_width * (1.0 + 0.4 * t));
		path.stroke(ctx);

		if style.arrows {
			ctx.set_fill_style_str(&color.to_css());
			path.fill_arrow(ctx, arrow);
		}

		if style.show_labels && scale.edge_label_alpha > 0.01 {
			let label_color = style.label_color.fade(scale.edge_label_alpha * emphasis.min(1.0));
			ctx.set_fill_style_str(&label_color.to_css());
			let _ = ctx.fill_text(
				&edge.user_data.label,
				path.middle.0,
				path.middle.1 - 3.0 / scale.k,
			);
		}
	});
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let dim = 1.0 - 0.7 * smooth_step(state.highlight.peak());

	ctx.set_font(&scale.node_font);
	ctx.set_text_align("left");

	// Dimmed nodes first so highlighted ones stay on top.
	for highlighted in [false, true] {
		state.graph.visit_nodes(|node| {
			let idx = node.index();
			let t = smooth_step(state.highlight.node(idx));
			if (t > 0.001) != highlighted {
				return;
			}

			let alpha = dim + (1.0 - dim) * t;
			let radius = node_radius(node, scale) * (1.0 + 0.3 * t);
			draw_node(ctx, node, scale, theme, alpha, radius);

			if state.highlight.hovered == Some(idx) {
				ctx.begin_path();
				let _ = ctx.arc(node.x() as f64, node.y() as f64, radius + scale.ring_offset, 0.0, TAU);
				ctx.set_stroke_style_str(&Color::rgba(255, 255, 255, 0.8 * t).to_css());
				ctx.set_line_width(scale.ring_width);
				ctx.stroke();
			}
		});
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	radius: f64,
) {
	let (x, y) = (node.x() as f64, node.y() as f64);
	let info = &node.data.user_data;
	let style = &theme.node;

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, TAU);

	let gradient = style
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &info.color.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &info.color.to_css());
			let _ = gradient.add_color_stop(1.0, &info.color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&info.color.to_css()),
	}
	ctx.fill();

	if style.border_width > 0.0 {
		ctx.set_stroke_style_str(&style.border_color.to_css());
		ctx.set_line_width(style.border_width / scale.k);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);

	if style.show_labels {
		ctx.set_fill_style_str(&style.label_color.fade(alpha).to_css());
		let _ = ctx.fill_text(&info.label, x + radius + 4.0, y + 3.0);
	}
}
