use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasEdge, GraphCanvasState, NodeInfo};
use crate::graph::curve::{self, Point};
use crate::graph::style;

const BACKGROUND: &str = "#f4f4f4";
const SELECTED: &str = "#33318f";
/// Edge labels are only drawn when zoomed in past this ratio.
const EDGE_LABEL_RATIO: f64 = 1.2;
const ICON_FONT: &str = "\"Font Awesome 6 Free\"";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let (width, height) = (state.camera.width, state.camera.height);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);

	let screen = state.screen_positions();
	let mut radii = HashMap::new();
	state.graph.visit_nodes(|node| {
		radii.insert(node.index(), node_radius(state, &node.data.user_data));
	});

	draw_edges(state, ctx, &screen, &radii);
	draw_nodes(state, ctx, &screen);
}

fn node_radius(state: &GraphCanvasState, info: &NodeInfo) -> f64 {
	(info.radius() / state.camera.state().ratio).max(2.0)
}

fn draw_edges(
	state: &GraphCanvasState,
	ctx: &CanvasRenderingContext2d,
	screen: &HashMap<DefaultNodeIdx, Point>,
	radii: &HashMap<DefaultNodeIdx, f64>,
) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let show_labels = state.camera.state().ratio < EDGE_LABEL_RATIO;

	for edge in &state.edges {
		let (Some(&source), Some(&target)) = (screen.get(&edge.source), screen.get(&edge.target))
		else {
			continue;
		};
		let selected = state.is_selected_edge(&edge.key);
		let highlighted = state.is_highlighted(edge.source) && state.is_highlighted(edge.target);
		let alpha = if highlighted || selected {
			0.8 + 0.2 * t
		} else {
			0.8 - 0.6 * t
		};
		let width = if selected { 3.0 } else { 1.5 };

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(if selected { SELECTED } else { edge.color.as_str() });
		ctx.set_fill_style_str(if selected { SELECTED } else { edge.color.as_str() });
		ctx.set_line_width(width);

		if edge.source == edge.target {
			draw_self_loop(ctx, source, radii.get(&edge.source).copied().unwrap_or(0.0));
			ctx.set_global_alpha(1.0);
			continue;
		}

		// curve heights are in pixels so parallel edges stay apart at any zoom
		let control = curve::control_point(curve::curve_height(edge.group), source, target);
		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.quadratic_curve_to(control.x, control.y, target.x, target.y);
		ctx.stroke();

		if edge.directed {
			let target_radius = radii.get(&edge.target).copied().unwrap_or(0.0);
			draw_arrow(ctx, control, target, target_radius, width);
		}
		if show_labels || selected {
			draw_edge_label(ctx, edge, source, control, target);
		}
		ctx.set_global_alpha(1.0);
	}
}

fn draw_self_loop(ctx: &CanvasRenderingContext2d, at: Point, radius: f64) {
	let loop_radius = radius.max(6.0);
	ctx.begin_path();
	let _ = ctx.arc(at.x, at.y - radius - loop_radius * 0.6, loop_radius, 0.0, 2.0 * PI);
	ctx.stroke();
}

/// Arrow head touching the target node's rim, aligned with the curve's
/// final tangent.
fn draw_arrow(ctx: &CanvasRenderingContext2d, control: Point, target: Point, radius: f64, width: f64) {
	let (dx, dy) = (target.x - control.x, target.y - control.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let size = 6.0 + width * 2.0;
	let (ux, uy) = (dx / dist, dy / dist);
	let (tip_x, tip_y) = (target.x - ux * radius, target.y - uy * radius);
	let (back_x, back_y) = (tip_x - ux * size, tip_y - uy * size);
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	edge: &CanvasEdge,
	source: Point,
	control: Point,
	target: Point,
) {
	let at = curve::point_on_curve(0.5, source, control, target);
	ctx.set_font("12px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let text_width = ctx
		.measure_text(&edge.label)
		.map(|m| m.width())
		.unwrap_or(edge.label.len() as f64 * 6.0);
	ctx.set_fill_style_str(style::LABEL_BACKGROUND);
	ctx.fill_rect(at.x - text_width / 2.0 - 3.0, at.y - 8.0, text_width + 6.0, 16.0);
	ctx.set_fill_style_str("#000000");
	let _ = ctx.fill_text(&edge.label, at.x, at.y);
}

fn draw_nodes(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d, screen: &HashMap<DefaultNodeIdx, Point>) {
	let (has_highlight, t) = (state.has_active_highlight(), ease_out_cubic(state.hover.highlight_t));

	// dimmed nodes first so highlighted ones end up on top
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		if let Some(&at) = screen.get(&idx) {
			ctx.set_global_alpha(1.0 - 0.6 * t);
			draw_node(state, ctx, &node.data.user_data, at, 1.0);
			ctx.set_global_alpha(1.0);
		}
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let Some(&at) = screen.get(&idx) else {
			return;
		};
		let info = &node.data.user_data;
		let radius = node_radius(state, info);
		let hovered = state.is_hovered(idx);
		let (scale, glow) = if hovered {
			(1.0 + 0.25 * t, 1.8 + 1.2 * t)
		} else {
			(1.0 + 0.1 * t, 1.4 + 0.6 * t)
		};

		if t > 0.01 {
			if let Ok(gradient) =
				ctx.create_radial_gradient(at.x, at.y, radius * 0.3, at.x, at.y, radius * glow)
			{
				let alpha = if hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(51, 49, 143, {alpha})"));
				let _ = gradient.add_color_stop(1.0, "rgba(51, 49, 143, 0)");
				ctx.begin_path();
				let _ = ctx.arc(at.x, at.y, radius * glow, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}
		draw_node(state, ctx, info, at, scale);
	});
}

fn draw_node(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d, info: &NodeInfo, at: Point, scale: f64) {
	let radius = node_radius(state, info) * scale;
	let selected = state.is_selected_node(&info.id);

	ctx.begin_path();
	let _ = ctx.arc(at.x, at.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&info.color);
	ctx.fill();
	ctx.set_line_width(if selected { 3.0 } else { 1.5 });
	ctx.set_stroke_style_str(if selected { SELECTED } else { info.border.as_str() });
	ctx.stroke();

	if radius >= 6.0 {
		ctx.set_fill_style_str("#ffffff");
		ctx.set_font(&format!("900 {}px {ICON_FONT}", (radius * 1.1).round()));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&info.glyph.to_string(), at.x, at.y);
	}

	if let Some(label) = &info.label {
		let font_size = style::LABEL_FONT_SIZE;
		ctx.set_font(&format!("{font_size}px sans-serif"));
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		let top = at.y + radius + 4.0;
		if let Ok(metrics) = ctx.measure_text(label) {
			let w = metrics.width();
			ctx.set_fill_style_str(style::LABEL_BACKGROUND);
			ctx.fill_rect(at.x - w / 2.0 - 3.0, top - 1.0, w + 6.0, font_size + 3.0);
		}
		ctx.set_fill_style_str(if selected { SELECTED } else { "#000000" });
		let _ = ctx.fill_text(label, at.x, top);
	}
}
