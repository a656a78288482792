//! Canvas 2D drawing of the graph, plus the pure helpers behind it.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::{LayoutConfig, StyleTable};
use super::state::SchemaGraphState;
use super::types::{Edge, Node, Point};

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

/// Below this zoom no text is drawn.
pub const TEXT_LOD_SCALE: f64 = 0.3;
/// Average glyph width as a share of the font size.
pub const GLYPH_WIDTH_RATIO: f64 = 0.63;
/// Marker inserted where a long label is cut.
pub const ELLIPSIS: &str = "..";
const ARROW_SIZE: f64 = 12.0;
const BACKGROUND: &str = "#EEEEEE";
const CHECKED_BLUE: &str = "#007bff";

/// Border passes of a node, in drawing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BorderState {
	/// Thin grey outline.
	Default,
	/// Blue outline of a checked node.
	Checked,
	/// Thick blue outline of the selected node.
	Selected,
	/// Orange outline of the externally highlighted node.
	Highlighted,
}

impl BorderState {
	/// Line width in world units and stroke colour.
	pub fn stroke(self) -> (f64, &'static str) {
		match self {
			Self::Default => (1.0, "#777"),
			Self::Checked => (2.0, CHECKED_BLUE),
			Self::Selected => (4.0, CHECKED_BLUE),
			Self::Highlighted => (6.0, "#FDBA74"),
		}
	}
}

/// Every border state that applies to `node`, lowest precedence first.
pub fn border_passes(node: &Node, highlighted: bool) -> Vec<BorderState> {
	let mut passes = vec![BorderState::Default];
	if node.is_checked {
		passes.push(BorderState::Checked);
	}
	if node.is_selected {
		passes.push(BorderState::Selected);
	}
	if highlighted {
		passes.push(BorderState::Highlighted);
	}
	passes
}

/// Stroke and arrowhead look of an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	/// Line width in world units.
	pub width: f64,
	/// Line colour.
	pub stroke: &'static str,
	/// Arrowhead colour.
	pub arrow_fill: &'static str,
	/// Arrowhead size relative to the base size.
	pub arrow_scale: f64,
}

/// Edges touching checked nodes are drawn in blue, thicker when both ends are checked.
pub fn edge_style(edge: &Edge) -> EdgeStyle {
	match (edge.is_from_checked, edge.is_to_checked) {
		(true, true) => EdgeStyle {
			width: 2.0,
			stroke: CHECKED_BLUE,
			arrow_fill: CHECKED_BLUE,
			arrow_scale: 1.5,
		},
		(true, false) | (false, true) => EdgeStyle {
			width: 1.0,
			stroke: CHECKED_BLUE,
			arrow_fill: CHECKED_BLUE,
			arrow_scale: 1.0,
		},
		(false, false) => EdgeStyle {
			width: 1.0,
			stroke: "#AAAAAA",
			arrow_fill: "black",
			arrow_scale: 1.0,
		},
	}
}

/// Whether labels are drawn at this zoom.
pub fn shows_text(scale: f64) -> bool {
	scale >= TEXT_LOD_SCALE
}

/// Replace the middle of a label that would overflow the node interior.
pub fn shorten_label(text: &str, config: &LayoutConfig) -> String {
	let glyph = GLYPH_WIDTH_RATIO * config.font_size;
	let chars: Vec<char> = text.chars().collect();
	let overflow = glyph * chars.len() as f64 - (config.object_width - config.font_size);
	if overflow < 0.0 {
		return text.to_string();
	}

	let cut = (overflow / 2.0 / glyph).floor();
	let half = chars.len() as f64 / 2.0;
	let head = (half - cut - 1.0).max(0.0) as usize;
	let tail = ((half + cut + 1.0) as usize).clamp(head, chars.len());
	let mut shortened: String = chars[..head].iter().collect();
	shortened.push_str(ELLIPSIS);
	shortened.extend(&chars[tail..]);
	shortened
}

/// Tip, left barb, notch and right barb of an arrowhead pointing at `to`.
pub fn arrowhead(from: Point, to: Point, scale: f64) -> [Point; 4] {
	let size = ARROW_SIZE * scale;
	let angle = (to.y - from.y).atan2(to.x - from.x);
	let at = |a: f64, len: f64| Point::new(to.x + len * a.cos(), to.y + len * a.sin());
	[
		to,
		at(angle - PI * 0.9, size),
		at(angle - PI, size * 0.6),
		at(angle + PI * 0.9, size),
	]
}

/// Zoom percentage and cursor world position.
pub fn info_text(state: &SchemaGraphState) -> String {
	let world = state.cursor_world();
	format!(
		"{} %\n{:.0} {:.0}",
		(state.viewport.scale * 100.0).round(),
		world.x,
		world.y
	)
}

/// Draw the whole frame: background, visible edges, visible nodes and the info overlay.
pub fn render(state: &SchemaGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let viewport = &state.viewport;
	ctx.save();
	let _ = ctx.translate(viewport.shift_x, viewport.shift_y);
	let _ = ctx.scale(viewport.scale, viewport.scale);
	for edge in &state.graph.edges {
		draw_edge(ctx, edge);
	}
	for node in &state.graph.nodes {
		draw_node(
			ctx,
			node,
			state.is_highlighted(&node.id),
			viewport.scale,
			&state.config,
			&state.styles,
		);
	}
	ctx.restore();

	draw_info(ctx, &info_text(state), &state.config);
}

fn draw_edge(ctx: &CanvasRenderingContext2d, edge: &Edge) {
	if edge.is_hidden() {
		return;
	}
	let Some((from, to)) = edge.segment() else {
		return;
	};
	let style = edge_style(edge);

	ctx.set_line_width(style.width);
	ctx.set_stroke_style_str(style.stroke);
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(to.x, to.y);
	ctx.stroke();

	let [tip, left, notch, right] = arrowhead(from, to, style.arrow_scale);
	ctx.set_fill_style_str(style.arrow_fill);
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(left.x, left.y);
	ctx.line_to(notch.x, notch.y);
	ctx.line_to(right.x, right.y);
	ctx.close_path();
	ctx.fill();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	highlighted: bool,
	scale: f64,
	config: &LayoutConfig,
	styles: &StyleTable,
) {
	if node.labels.is_empty() || node.is_hidden {
		return;
	}
	let (main_color, text_color) = styles.colors(&node.node_type);
	let rect = node.rect(config.object_width);
	let (w, h) = (rect.right - rect.left, rect.bottom - rect.top);

	ctx.set_fill_style_str(main_color);
	ctx.fill_rect(rect.left, rect.top, w, h);
	// title row
	ctx.set_fill_style_str("rgba(0,0,0,.05)");
	ctx.fill_rect(rect.left, rect.top, w, config.row_height);

	for pass in border_passes(node, highlighted) {
		let (width, color) = pass.stroke();
		ctx.set_line_width(width);
		ctx.set_stroke_style_str(color);
		ctx.stroke_rect(rect.left, rect.top, w, h);
	}

	if !shows_text(scale) {
		return;
	}
	ctx.set_font(&format!("400 {}px {}", config.font_size, config.font_family));
	ctx.set_fill_style_str(text_color);
	for (row, label) in node.labels.iter().enumerate() {
		let baseline = rect.top + row as f64 * config.row_height + config.row_height * 0.75;
		let _ = ctx.fill_text(
			&shorten_label(label, config),
			rect.left + config.font_size / 2.0,
			baseline,
		);
	}
}

fn draw_info(ctx: &CanvasRenderingContext2d, text: &str, config: &LayoutConfig) {
	let lines: Vec<&str> = text.lines().collect();
	ctx.set_fill_style_str("rgba(0,0,0,.4)");
	ctx.fill_rect(0.0, 0.0, 100.0, config.row_height * lines.len() as f64 + 6.0);
	ctx.set_font(&format!("600 {}px {}", config.font_size, config.font_family));
	ctx.set_fill_style_str("white");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, 10.0, 16.0 + i as f64 * config.row_height);
	}
}
