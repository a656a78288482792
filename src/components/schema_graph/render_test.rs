#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
	(a - b).abs() < EPSILON
}

fn edge(from_checked: bool, to_checked: bool) -> Edge {
	Edge {
		from: "a".into(),
		to: "b".into(),
		is_from_checked: from_checked,
		is_to_checked: to_checked,
		..Edge::default()
	}
}

// --- Borders ---

#[test]
fn plain_node_has_default_border_only() {
	assert_eq!(border_passes(&Node::default(), false), vec![BorderState::Default]);
}

#[test]
fn border_passes_in_precedence_order() {
	let node = Node {
		is_checked: true,
		is_selected: true,
		..Node::default()
	};
	assert_eq!(
		border_passes(&node, true),
		vec![
			BorderState::Default,
			BorderState::Checked,
			BorderState::Selected,
			BorderState::Highlighted,
		]
	);
	let widths: Vec<f64> = border_passes(&node, true)
		.into_iter()
		.map(|b| b.stroke().0)
		.collect();
	assert_eq!(widths, vec![1.0, 2.0, 4.0, 6.0]);
}

#[test]
fn highlight_without_flags() {
	assert_eq!(
		border_passes(&Node::default(), true),
		vec![BorderState::Default, BorderState::Highlighted]
	);
	assert_eq!(BorderState::Highlighted.stroke(), (6.0, "#FDBA74"));
}

// --- Edges ---

#[test]
fn edge_styles_follow_checked_ends() {
	let both = edge_style(&edge(true, true));
	assert_eq!((both.width, both.stroke, both.arrow_scale), (2.0, "#007bff", 1.5));

	let one = edge_style(&edge(false, true));
	assert_eq!((one.width, one.stroke, one.arrow_scale), (1.0, "#007bff", 1.0));
	assert_eq!(edge_style(&edge(true, false)), one);

	let none = edge_style(&edge(false, false));
	assert_eq!((none.stroke, none.arrow_fill), ("#AAAAAA", "black"));
}

#[test]
fn arrowhead_geometry() {
	let from = Point::new(0.0, 0.0);
	let to = Point::new(100.0, 0.0);
	let [tip, left, notch, right] = arrowhead(from, to, 1.0);
	assert_eq!(tip, to);
	assert!(approx_eq(notch.x, 100.0 - 12.0 * 0.6));
	assert!(approx_eq(notch.y, 0.0));
	assert!(left.y < 0.0 && right.y > 0.0);
	assert!(approx_eq(left.x, right.x));
	assert!(approx_eq(left.y, -right.y));
	assert!(approx_eq(tip.distance(left), 12.0));

	let [_, big_left, ..] = arrowhead(from, to, 1.5);
	assert!(approx_eq(tip.distance(big_left), 18.0));
}

// --- Text ---

#[test]
fn text_level_of_detail() {
	assert!(shows_text(TEXT_LOD_SCALE));
	assert!(shows_text(2.0));
	assert!(!shows_text(0.29));
}

#[test]
fn short_label_unchanged() {
	let config = LayoutConfig::default();
	assert_eq!(shorten_label("dbo", &config), "dbo");
	// 30 glyphs of 7.56 still fit in 228
	let thirty = "x".repeat(30);
	assert_eq!(shorten_label(&thirty, &config), thirty);
}

#[test]
fn long_label_keeps_both_ends() {
	let config = LayoutConfig::default();
	let label = "abcdefghijklmnopqrstuvwxyz0123456789ABCD";
	let short = shorten_label(label, &config);
	assert_eq!(short, "abcdefghijklmno..z0123456789ABCD");
	assert!(short.chars().count() < label.chars().count());
}

#[test]
fn shortening_counts_chars_not_bytes() {
	let config = LayoutConfig::default();
	let label = "é".repeat(40);
	let short = shorten_label(&label, &config);
	assert_eq!(short, format!("{}..{}", "é".repeat(15), "é".repeat(15)));
}

// --- Info overlay ---

#[test]
fn info_text_shows_zoom_and_cursor() {
	let mut state = SchemaGraphState::new(
		LayoutConfig::default(),
		StyleTable::default(),
		800.0,
		600.0,
		1.0,
	);
	state.viewport.scale = 1.5;
	state.cursor_x = 15.0;
	state.cursor_y = 30.0;
	assert_eq!(info_text(&state), "150 %\n10 20");
}
