//! Drives the bundled sample document through load, drag and click using only
//! the public engine API.

#![allow(clippy::float_cmp)]

use schema_graph_canvas::components::schema_graph::types::Rect;
use schema_graph_canvas::components::schema_graph::{
	Action, InteractionState, LayoutConfig, LayoutPolicy, Modifiers, Point, SchemaGraphState,
	StyleTable, document,
};

const SAMPLE: &str = include_str!("../assets/sample-graph.json");
const EPSILON: f64 = 1e-6;

fn approx_eq(a: f64, b: f64) -> bool {
	(a - b).abs() < EPSILON
}

fn on_boundary(r: Rect, p: Point) -> bool {
	let within_x = p.x >= r.left - EPSILON && p.x <= r.right + EPSILON;
	let within_y = p.y >= r.top - EPSILON && p.y <= r.bottom + EPSILON;
	((approx_eq(p.x, r.left) || approx_eq(p.x, r.right)) && within_y)
		|| ((approx_eq(p.y, r.top) || approx_eq(p.y, r.bottom)) && within_x)
}

fn session() -> SchemaGraphState {
	let mut state = SchemaGraphState::new(
		LayoutConfig::default(),
		StyleTable::bundled().unwrap(),
		1600.0,
		900.0,
		1.0,
	);
	state.load(SAMPLE).unwrap();
	state
}

#[test]
fn sample_loads_into_level_columns() {
	let config = LayoutConfig::default();
	let styles = StyleTable::bundled().unwrap();
	let graph = document::load(SAMPLE, &config, &styles, LayoutPolicy::default()).unwrap();

	for node in &graph.nodes {
		assert!(!node.labels.is_empty(), "{} has no rows", node.id);
		assert!(approx_eq(
			node.height,
			node.labels.len() as f64 * config.row_height
		));
		assert_eq!(node.x, f64::from(node.level - 1) * config.object_interval_x);
	}
	assert_eq!(graph.width, 4.0 * config.object_interval_x);

	let trigger = graph.node("tr-audit").unwrap();
	assert_eq!(trigger.labels, vec!["dbo", "trg_orders_audit", "Orders"]);
}

#[test]
fn sample_edges_start_and_end_on_borders() {
	let config = LayoutConfig::default();
	let styles = StyleTable::bundled().unwrap();
	let graph = document::load(SAMPLE, &config, &styles, LayoutPolicy::default()).unwrap();

	for edge in &graph.edges {
		let (from, to) = edge.segment().unwrap();
		let source = graph.node(&edge.from).unwrap();
		let target = graph.node(&edge.to).unwrap();
		assert!(on_boundary(source.rect(config.object_width), from));
		assert!(on_boundary(target.rect(config.object_width), to));
	}
}

#[test]
fn name_group_policy_on_sample() {
	let config = LayoutConfig::default();
	let styles = StyleTable::bundled().unwrap();
	let policy = LayoutPolicy::NameGroups { max_rows: None };
	let graph = document::load(SAMPLE, &config, &styles, policy).unwrap();

	// Orders_Archive and Orders_Current share a block, one row apart
	let archive = graph.node("t-orders-arch").unwrap();
	let current = graph.node("t-orders").unwrap();
	assert_eq!(current.y - archive.y, config.object_interval_y_in_group);
	let customers = graph.node("t-customers").unwrap();
	assert!(customers.y < archive.y);
}

#[test]
fn drag_then_click_round_trip() {
	let mut state = session();
	assert_eq!(state.graph.selected().map(|n| n.id.as_str()), None);
	assert!(state.graph.node("db").unwrap().is_checked);

	let view_idx = state.graph.node_index("v-open").unwrap();
	let origin = state.graph.nodes[view_idx].center();
	let (x, y) = state.viewport.world_to_screen(origin);

	state.on_pointer_down(x, y, 1000.0);
	state.on_pointer_move(x + 40.0, y + 20.0);
	state.on_pointer_up(x + 40.0, y + 20.0, 1400.0, Modifiers::default());
	let moved = state.graph.nodes[view_idx].center();
	assert!(moved.x > origin.x && moved.y > origin.y);
	assert_eq!(state.interaction, InteractionState::Idle);

	for edge in state.graph.edges.iter().filter(|e| e.to == "v-open") {
		let (_, to) = edge.segment().unwrap();
		assert!(on_boundary(
			state.graph.nodes[view_idx].rect(state.config.object_width),
			to
		));
	}

	let (x, y) = state.viewport.world_to_screen(moved);
	state.on_pointer_down(x, y, 2000.0);
	let actions = state.on_pointer_up(x, y, 2100.0, Modifiers::default());
	assert_eq!(
		actions,
		vec![Action::SelectNode(Some("v-open".into())), Action::RenderNeeded]
	);
	for action in &actions {
		state.apply(action);
	}
	assert_eq!(
		state.graph.selected().map(|n| n.id.as_str()),
		Some("v-open")
	);
	assert_eq!(state.graph.nodes[view_idx].center(), moved);
}

#[test]
fn side_panel_operations() {
	let mut state = session();
	let found: Vec<&str> = state
		.graph
		.filter("orders")
		.iter()
		.map(|n| n.id.as_str())
		.collect();
	assert_eq!(
		found,
		vec!["t-orders", "t-orders-arch", "v-open", "tr-audit"]
	);

	state.graph.check_nodes(["t-log"], true);
	state.graph.hide_checked(true);
	assert!(state.graph.node("db").unwrap().is_hidden);
	assert!(state.graph.node("t-log").unwrap().is_hidden);
	let hidden = state.graph.edges.iter().filter(|e| e.is_hidden()).count();
	// db -> s-dbo, db -> s-audit, s-audit -> t-log, tr-audit -> t-log
	assert_eq!(hidden, 4);
}
