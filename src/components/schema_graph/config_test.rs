#![allow(clippy::float_cmp)]

use super::*;

fn node(node_type: &str, label: &str) -> Node {
	Node {
		id: "n1".into(),
		node_type: node_type.into(),
		url: "db://n1".into(),
		label: label.into(),
		level: 1,
		index: 1,
		x: 1.0,
		y: 1.0,
		..Node::default()
	}
}

// =============================================================
// LayoutConfig
// =============================================================

#[test]
fn default_layout_config() {
	let c = LayoutConfig::default();
	assert_eq!(c.font_size, 12.0);
	assert_eq!(c.object_interval_x, 480.0);
	assert_eq!(c.object_interval_y, 300.0);
	assert_eq!(c.object_interval_x_in_group, 280.0);
	assert_eq!(c.object_interval_y_in_group, 100.0);
	assert_eq!(c.object_width, 240.0);
	assert!((c.row_height - 17.4).abs() < 1e-9);
}

#[test]
fn layout_config_partial_override() {
	let c = LayoutConfig::from_json(r#"{ "objectIntervalX": 600, "fontFamily": "monospace" }"#)
		.unwrap();
	assert_eq!(c.object_interval_x, 600.0);
	assert_eq!(c.font_family, "monospace");
	assert_eq!(c.object_width, 240.0);
}

#[test]
fn layout_config_bad_json() {
	let err = LayoutConfig::from_json("{ objectWidth: ").unwrap_err();
	assert!(matches!(err, GraphError::Parse(_)));
}

// =============================================================
// StyleTable
// =============================================================

#[test]
fn bundled_styles_load() {
	let styles = StyleTable::bundled().unwrap();
	assert_eq!(styles.len(), 7);
	assert!(styles.get("table").is_some());
	assert!(matches!(
		styles.get("database").map(|t| &t.rule),
		Some(LabelRule::Literal(_))
	));
}

#[test]
fn colors_fall_back_for_unknown_type() {
	let styles = StyleTable::bundled().unwrap();
	assert_eq!(styles.colors("table"), ("#BFDBFE", "#1E3A8A"));
	assert_eq!(
		styles.colors("synonym"),
		(DEFAULT_MAIN_COLOR, DEFAULT_TEXT_COLOR)
	);
}

#[test]
fn literal_label() {
	let styles = StyleTable::bundled().unwrap();
	let rows = styles.labels_for(&node("database", "sales")).unwrap();
	assert_eq!(rows, vec!["Database"]);
}

#[test]
fn pattern_rows_are_captures() {
	let styles = StyleTable::bundled().unwrap();
	let rows = styles.labels_for(&node("table", "dbo: Orders")).unwrap();
	assert_eq!(rows, vec!["dbo", "Orders"]);

	let rows = styles
		.labels_for(&node("procedure", "dbo: CloseOrder(@orderId int)"))
		.unwrap();
	assert_eq!(rows, vec!["dbo", "CloseOrder", "@orderId int"]);
}

#[test]
fn unknown_type_is_mismatch() {
	let styles = StyleTable::bundled().unwrap();
	let err = styles.labels_for(&node("synonym", "dbo: x")).unwrap_err();
	match err {
		GraphError::ConfigMismatch {
			node_id,
			node_type,
			reason,
		} => {
			assert_eq!(node_id, "n1");
			assert_eq!(node_type, "synonym");
			assert_eq!(reason, MismatchReason::NoConfig);
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn non_matching_label_is_mismatch() {
	let styles = StyleTable::bundled().unwrap();
	let err = styles.labels_for(&node("table", "no schema here")).unwrap_err();
	assert!(matches!(
		err,
		GraphError::ConfigMismatch {
			reason: MismatchReason::NoMatch,
			..
		}
	));
}

#[test]
fn capture_count_must_match_length() {
	let styles = StyleTable::from_json(
		r##"{ "pair": { "mainColor": "#fff", "textColor": "#000", "regexp": "^(a)(b)$", "length": 1 } }"##,
	)
	.unwrap();
	let err = styles.labels_for(&node("pair", "ab")).unwrap_err();
	assert!(matches!(
		err,
		GraphError::ConfigMismatch {
			reason: MismatchReason::CaptureCount {
				expected: 1,
				found: 2
			},
			..
		}
	));
}

#[test]
fn unmatched_optional_group_is_empty_row() {
	let styles = StyleTable::from_json(
		r##"{ "opt": { "mainColor": "#fff", "textColor": "#000", "regexp": "^(a)(x)?$", "length": 2 } }"##,
	)
	.unwrap();
	let rows = styles.labels_for(&node("opt", "a")).unwrap();
	assert_eq!(rows, vec!["a", ""]);
}

#[test]
fn entry_without_rule_never_matches() {
	let styles = StyleTable::from_json(
		r##"{ "bare": { "mainColor": "#fff", "textColor": "#000" } }"##,
	)
	.unwrap();
	assert!(matches!(styles.get("bare").map(|t| &t.rule), Some(LabelRule::Missing)));
	let err = styles.labels_for(&node("bare", "anything")).unwrap_err();
	assert!(matches!(
		err,
		GraphError::ConfigMismatch {
			reason: MismatchReason::NoMatch,
			..
		}
	));
}

#[test]
fn empty_label_and_regexp_count_as_absent() {
	let styles = StyleTable::from_json(
		r##"{
			"blank": { "mainColor": "#fff", "textColor": "#000", "label": "", "regexp": "^(\\w+): (\\w+)$", "length": 2 },
			"empty": { "mainColor": "#fff", "textColor": "#000", "label": "", "regexp": "" }
		}"##,
	)
	.unwrap();
	assert!(matches!(
		styles.get("blank").map(|t| &t.rule),
		Some(LabelRule::Pattern { captures: 2, .. })
	));
	assert_eq!(
		styles.labels_for(&node("blank", "dbo: orders")).unwrap(),
		vec!["dbo", "orders"]
	);
	assert!(matches!(styles.get("empty").map(|t| &t.rule), Some(LabelRule::Missing)));
}

#[test]
fn invalid_pattern_rejected_on_load() {
	let err = StyleTable::from_json(
		r##"{ "broken": { "mainColor": "#fff", "textColor": "#000", "regexp": "(", "length": 1 } }"##,
	)
	.unwrap_err();
	match err {
		GraphError::InvalidPattern { node_type, .. } => assert_eq!(node_type, "broken"),
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn mismatch_message_names_node() {
	let styles = StyleTable::default();
	let err = styles.labels_for(&node("table", "dbo: x")).unwrap_err();
	assert_eq!(
		err.to_string(),
		"node 'n1' of type 'table': no config for node type"
	);
}
