//! Graph document loading: JSON parsing, field validation and preparation.

use log::{info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::clip;
use super::config::{LayoutConfig, StyleTable};
use super::error::{GraphError, Location, ValidationIssue};
use super::layout::{self, LayoutPolicy};
use super::types::{Edge, Graph, Node};

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

#[derive(Deserialize)]
struct GraphDocument {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
}

/// Parse and validate a raw document into an un-laid-out graph.
///
/// The first node carrying a `group` starts out checked.
pub fn parse(raw: &str) -> Result<Graph, GraphError> {
	let value: Value = serde_json::from_str(raw)?;
	let issues = validate(&value);
	if !issues.is_empty() {
		for issue in &issues {
			warn!("{issue}");
		}
		return Err(GraphError::Validation(issues));
	}

	let document: GraphDocument = serde_json::from_value(value)?;
	let mut graph = Graph::new(document.nodes, document.edges);
	if let Some(id) = graph
		.nodes
		.iter()
		.find(|n| n.group.as_deref().is_some_and(|g| !g.is_empty()))
		.map(|n| n.id.clone())
	{
		graph.set_checked(&id, true);
	}
	Ok(graph)
}

/// Parse, lay out and clip a document in one go.
pub fn load(
	raw: &str,
	config: &LayoutConfig,
	styles: &StyleTable,
	policy: LayoutPolicy,
) -> Result<Graph, GraphError> {
	let mut graph = parse(raw)?;
	layout::layout(&mut graph, config, styles, policy)?;
	clip::clip(&mut graph, config.object_width);
	info!(
		"Loaded graph with {} nodes and {} edges",
		graph.nodes.len(),
		graph.edges.len()
	);
	Ok(graph)
}

/// Collect every missing or mistyped field. Zero and empty values count as missing.
pub fn validate(document: &Value) -> Vec<ValidationIssue> {
	let mut issues = Vec::new();
	let (Some(nodes), Some(edges)) = (
		document.get("nodes").and_then(Value::as_array),
		document.get("edges").and_then(Value::as_array),
	) else {
		for field in ["nodes", "edges"] {
			if document.get(field).and_then(Value::as_array).is_none() {
				issues.push(ValidationIssue {
					location: Location::Document,
					field,
				});
			}
		}
		return issues;
	};

	for (i, edge) in edges.iter().enumerate() {
		let Some(edge) = edge.as_object() else {
			issues.push(ValidationIssue {
				location: Location::Edge(i),
				field: "from",
			});
			continue;
		};
		for field in ["from", "to"] {
			if !is_filled_string(edge, field) {
				issues.push(ValidationIssue {
					location: Location::Edge(i),
					field,
				});
			}
		}
	}

	for (i, node) in nodes.iter().enumerate() {
		let Some(node) = node.as_object() else {
			issues.push(ValidationIssue {
				location: Location::Node(i),
				field: "id",
			});
			continue;
		};
		let mut missing = |field: &'static str| {
			issues.push(ValidationIssue {
				location: Location::Node(i),
				field,
			})
		};
		for field in ["id", "nodeType", "url", "label"] {
			if !is_filled_string(node, field) {
				missing(field);
			}
		}
		let level = node.get("level").and_then(Value::as_u64);
		if !level.is_some_and(|l| l > 0 && u32::try_from(l).is_ok()) {
			missing("level");
		}
		if !node.get("index").and_then(Value::as_i64).is_some_and(|i| i != 0) {
			missing("index");
		}
		for field in ["x", "y"] {
			if !node.get(field).and_then(Value::as_f64).is_some_and(|v| v != 0.0) {
				missing(field);
			}
		}
		if node.get("group").is_some_and(|g| !(g.is_string() || g.is_null())) {
			missing("group");
		}
	}
	issues
}

fn is_filled_string(object: &Map<String, Value>, field: &str) -> bool {
	object
		.get(field)
		.and_then(Value::as_str)
		.is_some_and(|s| !s.is_empty())
}
