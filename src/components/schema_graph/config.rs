//! Layout constants and the node-type style table.
//!
//! Both are read-only once loaded and are passed by reference into the layout
//! engine and the renderer.

use std::collections::HashMap;

use log::debug;
use regex::Regex;
use serde::Deserialize;

use super::error::{GraphError, MismatchReason};
use super::types::Node;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

const BUNDLED_STYLES: &str = include_str!("../../../assets/node-type-config.json");

/// Fill colour used when a node type has no style entry.
pub const DEFAULT_MAIN_COLOR: &str = "#E7E5E4";
/// Text colour used when a node type has no style entry.
pub const DEFAULT_TEXT_COLOR: &str = "black";

/// Spacing and typography of the diagram, in world units.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
	/// CSS font stack for node text.
	pub font_family: String,
	/// Font size in world units.
	pub font_size: f64,
	/// Horizontal distance between level columns.
	pub object_interval_x: f64,
	/// Vertical gap between name-group blocks.
	pub object_interval_y: f64,
	/// Horizontal offset of a wrapped sub-column.
	pub object_interval_x_in_group: f64,
	/// Vertical step between nodes of one column.
	pub object_interval_y_in_group: f64,
	/// Global node width.
	pub object_width: f64,
	/// Height of one label row.
	pub row_height: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			font_family: "'Roboto Mono', 'Open Sans', sans-serif, sans".into(),
			font_size: 12.0,
			object_interval_x: 480.0,
			object_interval_y: 300.0,
			object_interval_x_in_group: 280.0,
			object_interval_y_in_group: 100.0,
			object_width: 240.0,
			row_height: 12.0 * 1.45,
		}
	}
}

impl LayoutConfig {
	/// Read overrides from JSON. Absent keys keep their defaults.
	pub fn from_json(raw: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(raw)?)
	}
}

/// One entry of the node-type style file as written on disk.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeStyle {
	/// Fill colour of the title row.
	pub main_color: String,
	/// Colour of the title text.
	pub text_color: String,
	/// Fixed single-row text. Wins over `regexp`.
	#[serde(default)]
	pub label: Option<String>,
	/// Pattern whose capture groups become the rows.
	#[serde(default)]
	pub regexp: Option<String>,
	/// Number of capture groups `regexp` must yield.
	#[serde(default)]
	pub length: usize,
}

/// How the rows of a node are derived from its raw label.
#[derive(Clone, Debug)]
pub enum LabelRule {
	/// Fixed single-row text.
	Literal(String),
	/// Rows are the capture groups of the first match.
	Pattern {
		/// Compiled `regexp` of the style entry.
		regex: Regex,
		/// Expected number of capture groups.
		captures: usize,
	},
	/// The style entry defines neither a literal nor a pattern.
	Missing,
}

impl LabelRule {
	fn apply(&self, label: &str) -> Result<Vec<String>, MismatchReason> {
		match self {
			Self::Literal(text) => Ok(vec![text.clone()]),
			Self::Pattern { regex, captures } => {
				let caps = regex.captures(label).ok_or(MismatchReason::NoMatch)?;
				let found = caps.len() - 1;
				if found != *captures {
					return Err(MismatchReason::CaptureCount {
						expected: *captures,
						found,
					});
				}
				Ok(caps
					.iter()
					.skip(1)
					.map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
					.collect())
			}
			Self::Missing => Err(MismatchReason::NoMatch),
		}
	}
}

/// A compiled style entry.
#[derive(Clone, Debug)]
pub struct NodeType {
	/// Fill colour of the title row.
	pub main_color: String,
	/// Colour of the title text.
	pub text_color: String,
	/// How rows are derived from the raw label.
	pub rule: LabelRule,
}

/// Node-type tag to colours and label rule.
#[derive(Clone, Debug, Default)]
pub struct StyleTable {
	types: HashMap<String, NodeType>,
}

impl StyleTable {
	/// The style file shipped in `assets/`.
	pub fn bundled() -> Result<Self, GraphError> {
		Self::from_json(BUNDLED_STYLES)
	}

	/// Parse and compile a style file.
	pub fn from_json(raw: &str) -> Result<Self, GraphError> {
		let styles: HashMap<String, NodeTypeStyle> = serde_json::from_str(raw)?;
		Self::from_styles(styles)
	}

	/// Compile every pattern up front so layout never sees a bad regex.
	pub fn from_styles(styles: HashMap<String, NodeTypeStyle>) -> Result<Self, GraphError> {
		let mut types = HashMap::with_capacity(styles.len());
		for (tag, style) in styles {
			let label = style.label.filter(|l| !l.is_empty());
			let regexp = style.regexp.filter(|r| !r.is_empty());
			let rule = match (label, regexp) {
				(Some(text), _) => LabelRule::Literal(text),
				(None, Some(pattern)) => {
					let regex = Regex::new(&pattern).map_err(|source| GraphError::InvalidPattern {
						node_type: tag.clone(),
						source,
					})?;
					LabelRule::Pattern {
						regex,
						captures: style.length,
					}
				}
				(None, None) => LabelRule::Missing,
			};
			types.insert(
				tag,
				NodeType {
					main_color: style.main_color,
					text_color: style.text_color,
					rule,
				},
			);
		}
		debug!("Loaded {} node type styles", types.len());
		Ok(Self { types })
	}

	/// Style of a node type, if configured.
	pub fn get(&self, node_type: &str) -> Option<&NodeType> {
		self.types.get(node_type)
	}

	/// Number of node types.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Whether no node type is configured.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Fill and text colour of a node, falling back to neutral defaults.
	pub fn colors(&self, node_type: &str) -> (&str, &str) {
		self.get(node_type).map_or((DEFAULT_MAIN_COLOR, DEFAULT_TEXT_COLOR), |t| {
			(t.main_color.as_str(), t.text_color.as_str())
		})
	}

	/// Display rows for `node`, or the reason its type cannot label it.
	pub fn labels_for(&self, node: &Node) -> Result<Vec<String>, GraphError> {
		let mismatch = |reason| GraphError::ConfigMismatch {
			node_id: node.id.clone(),
			node_type: node.node_type.clone(),
			reason,
		};
		let node_type = self
			.get(&node.node_type)
			.ok_or_else(|| mismatch(MismatchReason::NoConfig))?;
		node_type.rule.apply(&node.label).map_err(mismatch)
	}
}
