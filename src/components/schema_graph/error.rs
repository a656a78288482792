//! Error types for loading, validating and labelling a graph.

use std::fmt;

use thiserror::Error;

/// Everything that can go wrong between a raw graph document and a drawable graph.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The input is not a JSON document of the expected shape.
	#[error("wrong JSON format provided: {0}")]
	Parse(#[from] serde_json::Error),

	/// The document parsed but required fields are missing or mistyped.
	#[error("graph document rejected with {} issue(s)", .0.len())]
	Validation(Vec<ValidationIssue>),

	/// A node cannot be labelled with the configured node-type rules.
	#[error("node '{node_id}' of type '{node_type}': {reason}")]
	ConfigMismatch {
		/// Id of the node that failed.
		node_id: String,
		/// Its node type tag.
		node_type: String,
		/// What did not fit.
		reason: MismatchReason,
	},

	/// A style table entry carries a pattern that does not compile.
	#[error("label pattern for node type '{node_type}' is invalid")]
	InvalidPattern {
		/// Style entry holding the pattern.
		node_type: String,
		/// Compile error from `regex`.
		#[source]
		source: regex::Error,
	},
}

/// Why a node label does not fit its node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MismatchReason {
	/// The style table has no entry for the node type.
	NoConfig,
	/// The label rule does not match the raw label.
	NoMatch,
	/// The pattern matched with the wrong number of capture groups.
	CaptureCount {
		/// `length` of the style entry.
		expected: usize,
		/// Groups the pattern actually has.
		found: usize,
	},
}

impl fmt::Display for MismatchReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NoConfig => write!(f, "no config for node type"),
			Self::NoMatch => write!(f, "pattern doesn't match"),
			Self::CaptureCount { expected, found } => {
				write!(f, "pattern yields {found} capture(s), expected {expected}")
			}
		}
	}
}

/// Which part of the document an issue belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
	/// The top-level object.
	Document,
	/// Entry of the `nodes` array.
	Node(usize),
	/// Entry of the `edges` array.
	Edge(usize),
}

/// One missing or mistyped field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
	/// Where the field was expected.
	pub location: Location,
	/// Name of the offending field.
	pub field: &'static str,
}

impl fmt::Display for ValidationIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.location {
			Location::Document => write!(f, "document: '{}' is missing", self.field),
			Location::Node(i) => write!(f, "node #{i}: property '{}' is missing", self.field),
			Location::Edge(i) => write!(f, "edge #{i}: property '{}' is missing", self.field),
		}
	}
}
