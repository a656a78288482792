//! Graph model: nodes, edges and the aggregate that indexes them.

use std::collections::HashMap;

use serde::Deserialize;

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

/// A point in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	#[must_use]
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	#[must_use]
	pub fn distance(self, other: Point) -> f64 {
		((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
	}
}

/// Axis-aligned node rectangle centred on the node position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	/// Left edge in world units.
	pub left: f64,
	/// Top edge.
	pub top: f64,
	/// Right edge.
	pub right: f64,
	/// Bottom edge.
	pub bottom: f64,
}

impl Rect {
	/// Rectangle of the given size around `center`.
	pub fn centered(center: Point, width: f64, height: f64) -> Self {
		Self {
			left: center.x - width / 2.0,
			top: center.y - height / 2.0,
			right: center.x + width / 2.0,
			bottom: center.y + height / 2.0,
		}
	}

	/// Strict containment; points on the border are outside.
	pub fn contains(&self, p: Point) -> bool {
		self.left < p.x && self.top < p.y && self.right > p.x && self.bottom > p.y
	}

	/// Border segments in scan order: left, bottom, right, top.
	pub fn borders(&self) -> [(Point, Point); 4] {
		let tl = Point::new(self.left, self.top);
		let bl = Point::new(self.left, self.bottom);
		let br = Point::new(self.right, self.bottom);
		let tr = Point::new(self.right, self.top);
		[(tl, bl), (bl, br), (br, tr), (tr, tl)]
	}
}

/// A schema object as delivered by the graph document.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
	/// Unique node id, referenced by edges.
	pub id: String,
	/// Tag looked up in the style table.
	pub node_type: String,
	/// Link to the schema object.
	pub url: String,
	/// Raw label the row text is derived from.
	pub label: String,
	/// Dependency depth; nodes of one level share a column.
	pub level: u32,
	/// Secondary sort key inside a level.
	pub index: i64,
	/// Optional grouping tag.
	#[serde(default)]
	pub group: Option<String>,
	/// Centre in world units, written by the layout.
	pub x: f64,
	/// See `x`.
	pub y: f64,

	/// Row count times row height.
	#[serde(skip)]
	pub height: f64,
	/// Rendered rows, title first.
	#[serde(skip)]
	pub labels: Vec<String>,
	/// Ticked in the host's node list.
	#[serde(skip)]
	pub is_checked: bool,
	/// Excluded from drawing and hit testing.
	#[serde(skip)]
	pub is_hidden: bool,
	/// At most one node is selected.
	#[serde(skip)]
	pub is_selected: bool,
}

impl Node {
	/// Position as a point.
	pub fn center(&self) -> Point {
		Point::new(self.x, self.y)
	}

	/// Node outline for a given node width.
	pub fn rect(&self, width: f64) -> Rect {
		Rect::centered(self.center(), width, self.height)
	}

	/// Whether the edge starts or ends at this node.
	pub fn touches(&self, edge: &Edge) -> bool {
		edge.from == self.id || edge.to == self.id
	}
}

/// A directed reference between two nodes.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Edge {
	/// Id of the source node.
	pub from: String,
	/// Id of the target node.
	pub to: String,
	/// Optional caption.
	#[serde(default)]
	pub title: Option<String>,

	/// Clipped start, `None` until the clipper anchors it.
	#[serde(skip)]
	pub from_point: Option<Point>,
	/// Clipped end, `None` until the clipper anchors it.
	#[serde(skip)]
	pub to_point: Option<Point>,

	/// Mirrors the checked flag of the source node.
	#[serde(skip)]
	pub is_from_checked: bool,
	/// Mirrors the checked flag of the target node.
	#[serde(skip)]
	pub is_to_checked: bool,
	/// Source node is hidden.
	#[serde(skip)]
	pub is_from_hidden: bool,
	/// Target node is hidden.
	#[serde(skip)]
	pub is_to_hidden: bool,
}

impl Edge {
	/// Hidden when either endpoint is hidden.
	pub fn is_hidden(&self) -> bool {
		self.is_from_hidden || self.is_to_hidden
	}

	/// Both endpoints, once both sides are anchored.
	pub fn segment(&self) -> Option<(Point, Point)> {
		Some((self.from_point?, self.to_point?))
	}
}

/// The graph aggregate: nodes, edges and the bounding box of node centres.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	/// Nodes in document order.
	pub nodes: Vec<Node>,
	/// Edges in document order.
	pub edges: Vec<Edge>,
	/// Horizontal spread of node centres.
	pub width: f64,
	/// Vertical spread of node centres.
	pub height: f64,
	index: HashMap<String, usize>,
}

impl Graph {
	/// Build the graph and its id index. Bounds start at zero.
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		let index = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.clone(), i))
			.collect();
		Self {
			nodes,
			edges,
			width: 0.0,
			height: 0.0,
			index,
		}
	}

	/// Position of a node in `nodes`.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.node_index(id).map(|i| &self.nodes[i])
	}

	/// Mutable lookup by id.
	pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.node_index(id).map(|i| &mut self.nodes[i])
	}

	/// Indices of every edge that starts or ends at `node_idx`.
	pub fn incident_edges(&self, node_idx: usize) -> Vec<usize> {
		let node = &self.nodes[node_idx];
		self.edges
			.iter()
			.enumerate()
			.filter(|(_, edge)| node.touches(edge))
			.map(|(i, _)| i)
			.collect()
	}

	/// Recompute `width`/`height` as the spread of node centres.
	pub fn update_bounds(&mut self) {
		if self.nodes.is_empty() {
			self.width = 0.0;
			self.height = 0.0;
			return;
		}
		let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
		let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);
		for node in &self.nodes {
			min_x = min_x.min(node.x);
			max_x = max_x.max(node.x);
			min_y = min_y.min(node.y);
			max_y = max_y.max(node.y);
		}
		self.width = max_x - min_x;
		self.height = max_y - min_y;
	}

	/// Check or uncheck a node and mirror the flag onto its edges.
	pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
		let Some(node) = self.node_mut(id) else {
			return false;
		};
		node.is_checked = checked;
		for edge in &mut self.edges {
			if edge.from == id {
				edge.is_from_checked = checked;
			}
			if edge.to == id {
				edge.is_to_checked = checked;
			}
		}
		true
	}

	/// Flip the checked flag of a node. Returns the new state.
	pub fn toggle_checked(&mut self, id: &str) -> Option<bool> {
		let checked = !self.node(id)?.is_checked;
		self.set_checked(id, checked);
		Some(checked)
	}

	/// Check or uncheck every node.
	pub fn check_all(&mut self, checked: bool) {
		let ids: Vec<String> = self.nodes.iter().map(|n| n.id.clone()).collect();
		self.check_nodes(ids.iter().map(String::as_str), checked);
	}

	/// Check or uncheck the listed nodes. Unknown ids are skipped.
	pub fn check_nodes<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>, checked: bool) {
		for id in ids {
			self.set_checked(id, checked);
		}
	}

	/// Make `id` the only selected node; `None` clears the selection.
	pub fn select(&mut self, id: Option<&str>) -> Option<&Node> {
		for node in &mut self.nodes {
			node.is_selected = false;
		}
		let idx = self.node_index(id?)?;
		self.nodes[idx].is_selected = true;
		Some(&self.nodes[idx])
	}

	/// The selected node, if any.
	pub fn selected(&self) -> Option<&Node> {
		self.nodes.iter().find(|n| n.is_selected)
	}

	/// Hide or reveal every checked node together with the edges touching it.
	pub fn hide_checked(&mut self, hide: bool) {
		let Self { nodes, edges, .. } = self;
		for node in nodes.iter_mut().filter(|n| n.is_checked) {
			node.is_hidden = hide;
			for edge in edges.iter_mut() {
				if edge.from == node.id {
					edge.is_from_hidden = hide;
				}
				if edge.to == node.id {
					edge.is_to_hidden = hide;
				}
			}
		}
	}

	/// Case-insensitive substring match over the raw label. Empty text matches everything.
	pub fn filter(&self, text: &str) -> Vec<&Node> {
		let needle = text.to_uppercase();
		self.nodes
			.iter()
			.filter(|n| needle.is_empty() || n.label.to_uppercase().contains(&needle))
			.collect()
	}
}
