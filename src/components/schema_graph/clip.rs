//! Edge clipping: turns centre-to-centre edges into border-to-border strokes.

use super::types::{Graph, Point, Rect};

#[cfg(test)]
#[path = "clip_test.rs"]
mod clip_test;

/// Border crossings of one edge against one node rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Touch {
	/// First crossing in border scan order. This is the one applied.
	pub first: Point,
	/// Crossing closest to the node centre.
	pub nearest: Point,
}

/// Re-clip every edge of the graph.
pub fn clip(graph: &mut Graph, node_width: f64) {
	let nodes: Vec<usize> = (0..graph.nodes.len()).collect();
	let edges: Vec<usize> = (0..graph.edges.len()).collect();
	clip_subset(graph, node_width, &nodes, &edges);
}

/// Re-clip only `edges`, resolving endpoints against `nodes`.
///
/// `nodes` must contain every node touched by `edges`, otherwise the missing
/// side keeps its previous endpoint.
pub fn clip_subset(graph: &mut Graph, node_width: f64, nodes: &[usize], edges: &[usize]) {
	let Graph {
		nodes: all_nodes,
		edges: all_edges,
		..
	} = graph;

	for &e in edges {
		let edge = &mut all_edges[e];
		for &n in nodes {
			let node = &all_nodes[n];
			if edge.from == node.id {
				edge.from_point = Some(node.center());
			}
			if edge.to == node.id {
				edge.to_point = Some(node.center());
			}
		}
	}

	for &n in nodes {
		let node = &all_nodes[n];
		let rect = node.rect(node_width);
		for &e in edges {
			let edge = &mut all_edges[e];
			if !node.touches(edge) {
				continue;
			}
			let Some(segment) = edge.segment() else {
				continue;
			};
			let Some(touch) = touching_point(rect, node.center(), segment) else {
				continue;
			};
			if edge.from == node.id {
				edge.from_point = Some(touch.first);
			} else {
				edge.to_point = Some(touch.first);
			}
		}
	}
}

/// Crossings of `segment` with the borders of `rect`, or `None` when it
/// crosses none of them.
pub fn touching_point(rect: Rect, center: Point, segment: (Point, Point)) -> Option<Touch> {
	let mut touch: Option<Touch> = None;
	let mut min_distance = f64::MAX;
	for (b1, b2) in rect.borders() {
		let Some(p) = intersect(segment.0, segment.1, b1, b2) else {
			continue;
		};
		let distance = p.distance(center);
		let found = touch.get_or_insert(Touch {
			first: p,
			nearest: p,
		});
		if distance <= min_distance {
			min_distance = distance;
			found.nearest = p;
		}
	}
	touch
}

/// Intersection of segments `a1-a2` and `b1-b2`.
///
/// Both segment parameters must lie in `[0, 1]`. Zero-length and parallel
/// segments never intersect.
pub fn intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
	if a1 == a2 || b1 == b2 {
		return None;
	}
	let denominator = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
	if denominator == 0.0 {
		return None;
	}

	let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denominator;
	let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denominator;
	if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
		return None;
	}

	Some(Point::new(a1.x + ua * (a2.x - a1.x), a1.y + ua * (a2.y - a1.y)))
}
