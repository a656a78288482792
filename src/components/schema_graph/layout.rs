//! Deterministic grid placement.
//!
//! Nodes are bucketed by `level`, each bucket is sorted and laid out as one
//! column (or a stack of name-group blocks) left to right. Topology plays no
//! part in the placement.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use icu_collator::{Collator, CollatorOptions, Strength};
use log::{error, info};
use regex::Regex;

use super::config::{LayoutConfig, StyleTable};
use super::error::GraphError;
use super::types::{Graph, Node};

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

/// Sub-group name inside a label shaped like `"schema: Name_suffix"`.
static NAME_GROUP: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^:]+: ([^_]+)_").expect("name group pattern is valid"));

/// Sub-group for labels without a recognisable name.
pub const FALLBACK_GROUP: &str = "Other";

/// How a level bucket is turned into positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutPolicy {
	/// One column per level, wrapping after `max_rows` rows.
	Columns { max_rows: Option<usize> },
	/// One block per name group, blocks stacked top to bottom.
	NameGroups { max_rows: Option<usize> },
}

impl Default for LayoutPolicy {
	fn default() -> Self {
		Self::Columns { max_rows: None }
	}
}

/// Label, sort and place every node, then refresh the graph bounds.
///
/// Overwrites any existing `x`/`y`. Fails on the first node whose type
/// cannot produce labels; positions are left untouched in that case.
pub fn layout(
	graph: &mut Graph,
	config: &LayoutConfig,
	styles: &StyleTable,
	policy: LayoutPolicy,
) -> Result<(), GraphError> {
	generate_labels(&mut graph.nodes, config, styles).inspect_err(|e| error!("{e}"))?;

	let mut buckets = group_by_level(&graph.nodes);
	for bucket in &mut buckets {
		sort_bucket(&graph.nodes, bucket);
	}

	let mut x = 0.0;
	for bucket in &buckets {
		x = match policy {
			LayoutPolicy::Columns { max_rows } => {
				reshape_group(&mut graph.nodes, bucket, x, max_rows, config)
			}
			LayoutPolicy::NameGroups { max_rows } => {
				let groups = group_by_name(&graph.nodes, bucket);
				reshape_group_by_name(&mut graph.nodes, &groups, x, max_rows, config)
			}
		};
	}

	graph.update_bounds();
	info!("Graph size: {} x {}", graph.width, graph.height);
	Ok(())
}

/// Fill `labels` and `height` for every node that has no rows yet.
pub fn generate_labels(
	nodes: &mut [Node],
	config: &LayoutConfig,
	styles: &StyleTable,
) -> Result<(), GraphError> {
	for node in nodes.iter_mut().filter(|n| n.labels.is_empty()) {
		node.labels = styles.labels_for(node)?;
		node.height = config.row_height * node.labels.len() as f64;
	}
	Ok(())
}

/// Node indices bucketed by level, in ascending level order. Only levels
/// that hold at least one node get a bucket.
pub fn group_by_level(nodes: &[Node]) -> Vec<Vec<usize>> {
	let mut buckets: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
	for (i, node) in nodes.iter().enumerate() {
		buckets.entry(node.level).or_default().push(i);
	}
	buckets.into_values().collect()
}

/// Order by `index`, then by label. Both sorts are stable, so equal labels
/// keep their index order.
pub fn sort_bucket(nodes: &[Node], bucket: &mut [usize]) {
	bucket.sort_by_key(|&i| nodes[i].index);
	bucket.sort_by(|&a, &b| locale_cmp(&nodes[a].label, &nodes[b].label));
}

/// Split a sorted bucket into name groups, in order of first appearance.
pub fn group_by_name(nodes: &[Node], bucket: &[usize]) -> Vec<(String, Vec<usize>)> {
	let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
	for &i in bucket {
		let name = NAME_GROUP
			.captures(&nodes[i].label)
			.and_then(|caps| caps.get(1))
			.map_or(FALLBACK_GROUP, |m| m.as_str());
		match groups.iter_mut().find(|(n, _)| n == name) {
			Some((_, members)) => members.push(i),
			None => groups.push((name.to_string(), vec![i])),
		}
	}
	groups
}

/// Lay one bucket out as a column starting at `init_x`. Returns the x of the next level.
pub fn reshape_group(
	nodes: &mut [Node],
	bucket: &[usize],
	init_x: f64,
	max_rows: Option<usize>,
	config: &LayoutConfig,
) -> f64 {
	let rows = max_rows.map_or(bucket.len(), |m| bucket.len().min(m));
	let column_height = rows as f64 * config.object_interval_y_in_group;
	let columns = stack(nodes, bucket, init_x, -column_height / 2.0, rows, config);
	init_x
		+ (columns - 1) as f64 * config.object_interval_x_in_group
		+ config.object_interval_x
}

/// Lay one bucket out as vertically stacked name-group blocks. Returns the x
/// of the next level, advanced by the widest block.
pub fn reshape_group_by_name(
	nodes: &mut [Node],
	groups: &[(String, Vec<usize>)],
	init_x: f64,
	max_rows: Option<usize>,
	config: &LayoutConfig,
) -> f64 {
	if groups.is_empty() {
		return init_x;
	}
	let count = groups.len();
	let rows: Vec<usize> = groups
		.iter()
		.map(|(_, members)| max_rows.map_or(members.len(), |m| members.len().min(m / count)))
		.collect();
	let heights: Vec<f64> = rows
		.iter()
		.map(|&r| r as f64 * config.object_interval_y_in_group)
		.collect();
	let total_height =
		heights.iter().sum::<f64>() + (count - 1) as f64 * config.object_interval_y;

	let mut top = -total_height / 2.0;
	let mut max_columns = 0;
	for (((_, members), &rows), &height) in groups.iter().zip(&rows).zip(&heights) {
		max_columns = max_columns.max(stack(nodes, members, init_x, top, rows, config));
		top += height + config.object_interval_y;
	}
	init_x + max_columns as f64 * config.object_interval_x
}

/// Stack `members` downward from (`left`, `top`). A column holds the rows from
/// `top` to `top + rows * step` inclusive; the step that would pass the bottom
/// opens a new sub-column. Returns the number of sub-columns opened.
fn stack(
	nodes: &mut [Node],
	members: &[usize],
	left: f64,
	top: f64,
	rows: usize,
	config: &LayoutConfig,
) -> usize {
	let mut columns = 1;
	let mut x = left;
	let mut row = 0;
	for &i in members {
		nodes[i].x = x;
		nodes[i].y = top + row as f64 * config.object_interval_y_in_group;
		row += 1;
		if row > rows {
			columns += 1;
			x += config.object_interval_x_in_group;
			row = 0;
		}
	}
	columns
}

/// Locale-style label comparison using the root collation at tertiary
/// strength. Accents and case only break ties (lowercase first); whitespace
/// sorts before punctuation, punctuation before digits, digits before
/// letters.
///
/// Falls back to ordinal order if the collator cannot be built.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
	COLLATOR.with(|collator| match collator {
		Some(c) => c.compare(a, b),
		None => a.cmp(b),
	})
}

thread_local! {
	static COLLATOR: Option<Collator> = {
		let mut options = CollatorOptions::new();
		options.strength = Some(Strength::Tertiary);
		Collator::try_new(&Default::default(), options)
			.inspect_err(|e| error!("Label collator unavailable: {e}"))
			.ok()
	};
}
