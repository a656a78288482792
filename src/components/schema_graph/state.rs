//! Canvas session state and the pointer state machine.
//!
//! Everything here is independent of the DOM so the whole click / pan / drag
//! protocol can be driven from tests. Handlers return [`Action`]s; the host
//! redraws on [`Action::RenderNeeded`] and forwards selection changes to its UI.

use log::{debug, warn};

use super::clip;
use super::config::{LayoutConfig, StyleTable};
use super::document;
use super::error::GraphError;
use super::layout::LayoutPolicy;
use super::types::{Graph, Point};
use super::viewport::Viewport;

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

/// Maximum pointer travel, in device pixels per axis, that still counts as a click.
pub const CLICK_SLOP_PX: f64 = 4.0;
/// Maximum press duration of a click.
pub const CLICK_MAX_MS: f64 = 300.0;

/// Modifier keys held during a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
	/// Control key.
	pub ctrl: bool,
	/// Shift key.
	pub shift: bool,
}

impl Modifiers {
	/// Whether the click should add to the checked set instead of selecting.
	pub fn is_multiple(self) -> bool {
		self.ctrl || self.shift
	}
}

/// Requests from the state machine to its host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
	/// The canvas must be redrawn.
	RenderNeeded,
	/// Select a node; `None` clears the selection.
	SelectNode(Option<String>),
	/// Toggle the checked flag of a node.
	CheckNode(String),
}

/// Everything a node drag has to re-clip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dependents {
	/// The dragged node and every node sharing an edge with it.
	pub nodes: Vec<usize>,
	/// Edges incident to the dragged node.
	pub edges: Vec<usize>,
}

/// What the pointer is currently doing.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionState {
	/// No button held.
	#[default]
	Idle,
	/// Dragging the background.
	Panning {
		/// Viewport shift when the pan started.
		origin_x: f64,
		/// See `origin_x`.
		origin_y: f64,
	},
	/// Dragging a node.
	DraggingNode {
		/// Index of the dragged node.
		node: usize,
		/// Node centre when the drag started.
		origin: Point,
		/// What to re-clip on every move.
		dependents: Dependents,
	},
}

#[derive(Clone, Copy, Debug, Default)]
struct PointerStart {
	x: f64,
	y: f64,
	time_ms: f64,
}

/// Everything one canvas needs between events.
pub struct SchemaGraphState {
	/// The graph on screen.
	pub graph: Graph,
	/// Current pan and zoom.
	pub viewport: Viewport,
	/// Pointer state machine.
	pub interaction: InteractionState,
	/// Spacing used for layout, clipping and drawing.
	pub config: LayoutConfig,
	/// Node-type styles.
	pub styles: StyleTable,
	/// Placement policy applied on load.
	pub policy: LayoutPolicy,
	/// Node emphasised from outside the canvas (e.g. hovered in a list).
	pub highlighted: Option<String>,
	/// Last pointer position in CSS pixels.
	pub cursor_x: f64,
	/// See `cursor_x`.
	pub cursor_y: f64,
	/// Canvas backing-store size in device pixels.
	pub width: f64,
	/// See `width`.
	pub height: f64,
	start: PointerStart,
	/// Graph bounds the viewport was last fitted to.
	fitted: Option<(f64, f64)>,
}

impl SchemaGraphState {
	/// Empty state for a canvas of `width` x `height` device pixels.
	pub fn new(config: LayoutConfig, styles: StyleTable, width: f64, height: f64, dpr: f64) -> Self {
		Self {
			graph: Graph::default(),
			viewport: Viewport::new(dpr),
			interaction: InteractionState::Idle,
			config,
			styles,
			policy: LayoutPolicy::default(),
			highlighted: None,
			cursor_x: 0.0,
			cursor_y: 0.0,
			width,
			height,
			start: PointerStart::default(),
			fitted: None,
		}
	}

	/// Replace the graph with a freshly loaded document.
	///
	/// On any error the current graph stays on screen.
	pub fn load(&mut self, raw: &str) -> Result<(), GraphError> {
		let graph = document::load(raw, &self.config, &self.styles, self.policy)
			.inspect_err(|e| warn!("Graph not loaded: {e}"))?;
		self.set_graph(graph);
		Ok(())
	}

	/// Install an already prepared graph and fit it to the canvas.
	pub fn set_graph(&mut self, graph: Graph) {
		self.graph = graph;
		self.interaction = InteractionState::Idle;
		self.fit_to_content();
	}

	/// Record a new canvas size. The view is refitted only when the graph
	/// bounds changed since the last fit, so pan and zoom survive a window
	/// resize.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		if self.fitted != Some((self.graph.width, self.graph.height)) {
			self.fit_to_content();
		}
	}

	/// Centre the graph and scale it to fill the canvas.
	pub fn fit_to_content(&mut self) {
		self.viewport
			.fit(self.width, self.height, self.graph.width, self.graph.height);
		self.fitted = Some((self.graph.width, self.graph.height));
	}

	/// First node whose rectangle contains the world point.
	pub fn node_at(&self, world: Point) -> Option<usize> {
		let width = self.config.object_width;
		self.graph
			.nodes
			.iter()
			.position(|n| n.rect(width).contains(world))
	}

	/// Hit test at a CSS-pixel position.
	pub fn node_at_position(&self, px: f64, py: f64) -> Option<usize> {
		self.node_at(self.viewport.screen_to_world(px, py))
	}

	/// World position of the last known pointer location.
	pub fn cursor_world(&self) -> Point {
		self.viewport.screen_to_world(self.cursor_x, self.cursor_y)
	}

	/// Nodes and edges that move with `node` while it is dragged.
	pub fn dependents(&self, node: usize) -> Dependents {
		let edges = self.graph.incident_edges(node);
		let nodes = self
			.graph
			.nodes
			.iter()
			.enumerate()
			.filter(|&(i, n)| i == node || edges.iter().any(|&e| n.touches(&self.graph.edges[e])))
			.map(|(i, _)| i)
			.collect();
		Dependents { nodes, edges }
	}

	/// Whether `id` is the externally highlighted node.
	pub fn is_highlighted(&self, id: &str) -> bool {
		self.highlighted.as_deref() == Some(id)
	}

	/// Emphasise a node from outside the canvas; `None` clears it.
	pub fn set_highlighted(&mut self, id: Option<String>) -> Vec<Action> {
		self.highlighted = id;
		vec![Action::RenderNeeded]
	}

	// --- Pointer protocol ---

	/// Start a node drag over a node, otherwise a pan.
	pub fn on_pointer_down(&mut self, x: f64, y: f64, time_ms: f64) -> Vec<Action> {
		self.cursor_x = x;
		self.cursor_y = y;
		self.start = PointerStart { x, y, time_ms };

		self.interaction = match self.node_at_position(x, y) {
			Some(node) => InteractionState::DraggingNode {
				node,
				origin: self.graph.nodes[node].center(),
				dependents: self.dependents(node),
			},
			None => InteractionState::Panning {
				origin_x: self.viewport.shift_x,
				origin_y: self.viewport.shift_y,
			},
		};
		vec![Action::RenderNeeded]
	}

	/// Drag the node or pan the view. Moves while idle only track the cursor.
	pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Vec<Action> {
		self.cursor_x = x;
		self.cursor_y = y;
		let (dx, dy) = (
			(x - self.start.x) * self.viewport.dpr,
			(y - self.start.y) * self.viewport.dpr,
		);

		match &self.interaction {
			InteractionState::Idle => {}
			InteractionState::Panning { origin_x, origin_y } => {
				self.viewport.shift_x = origin_x + dx;
				self.viewport.shift_y = origin_y + dy;
			}
			InteractionState::DraggingNode {
				node,
				origin,
				dependents,
			} => {
				let scale = self.viewport.scale;
				let dragged = &mut self.graph.nodes[*node];
				dragged.x = origin.x + dx / scale;
				dragged.y = origin.y + dy / scale;
				clip::clip_subset(
					&mut self.graph,
					self.config.object_width,
					&dependents.nodes,
					&dependents.edges,
				);
			}
		}
		vec![Action::RenderNeeded]
	}

	/// Finish a drag or pan. A short, still press counts as a click: it
	/// selects the node under the pointer (the background clears the
	/// selection), or toggles its checked flag when a modifier is held.
	pub fn on_pointer_up(&mut self, x: f64, y: f64, time_ms: f64, modifiers: Modifiers) -> Vec<Action> {
		self.cursor_x = x;
		self.cursor_y = y;
		let interaction = std::mem::take(&mut self.interaction);
		let mut actions = Vec::new();

		if interaction != InteractionState::Idle && self.is_click(x, y, time_ms) {
			if let InteractionState::DraggingNode {
				node,
				origin,
				dependents,
			} = &interaction
			{
				self.restore(*node, *origin, dependents);
			}
			actions.push(self.click(x, y, modifiers));
		}

		actions.push(Action::RenderNeeded);
		actions
	}

	/// The pointer left the canvas: drop the gesture, keep any dragged position.
	pub fn on_pointer_leave(&mut self) -> Vec<Action> {
		self.interaction = InteractionState::Idle;
		vec![Action::RenderNeeded]
	}

	/// Zoom one notch around the pointer.
	pub fn on_wheel(&mut self, x: f64, y: f64, delta_y: f64) -> Vec<Action> {
		self.cursor_x = x;
		self.cursor_y = y;
		self.viewport.zoom_wheel(x, y, delta_y);
		vec![Action::RenderNeeded]
	}

	/// Apply a selection action to the graph.
	pub fn apply(&mut self, action: &Action) {
		match action {
			Action::SelectNode(id) => {
				self.graph.select(id.as_deref());
			}
			Action::CheckNode(id) => {
				self.graph.toggle_checked(id);
			}
			Action::RenderNeeded => {}
		}
	}

	fn is_click(&self, x: f64, y: f64, time_ms: f64) -> bool {
		let dpr = self.viewport.dpr;
		((x - self.start.x) * dpr).abs() <= CLICK_SLOP_PX
			&& ((y - self.start.y) * dpr).abs() <= CLICK_SLOP_PX
			&& time_ms - self.start.time_ms <= CLICK_MAX_MS
	}

	fn click(&self, x: f64, y: f64, modifiers: Modifiers) -> Action {
		let Some(node) = self.node_at_position(x, y) else {
			return Action::SelectNode(None);
		};
		let id = self.graph.nodes[node].id.clone();
		debug!("Clicked node {id}");
		if modifiers.is_multiple() {
			Action::CheckNode(id)
		} else {
			Action::SelectNode(Some(id))
		}
	}

	/// Undo sub-threshold jitter so a click never moves the node.
	fn restore(&mut self, node: usize, origin: Point, dependents: &Dependents) {
		if self.graph.nodes[node].center() == origin {
			return;
		}
		let dragged = &mut self.graph.nodes[node];
		dragged.x = origin.x;
		dragged.y = origin.y;
		clip::clip_subset(
			&mut self.graph,
			self.config.object_width,
			&dependents.nodes,
			&dependents.edges,
		);
	}
}
