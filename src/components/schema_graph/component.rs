use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent, Window,
};

use super::config::{LayoutConfig, StyleTable};
use super::render;
use super::state::{Action, Modifiers, SchemaGraphState};
use super::types::Graph;

/// Live canvas: engine state plus the context it draws into.
struct CanvasSession {
	state: SchemaGraphState,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSession {
	fn redraw(&self) {
		render::render(&self.state, &self.ctx);
	}

	/// Apply selection changes, notify the host and redraw once if asked to.
	fn dispatch(
		&mut self,
		actions: Vec<Action>,
		on_select: Option<Callback<Option<String>>>,
		on_check: Option<Callback<String>>,
	) {
		let mut render_needed = false;
		for action in actions {
			self.state.apply(&action);
			match action {
				Action::RenderNeeded => render_needed = true,
				Action::SelectNode(id) => {
					render_needed = true;
					if let Some(cb) = on_select {
						cb.run(id);
					}
				}
				Action::CheckNode(id) => {
					render_needed = true;
					if let Some(cb) = on_check {
						cb.run(id);
					}
				}
			}
		}
		if render_needed {
			self.redraw();
		}
	}
}

type Session = Rc<RefCell<Option<CanvasSession>>>;

fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, client_x: i32, client_y: i32) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		f64::from(client_x) - rect.left(),
		f64::from(client_y) - rect.top(),
	))
}

fn touch_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &TouchEvent) -> Option<(f64, f64)> {
	let touch = ev.changed_touches().get(0)?;
	local_position(canvas_ref, touch.client_x(), touch.client_y())
}

fn canvas_size(window: &Window, canvas: &HtmlCanvasElement, fullscreen: bool, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	if fullscreen {
		return (
			window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
			window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
		);
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

/// Size the backing store in device pixels and the element in CSS pixels.
fn apply_canvas_size(canvas: &HtmlCanvasElement, css_w: f64, css_h: f64, dpr: f64) -> (f64, f64) {
	let (w, h) = ((css_w * dpr).floor(), (css_h * dpr).floor());
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	let style = web_sys::HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{css_w}px"));
	let _ = style.set_property("height", &format!("{css_h}px"));
	(w, h)
}

/// Interactive schema diagram. Drag nodes to move them, drag the background
/// to pan, scroll to zoom, click to select (ctrl/shift-click to check).
#[component]
pub fn SchemaGraphCanvas(
	#[prop(into)] graph: Signal<Graph>,
	#[prop(optional)] config: LayoutConfig,
	styles: StyleTable,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(into, optional)] highlighted: MaybeProp<String>,
	#[prop(optional)] on_select: Option<Callback<Option<String>>>,
	#[prop(optional)] on_check: Option<Callback<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session: Session = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (session_init, resize_cb_init) = (session.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let graph = graph.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let mut slot = session_init.borrow_mut();
		if let Some(ref mut s) = *slot {
			s.state.set_graph(graph);
			s.redraw();
			return;
		}

		let Some(window) = web_sys::window() else {
			return;
		};
		let dpr = window.device_pixel_ratio().max(1.0);
		let (css_w, css_h) = canvas_size(&window, &canvas, fullscreen, width, height);
		let (w, h) = apply_canvas_size(&canvas, css_w, css_h, dpr);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				error!("Canvas 2d context unavailable");
				return;
			}
		};

		let mut state = SchemaGraphState::new(config.clone(), styles.clone(), w, h, dpr);
		state.highlighted = highlighted.get_untracked();
		state.set_graph(graph);
		let s = CanvasSession { state, ctx };
		s.redraw();
		*slot = Some(s);

		if fullscreen {
			let (session_resize, canvas_resize) = (session_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (css_w, css_h) = canvas_size(&win, &canvas_resize, true, None, None);
				if let Some(ref mut s) = *session_resize.borrow_mut() {
					let (w, h) = apply_canvas_size(&canvas_resize, css_w, css_h, s.state.viewport.dpr);
					s.state.resize(w, h);
					s.redraw();
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	let session_hl = session.clone();
	Effect::new(move |_| {
		let id = highlighted.get();
		if let Some(ref mut s) = *session_hl.borrow_mut() {
			let actions = s.state.set_highlighted(id);
			s.dispatch(actions, on_select, on_check);
		}
	});

	let pointer_down = {
		let session = session.clone();
		move |x: f64, y: f64| {
			if let Some(ref mut s) = *session.borrow_mut() {
				let actions = s.state.on_pointer_down(x, y, js_sys::Date::now());
				s.dispatch(actions, on_select, on_check);
			}
		}
	};
	let pointer_move = {
		let session = session.clone();
		move |x: f64, y: f64| {
			if let Some(ref mut s) = *session.borrow_mut() {
				let actions = s.state.on_pointer_move(x, y);
				s.dispatch(actions, on_select, on_check);
			}
		}
	};
	let pointer_up = {
		let session = session.clone();
		move |x: f64, y: f64, modifiers: Modifiers| {
			if let Some(ref mut s) = *session.borrow_mut() {
				let actions = s.state.on_pointer_up(x, y, js_sys::Date::now(), modifiers);
				s.dispatch(actions, on_select, on_check);
			}
		}
	};

	let on_mousedown = {
		let pointer_down = pointer_down.clone();
		move |ev: MouseEvent| {
			if let Some((x, y)) = local_position(canvas_ref, ev.client_x(), ev.client_y()) {
				pointer_down(x, y);
			}
		}
	};
	let on_mousemove = {
		let pointer_move = pointer_move.clone();
		move |ev: MouseEvent| {
			ev.prevent_default();
			if let Some((x, y)) = local_position(canvas_ref, ev.client_x(), ev.client_y()) {
				pointer_move(x, y);
			}
		}
	};
	let on_mouseup = {
		let pointer_up = pointer_up.clone();
		move |ev: MouseEvent| {
			let modifiers = Modifiers {
				ctrl: ev.ctrl_key(),
				shift: ev.shift_key(),
			};
			if let Some((x, y)) = local_position(canvas_ref, ev.client_x(), ev.client_y()) {
				pointer_up(x, y, modifiers);
			}
		}
	};
	let on_touchstart = move |ev: TouchEvent| {
		// Suppress the emulated mouse events that would replay this gesture.
		ev.prevent_default();
		if let Some((x, y)) = touch_position(canvas_ref, &ev) {
			pointer_down(x, y);
		}
	};
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		if let Some((x, y)) = touch_position(canvas_ref, &ev) {
			pointer_move(x, y);
		}
	};
	let on_touchend = move |ev: TouchEvent| {
		let modifiers = Modifiers {
			ctrl: ev.ctrl_key(),
			shift: ev.shift_key(),
		};
		if let Some((x, y)) = touch_position(canvas_ref, &ev) {
			pointer_up(x, y, modifiers);
		}
	};

	let session_ml = session.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *session_ml.borrow_mut() {
			let actions = s.state.on_pointer_leave();
			s.dispatch(actions, on_select, on_check);
		}
	};

	let session_wh = session.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		if let Some(ref mut s) = *session_wh.borrow_mut() {
			let actions = s.state.on_wheel(x, y, ev.delta_y());
			s.dispatch(actions, on_select, on_check);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="schema-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
