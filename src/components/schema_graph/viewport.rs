//! Pan and zoom: mapping between world units and canvas pixels.

use super::types::Point;

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

/// Zoom limits.
pub const MIN_SCALE: f64 = 0.1;
/// See [`MIN_SCALE`].
pub const MAX_SCALE: f64 = 10.0;
/// Zoom factor of one wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;
/// Share of the canvas the graph occupies after fitting.
pub const FIT_MARGIN: f64 = 0.9;

/// Pan/zoom state mapping world space onto the canvas backing store.
///
/// `shift_x` / `shift_y` are in device pixels, pointer positions are in CSS
/// pixels and get multiplied by `dpr` on the way in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// World units to device pixels.
	pub scale: f64,
	/// Device-pixel offset of the world origin.
	pub shift_x: f64,
	/// See `shift_x`.
	pub shift_y: f64,
	/// Device pixel ratio, at least 1.
	pub dpr: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			scale: 1.0,
			shift_x: 0.0,
			shift_y: 0.0,
			dpr: 1.0,
		}
	}
}

impl Viewport {
	/// Identity view for the given device pixel ratio.
	pub fn new(dpr: f64) -> Self {
		Self {
			dpr: if dpr.is_finite() { dpr.max(1.0) } else { 1.0 },
			..Self::default()
		}
	}

	/// World point under a CSS-pixel position.
	#[must_use]
	pub fn screen_to_world(&self, px: f64, py: f64) -> Point {
		Point::new(
			(px * self.dpr - self.shift_x) / self.scale,
			(py * self.dpr - self.shift_y) / self.scale,
		)
	}

	/// CSS-pixel position of a world point.
	#[must_use]
	pub fn world_to_screen(&self, p: Point) -> (f64, f64) {
		(
			(p.x * self.scale + self.shift_x) / self.dpr,
			(p.y * self.scale + self.shift_y) / self.dpr,
		)
	}

	/// Scale by `factor` keeping the world point under the cursor in place.
	///
	/// The scale is clamped to [`MIN_SCALE`, `MAX_SCALE`]; the shift uses the
	/// factor actually applied. Returns that factor.
	pub fn zoom_at(&mut self, px: f64, py: f64, factor: f64) -> f64 {
		if !factor.is_finite() || factor <= 0.0 {
			return 1.0;
		}
		let scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
		let applied = scale / self.scale;
		let (cx, cy) = (px * self.dpr, py * self.dpr);
		self.shift_x = cx - (cx - self.shift_x) * applied;
		self.shift_y = cy - (cy - self.shift_y) * applied;
		self.scale = scale;
		applied
	}

	/// One wheel notch: up zooms in, down zooms out.
	pub fn zoom_wheel(&mut self, px: f64, py: f64, delta_y: f64) -> f64 {
		let factor = if delta_y < 0.0 {
			WHEEL_ZOOM_STEP
		} else {
			1.0 / WHEEL_ZOOM_STEP
		};
		self.zoom_at(px, py, factor)
	}

	/// Shift by a device-pixel delta.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.shift_x += dx;
		self.shift_y += dy;
	}

	/// Fit a `graph_w` × `graph_h` graph into a canvas of device-pixel size
	/// `canvas_w` × `canvas_h`: centred horizontally, origin at mid-height.
	pub fn fit(&mut self, canvas_w: f64, canvas_h: f64, graph_w: f64, graph_h: f64) {
		let scale = (FIT_MARGIN * canvas_w / graph_w).min(FIT_MARGIN * canvas_h / graph_h);
		self.scale = if scale.is_nan() {
			1.0
		} else {
			scale.clamp(MIN_SCALE, MAX_SCALE)
		};
		self.shift_x = canvas_w / 2.0 - graph_w * self.scale / 2.0;
		self.shift_y = canvas_h / 2.0;
	}
}
