#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
	(a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
	approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn viewport(scale: f64, shift_x: f64, shift_y: f64, dpr: f64) -> Viewport {
	Viewport {
		scale,
		shift_x,
		shift_y,
		dpr,
	}
}

// --- Construction ---

#[test]
fn default_is_identity() {
	let v = Viewport::default();
	assert_eq!(v.screen_to_world(12.0, 34.0), Point::new(12.0, 34.0));
}

#[test]
fn new_clamps_pixel_ratio() {
	assert_eq!(Viewport::new(0.5).dpr, 1.0);
	assert_eq!(Viewport::new(f64::NAN).dpr, 1.0);
	assert_eq!(Viewport::new(2.0).dpr, 2.0);
}

// --- Coordinate mapping ---

#[test]
fn screen_to_world_applies_shift_scale_and_dpr() {
	let v = viewport(2.0, 100.0, 50.0, 2.0);
	assert_eq!(v.screen_to_world(60.0, 40.0), Point::new(10.0, 15.0));
}

#[test]
fn world_to_screen_inverts_screen_to_world() {
	let v = viewport(1.7, -33.0, 12.5, 2.0);
	let (px, py) = v.world_to_screen(v.screen_to_world(321.0, 123.0));
	assert!(approx_eq(px, 321.0));
	assert!(approx_eq(py, 123.0));
}

// --- Zoom ---

#[test]
fn zoom_keeps_point_under_cursor() {
	let mut v = viewport(1.5, 30.0, 40.0, 2.0);
	let before = v.screen_to_world(100.0, 50.0);
	let applied = v.zoom_at(100.0, 50.0, 1.3);
	assert!(approx_eq(applied, 1.3));
	assert!(approx_eq(v.scale, 1.95));
	assert!(point_approx_eq(v.screen_to_world(100.0, 50.0), before));
}

#[test]
fn zoom_clamps_and_stays_anchored() {
	let mut v = viewport(9.5, 10.0, 20.0, 1.0);
	let before = v.screen_to_world(200.0, 100.0);
	let applied = v.zoom_at(200.0, 100.0, 1.1);
	assert_eq!(v.scale, MAX_SCALE);
	assert!(approx_eq(applied, 10.0 / 9.5));
	assert!(point_approx_eq(v.screen_to_world(200.0, 100.0), before));

	let mut v = viewport(0.11, 0.0, 0.0, 1.0);
	v.zoom_at(0.0, 0.0, 0.5);
	assert_eq!(v.scale, MIN_SCALE);
}

#[test]
fn zoom_ignores_degenerate_factors() {
	let mut v = viewport(2.0, 5.0, 6.0, 1.0);
	for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
		assert_eq!(v.zoom_at(10.0, 10.0, factor), 1.0);
	}
	assert_eq!(v, viewport(2.0, 5.0, 6.0, 1.0));
}

#[test]
fn wheel_direction() {
	let mut v = Viewport::default();
	v.zoom_wheel(0.0, 0.0, -120.0);
	assert!(approx_eq(v.scale, WHEEL_ZOOM_STEP));
	v.zoom_wheel(0.0, 0.0, 120.0);
	v.zoom_wheel(0.0, 0.0, 120.0);
	assert!(approx_eq(v.scale, 1.0 / WHEEL_ZOOM_STEP));
}

// --- Pan / fit ---

#[test]
fn pan_moves_shift() {
	let mut v = viewport(3.0, 1.0, 2.0, 1.0);
	v.pan(10.0, -5.0);
	assert_eq!((v.shift_x, v.shift_y), (11.0, -3.0));
	assert_eq!(v.scale, 3.0);
}

#[test]
fn fit_uses_tighter_axis() {
	let mut v = Viewport::default();
	v.fit(1000.0, 500.0, 480.0, 600.0);
	assert!(approx_eq(v.scale, 0.75));
	assert!(approx_eq(v.shift_x, 500.0 - 480.0 * 0.75 / 2.0));
	assert_eq!(v.shift_y, 250.0);
}

#[test]
fn fit_degenerate_graphs() {
	let mut v = Viewport::default();
	v.fit(800.0, 600.0, 0.0, 0.0);
	assert_eq!(v.scale, MAX_SCALE);
	assert_eq!((v.shift_x, v.shift_y), (400.0, 300.0));

	v.fit(0.0, 0.0, 0.0, 0.0);
	assert_eq!(v.scale, 1.0);
}
