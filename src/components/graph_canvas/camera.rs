//! Graph-space camera with eased animations.
//!
//! `x`/`y` is the graph point shown at the centre of the viewport and
//! `ratio` the number of graph units per pixel, so a larger ratio shows more
//! of the graph.

pub const MIN_RATIO: f64 = 0.05;
pub const MAX_RATIO: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
	pub x: f64,
	pub y: f64,
	pub ratio: f64,
}

impl Default for CameraState {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			ratio: 1.0,
		}
	}
}

pub fn quadratic_out(t: f64) -> f64 {
	t * (2.0 - t)
}

#[derive(Clone, Copy, Debug)]
struct Animation {
	from: CameraState,
	to: CameraState,
	start: f64,
	duration: f64,
}

#[derive(Clone, Debug)]
pub struct Camera {
	state: CameraState,
	animation: Option<Animation>,
	pub width: f64,
	pub height: f64,
}

impl Camera {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			state: CameraState::default(),
			animation: None,
			width,
			height,
		}
	}

	pub fn state(&self) -> CameraState {
		self.state
	}

	/// Jumps to `state`, cancelling any running animation.
	pub fn set_state(&mut self, state: CameraState) {
		self.animation = None;
		self.state = CameraState {
			ratio: bounded_ratio(state.ratio),
			..state
		};
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		let s = self.state;
		(
			(gx - s.x) / s.ratio + self.width / 2.0,
			(gy - s.y) / s.ratio + self.height / 2.0,
		)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		let s = self.state;
		(
			(sx - self.width / 2.0) * s.ratio + s.x,
			(sy - self.height / 2.0) * s.ratio + s.y,
		)
	}

	/// State at `ratio` that keeps the graph point under `(sx, sy)` fixed.
	pub fn zoomed_around(&self, sx: f64, sy: f64, ratio: f64) -> CameraState {
		let ratio = bounded_ratio(ratio);
		let (gx, gy) = self.screen_to_graph(sx, sy);
		CameraState {
			x: gx - (sx - self.width / 2.0) * ratio,
			y: gy - (sy - self.height / 2.0) * ratio,
			ratio,
		}
	}

	/// Moves the camera by a screen-space offset.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.animation = None;
		self.state.x -= dx * self.state.ratio;
		self.state.y -= dy * self.state.ratio;
	}

	pub fn animate(&mut self, to: CameraState, now: f64, duration: f64) {
		self.animation = Some(Animation {
			from: self.state,
			to: CameraState {
				ratio: bounded_ratio(to.ratio),
				..to
			},
			start: now,
			duration,
		});
	}

	pub fn is_animating(&self) -> bool {
		self.animation.is_some()
	}

	/// Advances the running animation to `now`. Returns `true` on the step
	/// that completes it.
	pub fn step(&mut self, now: f64) -> bool {
		let Some(anim) = self.animation else {
			return false;
		};
		let t = if anim.duration <= 0.0 {
			1.0
		} else {
			((now - anim.start) / anim.duration).clamp(0.0, 1.0)
		};
		if t >= 1.0 {
			self.state = anim.to;
			self.animation = None;
			return true;
		}
		let k = quadratic_out(t);
		self.state = CameraState {
			x: anim.from.x + (anim.to.x - anim.from.x) * k,
			y: anim.from.y + (anim.to.y - anim.from.y) * k,
			ratio: anim.from.ratio + (anim.to.ratio - anim.from.ratio) * k,
		};
		false
	}

	/// Centres the graph-space box `(min_x, min_y)..(max_x, max_y)` with
	/// `padding` pixels on every side.
	pub fn fit(&mut self, min: (f64, f64), max: (f64, f64), padding: f64) {
		let usable_w = (self.width - 2.0 * padding).max(1.0);
		let usable_h = (self.height - 2.0 * padding).max(1.0);
		let ratio = ((max.0 - min.0) / usable_w).max((max.1 - min.1) / usable_h);
		self.set_state(CameraState {
			x: (min.0 + max.0) / 2.0,
			y: (min.1 + max.1) / 2.0,
			ratio: if ratio > 0.0 { ratio } else { 1.0 },
		});
	}
}

pub fn bounded_ratio(ratio: f64) -> f64 {
	ratio.clamp(MIN_RATIO, MAX_RATIO)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn screen_and_graph_coordinates_invert() {
		let mut camera = Camera::new(800.0, 600.0);
		camera.set_state(CameraState {
			x: 120.0,
			y: -40.0,
			ratio: 2.5,
		});
		let (sx, sy) = camera.graph_to_screen(10.0, 20.0);
		let (gx, gy) = camera.screen_to_graph(sx, sy);
		assert!(close(gx, 10.0) && close(gy, 20.0));
	}

	#[test]
	fn zooming_keeps_the_cursor_point_fixed() {
		let mut camera = Camera::new(800.0, 600.0);
		let before = camera.screen_to_graph(600.0, 150.0);
		let zoomed = camera.zoomed_around(600.0, 150.0, 0.5);
		camera.set_state(zoomed);
		let after = camera.screen_to_graph(600.0, 150.0);
		assert!(close(before.0, after.0) && close(before.1, after.1));
	}

	#[test]
	fn animation_eases_and_finishes() {
		let mut camera = Camera::new(800.0, 600.0);
		camera.animate(
			CameraState {
				x: 100.0,
				y: 0.0,
				ratio: 1.0,
			},
			0.0,
			250.0,
		);
		assert!(!camera.step(125.0));
		// quadratic out is at 0.75 halfway through
		assert!(close(camera.state().x, 75.0));
		assert!(camera.step(250.0));
		assert!(!camera.is_animating());
		assert!(close(camera.state().x, 100.0));
	}

	#[test]
	fn ratio_is_bounded() {
		let camera = Camera::new(800.0, 600.0);
		assert_eq!(camera.zoomed_around(0.0, 0.0, 1e-6).ratio, MIN_RATIO);
		assert_eq!(camera.zoomed_around(0.0, 0.0, 1e6).ratio, MAX_RATIO);
	}

	#[test]
	fn fit_centres_the_bounds() {
		let mut camera = Camera::new(400.0, 400.0);
		camera.fit((0.0, 0.0), (1000.0, 500.0), 50.0);
		let state = camera.state();
		assert!(close(state.x, 500.0) && close(state.y, 250.0));
		assert!(close(state.ratio, 1000.0 / 300.0));
	}
}
