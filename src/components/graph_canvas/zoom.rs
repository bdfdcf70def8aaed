//! Mouse wheel zoom with a configurable step.
//!
//! Each wheel tick animates the camera by a fixed ratio around the cursor.
//! A tick in the same direction as an animation that started less than a
//! fifth of the duration ago is dropped so fast scrolling does not stack
//! animations.

use thiserror::Error;

use super::camera::Camera;
use crate::config::WheelZoomConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ZoomError {
	#[error("wheel event has neither deltaY nor detail")]
	NoDelta,
}

/// The parts of a wheel event the handler reads. `x`/`y` are relative to
/// the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelInput {
	pub delta_y: Option<f64>,
	/// Legacy `DOMMouseScroll` line count.
	pub detail: Option<f64>,
	pub x: f64,
	pub y: f64,
}

impl WheelInput {
	/// Builds the input from a browser event. Events that only report a
	/// line count in `detail` (and a zero `deltaY`) use the legacy path.
	pub fn from_event(delta_y: f64, detail: i32, x: f64, y: f64) -> Self {
		let (delta_y, detail) = if delta_y == 0.0 && detail != 0 {
			(None, Some(detail as f64))
		} else {
			(Some(delta_y), None)
		};
		Self {
			delta_y,
			detail,
			x,
			y,
		}
	}
}

/// Normalized wheel delta, positive when scrolling up.
pub fn wheel_delta(input: &WheelInput) -> Result<f64, ZoomError> {
	if let Some(delta_y) = input.delta_y {
		return Ok(delta_y * -3.0 / 360.0);
	}
	if let Some(detail) = input.detail {
		return Ok(detail / -9.0);
	}
	Err(ZoomError::NoDelta)
}

#[derive(Clone, Debug)]
pub struct WheelZoom {
	ratio: f64,
	duration: f64,
	/// Sign of the running zoom animation, `0` when idle.
	direction: i8,
	last_trigger: Option<f64>,
}

impl WheelZoom {
	pub fn new(config: &WheelZoomConfig) -> Self {
		Self {
			ratio: config.ratio,
			duration: config.duration_ms,
			direction: 0,
			last_trigger: None,
		}
	}

	pub fn direction(&self) -> i8 {
		self.direction
	}

	/// Handles one wheel event at time `now` (ms). Returns whether a zoom
	/// animation was started.
	pub fn on_wheel(
		&mut self,
		camera: &mut Camera,
		input: &WheelInput,
		now: f64,
	) -> Result<bool, ZoomError> {
		let delta = wheel_delta(input)?;
		if delta == 0.0 {
			return Ok(false);
		}

		let direction: i8 = if delta > 0.0 { 1 } else { -1 };
		if self.direction == direction
			&& self
				.last_trigger
				.is_some_and(|last| now - last < self.duration / 5.0)
		{
			return Ok(false);
		}

		let step = if delta > 0.0 {
			1.0 / self.ratio
		} else {
			self.ratio
		};
		let target = camera.zoomed_around(input.x, input.y, camera.state().ratio * step);
		if target.ratio == camera.state().ratio {
			return Ok(false);
		}

		camera.animate(target, now, self.duration);
		self.direction = direction;
		self.last_trigger = Some(now);
		Ok(true)
	}

	/// Advances the camera. Resets the direction once the zoom animation
	/// has finished.
	pub fn on_frame(&mut self, camera: &mut Camera, now: f64) {
		if camera.step(now) {
			self.direction = 0;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_canvas::camera::MAX_RATIO;

	fn scroll(delta_y: f64) -> WheelInput {
		WheelInput {
			delta_y: Some(delta_y),
			detail: None,
			x: 400.0,
			y: 300.0,
		}
	}

	fn zoom() -> WheelZoom {
		WheelZoom::new(&WheelZoomConfig::default())
	}

	#[test]
	fn deltas_are_normalized() {
		assert_eq!(wheel_delta(&scroll(-120.0)), Ok(1.0));
		let legacy = WheelInput {
			detail: Some(-9.0),
			..WheelInput::default()
		};
		assert_eq!(wheel_delta(&legacy), Ok(1.0));
		assert_eq!(wheel_delta(&WheelInput::default()), Err(ZoomError::NoDelta));
	}

	#[test]
	fn scrolling_up_zooms_in_by_the_configured_ratio() {
		let mut camera = Camera::new(800.0, 600.0);
		let mut zoom = zoom();
		assert_eq!(zoom.on_wheel(&mut camera, &scroll(-120.0), 0.0), Ok(true));
		zoom.on_frame(&mut camera, 250.0);
		assert!((camera.state().ratio - 0.8).abs() < 1e-9);
		assert_eq!(zoom.direction(), 0);
	}

	#[test]
	fn rapid_ticks_in_the_same_direction_are_dropped() {
		let mut camera = Camera::new(800.0, 600.0);
		let mut zoom = zoom();
		assert_eq!(zoom.on_wheel(&mut camera, &scroll(-120.0), 0.0), Ok(true));
		assert_eq!(zoom.on_wheel(&mut camera, &scroll(-120.0), 20.0), Ok(false));
		// opposite direction is never debounced
		assert_eq!(zoom.on_wheel(&mut camera, &scroll(120.0), 30.0), Ok(true));
		// 50ms is a fifth of the default duration
		assert_eq!(zoom.on_wheel(&mut camera, &scroll(120.0), 90.0), Ok(true));
	}

	#[test]
	fn zoom_is_anchored_at_the_cursor() {
		let mut camera = Camera::new(800.0, 600.0);
		let mut zoom = zoom();
		let input = WheelInput {
			x: 700.0,
			y: 100.0,
			..scroll(-120.0)
		};
		let before = camera.screen_to_graph(700.0, 100.0);
		zoom.on_wheel(&mut camera, &input, 0.0).unwrap();
		zoom.on_frame(&mut camera, 1000.0);
		let after = camera.screen_to_graph(700.0, 100.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn zooming_past_the_bounds_does_nothing() {
		let mut camera = Camera::new(800.0, 600.0);
		camera.set_state(crate::components::graph_canvas::camera::CameraState {
			ratio: MAX_RATIO,
			..camera.state()
		});
		let mut zoom = zoom();
		assert_eq!(zoom.on_wheel(&mut camera, &scroll(120.0), 0.0), Ok(false));
	}

	#[test]
	fn line_count_events_use_detail() {
		let legacy = WheelInput::from_event(0.0, 3, 10.0, 20.0);
		assert_eq!(legacy.delta_y, None);
		assert_eq!(wheel_delta(&legacy), Ok(3.0 / -9.0));

		let modern = WheelInput::from_event(-120.0, 0, 10.0, 20.0);
		assert_eq!(modern.detail, None);
		assert_eq!(wheel_delta(&modern), Ok(1.0));
	}
}
