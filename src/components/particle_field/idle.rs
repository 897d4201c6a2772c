//! Idle animation layered on top of the physics position.
//!
//! Offsets are a pure function of the field clock, the particle index and its
//! target, so they never feed back into the simulation.

use std::ops::Range;

use serde::Deserialize;

use super::types::Point;

/// Small periodic motion added on top of a settled particle's position.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdleMotion {
	/// Breathe in and out around the surface center by `amount` of the radius.
	Pulse {
		speed: f64,
		phase_step: f64,
		amount: f64,
		#[serde(default)]
		horizontal_only: bool,
	},
	/// Vertical sine wave, `amplitude` in reference pixels.
	Bob {
		speed: f64,
		phase_step: f64,
		amplitude: f64,
	},
	/// Elliptic rocking, sine on x and cosine on y.
	Sway {
		speed: f64,
		phase_step: f64,
		amplitude_x: f64,
		amplitude_y: f64,
	},
	/// Rotate the target around the surface center at `speed` rad/s.
	Rotate { speed: f64 },
	/// Upward hops of at most `height` reference pixels.
	Bounce {
		speed: f64,
		phase_step: f64,
		height: f64,
	},
}

/// Per-frame inputs shared by every offset computation.
#[derive(Clone, Copy, Debug)]
pub struct IdleFrame {
	/// Field clock in seconds.
	pub time: f64,
	/// Middle of the surface, the pivot for pulsing and rotation.
	pub center: Point,
	/// Pixel scale for reference-pixel amplitudes.
	pub scale: f64,
}

impl IdleMotion {
	/// Displacement of the particle at `index` whose target is `target`.
	///
	/// The offset is added to the physics position when drawing and never fed
	/// back into the simulation.
	pub fn offset(&self, frame: &IdleFrame, index: usize, target: Point) -> Point {
		let i = index as f64;
		let t = frame.time;
		let from_center = Point::new(target.x - frame.center.x, target.y - frame.center.y);
		match *self {
			IdleMotion::Pulse {
				speed,
				phase_step,
				amount,
				horizontal_only,
			} => {
				let s = (t * speed + i * phase_step).sin() * amount;
				let y = if horizontal_only { 0.0 } else { from_center.y * s };
				Point::new(from_center.x * s, y)
			}
			IdleMotion::Bob {
				speed,
				phase_step,
				amplitude,
			} => Point::new(0.0, (t * speed + i * phase_step).sin() * amplitude * frame.scale),
			IdleMotion::Sway {
				speed,
				phase_step,
				amplitude_x,
				amplitude_y,
			} => {
				let phase = t * speed + i * phase_step;
				Point::new(
					phase.sin() * amplitude_x * frame.scale,
					phase.cos() * amplitude_y * frame.scale,
				)
			}
			IdleMotion::Rotate { speed } => {
				let radius = from_center.x.hypot(from_center.y);
				let angle = from_center.y.atan2(from_center.x) + t * speed;
				Point::new(
					angle.cos() * radius - from_center.x,
					angle.sin() * radius - from_center.y,
				)
			}
			IdleMotion::Bounce {
				speed,
				phase_step,
				height,
			} => Point::new(
				0.0,
				-(t * speed + i * phase_step).sin().abs() * height * frame.scale,
			),
		}
	}
}

/// One idle motion, optionally restricted to an index range.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IdleLayer {
	pub motion: IdleMotion,
	#[serde(default)]
	pub from: usize,
	#[serde(default)]
	pub to: Option<usize>,
}

impl IdleLayer {
	/// Layer applying `motion` to every particle.
	pub fn new(motion: IdleMotion) -> Self {
		Self {
			motion,
			from: 0,
			to: None,
		}
	}

	/// Restrict the layer to particles whose index lies in `range`.
	///
	/// ```
	/// use particle_morph::components::particle_field::idle::{IdleLayer, IdleMotion};
	///
	/// let bob = IdleMotion::Bob { speed: 2.0, phase_step: 0.1, amplitude: 3.0 };
	/// let layer = IdleLayer::new(bob).only(0..11);
	/// assert_eq!((layer.from, layer.to), (0, Some(11)));
	/// ```
	pub fn only(mut self, range: Range<usize>) -> Self {
		self.from = range.start;
		self.to = Some(range.end);
		self
	}

	fn applies(&self, index: usize) -> bool {
		index >= self.from && self.to.is_none_or(|to| index < to)
	}
}

/// Sum of every layer applying to `index`.
pub fn idle_offset(layers: &[IdleLayer], frame: &IdleFrame, index: usize, target: Point) -> Point {
	layers
		.iter()
		.filter(|layer| layer.applies(index))
		.fold(Point::default(), |acc, layer| {
			let o = layer.motion.offset(frame, index, target);
			Point::new(acc.x + o.x, acc.y + o.y)
		})
}
