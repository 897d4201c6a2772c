//! Per-frame motion models.

use rand::RngCore;
use serde::Deserialize;

use super::particles::{Particle, Phase};
use super::random::noise;
use super::types::Size;

/// How particles move toward (or around) their targets.
///
/// A field picks one model for its lifetime.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionModel {
	/// Cover a fixed fraction of the remaining distance every frame.
	Easing { factor: f64 },
	/// Accelerate toward the target, then damp.
	///
	/// With `normalize` the pull is the unit direction times `stiffness`;
	/// otherwise it is the raw offset times `stiffness`. Fading particles stop
	/// being pulled and are slowed by `settle_drag` instead.
	Spring {
		stiffness: f64,
		damping_x: f64,
		damping_y: f64,
		jitter: f64,
		normalize: bool,
		settle_drag: f64,
	},
	/// Keep moving along the current velocity, ignoring the target.
	Drift { damping: f64, wrap: bool },
}

impl Default for MotionModel {
	fn default() -> Self {
		MotionModel::Easing { factor: 0.08 }
	}
}

impl MotionModel {
	/// Advance one particle by one frame.
	pub fn step(&self, p: &mut Particle, bounds: Size, rng: &mut dyn RngCore) {
		match *self {
			MotionModel::Easing { factor } => {
				p.vx = (p.target_x - p.x) * factor;
				p.vy = (p.target_y - p.y) * factor;
				p.x += p.vx;
				p.y += p.vy;
			}
			MotionModel::Spring {
				stiffness,
				damping_x,
				damping_y,
				jitter,
				normalize,
				settle_drag,
			} => {
				if p.phase == Phase::Fading {
					p.vx *= settle_drag;
					p.vy *= settle_drag;
				} else {
					let dx = p.target_x - p.x;
					let dy = p.target_y - p.y;
					let dist = dx.hypot(dy);
					if normalize {
						if dist > 0.0 {
							p.vx += dx / dist * stiffness;
							p.vy += dy / dist * stiffness;
						}
					} else {
						p.vx += dx * stiffness;
						p.vy += dy * stiffness;
					}
					p.vx *= damping_x;
					p.vy *= damping_y;
				}
				if jitter > 0.0 {
					p.vx += noise(rng, jitter);
					p.vy += noise(rng, jitter);
				}
				p.x += p.vx;
				p.y += p.vy;
			}
			MotionModel::Drift { damping, wrap } => {
				p.x += p.vx;
				p.y += p.vy;
				p.vx *= damping;
				p.vy *= damping;
				if wrap {
					p.x = wrap_around(p.x, bounds.width);
					p.y = wrap_around(p.y, bounds.height);
				}
			}
		}
	}
}

/// Particles leaving one side re-enter from the opposite side.
fn wrap_around(v: f64, extent: f64) -> f64 {
	if v > extent {
		0.0
	} else if v < 0.0 {
		extent
	} else {
		v
	}
}
