//! Random draws shared by the shape builders, emitters and physics.

use rand::{Rng, RngCore};

/// Uniform in `[0, 1)`.
pub(crate) fn unit(rng: &mut dyn RngCore) -> f64 {
	rng.r#gen::<f64>()
}

/// Uniform in `[lo, hi)`.
pub(crate) fn between(rng: &mut dyn RngCore, lo: f64, hi: f64) -> f64 {
	lo + unit(rng) * (hi - lo)
}

/// Uniform noise in `[-spread / 2, spread / 2)`.
pub(crate) fn noise(rng: &mut dyn RngCore, spread: f64) -> f64 {
	(unit(rng) - 0.5) * spread
}
