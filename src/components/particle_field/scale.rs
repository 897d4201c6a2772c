//! Surface-size-dependent scaling for particle field visuals.
//!
//! Every field declares a reference size. The scale factor of a surface is
//! `min(width, height) / reference_size`, so geometry authored for a 300 px
//! square keeps its proportions on any canvas.
//!
//! # Scaling Behaviors
//!
//! Visual quantities do not all follow the factor the same way:
//!
//! - [`ScaleBehavior::Proportional`]: multiplied by the factor. Pattern-driven
//!   fields use this so a shape looks identical at every size.
//! - [`ScaleBehavior::Fixed`]: constant pixel value. Free-flowing backdrops use
//!   this so density stays readable on large screens.
//! - [`ScaleBehavior::Clamped`]: proportional, clamped to pixel bounds.

use serde::Deserialize;

use super::types::Size;

/// Defines how a visual quantity reacts to the surface scale factor.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScaleBehavior {
	/// Multiplied by the scale factor.
	Proportional,
	/// Constant number of pixels.
	Fixed,
	/// Multiplied by the scale factor, then clamped to `[min, max]` pixels.
	Clamped { min: f64, max: f64 },
}

impl ScaleBehavior {
	/// Compute the pixel value for a base value at the given scale factor.
	pub fn apply(&self, base: f64, factor: f64) -> f64 {
		match self {
			ScaleBehavior::Proportional => base * factor,
			ScaleBehavior::Fixed => base,
			ScaleBehavior::Clamped { min, max } => {
				let scaled = base * factor;
				if min > max {
					return scaled;
				}
				scaled.clamp(*min, *max)
			}
		}
	}
}

/// Scaling configuration of one field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
	/// Side length, in pixels, at which the scale factor is 1.
	pub reference_size: f64,
	/// How particle radii and line widths follow the factor.
	pub size: ScaleBehavior,
	/// How distances (convergence epsilon, edge thresholds) follow the factor.
	pub distance: ScaleBehavior,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			reference_size: 300.0,
			size: ScaleBehavior::Proportional,
			distance: ScaleBehavior::Proportional,
		}
	}
}

impl ScaleConfig {
	/// A configuration where nothing follows the surface size.
	pub fn fixed() -> Self {
		Self {
			reference_size: 300.0,
			size: ScaleBehavior::Fixed,
			distance: ScaleBehavior::Fixed,
		}
	}
}

/// Scale factor of a surface relative to `reference_size`.
///
/// Surfaces without area, or a degenerate reference, report 1.0 so callers
/// never divide by zero.
pub fn scale_factor(size: Size, reference_size: f64) -> f64 {
	if !size.has_area() || reference_size.is_nan() || reference_size <= 0.0 {
		return 1.0;
	}
	size.min_side() / reference_size
}

/// Pre-computed scale values for a specific surface size.
///
/// Recomputed on every resize and shared by the physics and the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledValues {
	/// Raw scale factor of the surface.
	pub factor: f64,
	size_factor: f64,
	distance_factor: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, size: Size) -> Self {
		let factor = scale_factor(size, config.reference_size);
		Self {
			factor,
			size_factor: config.size.apply(1.0, factor),
			distance_factor: config.distance.apply(1.0, factor),
		}
	}

	/// Radius or line width in pixels.
	pub fn size(&self, base: f64) -> f64 {
		base * self.size_factor
	}

	/// Distance threshold in pixels.
	pub fn distance(&self, base: f64) -> f64 {
		base * self.distance_factor
	}

	/// Factor applied to distances; used to scale edge thresholds.
	pub fn distance_factor(&self) -> f64 {
		self.distance_factor
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn factor_uses_the_shorter_side() {
		assert_eq!(scale_factor(Size::new(600.0, 300.0), 300.0), 1.0);
		assert_eq!(scale_factor(Size::new(600.0, 900.0), 300.0), 2.0);
		assert_eq!(scale_factor(Size::new(60.0, 60.0), 120.0), 0.5);
	}

	#[test]
	fn degenerate_inputs_fall_back_to_unit_scale() {
		assert_eq!(scale_factor(Size::new(0.0, 300.0), 300.0), 1.0);
		assert_eq!(scale_factor(Size::new(300.0, 300.0), 0.0), 1.0);
		assert_eq!(scale_factor(Size::new(f64::NAN, 300.0), 300.0), 1.0);
		assert_eq!(scale_factor(Size::new(300.0, 300.0), f64::NAN), 1.0);
		assert_eq!(scale_factor(Size::new(300.0, 300.0), -10.0), 1.0);
	}

	#[test]
	fn behaviors_apply_the_factor_differently() {
		assert_eq!(ScaleBehavior::Proportional.apply(4.0, 2.0), 8.0);
		assert_eq!(ScaleBehavior::Fixed.apply(4.0, 2.0), 4.0);
		let clamped = ScaleBehavior::Clamped { min: 2.0, max: 6.0 };
		assert_eq!(clamped.apply(4.0, 2.0), 6.0);
		assert_eq!(clamped.apply(4.0, 0.25), 2.0);
	}

	#[test]
	fn scaled_values_follow_the_config() {
		let config = ScaleConfig {
			distance: ScaleBehavior::Fixed,
			..ScaleConfig::default()
		};
		let scaled = ScaledValues::new(&config, Size::new(600.0, 600.0));
		assert_eq!(scaled.factor, 2.0);
		assert_eq!(scaled.size(4.0), 8.0);
		assert_eq!(scaled.distance(50.0), 50.0);
	}
}
