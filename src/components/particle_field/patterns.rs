//! Named target-shape generators.
//!
//! A pattern is a pure function of the surface size, a requested count and an
//! anchor policy that returns an ordered list of target positions. Patterns are
//! looked up by key in a [`PatternRegistry`], so new shapes can be added
//! without touching the animation driver.
//!
//! Some shapes ignore the requested count; [`PatternRegistry::documented_count`]
//! reports how many positions a pattern produces. A few shapes inject
//! randomness (wave noise, constellation scatter) and produce a visually
//! different but topologically similar result on every call.

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use rand::RngCore;
use serde::Deserialize;

use super::random::{noise, unit};
use super::scale::scale_factor;
use super::types::{Point, Size, Target};

/// Pattern used when a key is not registered.
pub const DEFAULT_PATTERN: &str = "concentric_rings";

/// Default margin, in reference pixels, kept free along every edge.
pub const DEFAULT_MARGIN: f64 = 25.0;

/// Anchor position expressed as fractions of the surface width and height.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Anchor {
	/// Horizontal position; values past 1.0 lie beyond the right edge.
	pub x: f64,
	/// Vertical position, 0.0 at the top.
	pub y: f64,
}

impl Anchor {
	/// Middle of the surface.
	pub const CENTER: Anchor = Anchor { x: 0.5, y: 0.5 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Where a pattern is anchored, with a narrow-surface override.
///
/// Surfaces narrower than `breakpoint` use the `mobile` anchor. This is a
/// presentation choice made by the caller; the generator never inspects global
/// state to decide it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnchorPolicy {
	/// Anchor for surfaces at least `breakpoint` wide.
	pub desktop: Anchor,
	/// Anchor for narrower surfaces.
	pub mobile: Anchor,
	/// Width in pixels separating the two.
	pub breakpoint: f64,
}

impl Default for AnchorPolicy {
	fn default() -> Self {
		Self::centered()
	}
}

impl AnchorPolicy {
	/// Centered on every surface, with the usual 768 px breakpoint.
	pub fn centered() -> Self {
		Self {
			desktop: Anchor::CENTER,
			mobile: Anchor::CENTER,
			breakpoint: 768.0,
		}
	}

	/// Off-center anchor leaving room for text on the left, centered and
	/// slightly lowered on narrow screens.
	pub fn beside_text() -> Self {
		Self {
			desktop: Anchor::new(0.7, 0.5),
			mobile: Anchor::new(0.5, 0.55),
			breakpoint: 768.0,
		}
	}

	pub fn is_mobile(&self, width: f64) -> bool {
		width < self.breakpoint
	}

	/// Anchor in pixels for the given surface.
	pub fn resolve(&self, size: Size) -> Point {
		let anchor = if self.is_mobile(size.width) {
			self.mobile
		} else {
			self.desktop
		};
		Point::new(size.width * anchor.x, size.height * anchor.y)
	}
}

/// Inputs to a pattern lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternRequest {
	pub size: Size,
	/// Requested number of positions; fixed-count shapes ignore it.
	pub count: usize,
	pub anchor: AnchorPolicy,
	/// Edge margin in reference pixels, scaled like the shape itself.
	pub margin: f64,
	/// Extra size multiplier for the shape; the margin ignores it.
	pub zoom: f64,
}

impl PatternRequest {
	/// Centered request with the default margin and no zoom.
	pub fn new(width: f64, height: f64, count: usize) -> Self {
		Self {
			size: Size::new(width, height),
			count,
			anchor: AnchorPolicy::centered(),
			margin: DEFAULT_MARGIN,
			zoom: 1.0,
		}
	}

	pub fn with_anchor(mut self, anchor: AnchorPolicy) -> Self {
		self.anchor = anchor;
		self
	}

	pub fn with_margin(mut self, margin: f64) -> Self {
		self.margin = margin;
		self
	}

	/// Grow or shrink the shape around its anchor.
	pub fn with_zoom(mut self, zoom: f64) -> Self {
		self.zoom = zoom;
		self
	}
}

/// Resolved inputs handed to a shape builder.
#[derive(Clone, Debug)]
pub struct ShapeFrame {
	pub size: Size,
	/// Number of positions the builder must produce.
	pub count: usize,
	/// Count the caller asked for, before the pattern's count rule.
	pub requested: usize,
	pub scale: f64,
	pub anchor: Point,
}

impl ShapeFrame {
	fn at_polar(&self, angle: f64, radius: f64) -> Target {
		Target::at(
			self.anchor.x + angle.cos() * radius,
			self.anchor.y + angle.sin() * radius,
		)
	}
}

/// Builds the raw (unclamped) targets of a shape.
pub type BuildFn = fn(&ShapeFrame, &mut dyn RngCore) -> Vec<Target>;

/// How many positions a pattern produces for a requested count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CountRule {
	/// Exactly the requested count.
	Requested,
	/// A shape-defined count; the request is ignored.
	Fixed(usize),
	/// Two series, each keeping `floor(requested * keep)` positions.
	Paired { keep: f64 },
}

impl CountRule {
	pub fn resolve(self, requested: usize) -> usize {
		match self {
			CountRule::Requested => requested,
			CountRule::Fixed(n) => n,
			CountRule::Paired { keep } => 2 * (requested as f64 * keep).floor() as usize,
		}
	}
}

/// A registered pattern.
#[derive(Clone, Copy)]
pub struct PatternEntry {
	/// Side length at which the shape's scale factor is 1.
	pub reference_size: f64,
	pub count: CountRule,
	pub build: BuildFn,
}

impl PatternEntry {
	pub fn new(reference_size: f64, count: CountRule, build: BuildFn) -> Self {
		Self {
			reference_size,
			count,
			build,
		}
	}

	/// A shape producing exactly the requested number of positions.
	pub fn flexible(reference_size: f64, build: BuildFn) -> Self {
		Self::new(reference_size, CountRule::Requested, build)
	}
}

/// Map from pattern key to generator.
pub struct PatternRegistry {
	entries: HashMap<&'static str, PatternEntry>,
	default: &'static str,
}

impl Default for PatternRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}

impl PatternRegistry {
	/// An empty registry falling back to `default` once it is registered.
	pub fn empty(default: &'static str) -> Self {
		Self {
			entries: HashMap::new(),
			default,
		}
	}

	/// Registry holding every shape used by the site.
	pub fn builtin() -> Self {
		const HERO: f64 = 300.0;
		const ICON: f64 = 120.0;

		let mut registry = Self::empty(DEFAULT_PATTERN);
		registry.register("concentric_rings", PatternEntry::flexible(HERO, concentric_rings));
		registry.register("golden_spiral", PatternEntry::flexible(HERO, golden_spiral));
		registry.register("wave", PatternEntry::flexible(HERO, wave));
		registry.register(
			"cube_projection",
			PatternEntry::new(HERO, CountRule::Fixed(CUBE_SIDE.pow(3)), cube_projection),
		);
		registry.register("constellation", PatternEntry::flexible(HERO, constellation));
		registry.register("hexagon", PatternEntry::flexible(HERO, hexagon));
		registry.register("scatter", PatternEntry::flexible(HERO, scatter));
		registry.register(
			"uplift_series",
			PatternEntry::new(HERO, CountRule::Paired { keep: SERIES_TRIM }, uplift_series),
		);

		let icons: [(&'static str, usize, BuildFn); 12] = [
			("magnifying_glass", 25, magnifying_glass),
			("balance_scale", 35, balance_scale),
			("ascending_line", 12, ascending_line),
			("magnifying_data", 30, magnifying_data),
			("network_nodes", 35, network_nodes),
			("value_growth", 36, value_growth),
			("arrow_up", 30, arrow_up),
			("target_circles", 28, target_circles),
			("gear_teeth", 32, gear_teeth),
			("bar_chart", 24, bar_chart),
			("circular_arrow", 26, circular_arrow),
			("impact_curve", 60, impact_curve),
		];
		for (name, count, build) in icons {
			registry.register(name, PatternEntry::new(ICON, CountRule::Fixed(count), build));
		}
		registry
	}

	pub fn register(&mut self, name: &'static str, entry: PatternEntry) {
		self.entries.insert(name, entry);
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Registered keys in alphabetical order.
	pub fn names(&self) -> Vec<&'static str> {
		let mut names: Vec<_> = self.entries.keys().copied().collect();
		names.sort_unstable();
		names
	}

	/// Look up a pattern, falling back to the default for unknown keys.
	pub fn resolve(&self, name: &str) -> Option<(&'static str, &PatternEntry)> {
		self.entries
			.get_key_value(name)
			.or_else(|| self.entries.get_key_value(self.default))
			.map(|(key, entry)| (*key, entry))
	}

	/// Pattern used for unknown keys.
	pub fn default_name(&self) -> &'static str {
		self.default
	}

	/// Number of positions `name` produces for a requested count.
	pub fn documented_count(&self, name: &str, requested: usize) -> usize {
		self.resolve(name)
			.map(|(_, entry)| entry.count.resolve(requested))
			.unwrap_or(0)
	}

	/// Generate targets, clamped into the request's margins.
	///
	/// Surfaces without area produce no targets.
	pub fn generate_targets(
		&self,
		name: &str,
		request: &PatternRequest,
		rng: &mut dyn RngCore,
	) -> Vec<Target> {
		let size = request.size;
		if !size.has_area() {
			return Vec::new();
		}
		let Some((_, entry)) = self.resolve(name) else {
			return Vec::new();
		};

		let scale = scale_factor(size, entry.reference_size);
		let frame = ShapeFrame {
			size,
			count: entry.count.resolve(request.count),
			requested: request.count,
			scale: scale * request.zoom,
			anchor: request.anchor.resolve(size),
		};

		let mut targets = (entry.build)(&frame, rng);
		targets.truncate(frame.count);

		let margin = request.margin.max(0.0) * scale;
		for t in &mut targets {
			t.x = clamp_into(t.x, margin, size.width - margin);
			t.y = clamp_into(t.y, margin, size.height - margin);
		}
		targets
	}

	/// Generate plain positions.
	pub fn generate(
		&self,
		name: &str,
		request: &PatternRequest,
		rng: &mut dyn RngCore,
	) -> Vec<Point> {
		self.generate_targets(name, request, rng)
			.iter()
			.map(Target::point)
			.collect()
	}
}

/// Clamp into `[lo, hi]`; collapses to the midpoint when the range is empty
/// or the value is not finite.
fn clamp_into(v: f64, lo: f64, hi: f64) -> f64 {
	if lo > hi || !v.is_finite() {
		return (lo + hi) / 2.0;
	}
	v.clamp(lo, hi)
}

// ---- hero shapes -----------------------------------------------------------

const RING_COUNT: f64 = 3.0;
const CUBE_SIDE: usize = 3;
const CLUSTER_COUNT: usize = 5;

fn concentric_rings(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	let per_ring = f.count as f64 / RING_COUNT;
	(0..f.count)
		.map(|i| {
			let i = i as f64;
			let ring = (i / per_ring).floor();
			let angle = ((i % per_ring) / per_ring) * TAU;
			f.at_polar(angle, (12.0 + ring * 6.0) * f.scale)
		})
		.collect()
}

fn golden_spiral(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	(0..f.count)
		.map(|i| {
			let i = i as f64;
			let radius = 1.618_f64.powf(i * 0.1) * 12.5 * f.scale;
			f.at_polar(i * 0.618 * PI, radius)
		})
		.collect()
}

fn wave(f: &ShapeFrame, rng: &mut dyn RngCore) -> Vec<Target> {
	// Half the width, narrowed so a tenth of the width stays free on the right.
	let half_band = (f.size.width * 0.25)
		.min(f.size.width * 0.9 - f.anchor.x)
		.max(0.0);
	let min_x = f.anchor.x - half_band;
	let n = f.count as f64;
	(0..f.count)
		.map(|i| {
			let t = i as f64 / n;
			let x = min_x + t * half_band * 2.0 + noise(rng, 60.0 * f.scale);
			let y = f.anchor.y + (t * 4.0 * PI).sin() * 40.0 * f.scale + noise(rng, 60.0 * f.scale);
			Target::at(x, y)
		})
		.collect()
}

fn cube_projection(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	const DEPTH_X: f64 = 0.7;
	const DEPTH_Y: f64 = 0.45;

	let spacing = 40.0 * f.scale;
	let offset = (CUBE_SIDE - 1) as f64 * spacing * 0.5;
	let mut targets = Vec::with_capacity(CUBE_SIDE.pow(3));
	for xi in 0..CUBE_SIDE {
		for yi in 0..CUBE_SIDE {
			for zi in 0..CUBE_SIDE {
				let x3 = xi as f64 * spacing - offset;
				let y3 = yi as f64 * spacing - offset;
				let z3 = zi as f64 * spacing - offset;
				targets.push(Target::at(
					f.anchor.x + x3 - z3 * DEPTH_X,
					f.anchor.y + y3 - z3 * DEPTH_Y,
				));
			}
		}
	}
	targets
}

fn constellation(f: &ShapeFrame, rng: &mut dyn RngCore) -> Vec<Target> {
	let cluster_radius = 37.5 * f.scale;
	(0..f.count)
		.map(|i| {
			let cluster = (i % CLUSTER_COUNT) as f64;
			let center = f.at_polar(cluster / CLUSTER_COUNT as f64 * TAU, cluster_radius);
			let star_angle = unit(rng) * TAU;
			let star_distance = unit(rng) * 40.0 * f.scale + 10.0 * f.scale;
			Target::at(
				center.x + star_angle.cos() * star_distance,
				center.y + star_angle.sin() * star_distance,
			)
		})
		.collect()
}

fn hexagon(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	(0..f.count)
		.map(|i| {
			let layer = (((12 * i + 9) as f64).sqrt() - 3.0) / 6.0;
			let layer = layer.floor().max(0.0);
			let pos_in_layer = i as f64 - 3.0 * layer * (layer + 1.0);
			let angle = pos_in_layer / (6.0 * layer).max(1.0) * TAU;
			f.at_polar(angle, (layer * 20.0 + 25.0) * f.scale)
		})
		.collect()
}

fn scatter(f: &ShapeFrame, rng: &mut dyn RngCore) -> Vec<Target> {
	(0..f.count)
		.map(|_| Target::at(unit(rng) * f.size.width, unit(rng) * f.size.height))
		.collect()
}

/// Share of the generated curve that is kept; the tail is trimmed off.
const SERIES_TRIM: f64 = 0.9;

/// A noisy baseline (group 0) followed by an uplifted copy of it (group 1).
fn uplift_series(f: &ShapeFrame, rng: &mut dyn RngCore) -> Vec<Target> {
	const CURVATURE: f64 = 0.000_002;
	const UPLIFT_START: f64 = -10.0;
	const UPLIFT_END: f64 = -120.0;

	let (w, h) = (f.size.width, f.size.height);
	let usable = w - w * 0.08;
	let step_sigma = h * 0.04;
	let slope = -(CURVATURE * usable * usable) / 4.0;
	let n = f.requested;
	let kept = (n as f64 * SERIES_TRIM).floor() as usize;
	let last = n.saturating_sub(1).max(1) as f64;

	let mut walk = 0.0;
	let mut base = Vec::with_capacity(kept);
	for i in 0..n {
		let t = i as f64 / last;
		let x = t * usable;
		let y = h * 0.6 + slope * (x - usable / 2.0);
		let fade = (t * PI).sin();
		let local = (1.0 + (t * PI * 4.0).sin() * 2.0 + (t * PI * 8.0).sin()) * fade;
		walk += noise(rng, step_sigma) * local;
		if i < kept {
			let y = (y + walk + h * 0.1).clamp(h * 0.1, h * 0.9);
			base.push(Target::at(x, y).in_group(0));
		}
	}

	let kept_last = kept.saturating_sub(1).max(1) as f64;
	let uplifted: Vec<Target> = base
		.iter()
		.enumerate()
		.map(|(i, p)| {
			let t = i as f64 / kept_last;
			let uplift = UPLIFT_START + (UPLIFT_END - UPLIFT_START) * t;
			Target::at(p.x, (p.y + uplift).clamp(h * 0.1, h * 0.85)).in_group(1)
		})
		.collect();

	base.extend(uplifted);
	base
}

// ---- icon shapes -------------------------------------------------------------
//
// Index ranges map to sub-shapes; sizes are in reference pixels.

const ICON_ALPHA: f64 = 0.8;

fn icon(x: f64, y: f64, size: f64) -> Target {
	Target::at(x, y).sized(size).faded(ICON_ALPHA)
}

fn ring_point(f: &ShapeFrame, angle: f64, radius: f64, size: f64) -> Target {
	let p = f.at_polar(angle, radius * f.scale);
	icon(p.x, p.y, size)
}

fn handle_point(f: &ShapeFrame, progress: f64, size: f64) -> Target {
	let d = 18.0 * f.scale + progress * 20.0 * f.scale;
	icon(f.anchor.x + d, f.anchor.y + d, size)
}

fn magnifying_glass(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	(0..f.count)
		.map(|i| match i {
			0..18 => ring_point(f, i as f64 / 18.0 * TAU, 25.0, 2.0),
			_ => handle_point(f, (i - 18) as f64 / 7.0, 1.5),
		})
		.collect()
}

fn magnifying_data(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	(0..f.count)
		.map(|i| match i {
			0..18 => ring_point(f, i as f64 / 18.0 * TAU, 25.0, 2.0),
			18..24 => ring_point(f, (i - 18) as f64 / 6.0 * TAU, 15.0, 1.5).faded(0.9),
			_ => handle_point(f, (i - 24) as f64 / 6.0, 1.8),
		})
		.collect()
}

fn network_nodes(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	(0..f.count)
		.map(|i| match i {
			0..8 => ring_point(f, i as f64 / 8.0 * TAU, 8.0, 2.5),
			8..20 => ring_point(f, (i - 8) as f64 / 12.0 * TAU, 20.0, 2.0),
			_ => ring_point(f, (i - 20) as f64 / 15.0 * TAU, 32.0, 1.8),
		})
		.collect()
}

fn bars(
	f: &ShapeFrame,
	per_bar: usize,
	spacing: f64,
	base: f64,
	span: f64,
	heights: &[f64],
) -> Vec<Target> {
	let bar_count = heights.len() as f64;
	let spacing = spacing * f.scale;
	(0..f.count)
		.map(|i| {
			let bar = i / per_bar;
			let pos = (i % per_bar) as f64 / (per_bar - 1) as f64;
			let height = heights[bar % heights.len()];
			let x = f.anchor.x - bar_count * spacing / 2.0 + bar as f64 * spacing;
			let y = f.anchor.y + base * f.scale - pos * height * span * f.scale;
			icon(x, y, 2.0)
		})
		.collect()
}

fn value_growth(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	bars(f, 6, 10.0, 25.0, 50.0, &[0.2, 0.4, 0.3, 0.6, 0.5, 0.8])
}

fn bar_chart(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	bars(f, 4, 12.0, 20.0, 40.0, &[0.3, 0.7, 0.5, 0.9, 0.6, 0.8])
}

fn arrow_up(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	let (cx, cy, s) = (f.anchor.x, f.anchor.y, f.scale);
	(0..f.count)
		.map(|i| match i {
			0..15 => icon(cx, cy + 20.0 * s - i as f64 / 14.0 * 40.0 * s, 1.5),
			15..23 => {
				let p = (i - 15) as f64 / 7.0;
				icon(cx - p * 15.0 * s, cy - 20.0 * s + p * 10.0 * s, 2.5)
			}
			_ => {
				let p = (i - 23) as f64 / 7.0;
				icon(cx + p * 15.0 * s, cy - 20.0 * s + p * 10.0 * s, 2.5)
			}
		})
		.collect()
}

fn target_circles(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	(0..f.count)
		.map(|i| {
			let ring = (i / 7) as f64;
			let angle = (i % 7) as f64 / 7.0 * TAU;
			ring_point(f, angle, (ring + 1.0) * 12.0, 4.0 - ring)
		})
		.collect()
}

fn gear_teeth(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	(0..f.count)
		.map(|i| match i {
			0..20 => {
				let tooth = i % 2 == 0;
				let (radius, size) = if tooth { (30.0, 2.5) } else { (25.0, 1.5) };
				ring_point(f, i as f64 / 20.0 * TAU, radius, size)
			}
			_ => ring_point(f, (i - 20) as f64 / 12.0 * TAU, 15.0, 1.8),
		})
		.collect()
}

fn circular_arrow(f: &ShapeFrame, _rng: &mut dyn RngCore) -> Vec<Target> {
	const SWEEP: f64 = PI * 1.8;
	(0..f.count)
		.map(|i| match i {
			0..20 => ring_point(f, i as f64 / 20.0 * SWEEP, 25.0, 2.0),
			_ => {
				let head = (i - 20) as f64 / 6.0;
				ring_point(f, SWEEP + head * 0.5, 25.0 - head * 8.0, 2.5)
			}
		})
		.collect()
}

/// Icon-pixel jitter of the small chart icons.
const ICON_NOISE: f64 = 7.5;

/// Arched beam (0..11) over a left (11..23) and a right (23..35) pan.
fn balance_scale(f: &ShapeFrame, rng: &mut dyn RngCore) -> Vec<Target> {
	let (cx, cy, s) = (f.anchor.x, f.anchor.y, f.scale);
	(0..f.count)
		.map(|i| {
			let (x, y) = match i {
				0..11 => {
					let angle = PI + i as f64 / 10.5 * PI;
					(cx + angle.cos() * 24.0 * s, cy + angle.sin() * 24.0 * 0.4 * s)
				}
				11..23 => (cx - 24.0 * s + (i - 11) as f64 / 12.0 * 24.0 * s, cy + 36.0 * s),
				_ => (cx + 24.0 * s + (i - 23) as f64 / 12.0 * 24.0 * s, cy + 36.0 * s),
			};
			icon(x + noise(rng, ICON_NOISE * s), y + noise(rng, ICON_NOISE * s), 2.0)
		})
		.collect()
}

/// Diagonal rising line, every third point stepped up.
fn ascending_line(f: &ShapeFrame, rng: &mut dyn RngCore) -> Vec<Target> {
	const SIDE: f64 = 120.0;
	const STEP: f64 = 11.25;
	let (cx, cy, s) = (f.anchor.x, f.anchor.y, f.scale);
	let last = f.count.saturating_sub(1).max(1) as f64;
	(0..f.count)
		.map(|i| {
			let p = i as f64 / last;
			let step = if i % 3 == 0 { STEP * s } else { 0.0 };
			let x = cx + (p - 0.5) * SIDE * s + noise(rng, ICON_NOISE * s);
			let y = cy + (0.5 - p) * SIDE * s - step + noise(rng, ICON_NOISE * s);
			icon(x, y, 2.0)
		})
		.collect()
}

/// Exponential growth curve (0..40) over an x axis (40..50) and a y axis (50..60).
fn impact_curve(f: &ShapeFrame, rng: &mut dyn RngCore) -> Vec<Target> {
	const EXP_BASE: f64 = 5.0;
	const CURVE: usize = 40;
	const AXIS: usize = 10;

	let (cx, cy, s) = (f.anchor.x, f.anchor.y, f.scale);
	let side = 120.0 * s;
	let left = cx - side / 3.0;
	let bottom = cy + side / 3.0;

	let mut targets = Vec::with_capacity(CURVE + 2 * AXIS);
	for j in 0..CURVE {
		let p = j as f64 / (CURVE - 1) as f64;
		let rise = (EXP_BASE.powf(p) - 1.0) / (EXP_BASE - 1.0);
		let y = bottom - rise * side * 0.7 + noise(rng, 15.0 * s);
		targets.push(icon(left + p * side * 0.6, y, 2.0).faded(0.9));
	}
	for j in 0..AXIS {
		let p = j as f64 / (AXIS - 1) as f64;
		targets.push(icon(left + p * side * 0.6, bottom, 1.5).faded(0.7));
	}
	for j in 0..AXIS {
		let p = j as f64 / (AXIS - 1) as f64;
		targets.push(icon(left, bottom - p * side * 0.7, 1.5).faded(0.7));
	}
	targets
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn rng() -> SmallRng {
		SmallRng::seed_from_u64(42)
	}

	#[test]
	fn every_pattern_stays_inside_the_margins() {
		let registry = PatternRegistry::builtin();
		let mut rng = rng();
		for (w, h) in [(300.0, 300.0), (1280.0, 720.0), (120.0, 120.0), (90.0, 400.0)] {
			for name in registry.names() {
				let request = PatternRequest::new(w, h, 40).with_anchor(AnchorPolicy::beside_text());
				let targets = registry.generate_targets(name, &request, &mut rng);
				assert_eq!(
					targets.len(),
					registry.documented_count(name, 40),
					"{name} at {w}x{h}"
				);
				let scale = scale_factor(request.size, registry.entries[name].reference_size);
				let margin = DEFAULT_MARGIN * scale;
				for t in &targets {
					assert!(t.point().is_finite(), "{name} produced {t:?}");
					if 2.0 * margin <= w && 2.0 * margin <= h {
						assert!(t.x >= margin - 1e-9 && t.x <= w - margin + 1e-9, "{name} x={}", t.x);
						assert!(t.y >= margin - 1e-9 && t.y <= h - margin + 1e-9, "{name} y={}", t.y);
					}
				}
			}
		}
	}

	#[test]
	fn documented_counts() {
		let registry = PatternRegistry::builtin();
		assert!(registry.contains("balance_scale") && registry.contains("ascending_line"));
		assert_eq!(registry.documented_count("golden_spiral", 40), 40);
		assert_eq!(registry.documented_count("cube_projection", 40), 27);
		assert_eq!(registry.documented_count("magnifying_glass", 5), 25);
		assert_eq!(registry.documented_count("impact_curve", 40), 60);
		assert_eq!(registry.documented_count("uplift_series", 120), 216);
		assert_eq!(registry.documented_count("balance_scale", 40), 35);
		assert_eq!(registry.documented_count("ascending_line", 40), 12);
	}

	#[test]
	fn zero_area_produces_nothing() {
		let registry = PatternRegistry::builtin();
		let mut rng = rng();
		for name in registry.names() {
			assert!(registry.generate(name, &PatternRequest::new(0.0, 300.0, 40), &mut rng).is_empty());
			assert!(registry.generate(name, &PatternRequest::new(300.0, 0.0, 40), &mut rng).is_empty());
		}
	}

	#[test]
	fn cube_projection_is_idempotent() {
		let registry = PatternRegistry::builtin();
		let request = PatternRequest::new(800.0, 600.0, 40);
		let a = registry.generate("cube_projection", &request, &mut SmallRng::seed_from_u64(1));
		let b = registry.generate("cube_projection", &request, &mut SmallRng::seed_from_u64(2));
		assert_eq!(a, b);
	}

	#[test]
	fn unknown_keys_fall_back_to_the_default() {
		let registry = PatternRegistry::builtin();
		let request = PatternRequest::new(300.0, 300.0, 40);
		let fallback = registry.generate("no_such_shape", &request, &mut rng());
		let rings = registry.generate(DEFAULT_PATTERN, &request, &mut rng());
		assert_eq!(fallback, rings);

		let (name, _) = registry.resolve("no_such_shape").unwrap();
		assert_eq!(name, registry.default_name());
		assert_eq!(registry.documented_count("no_such_shape", 40), 40);
	}

	#[test]
	fn empty_registry_yields_nothing() {
		let registry = PatternRegistry::empty("missing");
		let request = PatternRequest::new(300.0, 300.0, 40);
		assert!(registry.generate("anything", &request, &mut rng()).is_empty());
		assert_eq!(registry.documented_count("anything", 40), 0);
	}

	#[test]
	fn concentric_rings_use_three_radii() {
		let registry = PatternRegistry::builtin();
		let request = PatternRequest::new(300.0, 300.0, 39);
		let points = registry.generate("concentric_rings", &request, &mut rng());
		let anchor = Point::new(150.0, 150.0);
		for (i, p) in points.iter().enumerate() {
			let expected = 12.0 + (i / 13) as f64 * 6.0;
			assert!((p.distance(anchor) - expected).abs() < 1e-9, "point {i}");
		}
	}

	#[test]
	fn zoom_scales_the_shape_but_not_the_margin() {
		let registry = PatternRegistry::builtin();
		let request = PatternRequest::new(300.0, 300.0, 39).with_zoom(1.3);
		let points = registry.generate("concentric_rings", &request, &mut rng());
		let anchor = Point::new(150.0, 150.0);
		for (i, p) in points.iter().enumerate() {
			let expected = (12.0 + (i / 13) as f64 * 6.0) * 1.3;
			assert!((p.distance(anchor) - expected).abs() < 1e-9, "point {i}");
		}

		// A zoomed margin (20 px) would clamp the outer ring; the plain one (5 px) does not.
		let request = PatternRequest::new(60.0, 60.0, 39).with_zoom(4.0);
		let points = registry.generate("concentric_rings", &request, &mut rng());
		let anchor = Point::new(30.0, 30.0);
		for (i, p) in points.iter().enumerate() {
			let expected = (12.0 + (i / 13) as f64 * 6.0) * 0.2 * 4.0;
			assert!((p.distance(anchor) - expected).abs() < 1e-9, "point {i}");
		}
	}

	#[test]
	fn desktop_wave_keeps_clear_of_the_right_edge() {
		let registry = PatternRegistry::builtin();
		let anchor = AnchorPolicy {
			desktop: Anchor::new(0.675, 0.5),
			..AnchorPolicy::beside_text()
		};
		let request = PatternRequest::new(2000.0, 300.0, 40).with_anchor(anchor);
		for seed in 0..8 {
			let points = registry.generate("wave", &request, &mut SmallRng::seed_from_u64(seed));
			assert!((870.0..=930.0).contains(&points[0].x), "{}", points[0].x);
			assert!(points[39].x <= 1807.5 + 1e-9, "{}", points[39].x);
		}
	}

	#[test]
	fn magnifying_glass_keeps_its_index_ranges() {
		let registry = PatternRegistry::builtin();
		let request = PatternRequest::new(120.0, 120.0, 0).with_margin(0.0);
		let targets = registry.generate_targets("magnifying_glass", &request, &mut rng());
		let center = Point::new(60.0, 60.0);
		for t in &targets[..18] {
			assert!((t.point().distance(center) - 25.0).abs() < 1e-9);
			assert_eq!(t.size, 2.0);
		}
		for (k, t) in targets[18..].iter().enumerate() {
			let d = 18.0 + k as f64 / 7.0 * 20.0;
			assert!((t.x - (60.0 + d)).abs() < 1e-9 && (t.y - (60.0 + d)).abs() < 1e-9);
			assert_eq!(t.size, 1.5);
		}
	}

	#[test]
	fn balance_scale_hangs_two_pans_under_its_beam() {
		let registry = PatternRegistry::builtin();
		let request = PatternRequest::new(120.0, 120.0, 0).with_margin(0.0);
		let targets = registry.generate_targets("balance_scale", &request, &mut rng());
		let jitter = ICON_NOISE / 2.0;
		assert!(targets[..11].iter().all(|t| t.y <= 60.0 + jitter));
		for pan in [&targets[11..23], &targets[23..]] {
			assert_eq!(pan.len(), 12);
			assert!(pan.iter().all(|t| (t.y - 96.0).abs() <= jitter));
		}
		assert!(targets[11..23].iter().all(|t| t.x < 60.0 + jitter));
		assert!(targets[23..].iter().all(|t| t.x > 84.0 - jitter));
	}

	#[test]
	fn ascending_line_rises_left_to_right() {
		let registry = PatternRegistry::builtin();
		let request = PatternRequest::new(120.0, 120.0, 0).with_margin(0.0);
		let targets = registry.generate_targets("ascending_line", &request, &mut rng());
		assert_eq!(targets.len(), 12);
		let (first, last) = (targets[0], targets[11]);
		assert!(first.x < last.x);
		assert!(first.y > last.y);
	}

	#[test]
	fn target_circles_shrink_outwards() {
		let registry = PatternRegistry::builtin();
		let request = PatternRequest::new(120.0, 120.0, 0).with_margin(0.0);
		let targets = registry.generate_targets("target_circles", &request, &mut rng());
		let sizes: Vec<f64> = targets.iter().step_by(7).map(|t| t.size).collect();
		assert_eq!(sizes, vec![4.0, 3.0, 2.0, 1.0]);
	}

	#[test]
	fn uplift_series_is_split_into_two_groups() {
		let registry = PatternRegistry::builtin();
		let request = PatternRequest::new(800.0, 400.0, 120).with_margin(0.0);
		let targets = registry.generate_targets("uplift_series", &request, &mut rng());
		let (base, uplift) = targets.split_at(108);
		assert!(base.iter().all(|t| t.group == Some(0)));
		assert!(uplift.iter().all(|t| t.group == Some(1)));
		for (b, u) in base.iter().zip(uplift) {
			assert_eq!(b.x, u.x);
			assert!(u.y <= b.y + 1e-9);
		}
	}

	#[test]
	fn baseline_steps_stay_within_half_the_local_sigma() {
		let (w, h) = (1000.0, 1000.0);
		let registry = PatternRegistry::builtin();
		let request = PatternRequest::new(w, h, 120).with_margin(0.0);
		let targets = registry.generate_targets("uplift_series", &request, &mut rng());
		let base = &targets[..108];

		let usable = w * 0.92;
		let slope = -(0.000_002 * usable * usable) / 4.0;
		let sigma = h * 0.04;
		let walk = |i: usize| {
			let x = i as f64 / 119.0 * usable;
			base[i].y - (h * 0.7 + slope * (x - usable / 2.0))
		};
		let clamped = |y: f64| y <= h * 0.1 + 1e-9 || y >= h * 0.9 - 1e-9;
		for i in 1..base.len() {
			if clamped(base[i - 1].y) || clamped(base[i].y) {
				continue;
			}
			let t = i as f64 / 119.0;
			let local = (1.0 + (t * PI * 4.0).sin() * 2.0 + (t * PI * 8.0).sin()) * (t * PI).sin();
			let step = walk(i) - walk(i - 1);
			assert!(step.abs() <= sigma / 2.0 * local.abs() + 1e-9, "step {i}: {step}");
		}
	}

	#[test]
	fn anchor_switches_on_narrow_surfaces() {
		let policy = AnchorPolicy::beside_text();
		assert_eq!(policy.resolve(Size::new(1000.0, 500.0)), Point::new(700.0, 250.0));
		assert_eq!(policy.resolve(Size::new(500.0, 500.0)), Point::new(250.0, 275.0));
	}

	#[test]
	fn overlapping_margins_collapse_to_the_middle() {
		assert_eq!(clamp_into(3.0, 10.0, 0.0), 5.0);
		assert_eq!(clamp_into(f64::NAN, 0.0, 10.0), 5.0);
		assert_eq!(clamp_into(-4.0, 0.0, 10.0), 0.0);
	}
}
