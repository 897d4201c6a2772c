//! Per-instance simulation state of a particle field.
//!
//! Owns the pool, the emitter and the random source of one canvas. Nothing is
//! shared between instances, so two fields on a page never see each other's
//! particles or frame counters.

use std::collections::HashMap;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use super::config::{FieldConfig, SpawnMode};
use super::edges::{Edge, EdgeNode, compute_edges};
use super::emitter::{Emitter, SpawnContext};
use super::idle::{IdleFrame, idle_offset};
use super::particles::{Fate, Lifecycle, Particle, ParticlePool, Phase};
use super::patterns::{PatternRegistry, PatternRequest};
use super::random::{noise, unit};
use super::scale::ScaledValues;
use super::types::{Point, Size, Target};

/// Simulation state of one particle field, independent of any canvas.
pub struct ParticleFieldState {
	config: FieldConfig,
	registry: PatternRegistry,
	pool: ParticlePool,
	emitter: Emitter,
	rng: SmallRng,
	size: Size,
	scaled: ScaledValues,
	pattern_key: Option<String>,
	populated: bool,
	/// Field clock in seconds.
	time: f64,
	reveal: f64,
	hovered: bool,
}

fn spawn_context<'a>(
	config: &'a FieldConfig,
	scaled: &ScaledValues,
	size: Size,
) -> SpawnContext<'a> {
	SpawnContext {
		size,
		palette: &config.style.palette,
		radius: scaled.size(config.style.radius),
	}
}

/// Create a particle for a pattern target, placed according to `mode`.
fn spawn_for_target(
	id: u64,
	target: &Target,
	mode: SpawnMode,
	config: &FieldConfig,
	ctx: &SpawnContext<'_>,
	rng: &mut dyn RngCore,
) -> Particle {
	let (x, y) = match mode {
		SpawnMode::AtTarget => (target.x, target.y),
		SpawnMode::Scattered => (
			unit(rng) * ctx.size.width,
			unit(rng) * ctx.size.height,
		),
		SpawnMode::NearTarget { spread } => (
			target.x + noise(rng, 2.0 * spread),
			target.y + noise(rng, 2.0 * spread),
		),
	};
	let color = match target.tone {
		Some(tone) => ctx.palette.get(tone),
		None => ctx.palette.pick(rng),
	};
	let mut p = Particle::new(id, x, y, color);
	p.vx = noise(rng, config.initial_speed);
	p.vy = noise(rng, config.initial_speed);
	p.alpha = target.alpha;
	p
}

/// Restart an expired particle somewhere on the surface, keeping its target.
fn respawn_in_place(p: &mut Particle, ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) {
	p.x = unit(rng) * ctx.size.width;
	p.y = unit(rng) * ctx.size.height;
	p.vx = 0.0;
	p.vy = 0.0;
	p.alpha = 1.0;
	p.color = ctx.palette.pick(rng);
	p.phase = Phase::Seeking;
}

impl ParticleFieldState {
	/// A field on a `width` x `height` surface. Particles are created lazily,
	/// on the first tick, pattern change or resize with a positive area.
	pub fn new(config: FieldConfig, width: f64, height: f64, seed: u64) -> Self {
		let size = Size::new(width, height);
		Self {
			registry: PatternRegistry::builtin(),
			pool: ParticlePool::new(config.capacity),
			emitter: Emitter::new(config.emission.clone()),
			rng: SmallRng::seed_from_u64(seed),
			scaled: ScaledValues::new(&config.scale, size),
			reveal: if config.reveal_speed.is_some() { 0.0 } else { 1.0 },
			size,
			pattern_key: None,
			populated: false,
			time: 0.0,
			hovered: false,
			config,
		}
	}

	/// Replace the built-in pattern registry.
	pub fn with_registry(mut self, registry: PatternRegistry) -> Self {
		self.registry = registry;
		self
	}

	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	pub fn size(&self) -> Size {
		self.size
	}

	pub fn scaled(&self) -> &ScaledValues {
		&self.scaled
	}

	pub fn particles(&self) -> &[Particle] {
		self.pool.as_slice()
	}

	pub fn pattern_key(&self) -> Option<&str> {
		self.pattern_key.as_deref()
	}

	pub fn time(&self) -> f64 {
		self.time
	}

	pub fn reveal(&self) -> f64 {
		self.reveal
	}

	pub fn is_hovered(&self) -> bool {
		self.hovered
	}

	pub fn set_hovered(&mut self, hovered: bool) {
		self.hovered = hovered;
	}

	/// Morph toward the pattern bound to `key`.
	///
	/// Does nothing when the key is unchanged or the field has no patterns.
	/// Returns whether particles were retargeted or created.
	pub fn set_pattern(&mut self, key: &str) -> bool {
		if self.config.patterns.is_none() || self.pattern_key.as_deref() == Some(key) {
			return false;
		}
		self.pattern_key = Some(key.to_string());
		self.warn_unknown_pattern();
		if !self.populated {
			self.populate();
			return self.populated;
		}
		info!("particle-morph: morphing to `{}`", key);
		let targets = self.targets();
		self.morph(&targets, SpawnMode::Scattered);
		true
	}

	/// Adapt to a new surface size.
	///
	/// Positions and targets are rescaled proportionally; pattern fields then
	/// regenerate their targets for the current key and retarget in place.
	pub fn resize(&mut self, width: f64, height: f64) {
		let old = self.size;
		self.size = Size::new(width, height);
		self.scaled = ScaledValues::new(&self.config.scale, self.size);
		if !self.size.has_area() {
			debug!("particle-morph: surface has no area, pausing");
			return;
		}
		if !self.populated {
			self.populate();
			return;
		}

		if old.has_area() {
			let (sx, sy) = (width / old.width, height / old.height);
			for p in self.pool.iter_mut() {
				p.x *= sx;
				p.y *= sy;
				p.target_x *= sx;
				p.target_y *= sy;
			}
		}
		if self.config.patterns.is_some() {
			let targets = self.targets();
			self.morph(&targets, SpawnMode::Scattered);
		}
		self.refresh_sizes();
		debug!("particle-morph: resized to {}x{}", width, height);
	}

	/// Advance the simulation by one frame of `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		if !self.size.has_area() {
			return;
		}
		if !self.populated {
			self.populate();
		}
		self.time += dt;
		self.reveal = match self.config.reveal_speed {
			Some(speed) => (self.reveal + speed).min(1.0),
			None => 1.0,
		};

		let Self {
			pool,
			emitter,
			rng,
			config,
			scaled,
			size,
			..
		} = self;
		let ctx = spawn_context(config, scaled, *size);
		emitter.emit(dt, pool, &ctx, rng);

		let epsilon = scaled.distance(config.lifecycle.epsilon);
		let mut removed = false;
		for p in pool.iter_mut() {
			config.motion.step(p, *size, rng);
			emitter.guide(p, &ctx, rng);
			if p.advance_lifecycle(&config.lifecycle, epsilon) == Fate::Alive {
				continue;
			}
			match config.lifecycle.policy {
				Lifecycle::Recycle => {
					if !emitter.respawn(p, &ctx, rng) {
						respawn_in_place(p, &ctx, rng);
					}
				}
				Lifecycle::Hold | Lifecycle::Remove => removed = true,
			}
		}
		if removed {
			pool.retain(|p| p.phase != Phase::Fading || p.alpha > 0.0);
		}
	}

	/// Render positions: physics position plus idle offset.
	pub fn display_positions(&self) -> Vec<Point> {
		if self.config.idle.is_empty() {
			return self.pool.iter().map(Particle::position).collect();
		}
		let frame = IdleFrame {
			time: self.time,
			center: Point::new(self.size.width / 2.0, self.size.height / 2.0),
			scale: self.scaled.factor,
		};
		self.pool
			.iter()
			.enumerate()
			.map(|(i, p)| {
				let o = idle_offset(&self.config.idle, &frame, i, p.target());
				Point::new(p.x + o.x, p.y + o.y)
			})
			.collect()
	}

	/// Which particles the reveal progress has uncovered.
	///
	/// Within each group, the first `floor(len * reveal)` particles are visible.
	pub fn visibility(&self) -> Vec<bool> {
		if self.reveal >= 1.0 {
			return vec![true; self.pool.len()];
		}
		let mut totals: HashMap<Option<u32>, usize> = HashMap::new();
		for p in self.pool.iter() {
			*totals.entry(p.group).or_default() += 1;
		}
		let mut seen: HashMap<Option<u32>, usize> = HashMap::new();
		self.pool
			.iter()
			.map(|p| {
				let index = seen.entry(p.group).or_default();
				let shown = (totals[&p.group] as f64 * self.reveal).floor() as usize;
				let visible = *index < shown;
				*index += 1;
				visible
			})
			.collect()
	}

	/// This frame's edges, indexed into [`Self::particles`].
	pub fn edges(&self) -> Vec<Edge> {
		let edges = &self.config.edges;
		if edges.hover_only && !self.hovered {
			return Vec::new();
		}
		let display = self.display_positions();
		let visible = self.visibility();
		let nodes: Vec<EdgeNode<'_>> = self
			.pool
			.iter()
			.enumerate()
			.map(|(i, p)| EdgeNode {
				id: p.id,
				x: display[i].x,
				y: display[i].y,
				alpha: p.alpha,
				group: p.group,
				links: &p.links,
				visible: visible[i],
			})
			.collect();
		compute_edges(&nodes, &edges.policy, edges.scope, self.scaled.distance_factor())
	}

	fn populate(&mut self) {
		if !self.size.has_area() {
			return;
		}
		self.pool.clear();
		if self.config.patterns.is_some() {
			if self.pattern_key.is_none() {
				self.pattern_key = self.config.patterns.as_ref().map(|book| book.default_key.clone());
				self.warn_unknown_pattern();
			}
			let spawn = self.config.spawn;
			let targets = self.targets();
			self.morph(&targets, spawn);
		}

		let Self {
			pool,
			emitter,
			rng,
			config,
			scaled,
			size,
			..
		} = self;
		emitter.populate(pool, &spawn_context(config, scaled, *size), rng);
		self.populated = true;
		debug!(
			"particle-morph: populated {} particles on {}x{}",
			self.pool.len(),
			self.size.width,
			self.size.height
		);
	}

	/// Report a key whose pattern is not registered. Lookups fall back
	/// silently afterwards.
	fn warn_unknown_pattern(&self) {
		let Some(book) = &self.config.patterns else {
			return;
		};
		let pattern = book.resolve(self.pattern_key.as_deref().unwrap_or("")).pattern;
		if !self.registry.contains(&pattern) {
			warn!(
				"particle-morph: unknown pattern `{}`, using `{}`",
				pattern,
				self.registry.default_name()
			);
		}
	}

	fn targets(&mut self) -> Vec<Target> {
		let Some(book) = &self.config.patterns else {
			return Vec::new();
		};
		let resolved = book.resolve(self.pattern_key.as_deref().unwrap_or(""));
		let request = PatternRequest::new(self.size.width, self.size.height, resolved.count)
			.with_anchor(resolved.anchor)
			.with_margin(book.margin)
			.with_zoom(resolved.zoom);
		self.registry
			.generate_targets(&resolved.pattern, &request, &mut self.rng)
	}

	/// Retarget the pool; particles added to fill up the pattern start per `padding`.
	fn morph(&mut self, targets: &[Target], padding: SpawnMode) {
		let Self {
			pool,
			rng,
			config,
			scaled,
			size,
			..
		} = self;
		let ctx = spawn_context(config, scaled, *size);
		pool.morph(targets, |id, target| {
			spawn_for_target(id, target, padding, config, &ctx, rng)
		});
		self.refresh_sizes();
	}

	fn refresh_sizes(&mut self) {
		let base = self.scaled.size(self.config.style.radius);
		for p in self.pool.iter_mut() {
			p.size = base * p.target_size;
		}
	}
}
