//! Particle emission schedules for fields that are not driven by a pattern.
//!
//! - [`Emission::Burst`]: a few particles every frame from one origin, flying
//!   outwards and fading immediately.
//! - [`Emission::Bunches`]: a small linked cluster at a fixed interval, moving
//!   together toward a shared target.
//! - [`Emission::Stream`]: a fixed population entering from off-screen left and
//!   recycled once it reaches its target basin.
//!
//! Emission pushes into the pool, so the pool's capacity bounds every schedule.

use std::f64::consts::TAU;

use rand::{Rng, RngCore};
use serde::Deserialize;

use super::particles::{Particle, ParticlePool, Phase};
use super::patterns::Anchor;
use super::random::{between, noise, unit};
use super::theme::Palette;
use super::types::Size;

/// Particles thrown outward from one point every frame.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
	pub per_frame: usize,
	pub origin: Anchor,
	pub speed_min: f64,
	pub speed_max: f64,
	/// Radius multipliers relative to the field's base radius.
	pub size_min: f64,
	pub size_max: f64,
}

impl Default for BurstConfig {
	fn default() -> Self {
		Self {
			per_frame: 3,
			origin: Anchor::CENTER,
			speed_min: 1.5,
			speed_max: 3.0,
			size_min: 1.5,
			size_max: 2.7,
		}
	}
}

/// Small linked groups launched together on a timer.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BunchConfig {
	/// Seconds between bunches.
	pub interval: f64,
	pub min_size: usize,
	pub max_size: usize,
	/// Horizontal start of a bunch as a fraction of the width.
	pub origin_x: f64,
	/// Shared target; `x` may lie beyond the right edge.
	pub target: Anchor,
	pub target_spread: f64,
	pub speed_min: f64,
	pub speed_max: f64,
	/// Velocity noise given to each member at birth.
	pub jitter: f64,
	/// Ellipse radii the members are laid out on.
	pub spread_x: (f64, f64),
	pub spread_y: (f64, f64),
	/// Chance that two members closer than `link_distance` get linked.
	pub link_chance: f64,
	pub link_distance: f64,
	pub size_min: f64,
	pub size_max: f64,
}

impl Default for BunchConfig {
	fn default() -> Self {
		Self {
			interval: 1.5,
			min_size: 3,
			max_size: 7,
			origin_x: 0.7,
			target: Anchor::new(1.5, 0.5),
			target_spread: 50.0,
			speed_min: 5.0,
			speed_max: 8.0,
			jitter: 0.3,
			spread_x: (20.0, 60.0),
			spread_y: (20.0, 30.0),
			link_chance: 0.5,
			link_distance: 120.0,
			size_min: 3.0,
			size_max: 8.0,
		}
	}
}

/// Rectangle given as fractions of the surface.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Region {
	pub x_min: f64,
	pub x_max: f64,
	pub y_min: f64,
	pub y_max: f64,
}

/// Fixed population entering from the left and dissolving in a basin.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
	pub count: usize,
	/// Area each particle is aimed at.
	pub basin: Region,
	/// Entry distance left of the surface, in pixels.
	pub entry_min: f64,
	pub entry_max: f64,
	pub speed_min: f64,
	pub speed_max: f64,
	/// Extra horizontal speed of the initial population.
	pub initial_boost: f64,
	pub vertical_speed: f64,
	pub size_min: f64,
	pub size_max: f64,
}

impl Default for StreamConfig {
	fn default() -> Self {
		Self {
			count: 100,
			basin: Region {
				x_min: 0.2,
				x_max: 0.4,
				y_min: 0.4,
				y_max: 0.6,
			},
			entry_min: 50.0,
			entry_max: 300.0,
			speed_min: 2.0,
			speed_max: 5.0,
			initial_boost: 2.0,
			vertical_speed: 1.0,
			size_min: 2.0,
			size_max: 8.0,
		}
	}
}

/// Particles falling from the top edge, fading out near the bottom.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FallConfig {
	pub count: usize,
	/// Horizontal entry band as fractions of the width.
	pub x_min: f64,
	pub x_max: f64,
	/// Entry height above the top edge, in pixels.
	pub entry_min: f64,
	pub entry_max: f64,
	/// Spread the first population over the whole surface instead of the entry band.
	pub scatter_first: bool,
	/// Horizontal velocity noise.
	pub drift: f64,
	pub speed_min: f64,
	pub speed_max: f64,
	pub size_min: f64,
	pub size_max: f64,
	pub alpha_min: f64,
	pub alpha_max: f64,
	/// Fraction of the height below which particles start fading.
	pub fade_below: Option<f64>,
	/// How far past an edge a particle may travel before it is sent back up.
	pub slack: f64,
}

impl Default for FallConfig {
	fn default() -> Self {
		Self {
			count: 100,
			x_min: 0.1,
			x_max: 0.9,
			entry_min: 0.0,
			entry_max: 100.0,
			scatter_first: false,
			drift: 0.3,
			speed_min: 1.5,
			speed_max: 3.0,
			size_min: 1.0,
			size_max: 4.0,
			alpha_min: 0.8,
			alpha_max: 0.8,
			fade_below: Some(0.8),
			slack: 50.0,
		}
	}
}

impl FallConfig {
	/// Light rain over the whole surface that never fades.
	pub fn rain() -> Self {
		Self {
			count: 80,
			x_min: 0.0,
			x_max: 1.0,
			entry_min: 10.0,
			entry_max: 10.0,
			scatter_first: true,
			speed_min: 0.6,
			speed_max: 1.4,
			size_max: 3.0,
			alpha_min: 0.4,
			alpha_max: 1.0,
			fade_below: None,
			slack: 10.0,
			..Self::default()
		}
	}
}

/// Emission schedule of one field.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Emission {
	#[default]
	None,
	Burst(BurstConfig),
	Bunches(BunchConfig),
	Stream(StreamConfig),
	Fall(FallConfig),
}

/// What an emitter needs to know about the surface to create particles.
#[derive(Clone, Copy, Debug)]
pub struct SpawnContext<'a> {
	pub size: Size,
	pub palette: &'a Palette,
	/// Base radius in pixels.
	pub radius: f64,
}

impl SpawnContext<'_> {
	fn particle(&self, id: u64, x: f64, y: f64, size: f64, rng: &mut dyn RngCore) -> Particle {
		let mut p = Particle::new(id, x, y, self.palette.pick(rng));
		p.target_size = size;
		p.size = self.radius * size;
		p
	}
}

/// Runs an [`Emission`] schedule against a pool.
#[derive(Clone, Debug)]
pub struct Emitter {
	emission: Emission,
	since_last: f64,
	next_group: u32,
}

impl Emitter {
	/// Emitter whose first bunch, if any, is due on the first frame.
	pub fn new(emission: Emission) -> Self {
		let since_last = match &emission {
			Emission::Bunches(cfg) => cfg.interval,
			_ => 0.0,
		};
		Self {
			emission,
			since_last,
			next_group: 0,
		}
	}

	/// Schedule being run.
	pub fn emission(&self) -> &Emission {
		&self.emission
	}

	/// Create the standing population, if the schedule has one.
	pub fn populate(
		&mut self,
		pool: &mut ParticlePool,
		ctx: &SpawnContext<'_>,
		rng: &mut dyn RngCore,
	) {
		match &self.emission {
			Emission::Stream(cfg) => {
				for _ in 0..cfg.count {
					let id = pool.next_id();
					let mut p = ctx.particle(id, 0.0, 0.0, 1.0, rng);
					stream_reset(cfg, &mut p, ctx, rng);
					let factor = unit(rng);
					p.x += (p.target_x - p.x) * factor;
					p.y += (p.target_y - p.y) * factor;
					p.vx += cfg.initial_boost;
					pool.push(p);
				}
			}
			Emission::Fall(cfg) => {
				for _ in 0..cfg.count {
					let id = pool.next_id();
					let mut p = ctx.particle(id, 0.0, 0.0, 1.0, rng);
					fall_reset(cfg, &mut p, ctx, rng);
					if cfg.scatter_first {
						p.x = unit(rng) * ctx.size.width;
						p.y = unit(rng) * ctx.size.height;
						p.target_x = p.x;
					}
					pool.push(p);
				}
			}
			_ => {}
		}
	}

	/// Emit whatever is due after `dt` seconds.
	pub fn emit(
		&mut self,
		dt: f64,
		pool: &mut ParticlePool,
		ctx: &SpawnContext<'_>,
		rng: &mut dyn RngCore,
	) {
		match &self.emission {
			Emission::None | Emission::Stream(_) | Emission::Fall(_) => {}
			Emission::Burst(cfg) => {
				for _ in 0..cfg.per_frame {
					let id = pool.next_id();
					pool.push(burst_particle(cfg, id, ctx, rng));
				}
			}
			Emission::Bunches(cfg) => {
				self.since_last += dt;
				if self.since_last >= cfg.interval {
					self.since_last = 0.0;
					let group = self.next_group;
					self.next_group = self.next_group.wrapping_add(1);
					for p in bunch(cfg, group, pool, ctx, rng) {
						pool.push(p);
					}
				}
			}
		}
	}

	/// Send an expired particle back to the start. Returns false when the
	/// schedule has no notion of a start.
	pub fn respawn(&self, p: &mut Particle, ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) -> bool {
		match &self.emission {
			Emission::Stream(cfg) => stream_reset(cfg, p, ctx, rng),
			Emission::Fall(cfg) => fall_reset(cfg, p, ctx, rng),
			_ => return false,
		}
		true
	}

	/// Per-frame bookkeeping after a particle moved: falling particles start
	/// fading below the fade line and go back to the top once they leave the
	/// surface.
	pub fn guide(&self, p: &mut Particle, ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) {
		let Emission::Fall(cfg) = &self.emission else {
			return;
		};
		let (w, h) = (ctx.size.width, ctx.size.height);
		if p.y > h + cfg.slack || p.x < -cfg.slack || p.x > w + cfg.slack {
			fall_reset(cfg, p, ctx, rng);
			return;
		}
		if p.phase == Phase::Seeking && cfg.fade_below.is_some_and(|line| p.y > h * line) {
			p.phase = Phase::Fading;
		}
	}
}

fn burst_particle(
	cfg: &BurstConfig,
	id: u64,
	ctx: &SpawnContext<'_>,
	rng: &mut dyn RngCore,
) -> Particle {
	let x = ctx.size.width * cfg.origin.x;
	let y = ctx.size.height * cfg.origin.y;
	let angle = unit(rng) * TAU;
	let speed = between(rng, cfg.speed_min, cfg.speed_max);
	let size = between(rng, cfg.size_min, cfg.size_max);
	let mut p = ctx.particle(id, x, y, size, rng);
	p.vx = angle.cos() * speed;
	p.vy = angle.sin() * speed;
	p.phase = Phase::Fading;
	p
}

fn bunch(
	cfg: &BunchConfig,
	group: u32,
	pool: &mut ParticlePool,
	ctx: &SpawnContext<'_>,
	rng: &mut dyn RngCore,
) -> Vec<Particle> {
	let (w, h) = (ctx.size.width, ctx.size.height);
	let n = if cfg.max_size > cfg.min_size {
		rng.gen_range(cfg.min_size..=cfg.max_size)
	} else {
		cfg.min_size
	};
	let start_x = w * cfg.origin_x;
	let target_x = w * cfg.target.x + noise(rng, cfg.target_spread);
	let target_y = h * cfg.target.y + unit(rng) * 10.0;
	let rx = between(rng, cfg.spread_x.0, cfg.spread_x.1);
	let ry = between(rng, cfg.spread_y.0, cfg.spread_y.1);
	let speed = between(rng, cfg.speed_min, cfg.speed_max);

	let mut members: Vec<Particle> = (0..n)
		.map(|i| {
			let angle = i as f64 / n as f64 * TAU;
			let size = between(rng, cfg.size_min, cfg.size_max);
			let id = pool.next_id();
			let mut p = ctx.particle(
				id,
				start_x + angle.cos() * rx,
				target_y + angle.sin() * ry,
				size,
				rng,
			);
			p.vx = speed + noise(rng, cfg.jitter);
			p.vy = noise(rng, cfg.jitter);
			p.target_x = target_x;
			p.target_y = target_y;
			p.group = Some(group);
			p
		})
		.collect();

	for i in 0..members.len() {
		for j in i + 1..members.len() {
			if unit(rng) > cfg.link_chance {
				continue;
			}
			if members[i].position().distance(members[j].position()) < cfg.link_distance {
				let (a, b) = (members[i].id, members[j].id);
				members[i].links.push(b);
				members[j].links.push(a);
			}
		}
	}
	members
}

fn stream_reset(
	cfg: &StreamConfig,
	p: &mut Particle,
	ctx: &SpawnContext<'_>,
	rng: &mut dyn RngCore,
) {
	let (w, h) = (ctx.size.width, ctx.size.height);
	p.x = -between(rng, cfg.entry_min, cfg.entry_max);
	p.y = unit(rng) * h;
	p.target_x = w * between(rng, cfg.basin.x_min, cfg.basin.x_max);
	p.target_y = h * between(rng, cfg.basin.y_min, cfg.basin.y_max);
	p.target_size = between(rng, cfg.size_min, cfg.size_max);
	p.size = ctx.radius * p.target_size;
	p.vx = between(rng, cfg.speed_min, cfg.speed_max);
	p.vy = noise(rng, cfg.vertical_speed);
	p.alpha = 1.0;
	p.color = ctx.palette.pick(rng);
	p.phase = Phase::Seeking;
}

/// Falling particles aim at the exit below their entry column, which they
/// never reach before `guide` sends them back up.
fn fall_reset(cfg: &FallConfig, p: &mut Particle, ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) {
	let (w, h) = (ctx.size.width, ctx.size.height);
	p.x = w * between(rng, cfg.x_min, cfg.x_max);
	p.y = -between(rng, cfg.entry_min, cfg.entry_max);
	p.target_x = p.x;
	p.target_y = h + cfg.slack * 2.0;
	p.target_size = between(rng, cfg.size_min, cfg.size_max);
	p.size = ctx.radius * p.target_size;
	p.vx = noise(rng, cfg.drift);
	p.vy = between(rng, cfg.speed_min, cfg.speed_max);
	p.alpha = between(rng, cfg.alpha_min, cfg.alpha_max);
	p.color = ctx.palette.pick(rng);
	p.phase = Phase::Seeking;
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn ctx(palette: &Palette) -> SpawnContext<'_> {
		SpawnContext {
			size: Size::new(800.0, 400.0),
			palette,
			radius: 1.0,
		}
	}

	#[test]
	fn burst_never_exceeds_capacity_and_evicts_the_oldest() {
		let palette = Palette::default();
		let mut rng = SmallRng::seed_from_u64(5);
		let mut pool = ParticlePool::new(10);
		let mut emitter = Emitter::new(Emission::Burst(BurstConfig::default()));
		for _ in 0..7 {
			emitter.emit(1.0 / 60.0, &mut pool, &ctx(&palette), &mut rng);
			assert!(pool.len() <= 10);
		}
		assert_eq!(pool.len(), 10);
		let ids: Vec<u64> = pool.iter().map(|p| p.id).collect();
		assert_eq!(ids, (11..21).collect::<Vec<u64>>());
	}

	#[test]
	fn burst_particles_leave_the_origin_fading() {
		let palette = Palette::default();
		let mut rng = SmallRng::seed_from_u64(5);
		let mut pool = ParticlePool::new(150);
		let mut emitter = Emitter::new(Emission::Burst(BurstConfig::default()));
		emitter.emit(1.0 / 60.0, &mut pool, &ctx(&palette), &mut rng);
		assert_eq!(pool.len(), 3);
		for p in pool.iter() {
			assert_eq!((p.x, p.y), (400.0, 200.0));
			assert_eq!(p.phase, Phase::Fading);
			let speed = p.vx.hypot(p.vy);
			assert!((1.5..=3.0).contains(&speed));
		}
	}

	#[test]
	fn bunches_are_emitted_on_the_interval() {
		let palette = Palette::bunches();
		let mut rng = SmallRng::seed_from_u64(9);
		let mut pool = ParticlePool::new(150);
		let mut emitter = Emitter::new(Emission::Bunches(BunchConfig::default()));

		emitter.emit(0.016, &mut pool, &ctx(&palette), &mut rng);
		let first = pool.len();
		assert!((3..=7).contains(&first));

		emitter.emit(1.0, &mut pool, &ctx(&palette), &mut rng);
		assert_eq!(pool.len(), first);
		emitter.emit(0.6, &mut pool, &ctx(&palette), &mut rng);
		assert!(pool.len() > first);
	}

	#[test]
	fn bunch_members_share_a_group_and_only_link_within_it() {
		let palette = Palette::bunches();
		let mut rng = SmallRng::seed_from_u64(21);
		let mut pool = ParticlePool::new(150);
		let mut emitter = Emitter::new(Emission::Bunches(BunchConfig {
			link_chance: 1.0,
			..BunchConfig::default()
		}));
		for _ in 0..3 {
			emitter.emit(2.0, &mut pool, &ctx(&palette), &mut rng);
		}
		let particles = pool.as_slice();
		for p in particles {
			assert!(p.group.is_some());
			assert!(!p.links.is_empty());
			for peer in &p.links {
				let other = particles.iter().find(|o| o.id == *peer).unwrap();
				assert_eq!(other.group, p.group);
				assert!(other.links.contains(&p.id));
			}
		}
	}

	#[test]
	fn stream_population_heads_for_the_basin() {
		let palette = Palette::stream();
		let mut rng = SmallRng::seed_from_u64(2);
		let mut pool = ParticlePool::new(150);
		let mut emitter = Emitter::new(Emission::Stream(StreamConfig::default()));
		emitter.populate(&mut pool, &ctx(&palette), &mut rng);
		assert_eq!(pool.len(), 100);
		for p in pool.iter() {
			assert!((160.0..=320.0).contains(&p.target_x));
			assert!((160.0..=240.0).contains(&p.target_y));
			assert!(p.x <= p.target_x);
		}

		emitter.emit(1.0, &mut pool, &ctx(&palette), &mut rng);
		assert_eq!(pool.len(), 100);
	}

	#[test]
	fn respawn_restarts_off_screen() {
		let palette = Palette::stream();
		let mut rng = SmallRng::seed_from_u64(2);
		let emitter = Emitter::new(Emission::Stream(StreamConfig::default()));
		let mut p = Particle::new(0, 300.0, 200.0, palette.get(0));
		p.alpha = 0.0;
		p.phase = Phase::Fading;
		assert!(emitter.respawn(&mut p, &ctx(&palette), &mut rng));
		assert!(p.x <= -50.0 && p.x >= -300.0);
		assert_eq!(p.alpha, 1.0);
		assert_eq!(p.phase, Phase::Seeking);

		let none = Emitter::new(Emission::None);
		assert!(!none.respawn(&mut p, &ctx(&palette), &mut rng));
	}

	#[test]
	fn falling_particles_enter_above_the_band() {
		let palette = Palette::default();
		let mut rng = SmallRng::seed_from_u64(4);
		let mut pool = ParticlePool::new(150);
		let mut emitter = Emitter::new(Emission::Fall(FallConfig::default()));
		emitter.populate(&mut pool, &ctx(&palette), &mut rng);
		emitter.emit(1.0, &mut pool, &ctx(&palette), &mut rng);
		assert_eq!(pool.len(), 100);
		for p in pool.iter() {
			assert!((80.0..=720.0).contains(&p.x));
			assert!((-100.0..=0.0).contains(&p.y));
			assert!((1.5..=3.0).contains(&p.vy));
			assert_eq!(p.alpha, 0.8);
			assert_eq!(p.phase, Phase::Seeking);
		}
	}

	#[test]
	fn rain_starts_scattered_over_the_surface() {
		let palette = Palette::rain();
		let mut rng = SmallRng::seed_from_u64(4);
		let mut pool = ParticlePool::new(150);
		let mut emitter = Emitter::new(Emission::Fall(FallConfig::rain()));
		emitter.populate(&mut pool, &ctx(&palette), &mut rng);
		assert_eq!(pool.len(), 80);
		assert!(pool.iter().any(|p| p.y > 200.0));
		assert!(pool.iter().all(|p| (0.0..=400.0).contains(&p.y)));
	}

	#[test]
	fn guide_fades_below_the_line_and_resets_leavers() {
		let palette = Palette::default();
		let mut rng = SmallRng::seed_from_u64(8);
		let emitter = Emitter::new(Emission::Fall(FallConfig::default()));

		let mut p = Particle::new(0, 400.0, 300.0, palette.get(0));
		emitter.guide(&mut p, &ctx(&palette), &mut rng);
		assert_eq!(p.phase, Phase::Seeking);
		p.y = 330.0;
		emitter.guide(&mut p, &ctx(&palette), &mut rng);
		assert_eq!(p.phase, Phase::Fading);

		p.y = 460.0;
		emitter.guide(&mut p, &ctx(&palette), &mut rng);
		assert!(p.y <= 0.0);
		assert_eq!(p.phase, Phase::Seeking);

		p.x = -60.0;
		p.y = 100.0;
		emitter.guide(&mut p, &ctx(&palette), &mut rng);
		assert!(p.x >= 80.0);

		let rain = Emitter::new(Emission::Fall(FallConfig::rain()));
		p.y = 399.0;
		rain.guide(&mut p, &ctx(&palette), &mut rng);
		assert_eq!(p.phase, Phase::Seeking);
		p.y = 411.0;
		rain.guide(&mut p, &ctx(&palette), &mut rng);
		assert_eq!(p.y, -10.0);
	}
}
