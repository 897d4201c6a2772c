//! Particles, the bounded pool that owns them, and their lifecycle.
//!
//! A particle moves through `Seeking -> Converged -> Fading` and is then
//! either reset or removed, depending on the field's [`Lifecycle`] policy.

use serde::Deserialize;

use super::theme::Color;
use super::types::{Point, Target};

/// What happens to particles once they reach their target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
	/// Converged particles settle on their target until the next morph.
	Hold,
	/// Converged particles fade out and are reset to a fresh start.
	Recycle,
	/// Converged particles fade out and leave the pool.
	Remove,
}

/// Lifecycle tuning of one field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
	pub policy: Lifecycle,
	/// Convergence distance in reference pixels.
	pub epsilon: f64,
	/// Opacity lost per frame while fading.
	pub fade_rate: f64,
}

impl Default for LifecycleConfig {
	fn default() -> Self {
		Self {
			policy: Lifecycle::Hold,
			epsilon: 0.5,
			fade_rate: 0.01,
		}
	}
}

/// Smallest fade step, so fading always terminates.
const MIN_FADE_RATE: f64 = 1e-4;

/// Where a particle is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Seeking,
	Converged,
	Fading,
}

/// Result of advancing a particle's lifecycle by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fate {
	Alive,
	/// Fully faded; the field resets or removes it.
	Expired,
}

/// A single animated point.
#[derive(Clone, Debug)]
pub struct Particle {
	pub id: u64,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub target_x: f64,
	pub target_y: f64,
	/// Radius in pixels.
	pub size: f64,
	/// Radius multiplier carried over from the target, reapplied on resize.
	pub target_size: f64,
	pub alpha: f64,
	pub color: Color,
	pub phase: Phase,
	/// Bunch or series id, used to scope edges.
	pub group: Option<u32>,
	/// Ids of peers this particle is allowed to link to.
	pub links: Vec<u64>,
}

impl Particle {
	/// A particle resting at `(x, y)` with that point as its target.
	pub fn new(id: u64, x: f64, y: f64, color: Color) -> Self {
		Self {
			id,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			target_x: x,
			target_y: y,
			size: 1.0,
			target_size: 1.0,
			alpha: 1.0,
			color,
			phase: Phase::Seeking,
			group: None,
			links: Vec::new(),
		}
	}

	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	pub fn target(&self) -> Point {
		Point::new(self.target_x, self.target_y)
	}

	pub fn distance_to_target(&self) -> f64 {
		(self.target_x - self.x).hypot(self.target_y - self.y)
	}

	/// Replace the target without touching position or velocity.
	pub fn retarget(&mut self, target: &Target) {
		self.target_x = target.x;
		self.target_y = target.y;
		self.target_size = target.size;
		self.group = target.group;
		if self.phase == Phase::Converged {
			self.phase = Phase::Seeking;
		}
	}

	/// Advance the lifecycle by one frame.
	///
	/// A seeking particle within `epsilon` pixels converges; under
	/// [`Lifecycle::Hold`] it snaps onto the target, otherwise it starts fading
	/// in the same update. Fading particles lose `fade_rate` opacity per frame
	/// and expire at zero.
	pub fn advance_lifecycle(&mut self, config: &LifecycleConfig, epsilon: f64) -> Fate {
		if self.phase == Phase::Seeking && self.distance_to_target() <= epsilon {
			self.phase = Phase::Converged;
			if config.policy == Lifecycle::Hold {
				self.x = self.target_x;
				self.y = self.target_y;
			}
		}

		if self.phase == Phase::Converged && config.policy != Lifecycle::Hold {
			self.phase = Phase::Fading;
		}

		if self.phase == Phase::Fading {
			self.alpha -= config.fade_rate.max(MIN_FADE_RATE);
		}
		self.alpha = self.alpha.clamp(0.0, 1.0);

		if self.phase == Phase::Fading && self.alpha <= 0.0 {
			Fate::Expired
		} else {
			Fate::Alive
		}
	}
}

/// Bounded particle collection owned by one field.
#[derive(Clone, Debug)]
pub struct ParticlePool {
	particles: Vec<Particle>,
	capacity: usize,
	next_id: u64,
}

impl ParticlePool {
	pub fn new(capacity: usize) -> Self {
		Self {
			particles: Vec::with_capacity(capacity),
			capacity,
			next_id: 0,
		}
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn as_slice(&self) -> &[Particle] {
		&self.particles
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
		self.particles.iter()
	}

	pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
		self.particles.iter_mut()
	}

	/// Reserve a fresh particle id.
	pub fn next_id(&mut self) -> u64 {
		let id = self.next_id;
		self.next_id += 1;
		id
	}

	/// Append a particle, evicting the oldest one when over capacity.
	pub fn push(&mut self, particle: Particle) -> Option<Particle> {
		if self.capacity == 0 {
			return Some(particle);
		}
		self.particles.push(particle);
		if self.particles.len() > self.capacity {
			Some(self.particles.remove(0))
		} else {
			None
		}
	}

	pub fn retain(&mut self, keep: impl FnMut(&Particle) -> bool) {
		self.particles.retain(keep);
	}

	pub fn clear(&mut self) {
		self.particles.clear();
	}

	/// Retarget the pool onto a new shape.
	///
	/// Particle `i` takes target `i % targets.len()`; positions and velocities
	/// are untouched. The pool is then truncated, or padded with particles made
	/// by `spawn(id, target)`, to the target count (capped at capacity).
	/// An empty target list leaves the pool as it is.
	pub fn morph(&mut self, targets: &[Target], mut spawn: impl FnMut(u64, &Target) -> Particle) {
		if targets.is_empty() {
			return;
		}
		for (i, p) in self.particles.iter_mut().enumerate() {
			p.retarget(&targets[i % targets.len()]);
		}

		let wanted = targets.len().min(self.capacity);
		self.particles.truncate(wanted);
		while self.particles.len() < wanted {
			let target = &targets[self.particles.len() % targets.len()];
			let id = self.next_id();
			let mut particle = spawn(id, target);
			particle.id = id;
			particle.retarget(target);
			self.particles.push(particle);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::theme::PRIMARY;

	fn seeking(x: f64, y: f64, tx: f64, ty: f64) -> Particle {
		let mut p = Particle::new(0, x, y, PRIMARY);
		p.target_x = tx;
		p.target_y = ty;
		p
	}

	fn config(policy: Lifecycle) -> LifecycleConfig {
		LifecycleConfig {
			policy,
			epsilon: 15.0,
			fade_rate: 0.25,
		}
	}

	#[test]
	fn converged_particles_start_fading_in_the_same_update() {
		let mut p = seeking(0.0, 0.0, 10.0, 0.0);
		assert_eq!(p.advance_lifecycle(&config(Lifecycle::Recycle), 15.0), Fate::Alive);
		assert_eq!(p.phase, Phase::Fading);
		assert_eq!(p.alpha, 0.75);
	}

	#[test]
	fn distant_particles_keep_seeking() {
		let mut p = seeking(0.0, 0.0, 100.0, 0.0);
		assert_eq!(p.advance_lifecycle(&config(Lifecycle::Remove), 15.0), Fate::Alive);
		assert_eq!(p.phase, Phase::Seeking);
		assert_eq!(p.alpha, 1.0);
	}

	#[test]
	fn fading_strictly_decreases_until_expiry() {
		let mut p = seeking(0.0, 0.0, 0.0, 0.0);
		let cfg = config(Lifecycle::Remove);
		let mut last = p.alpha;
		let mut frames = 0;
		while p.advance_lifecycle(&cfg, 15.0) == Fate::Alive {
			assert!(p.alpha < last);
			last = p.alpha;
			frames += 1;
			assert!(frames < 10);
		}
		assert_eq!(p.alpha, 0.0);
		assert_eq!(p.phase, Phase::Fading);
	}

	#[test]
	fn hold_snaps_onto_the_target_without_fading() {
		let mut p = seeking(0.3, 0.0, 0.5, 0.0);
		let cfg = config(Lifecycle::Hold);
		for _ in 0..5 {
			assert_eq!(p.advance_lifecycle(&cfg, 0.5), Fate::Alive);
		}
		assert_eq!(p.phase, Phase::Converged);
		assert_eq!(p.position(), p.target());
		assert_eq!(p.alpha, 1.0);
	}

	#[test]
	fn alpha_is_clamped() {
		let mut p = seeking(0.0, 0.0, 100.0, 0.0);
		p.alpha = 3.0;
		p.advance_lifecycle(&config(Lifecycle::Hold), 1.0);
		assert_eq!(p.alpha, 1.0);
	}

	#[test]
	fn push_evicts_the_oldest_particle() {
		let mut pool = ParticlePool::new(3);
		for _ in 0..5 {
			let id = pool.next_id();
			pool.push(Particle::new(id, 0.0, 0.0, PRIMARY));
		}
		let ids: Vec<u64> = pool.iter().map(|p| p.id).collect();
		assert_eq!(ids, vec![2, 3, 4]);
	}

	#[test]
	fn morph_retargets_by_wrapped_index_and_keeps_positions() {
		let mut pool = ParticlePool::new(10);
		let first: Vec<Target> = (0..4).map(|i| Target::at(i as f64, 0.0)).collect();
		pool.morph(&first, |id, t| Particle::new(id, t.x + 50.0, 7.0, PRIMARY));
		let before: Vec<Point> = pool.iter().map(Particle::position).collect();

		let second: Vec<Target> = (0..3).map(|i| Target::at(100.0 + i as f64, 200.0)).collect();
		pool.morph(&second, |id, t| Particle::new(id, t.x, t.y, PRIMARY));

		assert_eq!(pool.len(), 3);
		for (i, p) in pool.iter().enumerate() {
			assert_eq!(p.target(), second[i].point());
			assert_eq!(p.position(), before[i]);
		}
	}

	#[test]
	fn morph_pads_with_spawned_particles() {
		let mut pool = ParticlePool::new(10);
		pool.morph(&[Target::at(1.0, 1.0)], |id, t| Particle::new(id, t.x, t.y, PRIMARY));
		let targets: Vec<Target> = (0..4).map(|i| Target::at(i as f64, 9.0)).collect();
		pool.morph(&targets, |id, _| Particle::new(id, -1.0, -1.0, PRIMARY));

		assert_eq!(pool.len(), 4);
		assert_eq!(pool.as_slice()[0].position(), Point::new(1.0, 1.0));
		for (i, p) in pool.iter().enumerate().skip(1) {
			assert_eq!(p.position(), Point::new(-1.0, -1.0));
			assert_eq!(p.target(), targets[i].point());
		}
		let ids: Vec<u64> = pool.iter().map(|p| p.id).collect();
		assert_eq!(ids, vec![0, 1, 2, 3]);
	}

	#[test]
	fn morph_respects_capacity_and_ignores_empty_patterns() {
		let mut pool = ParticlePool::new(2);
		let targets: Vec<Target> = (0..5).map(|i| Target::at(i as f64, 0.0)).collect();
		pool.morph(&targets, |id, t| Particle::new(id, t.x, t.y, PRIMARY));
		assert_eq!(pool.len(), 2);
		pool.morph(&[], |id, t| Particle::new(id, t.x, t.y, PRIMARY));
		assert_eq!(pool.len(), 2);
	}

	#[test]
	fn morph_sends_converged_particles_back_to_seeking() {
		let mut pool = ParticlePool::new(4);
		pool.morph(&[Target::at(0.0, 0.0)], |id, t| Particle::new(id, t.x, t.y, PRIMARY));
		pool.iter_mut().for_each(|p| p.phase = Phase::Converged);
		pool.morph(&[Target::at(50.0, 0.0)], |id, t| Particle::new(id, t.x, t.y, PRIMARY));
		assert_eq!(pool.as_slice()[0].phase, Phase::Seeking);
	}
}
