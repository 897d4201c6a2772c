//! Per-frame drawing of a particle field.
//!
//! A frame is drawn in a fixed order:
//! 1. Clear, background fill and decorations (chart axes)
//! 2. Physics update
//! 3. Edges, colored after their first endpoint
//! 4. Particles on top

use super::edges::Edge;
use super::state::ParticleFieldState;
use super::surface::Surface;
use super::theme::Decoration;
use super::types::{Point, Size};

/// Edges fainter than this are skipped.
const MIN_EDGE_ALPHA: f64 = 0.005;

/// Advance the field by `dt` seconds and draw it.
///
/// Surfaces without area are left untouched.
pub fn frame<S: Surface + ?Sized>(state: &mut ParticleFieldState, surface: &mut S, dt: f64) {
	let size = state.size();
	if !size.has_area() {
		return;
	}

	surface.clear(size);
	draw_background(state, surface, size);
	state.tick(dt);

	let display = state.display_positions();
	let visible = state.visibility();
	draw_edges(state, surface, &state.edges(), &display);
	draw_particles(state, surface, &display, &visible);
}

fn draw_background<S: Surface + ?Sized>(state: &ParticleFieldState, surface: &mut S, size: Size) {
	let style = &state.config().style;
	if let Some(color) = style.background {
		surface.fill_rect(0.0, 0.0, size.width, size.height, color);
	}

	for decoration in &style.decorations {
		match decoration {
			Decoration::Axes {
				color,
				width,
				bottom_inset,
				right_inset,
			} => {
				let origin = Point::new(0.0, size.height - bottom_inset);
				surface.stroke_line(origin, Point::new(0.0, 0.0), *width, *color);
				surface.stroke_line(
					origin,
					Point::new(size.width - right_inset, origin.y),
					*width,
					*color,
				);
			}
		}
	}
}

fn draw_edges<S: Surface + ?Sized>(
	state: &ParticleFieldState,
	surface: &mut S,
	edges: &[Edge],
	display: &[Point],
) {
	let style = &state.config().style.edge;
	let width = state.scaled().size(style.width);
	let particles = state.particles();

	for edge in edges {
		let alpha = style.opacity * edge.opacity;
		if alpha < MIN_EDGE_ALPHA {
			continue;
		}
		let color = particles[edge.a].color.fade(alpha);
		surface.stroke_line(display[edge.a], display[edge.b], width, color);
	}
}

fn draw_particles<S: Surface + ?Sized>(
	state: &ParticleFieldState,
	surface: &mut S,
	display: &[Point],
	visible: &[bool],
) {
	let hover = if state.is_hovered() {
		state.config().style.hover_scale
	} else {
		1.0
	};

	for (i, p) in state.particles().iter().enumerate() {
		if !visible[i] || p.alpha <= 0.0 {
			continue;
		}
		surface.fill_circle(display[i], p.size * hover, p.color.fade(p.alpha));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::config::FieldConfig;
	use crate::components::particle_field::surface::{DrawCommand, RecordingSurface};
	use crate::components::particle_field::theme::Color;

	#[test]
	fn zero_area_draws_nothing() {
		let mut state = ParticleFieldState::new(FieldConfig::hero(), 0.0, 300.0, 1);
		let mut surface = RecordingSurface::new();
		frame(&mut state, &mut surface, 0.016);
		assert!(surface.commands.is_empty());
	}

	#[test]
	fn network_fills_its_background_first() {
		let mut state = ParticleFieldState::new(FieldConfig::network(), 400.0, 300.0, 1);
		let mut surface = RecordingSurface::new();
		frame(&mut state, &mut surface, 0.016);
		assert_eq!(
			surface.commands[0],
			DrawCommand::Clear {
				size: Size::new(400.0, 300.0)
			}
		);
		assert!(matches!(
			surface.commands[1],
			DrawCommand::Rect { color, .. } if color == Color::rgb(0, 0, 0)
		));
		assert_eq!(surface.circles().count(), 100);
	}

	#[test]
	fn hover_enlarges_particles() {
		let config = FieldConfig::icon(
			crate::components::particle_field::config::IconKind::Search,
			Color::rgb(255, 0, 0),
		);
		let mut state = ParticleFieldState::new(config, 120.0, 120.0, 1);
		let mut surface = RecordingSurface::new();
		frame(&mut state, &mut surface, 0.016);
		let radius = |s: &RecordingSurface| match s.circles().next() {
			Some(DrawCommand::Circle { radius, .. }) => *radius,
			_ => 0.0,
		};
		let plain = radius(&surface);
		assert_eq!(surface.lines().count(), 0);

		state.set_hovered(true);
		surface.reset();
		frame(&mut state, &mut surface, 0.016);
		assert!((radius(&surface) - plain * 1.5).abs() < 1e-9);
	}
}
