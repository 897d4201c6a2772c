//! Drawing primitives the renderer needs.
//!
//! The browser canvas implements [`Surface`] directly; [`RecordingSurface`]
//! records the calls so frames can be inspected without a browser.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::theme::Color;
use super::types::{Point, Size};

pub trait Surface {
	/// Erase the whole surface to transparent.
	fn clear(&mut self, size: Size);
	/// Fill an axis-aligned rectangle whose top-left corner is `(x, y)`.
	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);
	/// Fill a disc.
	fn fill_circle(&mut self, center: Point, radius: f64, color: Color);
	/// Stroke a straight segment `width` pixels wide.
	fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, size: Size) {
		self.clear_rect(0.0, 0.0, size.width, size.height);
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
		self.set_fill_style_str(&color.to_css());
		CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
	}

	fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
		self.set_fill_style_str(&color.to_css());
		self.begin_path();
		let _ = self.arc(center.x, center.y, radius, 0.0, TAU);
		self.fill();
	}

	fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.x, from.y);
		self.line_to(to.x, to.y);
		self.stroke();
	}
}

/// A recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	Clear {
		size: Size,
	},
	Rect {
		x: f64,
		y: f64,
		width: f64,
		height: f64,
		color: Color,
	},
	Circle {
		center: Point,
		radius: f64,
		color: Color,
	},
	Line {
		from: Point,
		to: Point,
		width: f64,
		color: Color,
	},
}

/// Headless surface keeping every call in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
	pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
		self.commands
			.iter()
			.filter(|c| matches!(c, DrawCommand::Circle { .. }))
	}

	pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
		self.commands
			.iter()
			.filter(|c| matches!(c, DrawCommand::Line { .. }))
	}

	/// Forget everything recorded so far.
	pub fn reset(&mut self) {
		self.commands.clear();
	}
}

impl Surface for RecordingSurface {
	fn clear(&mut self, size: Size) {
		self.commands.push(DrawCommand::Clear { size });
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
		self.commands.push(DrawCommand::Rect {
			x,
			y,
			width,
			height,
			color,
		});
	}

	fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
		self.commands.push(DrawCommand::Circle {
			center,
			radius,
			color,
		});
	}

	fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
		self.commands.push(DrawCommand::Line {
			from,
			to,
			width,
			color,
		});
	}
}
