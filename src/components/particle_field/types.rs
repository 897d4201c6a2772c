//! Geometry values shared by the pattern generator, pool and renderer.

/// A position on the drawing surface, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

/// A pattern position together with the visual hints the shape carries for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
	pub x: f64,
	pub y: f64,
	/// Radius multiplier relative to the field's base radius.
	pub size: f64,
	/// Base opacity of a particle resting on this target.
	pub alpha: f64,
	/// Series or cluster the position belongs to, used to scope edges.
	pub group: Option<u32>,
	/// Palette index overriding the random color pick.
	pub tone: Option<usize>,
}

impl Target {
	pub const fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			size: 1.0,
			alpha: 1.0,
			group: None,
			tone: None,
		}
	}

	pub fn sized(mut self, size: f64) -> Self {
		self.size = size;
		self
	}

	pub fn faded(mut self, alpha: f64) -> Self {
		self.alpha = alpha;
		self
	}

	pub fn in_group(mut self, group: u32) -> Self {
		self.group = Some(group);
		self.tone = Some(group as usize);
		self
	}

	pub fn point(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

/// Pixel dimensions of a drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// True when both sides are positive and finite.
	pub fn has_area(&self) -> bool {
		self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
	}

	pub fn min_side(&self) -> f64 {
		self.width.min(self.height)
	}
}
