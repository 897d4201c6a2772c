//! Colors, palettes and visual styling for particle fields.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Deserialize;

/// Brand blue used by most of the site's canvases.
pub const PRIMARY: Color = Color::rgb(77, 170, 233);

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Multiply the existing alpha by `factor`, clamped to [0, 1].
	pub fn fade(self, factor: f64) -> Self {
		Self {
			a: (self.a * factor).clamp(0.0, 1.0),
			..self
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Error returned when a CSS color string cannot be parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorParseError(String);

impl fmt::Display for ColorParseError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unsupported color `{}`", self.0)
	}
}

impl std::error::Error for ColorParseError {}

impl FromStr for Color {
	type Err = ColorParseError;

	/// Parses `#RRGGBB`, `#RRGGBBAA` and `rgb()`/`rgba()` functional notation.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let err = || ColorParseError(s.to_string());
		let s = s.trim();

		if let Some(hex) = s.strip_prefix('#') {
			if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
				return Err(err());
			}
			let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
			let a = if hex.len() == 8 {
				channel(6)? as f64 / 255.0
			} else {
				1.0
			};
			return Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a));
		}

		let body = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))
			.and_then(|rest| rest.strip_suffix(')'))
			.ok_or_else(err)?;
		let parts: Vec<&str> = body.split(',').map(str::trim).collect();
		if parts.len() != 3 && parts.len() != 4 {
			return Err(err());
		}
		let channel = |i: usize| parts[i].parse::<u8>().map_err(|_| err());
		let a = match parts.get(3) {
			Some(a) => a.parse::<f64>().map_err(|_| err())?.clamp(0.0, 1.0),
			None => 1.0,
		};
		Ok(Color::rgba(channel(0)?, channel(1)?, channel(2)?, a))
	}
}

impl TryFrom<String> for Color {
	type Error = ColorParseError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

/// A palette entry with a relative pick weight.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Swatch {
	pub color: Color,
	#[serde(default = "default_weight")]
	pub weight: f64,
}

fn default_weight() -> f64 {
	1.0
}

/// Weighted color palette. Particles draw a color from it at creation and reset.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Palette {
	pub swatches: Vec<Swatch>,
}

impl Palette {
	/// A palette with one color.
	pub fn solid(color: Color) -> Self {
		Self {
			swatches: vec![Swatch { color, weight: 1.0 }],
		}
	}

	/// Mostly brand blue with the occasional dark speck, as in the flowing stream.
	pub fn stream() -> Self {
		Self {
			swatches: vec![
				Swatch {
					color: PRIMARY,
					weight: 0.9,
				},
				Swatch {
					color: Color::rgba(0, 0, 0, 0.6),
					weight: 0.1,
				},
			],
		}
	}

	/// Brand blue with a 30% share of light grey, used for emitted bunches.
	pub fn bunches() -> Self {
		Self {
			swatches: vec![
				Swatch {
					color: PRIMARY,
					weight: 0.7,
				},
				Swatch {
					color: Color::rgba(192, 192, 192, 0.8),
					weight: 0.3,
				},
			],
		}
	}

	/// Brand blue, dark and light grey in equal shares.
	pub fn rain() -> Self {
		Self {
			swatches: [
				PRIMARY,
				Color::rgba(0, 0, 0, 0.4),
				Color::rgba(200, 200, 200, 0.5),
			]
			.into_iter()
			.map(|color| Swatch { color, weight: 1.0 })
			.collect(),
		}
	}

	/// Grey baseline series followed by the brand blue uplift series.
	pub fn series() -> Self {
		Self {
			swatches: vec![
				Swatch {
					color: Color::rgba(150, 150, 150, 0.7),
					weight: 1.0,
				},
				Swatch {
					color: PRIMARY,
					weight: 1.0,
				},
			],
		}
	}

	/// Deterministic lookup used for tone-tagged targets.
	pub fn get(&self, index: usize) -> Color {
		if self.swatches.is_empty() {
			return PRIMARY;
		}
		self.swatches[index % self.swatches.len()].color
	}

	/// Weighted random pick.
	pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
		let total: f64 = self.swatches.iter().map(|s| s.weight.max(0.0)).sum();
		if total <= 0.0 {
			return self.get(0);
		}
		let mut roll = rng.r#gen::<f64>() * total;
		for swatch in &self.swatches {
			let w = swatch.weight.max(0.0);
			if roll < w {
				return swatch.color;
			}
			roll -= w;
		}
		self.get(self.swatches.len().saturating_sub(1))
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::solid(PRIMARY)
	}
}

/// Edge stroke style. The stroke color is taken from the first endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeStyle {
	/// Opacity multiplier applied on top of the computed edge opacity.
	pub opacity: f64,
	/// Line width in reference pixels.
	pub width: f64,
}

impl Default for EdgeStyle {
	fn default() -> Self {
		Self {
			opacity: 0.4,
			width: 1.0,
		}
	}
}

/// Static decorations drawn behind the particles every frame.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decoration {
	/// An L-shaped pair of chart axes along the left and bottom edges.
	Axes {
		color: Color,
		width: f64,
		/// Distance of the x axis from the bottom edge.
		bottom_inset: f64,
		/// Distance the x axis stops short of the right edge.
		right_inset: f64,
	},
}

/// Complete visual style of one field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldStyle {
	/// Solid fill drawn after clearing; `None` leaves the canvas transparent.
	pub background: Option<Color>,
	pub palette: Palette,
	/// Base particle radius in reference pixels.
	pub radius: f64,
	pub edge: EdgeStyle,
	/// Radius multiplier while the pointer hovers the canvas.
	pub hover_scale: f64,
	pub decorations: Vec<Decoration>,
}

impl Default for FieldStyle {
	fn default() -> Self {
		Self {
			background: None,
			palette: Palette::default(),
			radius: 4.0,
			edge: EdgeStyle::default(),
			hover_scale: 1.0,
			decorations: Vec::new(),
		}
	}
}
