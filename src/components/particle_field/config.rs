//! Field configuration and the site's presets.
//!
//! Every canvas on the site is the same engine with a different
//! [`FieldConfig`]. Presets are plain constructors; pages can also ship a JSON
//! document (see [`ConfigDocument`]) naming a preset or spelling out a full
//! configuration.

use serde::Deserialize;

use super::edges::{EdgeConfig, EdgePolicy, EdgeScope};
use super::emitter::{BunchConfig, BurstConfig, Emission, FallConfig, StreamConfig};
use super::idle::{IdleLayer, IdleMotion};
use super::motion::MotionModel;
use super::particles::{Lifecycle, LifecycleConfig};
use super::patterns::{Anchor, AnchorPolicy, DEFAULT_MARGIN, DEFAULT_PATTERN};
use super::scale::{ScaleBehavior, ScaleConfig};
use super::theme::{Color, Decoration, EdgeStyle, FieldStyle, PRIMARY, Palette};

/// Binds a page-level key (such as a hero word) to a pattern.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PatternBinding {
	pub key: String,
	pub pattern: String,
	#[serde(default)]
	pub count: Option<usize>,
	#[serde(default)]
	pub anchor: Option<AnchorPolicy>,
	/// Size multiplier applied to the shape, not to its margin.
	#[serde(default = "unit_zoom")]
	pub zoom: f64,
}

fn unit_zoom() -> f64 {
	1.0
}

impl PatternBinding {
	pub fn new(key: &str, pattern: &str) -> Self {
		Self {
			key: key.to_string(),
			pattern: pattern.to_string(),
			count: None,
			anchor: None,
			zoom: 1.0,
		}
	}

	pub fn anchored(mut self, anchor: AnchorPolicy) -> Self {
		self.anchor = Some(anchor);
		self
	}

	/// Draw the shape `zoom` times its usual size.
	pub fn zoomed(mut self, zoom: f64) -> Self {
		self.zoom = zoom;
		self
	}
}

/// A pattern lookup resolved from a key.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPattern {
	pub pattern: String,
	pub count: usize,
	pub anchor: AnchorPolicy,
	pub zoom: f64,
}

/// Patterns a field can morph between.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatternBook {
	pub bindings: Vec<PatternBinding>,
	/// Key used before any key was set, or when the key is empty.
	pub default_key: String,
	pub anchor: AnchorPolicy,
	/// Edge margin in reference pixels.
	pub margin: f64,
	pub count: usize,
}

impl Default for PatternBook {
	fn default() -> Self {
		Self {
			bindings: Vec::new(),
			default_key: DEFAULT_PATTERN.to_string(),
			anchor: AnchorPolicy::centered(),
			margin: DEFAULT_MARGIN,
			count: 40,
		}
	}
}

impl PatternBook {
	/// A book with no bindings; keys are pattern names.
	pub fn single(pattern: &str, count: usize) -> Self {
		Self {
			default_key: pattern.to_string(),
			count,
			..Self::default()
		}
	}

	/// Resolve a key. Unbound keys are used as pattern names directly.
	pub fn resolve(&self, key: &str) -> ResolvedPattern {
		let key = if key.is_empty() { self.default_key.as_str() } else { key };
		match self.bindings.iter().find(|b| b.key == key) {
			Some(binding) => ResolvedPattern {
				pattern: binding.pattern.clone(),
				count: binding.count.unwrap_or(self.count),
				anchor: binding.anchor.clone().unwrap_or_else(|| self.anchor.clone()),
				zoom: binding.zoom,
			},
			None => ResolvedPattern {
				pattern: key.to_string(),
				count: self.count,
				anchor: self.anchor.clone(),
				zoom: 1.0,
			},
		}
	}
}

/// Where newly created pattern particles start.
///
/// Applies to the first population; particles added by a later morph are
/// always scattered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnMode {
	/// On the target itself.
	#[default]
	AtTarget,
	/// Anywhere on the surface.
	Scattered,
	/// Around the target, within `spread` pixels on each axis.
	NearTarget { spread: f64 },
}

/// Full configuration of one particle field.
///
/// Unknown keys are rejected, so a document that is neither a known preset
/// nor a valid configuration fails to parse.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
	pub scale: ScaleConfig,
	/// Pattern set; `None` for purely emitted fields.
	pub patterns: Option<PatternBook>,
	pub spawn: SpawnMode,
	/// Random initial speed of pattern particles.
	pub initial_speed: f64,
	pub motion: MotionModel,
	pub lifecycle: LifecycleConfig,
	pub edges: EdgeConfig,
	pub emission: Emission,
	/// Per-frame reveal increment; `None` shows everything at once.
	pub reveal_speed: Option<f64>,
	pub idle: Vec<IdleLayer>,
	pub capacity: usize,
	pub style: FieldStyle,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self::hero()
	}
}

/// The icons the site draws with particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
	Search,
	Trending,
	Scale,
	Target,
	Settings,
	Activity,
	Refresh,
	MagnifyingData,
	NetworkNodes,
	ValueGrowth,
	ImpactCurve,
}

impl IconKind {
	pub const ALL: [IconKind; 11] = [
		IconKind::Search,
		IconKind::Trending,
		IconKind::Scale,
		IconKind::Target,
		IconKind::Settings,
		IconKind::Activity,
		IconKind::Refresh,
		IconKind::MagnifyingData,
		IconKind::NetworkNodes,
		IconKind::ValueGrowth,
		IconKind::ImpactCurve,
	];

	pub fn pattern(self) -> &'static str {
		match self {
			IconKind::Search => "magnifying_glass",
			IconKind::Trending => "arrow_up",
			IconKind::Scale => "balance_scale",
			IconKind::Target => "target_circles",
			IconKind::Settings => "gear_teeth",
			IconKind::Activity => "bar_chart",
			IconKind::Refresh => "circular_arrow",
			IconKind::MagnifyingData => "magnifying_data",
			IconKind::NetworkNodes => "network_nodes",
			IconKind::ValueGrowth => "value_growth",
			IconKind::ImpactCurve => "impact_curve",
		}
	}

	pub fn idle(self) -> Vec<IdleLayer> {
		let pulse = |speed, phase_step, amount| IdleMotion::Pulse {
			speed,
			phase_step,
			amount,
			horizontal_only: false,
		};
		let bob = |speed, phase_step, amplitude| IdleMotion::Bob {
			speed,
			phase_step,
			amplitude,
		};
		match self {
			IconKind::Search => vec![IdleLayer::new(pulse(3.0, 0.5, 0.1))],
			IconKind::Trending => vec![IdleLayer::new(bob(2.0, 0.3, 3.0))],
			IconKind::Scale => vec![IdleLayer::new(IdleMotion::Sway {
				speed: 1.5,
				phase_step: 0.2,
				amplitude_x: 2.0,
				amplitude_y: 1.0,
			})],
			IconKind::Target => vec![IdleLayer::new(pulse(2.0, 0.8, 0.15))],
			IconKind::Settings => vec![IdleLayer::new(IdleMotion::Rotate { speed: 0.5 })],
			IconKind::Activity => vec![IdleLayer::new(IdleMotion::Bounce {
				speed: 3.0,
				phase_step: 0.4,
				height: 5.0,
			})],
			IconKind::Refresh => vec![IdleLayer::new(IdleMotion::Rotate { speed: 1.2 })],
			IconKind::MagnifyingData => vec![
				IdleLayer::new(pulse(4.0, 0.3, 0.2)),
				IdleLayer::new(IdleMotion::Rotate { speed: 0.8 }).only(18..24),
			],
			IconKind::NetworkNodes => vec![IdleLayer::new(pulse(2.5, 0.4, 0.1))],
			IconKind::ValueGrowth => vec![
				IdleLayer::new(bob(3.0, 0.6, 2.0)),
				IdleLayer::new(IdleMotion::Pulse {
					speed: 2.0,
					phase_step: 0.4,
					amount: 0.05,
					horizontal_only: true,
				}),
			],
			IconKind::ImpactCurve => vec![IdleLayer::new(bob(2.0, 0.3, 2.0))],
		}
	}
}

/// Serialized configuration shipped by a page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigDocument {
	Preset { preset: Preset },
	Full(Box<FieldConfig>),
}

impl ConfigDocument {
	pub fn into_config(self) -> FieldConfig {
		match self {
			ConfigDocument::Preset { preset } => preset.config(),
			ConfigDocument::Full(config) => *config,
		}
	}
}

/// Named presets, as they appear in JSON.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Preset {
	Hero,
	Icon {
		kind: IconKind,
		#[serde(default)]
		color: Option<Color>,
	},
	FlowStream,
	FlowBunches,
	FlowMobile,
	Rain,
	Network,
	Impact,
	Burst,
}

impl Preset {
	pub fn config(&self) -> FieldConfig {
		match self {
			Preset::Hero => FieldConfig::hero(),
			Preset::Icon { kind, color } => FieldConfig::icon(*kind, color.unwrap_or(PRIMARY)),
			Preset::FlowStream => FieldConfig::flow_stream(),
			Preset::FlowBunches => FieldConfig::flow_bunches(),
			Preset::FlowMobile => FieldConfig::flow_mobile(),
			Preset::Rain => FieldConfig::rain(),
			Preset::Network => FieldConfig::network(),
			Preset::Impact => FieldConfig::impact(),
			Preset::Burst => FieldConfig::burst(),
		}
	}
}

impl FieldConfig {
	/// Word-morphing hero canvas: one shape per word, beside the headline.
	pub fn hero() -> Self {
		let process = AnchorPolicy {
			desktop: Anchor::new(0.675, 0.5),
			..AnchorPolicy::beside_text()
		};
		Self {
			scale: ScaleConfig::default(),
			patterns: Some(PatternBook {
				bindings: vec![
					PatternBinding::new("Human", "concentric_rings").zoomed(1.3),
					PatternBinding::new("Product", "cube_projection"),
					PatternBinding::new("Process", "wave").anchored(process),
					PatternBinding::new("Usage", "golden_spiral"),
					PatternBinding::new("Transaction", "constellation"),
				],
				default_key: "Human".to_string(),
				anchor: AnchorPolicy::beside_text(),
				margin: DEFAULT_MARGIN,
				count: 40,
			}),
			spawn: SpawnMode::AtTarget,
			initial_speed: 0.0,
			motion: MotionModel::Easing { factor: 0.08 },
			lifecycle: LifecycleConfig::default(),
			edges: EdgeConfig {
				policy: EdgePolicy::AllPairs { threshold: 50.0 },
				scope: EdgeScope::Global,
				hover_only: false,
			},
			emission: Emission::None,
			reveal_speed: None,
			idle: Vec::new(),
			capacity: 150,
			style: FieldStyle {
				radius: 4.0,
				edge: EdgeStyle {
					opacity: 0.4,
					width: 0.4,
				},
				..FieldStyle::default()
			},
		}
	}

	/// Small icon drawn from its shape, animated while idle.
	pub fn icon(kind: IconKind, color: Color) -> Self {
		Self {
			scale: ScaleConfig {
				reference_size: 120.0,
				size: ScaleBehavior::Proportional,
				distance: ScaleBehavior::Fixed,
			},
			patterns: Some(PatternBook {
				margin: 3.0,
				..PatternBook::single(kind.pattern(), 0)
			}),
			spawn: SpawnMode::Scattered,
			initial_speed: 2.0,
			motion: MotionModel::Easing { factor: 0.1 },
			lifecycle: LifecycleConfig::default(),
			edges: EdgeConfig {
				policy: EdgePolicy::AllPairs { threshold: 40.0 },
				scope: EdgeScope::Global,
				hover_only: true,
			},
			emission: Emission::None,
			reveal_speed: None,
			idle: kind.idle(),
			capacity: 150,
			style: FieldStyle {
				palette: Palette::solid(color),
				radius: 1.0,
				edge: EdgeStyle {
					opacity: 80.0 / 255.0,
					width: 0.5,
				},
				hover_scale: 1.5,
				..FieldStyle::default()
			},
		}
	}

	/// Background stream flowing in from the left and dissolving mid-screen.
	pub fn flow_stream() -> Self {
		Self {
			scale: ScaleConfig::fixed(),
			patterns: None,
			spawn: SpawnMode::AtTarget,
			initial_speed: 0.0,
			motion: MotionModel::Spring {
				stiffness: 0.03,
				damping_x: 0.95,
				damping_y: 0.97,
				jitter: 0.0,
				normalize: true,
				settle_drag: 0.8,
			},
			lifecycle: LifecycleConfig {
				policy: Lifecycle::Recycle,
				epsilon: 15.0,
				fade_rate: 0.01,
			},
			edges: EdgeConfig::default(),
			emission: Emission::Stream(StreamConfig::default()),
			reveal_speed: None,
			idle: Vec::new(),
			capacity: 150,
			style: FieldStyle {
				palette: Palette::stream(),
				radius: 1.0,
				..FieldStyle::default()
			},
		}
	}

	/// Narrow-screen stream: particles fall from the top and fade out in the
	/// bottom fifth.
	pub fn flow_mobile() -> Self {
		Self::falling(FallConfig::default(), Palette::solid(PRIMARY))
	}

	/// Sparse rain across the whole surface.
	pub fn rain() -> Self {
		Self::falling(FallConfig::rain(), Palette::rain())
	}

	fn falling(fall: FallConfig, palette: Palette) -> Self {
		Self {
			scale: ScaleConfig::fixed(),
			patterns: None,
			spawn: SpawnMode::AtTarget,
			initial_speed: 0.0,
			motion: MotionModel::Drift {
				damping: 1.0,
				wrap: false,
			},
			lifecycle: LifecycleConfig {
				policy: Lifecycle::Recycle,
				epsilon: 0.0,
				fade_rate: 0.01,
			},
			edges: EdgeConfig::default(),
			emission: Emission::Fall(fall),
			reveal_speed: None,
			idle: Vec::new(),
			capacity: 150,
			style: FieldStyle {
				palette,
				radius: 1.0,
				..FieldStyle::default()
			},
		}
	}

	/// Linked bunches drifting off to the right.
	pub fn flow_bunches() -> Self {
		Self {
			scale: ScaleConfig::fixed(),
			patterns: None,
			spawn: SpawnMode::AtTarget,
			initial_speed: 0.0,
			motion: MotionModel::Spring {
				stiffness: 0.0003,
				damping_x: 0.9,
				damping_y: 0.94,
				jitter: 0.05,
				normalize: false,
				settle_drag: 0.92,
			},
			lifecycle: LifecycleConfig {
				policy: Lifecycle::Remove,
				epsilon: 25.0,
				fade_rate: 0.008,
			},
			edges: EdgeConfig {
				policy: EdgePolicy::Linked { threshold: 120.0 },
				scope: EdgeScope::Group,
				hover_only: false,
			},
			emission: Emission::Bunches(BunchConfig::default()),
			reveal_speed: None,
			idle: Vec::new(),
			capacity: 150,
			style: FieldStyle {
				palette: Palette::bunches(),
				radius: 1.0,
				edge: EdgeStyle {
					opacity: 0.5,
					width: 2.0,
				},
				..FieldStyle::default()
			},
		}
	}

	/// White constellation drifting slowly on black, wrapping at the edges.
	pub fn network() -> Self {
		Self {
			scale: ScaleConfig::fixed(),
			patterns: Some(PatternBook {
				margin: 0.0,
				..PatternBook::single("scatter", 100)
			}),
			spawn: SpawnMode::AtTarget,
			initial_speed: 0.5,
			motion: MotionModel::Drift {
				damping: 1.0,
				wrap: true,
			},
			lifecycle: LifecycleConfig {
				policy: Lifecycle::Hold,
				epsilon: 0.0,
				fade_rate: 0.01,
			},
			edges: EdgeConfig {
				policy: EdgePolicy::AllPairs { threshold: 120.0 },
				scope: EdgeScope::Global,
				hover_only: false,
			},
			emission: Emission::None,
			reveal_speed: None,
			idle: Vec::new(),
			capacity: 150,
			style: FieldStyle {
				background: Some(Color::rgb(0, 0, 0)),
				palette: Palette::solid(Color::rgb(255, 255, 255)),
				radius: 2.0,
				edge: EdgeStyle {
					opacity: 1.0,
					width: 1.0,
				},
				..FieldStyle::default()
			},
		}
	}

	/// Baseline and uplift growth curves drawn in over time on chart axes.
	pub fn impact() -> Self {
		Self {
			scale: ScaleConfig::fixed(),
			patterns: Some(PatternBook {
				margin: 0.0,
				..PatternBook::single("uplift_series", 120)
			}),
			spawn: SpawnMode::NearTarget { spread: 10.0 },
			initial_speed: 0.3,
			motion: MotionModel::Spring {
				stiffness: 0.002,
				damping_x: 1.0,
				damping_y: 1.0,
				jitter: 0.01,
				normalize: false,
				settle_drag: 1.0,
			},
			lifecycle: LifecycleConfig {
				policy: Lifecycle::Hold,
				epsilon: 0.0,
				fade_rate: 0.01,
			},
			edges: EdgeConfig {
				policy: EdgePolicy::KNearest {
					k: 3,
					threshold: 62.0,
				},
				scope: EdgeScope::Group,
				hover_only: false,
			},
			emission: Emission::None,
			reveal_speed: Some(0.008),
			idle: Vec::new(),
			capacity: 240,
			style: FieldStyle {
				palette: Palette::series(),
				radius: 2.0,
				edge: EdgeStyle {
					opacity: 0.4,
					width: 1.0,
				},
				decorations: vec![Decoration::Axes {
					color: Color::rgb(0, 0, 0),
					width: 3.0,
					bottom_inset: 30.0,
					right_inset: 80.0,
				}],
				..FieldStyle::default()
			},
		}
	}

	/// Radial burst behind a headline.
	pub fn burst() -> Self {
		Self {
			scale: ScaleConfig::fixed(),
			patterns: None,
			spawn: SpawnMode::AtTarget,
			initial_speed: 0.0,
			motion: MotionModel::Drift {
				damping: 0.96,
				wrap: false,
			},
			lifecycle: LifecycleConfig {
				policy: Lifecycle::Remove,
				epsilon: 0.0,
				fade_rate: 0.015,
			},
			edges: EdgeConfig::default(),
			emission: Emission::Burst(BurstConfig::default()),
			reveal_speed: None,
			idle: Vec::new(),
			capacity: 150,
			style: FieldStyle {
				radius: 1.0,
				..FieldStyle::default()
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::patterns::PatternRegistry;

	#[test]
	fn hero_words_resolve_to_their_shapes() {
		let book = FieldConfig::hero().patterns.unwrap();
		assert_eq!(book.resolve("Product").pattern, "cube_projection");
		assert_eq!(book.resolve("").pattern, "concentric_rings");
		let process = book.resolve("Process");
		assert_eq!(process.pattern, "wave");
		assert_eq!(process.anchor.desktop, Anchor::new(0.675, 0.5));
		assert_eq!(book.resolve("Usage").anchor, AnchorPolicy::beside_text());
		assert_eq!(book.resolve("Human").zoom, 1.3);
		assert_eq!(book.resolve("Usage").zoom, 1.0);
	}

	#[test]
	fn unbound_keys_are_pattern_names() {
		let book = FieldConfig::hero().patterns.unwrap();
		let resolved = book.resolve("hexagon");
		assert_eq!(resolved.pattern, "hexagon");
		assert_eq!(resolved.count, 40);
	}

	#[test]
	fn pattern_presets_fit_their_capacity() {
		let registry = PatternRegistry::builtin();
		for config in [FieldConfig::hero(), FieldConfig::network(), FieldConfig::impact()] {
			let book = config.patterns.clone().unwrap();
			let keys = std::iter::once(book.default_key.as_str())
				.chain(book.bindings.iter().map(|b| b.key.as_str()));
			for key in keys {
				let resolved = book.resolve(key);
				assert!(registry.documented_count(&resolved.pattern, resolved.count) <= config.capacity);
			}
		}
	}

	#[test]
	fn every_icon_pattern_is_registered() {
		let registry = PatternRegistry::builtin();
		for kind in IconKind::ALL {
			assert!(registry.contains(kind.pattern()), "{kind:?}");
			assert!(!kind.idle().is_empty());
		}
	}

	#[test]
	fn presets_parse_from_json() {
		let doc: ConfigDocument =
			serde_json::from_str(r#"{ "preset": { "name": "flow_bunches" } }"#).unwrap();
		assert_eq!(doc.into_config(), FieldConfig::flow_bunches());

		let doc: ConfigDocument = serde_json::from_str(
			r##"{ "preset": { "name": "icon", "kind": "value_growth", "color": "#ff0000" } }"##,
		)
		.unwrap();
		let config = doc.into_config();
		assert_eq!(config.style.palette, Palette::solid(Color::rgb(255, 0, 0)));
		assert_eq!(config.idle, IconKind::ValueGrowth.idle());
	}

	#[test]
	fn falling_presets_fit_their_capacity() {
		let doc: ConfigDocument = serde_json::from_str(r#"{ "preset": { "name": "rain" } }"#).unwrap();
		assert_eq!(doc.into_config(), FieldConfig::rain());
		for config in [FieldConfig::flow_mobile(), FieldConfig::rain()] {
			let Emission::Fall(fall) = &config.emission else {
				panic!("not a falling field");
			};
			assert!(fall.count <= config.capacity);
		}
	}

	#[test]
	fn misspelled_documents_are_rejected() {
		let preset =
			serde_json::from_str::<ConfigDocument>(r#"{ "preset": { "name": "netwrok" } }"#);
		assert!(preset.is_err());
		let field = serde_json::from_str::<ConfigDocument>(r#"{ "capacty": 12 }"#);
		assert!(field.is_err());
	}

	#[test]
	fn full_documents_fill_in_defaults() {
		let doc: ConfigDocument = serde_json::from_str(
			r#"{
				"motion": { "kind": "drift", "damping": 0.9, "wrap": false },
				"edges": { "policy": { "kind": "k_nearest", "k": 2, "threshold": 30.0 } },
				"capacity": 12
			}"#,
		)
		.unwrap();
		let config = doc.into_config();
		assert_eq!(
			config.motion,
			MotionModel::Drift {
				damping: 0.9,
				wrap: false
			}
		);
		assert_eq!(config.edges.scope, EdgeScope::Global);
		assert_eq!(config.capacity, 12);
		assert_eq!(config.patterns, FieldConfig::hero().patterns);
	}
}
