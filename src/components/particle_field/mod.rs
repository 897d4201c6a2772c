//! Canvas particle fields that morph between generated shapes.
//!
//! A field is one engine parameterized by a [`FieldConfig`]:
//! - Pattern registry producing named target shapes for any surface size
//! - Bounded particle pool with a seeking / converged / fading lifecycle
//! - Easing, spring and drift motion models
//! - Proximity edges (all pairs, k-nearest, pre-linked) with reveal progress
//! - Burst, bunch and stream emission schedules
//!
//! The simulation ([`ParticleFieldState`]) and drawing ([`render::frame`]) run
//! headless against any [`Surface`]; [`ParticleCanvas`] wires them to a browser
//! canvas.
//!
//! # Example
//!
//! ```ignore
//! use particle_morph::{FieldConfig, ParticleCanvas};
//!
//! let (word, set_word) = signal("Human".to_string());
//! view! { <ParticleCanvas pattern=word config=FieldConfig::hero() /> }
//! ```

mod component;
pub mod config;
pub mod edges;
pub mod emitter;
pub mod frame_loop;
pub mod idle;
pub mod motion;
pub mod particles;
pub mod patterns;
mod random;
pub mod render;
pub mod scale;
mod state;
pub mod surface;
pub mod theme;
mod types;

pub use component::ParticleCanvas;
pub use config::{ConfigDocument, FieldConfig, IconKind, Preset};
pub use patterns::{AnchorPolicy, PatternRegistry, PatternRequest};
pub use state::ParticleFieldState;
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use theme::Color;
pub use types::{Point, Size, Target};
