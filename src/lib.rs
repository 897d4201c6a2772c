//! particle-morph: canvas particle fields that morph between generated shapes.
//!
//! This crate provides the particle engine behind the site's decorative
//! canvases: a hero field morphing between word shapes, particle icons, flowing
//! backdrops and chart reveals. It compiles to WASM with Leptos and also runs
//! headless for tests.

use std::time::Duration;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::particle_field::{
	ConfigDocument, FieldConfig, IconKind, ParticleCanvas, ParticleFieldState, Preset,
};

/// Words the hero cycles through, each bound to a shape.
const HERO_WORDS: [&str; 5] = ["Human", "Product", "Process", "Usage", "Transaction"];

const HERO_INTERVAL: Duration = Duration::from_millis(3000);

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("particle-morph: logging initialized");
}

/// Parse a field configuration document.
///
/// Accepts either `{ "preset": { "name": ... } }` or a full configuration;
/// missing fields take the hero defaults and unknown fields are an error.
pub fn parse_field_config(json: &str) -> Result<FieldConfig, serde_json::Error> {
	serde_json::from_str::<ConfigDocument>(json).map(ConfigDocument::into_config)
}

/// Load the hero configuration from a script element with id="particle-config".
fn load_field_config() -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("particle-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match parse_field_config(&json_text) {
		Ok(config) => {
			info!("particle-morph: loaded field config from page");
			Some(config)
		}
		Err(e) => {
			warn!("particle-morph: failed to parse field config: {}", e);
			None
		}
	}
}

/// Word following `current` in the hero cycle.
fn next_word(current: &str) -> &'static str {
	let index = HERO_WORDS.iter().position(|w| *w == current).unwrap_or(0);
	HERO_WORDS[(index + 1) % HERO_WORDS.len()]
}

/// Main application component.
/// Mounts the hero field, cycling its word, above a row of particle icons.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let hero_config = load_field_config().unwrap_or_default();
	let (word, set_word) = signal(HERO_WORDS[0].to_string());
	set_interval(
		move || set_word.update(|w| *w = next_word(w).to_string()),
		HERO_INTERVAL,
	);

	let icons = IconKind::ALL
		.into_iter()
		.map(|kind| {
			let config = FieldConfig::icon(kind, components::particle_field::theme::PRIMARY);
			view! {
				<div class="particle-icon">
					<ParticleCanvas
						pattern=Signal::stored(String::new())
						config=config
						width=Some(120.0)
						height=Some(120.0)
					/>
				</div>
			}
		})
		.collect_view();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="particle-morph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="hero-field">
			<ParticleCanvas pattern=word config=hero_config fullscreen=true />
		</div>
		<div class="icon-row">{icons}</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hero_words_cycle() {
		assert_eq!(next_word("Human"), "Product");
		assert_eq!(next_word("Transaction"), "Human");
		assert_eq!(next_word("unknown"), "Product");
	}

	#[test]
	fn config_documents_parse() {
		let config = parse_field_config(r#"{ "preset": { "name": "network" } }"#).unwrap();
		assert_eq!(config, FieldConfig::network());
		assert!(parse_field_config("{ not json").is_err());
		assert!(parse_field_config(r#"{ "preset": { "name": "netwrok" } }"#).is_err());
	}
}
