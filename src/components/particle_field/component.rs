//! Leptos component wrapping a particle field canvas.
//!
//! The component sizes its canvas, builds the field state and hands both to a
//! [`FrameLoop`]. The loop lives in a local stored value, so disposing the
//! component's owner stops the animation and removes its listeners.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::config::FieldConfig;
use super::frame_loop::{FrameLoop, SharedField, Sizing};
use super::state::ParticleFieldState;

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Renders an animated particle field on a canvas element.
///
/// `pattern` selects the shape by key (a hero word, an icon pattern name);
/// changing it morphs the particles. `config` picks the engine preset and
/// defaults to the hero field. The canvas sizes itself to its parent unless
/// `fullscreen` or explicit `width`/`height` are given.
#[component]
pub fn ParticleCanvas(
	#[prop(into)] pattern: Signal<String>,
	#[prop(optional)] config: FieldConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let field: SharedField = Rc::new(RefCell::new(None));
	let frame_loop = StoredValue::new_local(None::<FrameLoop>);
	let sizing = Sizing {
		fullscreen,
		width,
		height,
	};

	let field_init = field.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = sizing.measure(&canvas, &window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			warn!("particle-morph: canvas has no 2d context");
			return;
		};

		let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
		let mut state = ParticleFieldState::new(config.clone(), w, h, seed);
		state.set_pattern(&pattern.get_untracked());
		*field_init.borrow_mut() = Some(state);

		frame_loop.set_value(FrameLoop::start(field_init.clone(), ctx, canvas, sizing));
	});

	let field_pattern = field.clone();
	Effect::new(move |_| {
		let key = pattern.get();
		if let Some(ref mut state) = *field_pattern.borrow_mut() {
			state.set_pattern(&key);
		}
	});

	let field_enter = field.clone();
	let on_mouseenter = move |_: MouseEvent| {
		if let Some(ref mut state) = *field_enter.borrow_mut() {
			state.set_hovered(true);
		}
	};

	let field_leave = field.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut state) = *field_leave.borrow_mut() {
			state.set_hovered(false);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-canvas"
			on:mouseenter=on_mouseenter
			on:mouseleave=on_mouseleave
			style="display: block;"
		/>
	}
}
