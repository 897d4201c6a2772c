//! Browser animation loop of one canvas.
//!
//! A [`FrameLoop`] owns the `requestAnimationFrame` callback and the window
//! resize listener of its canvas. Dropping it cancels the pending frame,
//! removes the listener and releases the self-referencing callback.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::render;
use super::state::ParticleFieldState;

/// Seconds advanced per animation frame.
pub const FRAME_DT: f64 = 0.016;

const FALLBACK_WIDTH: f64 = 800.0;
const FALLBACK_HEIGHT: f64 = 600.0;

/// Field state shared between a component and its frame loop.
pub type SharedField = Rc<RefCell<Option<ParticleFieldState>>>;

/// How a canvas derives its pixel size.
///
/// Explicit dimensions win; otherwise the canvas fills the viewport
/// (`fullscreen`) or its parent element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sizing {
	pub fullscreen: bool,
	pub width: Option<f64>,
	pub height: Option<f64>,
}

impl Sizing {
	pub fn measure(&self, canvas: &HtmlCanvasElement, window: &Window) -> (f64, f64) {
		if self.fullscreen {
			let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
			return (
				self.width.unwrap_or_else(|| inner(window.inner_width())),
				self.height.unwrap_or_else(|| inner(window.inner_height())),
			);
		}
		let parent = canvas.parent_element();
		(
			self.width.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_width() as f64)
					.unwrap_or(FALLBACK_WIDTH)
			}),
			self.height.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_height() as f64)
					.unwrap_or(FALLBACK_HEIGHT)
			}),
		)
	}
}

/// A running animation loop; dropping it stops the loop and detaches the
/// resize listener.
pub struct FrameLoop {
	window: Window,
	frame: Rc<Cell<Option<i32>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize: Option<Closure<dyn FnMut()>>,
}

impl FrameLoop {
	/// Start animating `field` onto `ctx`, resizing `canvas` with the window.
	pub fn start(
		field: SharedField,
		mut ctx: CanvasRenderingContext2d,
		canvas: HtmlCanvasElement,
		sizing: Sizing,
	) -> Option<Self> {
		let window = web_sys::window()?;
		let frame: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

		let (field_anim, frame_anim, animate_inner, window_anim) =
			(field.clone(), frame.clone(), animate.clone(), window.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			frame_anim.set(None);
			if let Some(ref mut state) = *field_anim.borrow_mut() {
				render::frame(state, &mut ctx, FRAME_DT);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				frame_anim.set(
					window_anim
						.request_animation_frame(cb.as_ref().unchecked_ref())
						.ok(),
				);
			}
		}));

		let resize: Closure<dyn FnMut()> = Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (w, h) = sizing.measure(&canvas, &win);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			if let Some(ref mut state) = *field.borrow_mut() {
				state.resize(w, h);
			}
		});
		let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());

		if let Some(ref cb) = *animate.borrow() {
			frame.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
		debug!("particle-morph: frame loop started");

		Some(Self {
			window,
			frame,
			animate,
			resize: Some(resize),
		})
	}

	/// Cancel the pending frame and detach from the window. Idempotent.
	pub fn stop(&mut self) {
		if let Some(handle) = self.frame.take() {
			let _ = self.window.cancel_animation_frame(handle);
		}
		if self.animate.borrow_mut().take().is_some() {
			debug!("particle-morph: frame loop stopped");
		}
		if let Some(cb) = self.resize.take() {
			let _ = self
				.window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}
