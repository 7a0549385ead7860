use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, Window};

use super::render;
use super::state::ProjectorState;
use crate::options::{OptionsStore, Subscription};

type Slot<T> = Rc<RefCell<Option<T>>>;

fn viewport(window: &Window) -> (f64, f64) {
	let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(extent(window.inner_width()), extent(window.inner_height()))
}

fn toggle_fullscreen(window: &Window) {
	let Some(doc) = window.document() else {
		return;
	};
	if doc.fullscreen_element().is_some() {
		let _ = doc.exit_fullscreen();
	} else if let Some(root) = doc.document_element() {
		let _ = root.request_fullscreen();
	}
}

/// The projector's live resources: paint loop, window listeners and the
/// options subscription. [`FrameLoop::stop`] releases all of them.
struct FrameLoop {
	window: Window,
	state: Slot<ProjectorState>,
	animate: Slot<Closure<dyn FnMut()>>,
	resize_cb: Slot<Closure<dyn FnMut()>>,
	key_cb: Slot<Closure<dyn FnMut(KeyboardEvent)>>,
	subscription: Slot<Subscription>,
	frame_id: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	fn start(canvas: &HtmlCanvasElement) -> Option<Self> {
		let Some(window) = web_sys::window() else {
			error!("projector: no window");
			return None;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("projector: 2d context unavailable");
			return None;
		};

		let (w, h) = viewport(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let store = OptionsStore::local();
		let this = Self {
			window: window.clone(),
			state: Rc::new(RefCell::new(Some(ProjectorState::new(store.load(), w, h)))),
			animate: Rc::new(RefCell::new(None)),
			resize_cb: Rc::new(RefCell::new(None)),
			key_cb: Rc::new(RefCell::new(None)),
			subscription: Rc::new(RefCell::new(None)),
			frame_id: Rc::new(Cell::new(None)),
		};

		let state_sub = this.state.clone();
		*this.subscription.borrow_mut() = Some(store.subscribe(move |options| {
			if let Some(ref mut s) = *state_sub.borrow_mut() {
				s.apply_snapshot(options);
			}
		}));

		let (state_resize, canvas_resize) = (this.state.clone(), canvas.clone());
		*this.resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = viewport(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *this.resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		*this.key_cb.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if ev.key().eq_ignore_ascii_case("f") {
				ev.prevent_default();
				if let Some(win) = web_sys::window() {
					toggle_fullscreen(&win);
				}
			}
		}));
		if let Some(ref cb) = *this.key_cb.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, frame_inner) =
			(this.state.clone(), this.animate.clone(), this.frame_id.clone());
		*this.animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *this.animate.borrow() {
			this.frame_id
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
		info!("projector loop started at {w}x{h}");
		Some(this)
	}

	fn is_running(&self) -> bool {
		self.animate.borrow().is_some()
	}

	fn stop(&self) {
		if !self.is_running() {
			return;
		}
		if let Some(id) = self.frame_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		if let Some(cb) = self.resize_cb.borrow_mut().take() {
			let _ = self
				.window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		if let Some(cb) = self.key_cb.borrow_mut().take() {
			let _ = self
				.window
				.remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}
		if let Some(subscription) = self.subscription.borrow_mut().take() {
			subscription.unsubscribe();
		}
		self.animate.borrow_mut().take();
		self.state.borrow_mut().take();
		info!("projector loop stopped");
	}
}

/// Full-window canvas that paints the threads every animation frame.
///
/// Reads the shared options once at mount and again after every change made
/// from the tablet. `f` toggles fullscreen. Everything is released when the
/// component unmounts.
#[component]
pub fn ThreadCanvas() -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(frame_loop) = FrameLoop::start(&canvas) else {
			return;
		};
		let frame_loop = SendWrapper::new(frame_loop);
		on_cleanup(move || frame_loop.stop());
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="thread-canvas"
			style="display: block; background: rgb(8, 10, 18);"
		/>
	}
}
