//! Browser side of the render engine.
//!
//! [`DomHost`] finds the container and creates a canvas inside it. The
//! resulting [`CanvasSurface`] draws through [`render::render`] and, once wired,
//! owns the mouse/wheel/resize listeners and the `requestAnimationFrame` loop
//! that drive the engine. Dropping the surface removes all of them together
//! with the canvas, so destroying an engine instance leaves the page clean.
//!
//! [`GraphView`] renders the container and the two trigger buttons and starts
//! the availability poll once mounted.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Element, Event, EventTarget, HtmlCanvasElement, MouseEvent,
	WheelEvent, Window,
};

use super::engine::{Host, RenderEngine, Surface};
use super::generator::RandomGraphGenerator;
use super::render;
use super::scale::ScaleConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::Graph;
use crate::config::AppConfig;
use crate::error::EngineError;
use crate::lifecycle::{Availability, LifecycleManager, TriggerOutcome};

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);
const FRAME_DT: f32 = 0.016;

type Manager = LifecycleManager<DomHost>;

/// Locates the graph container in the live document.
pub struct DomHost {
	container_id: String,
}

impl DomHost {
	pub fn new(container_id: impl Into<String>) -> Self {
		Self {
			container_id: container_id.into(),
		}
	}

	fn container(&self) -> Option<Element> {
		web_sys::window()?
			.document()?
			.get_element_by_id(&self.container_id)
	}
}

fn missing(what: &str) -> EngineError {
	EngineError::MissingDependency(what.to_owned())
}

impl Host for DomHost {
	type Surface = CanvasSurface;

	fn container_id(&self) -> &str {
		&self.container_id
	}

	fn check_available(&self) -> Result<(), EngineError> {
		let window = web_sys::window().ok_or_else(|| missing("no window"))?;
		let document = window.document().ok_or_else(|| missing("no document"))?;
		if document.ready_state() == "loading" {
			return Err(missing("document still loading"));
		}
		let canvas_api =
			js_sys::Reflect::has(&window, &JsValue::from_str("CanvasRenderingContext2D"))
				.unwrap_or(false);
		if !canvas_api {
			return Err(missing("2d canvas API not present"));
		}
		if !self.has_container() {
			return Err(EngineError::MissingContainer(self.container_id.clone()));
		}
		Ok(())
	}

	fn has_container(&self) -> bool {
		self.container().is_some()
	}

	fn bind(&self) -> Result<CanvasSurface, EngineError> {
		let container = self
			.container()
			.ok_or_else(|| EngineError::MissingContainer(self.container_id.clone()))?;
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| missing("no document"))?;

		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.ok()
			.and_then(|el| el.dyn_into().ok())
			.ok_or_else(|| missing("cannot create canvas"))?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
			.ok_or_else(|| missing("no 2d context"))?;

		let (width, height) = container_size(&container);
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		let _ = canvas.set_attribute("class", "force-graph-canvas");
		let _ = canvas.set_attribute("style", "display: block; cursor: grab;");
		container
			.append_child(&canvas)
			.map_err(|_| missing("cannot attach canvas"))?;

		debug!("graph-playground: canvas bound to #{}", self.container_id);
		Ok(CanvasSurface {
			canvas,
			container,
			ctx,
			wiring: None,
		})
	}
}

fn container_size(container: &Element) -> (f64, f64) {
	let (w, h) = (container.client_width(), container.client_height());
	if w > 0 && h > 0 {
		(w as f64, h as f64)
	} else {
		FALLBACK_SIZE
	}
}

/// A canvas inside the container plus everything hooked onto it.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	container: Element,
	ctx: CanvasRenderingContext2d,
	wiring: Option<Wiring>,
}

impl Surface for CanvasSurface {
	fn size(&self) -> (f64, f64) {
		(self.canvas.width() as f64, self.canvas.height() as f64)
	}

	fn draw(&mut self, state: &ForceGraphState, scale: &ScaleConfig, theme: &Theme) {
		render::render(state, &self.ctx, scale, theme);
	}
}

impl CanvasSurface {
	/// Hooks pointer input, window resizes and the frame loop up to `app`.
	/// Does nothing if already wired.
	fn wire(&mut self, app: Weak<RefCell<Manager>>) -> Result<(), JsValue> {
		if self.wiring.is_some() {
			return Ok(());
		}
		let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
		let canvas: &EventTarget = self.canvas.as_ref();

		let listeners = vec![
			Listener::add(
				canvas,
				"mousedown",
				on_pointer(&app, &self.canvas, RenderEngine::pointer_down),
			)?,
			Listener::add(
				canvas,
				"mousemove",
				on_pointer(&app, &self.canvas, RenderEngine::pointer_move),
			)?,
			Listener::add(canvas, "mouseup", on_release(&app, RenderEngine::pointer_up))?,
			Listener::add(canvas, "mouseleave", on_release(&app, RenderEngine::pointer_leave))?,
			Listener::add(canvas, "wheel", on_wheel(&app, &self.canvas))?,
			Listener::add(
				window.as_ref(),
				"resize",
				on_resize(&app, &self.canvas, &self.container),
			)?,
		];

		self.wiring = Some(Wiring {
			listeners,
			frames: FrameLoop::start(&window, app),
		});
		Ok(())
	}
}

impl Drop for CanvasSurface {
	fn drop(&mut self) {
		self.wiring = None;
		self.canvas.remove();
	}
}

struct Wiring {
	#[allow(dead_code, reason = "held for its Drop")]
	listeners: Vec<Listener>,
	#[allow(dead_code, reason = "held for its Drop")]
	frames: FrameLoop,
}

/// An event listener that unregisters itself on drop.
struct Listener {
	target: EventTarget,
	kind: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn add(
		target: &EventTarget,
		kind: &'static str,
		callback: Closure<dyn FnMut(Event)>,
	) -> Result<Self, JsValue> {
		target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
		Ok(Self {
			target: target.clone(),
			kind,
			callback,
		})
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
	}
}

/// Self-rescheduling `requestAnimationFrame` loop.
struct FrameLoop {
	pending: Rc<Cell<Option<i32>>>,
	callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameLoop {
	fn start(window: &Window, app: Weak<RefCell<Manager>>) -> Self {
		let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

		let (pending_inner, callback_inner) = (pending.clone(), callback.clone());
		*callback.borrow_mut() = Some(Closure::new(move || {
			pending_inner.set(None);
			with_engine(&app, |engine| engine.frame(FRAME_DT));
			if let Some(window) = web_sys::window() {
				pending_inner.set(request_frame(&window, &callback_inner));
			}
		}));

		pending.set(request_frame(window, &callback));
		Self { pending, callback }
	}
}

fn request_frame(
	window: &Window,
	callback: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
) -> Option<i32> {
	let callback = callback.borrow();
	let cb = callback.as_ref()?;
	window
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		// The closure holds a clone of `callback`; taking it breaks the cycle.
		self.callback.borrow_mut().take();
	}
}

fn with_engine(app: &Weak<RefCell<Manager>>, f: impl FnOnce(&mut RenderEngine<DomHost>)) {
	let Some(app) = app.upgrade() else {
		return;
	};
	if let Ok(mut manager) = app.try_borrow_mut() {
		f(manager.engine_mut());
	}
}

fn local_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn on_pointer(
	app: &Weak<RefCell<Manager>>,
	canvas: &HtmlCanvasElement,
	action: fn(&mut RenderEngine<DomHost>, f64, f64),
) -> Closure<dyn FnMut(Event)> {
	let (app, canvas) = (app.clone(), canvas.clone());
	Closure::new(move |ev: Event| {
		let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
			return;
		};
		let (x, y) = local_position(&canvas, ev);
		with_engine(&app, |engine| action(engine, x, y));
	})
}

fn on_release(
	app: &Weak<RefCell<Manager>>,
	action: fn(&mut RenderEngine<DomHost>),
) -> Closure<dyn FnMut(Event)> {
	let app = app.clone();
	Closure::new(move |_: Event| with_engine(&app, action))
}

fn on_wheel(app: &Weak<RefCell<Manager>>, canvas: &HtmlCanvasElement) -> Closure<dyn FnMut(Event)> {
	let (app, canvas) = (app.clone(), canvas.clone());
	Closure::new(move |ev: Event| {
		let Some(ev) = ev.dyn_ref::<WheelEvent>() else {
			return;
		};
		ev.prevent_default();
		let (x, y) = local_position(&canvas, ev);
		let delta_y = ev.delta_y();
		with_engine(&app, |engine| engine.zoom_at(x, y, delta_y));
	})
}

fn on_resize(
	app: &Weak<RefCell<Manager>>,
	canvas: &HtmlCanvasElement,
	container: &Element,
) -> Closure<dyn FnMut(Event)> {
	let (app, canvas, container) = (app.clone(), canvas.clone(), container.clone());
	Closure::new(move |_: Event| {
		let (width, height) = container_size(&container);
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		with_engine(&app, RenderEngine::resize);
	})
}

/// Timer delay for `setTimeout`, saturating instead of wrapping negative.
fn timeout_ms(interval_ms: u32) -> i32 {
	i32::try_from(interval_ms).unwrap_or(i32::MAX)
}

/// Shared handle to the lifecycle manager, cloned into timers and buttons.
#[derive(Clone)]
pub struct AppHandle {
	inner: Rc<RefCell<Manager>>,
	poll_interval_ms: u32,
}

impl AppHandle {
	pub fn new(config: &AppConfig, seed: Graph) -> Self {
		let theme = Theme::by_name(&config.theme).unwrap_or_else(|| {
			warn!(
				"graph-playground: unknown theme `{}`, expected one of {:?}",
				config.theme,
				Theme::NAMES
			);
			Theme::default()
		});
		let engine = RenderEngine::new(
			DomHost::new(config.container_id.clone()),
			theme,
			config.layout.clone(),
		);
		let manager = LifecycleManager::new(
			engine,
			RandomGraphGenerator::new(config.generator.clone()),
			seed,
			config.poll.clone(),
		);
		Self {
			inner: Rc::new(RefCell::new(manager)),
			poll_interval_ms: config.poll.interval_ms,
		}
	}

	/// Starts polling for the page to become usable.
	pub fn start(&self) {
		self.poll_once();
	}

	fn poll_once(&self) {
		let availability = match self.inner.try_borrow_mut() {
			Ok(mut manager) => manager.poll(),
			Err(_) => Availability::Waiting { attempt: 0 },
		};
		match availability {
			Availability::Waiting { .. } => self.schedule_poll(),
			Availability::Ready => self.attach(),
			Availability::GaveUp { .. } => {}
		}
	}

	fn schedule_poll(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let handle = self.clone();
		let callback = Closure::once_into_js(move || handle.poll_once());
		if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
			callback.unchecked_ref(),
			timeout_ms(self.poll_interval_ms),
		) {
			warn!("graph-playground: cannot schedule poll: {err:?}");
		}
	}

	/// Wires the live surface to this handle. Idempotent.
	fn attach(&self) {
		let app = Rc::downgrade(&self.inner);
		let Ok(mut manager) = self.inner.try_borrow_mut() else {
			return;
		};
		if let Some(surface) = manager.engine_mut().surface_mut() {
			if let Err(err) = surface.wire(app) {
				warn!("graph-playground: cannot wire canvas: {err:?}");
			}
		}
	}

	fn trigger(&self, action: fn(&mut Manager) -> TriggerOutcome) -> TriggerOutcome {
		let outcome = match self.inner.try_borrow_mut() {
			Ok(mut manager) => action(&mut *manager),
			Err(_) => {
				warn!("graph-playground: engine busy, trigger dropped");
				return TriggerOutcome::Failed;
			}
		};
		if outcome == TriggerOutcome::Initialized {
			self.attach();
		}
		outcome
	}

	pub fn clear(&self) -> TriggerOutcome {
		self.trigger(Manager::clear)
	}

	pub fn randomize(&self) -> TriggerOutcome {
		self.trigger(Manager::randomize)
	}
}

/// Graph container with its Clear and Randomize buttons.
///
/// The canvas is created by the engine once the container is mounted; drag
/// nodes to move them, drag the background to pan, scroll to zoom.
#[component]
pub fn GraphView(config: AppConfig, seed: Graph) -> impl IntoView {
	let handle = AppHandle::new(&config, seed);
	let AppConfig {
		container_id,
		clear_button_id,
		randomize_button_id,
		..
	} = config;
	let (on_start, on_clear, on_randomize) = (handle.clone(), handle.clone(), handle);

	Effect::new(move |_| on_start.start());

	view! {
		<div class="graph-playground">
			<div class="graph-toolbar">
				<button id=clear_button_id on:click=move |_| {
					on_clear.clear();
				}>"Clear"</button>
				<button id=randomize_button_id on:click=move |_| {
					on_randomize.randomize();
				}>"Randomize"</button>
			</div>
			<div
				id=container_id
				class="graph-container"
				style="width: 100%; height: 80vh;"
			></div>
		</div>
	}
}
