use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::{GraphCanvasState, Hit};
use super::zoom::WheelInput;
use crate::config::AppConfig;
use crate::graph::FlatGraph;
use crate::store::explore::LayoutKind;

/// Pointer travel, in pixels, below which a press counts as a click.
const CLICK_SLOP: f64 = 3.0;

type SharedState = Rc<RefCell<Option<GraphCanvasState>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn now() -> f64 {
	js_sys::Date::now()
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

/// Interactive attack graph. Clicking a node or an edge reports it through
/// `on_select`; clicking the background reports `None`.
#[component]
pub fn GraphCanvas(
	#[prop(into)] graph: Signal<Option<Arc<FlatGraph>>>,
	#[prop(into)] layout: Signal<LayoutKind>,
	#[prop(into)] selected: Signal<Option<Hit>>,
	#[prop(into)] on_select: Callback<Option<Hit>>,
	config: AppConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));

	let (state_init, animate_init, resize_init) = (state.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("canvas has no 2d context");
				return;
			}
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let mut initial = GraphCanvasState::new(&config, w, h);
		initial.layout = layout.get_untracked();
		if let Some(graph) = graph.get_untracked() {
			initial.load(&graph);
		}
		*state_init.borrow_mut() = Some(initial);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(s) = state_resize.borrow_mut().as_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(cb) = resize_init.borrow().as_ref() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, canvas_anim) =
			(state_init.clone(), animate_init.clone(), canvas.clone());
		let last_frame = Cell::new(now());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !canvas_anim.is_connected() {
				debug!("graph canvas detached, stopping animation");
				return;
			}
			let t = now();
			let dt = ((t - last_frame.replace(t)) / 1000.0).clamp(0.0, 0.05) as f32;
			if let Some(s) = state_anim.borrow_mut().as_mut() {
				s.tick(t, dt);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(cb) = animate_init.borrow().as_ref() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_graph = state.clone();
	Effect::new(move |_| {
		let graph = graph.get();
		if let (Some(s), Some(graph)) = (state_graph.borrow_mut().as_mut(), graph) {
			debug!("graph canvas loading {} items", graph.0.len());
			s.load(&graph);
		}
	});

	let state_layout = state.clone();
	Effect::new(move |_| {
		let kind = layout.get();
		if let Some(s) = state_layout.borrow_mut().as_mut() {
			if s.layout != kind {
				s.set_layout(kind);
				s.fit();
			}
		}
	});

	let state_selected = state.clone();
	Effect::new(move |_| {
		let hit = selected.get();
		if let Some(s) = state_selected.borrow_mut().as_mut() {
			s.selected = hit;
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get().map(HtmlCanvasElement::from) else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		let mut guard = state_md.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		if let Some(idx) = s.node_at_position(x, y) {
			s.drag.active = true;
			s.drag.moved = false;
			s.drag.node_idx = Some(idx);
			s.drag.start_x = x;
			s.drag.start_y = y;
			let (mut nx, mut ny) = (0.0, 0.0);
			s.graph.visit_nodes(|node| {
				if node.index() == idx {
					(nx, ny) = (node.x(), node.y());
				}
			});
			s.drag.node_start_x = nx;
			s.drag.node_start_y = ny;
		} else {
			s.pan.active = true;
			s.pan.moved = false;
			s.pan.last_x = x;
			s.pan.last_y = y;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get().map(HtmlCanvasElement::from) else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		let mut guard = state_mm.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};

		if s.drag.active {
			let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
			if dx.hypot(dy) > CLICK_SLOP {
				s.drag.moved = true;
			}
			if let Some(idx) = s.drag.node_idx.filter(|_| s.drag.moved) {
				let ratio = s.camera.state().ratio;
				let (nx, ny) = (
					s.drag.node_start_x + (dx * ratio) as f32,
					s.drag.node_start_y + (dy * ratio) as f32,
				);
				s.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if s.pan.active {
			let (dx, dy) = (x - s.pan.last_x, y - s.pan.last_y);
			if s.pan.moved || dx.hypot(dy) > CLICK_SLOP {
				s.pan.moved = true;
				s.camera.pan_by(dx, dy);
				s.pan.last_x = x;
				s.pan.last_y = y;
			}
		} else {
			let hovered = s.node_at_position(x, y);
			s.set_hover(hovered);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get().map(HtmlCanvasElement::from) else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		let clicked = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let clicked = if s.drag.active && !s.drag.moved {
				s.drag.node_idx.and_then(|idx| s.node_id(idx)).map(Hit::Node)
			} else if s.pan.active && !s.pan.moved {
				// presses on nodes start a drag, so this is an edge or the background
				s.hit(x, y)
			} else {
				s.drag.active = false;
				s.drag.node_idx = None;
				s.pan.active = false;
				return;
			};
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.selected = clicked.clone();
			clicked
		};
		on_select.run(clicked);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = state_ml.borrow_mut().as_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get().map(HtmlCanvasElement::from) else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		let input = WheelInput::from_event(ev.delta_y(), ev.detail(), x, y);
		if let Some(s) = state_wh.borrow_mut().as_mut() {
			let GraphCanvasState { camera, zoom, .. } = s;
			if let Err(e) = zoom.on_wheel(camera, &input, now()) {
				warn!("ignoring wheel event: {e}");
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
