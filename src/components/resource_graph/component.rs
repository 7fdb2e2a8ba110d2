//! Leptos component wrapping the resource graph canvas.
//!
//! The component owns a [`TopologyGraph`] session and a [`CanvasRenderer`].
//! An animation loop redraws whenever the session is dirty and, after a frame
//! that left the layout awaiting correction, schedules the width correction
//! on a zero-delay timer so it measures what was just drawn.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::canvas::CanvasRenderer;
use super::config::GraphConfig;
use super::error::TopologyError;
use super::graph::{GraphEvent, Phase, TooltipContent, TopologyGraph};
use super::model::Node;
use super::theme::Theme;
use super::types::{TopologyQuery, TopologyResponse};

/// Pointer travel, in pixels, before a press turns into a drag.
const DRAG_THRESHOLD: f64 = 3.0;

/// Topology payload handed to the canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TopologyLoad {
	#[default]
	Loading,
	Loaded {
		query: TopologyQuery,
		response: TopologyResponse,
	},
	Failed(TopologyError),
}

impl From<Result<(TopologyQuery, TopologyResponse), TopologyError>> for TopologyLoad {
	fn from(result: Result<(TopologyQuery, TopologyResponse), TopologyError>) -> Self {
		match result {
			Ok((query, response)) => TopologyLoad::Loaded { query, response },
			Err(err) => TopologyLoad::Failed(err),
		}
	}
}

/// What the component is showing instead of, or on top of, the graph.
#[derive(Clone, Debug, PartialEq)]
enum ViewStatus {
	Loading,
	Ready,
	Empty(String),
	Failed(String),
}

#[derive(Clone, Copy)]
struct HostCallbacks {
	on_to_detail: Option<Callback<Node>>,
	on_hide_tooltips: Option<Callback<()>>,
	on_collapse_resource: Option<Callback<()>>,
}

type Shared<T> = Rc<RefCell<Option<T>>>;

/// Push session events to the host and mirror the tooltip into its signal.
fn flush(
	session: &Shared<TopologyGraph>,
	tooltip: RwSignal<Option<TooltipContent>>,
	hooks: HostCallbacks,
) {
	let (events, content) = match session.borrow_mut().as_mut() {
		Some(graph) => (graph.drain_events(), graph.tooltip_content()),
		None => (Vec::new(), None),
	};
	if tooltip.get_untracked() != content {
		tooltip.set(content);
	}
	for event in events {
		match event {
			GraphEvent::ToDetail(node) => {
				if let Some(cb) = hooks.on_to_detail {
					cb.run(node);
				}
			}
			GraphEvent::HideToolTips => {
				if let Some(cb) = hooks.on_hide_tooltips {
					cb.run(());
				}
			}
			GraphEvent::CollapseResource => {
				if let Some(cb) = hooks.on_collapse_resource {
					cb.run(());
				}
			}
		}
	}
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the incident resource topology on a canvas element.
///
/// Pass the payload via the reactive `data` signal; a new payload replaces
/// the whole session. The canvas fills its parent container and relays out
/// on window resize.
#[component]
pub fn ResourceGraphCanvas(
	#[prop(into)] data: Signal<TopologyLoad>,
	#[prop(optional)] config: GraphConfig,
	#[prop(optional, into)] on_to_detail: Option<Callback<Node>>,
	#[prop(optional, into)] on_hide_tooltips: Option<Callback<()>>,
	#[prop(optional, into)] on_collapse_resource: Option<Callback<()>>,
) -> impl IntoView {
	let hooks = HostCallbacks {
		on_to_detail,
		on_hide_tooltips,
		on_collapse_resource,
	};
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let status = RwSignal::new(ViewStatus::Loading);
	let tooltip = RwSignal::new(None::<TooltipContent>);
	let detail_request = RwSignal::new(None::<String>);

	let session: Shared<TopologyGraph> = Rc::new(RefCell::new(None));
	let renderer: Shared<CanvasRenderer> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_timer: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let correction_pending = Rc::new(Cell::new(false));
	let press: Rc<Cell<Option<(f64, f64)>>> = Rc::new(Cell::new(None));
	let dragging = Rc::new(Cell::new(false));

	let (session_init, renderer_init) = (session.clone(), renderer.clone());
	let (animate_init, resize_cb_init) = (animate.clone(), resize_cb.clone());
	let (resize_timer_init, pending_init) = (resize_timer.clone(), correction_pending.clone());
	let debounce_ms = config.viewport.resize_debounce_ms;
	Effect::new(move |_| {
		let load = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		if renderer_init.borrow().is_none() {
			let ctx: CanvasRenderingContext2d = canvas
				.get_context("2d")
				.unwrap()
				.unwrap()
				.dyn_into()
				.unwrap();
			*renderer_init.borrow_mut() = Some(CanvasRenderer::new(ctx, Theme::default()));
		}

		let built = match load {
			TopologyLoad::Loading => {
				status.set(ViewStatus::Loading);
				None
			}
			TopologyLoad::Loaded { query, response } => {
				match TopologyGraph::new(query, &response, &config, w, h) {
					Ok(graph) => {
						status.set(ViewStatus::Ready);
						Some(graph)
					}
					Err(err) => {
						status.set(status_for(&err));
						None
					}
				}
			}
			TopologyLoad::Failed(err) => {
				status.set(status_for(&err));
				None
			}
		};
		if built.is_none() {
			if let Some(r) = renderer_init.borrow_mut().as_mut() {
				r.clear(w, h);
			}
		}
		*session_init.borrow_mut() = built;
		pending_init.set(false);
		tooltip.set(None);

		if resize_cb_init.borrow().is_none() {
			let (session_resize, canvas_resize) = (session_init.clone(), canvas.clone());
			let timer = resize_timer_init.clone();
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				if let Some(handle) = timer.take() {
					win.clear_timeout_with_handle(handle);
				}
				let (session_later, canvas_later) = (session_resize.clone(), canvas_resize.clone());
				let apply = Closure::once_into_js(move || {
					let (nw, nh) = parent_size(&canvas_later);
					canvas_later.set_width(nw as u32);
					canvas_later.set_height(nh as u32);
					if let Some(graph) = session_later.borrow_mut().as_mut() {
						graph.resize(nw, nh);
					}
				});
				let handle = win
					.set_timeout_with_callback_and_timeout_and_arguments_0(
						apply.unchecked_ref(),
						debounce_ms,
					)
					.ok();
				timer.set(handle);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if animate_init.borrow().is_none() {
			let (session_anim, renderer_anim) = (session_init.clone(), renderer_init.clone());
			let (animate_inner, pending) = (animate_init.clone(), pending_init.clone());
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				let needs_correction = {
					let mut session = session_anim.borrow_mut();
					let mut renderer = renderer_anim.borrow_mut();
					match (session.as_mut(), renderer.as_mut()) {
						(Some(graph), Some(r)) => {
							if graph.is_dirty() {
								graph.render(r);
							}
							graph.phase() == Phase::AwaitingCorrection
						}
						_ => false,
					}
				};
				if needs_correction && !pending.get() {
					pending.set(true);
					let (session_fix, renderer_fix, pending_fix) =
						(session_anim.clone(), renderer_anim.clone(), pending.clone());
					let correct = Closure::once_into_js(move || {
						pending_fix.set(false);
						let mut session = session_fix.borrow_mut();
						let renderer = renderer_fix.borrow();
						if let (Some(graph), Some(r)) = (session.as_mut(), renderer.as_ref()) {
							if let Err(err) = graph.run_correction(r) {
								warn!("resource-graph: correction skipped: {err}");
							}
						}
					});
					let _ = web_sys::window()
						.unwrap()
						.set_timeout_with_callback_and_timeout_and_arguments_0(
							correct.unchecked_ref(),
							0,
						);
				}
				if let Some(ref cb) = *animate_inner.borrow() {
					let _ = web_sys::window()
						.unwrap()
						.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}));
			if let Some(ref cb) = *animate_init.borrow() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}
	});

	let session_detail = session.clone();
	Effect::new(move |_| {
		let Some(node_id) = detail_request.get() else {
			return;
		};
		if let Some(graph) = session_detail.borrow_mut().as_mut() {
			if let Err(err) = graph.open_detail(&node_id) {
				warn!("resource-graph: {err}");
			}
		}
		detail_request.set(None);
		flush(&session_detail, tooltip, hooks);
	});

	let (session_md, press_md, dragging_md) = (session.clone(), press.clone(), dragging.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if session_md.borrow().is_none() {
			return;
		}
		press_md.set(pointer(canvas_ref, &ev));
		dragging_md.set(false);
	};

	let (session_mm, press_mm, dragging_mm) = (session.clone(), press.clone(), dragging.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let (Some((px, py)), Some((x, y))) = (press_mm.get(), pointer(canvas_ref, &ev)) else {
			return;
		};
		if let Some(graph) = session_mm.borrow_mut().as_mut() {
			if !dragging_mm.get() {
				if (x - px).hypot(y - py) < DRAG_THRESHOLD {
					return;
				}
				dragging_mm.set(true);
				graph.on_drag_start(px, py);
			}
			graph.on_drag(x, y);
		}
		flush(&session_mm, tooltip, hooks);
	};

	let (session_mu, press_mu, dragging_mu) = (session.clone(), press.clone(), dragging.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let pressed = press_mu.take();
		if let Some(graph) = session_mu.borrow_mut().as_mut() {
			if dragging_mu.replace(false) {
				graph.on_drag_end();
			} else if let (Some(_), Some((x, y))) = (pressed, pointer(canvas_ref, &ev)) {
				if let Err(err) = graph.click_at(x, y) {
					warn!("resource-graph: click ignored: {err}");
				}
			}
		}
		flush(&session_mu, tooltip, hooks);
	};

	let (session_ml, press_ml, dragging_ml) = (session.clone(), press.clone(), dragging.clone());
	let on_mouseleave = move |_: MouseEvent| {
		press_ml.set(None);
		if dragging_ml.replace(false) {
			if let Some(graph) = session_ml.borrow_mut().as_mut() {
				graph.on_drag_end();
			}
		}
	};

	let session_wh = session.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(graph) = session_wh.borrow_mut().as_mut() {
			let zoom = ev.ctrl_key() || ev.meta_key();
			graph.on_wheel(ev.delta_x(), ev.delta_y(), zoom, x, y);
		}
		flush(&session_wh, tooltip, hooks);
	};

	let session_dc = session.clone();
	let on_dblclick = move |_: MouseEvent| {
		if let Some(graph) = session_dc.borrow_mut().as_mut() {
			graph.reset_view();
		}
		flush(&session_dc, tooltip, hooks);
	};

	let session_cr = session.clone();
	let on_collapse = move |_: MouseEvent| {
		if let Some(graph) = session_cr.borrow_mut().as_mut() {
			graph.request_collapse_resource();
		}
		flush(&session_cr, tooltip, hooks);
	};

	view! {
		<div class="resource-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="resource-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:dblclick=on_dblclick
				style="display: block; cursor: grab;"
			/>
			<button class="resource-graph-collapse" on:click=on_collapse>"Collapse"</button>
			{move || match status.get() {
				ViewStatus::Ready => ().into_any(),
				ViewStatus::Loading => {
					view! { <div class="resource-graph-placeholder">"Loading topology..."</div> }
						.into_any()
				}
				ViewStatus::Empty(reason) => {
					view! {
						<div class="resource-graph-placeholder empty">
							<p>"No data"</p>
							<p class="reason">{reason}</p>
						</div>
					}
						.into_any()
				}
				ViewStatus::Failed(message) => {
					view! { <div class="resource-graph-placeholder error">{message}</div> }
						.into_any()
				}
			}}
			{move || {
				tooltip
					.get()
					.map(|content| {
						let style = format!(
							"position: absolute; left: {}px; top: {}px;",
							content.x,
							content.y,
						);
						let detail = content
							.node_id
							.clone()
							.map(|id| {
								view! {
									<button
										class="resource-graph-detail"
										on:click=move |_| detail_request.set(Some(id.clone()))
									>
										"Detail"
									</button>
								}
							});
						view! {
							<div class="resource-graph-tooltip" style=style>
								<div class="title">{content.title.clone()}</div>
								<table>
									{content
										.rows
										.iter()
										.map(|(key, value)| {
											view! {
												<tr>
													<td>{key.clone()}</td>
													<td>{value.clone()}</td>
												</tr>
											}
										})
										.collect_view()}
								</table>
								{detail}
							</div>
						}
					})
			}}
		</div>
	}
}

fn status_for(err: &TopologyError) -> ViewStatus {
	match err {
		TopologyError::NoData(reason) => ViewStatus::Empty(reason.to_string()),
		other => {
			warn!("resource-graph: {other}");
			ViewStatus::Failed(other.to_string())
		}
	}
}
