//! Interactive topology session.
//!
//! [`TopologyGraph`] owns the model and every controller acting on it, and is
//! the only thing the canvas component talks to. Layout changes go through a
//! render, then a width correction measured from that render:
//!
//! `AwaitingRender -> AwaitingCorrection -> Settled`
//!
//! Expanding or collapsing is refused until the graph has settled again.

use log::{info, warn};

use super::aggregation::{AggregationChange, AggregationController};
use super::config::{GraphConfig, TooltipConfig};
use super::error::TopologyError;
use super::geometry::{BBox, distance_to_segment};
use super::layout::RankLayout;
use super::model::{ComboId, GraphModel, Node, NodeId};
use super::render::{draw_scene, edge_path};
use super::renderer::{ItemRef, Renderer};
use super::selection::{SelectionState, TooltipState};
use super::types::{TopologyQuery, TopologyResponse};
use super::viewport::ViewportController;

/// Edge hit distance in canvas pixels.
const EDGE_HIT_TOLERANCE: f64 = 4.0;

/// Where the session is in the render/correct cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	AwaitingRender,
	AwaitingCorrection,
	Settled,
}

/// Notification for the host page.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	/// Open the detail view of a node.
	ToDetail(Node),
	/// Close any tooltip the host shows outside the canvas.
	HideToolTips,
	/// Fold the resource panel.
	CollapseResource,
}

/// What a click on the canvas did.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
	Aggregation(Vec<AggregationChange>),
	Selected { item: ItemRef, tooltip_visible: bool },
	Cleared,
}

/// Text shown in the canvas popover, positioned in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
	pub title: String,
	pub rows: Vec<(String, String)>,
	/// Set for node popovers, which offer a link to the detail view.
	pub node_id: Option<NodeId>,
	pub x: f64,
	pub y: f64,
}

/// The graph plus all interaction state for one incident/entity pair.
#[derive(Debug)]
pub struct TopologyGraph {
	model: GraphModel,
	layout: RankLayout,
	aggregation: AggregationController,
	viewport: ViewportController,
	selection: SelectionState,
	tooltip: TooltipState,
	tooltip_config: TooltipConfig,
	phase: Phase,
	dirty: bool,
	events: Vec<GraphEvent>,
}

impl TopologyGraph {
	/// Normalize `response` and lay it out in a `width` x `height` viewport.
	pub fn new(
		query: TopologyQuery,
		response: &TopologyResponse,
		config: &GraphConfig,
		width: f64,
		height: f64,
	) -> Result<Self, TopologyError> {
		let mut model = GraphModel::normalize(&query, response)?;
		let layout = RankLayout::new(config.layout.clone());
		layout.compute(&mut model, width, height);
		info!(
			"resource-graph: incident {} entity {:?} loaded with {} nodes",
			query.incident_id,
			query.entity_id,
			model.nodes.len()
		);

		Ok(Self {
			model,
			layout,
			aggregation: AggregationController::new(),
			viewport: ViewportController::new(config.viewport.clone(), width, height),
			selection: SelectionState::default(),
			tooltip: TooltipState::default(),
			tooltip_config: config.tooltip.clone(),
			phase: Phase::AwaitingRender,
			dirty: true,
			events: Vec::new(),
		})
	}

	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn viewport(&self) -> &ViewportController {
		&self.viewport
	}

	pub fn selection(&self) -> &SelectionState {
		&self.selection
	}

	pub fn tooltip(&self) -> &TooltipState {
		&self.tooltip
	}

	pub fn aggregation(&self) -> &AggregationController {
		&self.aggregation
	}

	/// Whether the next animation frame has anything new to draw.
	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	/// Draw a frame and advance the render/correct cycle.
	pub fn render<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
		draw_scene(
			&self.model,
			&self.selection,
			&self.viewport,
			self.layout.config.node_radius,
			renderer,
		);
		self.mark_rendered();
	}

	pub fn mark_rendered(&mut self) {
		self.dirty = false;
		if self.phase == Phase::AwaitingRender {
			self.phase = Phase::AwaitingCorrection;
		}
	}

	/// Equalize band widths from what `renderer` last drew.
	///
	/// Returns whether the bands changed, in which case one more frame is
	/// needed. The pass is idempotent so the graph settles either way.
	pub fn run_correction<R: Renderer + ?Sized>(
		&mut self,
		renderer: &R,
	) -> Result<bool, TopologyError> {
		match self.phase {
			Phase::AwaitingRender => return Err(TopologyError::CorrectionBeforeRender),
			Phase::Settled => return Ok(false),
			Phase::AwaitingCorrection => {}
		}
		let label_padding = self.layout.config.label_padding;
		let changed = self
			.viewport
			.normalize_widths(&mut self.model, renderer, label_padding);
		self.phase = Phase::Settled;
		self.dirty |= changed;
		Ok(changed)
	}

	/// Expand an aggregated node into its own child combo.
	pub fn expand(&mut self, node_id: &str) -> Result<Vec<AggregationChange>, TopologyError> {
		self.ensure_settled()?;
		let changes = self
			.aggregation
			.expand(&mut self.model, node_id, &self.layout.config)
			.inspect_err(|e| warn!("resource-graph: expand `{node_id}` rejected: {e}"))?;
		self.after_aggregation(&changes)?;
		Ok(changes)
	}

	/// Fold an open child combo back into its anchor.
	pub fn collapse(&mut self, child: &str) -> Result<AggregationChange, TopologyError> {
		self.ensure_settled()?;
		let change = self
			.aggregation
			.collapse(&mut self.model, child)
			.inspect_err(|e| warn!("resource-graph: collapse `{child}` rejected: {e}"))?;
		self.after_aggregation(std::slice::from_ref(&change))?;
		Ok(change)
	}

	pub fn toggle_aggregation(
		&mut self,
		node_id: &str,
	) -> Result<Vec<AggregationChange>, TopologyError> {
		self.ensure_settled()?;
		let changes = self
			.aggregation
			.toggle(&mut self.model, node_id, &self.layout.config)
			.inspect_err(|e| warn!("resource-graph: toggle `{node_id}` rejected: {e}"))?;
		self.after_aggregation(&changes)?;
		Ok(changes)
	}

	/// Close every open child combo, whatever the phase.
	pub fn collapse_all(&mut self) -> Result<Vec<AggregationChange>, TopologyError> {
		let changes = self.aggregation.collapse_all(&mut self.model)?;
		if !changes.is_empty() {
			info!("resource-graph: closed {} child combo(s)", changes.len());
			self.after_aggregation(&changes)?;
		}
		Ok(changes)
	}

	fn ensure_settled(&self) -> Result<(), TopologyError> {
		if self.phase == Phase::Settled {
			Ok(())
		} else {
			warn!("resource-graph: aggregation change while {:?}", self.phase);
			Err(TopologyError::Busy)
		}
	}

	fn after_aggregation(&mut self, changes: &[AggregationChange]) -> Result<(), TopologyError> {
		let mut bands: Vec<&str> = changes.iter().map(AggregationChange::origin).collect();
		bands.dedup();
		for band in bands {
			self.layout.compute_band(
				&mut self.model,
				band,
				self.viewport.width,
				self.viewport.height,
			)?;
		}
		self.selection.clear();
		self.tooltip.hide();
		self.invalidate();
		Ok(())
	}

	fn invalidate(&mut self) {
		self.phase = Phase::AwaitingRender;
		self.dirty = true;
	}

	pub fn on_drag_start(&mut self, x: f64, y: f64) {
		self.hide_tooltips();
		self.viewport.begin_pan(x, y);
	}

	pub fn on_drag(&mut self, x: f64, y: f64) {
		if self.viewport.pan_to(&self.model, x, y) {
			self.dirty = true;
		}
	}

	pub fn on_drag_end(&mut self) {
		self.viewport.end_pan();
	}

	/// Wheel input: zooms around `(x, y)` when `zoom` is set, scrolls otherwise.
	pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64, zoom: bool, x: f64, y: f64) {
		if self.tooltip.is_visible() {
			self.hide_tooltips();
		}
		if zoom {
			self.viewport.zoom_at(x, y, delta_y);
			self.dirty = true;
		} else if self.viewport.scroll(&self.model, delta_x, delta_y) {
			self.dirty = true;
		}
	}

	/// Back to the initial zoom and translation.
	pub fn reset_view(&mut self) {
		self.viewport.reset();
		self.tooltip.hide();
		self.dirty = true;
	}

	fn hide_tooltips(&mut self) {
		self.tooltip.hide();
		self.events.push(GraphEvent::HideToolTips);
		self.dirty = true;
	}

	/// Item under canvas point `(x, y)`. Nodes win over edges.
	pub fn hit_test(&self, x: f64, y: f64) -> Option<ItemRef> {
		let transform = &self.viewport.transform;
		let (wx, wy) = transform.to_world(x, y);
		let radius = self.layout.config.node_radius;

		let node = self
			.model
			.nodes
			.iter()
			.rev()
			.find(|n| (n.x - wx).powi(2) + (n.y - wy).powi(2) <= radius * radius);
		if let Some(node) = node {
			return Some(ItemRef::Node(node.id.clone()));
		}

		let tolerance = EDGE_HIT_TOLERANCE / transform.k;
		self.model
			.edges
			.iter()
			.rev()
			.find(|e| {
				edge_path(&self.model, &e.source, &e.target)
					.is_some_and(|p| distance_to_segment(wx, wy, p.from, p.to) <= tolerance)
			})
			.map(|e| ItemRef::Edge(e.id.clone()))
	}

	/// Handle a click at canvas point `(x, y)`.
	///
	/// Aggregated nodes expand and anchors of an open child combo collapse it.
	/// Any other item is selected; the empty canvas clears the selection. An
	/// accepted click tells the host to hide its own tooltips; the canvas
	/// tooltip toggles.
	pub fn click_at(&mut self, x: f64, y: f64) -> Result<ClickOutcome, TopologyError> {
		let outcome = match self.hit_test(x, y) {
			Some(ItemRef::Node(id)) => {
				let Some(node) = self.model.node(&id) else {
					return Err(TopologyError::UnknownNode(id));
				};
				if node.is_collapsed() {
					self.expand(&id).map(ClickOutcome::Aggregation)?
				} else if node.is_expanded() {
					let child: ComboId = node.combo_id.clone();
					self.collapse(&child)
						.map(|change| ClickOutcome::Aggregation(vec![change]))?
				} else {
					self.click_node(&id)?
				}
			}
			Some(ItemRef::Edge(id)) => self.click_edge(&id)?,
			Some(ItemRef::Combo(_)) | None => {
				self.click_canvas();
				ClickOutcome::Cleared
			}
		};
		self.events.push(GraphEvent::HideToolTips);
		Ok(outcome)
	}

	/// Highlight a node's neighbourhood and toggle its tooltip.
	pub fn click_node(&mut self, node_id: &str) -> Result<ClickOutcome, TopologyError> {
		let node = self
			.model
			.node(node_id)
			.ok_or_else(|| TopologyError::UnknownNode(node_id.to_string()))?;
		let radius = self.layout.config.node_radius;
		let anchor = self.viewport.transform.bbox_to_screen(&BBox::centered(
			node.x,
			node.y,
			radius * 2.0,
			radius * 2.0,
		));

		self.selection.select_node(&self.model, node_id);
		let item = ItemRef::Node(node_id.to_string());
		Ok(self.toggle_tooltip(item, anchor))
	}

	/// Highlight an edge and its endpoints and toggle its tooltip.
	pub fn click_edge(&mut self, edge_id: &str) -> Result<ClickOutcome, TopologyError> {
		let edge = self
			.model
			.edge(edge_id)
			.ok_or_else(|| TopologyError::UnknownEdge(edge_id.to_string()))?;
		let path = edge_path(&self.model, &edge.source, &edge.target)
			.ok_or_else(|| TopologyError::UnknownNode(edge.source.node_id().to_string()))?;
		let (mx, my) = self.viewport.transform.to_screen(
			(path.from.0 + path.to.0) / 2.0,
			(path.from.1 + path.to.1) / 2.0,
		);

		self.selection.select_edge(&self.model, edge_id);
		let item = ItemRef::Edge(edge_id.to_string());
		Ok(self.toggle_tooltip(item, BBox::new(mx, my, mx, my)))
	}

	fn toggle_tooltip(&mut self, item: ItemRef, anchor: BBox) -> ClickOutcome {
		let viewport = (self.viewport.width, self.viewport.height);
		let tooltip_visible =
			self.tooltip
				.toggle(item.clone(), &anchor, viewport, &self.tooltip_config);
		self.dirty = true;
		ClickOutcome::Selected {
			item,
			tooltip_visible,
		}
	}

	pub fn click_canvas(&mut self) {
		self.selection.clear();
		self.tooltip.hide();
		self.dirty = true;
	}

	/// Popover text for the item the tooltip is showing, if any.
	pub fn tooltip_content(&self) -> Option<TooltipContent> {
		let (x, y) = self.tooltip.position()?;
		let yes_no = |flag: bool| if flag { "yes" } else { "no" }.to_string();
		match self.tooltip.target()? {
			ItemRef::Node(id) => {
				let node = self.model.node(id)?;
				let entity = &node.entity;
				let mut rows = vec![
					("Type".to_string(), entity.entity_type.clone()),
					("Anomaly".to_string(), yes_no(entity.is_anomaly)),
				];
				if !entity.rank_name.is_empty() {
					rows.push(("Rank".to_string(), entity.rank_name.clone()));
				}
				if entity.is_root {
					rows.push(("Root cause".to_string(), yes_no(true)));
				}
				if entity.is_feedback_root {
					rows.push(("Feedback root cause".to_string(), yes_no(true)));
				}
				if let Some(biz) = entity.bk_biz_id {
					rows.push(("Business".to_string(), biz.to_string()));
				}
				if node.is_collapsed() {
					rows.push(("Aggregated".to_string(), node.total_count.to_string()));
				}
				let title = if entity.name.is_empty() {
					node.id.clone()
				} else {
					entity.name.clone()
				};
				Some(TooltipContent {
					title,
					rows,
					node_id: Some(node.id.clone()),
					x,
					y,
				})
			}
			ItemRef::Edge(id) => {
				let edge = self.model.edge(id)?;
				let mut rows = vec![
					("Type".to_string(), edge.edge_type.clone()),
					("Anomaly".to_string(), yes_no(edge.is_anomaly)),
					("Count".to_string(), edge.count.to_string()),
				];
				if !edge.events.is_empty() {
					rows.push(("Events".to_string(), edge.events.len().to_string()));
				}
				Some(TooltipContent {
					title: format!("{} \u{2192} {}", edge.source.node_id(), edge.target.node_id()),
					rows,
					node_id: None,
					x,
					y,
				})
			}
			ItemRef::Combo(_) => None,
		}
	}

	/// Ask the host to open the detail view of `node_id`.
	pub fn open_detail(&mut self, node_id: &str) -> Result<(), TopologyError> {
		let node = self
			.model
			.node(node_id)
			.ok_or_else(|| TopologyError::UnknownNode(node_id.to_string()))?;
		self.events.push(GraphEvent::ToDetail(node.clone()));
		self.tooltip.hide();
		self.dirty = true;
		Ok(())
	}

	pub fn request_collapse_resource(&mut self) {
		self.events.push(GraphEvent::CollapseResource);
	}

	/// Re-run the layout for a new viewport size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height);
		self.layout.compute(&mut self.model, width, height);
		self.tooltip.hide();
		self.invalidate();
	}

	/// Notifications queued since the last call.
	pub fn drain_events(&mut self) -> Vec<GraphEvent> {
		std::mem::take(&mut self.events)
	}
}

#[cfg(test)]
mod tests {
	use super::super::fixtures::{self, RecordingRenderer};
	use super::super::model::EdgeEndpoint;
	use super::*;

	fn session() -> TopologyGraph {
		TopologyGraph::new(
			fixtures::query(),
			&fixtures::scenario_response(),
			&GraphConfig::default(),
			800.0,
			600.0,
		)
		.unwrap()
	}

	fn settle(graph: &mut TopologyGraph, renderer: &mut RecordingRenderer) {
		graph.render(renderer);
		graph.run_correction(renderer).unwrap();
		if graph.is_dirty() {
			graph.render(renderer);
		}
		assert_eq!(graph.phase(), Phase::Settled);
	}

	#[test]
	fn no_data_surfaces_from_new() {
		let query = TopologyQuery {
			incident_id: 7,
			entity_id: None,
		};
		let err = TopologyGraph::new(
			query,
			&fixtures::scenario_response(),
			&GraphConfig::default(),
			800.0,
			600.0,
		)
		.unwrap_err();
		assert!(err.is_no_data());
	}

	#[test]
	fn correction_waits_for_a_render() {
		let mut graph = session();
		let mut renderer = RecordingRenderer::default();

		assert_eq!(graph.phase(), Phase::AwaitingRender);
		assert_eq!(graph.run_correction(&renderer), Err(TopologyError::CorrectionBeforeRender));
		assert_eq!(graph.expand("n1"), Err(TopologyError::Busy));

		graph.render(&mut renderer);
		assert_eq!(graph.phase(), Phase::AwaitingCorrection);
		assert_eq!(graph.expand("n1"), Err(TopologyError::Busy));
		assert_eq!(graph.run_correction(&renderer), Ok(false));
		assert_eq!(graph.phase(), Phase::Settled);
		assert_eq!(graph.run_correction(&renderer), Ok(false));
	}

	#[test]
	fn clicking_the_aggregated_node_expands_and_collapses_it() {
		let original = fixtures::scenario_model();
		let mut graph = session();
		let mut renderer = RecordingRenderer::default();
		settle(&mut graph, &mut renderer);

		let outcome = graph.click_at(80.0, 160.0).unwrap();
		assert!(matches!(
			outcome,
			ClickOutcome::Aggregation(ref changes) if matches!(changes[..], [AggregationChange::Expanded { .. }])
		));
		assert_eq!(graph.phase(), Phase::AwaitingRender);
		let shape = graph.model().shape();
		assert!(shape.combo_ids.contains("1::n1"));
		assert_eq!(shape.node_ids.len(), 4);
		assert_eq!(
			graph.model().edges[0].source,
			EdgeEndpoint::Rewired {
				anchor: "1::n1n1".into(),
				original: "n1".into(),
			}
		);
		assert_eq!(graph.model().node("p2").unwrap().x, 320.0);
		assert_eq!(graph.click_at(80.0, 160.0), Err(TopologyError::Busy));

		settle(&mut graph, &mut renderer);
		let outcome = graph.click_at(80.0, 160.0).unwrap();
		assert!(matches!(
			outcome,
			ClickOutcome::Aggregation(ref changes) if matches!(changes[..], [AggregationChange::Collapsed { .. }])
		));
		assert_eq!(graph.model().shape(), original.shape());
		assert_eq!(graph.model().edges, original.edges);
	}

	#[test]
	fn rejected_clicks_leave_host_tooltips_alone() {
		let mut graph = session();
		let mut renderer = RecordingRenderer::default();
		settle(&mut graph, &mut renderer);

		graph.click_at(80.0, 160.0).unwrap();
		assert_eq!(graph.drain_events(), vec![GraphEvent::HideToolTips]);
		assert_eq!(graph.click_at(80.0, 160.0), Err(TopologyError::Busy));
		assert!(graph.drain_events().is_empty());
	}

	#[test]
	fn configured_node_radius_drives_drawing_and_hit_testing() {
		let mut config = GraphConfig::default();
		config.layout.node_radius = 30.0;
		let mut graph = TopologyGraph::new(
			fixtures::query(),
			&fixtures::scenario_response(),
			&config,
			800.0,
			600.0,
		)
		.unwrap();
		let mut renderer = RecordingRenderer::default();
		settle(&mut graph, &mut renderer);

		let n2 = graph.model().node("n2").unwrap().clone();
		let drawn = renderer
			.measure_bounding_box(&ItemRef::Node("n2".into()))
			.unwrap();
		assert_eq!((drawn.width(), drawn.height()), (60.0, 60.0));

		let (x, y) = graph.viewport().transform.to_screen(n2.x, n2.y);
		assert_eq!(graph.hit_test(x + 25.0, y), Some(ItemRef::Node("n2".into())));
		assert_ne!(graph.hit_test(x + 35.0, y), Some(ItemRef::Node("n2".into())));
	}

	#[test]
	fn collapse_all_restores_the_loaded_graph() {
		let original = fixtures::scenario_model();
		let mut graph = session();
		let mut renderer = RecordingRenderer::default();
		settle(&mut graph, &mut renderer);
		assert!(graph.collapse_all().unwrap().is_empty());
		assert_eq!(graph.phase(), Phase::Settled);

		graph.expand("n1").unwrap();
		let changes = graph.collapse_all().unwrap();
		assert_eq!(changes.len(), 1);
		assert_eq!(graph.aggregation().open_count(), 0);
		assert_eq!(graph.model().shape(), original.shape());
		assert_eq!(graph.phase(), Phase::AwaitingRender);
	}

	#[test]
	fn node_and_edge_clicks_select_and_toggle_the_tooltip() {
		let mut graph = session();
		let mut renderer = RecordingRenderer::default();
		settle(&mut graph, &mut renderer);

		let outcome = graph.click_at(80.0, 440.0).unwrap();
		assert_eq!(
			outcome,
			ClickOutcome::Selected {
				item: ItemRef::Node("n2".into()),
				tooltip_visible: true,
			}
		);
		assert!(graph.selection().node_state("n1").highlight);
		assert_eq!(graph.tooltip().position(), Some((106.0, 234.0)), "flipped above n2");

		let outcome = graph.click_at(80.0, 440.0).unwrap();
		assert!(matches!(outcome, ClickOutcome::Selected { tooltip_visible: false, .. }));

		let outcome = graph.click_at(81.0, 300.0).unwrap();
		assert!(matches!(
			outcome,
			ClickOutcome::Selected { item: ItemRef::Edge(ref id), tooltip_visible: true } if id == "n1-n2"
		));

		assert_eq!(graph.click_at(700.0, 300.0), Ok(ClickOutcome::Cleared));
		assert!(!graph.selection().is_active());
		assert!(!graph.tooltip().is_visible());
	}

	#[test]
	fn tooltip_content_describes_the_clicked_item() {
		let mut graph = session();
		let mut renderer = RecordingRenderer::default();
		settle(&mut graph, &mut renderer);
		assert_eq!(graph.tooltip_content(), None);

		graph.click_node("n2").unwrap();
		let content = graph.tooltip_content().unwrap();
		assert_eq!(content.title, "10.0.0.2");
		assert_eq!(content.node_id.as_deref(), Some("n2"));
		assert!(content.rows.contains(&("Type".into(), "BkNodeHost".into())));
		assert!(content.rows.contains(&("Root cause".into(), "yes".into())));

		graph.click_edge("n1-n2").unwrap();
		let content = graph.tooltip_content().unwrap();
		assert_eq!(content.title, "n1 \u{2192} n2");
		assert_eq!(content.node_id, None);
		assert!(content.rows.contains(&("Type".into(), "dependency".into())));
	}

	#[test]
	fn host_notifications_queue_until_drained() {
		let mut graph = session();
		graph.on_drag_start(10.0, 10.0);
		graph.on_drag(20.0, 10.0);
		graph.on_drag_end();
		graph.open_detail("n2").unwrap();
		graph.request_collapse_resource();
		assert_eq!(
			graph.open_detail("ghost"),
			Err(TopologyError::UnknownNode("ghost".into()))
		);

		let events = graph.drain_events();
		assert_eq!(events.len(), 3);
		assert_eq!(events[0], GraphEvent::HideToolTips);
		assert!(matches!(&events[1], GraphEvent::ToDetail(node) if node.id == "n2"));
		assert_eq!(events[2], GraphEvent::CollapseResource);
		assert!(graph.drain_events().is_empty());
		assert_eq!(graph.viewport().transform.x, 10.0);
	}

	#[test]
	fn wheel_zooms_or_scrolls() {
		let mut graph = session();
		graph.mark_rendered();

		graph.on_wheel(0.0, -1.0, true, 400.0, 300.0);
		assert!(graph.viewport().transform.k > 1.0);
		assert!(graph.is_dirty());

		graph.mark_rendered();
		graph.on_wheel(0.0, 10.0, false, 0.0, 0.0);
		assert!((graph.viewport().transform.y + 50.0).abs() < 1e-9);
	}

	#[test]
	fn reset_view_restores_the_identity_transform() {
		let mut graph = session();
		graph.on_wheel(0.0, -100.0, true, 200.0, 150.0);
		assert!(graph.viewport().transform.k > 1.0);
		graph.reset_view();
		assert_eq!(graph.viewport().transform.k, 1.0);
		assert_eq!(graph.viewport().transform.x, 0.0);
		assert_eq!(graph.viewport().transform.y, 0.0);
		assert!(graph.is_dirty());
	}

	#[test]
	fn resize_relays_out_and_restarts_the_cycle() {
		let mut graph = session();
		let mut renderer = RecordingRenderer::default();
		settle(&mut graph, &mut renderer);

		graph.resize(1000.0, 400.0);
		assert_eq!(graph.phase(), Phase::AwaitingRender);
		let band = graph.model().combo("2").unwrap();
		assert_eq!((band.width, band.height), (1000.0, 180.0));
		assert_eq!(graph.model().node("n2").unwrap().y, 290.0);
	}
}
