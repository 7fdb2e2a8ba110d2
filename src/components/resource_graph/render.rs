//! Frame assembly for any [`Renderer`].
//!
//! Passes, back to front:
//! 1. Bands, then child combos on top of them
//! 2. Plain and dimmed edges, then highlighted edges
//! 3. Dimmed nodes, then everything else

use super::model::{EdgeEndpoint, GraphModel};
use super::renderer::{EdgePath, Renderer};
use super::selection::SelectionState;
use super::viewport::ViewportController;

/// Draws one frame of `model` with nodes of `node_radius`.
pub fn draw_scene<R: Renderer + ?Sized>(
	model: &GraphModel,
	selection: &SelectionState,
	viewport: &ViewportController,
	node_radius: f64,
	renderer: &mut R,
) {
	renderer.begin_frame(&viewport.transform, viewport.width, viewport.height);

	for combo in model.top_level_combos().chain(model.child_combos()) {
		renderer.draw_combo(combo, Default::default());
	}

	for highlighted in [false, true] {
		for edge in &model.edges {
			let state = selection.edge_state(&edge.id);
			if state.highlight != highlighted {
				continue;
			}
			if let Some(path) = edge_path(model, &edge.source, &edge.target) {
				renderer.draw_edge(edge, path, node_radius, state);
			}
		}
	}

	for dark in [true, false] {
		for node in &model.nodes {
			let state = selection.node_state(&node.id);
			if state.dark == dark {
				renderer.draw_node(node, node_radius, state);
			}
		}
	}

	renderer.end_frame();
}

/// World-space segment between two endpoints.
pub fn edge_path(
	model: &GraphModel,
	source: &EdgeEndpoint,
	target: &EdgeEndpoint,
) -> Option<EdgePath> {
	let source_centre = node_centre(model, source)?;
	let target_centre = node_centre(model, target)?;
	Some(EdgePath {
		from: attach_point(model, source, target_centre).unwrap_or(source_centre),
		to: attach_point(model, target, source_centre).unwrap_or(target_centre),
	})
}

fn node_centre(model: &GraphModel, endpoint: &EdgeEndpoint) -> Option<(f64, f64)> {
	model.node(endpoint.node_id()).map(|n| (n.x, n.y))
}

/// Rewired ends attach to the child combo's top or bottom midpoint,
/// whichever faces `other`.
fn attach_point(model: &GraphModel, endpoint: &EdgeEndpoint, other: (f64, f64)) -> Option<(f64, f64)> {
	let original = endpoint.original_id()?;
	let combo = model.child_combo_of(original)?;
	let bbox = combo.bbox();
	let y = if other.1 < combo.y {
		bbox.min_y
	} else {
		bbox.max_y
	};
	Some((combo.x, y))
}
