use super::catalog::NODES;
use super::layout::{self, PositionedNode};
use crate::options::OptionsRecord;

/// Everything the projector needs to paint a frame.
///
/// Options only change through [`ProjectorState::apply_snapshot`]; geometry
/// only through [`ProjectorState::resize`].
pub struct ProjectorState {
	pub options: OptionsRecord,
	pub nodes: Vec<PositionedNode>,
	pub width: f64,
	pub height: f64,
	/// Monotonic frame counter used to phase the animations.
	pub frame: u64,
}

/// Derived per-frame view: which nodes are active and which pairs to draw.
pub struct FrameLayout<'a> {
	pub active: Vec<&'a PositionedNode>,
	pub pairs: Vec<(&'a PositionedNode, &'a PositionedNode)>,
}

impl FrameLayout<'_> {
	pub fn is_active(&self, id: &str) -> bool {
		self.active.iter().any(|n| n.id == id)
	}
}

impl ProjectorState {
	pub fn new(options: OptionsRecord, width: f64, height: f64) -> Self {
		Self {
			nodes: layout::node_positions(width, height, &NODES),
			options,
			width,
			height,
			frame: 0,
		}
	}

	/// Replace the options with a fresh snapshot from the store.
	pub fn apply_snapshot(&mut self, options: OptionsRecord) {
		log::debug!(
			"options snapshot: {} selected, {:?} mode, {:?} style",
			options.selected_nodes.len(),
			options.connection_mode,
			options.thread_style
		);
		self.options = options;
		self.nodes = layout::node_positions(self.width, self.height, &NODES);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.nodes = layout::node_positions(width, height, &NODES);
	}

	pub fn tick(&mut self) {
		self.frame = self.frame.wrapping_add(1);
	}

	pub fn frame_layout(&self) -> FrameLayout<'_> {
		let active = layout::active_nodes(&self.nodes, &self.options.selected_nodes);
		let pairs = layout::connection_pairs(
			&active,
			self.options.connection_mode,
			&self.options.connections,
			&self.nodes,
		);
		FrameLayout { active, pairs }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::ConnectionMode;

	#[test]
	fn resize_recomputes_geometry() {
		let mut state = ProjectorState::new(OptionsRecord::default(), 800.0, 600.0);
		let before = state.nodes[0];
		state.resize(1600.0, 1200.0);
		assert_ne!(state.nodes[0], before);
		assert_eq!(state.nodes, layout::node_positions(1600.0, 1200.0, &NODES));
	}

	#[test]
	fn snapshot_changes_the_frame_layout() {
		let mut state = ProjectorState::new(OptionsRecord::default(), 800.0, 600.0);
		assert_eq!(state.frame_layout().pairs.len(), 36);

		state.apply_snapshot(OptionsRecord {
			selected_nodes: vec!["self".into(), "work".into()],
			connection_mode: ConnectionMode::All,
			..Default::default()
		});
		let frame = state.frame_layout();
		assert_eq!(frame.pairs.len(), 1);
		assert!(frame.is_active("work"));
		assert!(!frame.is_active("nature"));
	}

	#[test]
	fn tick_advances_the_frame_counter() {
		let mut state = ProjectorState::new(OptionsRecord::default(), 0.0, 0.0);
		state.tick();
		state.tick();
		assert_eq!(state.frame, 2);
	}
}
