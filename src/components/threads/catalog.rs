/// A thematic anchor on the circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatalogNode {
	pub id: &'static str,
	pub label: &'static str,
	/// Position on the circle as a fraction of a full turn, in [0, 1).
	pub angle: f64,
}

const fn node(id: &'static str, label: &'static str, angle: f64) -> CatalogNode {
	CatalogNode { id, label, angle }
}

/// The nine nodes shown on the projector and offered on the tablet.
pub static NODES: [CatalogNode; 9] = [
	node("self", "Self", 0.0),
	node("family", "Family", 0.25),
	node("work", "Work", 0.5),
	node("nature", "Nature", 0.75),
	node("community", "Community", 0.0),
	node("creativity", "Creativity", 0.125),
	node("health", "Health", 0.375),
	node("learning", "Learning", 0.625),
	node("place", "Place", 0.875),
];
