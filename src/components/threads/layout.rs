use std::f64::consts::TAU;

use super::catalog::CatalogNode;
use crate::constants::{FALLBACK_HEIGHT, FALLBACK_WIDTH, RADIUS_FACTOR};
use crate::options::ConnectionMode;

/// A catalog node placed in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedNode {
	pub id: &'static str,
	pub x: f64,
	pub y: f64,
}

fn usable(extent: f64, fallback: f64) -> f64 {
	if extent.is_finite() && extent > 0.0 {
		extent
	} else {
		fallback
	}
}

/// Place every catalog node on a circle centred in the viewport.
pub fn node_positions(width: f64, height: f64, catalog: &[CatalogNode]) -> Vec<PositionedNode> {
	let (w, h) = (usable(width, FALLBACK_WIDTH), usable(height, FALLBACK_HEIGHT));
	let (cx, cy) = (w / 2.0, h / 2.0);
	let r = cx.min(cy) * RADIUS_FACTOR;
	catalog
		.iter()
		.map(|n| {
			let theta = n.angle * TAU;
			PositionedNode {
				id: n.id,
				x: cx + r * theta.cos(),
				y: cy + r * theta.sin(),
			}
		})
		.collect()
}

/// Nodes named in `selected`, in catalog order; all of them if `selected` is empty.
pub fn active_nodes<'a>(positioned: &'a [PositionedNode], selected: &[String]) -> Vec<&'a PositionedNode> {
	positioned
		.iter()
		.filter(|n| selected.is_empty() || selected.iter().any(|s| s == n.id))
		.collect()
}

/// The pairs to draw threads between.
///
/// Custom pairs resolve against the full node set, so a pair may reach an
/// inactive node; pairs naming an unknown id are dropped.
pub fn connection_pairs<'a>(
	active: &[&'a PositionedNode],
	mode: ConnectionMode,
	explicit: &[(String, String)],
	all: &'a [PositionedNode],
) -> Vec<(&'a PositionedNode, &'a PositionedNode)> {
	if active.len() < 2 {
		return Vec::new();
	}
	if mode == ConnectionMode::Custom && !explicit.is_empty() {
		let lookup = |id: &str| all.iter().find(|n| n.id == id);
		return explicit
			.iter()
			.filter_map(|(a, b)| Some((lookup(a.as_str())?, lookup(b.as_str())?)))
			.collect();
	}

	let mut pairs = Vec::with_capacity(active.len() * (active.len() - 1) / 2);
	for (i, &a) in active.iter().enumerate() {
		for &b in &active[i + 1..] {
			pairs.push((a, b));
		}
	}
	pairs
}
