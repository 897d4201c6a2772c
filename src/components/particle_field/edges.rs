//! Connection edges between nearby particles.
//!
//! Edges are recomputed from scratch every frame. Each undirected pair is
//! produced at most once, with opacity `min(alpha_a, alpha_b) * (1 - d / threshold)`.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// Which particle pairs are considered for an edge.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgePolicy {
	#[default]
	None,
	/// Every pair closer than `threshold`.
	AllPairs { threshold: f64 },
	/// Each particle's `k` nearest neighbours closer than `threshold`.
	KNearest { k: usize, threshold: f64 },
	/// Only the peers a particle was linked to at creation.
	Linked { threshold: f64 },
}

/// Restricts edges to particles sharing a group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeScope {
	#[default]
	Global,
	Group,
}

impl EdgeScope {
	fn allows(self, a: &EdgeNode<'_>, b: &EdgeNode<'_>) -> bool {
		match self {
			EdgeScope::Global => true,
			EdgeScope::Group => a.group == b.group,
		}
	}
}

/// Edge settings of one field.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
	pub policy: EdgePolicy,
	pub scope: EdgeScope,
	/// Only draw edges while the pointer hovers the canvas.
	pub hover_only: bool,
}

/// The view of a particle the edge pass needs.
#[derive(Clone, Copy, Debug)]
pub struct EdgeNode<'a> {
	pub id: u64,
	pub x: f64,
	pub y: f64,
	pub alpha: f64,
	pub group: Option<u32>,
	pub links: &'a [u64],
	/// Hidden nodes (not yet revealed) take part in no edge.
	pub visible: bool,
}

impl EdgeNode<'_> {
	fn distance(&self, other: &EdgeNode<'_>) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// An undirected edge between node indices `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
	pub a: usize,
	pub b: usize,
	pub distance: f64,
	pub opacity: f64,
}

fn edge(nodes: &[EdgeNode<'_>], a: usize, b: usize, distance: f64, threshold: f64) -> Edge {
	let (a, b) = (a.min(b), a.max(b));
	Edge {
		a,
		b,
		distance,
		opacity: nodes[a].alpha.min(nodes[b].alpha) * (1.0 - distance / threshold),
	}
}

/// Compute this frame's edges.
///
/// `distance_factor` scales the policy threshold to the current surface.
pub fn compute_edges(
	nodes: &[EdgeNode<'_>],
	policy: &EdgePolicy,
	scope: EdgeScope,
	distance_factor: f64,
) -> Vec<Edge> {
	let threshold = match *policy {
		EdgePolicy::None => return Vec::new(),
		EdgePolicy::AllPairs { threshold }
		| EdgePolicy::KNearest { threshold, .. }
		| EdgePolicy::Linked { threshold } => threshold * distance_factor,
	};
	if threshold.is_nan() || threshold <= 0.0 {
		return Vec::new();
	}

	let candidate = |i: usize, j: usize| -> Option<f64> {
		let (a, b) = (&nodes[i], &nodes[j]);
		if i == j || !a.visible || !b.visible || !scope.allows(a, b) {
			return None;
		}
		let d = a.distance(b);
		(d < threshold).then_some(d)
	};

	let mut edges = Vec::new();
	match *policy {
		EdgePolicy::None => {}
		EdgePolicy::AllPairs { .. } => {
			for i in 0..nodes.len() {
				for j in i + 1..nodes.len() {
					if let Some(d) = candidate(i, j) {
						edges.push(edge(nodes, i, j, d, threshold));
					}
				}
			}
		}
		EdgePolicy::KNearest { k, .. } => {
			let mut seen = HashSet::new();
			for i in 0..nodes.len() {
				let mut near: Vec<(usize, f64)> = (0..nodes.len())
					.filter_map(|j| candidate(i, j).map(|d| (j, d)))
					.collect();
				near.sort_by(|a, b| a.1.total_cmp(&b.1));
				for (j, d) in near.into_iter().take(k) {
					if seen.insert((i.min(j), i.max(j))) {
						edges.push(edge(nodes, i, j, d, threshold));
					}
				}
			}
		}
		EdgePolicy::Linked { .. } => {
			let index: HashMap<u64, usize> =
				nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
			let mut seen = HashSet::new();
			for (i, node) in nodes.iter().enumerate() {
				for peer in node.links {
					let Some(&j) = index.get(peer) else {
						continue;
					};
					if let Some(d) = candidate(i, j) {
						if seen.insert((i.min(j), i.max(j))) {
							edges.push(edge(nodes, i, j, d, threshold));
						}
					}
				}
			}
		}
	}
	edges
}
