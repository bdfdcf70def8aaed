//! Layered layout for directed graphs.
//!
//! Cycles are broken by reversing DFS back edges, nodes are ranked by
//! longest path from the sources, each rank is reordered with barycenter
//! sweeps to reduce crossings, and ranks are then spread out along the
//! configured direction.

use std::cmp::Ordering;

use log::debug;

use super::layout::LayoutGraph;
use crate::config::{LayeredLayoutConfig, RankDirection};

/// Assigns `x`/`y` to every node of `graph`.
pub fn run(graph: &mut LayoutGraph, config: &LayeredLayoutConfig) {
	let n = graph.nodes.len();
	if n == 0 {
		return;
	}

	let edges = acyclic_edges(n, &graph.edges);
	let ranks = longest_path_ranks(n, &edges);
	let mut layers = build_layers(&ranks);
	for _ in 0..config.sweeps {
		sweep(&mut layers, &edges, Sweep::Down);
		sweep(&mut layers, &edges, Sweep::Up);
	}
	debug!(
		"layered layout: {n} nodes, {} edges, {} ranks",
		edges.len(),
		layers.len()
	);

	let sizes: Vec<f64> = graph.nodes.iter().map(|node| node.size).collect();
	let mut rank_offset = 0.0;
	let mut previous_depth: Option<f64> = None;
	for layer in &layers {
		let depth = layer.iter().map(|&v| sizes[v]).fold(0.0, f64::max);
		if let Some(prev) = previous_depth {
			rank_offset += prev / 2.0 + config.rank_sep + depth / 2.0;
		}
		previous_depth = Some(depth);

		let breadth: f64 = layer.iter().map(|&v| sizes[v]).sum::<f64>()
			+ config.node_sep * layer.len().saturating_sub(1) as f64;
		let mut cursor = -breadth / 2.0;
		for &v in layer {
			let along = cursor + sizes[v] / 2.0;
			cursor += sizes[v] + config.node_sep;
			let node = &mut graph.nodes[v];
			let (x, y) = match config.direction {
				RankDirection::TopBottom => (along, rank_offset),
				RankDirection::LeftRight => (rank_offset, along),
			};
			node.x = Some(x);
			node.y = Some(y);
		}
	}
}

/// Edge list with self loops dropped and DFS back edges reversed.
fn acyclic_edges(n: usize, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
	let mut out: Vec<Vec<usize>> = vec![Vec::new(); n];
	for &(s, t) in edges {
		if s != t && s < n && t < n {
			out[s].push(t);
		}
	}

	#[derive(Clone, Copy, PartialEq)]
	enum Mark {
		New,
		OnStack,
		Done,
	}
	let mut marks = vec![Mark::New; n];
	let mut result = Vec::with_capacity(edges.len());

	for root in 0..n {
		if marks[root] != Mark::New {
			continue;
		}
		// (node, next child to visit)
		let mut stack = vec![(root, 0usize)];
		marks[root] = Mark::OnStack;
		while let Some(top) = stack.last_mut() {
			let v = top.0;
			if let Some(&w) = out[v].get(top.1) {
				top.1 += 1;
				match marks[w] {
					Mark::OnStack => result.push((w, v)),
					Mark::Done => result.push((v, w)),
					Mark::New => {
						result.push((v, w));
						marks[w] = Mark::OnStack;
						stack.push((w, 0));
					}
				}
			} else {
				marks[v] = Mark::Done;
				stack.pop();
			}
		}
	}
	result
}

/// Rank of each node: the length of the longest path reaching it.
fn longest_path_ranks(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
	let mut indegree = vec![0usize; n];
	let mut out: Vec<Vec<usize>> = vec![Vec::new(); n];
	for &(s, t) in edges {
		out[s].push(t);
		indegree[t] += 1;
	}

	let mut ranks = vec![0usize; n];
	let mut queue: Vec<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
	let mut head = 0;
	while head < queue.len() {
		let v = queue[head];
		head += 1;
		for &w in &out[v] {
			ranks[w] = ranks[w].max(ranks[v] + 1);
			indegree[w] -= 1;
			if indegree[w] == 0 {
				queue.push(w);
			}
		}
	}
	ranks
}

fn build_layers(ranks: &[usize]) -> Vec<Vec<usize>> {
	let depth = ranks.iter().copied().max().map_or(0, |r| r + 1);
	let mut layers = vec![Vec::new(); depth];
	for (v, &rank) in ranks.iter().enumerate() {
		layers[rank].push(v);
	}
	layers
}

#[derive(Clone, Copy)]
enum Sweep {
	Down,
	Up,
}

fn sweep(layers: &mut [Vec<usize>], edges: &[(usize, usize)], direction: Sweep) {
	let count = layers.len();
	if count < 2 {
		return;
	}
	match direction {
		Sweep::Down => {
			for i in 1..count {
				let (fixed, rest) = layers.split_at_mut(i);
				reorder_by_barycenter(&mut rest[0], &fixed[i - 1], edges);
			}
		}
		Sweep::Up => {
			for i in (0..count - 1).rev() {
				let (head, tail) = layers.split_at_mut(i + 1);
				reorder_by_barycenter(&mut head[i], &tail[0], edges);
			}
		}
	}
}

/// Sorts `layer` by the mean position of each node's neighbours in
/// `reference`. Nodes without such neighbours keep their current index.
fn reorder_by_barycenter(layer: &mut Vec<usize>, reference: &[usize], edges: &[(usize, usize)]) {
	let position = |v: usize| reference.iter().position(|&r| r == v);

	let mut keyed: Vec<(usize, f64)> = layer
		.iter()
		.enumerate()
		.map(|(index, &v)| {
			let (sum, count) = edges
				.iter()
				.filter_map(|&(s, t)| {
					if s == v {
						position(t)
					} else if t == v {
						position(s)
					} else {
						None
					}
				})
				.fold((0.0, 0usize), |(sum, count), p| (sum + p as f64, count + 1));
			let barycenter = if count > 0 {
				sum / count as f64
			} else {
				index as f64
			};
			(v, barycenter)
		})
		.collect();

	keyed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
	*layer = keyed.into_iter().map(|(v, _)| v).collect();
}
