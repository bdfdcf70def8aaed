//! Curvature for parallel edges between the same pair of nodes.

use std::collections::HashMap;

/// Distance between two neighbouring curves of the same group.
pub const CURVE_SPACING: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// Position of one edge among all edges joining the same two nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeGroup {
	pub size: usize,
	pub position: usize,
	/// `1` when the edge runs in the group's canonical direction, `-1`
	/// when it runs the other way.
	pub direction: i8,
}

impl EdgeGroup {
	pub fn is_curved(&self) -> bool {
		self.size > 1
	}
}

/// Assigns an [`EdgeGroup`] to every `(source, target)` pair, in input order.
pub fn group_edges<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<EdgeGroup> {
	let edges: Vec<(&str, &str)> = edges.into_iter().collect();
	let mut sizes: HashMap<(&str, &str), usize> = HashMap::new();
	for &(s, t) in &edges {
		*sizes.entry(canonical(s, t)).or_default() += 1;
	}

	let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
	edges
		.iter()
		.map(|&(s, t)| {
			let pair = canonical(s, t);
			let position = seen.entry(pair).or_default();
			let group = EdgeGroup {
				size: sizes[&pair],
				position: *position,
				direction: if pair == (s, t) { 1 } else { -1 },
			};
			*position += 1;
			group
		})
		.collect()
}

fn canonical<'a>(s: &'a str, t: &'a str) -> (&'a str, &'a str) {
	if s <= t { (s, t) } else { (t, s) }
}

/// Signed offset of the curve apex from the straight line. Groups are
/// spread symmetrically around the straight edge, odd groups keep one
/// straight member.
pub fn curve_height(group: EdgeGroup) -> f64 {
	if !group.is_curved() {
		return 0.0;
	}
	let centre = (group.size as f64 - 1.0) / 2.0;
	(group.position as f64 - centre) * CURVE_SPACING * group.direction as f64
}

/// Quadratic bezier control point placing the curve apex `height` away
/// from the midpoint of `source -> target`.
pub fn control_point(height: f64, source: Point, target: Point) -> Point {
	let mid = Point {
		x: (source.x + target.x) / 2.0,
		y: (source.y + target.y) / 2.0,
	};
	let (dx, dy) = (target.x - source.x, target.y - source.y);
	let len = (dx * dx + dy * dy).sqrt();
	if len < f64::EPSILON {
		return mid;
	}
	// The apex of a quadratic curve sits halfway to its control point.
	let (nx, ny) = (-dy / len, dx / len);
	Point {
		x: mid.x + nx * height * 2.0,
		y: mid.y + ny * height * 2.0,
	}
}

/// Point at `t` along the quadratic curve.
pub fn point_on_curve(t: f64, source: Point, control: Point, target: Point) -> Point {
	let u = 1.0 - t;
	Point {
		x: u * u * source.x + 2.0 * u * t * control.x + t * t * target.x,
		y: u * u * source.y + 2.0 * u * t * control.y + t * t * target.y,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn single_edges_are_straight() {
		let groups = group_edges([("a", "b"), ("b", "c")]);
		assert!(groups.iter().all(|g| !g.is_curved()));
		assert_eq!(curve_height(groups[0]), 0.0);
	}

	#[test]
	fn parallel_edges_spread_around_the_line() {
		let groups = group_edges([("a", "b"), ("a", "b")]);
		assert_eq!(groups[0].size, 2);
		let heights: Vec<f64> = groups.iter().map(|g| curve_height(*g)).collect();
		assert_eq!(heights, vec![-CURVE_SPACING / 2.0, CURVE_SPACING / 2.0]);
	}

	#[test]
	fn reversed_edges_record_their_direction() {
		let groups = group_edges([("a", "b"), ("b", "a")]);
		assert_eq!(groups[0].direction, 1);
		assert_eq!(groups[1].direction, -1);
	}

	#[test]
	fn curve_apex_is_height_away_from_midpoint() {
		let (s, t) = (Point { x: 0.0, y: 0.0 }, Point { x: 10.0, y: 0.0 });
		let control = control_point(5.0, s, t);
		let apex = point_on_curve(0.5, s, control, t);
		assert!((apex.x - 5.0).abs() < 1e-9);
		assert!((apex.y - 5.0).abs() < 1e-9);
	}
}
