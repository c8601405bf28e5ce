//! KD-tree spatial index for efficient radius and nearest-neighbour queries.
//!
//! The index is a balanced 3D k-d tree built once from a snapshot of stars
//! and never mutated; rebuild it to reflect a changed star set. Nodes live in
//! a flat arena and reference their children by index, so the tree is cheap
//! to traverse and trivially shareable across threads for read-only queries.
//!
//! Construction is O(n log² n) (sort-by-axis per level); radius queries visit
//! only subtrees whose splitting plane lies within the search radius and
//! return exactly the set a brute-force scan would.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::info;

use crate::error::{Error, Result};
use crate::star::{Point3, Star, StarId};

/// Arena node: one indexed star plus its splitting axis and children.
#[derive(Debug, Clone)]
struct TreeNode {
    star: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Immutable spatial index over a set of stars.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    stars: Vec<Star>,
    nodes: Vec<TreeNode>,
    root: Option<usize>,
    id_to_index: HashMap<StarId, usize>,
}

impl SpatialIndex {
    /// Build an index from a snapshot of stars.
    ///
    /// Fails with [`Error::DuplicateStarId`] when two stars share an
    /// identifier. An empty input builds an empty index whose queries return
    /// empty results.
    pub fn build(stars: &[Star]) -> Result<Self> {
        let mut id_to_index = HashMap::with_capacity(stars.len());
        for (index, star) in stars.iter().enumerate() {
            if id_to_index.insert(star.id.clone(), index).is_some() {
                return Err(Error::DuplicateStarId {
                    id: star.id.clone(),
                });
            }
        }

        let stars = stars.to_vec();
        let mut nodes = Vec::with_capacity(stars.len());
        let mut order: Vec<usize> = (0..stars.len()).collect();
        let root = build_recursive(&stars, &mut order, 0, &mut nodes);

        info!(star_count = stars.len(), "built spatial index");

        Ok(Self {
            stars,
            nodes,
            root,
            id_to_index,
        })
    }

    /// Number of indexed stars.
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// Returns true if the index holds no stars.
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Find every star within `radius` of `center`.
    ///
    /// Returns (star, distance) pairs sorted by distance then identifier.
    /// The boundary is inclusive: a star exactly `radius` away matches.
    /// `radius` must be non-negative and not NaN.
    pub fn within_radius(&self, center: Point3, radius: f64) -> Result<Vec<(&Star, f64)>> {
        if radius < 0.0 || radius.is_nan() {
            return Err(Error::invalid_argument(format!(
                "radius must be non-negative, got {radius}"
            )));
        }

        let mut matches = Vec::new();
        self.radius_search(self.root, &center, radius * radius, &mut matches);
        matches.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));
        Ok(matches)
    }

    /// Find the `count` stars closest to `point`.
    ///
    /// Returns (star, distance) pairs sorted by distance then identifier;
    /// ties at the cut-off distance are resolved in favour of the
    /// lexicographically smaller identifier.
    pub fn nearest(&self, point: Point3, count: usize) -> Vec<(&Star, f64)> {
        self.nearest_impl(point, count, None)
    }

    /// Find the `count` stars closest to an indexed star, excluding the star
    /// itself.
    pub fn nearest_to_star(&self, id: &str, count: usize) -> Result<Vec<(&Star, f64)>> {
        let index = self
            .id_to_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownStar { id: id.to_string() })?;
        let position = self.stars[index].position;
        Ok(self.nearest_impl(position, count, Some(id)))
    }

    fn nearest_impl(&self, point: Point3, count: usize, exclude: Option<&str>) -> Vec<(&Star, f64)> {
        if count == 0 || self.stars.is_empty() {
            return Vec::new();
        }

        let mut worst = BinaryHeap::with_capacity(count.min(self.stars.len()) + 1);
        self.nearest_search(self.root, &point, count, exclude, &mut worst);

        let mut matches: Vec<(&Star, f64)> = worst
            .into_iter()
            .map(|candidate| (&self.stars[candidate.star], candidate.distance))
            .collect();
        matches.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));
        matches
    }

    fn radius_search<'a>(
        &'a self,
        node: Option<usize>,
        center: &Point3,
        radius_squared: f64,
        matches: &mut Vec<(&'a Star, f64)>,
    ) {
        let Some(index) = node else {
            return;
        };
        let node = &self.nodes[index];
        let star = &self.stars[node.star];

        let dist_squared = center.distance_squared(&star.position);
        if dist_squared <= radius_squared {
            matches.push((star, dist_squared.sqrt()));
        }

        let delta = center.coord(node.axis) - star.position.coord(node.axis);
        let (near, far) = if delta < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.radius_search(near, center, radius_squared, matches);
        // Cross the splitting plane only when it lies within the radius.
        if delta * delta <= radius_squared {
            self.radius_search(far, center, radius_squared, matches);
        }
    }

    fn nearest_search<'a>(
        &'a self,
        node: Option<usize>,
        point: &Point3,
        count: usize,
        exclude: Option<&str>,
        worst: &mut BinaryHeap<Candidate<'a>>,
    ) {
        let Some(index) = node else {
            return;
        };
        let node = &self.nodes[index];
        let star = &self.stars[node.star];

        if exclude != Some(star.id.as_str()) {
            worst.push(Candidate {
                distance: point.distance_to(&star.position),
                id: &star.id,
                star: node.star,
            });
            if worst.len() > count {
                worst.pop();
            }
        }

        let delta = point.coord(node.axis) - star.position.coord(node.axis);
        let (near, far) = if delta < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.nearest_search(near, point, count, exclude, worst);

        // The far side can still matter while the result set is short, or
        // while the splitting plane is no farther than the current worst
        // candidate (equality included so identifier ties stay exact).
        let must_cross = worst.len() < count
            || match worst.peek() {
                Some(w) => delta * delta <= w.distance * w.distance,
                None => true,
            };
        if must_cross {
            self.nearest_search(far, point, count, exclude, worst);
        }
    }
}

fn build_recursive(
    stars: &[Star],
    order: &mut [usize],
    depth: usize,
    nodes: &mut Vec<TreeNode>,
) -> Option<usize> {
    if order.is_empty() {
        return None;
    }

    let axis = depth % 3;
    order.sort_unstable_by(|&a, &b| {
        stars[a]
            .position
            .coord(axis)
            .total_cmp(&stars[b].position.coord(axis))
            .then_with(|| stars[a].id.cmp(&stars[b].id))
    });
    let mid = order.len() / 2;
    let star = order[mid];

    let index = nodes.len();
    nodes.push(TreeNode {
        star,
        axis,
        left: None,
        right: None,
    });

    let (left_half, rest) = order.split_at_mut(mid);
    let left = build_recursive(stars, left_half, depth + 1, nodes);
    let right = build_recursive(stars, &mut rest[1..], depth + 1, nodes);

    nodes[index].left = left;
    nodes[index].right = right;
    Some(index)
}

/// Max-heap entry for bounded nearest-neighbour searches; the heap top is the
/// worst retained candidate by (distance, identifier).
#[derive(Debug)]
struct Candidate<'a> {
    distance: f64,
    id: &'a str,
    star: usize,
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate<'_> {}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(other.id))
    }
}
