//! 2D KD tree with exact radial search.
//!
//! Purpose
//! - Spatial index for the mirrored point cloud rebuilt on every growth
//!   iteration: bulk-build once, query many, never mutate.
//!
//! Why this design
//! - Balanced median splits keep queries O(log N) for the flat clouds we
//!   build (a few thousand points); per-node subtree bounding boxes make the
//!   radial prune cheap and exact.
//! - Results are exact (inclusive `d <= r`), no approximate mode.
//!
//! Code cross-refs: `growth::GrowthEngine` (sole in-crate consumer).

use crate::Vec2;

const NIL: usize = usize::MAX;

struct Node {
    key: Vec2,
    value: usize,
    left: usize,
    right: usize,
    /// Bounding box of the whole subtree rooted here.
    lo: Vec2,
    hi: Vec2,
}

/// Immutable balanced KD tree over 2D keys with parallel value slots.
pub struct KdTree2 {
    nodes: Vec<Node>,
    root: usize,
}

impl KdTree2 {
    /// Bulk-build from parallel key/value slices.
    ///
    /// Returns `None` on empty input or a length mismatch. Insertion order is
    /// not preserved.
    pub fn build(keys: &[Vec2], values: &[usize]) -> Option<KdTree2> {
        if keys.is_empty() || keys.len() != values.len() {
            return None;
        }
        let mut items: Vec<(Vec2, usize)> = keys.iter().copied().zip(values.iter().copied()).collect();
        let mut tree = KdTree2 {
            nodes: Vec::with_capacity(items.len()),
            root: NIL,
        };
        tree.root = tree.build_rec(&mut items, 0);
        Some(tree)
    }

    /// Convenience: values are the key indices themselves.
    pub fn from_keys(keys: &[Vec2]) -> Option<KdTree2> {
        let values: Vec<usize> = (0..keys.len()).collect();
        KdTree2::build(keys, &values)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All stored values whose key lies within Euclidean distance `radius` of `q`.
    pub fn radial_search(&self, q: Vec2, radius: f64) -> Vec<usize> {
        let mut out = Vec::new();
        self.radial_search_into(q, radius, &mut out);
        out
    }

    /// Allocation-reusing variant of [`radial_search`](Self::radial_search).
    pub fn radial_search_into(&self, q: Vec2, radius: f64, out: &mut Vec<usize>) {
        out.clear();
        if self.root == NIL || radius < 0.0 {
            return;
        }
        let r2 = radius * radius;
        self.search_rec(self.root, q, r2, out);
    }

    fn search_rec(&self, idx: usize, q: Vec2, r2: f64, out: &mut Vec<usize>) {
        let node = &self.nodes[idx];
        if bbox_dist2(q, node.lo, node.hi) > r2 {
            return;
        }
        let d = node.key - q;
        if d.norm_squared() <= r2 {
            out.push(node.value);
        }
        if node.left != NIL {
            self.search_rec(node.left, q, r2, out);
        }
        if node.right != NIL {
            self.search_rec(node.right, q, r2, out);
        }
    }

    fn build_rec(&mut self, items: &mut [(Vec2, usize)], depth: usize) -> usize {
        if items.is_empty() {
            return NIL;
        }
        let mid = items.len() / 2;
        if depth % 2 == 0 {
            items.select_nth_unstable_by(mid, |a, b| {
                a.0.x.partial_cmp(&b.0.x).unwrap_or(std::cmp::Ordering::Equal)
            });
        } else {
            items.select_nth_unstable_by(mid, |a, b| {
                a.0.y.partial_cmp(&b.0.y).unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        let (key, value) = items[mid];
        let slot = self.nodes.len();
        self.nodes.push(Node {
            key,
            value,
            left: NIL,
            right: NIL,
            lo: key,
            hi: key,
        });
        let (before, rest) = items.split_at_mut(mid);
        let after = &mut rest[1..];
        let left = self.build_rec(before, depth + 1);
        let right = self.build_rec(after, depth + 1);
        let (mut lo, mut hi) = (key, key);
        for &child in &[left, right] {
            if child != NIL {
                let c = &self.nodes[child];
                lo.x = lo.x.min(c.lo.x);
                lo.y = lo.y.min(c.lo.y);
                hi.x = hi.x.max(c.hi.x);
                hi.y = hi.y.max(c.hi.y);
            }
        }
        let node = &mut self.nodes[slot];
        node.left = left;
        node.right = right;
        node.lo = lo;
        node.hi = hi;
        slot
    }
}

/// Squared distance from `q` to the axis-aligned box `[lo, hi]` (zero inside).
#[inline]
fn bbox_dist2(q: Vec2, lo: Vec2, hi: Vec2) -> f64 {
    let dx = (lo.x - q.x).max(0.0).max(q.x - hi.x);
    let dy = (lo.y - q.y).max(0.0).max(q.y - hi.y);
    dx * dx + dy * dy
}
