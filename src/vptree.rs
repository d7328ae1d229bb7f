//! Vantage-Point Trees are a data structure for fast
//! k-nearest-neighbor and range searches in arbitrary metric spaces.

use std::fmt::{Debug, Write};

use log::{debug, log_enabled, Level};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::median::median;
use crate::metric::{Metric, Scalar};

/// One vantage point and the two subtrees partitioned around it.
///
/// The `*_min`/`*_max` bounds are the observed extremes of the distance
/// from `center` to any point stored in that subtree. An empty side keeps
/// the sentinel bounds `[+inf, 0]`.
pub(crate) struct VPNode<K, P, F: Scalar> {
    pub(crate) id: K,
    pub(crate) center: P,
    pub(crate) left: Option<Box<VPNode<K, P, F>>>,
    pub(crate) right: Option<Box<VPNode<K, P, F>>>,
    pub(crate) left_min: F,
    pub(crate) left_max: F,
    pub(crate) right_min: F,
    pub(crate) right_max: F,
}

impl<K, P, F: Scalar> VPNode<K, P, F> {
    fn leaf(id: K, center: P) -> Self {
        VPNode {
            id,
            center,
            left: None,
            right: None,
            left_min: F::infinity(),
            left_max: F::zero(),
            right_min: F::infinity(),
            right_max: F::zero(),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Present children along with their distance bounds.
    pub(crate) fn children(&self) -> impl Iterator<Item = (&VPNode<K, P, F>, F, F)> {
        let left = self.left.as_deref().map(|n| (n, self.left_min, self.left_max));
        let right = self.right.as_deref().map(|n| (n, self.right_min, self.right_max));
        left.into_iter().chain(right)
    }

    /// Make a node from the last of `items` and split the rest around it.
    ///
    /// Points closer than the median distance go left, the others right.
    /// Each side ends with its point farthest from this vantage point, so
    /// that point becomes the child's vantage point.
    fn split<D, R>(mut items: Vec<(K, P)>, metric: &D, rng: &mut R) -> Option<(Self, Vec<(K, P)>, Vec<(K, P)>)>
        where D: Metric<P, F>, R: Rng + ?Sized {

        let (id, center) = items.pop()?;
        let mut node = VPNode::leaf(id, center);
        if items.is_empty() {
            return Some((node, Vec::new(), Vec::new()));
        }

        let distances: Vec<F> = items.iter()
            .map(|(_, p)| metric.distance(&node.center, p))
            .collect();

        // Child bounds are the observed extremes, never mu itself.
        let mu = median(&distances, rng).unwrap_or_else(F::zero);

        let mut left_items = Vec::with_capacity(items.len() / 2);
        let mut right_items = Vec::with_capacity(items.len() / 2 + 1);
        let mut left_far = 0;
        let mut right_far = 0;
        for (item, d) in items.into_iter().zip(distances) {
            if d < mu {
                if left_items.is_empty() || d > node.left_max {
                    left_far = left_items.len();
                }
                node.left_min = node.left_min.min(d);
                node.left_max = node.left_max.max(d);
                left_items.push(item);
            } else {
                if right_items.is_empty() || d > node.right_max {
                    right_far = right_items.len();
                }
                node.right_min = node.right_min.min(d);
                node.right_max = node.right_max.max(d);
                right_items.push(item);
            }
        }

        if let Some(last) = left_items.len().checked_sub(1) {
            left_items.swap(left_far, last);
        }
        if let Some(last) = right_items.len().checked_sub(1) {
            right_items.swap(right_far, last);
        }
        Some((node, left_items, right_items))
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Build the whole tree without recursion, so duplicate-heavy input (which
/// chains every point to the right) cannot exhaust the stack.
///
/// Nodes are split in pre-order into a flat list that records child
/// positions, then boxed from the back, where children always sit after
/// their parent.
fn build_tree<K, P, F, D, R>(items: Vec<(K, P)>, metric: &D, rng: &mut R) -> Option<Box<VPNode<K, P, F>>>
    where F: Scalar, D: Metric<P, F>, R: Rng + ?Sized {

    let mut nodes: Vec<(VPNode<K, P, F>, Option<usize>, Option<usize>)> = Vec::with_capacity(items.len());
    let mut pending: Vec<(Vec<(K, P)>, Option<(usize, Side)>)> = vec![(items, None)];

    while let Some((items, parent)) = pending.pop() {
        let (node, left_items, right_items) = match VPNode::split(items, metric, rng) {
            Some(parts) => parts,
            None => continue,
        };
        let at = nodes.len();
        nodes.push((node, None, None));
        match parent {
            Some((p, Side::Left)) => nodes[p].1 = Some(at),
            Some((p, Side::Right)) => nodes[p].2 = Some(at),
            None => {}
        }
        if !right_items.is_empty() {
            pending.push((right_items, Some((at, Side::Right))));
        }
        if !left_items.is_empty() {
            pending.push((left_items, Some((at, Side::Left))));
        }
    }

    let mut boxed: Vec<Option<Box<VPNode<K, P, F>>>> = Vec::with_capacity(nodes.len());
    boxed.resize_with(nodes.len(), || None);
    while let Some((mut node, left, right)) = nodes.pop() {
        node.left = left.and_then(|i| boxed[i].take());
        node.right = right.and_then(|i| boxed[i].take());
        boxed[nodes.len()] = Some(Box::new(node));
    }
    boxed.into_iter().next().flatten()
}

/// An immutable vantage point tree over `(id, point)` pairs.
///
/// Results are keyed by the caller-assigned id, so two points with equal
/// content stay distinct. The tree is never modified after construction
/// and may be shared freely between reader threads.
pub struct VPTree<K, P, F: Scalar, D: Metric<P, F>> {
    root: Option<Box<VPNode<K, P, F>>>,
    metric: D,
    len: usize,
}

impl<K, P, F: Scalar, D: Metric<P, F>> VPTree<K, P, F, D> {
    /// Construct a new vantage point tree, shuffling with the thread-local rng.
    pub fn new(items: Vec<(K, P)>, metric: D) -> Self {
        VPTree::with_rng(items, metric, &mut rand::thread_rng())
    }

    /// Construct a new vantage point tree using `rng` for every random choice.
    ///
    /// Seeding `rng` reproduces the same tree shape for the same input.
    pub fn with_rng<R: Rng + ?Sized>(mut items: Vec<(K, P)>, metric: D, rng: &mut R) -> Self {
        let len = items.len();
        items.shuffle(rng);
        let root = build_tree(items, &metric, rng);

        let tree = VPTree { root, metric, len };
        if log_enabled!(Level::Debug) {
            debug!("built vp-tree over {} points, depth {}", tree.len, tree.depth());
        }
        tree
    }

    pub(crate) fn root(&self) -> Option<&VPNode<K, P, F>> {
        self.root.as_deref()
    }

    /// The distance function the tree was built with.
    pub fn metric(&self) -> &D {
        &self.metric
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the tree was built from no points; every query on it
    /// returns nothing.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&VPNode<K, P, F>, usize)> = self.root().map(|r| (r, 1)).into_iter().collect();
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children().map(|(child, _, _)| (child, level + 1)));
        }
        deepest
    }

    /// Visit every indexed point in pre-order (vantage point, then left,
    /// then right subtree).
    pub fn iter(&self) -> Iter<'_, K, P, F> {
        Iter { stack: self.root().into_iter().collect() }
    }

    /// Render the tree structure, one node per line.
    pub fn dump(&self) -> String
        where K: Debug {

        let mut out = String::new();
        let mut stack: Vec<(&VPNode<K, P, F>, usize, &str)> =
            self.root().map(|r| (r, 0, "root")).into_iter().collect();
        while let Some((node, indent, side)) = stack.pop() {
            let _ = write!(out, "{:width$}{} {:?}", "", side, node.id, width = indent * 2);
            if node.is_leaf() {
                out.push('\n');
                continue;
            }
            let _ = writeln!(out, " left=[{}, {}] right=[{}, {}]",
                             node.left_min, node.left_max, node.right_min, node.right_max);
            if let Some(right) = node.right.as_deref() {
                stack.push((right, indent + 1, "R"));
            }
            if let Some(left) = node.left.as_deref() {
                stack.push((left, indent + 1, "L"));
            }
        }
        out
    }
}

impl<K, P, F: Scalar, D: Metric<P, F>> Drop for VPTree<K, P, F, D> {
    // The default drop recurses once per level.
    fn drop(&mut self) {
        let mut stack: Vec<Box<VPNode<K, P, F>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<P, F: Scalar, D: Metric<P, F>> VPTree<usize, P, F, D> {
    /// Construct a tree whose ids are the points' positions in `points`.
    pub fn from_points(points: Vec<P>, metric: D) -> Self {
        VPTree::new(points.into_iter().enumerate().collect(), metric)
    }
}

/// Pre-order iterator over `(id, point)` pairs of a tree.
pub struct Iter<'a, K, P, F: Scalar> {
    stack: Vec<&'a VPNode<K, P, F>>,
}

impl<'a, K, P, F: Scalar> Iterator for Iter<'a, K, P, F> {
    type Item = (&'a K, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }
        Some((&node.id, &node.center))
    }
}

impl<'a, K, P, F: Scalar, D: Metric<P, F>> IntoIterator for &'a VPTree<K, P, F, D> {
    type Item = (&'a K, &'a P);
    type IntoIter = Iter<'a, K, P, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
