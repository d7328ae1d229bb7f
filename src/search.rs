//! Branch-and-bound k-nearest-neighbor and range searches.
//!
//! Both searches drain a double-ended worklist of `(gap, node)` entries.
//! Children whose bound interval contains the query distance are pushed to
//! the front and visited depth-first; children that are merely within the
//! search radius of their interval go to the back, tagged with how far
//! outside the interval the query fell. An entry is discarded when popped
//! if its gap has since grown larger than the radius.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use log::trace;

use crate::error::{Error, Result};
use crate::heap::BoundedMaxHeap;
use crate::metric::{Metric, Scalar};
use crate::vptree::{VPNode, VPTree};

/// Work done by a single query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose vantage point was measured against the query.
    pub nodes_visited: usize,
    /// Subtrees skipped, either immediately or when a stale entry was popped.
    pub nodes_pruned: usize,
}

/// A search hit borrowed from the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, K, P, F> {
    pub id: &'a K,
    pub point: &'a P,
    pub distance: F,
}

type Worklist<'a, K, P, F> = VecDeque<(F, &'a VPNode<K, P, F>)>;

/// Current k-th best distance, or infinity while fewer than k are known.
fn tau<F: Scalar, T>(best: &BoundedMaxHeap<F, T>) -> F {
    if best.is_full() {
        best.peek_max().unwrap_or_else(|_| F::infinity())
    } else {
        F::infinity()
    }
}

impl<K, P, F: Scalar, D: Metric<P, F>> VPTree<K, P, F, D> {
    /// Drive the worklist from the root.
    ///
    /// `visit` is called with each measured node and its distance to the
    /// query, and returns the radius to prune with from then on. The radius
    /// must never grow.
    fn traverse<'a, V>(&'a self, query: &P, mut radius: F, mut visit: V) -> SearchStats
        where V: FnMut(&'a VPNode<K, P, F>, F) -> F {

        let mut stats = SearchStats::default();
        let root = match self.root() {
            Some(root) => root,
            None => return stats,
        };

        let mut worklist: Worklist<'a, K, P, F> = VecDeque::new();
        worklist.push_front((F::zero(), root));

        while let Some((gap, node)) = worklist.pop_front() {
            if gap > radius {
                stats.nodes_pruned += 1;
                continue;
            }

            let d = self.metric().distance(query, &node.center);
            stats.nodes_visited += 1;
            radius = visit(node, d);

            for (child, lo, hi) in node.children() {
                if lo <= d && d <= hi {
                    worklist.push_front((F::zero(), child));
                } else if lo - radius <= d && d <= hi + radius {
                    let gap = if d < lo { lo - d } else { d - hi };
                    worklist.push_back((gap, child));
                } else {
                    stats.nodes_pruned += 1;
                }
            }
        }
        stats
    }

    fn knn_heap(&self, query: &P, k: usize) -> Result<(BoundedMaxHeap<F, &VPNode<K, P, F>>, SearchStats)> {
        if k < 1 {
            return Err(Error::InvalidK { k });
        }

        let mut best = BoundedMaxHeap::new(k);
        let stats = self.traverse(query, F::infinity(), |node, d| {
            if !best.is_full() || d < tau(&best) {
                best.push(d, node);
            }
            tau(&best)
        });

        trace!("knn k={} found={} visited={} pruned={}",
               k, best.len(), stats.nodes_visited, stats.nodes_pruned);
        Ok((best, stats))
    }

    /// Find the `k` nearest neighbors, closest first.
    ///
    /// Among points at the same distance as the k-th neighbor, which ones
    /// are returned is unspecified.
    pub fn nearest_neighbors(&self, query: &P, k: usize) -> Result<Vec<Neighbor<'_, K, P, F>>> {
        let (best, _) = self.knn_heap(query, k)?;
        Ok(best.into_sorted_vec().into_iter()
           .map(|(distance, node)| Neighbor { id: &node.id, point: &node.center, distance })
           .collect())
    }

    /// Find the nearest neighbor, or `None` if the tree is empty.
    pub fn nearest_neighbor(&self, query: &P) -> Option<Neighbor<'_, K, P, F>> {
        self.nearest_neighbors(query, 1).ok()?.into_iter().next()
    }
}

impl<K, P, F, D> VPTree<K, P, F, D>
    where K: Eq + Hash + Clone, F: Scalar, D: Metric<P, F> {

    /// Map the ids of the `k` points nearest to `query` to their distances.
    ///
    /// The result holds `min(k, self.len())` entries.
    pub fn knn(&self, query: &P, k: usize) -> Result<HashMap<K, F>> {
        self.knn_with_stats(query, k).map(|(found, _)| found)
    }

    pub fn knn_with_stats(&self, query: &P, k: usize) -> Result<(HashMap<K, F>, SearchStats)> {
        let (best, stats) = self.knn_heap(query, k)?;
        let found = best.into_vec().into_iter()
            .map(|(d, node)| (node.id.clone(), d))
            .collect();
        Ok((found, stats))
    }

    /// Map the id of every point within `threshold` of `query` (inclusive)
    /// to its distance.
    pub fn range(&self, query: &P, threshold: F) -> Result<HashMap<K, F>> {
        self.range_with_stats(query, threshold).map(|(found, _)| found)
    }

    pub fn range_with_stats(&self, query: &P, threshold: F) -> Result<(HashMap<K, F>, SearchStats)> {
        // also rejects NaN
        if !(threshold >= F::zero()) {
            return Err(Error::InvalidThreshold { threshold: threshold.to_f64().unwrap_or(f64::NAN) });
        }

        let mut found = HashMap::new();
        let stats = self.traverse(query, threshold, |node, d| {
            if d <= threshold {
                found.insert(node.id.clone(), d);
            }
            threshold
        });

        trace!("range threshold={} found={} visited={} pruned={}",
               threshold, found.len(), stats.nodes_visited, stats.nodes_pruned);
        Ok((found, stats))
    }
}
