//! Vantage point tree index for k-nearest-neighbor and range queries over
//! any metric space, such as perceptual-hash distances between images.

pub mod error;
pub mod heap;
pub mod median;
pub mod metric;
pub mod search;
pub mod vptree;

pub use error::{Error, Result};
pub use heap::BoundedMaxHeap;
pub use median::{kth_smallest, median, SMALL_MEDIAN_CUTOFF};
pub use metric::{Float, Metric, NormalizedHamming, PHash, Scalar};
pub use search::{Neighbor, SearchStats};
pub use vptree::{Iter, VPTree};
