use std::cmp::Ordering;
use rand::Rng;

use crate::metric::Scalar;

/// Inputs at or below this length are sorted outright instead of selected.
pub const SMALL_MEDIAN_CUTOFF: usize = 30;

/// Total order over scalars; incomparable values compare as equal.
pub(crate) fn cmp_scalar<F: Scalar>(x: &F, y: &F) -> Ordering {
    x.partial_cmp(y).unwrap_or(Ordering::Equal)
}

/// Return the lower median, the element at sorted rank `n / 2`.
///
/// The input is left untouched; selection runs on a private copy.
///
/// ```
/// use vptree::median;
/// let mut rng = rand::thread_rng();
/// assert_eq!(median(&[3.0, 1.0, 2.0], &mut rng), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0], &mut rng), Some(3.0));
/// assert_eq!(median::<f64, _>(&[], &mut rng), None);
/// ```
pub fn median<F: Scalar, R: Rng + ?Sized>(values: &[F], rng: &mut R) -> Option<F> {
    let mut scratch = values.to_vec();
    let k = scratch.len() / 2;
    kth_smallest(&mut scratch, k, rng)
}

/// Find the element of sorted rank `k`, reordering `values` in the process.
///
/// Randomized quickselect with a three-way partition, so runs of equal
/// values are settled in a single pass. Returns `None` if `k` is out of
/// bounds.
pub fn kth_smallest<F: Scalar, R: Rng + ?Sized>(values: &mut [F], k: usize, rng: &mut R) -> Option<F> {
    if k >= values.len() {
        return None;
    }

    let mut arr = values;
    let mut k = k;
    loop {
        let n = arr.len();
        if n == 1 {
            return Some(arr[0]);
        }
        if n <= SMALL_MEDIAN_CUTOFF {
            arr.sort_unstable_by(cmp_scalar);
            return Some(arr[k]);
        }

        let pivot = arr[rng.gen_range(0..n)];

        // [0, lt) < pivot, [lt, i) == pivot, [gt, n) > pivot
        let mut lt = 0;
        let mut i = 0;
        let mut gt = n;
        while i < gt {
            match cmp_scalar(&arr[i], &pivot) {
                Ordering::Less => {
                    arr.swap(lt, i);
                    lt += 1;
                    i += 1;
                }
                Ordering::Greater => {
                    gt -= 1;
                    arr.swap(i, gt);
                }
                Ordering::Equal => i += 1,
            }
        }

        // Recurse on (at most) one side
        let rest = arr;
        if k < lt {
            arr = &mut rest[..lt];
        } else if k >= gt {
            k -= gt;
            arr = &mut rest[gt..];
        } else {
            return Some(pivot);
        }
    }
}
