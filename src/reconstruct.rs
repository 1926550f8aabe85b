//! Grayscale morphological reconstruction (C4): the Vincent (1993) hybrid
//! algorithm computing the largest image `R <= I` whose regional maxima are
//! confined to maxima of the marker `J` (spec.md §4.4).

use crate::fifo::FifoQueue;
use crate::grid::{Dims, Neighborhood};
use log::trace;

const FORWARD_NEIGHBOURS: [usize; 4] = [4, 5, 6, 7]; // W, NW, N, NE
const BACKWARD_NEIGHBOURS: [usize; 4] = [0, 1, 2, 3]; // E, SE, S, SW

#[inline]
fn fmax_nan(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.max(b)
    }
}

#[inline]
fn fmin_nan(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.min(b)
    }
}

fn forward_scan(marker: &mut [f32], mask: &[f32], dims: Dims) {
    for row in 0..dims.nrows {
        for col in 0..dims.ncols {
            let p = dims.index(row, col);
            let mut m = marker[p];
            for &n in &FORWARD_NEIGHBOURS {
                if let Some(q) = dims.neighbour_in_bounds(p, n, Neighborhood::D8) {
                    m = fmax_nan(m, marker[q]);
                }
            }
            marker[p] = fmin_nan(mask[p], m);
        }
    }
}

/// Backward scan. Returns the set of pixels to seed the propagation FIFO
/// with, per spec.md step 2: any pixel with a not-yet-scanned neighbour
/// strictly lower in the marker but not yet equal to its mask value.
fn backward_scan(marker: &mut [f32], mask: &[f32], dims: Dims, mut seed: impl FnMut(usize)) {
    for row in (0..dims.nrows).rev() {
        for col in (0..dims.ncols).rev() {
            let p = dims.index(row, col);
            let mut m = marker[p];
            for &n in &BACKWARD_NEIGHBOURS {
                if let Some(q) = dims.neighbour_in_bounds(p, n, Neighborhood::D8) {
                    m = fmax_nan(m, marker[q]);
                }
            }
            marker[p] = fmin_nan(mask[p], m);

            for &n in &FORWARD_NEIGHBOURS {
                if let Some(q) = dims.neighbour_in_bounds(p, n, Neighborhood::D8) {
                    if marker[q] < marker[p] && marker[q] < mask[q] {
                        seed(p);
                        break;
                    }
                }
            }
        }
    }
}

fn propagate(marker: &mut [f32], mask: &[f32], dims: Dims, queue: &mut FifoQueue) {
    while let Some(p) = queue.dequeue() {
        for n in 0..8 {
            if let Some(q) = dims.neighbour_in_bounds(p, n, Neighborhood::D8) {
                if marker[q] < marker[p] && mask[q] != marker[q] {
                    marker[q] = fmin_nan(marker[p], mask[q]);
                    // Best-effort: a full raster's worth of pixels can be
                    // queued at most once per propagation wave in practice;
                    // a caller-undersized queue is a precondition violation.
                    let _ = queue.enqueue(q);
                }
            }
        }
    }
}

/// Hybrid two-pass reconstruction with an explicit FIFO propagation queue
/// (spec.md §4.4). `marker` is mutated in place to become `R`; `queue` must
/// have capacity `dims.len()`.
pub fn reconstruct_hybrid(marker: &mut [f32], mask: &[f32], dims: Dims, queue: &mut FifoQueue) {
    debug_assert_eq!(marker.len(), dims.len());
    debug_assert_eq!(mask.len(), dims.len());

    queue.clear();
    trace!("reconstruct_hybrid: forward scan over {} pixels", dims.len());
    forward_scan(marker, mask, dims);
    trace!("reconstruct_hybrid: backward scan");
    backward_scan(marker, mask, dims, |p| {
        let _ = queue.enqueue(p);
    });
    trace!("reconstruct_hybrid: propagation, {} seeds", queue.size());
    propagate(marker, mask, dims, queue);
}

/// Naive reconstruction: repeats alternating forward/backward sweeps until
/// no pixel changes, without the FIFO propagation step. Slower than the
/// hybrid form but needs no scratch buffer (spec.md §4.5's "naive" entry
/// point).
pub fn reconstruct_naive(marker: &mut [f32], mask: &[f32], dims: Dims) {
    debug_assert_eq!(marker.len(), dims.len());
    debug_assert_eq!(mask.len(), dims.len());

    loop {
        let before = marker.to_vec();
        forward_scan(marker, mask, dims);
        backward_scan(marker, mask, dims, |_| {});
        if marker
            .iter()
            .zip(before.iter())
            .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
        {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Dims;

    fn dims(n: isize, m: isize) -> Dims {
        Dims::new(n, m).unwrap()
    }

    #[test]
    fn reconstruction_is_bounded_by_mask_and_at_least_marker() {
        let d = dims(5, 5);
        let mask = vec![3.0f32; d.len()];
        let mut marker = vec![0.0f32; d.len()];
        marker[d.index(2, 2)] = 3.0; // single seed in the middle
        let mut q = FifoQueue::with_capacity(d.len());
        reconstruct_hybrid(&mut marker, &mask, d, &mut q);
        for &v in &marker {
            assert!(v <= 3.0);
        }
        // Reconstruction of a uniform mask from one full-height marker
        // pixel should flood the whole domain to the mask value.
        assert!(marker.iter().all(|&v| v == 3.0));
    }

    #[test]
    fn idempotent_under_repeated_application() {
        let d = dims(6, 6);
        let mask: Vec<f32> = (0..d.len()).map(|i| (i % 7) as f32).collect();
        let mut marker = mask.clone();
        for v in marker.iter_mut() {
            *v -= 1.0;
        }
        let mut q = FifoQueue::with_capacity(d.len());
        reconstruct_hybrid(&mut marker, &mask, d, &mut q);
        let once = marker.clone();
        reconstruct_hybrid(&mut marker, &mask, d, &mut q);
        assert_eq!(once, marker);
    }

    #[test]
    fn nan_in_mask_propagates() {
        let d = dims(3, 3);
        let mut mask = vec![1.0f32; d.len()];
        mask[d.index(1, 1)] = f32::NAN;
        let mut marker = mask.clone();
        let mut q = FifoQueue::with_capacity(d.len());
        reconstruct_hybrid(&mut marker, &mask, d, &mut q);
        assert!(marker[d.index(1, 1)].is_nan());
    }

    #[test]
    fn naive_and_hybrid_agree() {
        let d = dims(5, 6);
        let mask: Vec<f32> = (0..d.len()).map(|i| ((i * 13) % 11) as f32).collect();
        let mut marker_h = mask.clone();
        let mut marker_n = mask.clone();
        for i in 0..d.len() {
            marker_h[i] -= 2.0;
            marker_n[i] -= 2.0;
        }
        marker_h[d.index(2, 3)] = mask[d.index(2, 3)];
        marker_n[d.index(2, 3)] = mask[d.index(2, 3)];

        let mut q = FifoQueue::with_capacity(d.len());
        reconstruct_hybrid(&mut marker_h, &mask, d, &mut q);
        reconstruct_naive(&mut marker_n, &mask, d);
        assert_eq!(marker_h, marker_n);
    }
}
