//! Sink filler (C5): fills depressions in a DEM by grayscale morphological
//! reconstruction (spec.md §4.5).
//!
//! Filling a DEM is reconstruction *by erosion* rather than by dilation: the
//! smallest surface `>= dem` whose regional minima are confined to the
//! boundary markers. This crate's [`crate::reconstruct`] module implements
//! reconstruction by dilation, so filling uses the standard duality
//! `fill(dem) = -reconstruct_by_dilation(-marker, -dem)`.

use crate::fifo::FifoQueue;
use crate::grid::Dims;
use crate::reconstruct::{reconstruct_hybrid, reconstruct_naive};

fn build_marker(dem: &[f32], dims: Dims) -> (Vec<f32>, Vec<f32>) {
    let mask: Vec<f32> = dem.iter().map(|&z| -z).collect();
    let mut marker = vec![f32::NEG_INFINITY; dims.len()];
    for idx in 0..dims.len() {
        let (row, col) = dims.row_col(idx);
        if dims.on_boundary(row, col) {
            marker[idx] = mask[idx];
        }
    }
    (marker, mask)
}

/// Naive sink filling: repeated forward/backward sweeps without a FIFO
/// propagation queue (spec.md §4.5's naive entry point).
pub fn fillsinks_naive(output: &mut [f32], dem: &[f32], dims: Dims) {
    debug_assert_eq!(output.len(), dims.len());
    debug_assert_eq!(dem.len(), dims.len());

    let (mut marker, mask) = build_marker(dem, dims);
    reconstruct_naive(&mut marker, &mask, dims);
    for i in 0..dims.len() {
        output[i] = -marker[i];
    }
}

/// Hybrid (Vincent 1993) sink filling using a caller-supplied FIFO scratch
/// buffer of capacity `dims.len()` — the deterministic-memory entry point.
pub fn fillsinks_hybrid(output: &mut [f32], dem: &[f32], dims: Dims, queue: &mut FifoQueue) {
    debug_assert_eq!(output.len(), dims.len());
    debug_assert_eq!(dem.len(), dims.len());

    let (mut marker, mask) = build_marker(dem, dims);
    reconstruct_hybrid(&mut marker, &mask, dims, queue);
    for i in 0..dims.len() {
        output[i] = -marker[i];
    }
}

/// Convenience entry point: allocates its own FIFO scratch and returns an
/// owned, filled DEM.
pub fn fillsinks(dem: &[f32], dims: Dims) -> Vec<f32> {
    let mut output = vec![0.0f32; dims.len()];
    let mut queue = FifoQueue::with_capacity(dims.len());
    fillsinks_hybrid(&mut output, dem, dims, &mut queue);
    output
}
