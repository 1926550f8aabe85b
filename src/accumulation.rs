//! Flow accumulation (C12, spec.md §4.12): a reverse-topological-order
//! downstream sum. Grounded on `graphflood/graphflood.c`'s accumulation pass,
//! generalized to accept either a receivers array (as produced by
//! [`crate::sfgraph`]/[`crate::priority_flood`]) or a `source`/`direction`
//! pair (as produced by [`crate::flowdir`]).

use crate::boundary::BoundaryCode;
use crate::flowdir::{NO_DOWNSTREAM, DIRECTION_SENTINEL};
use crate::grid::{Dims, Neighborhood};

/// Core accumulation pass: `stack` must be a topological order (every
/// receiver before all of its donors) over `receivers`. `weights`, if
/// given, must have one entry per pixel; defaults to uniform weight 1.
/// Every initial value is scaled by `cell_area`, except nodata pixels
/// (`bcs[p]` decodes to [`BoundaryCode::NoFlow`]), which start at zero and
/// contribute nothing (spec.md §4.12, testable property 10).
fn accumulate_from_receivers(
    stack: &[usize],
    receivers: &[usize],
    bcs: &[u8],
    weights: Option<&[f32]>,
    cell_area: f32,
) -> Vec<f32> {
    let n = receivers.len();
    debug_assert_eq!(bcs.len(), n);
    let mut acc: Vec<f32> = bcs
        .iter()
        .map(|&code| {
            if BoundaryCode::from_u8(code).is_nodata() {
                0.0
            } else {
                cell_area
            }
        })
        .collect();
    if let Some(w) = weights {
        debug_assert_eq!(w.len(), n);
        for (a, &wv) in acc.iter_mut().zip(w.iter()) {
            *a *= wv;
        }
    }

    for &p in stack.iter().rev() {
        let r = receivers[p];
        if r != p {
            acc[r] += acc[p];
        }
    }

    acc
}

/// Flow accumulation from a `source`/`direction` pair (C9's output).
/// `weights`, if given, is indexed by pixel, not by stack position. `bcs`
/// excludes nodata pixels from contributing to accumulation.
pub fn flow_accumulation(
    source: &[usize],
    direction: &[u8],
    bcs: &[u8],
    weights: Option<&[f32]>,
    cell_area: f32,
    dims: Dims,
) -> Vec<f32> {
    debug_assert_eq!(source.len(), dims.len());
    debug_assert_eq!(direction.len(), dims.len());

    let receivers: Vec<usize> = (0..dims.len())
        .map(|p| {
            debug_assert_ne!(direction[p], DIRECTION_SENTINEL);
            let bits = direction[p];
            if bits == NO_DOWNSTREAM {
                p
            } else {
                let n = bits.trailing_zeros() as usize;
                dims.neighbour_in_bounds(p, n, Neighborhood::D8)
                    .expect("direction bit must point to an in-bounds neighbour")
            }
        })
        .collect();

    accumulate_from_receivers(source, &receivers, bcs, weights, cell_area)
}

/// Single-flow drainage area from a [`crate::sfgraph::SfGraph`]-style
/// receivers array and topological stack; `dx` is the cell size, squared to
/// yield cell area. `bcs` excludes nodata pixels from contributing to
/// accumulation.
pub fn compute_drainage_area_single_flow(
    receivers: &[usize],
    stack: &[usize],
    bcs: &[u8],
    dims: Dims,
    dx: f32,
) -> Vec<f32> {
    debug_assert_eq!(receivers.len(), dims.len());
    debug_assert_eq!(stack.len(), dims.len());
    accumulate_from_receivers(stack, receivers, bcs, None, dx * dx)
}
