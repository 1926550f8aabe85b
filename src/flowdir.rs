//! D8 flow router with carving (C9, spec.md §4.9).
//!
//! Flats are routed along the GWDT's own Dijkstra shortest-path tree
//! (`prev`, from [`crate::gwdt::solve`]): a flat pixel's receiver is its
//! `prev` predecessor, re-expressed as a D8 direction bit. Following `prev`
//! rather than independently arg-min-ing each pixel's neighbourhood over
//! `dist` is what makes the result acyclic — `gwdt::solve`'s edge costs are
//! always strictly positive, so `dist[prev[p]] < dist[p]` for every routed
//! flat pixel, and repeatedly stepping to `prev` is guaranteed to terminate
//! at a presill (`dist == 0`) without ever revisiting a pixel. Other pixels
//! route by steepest descent on the DEM itself (strictly positive slope
//! required, same enumeration-order tie-break). The resulting per-pixel
//! forest is then linearized into a topological `source` order via the
//! explicit-stack walk shared with [`crate::sfgraph`].

use crate::flats::FLAT_BIT;
use crate::grid::{offset_distance, Dims, Neighborhood};
use crate::sfgraph::build_topological_stack;

/// Sentinel written into `direction` for "no downstream neighbour"
/// (sink/outlet). Never confuse with the reserved `255` value, which must
/// never appear in a correct output.
pub const NO_DOWNSTREAM: u8 = 0;
/// Reserved sentinel: its presence in output indicates an implementation
/// error (spec.md §3).
pub const DIRECTION_SENTINEL: u8 = 255;

/// A flat pixel's receiver is its predecessor on the GWDT's shortest-path
/// tree (`prev[p]`), re-expressed as the D8 direction bit that reaches it.
/// `prev[p] == -1` means `p` is unreached or is itself a presill; both cases
/// have no flat-carved receiver.
fn choose_flat_receiver(p: usize, prev: &[isize], dims: Dims) -> Option<(usize, usize)> {
    let q = prev[p];
    if q < 0 {
        return None;
    }
    let q = q as usize;
    for n in 0..8 {
        if dims.neighbour_in_bounds(p, n, Neighborhood::D8) == Some(q) {
            return Some((n, q));
        }
    }
    unreachable!("gwdt::solve only relaxes D8 neighbours, so prev[p] must be one of them")
}

fn choose_steepest_receiver(p: usize, dem: &[f32], dims: Dims) -> Option<(usize, usize)> {
    let mut best_slope = 0.0f32;
    let mut best: Option<(usize, usize)> = None;
    for n in 0..8 {
        let q = match dims.neighbour_in_bounds(p, n, Neighborhood::D8) {
            Some(q) => q,
            None => continue,
        };
        let slope = (dem[p] - dem[q]) / offset_distance(n, Neighborhood::D8);
        if slope > best_slope {
            best_slope = slope;
            best = Some((n, q));
        }
    }
    best
}

/// Computes a steepest-descent D8 direction for every pixel, carving across
/// flats via the GWDT's shortest-path tree, and linearizes the resulting
/// forest into a topological `source` order.
///
/// `prev` is the predecessor array populated by [`crate::gwdt::solve`] (it
/// must have been called with `Some` for `prev`, not `None` — a flat pixel
/// with no recorded predecessor is treated as unreached/a presill).
///
/// Returns `(source, direction)`: `source` is a permutation of
/// `0..dims.len()` (receivers before donors); `direction[p]` is the one-hot
/// bit of `p`'s chosen D8 neighbour, or `0` if `p` has none.
pub fn flow_routing_d8_carve(
    dem: &[f32],
    prev: &[isize],
    flats: &[i32],
    dims: Dims,
) -> (Vec<usize>, Vec<u8>) {
    debug_assert_eq!(dem.len(), dims.len());
    debug_assert_eq!(prev.len(), dims.len());
    debug_assert_eq!(flats.len(), dims.len());

    let n = dims.len();
    let mut direction = vec![NO_DOWNSTREAM; n];
    let mut receivers = vec![0usize; n];

    for p in 0..n {
        receivers[p] = p;
        let chosen = if flats[p] & FLAT_BIT != 0 {
            choose_flat_receiver(p, prev, dims)
        } else {
            choose_steepest_receiver(p, dem, dims)
        };
        if let Some((nb, q)) = chosen {
            direction[p] = 1u8 << nb;
            receivers[p] = q;
        }
    }

    let (donors, n_donors) = invert_for_d8(&receivers);
    let source = build_topological_stack(&receivers, &donors, &n_donors, 8);

    (source, direction)
}

fn invert_for_d8(receivers: &[usize]) -> (Vec<isize>, Vec<u8>) {
    let n = receivers.len();
    let mut donors = vec![-1isize; n * 8];
    let mut n_donors = vec![0u8; n];
    for node in 0..n {
        let r = receivers[node];
        if r != node {
            let slot = n_donors[r] as usize;
            donors[r * 8 + slot] = node as isize;
            n_donors[r] += 1;
        }
    }
    (donors, n_donors)
}

/// Reconstructs `target[edge]` from `source[edge]` and
/// `direction[source[edge]]`. `target[edge] == source[edge]` for pixels with
/// no downstream neighbour, matching the `Sreceivers[p] == p` "root"
/// convention used elsewhere in this crate.
pub fn flow_routing_targets(source: &[usize], direction: &[u8], dims: Dims) -> Vec<usize> {
    source
        .iter()
        .map(|&p| {
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
        .collect()
}
