//! Single-flow graph builder + topological stack (C10, spec.md §4.10).
//!
//! Produces, from a surface and boundary codes, the steepest-descent
//! receiver of every pixel, the inverted donor lists, and a topological
//! ordering (Braun & Willett 2013) in which every receiver appears before
//! all of its donors. Grounded directly on `graphflood/sfgraph.c`'s
//! `compute_sfgraph`, translated from its recursive `recursive_stack` to an
//! explicit work stack per spec.md's DESIGN NOTES ("Recursive topological
//! stack is a correctness hazard").

use crate::boundary::BoundaryCode;
use crate::grid::{offset_distance, Dims, Neighborhood};

/// The steepest-descent single-flow graph of a surface.
pub struct SfGraph {
    /// `Sreceivers[p]` is p's steepest receiver, or `p` itself if none.
    pub receivers: Vec<usize>,
    /// Distance (in grid units, scaled by `dx`) from p to its receiver; 0
    /// for roots.
    pub dist_to_receiver: Vec<f32>,
    /// Fixed-width donor table: `donors[p*k + j]` for `j < n_donors[p]`.
    pub donors: Vec<isize>,
    pub n_donors: Vec<u8>,
    /// A permutation of `0..n` such that every receiver appears before all
    /// of its donors.
    pub stack: Vec<usize>,
}

pub(crate) fn boundary_codes_typed(bcs: &[u8]) -> Vec<BoundaryCode> {
    bcs.iter().map(|&c| BoundaryCode::from_u8(c)).collect()
}

/// Computes steepest-descent receivers (and the distance to each) honouring
/// the boundary-code algebra: only `can_give` pixels get outgoing edges,
/// only `can_receive` pixels may be chosen as a receiver. Uses strict `>`
/// comparison and never resets the running-maximum slope mid-loop — the
/// fix mandated by spec.md §9's Open Question about the original source's
/// tie-break bug.
fn compute_receivers(
    topo: &[f32],
    bcs: &[BoundaryCode],
    dims: Dims,
    dx: f32,
    neighborhood: Neighborhood,
) -> (Vec<usize>, Vec<f32>) {
    let n = dims.len();
    let mut receivers = vec![0usize; n];
    let mut dist_to_receiver = vec![0f32; n];
    let k = neighborhood.count();

    for node in 0..n {
        receivers[node] = node;
        if !bcs[node].can_give() {
            continue;
        }

        let mut best_receiver = node;
        let mut best_slope = 0.0f32;
        let mut best_dist = 0.0f32;

        for nb in 0..k {
            let q = match dims.neighbour_in_bounds(node, nb, neighborhood) {
                Some(q) => q,
                None => continue,
            };
            if !bcs[q].can_receive() {
                continue;
            }
            let d = offset_distance(nb, neighborhood) * dx;
            let slope = (topo[node] - topo[q]) / d;
            if slope > best_slope {
                best_slope = slope;
                best_receiver = q;
                best_dist = d;
            }
        }

        receivers[node] = best_receiver;
        dist_to_receiver[node] = best_dist;
    }

    (receivers, dist_to_receiver)
}

pub(crate) fn invert_receivers(receivers: &[usize], k: usize) -> (Vec<isize>, Vec<u8>) {
    let n = receivers.len();
    let mut donors = vec![-1isize; n * k];
    let mut n_donors = vec![0u8; n];
    for node in 0..n {
        let r = receivers[node];
        if r != node {
            let slot = n_donors[r] as usize;
            debug_assert!(slot < k, "donor table overflow: more than {k} donors");
            donors[r * k + slot] = node as isize;
            n_donors[r] += 1;
        }
    }
    (donors, n_donors)
}

/// Builds the Braun & Willett (2013) topological stack from a receiver
/// array and its inverted donor table, using an explicit work stack so that
/// raster size, not call-stack depth, is the only limit (spec.md §9,
/// "Recursive topological stack is a correctness hazard").
pub(crate) fn build_topological_stack(
    receivers: &[usize],
    donors: &[isize],
    n_donors: &[u8],
    k: usize,
) -> Vec<usize> {
    let n = receivers.len();
    let mut stack = Vec::with_capacity(n);
    let mut work: Vec<usize> = Vec::new();

    for root in 0..n {
        if receivers[root] != root {
            continue;
        }
        work.push(root);
        while let Some(node) = work.pop() {
            stack.push(node);
            for j in 0..n_donors[node] as usize {
                let donor = donors[node * k + j];
                debug_assert!(donor >= 0);
                work.push(donor as usize);
            }
        }
    }

    stack
}

/// Computes the single-flow graph by plain steepest descent over the
/// surface (spec.md §4.10). `bcs` is the per-pixel boundary code array.
pub fn compute_sfgraph(
    topo: &[f32],
    bcs: &[u8],
    dims: Dims,
    dx: f32,
    neighborhood: Neighborhood,
) -> SfGraph {
    debug_assert_eq!(topo.len(), dims.len());
    debug_assert_eq!(bcs.len(), dims.len());

    let bcs_typed = boundary_codes_typed(bcs);
    let k = neighborhood.count();
    let (receivers, dist_to_receiver) = compute_receivers(topo, &bcs_typed, dims, dx, neighborhood);
    let (donors, n_donors) = invert_receivers(&receivers, k);
    let stack = build_topological_stack(&receivers, &donors, &n_donors, k);

    SfGraph {
        receivers,
        dist_to_receiver,
        donors,
        n_donors,
        stack,
    }
}
