//! Priority-flood variant of the single-flow graph builder (C11, spec.md
//! §4.11): builds the graph directly on the surface while virtually filling
//! depressions in one pass (Barnes 2014, minimal-slope imposition).
//!
//! Grounded on `graphflood/sfgraph.c`'s `compute_sfgraph_priority_flood` and
//! `graphflood/pq_priority_flood.h`'s priority queue, with one deliberate
//! correction: the original tests and sets `closed[node]` (the pixel being
//! expanded) instead of `closed[nnode]` (the neighbour being discovered),
//! which silently stops after each node's first neighbour. spec.md §4.11
//! states the per-*neighbour* semantics explicitly, so that is what this
//! implementation does.

use crate::fifo::FifoQueue;
use crate::grid::{offset_distance, Dims, Neighborhood};
use crate::heap::IndexedMinHeap;
use crate::sfgraph::{boundary_codes_typed, invert_receivers, SfGraph};

/// The smallest representable step above `x` toward `+infinity`
/// (`nextafter(x, f32::INFINITY)`), the canonical minimal-slope bump
/// (spec.md §9, "Depression slope epsilon").
fn next_up(x: f32) -> f32 {
    if x.is_nan() || x == f32::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f32::from_bits(1);
    }
    let bits = x.to_bits();
    let next_bits = if x > 0.0 { bits + 1 } else { bits - 1 };
    f32::from_bits(next_bits)
}

/// Builds the single-flow graph directly on `topo`, mutating it to impose
/// minimal slopes across depressions as a side effect (spec.md §4.11). The
/// returned [`SfGraph`]'s `stack` is already in topological order: the
/// priority-flood emission order guarantees every receiver is emitted
/// before its donors, so no separate stack pass is needed.
pub fn compute_sfgraph_priority_flood(
    topo: &mut [f32],
    bcs: &[u8],
    dims: Dims,
    dx: f32,
    neighborhood: Neighborhood,
) -> SfGraph {
    debug_assert_eq!(topo.len(), dims.len());
    debug_assert_eq!(bcs.len(), dims.len());

    let n = dims.len();
    let k = neighborhood.count();
    let bcs_typed = boundary_codes_typed(bcs);

    let mut closed = vec![false; n];
    let mut open = IndexedMinHeap::with_capacity(n);
    let mut pit = FifoQueue::with_capacity(n);
    let mut stack = Vec::with_capacity(n);
    let mut receivers = vec![0usize; n];
    let mut dist_to_receiver = vec![0f32; n];

    for idx in 0..n {
        if bcs_typed[idx].can_out() {
            open.push(idx, topo[idx]);
        }
        if bcs_typed[idx].is_nodata() {
            closed[idx] = true;
            stack.push(idx);
            receivers[idx] = idx;
        }
    }

    let mut pit_top: Option<f32> = None;

    while !open.is_empty() || !pit.is_empty() {
        let node = if !pit.is_empty()
            && !open.is_empty()
            && open.top_priority() == Some(topo[pit.front().unwrap()])
        {
            let (node, _) = open.pop().unwrap();
            pit_top = None;
            node
        } else if !pit.is_empty() {
            let node = pit.dequeue().unwrap();
            if pit_top.is_none() {
                pit_top = Some(topo[node]);
            }
            node
        } else {
            let (node, _) = open.pop().unwrap();
            pit_top = None;
            node
        };

        stack.push(node);
        receivers[node] = node;

        let node_can_give = bcs_typed[node].can_give();
        let mut best_slope = 0.0f32;
        let mut best_receiver = node;
        let mut best_dist = 0.0f32;

        for nb in 0..k {
            let nnode = match dims.neighbour_in_bounds(node, nb, neighborhood) {
                Some(q) => q,
                None => continue,
            };
            if bcs_typed[nnode].is_nodata() {
                continue;
            }

            if node_can_give && bcs_typed[nnode].can_receive() {
                let d = offset_distance(nb, neighborhood) * dx;
                let slope = (topo[node] - topo[nnode]) / d;
                if slope > best_slope {
                    best_slope = slope;
                    best_receiver = nnode;
                    best_dist = d;
                }
            }

            if !closed[nnode] {
                closed[nnode] = true;
                let bumped = next_up(topo[node]);
                if topo[nnode] <= bumped {
                    topo[nnode] = bumped;
                    pit.enqueue(nnode).expect("pit queue sized to dims.len()");
                } else {
                    open.push(nnode, topo[nnode]);
                }
            }
        }

        receivers[node] = best_receiver;
        dist_to_receiver[node] = best_dist;
    }

    let (donors, n_donors) = invert_receivers(&receivers, k);

    SfGraph {
        receivers,
        dist_to_receiver,
        donors,
        n_donors,
        stack,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::default_boundary_codes;

    #[test]
    fn stack_covers_every_pixel_exactly_once() {
        let dims = Dims::new(5, 5).unwrap();
        let rows: [[f32; 5]; 5] = [
            [3., 3., 3., 3., 3.],
            [3., 2., 2., 2., 3.],
            [1., 2., 2., 2., 3.],
            [3., 2., 2., 2., 3.],
            [3., 3., 3., 3., 3.],
        ];
        let mut topo = vec![0.0f32; dims.len()];
        for row in 0..5 {
            for col in 0..5 {
                topo[dims.index(row, col)] = rows[row as usize][col as usize];
            }
        }
        let bcs = default_boundary_codes(dims);
        let g = compute_sfgraph_priority_flood(&mut topo, &bcs, dims, 1.0, Neighborhood::D8);

        let mut seen = vec![false; dims.len()];
        for &p in &g.stack {
            assert!(!seen[p]);
            seen[p] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(g.stack.len(), dims.len());
    }

    #[test]
    fn receivers_precede_donors_in_the_stack() {
        let dims = Dims::new(5, 5).unwrap();
        let rows: [[f32; 5]; 5] = [
            [3., 3., 3., 3., 3.],
            [3., 2., 2., 2., 3.],
            [1., 2., 2., 2., 3.],
            [3., 2., 2., 2., 3.],
            [3., 3., 3., 3., 3.],
        ];
        let mut topo = vec![0.0f32; dims.len()];
        for row in 0..5 {
            for col in 0..5 {
                topo[dims.index(row, col)] = rows[row as usize][col as usize];
            }
        }
        let bcs = default_boundary_codes(dims);
        let g = compute_sfgraph_priority_flood(&mut topo, &bcs, dims, 1.0, Neighborhood::D8);

        let mut position = vec![0usize; dims.len()];
        for (i, &p) in g.stack.iter().enumerate() {
            position[p] = i;
        }
        for node in 0..dims.len() {
            let r = g.receivers[node];
            if r != node {
                assert!(position[r] < position[node]);
            }
        }
    }

    #[test]
    fn depression_is_virtually_filled_to_a_non_decreasing_surface() {
        let dims = Dims::new(5, 5).unwrap();
        let rows: [[f32; 5]; 5] = [
            [3., 3., 3., 3., 3.],
            [3., 2., 2., 2., 3.],
            [1., 2., -5., 2., 3.],
            [3., 2., 2., 2., 3.],
            [3., 3., 3., 3., 3.],
        ];
        let mut topo = vec![0.0f32; dims.len()];
        for row in 0..5 {
            for col in 0..5 {
                topo[dims.index(row, col)] = rows[row as usize][col as usize];
            }
        }
        let original_pit = topo[dims.index(2, 2)];
        let bcs = default_boundary_codes(dims);
        compute_sfgraph_priority_flood(&mut topo, &bcs, dims, 1.0, Neighborhood::D8);
        assert!(topo[dims.index(2, 2)] > original_pit);
    }

    #[test]
    fn next_up_strictly_increases_and_preserves_special_values() {
        assert!(next_up(1.0) > 1.0);
        assert!(next_up(0.0) > 0.0);
        assert_eq!(next_up(f32::INFINITY), f32::INFINITY);
        assert!(next_up(f32::NAN).is_nan());
    }
}
