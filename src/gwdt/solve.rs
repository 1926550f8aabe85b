//! GWDT solver (C8, spec.md §4.8): multi-source Dijkstra over the subgraph
//! of flat pixels, seeded at presills, with chamfer-weighted "geodesic time"
//! edge costs (Soille 1994).

use crate::flats::{FLAT_BIT, PRESILL_BIT};
use crate::grid::{offset_distance, Dims, Neighborhood};
use crate::heap::IndexedMinHeap;
use log::trace;

/// Solves the gray-weighted distance transform.
///
/// - `dist` receives the geodesic time from the nearest presill; unreached
///   flats (no presill can reach them) are left at `f32::INFINITY`.
/// - `prev`, if `Some`, receives the predecessor pixel on the shortest path,
///   or `-1` for unreached/non-flat pixels and for presills themselves.
/// - `heap` and `settled` are caller-supplied scratch of size `dims.len()`
///   each (the "heap-scratch"/"back-scratch" of spec.md §6's external
///   interface table): `heap` backs the priority queue, `settled` records
///   which pixels have a finalized distance so stale heap entries (C8's
///   simulated decrease-key) are discarded instead of re-relaxed.
///
/// Pixels with `flats[p] & 1 == 0` are barriers: never relaxed, never
/// popped, per spec.md §4.8.
pub fn solve(
    dist: &mut [f32],
    mut prev: Option<&mut [isize]>,
    costs: &[f32],
    flats: &[i32],
    heap: &mut IndexedMinHeap,
    settled: &mut [bool],
    dims: Dims,
) {
    debug_assert_eq!(dist.len(), dims.len());
    debug_assert_eq!(costs.len(), dims.len());
    debug_assert_eq!(flats.len(), dims.len());
    debug_assert_eq!(settled.len(), dims.len());

    for d in dist.iter_mut() {
        *d = f32::INFINITY;
    }
    for s in settled.iter_mut() {
        *s = false;
    }
    if let Some(p) = prev.as_deref_mut() {
        for x in p.iter_mut() {
            *x = -1;
        }
    }
    heap.clear();

    let mut n_sources = 0usize;
    for idx in 0..dims.len() {
        if flats[idx] & PRESILL_BIT != 0 {
            heap.push(idx, 0.0);
            n_sources += 1;
        }
    }
    trace!("gwdt: seeded {} presill sources", n_sources);

    while let Some((p, priority)) = heap.pop() {
        if settled[p] {
            continue; // stale duplicate, the true shortest distance already won
        }
        settled[p] = true;
        dist[p] = priority;

        for n in 0..8 {
            let q = match dims.neighbour_in_bounds(p, n, Neighborhood::D8) {
                Some(q) => q,
                None => continue,
            };
            if flats[q] & FLAT_BIT == 0 || settled[q] {
                continue; // barrier pixel, or already finalized
            }
            let weight = offset_distance(n, Neighborhood::D8) * (costs[p] + costs[q]) / 2.0;
            let alt = priority + weight;
            if alt < dist[q] {
                dist[q] = alt;
                heap.push(q, alt);
                if let Some(pr) = prev.as_deref_mut() {
                    pr[q] = p as isize;
                }
            }
        }
    }
}
