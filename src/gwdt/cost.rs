//! GWDT cost builder (C7, spec.md §4.7).

use crate::flats::FLAT_BIT;
use crate::grid::{Dims, Neighborhood};

/// Computes GWDT costs and connected-component labels for each flat pixel.
///
/// Flats are grouped into 4-connected components (explicit stack, no
/// recursion, so component size is bounded only by available memory rather
/// than call-stack depth). Each component is labelled by the linear index of
/// its member with the largest `original_dem - filled_dem` difference; the
/// per-pixel cost is the squared shortfall from that component maximum, plus
/// a small constant that keeps costs strictly positive (spec.md §4.7).
pub fn compute_costs(
    costs: &mut [f32],
    conncomps: &mut [isize],
    flats: &[i32],
    original_dem: &[f32],
    filled_dem: &[f32],
    dims: Dims,
) {
    debug_assert_eq!(costs.len(), dims.len());
    debug_assert_eq!(conncomps.len(), dims.len());
    debug_assert_eq!(flats.len(), dims.len());
    debug_assert_eq!(original_dem.len(), dims.len());
    debug_assert_eq!(filled_dem.len(), dims.len());

    for c in costs.iter_mut() {
        *c = 0.0;
    }
    for c in conncomps.iter_mut() {
        *c = 0;
    }

    let diff: Vec<f32> = original_dem
        .iter()
        .zip(filled_dem.iter())
        .map(|(&o, &f)| o - f)
        .collect();

    let mut visited = vec![false; dims.len()];
    let mut stack: Vec<usize> = Vec::new();
    let mut members: Vec<usize> = Vec::new();

    for start in 0..dims.len() {
        if flats[start] & FLAT_BIT == 0 || visited[start] {
            continue;
        }

        members.clear();
        stack.push(start);
        visited[start] = true;
        while let Some(p) = stack.pop() {
            members.push(p);
            for n in 0..4 {
                if let Some(q) = dims.neighbour_in_bounds(p, n, Neighborhood::D4) {
                    if !visited[q] && flats[q] & FLAT_BIT != 0 {
                        visited[q] = true;
                        stack.push(q);
                    }
                }
            }
        }

        let mut best = members[0];
        for &p in &members {
            if diff[p] > diff[best] {
                best = p;
            }
        }
        let m_k = diff[best];
        for &p in &members {
            costs[p] = (m_k - diff[p]).powi(2) + 0.1;
            conncomps[p] = best as isize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fillsinks::fillsinks;
    use crate::flats::identify_flats;

    #[test]
    fn nonflat_pixels_get_zero_cost_and_label() {
        let dims = Dims::new(3, 3).unwrap();
        let dem_rowmajor = [[3., 2., 1.], [2., 2., 1.], [2., 2., 1.]];
        let mut dem = vec![0.0f32; 9];
        for row in 0..3 {
            for col in 0..3 {
                dem[dims.index(row, col)] = dem_rowmajor[row as usize][col as usize];
            }
        }
        let filled = fillsinks(&dem, dims);
        let (flats, _) = identify_flats(&filled, dims);
        let mut costs = vec![0.0f32; dims.len()];
        let mut conncomps = vec![0isize; dims.len()];
        compute_costs(&mut costs, &mut conncomps, &flats, &dem, &filled, dims);
        assert!(costs.iter().all(|&c| c == 0.0));
        assert!(conncomps.iter().all(|&c| c == 0));
    }

    #[test]
    fn flat_component_shares_one_label_and_positive_cost() {
        let dims = Dims::new(4, 4).unwrap();
        let dem = vec![5.0f32; dims.len()];
        let filled = fillsinks(&dem, dims);
        let (flats, _) = identify_flats(&filled, dims);
        let mut costs = vec![0.0f32; dims.len()];
        let mut conncomps = vec![0isize; dims.len()];
        compute_costs(&mut costs, &mut conncomps, &flats, &dem, &filled, dims);

        let flat_indices: Vec<usize> = (0..dims.len()).filter(|&i| flats[i] & FLAT_BIT != 0).collect();
        assert!(!flat_indices.is_empty());
        let label = conncomps[flat_indices[0]];
        assert!(flat_indices.iter().all(|&i| conncomps[i] == label));
        assert!(flat_indices.iter().all(|&i| costs[i] > 0.0));
    }
}
