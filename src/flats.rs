//! Flat / sill / presill classifier (C6, spec.md §4.6).
//!
//! Three passes over the filled DEM produce the `int32` bitfield described
//! in spec.md §3: bit 0 = flat, bit 1 = sill, bit 2 = presill. All presill
//! pixels are flats, so a presill pixel reads as `5` (`0b101`).

use crate::grid::{Dims, Neighborhood};

pub const FLAT_BIT: i32 = 1;
pub const SILL_BIT: i32 = 2;
pub const PRESILL_BIT: i32 = 4;

/// Labels flats, sills, and presills in `filled_dem`. Returns the total
/// number of flat pixels (matching `identifyflats`'s `ptrdiff_t` return in
/// the original source).
pub fn identify_flats(filled_dem: &[f32], dims: Dims) -> (Vec<i32>, usize) {
    debug_assert_eq!(filled_dem.len(), dims.len());

    let mut flats = vec![0i32; dims.len()];

    // Pass 1: a flat is an interior pixel whose elevation equals the
    // minimum elevation among its 8-neighbours (i.e. no neighbour is
    // strictly lower).
    let mut flat_count = 0usize;
    for idx in 0..dims.len() {
        let (row, col) = dims.row_col(idx);
        if dims.on_boundary(row, col) {
            continue;
        }
        let z = filled_dem[idx];
        let mut min_neighbour = z;
        for n in 0..8 {
            if let Some(q) = dims.neighbour_in_bounds(idx, n, Neighborhood::D8) {
                min_neighbour = min_neighbour.min(filled_dem[q]);
            }
        }
        if z == min_neighbour {
            flats[idx] |= FLAT_BIT;
            flat_count += 1;
        }
    }

    // Pass 2: a sill is a non-flat pixel bordering a flat at the same
    // elevation.
    for idx in 0..dims.len() {
        if flats[idx] & FLAT_BIT != 0 {
            continue;
        }
        let z = filled_dem[idx];
        for n in 0..8 {
            if let Some(q) = dims.neighbour_in_bounds(idx, n, Neighborhood::D8) {
                if flats[q] & FLAT_BIT != 0 && filled_dem[q] == z {
                    flats[idx] |= SILL_BIT;
                    break;
                }
            }
        }
    }

    // Pass 3: a presill is a flat bordering a sill at the same elevation.
    for idx in 0..dims.len() {
        if flats[idx] & FLAT_BIT == 0 {
            continue;
        }
        let z = filled_dem[idx];
        for n in 0..8 {
            if let Some(q) = dims.neighbour_in_bounds(idx, n, Neighborhood::D8) {
                if flats[q] & SILL_BIT != 0 && filled_dem[q] == z {
                    flats[idx] |= PRESILL_BIT;
                    break;
                }
            }
        }
    }

    (flats, flat_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fillsinks::fillsinks;

    fn grid_from_rows(rows: &[&[f32]]) -> (Vec<f32>, Dims) {
        let nrows = rows.len() as isize;
        let ncols = rows[0].len() as isize;
        let dims = Dims::new(nrows, ncols).unwrap();
        let mut data = vec![0.0f32; dims.len()];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                data[dims.index(r as isize, c as isize)] = v;
            }
        }
        (data, dims)
    }

    #[test]
    fn s1_center_is_a_lone_flat_no_sill() {
        let (dem, dims) = grid_from_rows(&[&[2., 1., 2.], &[1., 0., 1.], &[2., 1., 2.]]);
        let filled = fillsinks(&dem, dims);
        let (flats, count) = identify_flats(&filled, dims);
        assert_eq!(count, 1);
        assert_ne!(flats[dims.index(1, 1)] & FLAT_BIT, 0);
        assert!(flats.iter().all(|&f| f & SILL_BIT == 0));
    }

    #[test]
    fn s2_constant_plateau_interior_are_flats_border_is_not() {
        let dims = Dims::new(4, 4).unwrap();
        let dem = vec![5.0f32; dims.len()];
        let (flats, count) = identify_flats(&dem, dims);
        assert_eq!(count, 4); // the 2x2 interior
        for idx in 0..dims.len() {
            let (row, col) = dims.row_col(idx);
            if dims.on_boundary(row, col) {
                assert_eq!(flats[idx] & FLAT_BIT, 0);
            } else {
                assert_ne!(flats[idx] & FLAT_BIT, 0);
            }
        }
        assert!(flats.iter().all(|&f| f & SILL_BIT == 0));
    }

    #[test]
    fn s3_monotone_descent_has_no_flats() {
        let (dem, dims) = grid_from_rows(&[&[3., 2., 1.], &[2., 2., 1.], &[2., 2., 1.]]);
        let (flats, count) = identify_flats(&dem, dims);
        assert_eq!(count, 0);
        assert!(flats.iter().all(|&f| f == 0));
    }

    #[test]
    fn count_matches_bitfield_population() {
        let dims = Dims::new(10, 10).unwrap();
        let dem: Vec<f32> = (0..dims.len())
            .map(|i| ((i * 911) % 23) as f32)
            .collect();
        let filled = fillsinks(&dem, dims);
        let (flats, count) = identify_flats(&filled, dims);
        let observed = flats.iter().filter(|&&f| f & FLAT_BIT != 0).count();
        assert_eq!(count, observed);
    }
}
