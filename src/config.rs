//! Pipeline configuration (ambient stack, SPEC_FULL.md §2).
//!
//! Plain, caller-constructed data — this crate performs no I/O, so unlike
//! the teacher's `whitebox_common::configs::Configs` (which reads/writes a
//! `settings.json` next to the running executable) there is no file round
//! trip here. `serde` derives are kept so embedding applications can
//! (de)serialize a pipeline configuration as part of their own config file.

use crate::grid::{Dims, Neighborhood};
use serde::{Deserialize, Serialize};

/// The fixed geometry shared by every raster passed to one pipeline
/// invocation: shape, cell size, and connectivity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub dims: SerializableDims,
    /// Cell size in caller-defined ground units; used to scale chamfer
    /// distances to real distance (`dx` throughout C9–C12).
    pub dx: f32,
    pub neighborhood: NeighborhoodConfig,
}

/// Serde-friendly mirror of [`Dims`] (which itself derives no serde impls,
/// since it validates its invariant through [`Dims::new`] rather than
/// through deserialization).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableDims {
    pub nrows: isize,
    pub ncols: isize,
}

impl From<Dims> for SerializableDims {
    fn from(d: Dims) -> Self {
        SerializableDims {
            nrows: d.nrows,
            ncols: d.ncols,
        }
    }
}

impl SerializableDims {
    pub fn to_dims(self) -> crate::error::Result<Dims> {
        Dims::new(self.nrows, self.ncols)
    }
}

/// Serde-friendly mirror of [`Neighborhood`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborhoodConfig {
    D4,
    D8,
}

impl From<Neighborhood> for NeighborhoodConfig {
    fn from(n: Neighborhood) -> Self {
        match n {
            Neighborhood::D4 => NeighborhoodConfig::D4,
            Neighborhood::D8 => NeighborhoodConfig::D8,
        }
    }
}

impl From<NeighborhoodConfig> for Neighborhood {
    fn from(n: NeighborhoodConfig) -> Self {
        match n {
            NeighborhoodConfig::D4 => Neighborhood::D4,
            NeighborhoodConfig::D8 => Neighborhood::D8,
        }
    }
}

impl GridGeometry {
    pub fn new(dims: Dims, dx: f32, neighborhood: Neighborhood) -> Self {
        GridGeometry {
            dims: dims.into(),
            dx,
            neighborhood: neighborhood.into(),
        }
    }
}

/// The full set of knobs that vary across pipeline runs: geometry plus
/// which sink-filling strategy and flow-routing variant to use. Grouping
/// these lets a caller serialize one struct instead of threading five
/// separate parameters through their own call sites.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub geometry: GridGeometry,
    /// Use the priority-flood variant (C11) instead of the sink-fill + GWDT
    /// + D8-carve pipeline (C5-C9 into C10).
    pub use_priority_flood: bool,
}

impl PipelineConfig {
    pub fn new(dims: Dims, dx: f32, neighborhood: Neighborhood, use_priority_flood: bool) -> Self {
        PipelineConfig {
            geometry: GridGeometry::new(dims, dx, neighborhood),
            use_priority_flood,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_serde_json() {
        let dims = Dims::new(10, 20).unwrap();
        let cfg = PipelineConfig::new(dims, 2.5, Neighborhood::D8, true);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn serializable_dims_reconstructs_a_valid_dims() {
        let dims = Dims::new(3, 4).unwrap();
        let s: SerializableDims = dims.into();
        let back = s.to_dims().unwrap();
        assert_eq!(back, dims);
    }
}
