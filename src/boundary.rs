//! Boundary-code algebra shared by C9–C12 (spec.md §3, §9 "Boundary codes as
//! a small algebra").
//!
//! Factored into its own module because C10 and C11 both need the same four
//! predicates; the teacher factors comparable cross-cutting predicates
//! (`whitebox_common::structures`) into their own module rather than
//! repeating them per tool file.

/// Per-pixel status used by the single-flow-graph builders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BoundaryCode {
    /// Nodata; contributes nothing, excluded from accumulation.
    NoFlow = 0,
    /// Ordinary interior pixel.
    Flow = 1,
    /// Boundary pixel that may drain (an outlet candidate).
    CanOut = 3,
    /// Pure sink, always an outlet.
    Out = 4,
    /// Boundary pixel that cannot drain.
    CannotOut = 6,
    /// Forced inflow boundary.
    In = 7,
    /// Forced inflow, cannot be overridden.
    ForceIn = 8,
    /// Periodic boundary wraparound marker.
    Periodic = 9,
}

impl BoundaryCode {
    /// Reconstructs a `BoundaryCode` from its raw `uint8` representation.
    /// Unknown codes are treated as `NoFlow`, matching the "additive change
    /// only" contract from spec.md §9: a code this crate doesn't know about
    /// must not silently behave as something it isn't.
    pub fn from_u8(code: u8) -> Self {
        match code {
            1 => BoundaryCode::Flow,
            3 => BoundaryCode::CanOut,
            4 => BoundaryCode::Out,
            6 => BoundaryCode::CannotOut,
            7 => BoundaryCode::In,
            8 => BoundaryCode::ForceIn,
            9 => BoundaryCode::Periodic,
            _ => BoundaryCode::NoFlow,
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// May this pixel be the receiver of an edge?
    #[inline]
    pub fn can_receive(self) -> bool {
        matches!(
            self,
            BoundaryCode::Flow
                | BoundaryCode::CanOut
                | BoundaryCode::Out
                | BoundaryCode::CannotOut
                | BoundaryCode::Periodic
        )
    }

    /// May this pixel contribute outgoing edges?
    #[inline]
    pub fn can_give(self) -> bool {
        matches!(
            self,
            BoundaryCode::Flow
                | BoundaryCode::CanOut
                | BoundaryCode::In
                | BoundaryCode::ForceIn
                | BoundaryCode::Periodic
        )
    }

    #[inline]
    pub fn is_nodata(self) -> bool {
        self == BoundaryCode::NoFlow
    }

    /// May this pixel act as a graph outlet (a priority-flood seed)?
    #[inline]
    pub fn can_out(self) -> bool {
        matches!(self, BoundaryCode::CanOut | BoundaryCode::Out)
    }
}

/// Derives boundary codes for a raster from its shape alone: interior pixels
/// are `Flow`, and the raster edge is `CanOut` (may drain off the grid).
/// This is the common case used by the convenience entry points that don't
/// require an explicit nodata mask.
pub fn default_boundary_codes(dims: crate::grid::Dims) -> Vec<u8> {
    let mut codes = vec![BoundaryCode::Flow.as_u8(); dims.len()];
    for idx in 0..dims.len() {
        let (row, col) = dims.row_col(idx);
        if dims.on_boundary(row, col) {
            codes[idx] = BoundaryCode::CanOut.as_u8();
        }
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match_membership_table() {
        assert!(BoundaryCode::Flow.can_receive());
        assert!(BoundaryCode::Flow.can_give());
        assert!(!BoundaryCode::Flow.is_nodata());
        assert!(!BoundaryCode::Flow.can_out());

        assert!(BoundaryCode::NoFlow.is_nodata());
        assert!(!BoundaryCode::NoFlow.can_receive());
        assert!(!BoundaryCode::NoFlow.can_give());

        assert!(BoundaryCode::CanOut.can_out());
        assert!(BoundaryCode::CanOut.can_give());
        assert!(BoundaryCode::CanOut.can_receive());

        assert!(BoundaryCode::Out.can_out());
        assert!(!BoundaryCode::Out.can_give());

        assert!(BoundaryCode::ForceIn.can_give());
        assert!(!BoundaryCode::ForceIn.can_receive());
    }

    #[test]
    fn roundtrip_u8() {
        for code in [
            BoundaryCode::NoFlow,
            BoundaryCode::Flow,
            BoundaryCode::CanOut,
            BoundaryCode::Out,
            BoundaryCode::CannotOut,
            BoundaryCode::In,
            BoundaryCode::ForceIn,
            BoundaryCode::Periodic,
        ] {
            assert_eq!(BoundaryCode::from_u8(code.as_u8()), code);
        }
    }

    #[test]
    fn default_codes_mark_border_as_can_out() {
        let dims = crate::grid::Dims::new(3, 3).unwrap();
        let codes = default_boundary_codes(dims);
        let center = dims.index(1, 1);
        assert_eq!(codes[center], BoundaryCode::Flow.as_u8());
        assert_eq!(codes[dims.index(0, 0)], BoundaryCode::CanOut.as_u8());
    }
}
