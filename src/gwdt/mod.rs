//! Gray-weighted distance transform (C7 cost-building + C8 Dijkstra solve),
//! spec.md §4.7–§4.8.
//!
//! Split across two files for size, aggregated here the way the teacher's
//! `whitebox_common::algorithms` directory module re-exports its sibling
//! files from one namespace.

mod cost;
mod solve;

pub use cost::compute_costs;
pub use solve::solve;
