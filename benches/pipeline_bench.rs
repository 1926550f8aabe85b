use criterion::{criterion_group, criterion_main, Criterion};
use demflow::accumulation::compute_drainage_area_single_flow;
use demflow::boundary::default_boundary_codes;
use demflow::fillsinks::fillsinks;
use demflow::flats::identify_flats;
use demflow::grid::{Dims, Neighborhood};
use demflow::gwdt;
use demflow::heap::IndexedMinHeap;
use demflow::pcg4d::testing::pcg4d_dem;
use demflow::sfgraph::compute_sfgraph;

fn run_pipeline(dem: &[f32], dims: Dims) -> f32 {
    let filled = fillsinks(dem, dims);
    let (flats, _) = identify_flats(&filled, dims);

    let mut costs = vec![0.0f32; dims.len()];
    let mut conncomps = vec![0isize; dims.len()];
    gwdt::compute_costs(&mut costs, &mut conncomps, &flats, dem, &filled, dims);

    let mut dist = vec![0.0f32; dims.len()];
    let mut heap = IndexedMinHeap::with_capacity(dims.len());
    let mut settled = vec![false; dims.len()];
    gwdt::solve(&mut dist, None, &costs, &flats, &mut heap, &mut settled, dims);

    let bcs = default_boundary_codes(dims);
    let g = compute_sfgraph(&filled, &bcs, dims, 1.0, Neighborhood::D8);
    let acc = compute_drainage_area_single_flow(&g.receivers, &g.stack, &bcs, dims, 1.0);
    acc.iter().sum()
}

fn bench_pipeline(c: &mut Criterion) {
    let dims = Dims::new(256, 256).unwrap();
    let dem = pcg4d_dem(dims, 7, 100.0);

    c.bench_function("hydrology pipeline 256x256", |b| {
        b.iter(|| run_pipeline(&dem, dims))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
