use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kinesin_frame::{angle_series, unwrap, Basis, FrameMarkers, Vector3};

/// Synthetic trajectory: a stalk precessing over a slowly wobbling microtubule plane.
fn synthetic_frames(n_frames: usize) -> Vec<FrameMarkers> {
    (0..n_frames)
        .map(|i| {
            let t = i as f64 * 0.01;
            let wobble = 0.05 * (t * 3.0).sin();
            let plane = [
                Vector3::new(0.0, 40.0, wobble),
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(40.0, 0.0, -wobble),
            ];
            let top = Vector3::new(0.0, 0.0, 60.0);
            let bottom = Vector3::new(10.0 * t.cos(), 10.0 * t.sin(), 50.0);
            FrameMarkers::new(top, bottom, plane)
        })
        .collect()
}

fn bench_basis(c: &mut Criterion) {
    let p1 = Vector3::new(3.1, -0.4, 2.2);
    let p2 = Vector3::new(0.5, 1.5, -1.0);
    let p3 = Vector3::new(-2.0, 4.0, 0.3);
    c.bench_function("basis_from_plane_points", |b| {
        b.iter(|| Basis::from_plane_points(black_box(&p1), black_box(&p2), black_box(&p3)))
    });
}

fn bench_angle_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("angle_series");

    // one classified stage of a trajectory
    let frames = synthetic_frames(20_000);
    group.bench_function("20k_frames", |b| b.iter(|| angle_series(black_box(frames.as_slice()))));

    let raw = angle_series(&frames).unwrap();
    group.bench_function("unwrap_20k", |b| b.iter(|| unwrap(black_box(raw.phi.as_slice()))));

    group.finish();
}

criterion_group!(benches, bench_basis, bench_angle_series);
criterion_main!(benches);
