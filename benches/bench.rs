use criterion::{criterion_group, criterion_main, Criterion};
use planemesh::{triangulate, MeshConfig, Point, QualityPreset};

fn ring(cx: f64, cy: f64, radius: f64, segments: usize) -> Vec<Point> {
    (0..segments)
        .map(|i| {
            let angle = i as f64 / segments as f64 * std::f64::consts::TAU;
            Point::new(cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("cdt_ring_256", |b| {
        let outer = ring(0., 0., 100., 256);
        let hole = ring(0., 0., 30., 64);
        b.iter(|| {
            let _mesh = triangulate(
                outer.clone(),
                vec![hole.clone()],
                vec![],
                MeshConfig::new(),
            )
            .unwrap();
        })
    });

    c.bench_function("refine_square_maxh", |b| {
        let outer = vec![
            Point::new(0., 0.),
            Point::new(50., 0.),
            Point::new(50., 50.),
            Point::new(0., 50.),
        ];
        let config = MeshConfig::new()
            .with_max_edge_length(2.0)
            .with_quality_preset(QualityPreset::Moderate);
        b.iter(|| {
            let _mesh = triangulate(outer.clone(), vec![], vec![], config.clone()).unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
