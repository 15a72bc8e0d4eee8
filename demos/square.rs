use planemesh::{MeshConfig, Point, QualityPreset, TriangulatorBuilder};

fn main() {
    let builder = TriangulatorBuilder::new(vec![
        Point::new(0., 0.),
        Point::new(100., 0.),
        Point::new(100., 100.),
        Point::new(0., 100.),
    ])
    .add_hole(vec![
        Point::new(40., 40.),
        Point::new(60., 40.),
        Point::new(60., 60.),
        Point::new(40., 60.),
    ])
    .with_config(
        MeshConfig::new()
            .with_max_edge_length(8.0)
            .with_quality_preset(QualityPreset::Moderate),
    );

    let mesh = builder.build().unwrap().triangulate().unwrap();
    println!(
        "points: {} triangles: {} constraint edges: {}",
        mesh.point_count(),
        mesh.triangle_count(),
        mesh.edge_count()
    );
    mesh.release();
}
