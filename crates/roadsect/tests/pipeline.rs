//! End-to-end cross-section pipeline tests.

use approx::assert_relative_eq;
use roadsect::{
    Alignment, CancelToken, Color, CrossSection, Point2D, Point3, SectionBatch, SectionContext,
    SectionSettings, StationPoint, SurfaceKind, SurfaceMesh, Tolerance, Triangle, Triangulator,
};

/// A quad between two cross-section points, extruded along z.
fn strip(name: &str, kind: SurfaceKind, a: (f64, f64), b: (f64, f64), half_length: f64) -> SurfaceMesh {
    let p = |(x, y): (f64, f64), z: f64| Point3::new(x, y, z);
    let (z0, z1) = (-half_length, half_length);
    let triangles = vec![
        Triangle::new(p(a, z0), p(b, z0), p(b, z1)),
        Triangle::new(p(a, z0), p(b, z1), p(a, z1)),
    ];
    SurfaceMesh::new(name, kind, Color::rgb(0.5, 0.5, 0.5), triangles, &Tolerance::DEFAULT).unwrap()
}

/// Road on a fill embankment over flat ground.
fn corridor() -> Vec<SurfaceMesh> {
    vec![
        strip("ground", SurfaceKind::Terrain, (-25.0, -0.1), (25.0, -0.1), 60.0),
        strip("road", SurfaceKind::RoadSurface, (-5.0, 10.1), (5.0, 9.9), 60.0),
        strip("fill", SurfaceKind::FillSlope, (5.0, 9.9), (20.0, -0.1), 60.0),
    ]
}

fn centerline() -> Alignment {
    Alignment::new(
        1,
        "CL",
        vec![
            StationPoint::new(Point3::new(0.0, 10.0, -50.0), 0.0),
            StationPoint::new(Point3::new(0.0, 10.0, 50.0), 100.0),
        ],
    )
    .unwrap()
}

#[test]
fn quad_cut_gives_single_straight_line() {
    #[rustfmt::skip]
    let vertices: Vec<f32> = vec![
        0.0, 0.0, 0.0,
        10.0, 0.0, 0.0,
        10.0, 0.0, 10.0,
        0.0, 0.0, 10.0,
    ];
    let indices: Vec<u32> = vec![0, 1, 2, 0, 2, 3];
    let quad =
        SurfaceMesh::from_indexed("quad", SurfaceKind::Terrain, Color::WHITE, &vertices, &indices, &Tolerance::DEFAULT)
            .unwrap();

    let settings = SectionSettings::default();
    let ctx = SectionContext::new(&settings);
    let mut section =
        CrossSection::from_anchors(Point3::new(5.0, 0.0, 20.0), Point3::new(5.0, 0.0, -20.0)).unwrap();
    let result = section.build(&ctx, &[quad], &[]).unwrap();

    assert_eq!(result.layers.len(), 1);
    let polylines = &result.layers[0].polylines;
    assert_eq!(polylines.len(), 1);
    let points = polylines[0].points();
    assert_eq!(points.len(), 2);

    let mut zs: Vec<f64> = points.iter().map(|p| p.z).collect();
    zs.sort_by(f64::total_cmp);
    for p in points {
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-9);
    }
    assert_relative_eq!(zs[0], 0.0, epsilon = 1e-9);
    assert_relative_eq!(zs[1], 10.0, epsilon = 1e-9);
}

#[test]
fn corridor_section_labels_and_crossings() {
    let settings = SectionSettings::default();
    let ctx = SectionContext::new(&settings);
    let meshes = corridor();
    let alignments = vec![centerline()];

    let mut section =
        CrossSection::from_anchors(Point3::new(-30.0, 0.0, 0.0), Point3::new(30.0, 0.0, 0.0)).unwrap();
    let result = section.build(&ctx, &meshes, &alignments).unwrap();

    let names: Vec<&str> = result.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["ground", "road", "fill"]);
    for layer in &result.layers {
        assert_eq!(layer.polylines.len(), 1);
        assert_eq!(layer.polylines[0].len(), 2);
    }

    let mut texts: Vec<&str> = result.slope_labels.iter().map(|l| l.text.as_str()).collect();
    texts.sort();
    assert_eq!(texts, vec!["1:1.5", "2.00%"]);

    assert_eq!(result.layers[1].slope_labels_2d[0].text, "2.00%");
    assert_eq!(result.layers[2].slope_labels_2d[0].text, "1:1.5");
    assert!(result.layers[0].slope_labels_2d.is_empty());

    assert_eq!(result.alignment_intersections.len(), 1);
    let crossing = &result.alignment_intersections[0];
    assert_relative_eq!(crossing.crossings[0].station, 50.0, epsilon = 1e-9);
    assert_eq!(crossing.to_string(), "CL : STA. 0+050.000");
    assert!(result.grid.is_some());
}

#[test]
fn corridor_dimension_chain() {
    let settings = SectionSettings::default();
    let ctx = SectionContext::new(&settings);
    let meshes = corridor();
    let mut section =
        CrossSection::from_anchors(Point3::new(-30.0, 0.0, 0.0), Point3::new(30.0, 0.0, 0.0)).unwrap();
    let result = section.build(&ctx, &meshes, &[]).unwrap();

    // A vertical dimension through the whole view crosses ground and road once each.
    let engine = result.dimension_engine(&settings);
    let b = result.bounds;
    let x = b.center().x + 1.0;
    let marks = engine.dimension_chain(Point2D::new(x, b.min_y - 10.0), Point2D::new(x, b.max_y + 10.0));
    assert_eq!(marks.len(), 3);
    let total: f64 = marks.iter().map(|m| m.start.distance(&m.end)).sum();
    assert_relative_eq!(total, b.height() + 20.0, epsilon = 1e-9);
}

#[test]
fn station_series_batch_can_be_cancelled() {
    let settings = SectionSettings::from_toml_str("station_gap = 20.0\nplane_length = 50.0\n").unwrap();
    let meshes = corridor();
    let alignments = vec![centerline()];
    let mut sections =
        CrossSection::series(&alignments[0], 0.0, 100.0, settings.station_gap, settings.plane_length).unwrap();
    assert_eq!(sections.len(), 6);

    let token = CancelToken::new();
    let ctx = SectionContext::new(&settings).with_selected_alignment(1);
    let mut batch = SectionBatch::new(&mut sections, ctx, &meshes, &alignments, token.clone());
    for expected in 0..3 {
        let step = batch.next().unwrap().unwrap();
        assert_eq!(step.index, expected);
        assert_eq!(step.total, 6);
    }
    token.cancel();
    assert!(batch.next().is_none());

    let ready = sections.iter().filter(|s| s.is_ready()).count();
    assert_eq!(ready, 3);
    let built = sections[2].result().unwrap();
    assert_eq!(built.layers.len(), 3);
    assert!(built.slope_labels.iter().all(|l| l.station == 40.0));
    assert!(built.alignment_intersections[0].is_selected);
}

struct Fan;

impl Triangulator for Fan {
    fn triangulate(&self, polygon: &[Point3]) -> Vec<u32> {
        let n = polygon.len().saturating_sub(1) as u32;
        (1..n.saturating_sub(1)).flat_map(|i| [0, i, i + 1]).collect()
    }
}

/// A closed box culvert running along z.
fn culvert() -> SurfaceMesh {
    let (x0, x1, y0, y1, z0, z1) = (-2.0, 2.0, 1.0, 4.0, -20.0, 20.0);
    let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
    let mut triangles = Vec::new();
    for i in 0..4 {
        let (ax, ay) = corners[i];
        let (bx, by) = corners[(i + 1) % 4];
        let a0 = Point3::new(ax, ay, z0);
        let b0 = Point3::new(bx, by, z0);
        let a1 = Point3::new(ax, ay, z1);
        let b1 = Point3::new(bx, by, z1);
        triangles.push(Triangle::new(a0, b0, b1));
        triangles.push(Triangle::new(a0, b1, a1));
    }
    SurfaceMesh::new("culvert", SurfaceKind::Structure, Color::rgb(0.8, 0.2, 0.2), triangles, &Tolerance::DEFAULT)
        .unwrap()
}

#[test]
fn closed_loops_are_filled() {
    let settings = SectionSettings::default();
    let ctx = SectionContext::new(&settings).with_triangulator(&Fan);
    let mut section =
        CrossSection::from_anchors(Point3::new(-30.0, 0.0, 0.0), Point3::new(30.0, 0.0, 0.0)).unwrap();
    let result = section.build(&ctx, &[culvert()], &[]).unwrap();

    let layer = &result.layers[0];
    assert_eq!(layer.polylines.len(), 1);
    assert!(layer.polylines[0].is_closed(&ctx.tolerance()));
    assert_eq!(layer.fills.len(), 1);
    assert!(layer.fills[0].indices.len() >= 6);
}

#[test]
fn section_output_serializes() {
    let settings = SectionSettings::default();
    let ctx = SectionContext::new(&settings);
    let meshes = corridor();
    let mut section =
        CrossSection::from_anchors(Point3::new(-30.0, 0.0, 0.0), Point3::new(30.0, 0.0, 0.0)).unwrap();
    let result = section.build(&ctx, &meshes, &[]).unwrap();

    let fill = &result.layers[2];
    let json = serde_json::to_string(&fill.polylines_2d[0]).unwrap();
    assert!(json.contains("\"FillSlope\""));
    let back: roadsect::Polyline2D = serde_json::from_str(&json).unwrap();
    assert_eq!(back.kind(), SurfaceKind::FillSlope);
    assert_eq!(back.points().len(), fill.polylines_2d[0].points().len());
    for (a, b) in back.points().iter().zip(fill.polylines_2d[0].points()) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
    }

    let labels = serde_json::to_value(&fill.slope_labels_2d).unwrap();
    assert_eq!(labels[0]["text"], "1:1.5");
}
