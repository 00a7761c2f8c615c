//! Cut a small road corridor and print the section.
//!
//! Run with: cargo run -p roadsect --example corridor_section

use roadsect::{
    format_station, Alignment, CancelToken, Color, CrossSection, Point2D, Point3, SectionBatch,
    SectionContext, SectionSettings, StationPoint, SurfaceKind, SurfaceMesh, Tolerance, Triangle,
};

/// A quad between two cross-section points, extruded along z.
fn strip(name: &str, kind: SurfaceKind, color: Color, a: (f64, f64), b: (f64, f64)) -> SurfaceMesh {
    let p = |(x, y): (f64, f64), z: f64| Point3::new(x, y, z);
    let triangles = vec![
        Triangle::new(p(a, -100.0), p(b, -100.0), p(b, 100.0)),
        Triangle::new(p(a, -100.0), p(b, 100.0), p(a, 100.0)),
    ];
    SurfaceMesh::new(name, kind, color, triangles, &Tolerance::DEFAULT).expect("valid strip")
}

fn main() -> roadsect::Result<()> {
    println!("Corridor Section Test\n");

    let meshes = vec![
        strip("ground", SurfaceKind::Terrain, Color::rgb(0.4, 0.3, 0.2), (-30.0, 0.0), (30.0, 0.0)),
        strip("cut", SurfaceKind::CutSlope, Color::rgb(0.8, 0.6, 0.2), (-20.0, 0.0), (-6.0, 7.0)),
        strip("road", SurfaceKind::RoadSurface, Color::rgb(0.3, 0.3, 0.3), (-6.0, 7.0), (6.0, 6.76)),
        strip("fill", SurfaceKind::FillSlope, Color::rgb(0.2, 0.7, 0.3), (6.0, 6.76), (16.14, 0.0)),
    ];
    let alignment = Alignment::new(
        1,
        "Main line",
        vec![
            StationPoint::new(Point3::new(0.0, 7.0, -80.0), 1000.0),
            StationPoint::new(Point3::new(0.0, 7.0, 80.0), 1160.0),
        ],
    )?;

    let settings = SectionSettings::default();
    let ctx = SectionContext::new(&settings).with_selected_alignment(alignment.id);

    // Test 1: a free section across the corridor
    println!("--- Free section at z = 0 ---");
    let mut section = CrossSection::from_anchors(Point3::new(-25.0, 0.0, 0.0), Point3::new(25.0, 0.0, 0.0))?;
    let result = section.build(&ctx, &meshes, std::slice::from_ref(&alignment))?;

    for layer in &result.layers {
        println!("{:>8} ({:?}): {} polylines", layer.name, layer.kind, layer.polylines.len());
        for line in &layer.polylines_2d {
            let pts: Vec<String> = line.points().iter().map(|p| format!("({:.1}, {:.1})", p.x, p.y)).collect();
            println!("         {}", pts.join(" -> "));
        }
        for label in &layer.slope_labels_2d {
            println!("         slope {} at {:.1} deg", label.text, label.angle_degrees);
        }
    }
    for intersection in &result.alignment_intersections {
        println!("{intersection}");
    }
    if let Some(grid) = &result.grid {
        let labels: Vec<&str> = grid.levels.iter().map(|l| l.label.as_str()).collect();
        println!("grid levels: {}", labels.join(", "));
    }

    // Test 2: a dimension chain straight down through the road
    println!("\n--- Dimension chain ---");
    let engine = result.dimension_engine(&settings);
    let top = Point2D::new(10.0, result.bounds.max_y + 20.0);
    let bottom = Point2D::new(10.0, result.bounds.min_y - 20.0);
    for mark in engine.dimension_chain(top, bottom) {
        println!("{} m", mark.text);
    }
    println!("{}", engine.measure(top, bottom).text);

    // Test 3: a station series
    println!("\n--- Station series ---");
    let mut sections = CrossSection::series(&alignment, 1000.0, 1160.0, settings.station_gap, settings.plane_length)?;
    let alignments = [alignment];
    let batch = SectionBatch::new(&mut sections, ctx, &meshes, &alignments, CancelToken::new());
    for step in batch {
        let step = step?;
        let station = step.station.map(format_station).unwrap_or_default();
        println!("[{}/{}] STA. {}", step.index + 1, step.total, station);
    }

    Ok(())
}
