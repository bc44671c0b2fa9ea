use crate::extra::parser::parse_path;
use crate::geometry_builder::*;
use crate::math::*;
use crate::path::{Path, PathSegment};
use crate::{
    tessellate, Diagnostic, DiagnosticKind, EdgeList, FillId, FillOptions, FillRule, FillStyles,
    FillTessellator, GeometryBuilderError, Tessellation, TessellationError, Triangle,
    TriangleKind, UnsupportedParameter,
};

fn parse(src: &str) -> Path {
    match parse_path(src) {
        Ok(path) => path,
        Err(e) => panic!("invalid test path {:?}: {}", src, e),
    }
}

fn tessellate_with(src: &str, fill: u32, options: &FillOptions) -> Tessellation {
    let mut tess = FillTessellator::new();
    tess.tessellate(&parse(src), FillId(fill), options).unwrap()
}

fn count(tessellation: &Tessellation, kind: TriangleKind) -> usize {
    tessellation
        .triangles
        .iter()
        .filter(|t| t.kind == kind)
        .count()
}

fn assert_area(tessellation: &Tessellation, expected: f32) {
    let area = tessellation.area();
    assert!(
        (area - expected).abs() < 1e-3,
        "expected an area of {}, got {}",
        expected,
        area
    );
}

fn assert_fill_triangles_ccw(tessellation: &Tessellation) {
    for t in &tessellation.triangles {
        if t.kind == TriangleKind::Fill {
            assert!(t.signed_area() > 0.0, "clockwise triangle {:?}", t);
        }
    }
}

const RECTANGLE: &str = "F 1 0 M 0 0 L 2 0 L 2 1 L 0 1 Z";
const LENS: &str = "F 1 0 M 0 0 Q 1 1 0 2 Q -1 1 0 0 Z";
const ROUNDED_DIAMOND: &str = "F 1 0 M 1 0 Q 1 1 0 1 Q -1 1 -1 0 Q -1 -1 0 -1 Q 1 -1 1 0 Z";
// The right boundary bulges inwards past the chord of the left boundary
// without reaching the left curve itself.
const DEEP_BULGE: &str = "F 1 0 M 0 0 L 1 0 Q -2.5 2 1 4 L 0 4 Q -4 2 0 0 Z";
// Both boundaries bulge inwards and their control triangles overlap.
const PINCHED: &str = "F 1 0 M 0 0 L 4 0 Q 1 2 4 4 L 0 4 Q 3 2 0 0 Z";
const NARROW_PINCH: &str = "F 1 0 M 0 0 L 4 0 Q 0.1 2 4 4 L 0 4 Q 3.9 2 0 0 Z";

#[test]
fn rectangle() {
    let result = tessellate(&parse(RECTANGLE), FillId(1));

    assert!(result.is_clean());
    assert_eq!(result.triangles.len(), 2);
    assert_eq!(count(&result, TriangleKind::Fill), 2);
    assert!(result.triangles.iter().all(|t| t.fill == FillId(1)));
    assert_fill_triangles_ccw(&result);
    assert_area(&result, 2.0);
}

#[test]
fn lens() {
    let result = tessellate(&parse(LENS), FillId(1));

    assert!(result.is_clean());
    assert_eq!(count(&result, TriangleKind::Fill), 2);
    assert_eq!(count(&result, TriangleKind::CurveOuter), 2);
    assert_eq!(count(&result, TriangleKind::CurveInner), 0);
    assert_fill_triangles_ccw(&result);
    assert_area(&result, 4.0 / 3.0);

    // Curve triangles keep the control point in the middle.
    for t in result.triangles.iter().filter(|t| t.kind.is_curve()) {
        assert!(t.vertices[1] == point(1.0, 1.0) || t.vertices[1] == point(-1.0, 1.0));
    }
}

#[test]
fn rounded_diamond() {
    let result = tessellate(&parse(ROUNDED_DIAMOND), FillId(1));

    assert!(result.is_clean());
    assert_eq!(count(&result, TriangleKind::CurveOuter), 4);
    assert_eq!(count(&result, TriangleKind::Fill), 4);
    assert_fill_triangles_ccw(&result);
    assert_area(&result, 10.0 / 3.0);
}

#[test]
fn control_point_past_the_opposite_chord() {
    // The body polygon stays simple, no subdivision is needed.
    for max in &[0, 2] {
        let options = FillOptions::default().with_max_subdivisions(*max);
        let result = tessellate_with(DEEP_BULGE, 1, &options);

        assert!(result.is_clean());
        assert_eq!(result.triangles.len(), 6);
        assert_eq!(count(&result, TriangleKind::CurveInner), 1);
        assert_eq!(count(&result, TriangleKind::CurveOuter), 1);
        assert_fill_triangles_ccw(&result);
        assert_area(&result, 14.0 / 3.0);
    }
}

#[test]
fn overlapping_control_triangles_are_subdivided() {
    for &(src, area) in &[(PINCHED, 8.0), (NARROW_PINCH, 5.6)] {
        let result = tessellate_with(src, 1, &FillOptions::default());

        assert!(result.is_clean());
        assert_eq!(result.triangles.len(), 12);
        assert_eq!(count(&result, TriangleKind::Fill), 8);
        assert_eq!(count(&result, TriangleKind::CurveInner), 4);
        assert_fill_triangles_ccw(&result);
        assert_area(&result, area);
    }
}

#[test]
fn inward_curves_fall_back_to_chords() {
    let options = FillOptions::default().with_max_subdivisions(0);
    let result = tessellate_with(PINCHED, 1, &options);

    assert_eq!(result.triangles.len(), 2);
    assert_eq!(count(&result, TriangleKind::Fill), 2);
    assert_fill_triangles_ccw(&result);
    assert_area(&result, 16.0);

    assert_eq!(result.diagnostics.len(), 2);
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::CurveApproximated && d.fill == FillId(1)));
}

#[test]
fn flat_curves_are_lines() {
    // The control point of the left side is 0.05 away from its chord.
    let src = "F 1 0 M 0 0 L 2 0 L 2 1 L 0 1 Q 0.05 0.5 0 0 Z";
    let result = tessellate_with(src, 1, &FillOptions::default());
    assert_eq!(result.triangles.len(), 2);
    assert_eq!(count(&result, TriangleKind::Fill), 2);
    assert_area(&result, 2.0);

    let result = tessellate_with(src, 1, &FillOptions::tolerance(0.01));
    assert_eq!(count(&result, TriangleKind::Fill), 3);
    assert_eq!(count(&result, TriangleKind::CurveInner), 1);
    assert_area(&result, 2.0 - 0.025 * 2.0 / 3.0);
}

#[test]
fn zero_height_path() {
    let result = tessellate(&parse("F 1 0 M 0 0 L 5 0 Z"), FillId(1));

    assert!(result.triangles.is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn empty_region() {
    let path = parse(RECTANGLE);

    let result = tessellate(&path, FillId(9));
    assert!(result.triangles.is_empty());
    assert_eq!(result.diagnostics, vec![Diagnostic::empty_region(FillId(9))]);
    assert_eq!(
        result.clone().into_result(),
        Err(vec![Diagnostic::empty_region(FillId(9))])
    );

    let result = tessellate(&path, FillId::NONE);
    assert!(result.triangles.is_empty());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::EmptyRegion);

    let result = tessellate(&Path::new(), FillId(1));
    assert!(result.triangles.is_empty());
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn non_finite_segments_are_dropped() {
    let fills = FillStyles::new(FillId(1), FillId::NONE);
    let path: Path = vec![
        PathSegment::line(point(0.0, 0.0), point(2.0, 0.0), fills),
        PathSegment::line(point(2.0, 0.0), point(2.0, 1.0), fills),
        PathSegment::line(point(2.0, 1.0), point(0.0, 1.0), fills),
        PathSegment::line(point(0.0, 1.0), point(0.0, 0.0), fills),
        PathSegment::line(point(f32::NAN, 0.0), point(1.0, 5.0), fills),
        PathSegment::quadratic(
            point(0.0, 0.0),
            point(f32::INFINITY, 1.0),
            point(0.0, 3.0),
            fills,
        ),
    ]
    .into_iter()
    .collect();

    let result = tessellate(&path, FillId(1));
    assert!(result.is_clean());
    assert_eq!(result.triangles.len(), 2);
    assert_area(&result, 2.0);
}

#[test]
fn even_odd_hole() {
    let src = "F 1 0 M 0 0 L 4 0 L 4 4 L 0 4 Z M 1 1 L 3 1 L 3 3 L 1 3 Z";
    let result = tessellate_with(src, 1, &FillOptions::even_odd());

    assert!(result.is_clean());
    assert_fill_triangles_ccw(&result);
    assert_area(&result, 12.0);
}

#[test]
fn fill_styles_hole() {
    // The hole is wound the other way, its inside is on the right.
    let src = "F 1 0 M 0 0 L 4 0 L 4 4 L 0 4 Z M 1 1 L 1 3 L 3 3 L 3 1 Z";
    let result = tessellate_with(src, 1, &FillOptions::fill_styles());

    assert!(result.is_clean());
    assert_fill_triangles_ccw(&result);
    assert_area(&result, 12.0);
}

#[test]
fn adjacent_regions() {
    // Two unit squares sharing the edge at x = 1, fill 1 on its left and fill
    // 2 on its right.
    let src = "F 1 0 M 0 0 L 1 0 F 1 2 L 1 1 F 1 0 L 0 1 Z \
               F 2 0 M 1 0 L 2 0 L 2 1 L 1 1";
    let path = parse(src);
    assert_eq!(path.fill_ids(), vec![FillId(1), FillId(2)]);

    let mut tess = FillTessellator::new();
    let all = tess.tessellate_all(&path, &FillOptions::default()).unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].0, FillId(1));
    assert_eq!(all[1].0, FillId(2));
    for (fill, tessellation) in &all {
        assert!(tessellation.is_clean());
        assert!(tessellation.triangles.iter().all(|t| t.fill == *fill));
        assert_area(tessellation, 1.0);
    }

    let first = &all[0].1;
    assert!(first
        .triangles
        .iter()
        .all(|t| t.vertices.iter().all(|v| v.x <= 1.0)));
}

#[test]
fn deterministic_output() {
    let path = parse(ROUNDED_DIAMOND);
    let a = tessellate(&path, FillId(1));
    let b = tessellate(&path, FillId(1));
    assert_eq!(a, b);

    // Reusing a tessellator does not leak state between calls.
    let mut tess = FillTessellator::new();
    let options = FillOptions::default();
    let _ = tess.tessellate(&parse(DEEP_BULGE), FillId(1), &options).unwrap();
    let c = tess.tessellate(&path, FillId(1), &options).unwrap();
    assert_eq!(a, c);
}

#[test]
fn edges_are_monotonic_after_normalization() {
    let path = parse("F 1 0 M 0 0 Q 1 -2 2 0 L 2 3 Q 1 5 0 3 Z");
    let mut edges = EdgeList::new();
    edges.build(&path, FillId(1), FillRule::FillStyles, 1e-4);

    assert!(!edges.edges().is_empty());
    for edge in edges.edges() {
        assert!(edge.top.y < edge.bottom.y);
        if let Some(ctrl) = edge.ctrl {
            assert!(ctrl.y >= edge.top.y && ctrl.y <= edge.bottom.y);
        }
    }

    let stops = edges.scan_set().stops();
    for pair in stops.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    for edge in edges.edges() {
        assert!(stops.iter().any(|y| (y - edge.top.y).abs() <= 1e-4));
        assert!(stops.iter().any(|y| (y - edge.bottom.y).abs() <= 1e-4));
    }

    let result = tessellate(&path, FillId(1));
    assert!(result.is_clean());
    assert_fill_triangles_ccw(&result);
}

#[test]
fn invalid_options() {
    let path = parse(RECTANGLE);
    let mut tess = FillTessellator::new();

    assert_eq!(
        tess.tessellate(&path, FillId(1), &FillOptions::default().with_epsilon(f32::NAN)),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::EpsilonIsNaN
        )),
    );
    assert_eq!(
        tess.tessellate_path(
            &path,
            FillId(1),
            &FillOptions::tolerance(-1.0),
            &mut NoOutput::new()
        ),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::NegativeTolerance
        )),
    );
}

#[test]
fn geometry_builder_error() {
    struct Limited {
        max_triangles: u32,
        aborted: bool,
    }

    impl TriangleBuilder for Limited {
        fn add_triangle(&mut self, _: &Triangle) -> Result<(), GeometryBuilderError> {
            if self.max_triangles == 0 {
                return Err(GeometryBuilderError::TooManyVertices);
            }
            self.max_triangles -= 1;
            Ok(())
        }

        fn abort_geometry(&mut self) {
            self.aborted = true;
        }
    }

    let path = parse(RECTANGLE);
    let mut tess = FillTessellator::new();
    let options = FillOptions::default();

    let mut output = Limited {
        max_triangles: 1,
        aborted: false,
    };
    assert_eq!(
        tess.tessellate_path(&path, FillId(1), &options, &mut output),
        Err(TessellationError::GeometryBuilder(
            GeometryBuilderError::TooManyVertices
        )),
    );
    assert!(output.aborted);

    let mut output = Limited {
        max_triangles: 2,
        aborted: false,
    };
    assert_eq!(
        tess.tessellate_path(&path, FillId(1), &options, &mut output),
        Ok(Vec::new())
    );
    assert!(!output.aborted);
}

#[test]
fn vertex_buffers() {
    let path = parse(RECTANGLE);
    let mut tess = FillTessellator::new();
    let options = FillOptions::default();

    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    tess.tessellate_path(&path, FillId(1), &options, &mut simple_builder(&mut buffers))
        .unwrap();
    assert_eq!(buffers.vertices.len(), 6);
    assert_eq!(buffers.indices, vec![0, 1, 2, 3, 4, 5]);

    let mut curves: VertexBuffers<CurveVertex, u32> = VertexBuffers::new();
    tess.tessellate_path(
        &parse(LENS),
        FillId(1),
        &options,
        &mut BuffersBuilder::new(&mut curves, |v: CurveVertex| v),
    )
    .unwrap();
    assert_eq!(curves.vertices.len(), 12);
    assert_eq!(curves.vertices.iter().filter(|v| v.is_curve()).count(), 6);
    assert!(curves
        .vertices
        .iter()
        .filter(|v| v.is_curve())
        .all(|v| v.kind == TriangleKind::CurveOuter));

    let mut counter = NoOutput::new();
    tess.tessellate_path(&parse(LENS), FillId(1), &options, &mut counter)
        .unwrap();
    assert_eq!(counter.num_triangles(), 4);
}
