//! Edges of the sweep: y-monotonic, oriented from top to bottom.

use crate::geom::arrayvec::ArrayVec;
use crate::geom::{is_finite_point, LineSegment, QuadraticBezierSegment};
use crate::math::Point;
use crate::path::{Path, SegmentKind};
use crate::{FillId, FillRule, FillStyles, StrokeId};

use core::cmp::Ordering;

/// Index of an edge in an edge arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct EdgeIdx(pub u32);

impl EdgeIdx {
    pub const INVALID: Self = EdgeIdx(u32::MAX);

    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn from_usize(idx: usize) -> Self {
        EdgeIdx(idx as u32)
    }
}

/// A straight or y-monotonic curved edge.
///
/// Once normalized, `top.y <= bottom.y` and the fill styles are expressed for
/// the top-to-bottom direction.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Edge {
    pub top: Point,
    pub bottom: Point,
    pub ctrl: Option<Point>,
    pub fills: FillStyles,
    pub stroke: StrokeId,
}

impl Edge {
    pub fn line(from: Point, to: Point, fills: FillStyles, stroke: StrokeId) -> Self {
        Edge {
            top: from,
            bottom: to,
            ctrl: None,
            fills,
            stroke,
        }
    }

    pub fn curve(
        curve: &QuadraticBezierSegment<f32>,
        fills: FillStyles,
        stroke: StrokeId,
    ) -> Self {
        Edge {
            top: curve.from,
            bottom: curve.to,
            ctrl: Some(curve.ctrl),
            fills,
            stroke,
        }
    }

    #[inline]
    pub fn is_curve(&self) -> bool {
        self.ctrl.is_some()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom.y - self.top.y
    }

    #[inline]
    pub fn to_line_segment(&self) -> LineSegment<f32> {
        LineSegment {
            from: self.top,
            to: self.bottom,
        }
    }

    #[inline]
    pub fn to_curve(&self) -> Option<QuadraticBezierSegment<f32>> {
        self.ctrl.map(|ctrl| QuadraticBezierSegment {
            from: self.top,
            ctrl,
            to: self.bottom,
        })
    }

    /// Orients the edge from top to bottom.
    ///
    /// When the end points are swapped, the left and right fill styles are
    /// swapped as well so that they keep describing the same regions.
    pub fn normalized(self) -> Self {
        if self.top.y <= self.bottom.y {
            return self;
        }

        Edge {
            top: self.bottom,
            bottom: self.top,
            ctrl: self.ctrl,
            fills: self.fills.swapped(),
            stroke: self.stroke,
        }
    }

    fn is_finite(&self) -> bool {
        is_finite_point(self.top)
            && is_finite_point(self.bottom)
            && self.ctrl.map_or(true, is_finite_point)
    }
}

/// Splits a curve into y-monotonic edges.
///
/// The curve is cut at its y extremum, if it has one strictly inside the curve.
/// Parts whose end points have the same y (within `epsilon`) are dropped.
/// Returned edges keep the direction of the curve; they are not normalized.
pub fn split_y_monotonic(
    curve: &QuadraticBezierSegment<f32>,
    fills: FillStyles,
    stroke: StrokeId,
    epsilon: f32,
) -> ArrayVec<Edge, 2> {
    let mut edges = ArrayVec::new();
    curve.for_each_y_monotonic(&mut |part| {
        if (part.to.y - part.from.y).abs() > epsilon {
            edges.push(Edge::curve(part, fills, stroke));
        }
    });

    edges
}

/// The sorted, de-duplicated y coordinates at which the sweep line stops.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanSet {
    stops: Vec<f32>,
}

impl ScanSet {
    pub fn new() -> Self {
        ScanSet { stops: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.stops.clear();
    }

    /// Adds a stop. The set must be finished before being used.
    pub fn insert(&mut self, y: f32) {
        self.stops.push(y);
    }

    /// Sorts the stops and merges the ones that are within `epsilon` of the
    /// previous kept stop. The first value of each cluster is kept.
    pub fn finish(&mut self, epsilon: f32) {
        self.stops
            .sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut kept = 0;
        for i in 0..self.stops.len() {
            let y = self.stops[i];
            if kept > 0 && y - self.stops[kept - 1] <= epsilon {
                continue;
            }
            self.stops[kept] = y;
            kept += 1;
        }
        self.stops.truncate(kept);
    }

    #[inline]
    pub fn stops(&self) -> &[f32] {
        &self.stops
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// The normalized edges of a path, sorted by their top y, along with the
/// scan stops of the sweep.
#[derive(Clone, Debug, Default)]
pub struct EdgeList {
    edges: Vec<Edge>,
    scan: ScanSet,
    borders_target: bool,
}

impl EdgeList {
    pub fn new() -> Self {
        EdgeList {
            edges: Vec::new(),
            scan: ScanSet::new(),
            borders_target: false,
        }
    }

    /// Builds the edges to tessellate the region `fill` of a path.
    ///
    /// Segments with non-finite coordinates and edges of zero height are
    /// dropped. With `FillRule::EvenOdd`, only the edges bordering `fill` are
    /// kept.
    pub fn build(&mut self, path: &Path, fill: FillId, fill_rule: FillRule, epsilon: f32) {
        self.edges.clear();
        self.scan.clear();
        self.borders_target = false;

        for segment in path.segments() {
            if !segment.fills.borders(fill) {
                if fill_rule == FillRule::EvenOdd {
                    continue;
                }
            } else {
                self.borders_target = true;
            }

            match segment.kind {
                SegmentKind::Linear(line) => {
                    let edge = Edge::line(line.from, line.to, segment.fills, segment.stroke);
                    self.add_edge(edge, epsilon);
                }
                SegmentKind::Quadratic(curve) => {
                    if !is_finite_point(curve.from)
                        || !is_finite_point(curve.ctrl)
                        || !is_finite_point(curve.to)
                    {
                        continue;
                    }
                    for edge in split_y_monotonic(&curve, segment.fills, segment.stroke, epsilon) {
                        self.add_edge(edge, epsilon);
                    }
                }
            }
        }

        // Stable, so edges starting at the same y keep the order of the path.
        self.edges
            .sort_by(|a, b| a.top.y.partial_cmp(&b.top.y).unwrap_or(Ordering::Equal));
        self.scan.finish(epsilon);
    }

    fn add_edge(&mut self, edge: Edge, epsilon: f32) {
        if !edge.is_finite() {
            return;
        }

        let edge = edge.normalized();
        if edge.height() <= epsilon {
            return;
        }

        self.scan.insert(edge.top.y);
        self.scan.insert(edge.bottom.y);
        self.edges.push(edge);
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn scan_set(&self) -> &ScanSet {
        &self.scan
    }

    /// Whether at least one segment of the path borders the fill the list was
    /// built for, including segments that were dropped as degenerate.
    #[inline]
    pub fn borders_target(&self) -> bool {
        self.borders_target
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn split_at_extremum() {
    let curve = QuadraticBezierSegment {
        from: point(0.0, 0.0),
        ctrl: point(1.0, 2.0),
        to: point(2.0, 0.0),
    };
    let fills = FillStyles::new(FillId(1), FillId::NONE);

    let edges = split_y_monotonic(&curve, fills, StrokeId::NONE, 1e-4);
    assert_eq!(edges.len(), 2);

    let a = edges[0].normalized();
    let b = edges[1].normalized();
    assert_eq!(a.bottom, point(1.0, 1.0));
    assert_eq!(b.bottom, point(1.0, 1.0));
    assert_eq!(a.top, point(0.0, 0.0));
    assert_eq!(b.top, point(2.0, 0.0));
    // The second half goes up, its fills are swapped by the normalization.
    assert_eq!(a.fills, fills);
    assert_eq!(b.fills, fills.swapped());
}

#[test]
fn monotonic_curve_passes_through() {
    let curve = QuadraticBezierSegment {
        from: point(0.0, 0.0),
        ctrl: point(3.0, 1.0),
        to: point(0.0, 2.0),
    };

    let edges = split_y_monotonic(&curve, FillStyles::NONE, StrokeId::NONE, 1e-4);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].ctrl, Some(point(3.0, 1.0)));

    // Flat curves produce no edge.
    let flat = QuadraticBezierSegment {
        from: point(0.0, 1.0),
        ctrl: point(3.0, 1.0),
        to: point(5.0, 1.0),
    };
    assert!(split_y_monotonic(&flat, FillStyles::NONE, StrokeId::NONE, 1e-4).is_empty());
}

#[test]
fn scan_set_merges_close_stops() {
    let mut scan = ScanSet::new();
    for y in &[3.0, 1.0, 1.00001, 2.0, 1.0, 3.0, 0.5] {
        scan.insert(*y);
    }
    scan.finish(1e-3);

    assert_eq!(scan.stops(), &[0.5, 1.0, 2.0, 3.0]);
}

#[test]
fn normalization() {
    let fills = FillStyles::new(FillId(1), FillId(2));
    let edge = Edge::line(point(0.0, 5.0), point(1.0, 1.0), fills, StrokeId(3)).normalized();

    assert_eq!(edge.top, point(1.0, 1.0));
    assert_eq!(edge.bottom, point(0.0, 5.0));
    assert_eq!(edge.fills, FillStyles::new(FillId(2), FillId(1)));
    assert_eq!(edge.stroke, StrokeId(3));

    let same = Edge::line(point(0.0, 1.0), point(1.0, 5.0), fills, StrokeId(3));
    assert_eq!(same.normalized(), same);
}
