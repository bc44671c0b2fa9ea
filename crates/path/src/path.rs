//! The default path data structure.

use crate::geom::{LineSegment, QuadraticBezierSegment};
use crate::math::Point;
use crate::{FillId, FillStyles, StrokeId};

use std::collections::BTreeSet;
use std::iter::FromIterator;

/// The geometry of a path segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum SegmentKind {
    Linear(LineSegment<f32>),
    Quadratic(QuadraticBezierSegment<f32>),
}

impl SegmentKind {
    #[inline]
    pub fn from(&self) -> Point {
        match self {
            SegmentKind::Linear(segment) => segment.from,
            SegmentKind::Quadratic(segment) => segment.from,
        }
    }

    #[inline]
    pub fn to(&self) -> Point {
        match self {
            SegmentKind::Linear(segment) => segment.to,
            SegmentKind::Quadratic(segment) => segment.to,
        }
    }

    #[inline]
    pub fn ctrl(&self) -> Option<Point> {
        match self {
            SegmentKind::Linear(..) => None,
            SegmentKind::Quadratic(segment) => Some(segment.ctrl),
        }
    }
}

/// A segment of a path along with the fill regions it separates.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct PathSegment {
    pub kind: SegmentKind,
    pub fills: FillStyles,
    pub stroke: StrokeId,
}

impl PathSegment {
    pub fn line(from: Point, to: Point, fills: FillStyles) -> Self {
        PathSegment {
            kind: SegmentKind::Linear(LineSegment { from, to }),
            fills,
            stroke: StrokeId::NONE,
        }
    }

    pub fn quadratic(from: Point, ctrl: Point, to: Point, fills: FillStyles) -> Self {
        PathSegment {
            kind: SegmentKind::Quadratic(QuadraticBezierSegment { from, ctrl, to }),
            fills,
            stroke: StrokeId::NONE,
        }
    }

    #[inline]
    pub fn from(&self) -> Point {
        self.kind.from()
    }

    #[inline]
    pub fn to(&self) -> Point {
        self.kind.to()
    }

    #[inline]
    pub fn is_curve(&self) -> bool {
        match self.kind {
            SegmentKind::Quadratic(..) => true,
            _ => false,
        }
    }
}

/// A sequence of connected segments.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SubPath {
    pub segments: Vec<PathSegment>,
    pub closed: bool,
}

/// A simple path data structure.
///
/// A path is an ordered list of sub-paths. Segments keep the fill styles and
/// stroke they were built with; no geometric processing happens here.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Path {
    sub_paths: Vec<SubPath>,
}

impl Path {
    /// Creates a [Builder](struct.Builder.html) to build a path.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Creates an Empty `Path`.
    #[inline]
    pub fn new() -> Path {
        Path {
            sub_paths: Vec::new(),
        }
    }

    #[inline]
    pub fn sub_paths(&self) -> &[SubPath] {
        &self.sub_paths
    }

    /// Iterates over the segments of all sub-paths, in order.
    pub fn segments(&self) -> Segments {
        Segments {
            sub_paths: self.sub_paths.iter(),
            current: [].iter(),
        }
    }

    pub fn num_segments(&self) -> usize {
        self.sub_paths.iter().map(|sp| sp.segments.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.num_segments() == 0
    }

    /// The fill regions bordered by at least one segment, in increasing order.
    ///
    /// `FillId::NONE` is never part of the result.
    pub fn fill_ids(&self) -> Vec<FillId> {
        let mut ids = BTreeSet::new();
        for segment in self.segments() {
            ids.insert(segment.fills.left);
            ids.insert(segment.fills.right);
        }
        ids.remove(&FillId::NONE);

        ids.into_iter().collect()
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<T: IntoIterator<Item = PathSegment>>(iter: T) -> Path {
        let segments: Vec<PathSegment> = iter.into_iter().collect();
        if segments.is_empty() {
            return Path::new();
        }

        Path {
            sub_paths: vec![SubPath {
                segments,
                closed: false,
            }],
        }
    }
}

impl<'l> IntoIterator for &'l Path {
    type Item = &'l PathSegment;
    type IntoIter = Segments<'l>;

    fn into_iter(self) -> Segments<'l> {
        self.segments()
    }
}

/// An iterator over the segments of a `Path`.
#[derive(Clone)]
pub struct Segments<'l> {
    sub_paths: std::slice::Iter<'l, SubPath>,
    current: std::slice::Iter<'l, PathSegment>,
}

impl<'l> Iterator for Segments<'l> {
    type Item = &'l PathSegment;

    fn next(&mut self) -> Option<&'l PathSegment> {
        loop {
            if let Some(segment) = self.current.next() {
                return Some(segment);
            }
            self.current = self.sub_paths.next()?.segments.iter();
        }
    }
}

/// Builds a `Path`.
///
/// Fill styles and stroke set with `set_fills` and `set_stroke` apply to all
/// segments added afterwards, including the closing segment.
#[derive(Clone)]
pub struct Builder {
    sub_paths: Vec<SubPath>,
    current: Vec<PathSegment>,
    first: Point,
    last: Point,
    in_sub_path: bool,
    fills: FillStyles,
    stroke: StrokeId,
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            sub_paths: Vec::new(),
            current: Vec::new(),
            first: Point::new(0.0, 0.0),
            last: Point::new(0.0, 0.0),
            in_sub_path: false,
            fills: FillStyles::NONE,
            stroke: StrokeId::NONE,
        }
    }

    pub fn set_fills(&mut self, fills: FillStyles) {
        self.fills = fills;
    }

    pub fn set_stroke(&mut self, stroke: StrokeId) {
        self.stroke = stroke;
    }

    #[inline]
    pub fn fills(&self) -> FillStyles {
        self.fills
    }

    #[inline]
    pub fn current_position(&self) -> Point {
        self.last
    }

    /// Starts a new sub-path at the given position.
    ///
    /// A sub-path that is still open is ended first.
    pub fn begin(&mut self, at: Point) {
        if self.in_sub_path {
            self.end(false);
        }

        self.first = at;
        self.last = at;
        self.in_sub_path = true;
    }

    pub fn line_to(&mut self, to: Point) {
        self.ensure_begun();
        self.push(SegmentKind::Linear(LineSegment {
            from: self.last,
            to,
        }));
        self.last = to;
    }

    pub fn quadratic_bezier_to(&mut self, ctrl: Point, to: Point) {
        self.ensure_begun();
        self.push(SegmentKind::Quadratic(QuadraticBezierSegment {
            from: self.last,
            ctrl,
            to,
        }));
        self.last = to;
    }

    /// Ends the current sub-path.
    ///
    /// When `close` is true and the current position differs from the start of
    /// the sub-path, a line segment is added back to the start.
    pub fn end(&mut self, close: bool) {
        if !self.in_sub_path {
            return;
        }

        if close && self.last != self.first {
            let first = self.first;
            self.line_to(first);
        }

        self.in_sub_path = false;
        self.last = self.first;

        let segments = std::mem::take(&mut self.current);
        if !segments.is_empty() {
            self.sub_paths.push(SubPath {
                segments,
                closed: close,
            });
        }
    }

    #[inline]
    pub fn close(&mut self) {
        self.end(true);
    }

    pub fn build(mut self) -> Path {
        self.end(false);

        Path {
            sub_paths: self.sub_paths,
        }
    }

    fn ensure_begun(&mut self) {
        if !self.in_sub_path {
            let at = self.last;
            self.begin(at);
        }
    }

    fn push(&mut self, kind: SegmentKind) {
        self.current.push(PathSegment {
            kind,
            fills: self.fills,
            stroke: self.stroke,
        });
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn test_build_closed_sub_path() {
    let fills = FillStyles::new(FillId(1), FillId::NONE);
    let mut builder = Path::builder();
    builder.set_fills(fills);
    builder.set_stroke(StrokeId(3));
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(0.0, 1.0));
    builder.quadratic_bezier_to(point(-1.0, 1.5), point(-1.0, 1.0));
    builder.close();

    let path = builder.build();

    assert_eq!(path.sub_paths().len(), 1);
    assert!(path.sub_paths()[0].closed);
    assert_eq!(path.num_segments(), 3);

    let segments: Vec<&PathSegment> = path.segments().collect();
    assert!(!segments[0].is_curve());
    assert!(segments[1].is_curve());
    assert_eq!(segments[1].kind.ctrl(), Some(point(-1.0, 1.5)));
    assert_eq!(segments[2].from(), point(-1.0, 1.0));
    assert_eq!(segments[2].to(), point(0.0, 0.0));

    for segment in &path {
        assert_eq!(segment.fills, fills);
        assert_eq!(segment.stroke, StrokeId(3));
    }
}

#[test]
fn test_close_at_start_adds_nothing() {
    let mut builder = Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(1.0, 0.0));
    builder.line_to(point(1.0, 1.0));
    builder.line_to(point(0.0, 0.0));
    builder.close();

    let path = builder.build();
    assert_eq!(path.num_segments(), 3);
}

#[test]
fn test_multiple_sub_paths() {
    let mut builder = Path::builder();
    builder.set_fills(FillStyles::new(FillId(2), FillId::NONE));
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(1.0, 0.0));
    builder.line_to(point(1.0, 1.0));
    // Implicitly ends the first sub-path without closing it.
    builder.begin(point(5.0, 0.0));
    builder.set_fills(FillStyles::new(FillId(7), FillId(2)));
    builder.line_to(point(6.0, 0.0));
    builder.line_to(point(6.0, 1.0));
    builder.end(true);
    // Empty sub-paths are not recorded.
    builder.begin(point(10.0, 10.0));
    builder.end(true);

    let path = builder.build();
    assert_eq!(path.sub_paths().len(), 2);
    assert!(!path.sub_paths()[0].closed);
    assert!(path.sub_paths()[1].closed);
    assert_eq!(path.sub_paths()[1].segments.len(), 3);
    assert_eq!(path.fill_ids(), vec![FillId(2), FillId(7)]);
}

#[test]
fn test_empty_path() {
    let path = Path::builder().build();
    assert!(path.is_empty());
    assert!(path.fill_ids().is_empty());
    assert_eq!(path.segments().count(), 0);

    let path: Path = Vec::<PathSegment>::new().into_iter().collect();
    assert_eq!(path, Path::new());
}

#[test]
fn test_from_iter() {
    let fills = FillStyles::new(FillId(1), FillId::NONE);
    let path: Path = vec![
        PathSegment::line(point(0.0, 0.0), point(0.0, 1.0), fills),
        PathSegment::quadratic(point(0.0, 1.0), point(1.0, 2.0), point(2.0, 1.0), fills),
    ]
    .into_iter()
    .collect();

    assert_eq!(path.num_segments(), 2);
    assert_eq!(path.fill_ids(), vec![FillId(1)]);
}
