//! The sweep line, cutting edges into slabs between consecutive scan stops.

use crate::edge::{Edge, EdgeIdx, ScanSet};
use crate::error::Diagnostic;
use crate::geom::{is_finite_point, LineSegment, QuadraticBezierSegment};
use crate::math::{point, Point};
use crate::{FillId, FillStyles, StrokeId};

use std::mem;

/// The part of an edge that lies between two consecutive scan stops.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Slab {
    /// Upper end point.
    pub from: Point,
    /// Lower end point.
    pub to: Point,
    pub ctrl: Option<Point>,
    pub fills: FillStyles,
    pub stroke: StrokeId,
    /// The edge this slab was cut from.
    pub edge: EdgeIdx,
}

impl Slab {
    #[inline]
    pub fn is_curve(&self) -> bool {
        self.ctrl.is_some()
    }

    #[inline]
    pub fn chord(&self) -> LineSegment<f32> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    #[inline]
    pub fn curve(&self) -> Option<QuadraticBezierSegment<f32>> {
        self.ctrl.map(|ctrl| QuadraticBezierSegment {
            from: self.from,
            ctrl,
            to: self.to,
        })
    }

    /// The x coordinate halfway along the slab.
    pub fn mid_x(&self) -> f32 {
        match self.curve() {
            Some(curve) => curve.x(0.5),
            None => (self.from.x + self.to.x) * 0.5,
        }
    }

    /// Cuts the slab in two at height `y`, which must be between the end points.
    ///
    /// Curves are split at the exact parameter where they reach `y`.
    pub fn split_at_y(&self, y: f32, epsilon: f32) -> (Slab, Slab) {
        let mut upper = *self;
        let mut lower = *self;
        match self.curve() {
            Some(curve) => {
                let t = curve_t_for_y(&curve, y, epsilon)
                    .unwrap_or_else(|| self.chord().solve_t_for_y(y));
                let (a, b) = split_curve(&curve, t, y);
                upper.to = a.to;
                upper.ctrl = Some(a.ctrl);
                lower.from = b.from;
                lower.ctrl = Some(b.ctrl);
            }
            None => {
                let p = point(self.chord().solve_x_for_y(y), y);
                upper.to = p;
                lower.from = p;
            }
        }

        (upper, lower)
    }

    fn new(from: Point, to: Point, ctrl: Option<Point>, edge: &SweepEdge) -> Self {
        Slab {
            from,
            to,
            ctrl,
            fills: edge.edge.fills,
            stroke: edge.edge.stroke,
            edge: edge.source,
        }
    }
}

/// The parameter at which a y-monotonic curve reaches `y`.
///
/// Only roots in `[-epsilon, 1 + epsilon]` are accepted. When there are two,
/// the one closest to the start of the curve wins. The result is clamped to
/// `[0, 1]`.
fn curve_t_for_y(curve: &QuadraticBezierSegment<f32>, y: f32, epsilon: f32) -> Option<f32> {
    let mut best: Option<f32> = None;
    for t in curve.solve_t_for_y(y) {
        if t.is_nan() || t < -epsilon || t > 1.0 + epsilon {
            continue;
        }
        match best {
            Some(b) if b.abs() <= t.abs() => {}
            _ => best = Some(t),
        }
    }

    best.map(|t| t.max(0.0).min(1.0))
}

/// Splits a curve at `t`, snapping the split point to height `y` and keeping
/// both halves y-monotonic.
fn split_curve(
    curve: &QuadraticBezierSegment<f32>,
    t: f32,
    y: f32,
) -> (QuadraticBezierSegment<f32>, QuadraticBezierSegment<f32>) {
    let (mut near, mut far) = curve.split(t);
    near.to.y = y;
    far.from = near.to;
    near.ctrl.y = clamp(near.ctrl.y, near.from.y, near.to.y);
    far.ctrl.y = clamp(far.ctrl.y, far.from.y, far.to.y);

    (near, far)
}

fn clamp(v: f32, a: f32, b: f32) -> f32 {
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    v.max(min).min(max)
}

/// The remaining part of an edge, in the sweep's arena.
#[derive(Copy, Clone, Debug)]
struct SweepEdge {
    edge: Edge,
    source: EdgeIdx,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SweepState {
    Idle,
    Scanning,
    Done,
}

/// The slabs between two consecutive scan stops.
#[derive(Copy, Clone, Debug)]
pub struct Interval<'l> {
    pub y_top: f32,
    pub y_bottom: f32,
    pub slabs: &'l [Slab],
}

/// Advances through the scan stops and cuts the active edges into slabs.
///
/// Edges are never modified in place: the remaining part of a cut edge is
/// pushed into the arena and the next working set refers to it by index.
pub struct SweepLine {
    arena: Vec<SweepEdge>,
    active: Vec<EdgeIdx>,
    next_active: Vec<EdgeIdx>,
    slabs: Vec<Slab>,
    stops: Vec<f32>,
    current_stop: usize,
    pending: usize,
    num_edges: usize,
    fill: FillId,
    epsilon: f32,
    state: SweepState,
    pub(crate) log: bool,
}

impl SweepLine {
    pub fn new() -> Self {
        SweepLine {
            arena: Vec::new(),
            active: Vec::new(),
            next_active: Vec::new(),
            slabs: Vec::new(),
            stops: Vec::new(),
            current_stop: 0,
            pending: 0,
            num_edges: 0,
            fill: FillId::NONE,
            epsilon: 0.0,
            state: SweepState::Idle,
            log: false,
        }
    }

    /// Resets the sweep for a new set of edges, sorted by their top y.
    ///
    /// `fill` is only used to attribute diagnostics.
    pub fn begin(&mut self, edges: &[Edge], scan: &ScanSet, fill: FillId, epsilon: f32) {
        self.arena.clear();
        self.active.clear();
        self.next_active.clear();
        self.slabs.clear();
        self.stops.clear();

        self.arena.extend(edges.iter().enumerate().map(|(idx, edge)| SweepEdge {
            edge: *edge,
            source: EdgeIdx::from_usize(idx),
        }));
        self.stops.extend_from_slice(scan.stops());
        // The first stop only opens the first interval.
        self.current_stop = 1;
        self.pending = 0;
        self.num_edges = edges.len();
        self.fill = fill;
        self.epsilon = epsilon;
        self.state = SweepState::Scanning;
    }

    #[inline]
    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Moves the sweep line to the next scan stop and returns the slabs of the
    /// interval it just crossed.
    ///
    /// Returns `None` once every stop has been visited.
    pub fn next_interval(&mut self, diagnostics: &mut Vec<Diagnostic>) -> Option<Interval> {
        if self.state != SweepState::Scanning {
            return None;
        }

        if self.current_stop >= self.stops.len() {
            self.state = SweepState::Done;
            return None;
        }

        let y_top = self.stops[self.current_stop - 1];
        let y = self.stops[self.current_stop];
        self.current_stop += 1;

        // Edges are sorted by top y: the ones that start before the stop join
        // the working set, after the edges that were already active.
        while self.pending < self.num_edges && self.arena[self.pending].edge.top.y < y {
            self.active.push(EdgeIdx::from_usize(self.pending));
            self.pending += 1;
        }

        tess_log!(self, "sweep interval {} -> {}, {} active edges", y_top, y, self.active.len());

        self.slabs.clear();
        self.next_active.clear();

        for i in 0..self.active.len() {
            let idx = self.active[i];
            let current = self.arena[idx.to_usize()];
            if current.edge.top.y >= y {
                // Not reached yet, carried over as is along with the rest.
                self.next_active.extend_from_slice(&self.active[i..]);
                break;
            }

            let remaining = self.cut(&current, y, diagnostics);
            if let Some(edge) = remaining {
                if edge.height() > self.epsilon {
                    self.next_active.push(EdgeIdx::from_usize(self.arena.len()));
                    self.arena.push(SweepEdge {
                        edge,
                        source: current.source,
                    });
                }
            }
        }

        mem::swap(&mut self.active, &mut self.next_active);

        Some(Interval {
            y_top,
            y_bottom: y,
            slabs: &self.slabs,
        })
    }

    /// Emits the slab of an edge above `y` and returns what is left below.
    fn cut(&mut self, current: &SweepEdge, y: f32, diagnostics: &mut Vec<Diagnostic>) -> Option<Edge> {
        let edge = &current.edge;
        let reaches_bottom = y >= edge.bottom.y - self.epsilon;

        match edge.to_curve() {
            None => {
                if reaches_bottom {
                    self.push_slab(Slab::new(edge.top, edge.bottom, None, current));
                    return None;
                }

                let p = point(edge.to_line_segment().solve_x_for_y(y), y);
                self.push_slab(Slab::new(edge.top, p, None, current));

                Some(Edge { top: p, ..*edge })
            }
            Some(curve) => {
                if reaches_bottom {
                    self.push_slab(Slab::new(edge.top, edge.bottom, edge.ctrl, current));
                    return None;
                }

                match curve_t_for_y(&curve, y, self.epsilon) {
                    Some(t) => {
                        let (near, far) = split_curve(&curve, t, y);
                        self.push_slab(Slab::new(near.from, near.to, Some(near.ctrl), current));

                        Some(Edge::curve(&far, edge.fills, edge.stroke))
                    }
                    None => {
                        let chord = edge.to_line_segment();
                        let t = chord.solve_t_for_y(y);
                        let x = curve.x(t);
                        let p = point(if x.is_finite() { x } else { chord.x(t) }, y);
                        tess_log!(self, "no root at y = {}, approximating with a chord", y);
                        diagnostics.push(Diagnostic::curve_approximated(self.fill, p));
                        self.push_slab(Slab::new(edge.top, p, None, current));

                        let mut far = curve.after_split(t);
                        far.from = p;
                        if !is_finite_point(far.ctrl) {
                            return Some(Edge { top: p, ctrl: None, ..*edge });
                        }

                        Some(Edge::curve(&far, edge.fills, edge.stroke))
                    }
                }
            }
        }
    }

    fn push_slab(&mut self, slab: Slab) {
        if slab.to.y <= slab.from.y {
            return;
        }
        self.slabs.push(slab);
    }
}

impl Default for SweepLine {
    fn default() -> Self {
        SweepLine::new()
    }
}

#[cfg(test)]
use crate::edge::EdgeList;
#[cfg(test)]
use crate::error::DiagnosticKind;
#[cfg(test)]
use crate::path::Path;
#[cfg(test)]
use crate::FillRule;

#[cfg(test)]
fn collect_slabs(path: &Path, fill: FillId) -> Vec<(f32, f32, Vec<Slab>)> {
    let mut edges = EdgeList::new();
    edges.build(path, fill, FillRule::FillStyles, 1e-4);

    let mut sweep = SweepLine::new();
    assert_eq!(sweep.state(), SweepState::Idle);
    sweep.begin(edges.edges(), edges.scan_set(), fill, 1e-4);

    let mut diagnostics = Vec::new();
    let mut intervals = Vec::new();
    while let Some(interval) = sweep.next_interval(&mut diagnostics) {
        intervals.push((interval.y_top, interval.y_bottom, interval.slabs.to_vec()));
    }
    assert_eq!(sweep.state(), SweepState::Done);
    assert!(diagnostics.is_empty());

    intervals
}

#[test]
fn slabs_are_continuous() {
    use crate::extra::parser::parse_path;

    // A curved triangle-ish shape with stops at 0, 1 and 3.
    let path = parse_path("F 1 0 M 0 0 L 4 1 Q 3 2 2 3 L 0 0 Z").unwrap();
    let intervals = collect_slabs(&path, FillId(1));

    assert_eq!(intervals.len(), 2);
    assert_eq!((intervals[0].0, intervals[0].1), (0.0, 1.0));
    assert_eq!((intervals[1].0, intervals[1].1), (1.0, 3.0));

    for (y_top, y_bottom, slabs) in &intervals {
        for slab in slabs {
            assert!((slab.from.y - y_top).abs() < 1e-5);
            assert!((slab.to.y - y_bottom).abs() < 1e-5);
        }
    }

    // The long left edge is cut at y = 1 and both slabs meet there.
    let upper = intervals[0].2.iter().find(|s| s.from == point(0.0, 0.0) && s.to.x < 1.0);
    let lower = intervals[1].2.iter().find(|s| s.to == point(2.0, 3.0) && !s.is_curve());
    let (upper, lower) = (upper.unwrap(), lower.unwrap());
    assert_eq!(upper.to, lower.from);
    assert_eq!(upper.edge, lower.edge);
    assert!((upper.to.x - 2.0 / 3.0).abs() < 1e-5);
}

#[test]
fn curve_split_at_stop() {
    let curve = QuadraticBezierSegment {
        from: point(0.0, 0.0),
        ctrl: point(2.0, 1.0),
        to: point(0.0, 2.0),
    };
    let edge = Edge::curve(&curve, FillStyles::new(FillId(1), FillId::NONE), StrokeId::NONE);
    let mut scan = ScanSet::new();
    scan.insert(0.0);
    scan.insert(2.0);
    // A stop in the middle of the curve, as another edge would add.
    scan.insert(1.0);
    scan.finish(1e-4);

    let mut sweep = SweepLine::new();
    sweep.begin(&[edge], &scan, FillId(1), 1e-4);
    let mut diagnostics = Vec::new();

    let first = sweep.next_interval(&mut diagnostics).unwrap().slabs.to_vec();
    let second = sweep.next_interval(&mut diagnostics).unwrap().slabs.to_vec();
    assert!(sweep.next_interval(&mut diagnostics).is_none());
    assert!(diagnostics.is_empty());

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(first[0].to, second[0].from);
    assert!((first[0].to.x - 1.0).abs() < 1e-5);
    assert_eq!(first[0].to.y, 1.0);
    assert_eq!(first[0].ctrl, Some(point(1.0, 0.5)));
    assert_eq!(second[0].ctrl, Some(point(1.0, 1.5)));
    assert_eq!(second[0].to, point(0.0, 2.0));
}

#[test]
fn unsolvable_curve_falls_back_to_its_chord() {
    // No root can be found for a control point with a NaN height.
    let edge = Edge {
        top: point(0.0, 0.0),
        bottom: point(0.0, 2.0),
        ctrl: Some(point(1.0, f32::NAN)),
        fills: FillStyles::new(FillId(1), FillId::NONE),
        stroke: StrokeId::NONE,
    };
    let mut scan = ScanSet::new();
    scan.insert(0.0);
    scan.insert(1.0);
    scan.insert(2.0);
    scan.finish(1e-4);

    let mut sweep = SweepLine::new();
    sweep.begin(&[edge], &scan, FillId(1), 1e-4);
    let mut diagnostics = Vec::new();

    let first = sweep.next_interval(&mut diagnostics).unwrap().slabs.to_vec();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].from, point(0.0, 0.0));
    assert_eq!(first[0].to, point(0.5, 1.0));
    assert_eq!(first[0].ctrl, None);

    let second = sweep.next_interval(&mut diagnostics).unwrap().slabs.to_vec();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].from, point(0.5, 1.0));
    assert_eq!(second[0].to, point(0.0, 2.0));
    assert_eq!(second[0].ctrl, None);

    assert!(sweep.next_interval(&mut diagnostics).is_none());
    assert_eq!(sweep.state(), SweepState::Done);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::CurveApproximated);
    assert_eq!(diagnostics[0].fill, FillId(1));
    assert_eq!(diagnostics[0].position, Some(point(0.5, 1.0)));
}

#[test]
fn split_slab_at_y() {
    let slab = Slab {
        from: point(0.0, 0.0),
        to: point(4.0, 4.0),
        ctrl: None,
        fills: FillStyles::NONE,
        stroke: StrokeId::NONE,
        edge: EdgeIdx(0),
    };
    let (a, b) = slab.split_at_y(1.0, 1e-4);
    assert_eq!(a.to, point(1.0, 1.0));
    assert_eq!(b.from, point(1.0, 1.0));
    assert_eq!(b.to, point(4.0, 4.0));

    let curved = Slab {
        ctrl: Some(point(4.0, 0.0)),
        ..slab
    };
    let (a, b) = curved.split_at_y(1.0, 1e-4);
    assert_eq!(a.to.y, 1.0);
    assert_eq!(a.to, b.from);
    assert!(a.ctrl.unwrap().y <= 1.0);
    assert!(b.ctrl.unwrap().y >= 1.0);
}
