//! Turns the slabs of a sweep interval into classified triangles.

use crate::error::Diagnostic;
use crate::math::Point;
use crate::sweep::Slab;
use crate::{FillId, FillOptions, FillRule};

use core::cmp::Ordering;

/// How a triangle contributes to the coverage of its fill region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum TriangleKind {
    /// Solid coverage.
    Fill,
    /// Curve triangle adding the region between the curve and its control point.
    CurveInner,
    /// Curve triangle removing the region between the curve and its control
    /// point from the solid triangles that cover it.
    CurveOuter,
}

impl TriangleKind {
    #[inline]
    pub fn is_curve(self) -> bool {
        self != TriangleKind::Fill
    }
}

/// A triangle produced by the fill tessellator.
///
/// Curve triangles are `(from, ctrl, to)`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Triangle {
    pub vertices: [Point; 3],
    pub kind: TriangleKind,
    pub fill: FillId,
}

impl Triangle {
    #[inline]
    pub fn to_geom(&self) -> crate::geom::Triangle<f32> {
        crate::geom::Triangle {
            a: self.vertices[0],
            b: self.vertices[1],
            c: self.vertices[2],
        }
    }

    /// Positive when counter-clockwise in a y-up frame.
    #[inline]
    pub fn signed_area(&self) -> f32 {
        self.to_geom().signed_area()
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.to_geom().area()
    }

    /// The area this triangle adds to its region once rasterized.
    ///
    /// The region between a curve and its control point covers a third of the
    /// curve triangle.
    pub fn coverage(&self) -> f32 {
        match self.kind {
            TriangleKind::Fill => self.area(),
            TriangleKind::CurveInner => self.area() / 3.0,
            TriangleKind::CurveOuter => -self.area() / 3.0,
        }
    }
}

/// Which side of the region a boundary is on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Pairs the slabs of an interval and emits the triangles between them.
pub struct TrapezoidTessellator {
    sorted: Vec<Slab>,
    pub(crate) log: bool,
}

impl TrapezoidTessellator {
    pub fn new() -> Self {
        TrapezoidTessellator {
            sorted: Vec::new(),
            log: false,
        }
    }

    /// Emits the triangles covering `target` between the given slabs.
    ///
    /// The slabs must all belong to the same sweep interval. Curves that had
    /// to be replaced by their chords are reported in `diagnostics`.
    pub fn tessellate_interval(
        &mut self,
        slabs: &[Slab],
        target: FillId,
        options: &FillOptions,
        output: &mut Vec<Triangle>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        self.sorted.clear();
        self.sorted.extend_from_slice(slabs);
        self.sorted.sort_by(compare_slabs);

        let count = output.len();
        match options.fill_rule {
            FillRule::FillStyles => {
                reconcile_fill_order(&mut self.sorted);
                for i in 1..self.sorted.len() {
                    let (sl, sr) = (&self.sorted[i - 1], &self.sorted[i]);
                    if sl.fills.right == target && sr.fills.left == target {
                        emit_pair(sl, sr, target, options, 0, output, diagnostics);
                    }
                }
            }
            FillRule::EvenOdd => {
                for pair in self.sorted.chunks_exact(2) {
                    emit_pair(&pair[0], &pair[1], target, options, 0, output, diagnostics);
                }
            }
        }

        tess_log!(
            self,
            "interval with {} slabs: {} triangles",
            self.sorted.len(),
            output.len() - count
        );
    }
}

impl Default for TrapezoidTessellator {
    fn default() -> Self {
        TrapezoidTessellator::new()
    }
}

fn compare_slabs(a: &Slab, b: &Slab) -> Ordering {
    a.from
        .x
        .partial_cmp(&b.from.x)
        .unwrap_or(Ordering::Equal)
        .then(a.to.x.partial_cmp(&b.to.x).unwrap_or(Ordering::Equal))
        .then(a.mid_x().partial_cmp(&b.mid_x()).unwrap_or(Ordering::Equal))
}

/// Coincident slabs can come out of the sort in an order that does not match
/// their fills. Walking from the left with the fill between the slabs, a slab
/// that does not continue that fill is swapped with its neighbor when the
/// neighbor does.
fn reconcile_fill_order(slabs: &mut [Slab]) {
    let mut fill = FillId::NONE;
    for i in 0..slabs.len() {
        if i + 1 < slabs.len() && slabs[i].fills.left != fill && slabs[i + 1].fills.left == fill {
            slabs.swap(i, i + 1);
        }
        fill = slabs[i].fills.right;
    }
}

/// Whether `sl` is to the right of `sr` at both ends without coinciding.
fn crossed(sl: &Slab, sr: &Slab) -> bool {
    sl.from.x >= sr.from.x && sl.to.x >= sr.to.x && !(sl.from == sr.from && sl.to == sr.to)
}

/// The control point of a slab that is curved enough to get its own triangle.
fn curve_ctrl(slab: &Slab, tolerance: f32) -> Option<Point> {
    let curve = slab.curve()?;
    if curve.is_linear(tolerance) {
        return None;
    }

    Some(curve.ctrl)
}

fn classify(slab: &Slab, ctrl: Point, side: Side) -> TriangleKind {
    let cross = (slab.to - slab.from).cross(ctrl - slab.from);
    // Positive cross: the control point is on the -x side of the chord.
    let towards_interior = match side {
        Side::Left => cross < 0.0,
        Side::Right => cross > 0.0,
    };

    if towards_interior {
        TriangleKind::CurveInner
    } else {
        TriangleKind::CurveOuter
    }
}

/// The x coordinate at height `y` of the boundary `from → [ctrl] → to`.
///
/// `y` must be within the slab's y range.
fn boundary_x(slab: &Slab, ctrl: Option<Point>, y: f32) -> f32 {
    let (a, b) = match ctrl {
        Some(c) if y < c.y => (slab.from, c),
        Some(c) => (c, slab.to),
        None => (slab.from, slab.to),
    };

    let dy = b.y - a.y;
    if dy <= 0.0 {
        return a.x;
    }

    a.x + (b.x - a.x) * (y - a.y) / dy
}

/// Whether the left boundary stays left of the right boundary.
///
/// Both boundaries are piecewise linear in y with a break at their control
/// point, so comparing them at the control points' heights is enough.
fn chains_ordered(
    sl: &Slab,
    cl: Option<Point>,
    sr: &Slab,
    cr: Option<Point>,
    epsilon: f32,
) -> bool {
    cl.iter()
        .chain(cr.iter())
        .all(|c| boundary_x(sl, cl, c.y) <= boundary_x(sr, cr, c.y) + epsilon)
}

fn emit_pair(
    sl: &Slab,
    sr: &Slab,
    target: FillId,
    options: &FillOptions,
    depth: u32,
    output: &mut Vec<Triangle>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let top = sl.from.y.max(sr.from.y);
    let bottom = sl.to.y.min(sr.to.y);
    if bottom - top <= options.epsilon {
        return;
    }

    if crossed(sl, sr) {
        return;
    }

    let mut cl = curve_ctrl(sl, options.flatness_tolerance);
    let mut cr = curve_ctrl(sr, options.flatness_tolerance);

    if !chains_ordered(sl, cl, sr, cr, options.epsilon) {
        if depth < options.max_subdivisions {
            let y = (top + bottom) * 0.5;
            let (sl_a, sl_b) = sl.split_at_y(y, options.epsilon);
            let (sr_a, sr_b) = sr.split_at_y(y, options.epsilon);
            emit_pair(&sl_a, &sr_a, target, options, depth + 1, output, diagnostics);
            emit_pair(&sl_b, &sr_b, target, options, depth + 1, output, diagnostics);
            return;
        }

        // Outward curves only push their boundary away from the other one.
        if cl.map_or(false, |c| classify(sl, c, Side::Left) == TriangleKind::CurveInner) {
            diagnostics.push(Diagnostic::curve_approximated(target, sl.from));
            cl = None;
        }
        if cr.map_or(false, |c| classify(sr, c, Side::Right) == TriangleKind::CurveInner) {
            diagnostics.push(Diagnostic::curve_approximated(target, sr.from));
            cr = None;
        }
    }

    let (sl0, sl1, sr0, sr1) = (sl.from, sl.to, sr.from, sr.to);
    let mut body = Body {
        output: &mut *output,
        fill: target,
        min_area: options.epsilon * options.epsilon,
    };

    match (cl, cr) {
        (None, None) => {
            body.quad(sl0, sr0, sr1, sl1);
        }
        (Some(cl), None) => {
            body.triangle(sl0, sr0, cl);
            body.triangle(sr0, sr1, cl);
            body.triangle(sr1, sl1, cl);
        }
        (None, Some(cr)) => {
            body.triangle(sl0, sr0, cr);
            body.triangle(sl1, sl0, cr);
            body.triangle(sr1, sl1, cr);
        }
        (Some(cl), Some(cr)) => {
            // The segment between the control points splits the hexagon.
            body.quad(sl0, sr0, cr, cl);
            body.quad(cl, cr, sr1, sl1);
        }
    }

    if let Some(ctrl) = cl {
        output.push(Triangle {
            vertices: [sl0, ctrl, sl1],
            kind: classify(sl, ctrl, Side::Left),
            fill: target,
        });
    }
    if let Some(ctrl) = cr {
        output.push(Triangle {
            vertices: [sr0, ctrl, sr1],
            kind: classify(sr, ctrl, Side::Right),
            fill: target,
        });
    }
}

/// Emits the counter-clockwise `Fill` triangles of a trapezoid body.
struct Body<'l> {
    output: &'l mut Vec<Triangle>,
    fill: FillId,
    min_area: f32,
}

impl<'l> Body<'l> {
    fn triangle(&mut self, a: Point, b: Point, c: Point) {
        let triangle = Triangle {
            vertices: [a, b, c],
            kind: TriangleKind::Fill,
            fill: self.fill,
        };
        if triangle.signed_area() <= self.min_area {
            return;
        }

        self.output.push(triangle);
    }

    /// Splits the counter-clockwise quad `a b c d` along `b d`, or along `a c`
    /// when `b d` is outside of it.
    fn quad(&mut self, a: Point, b: Point, c: Point, d: Point) {
        let min_area = self.min_area;
        let reflex = |p: Point, q: Point, r: Point| {
            crate::geom::Triangle { a: p, b: q, c: r }.signed_area() < -min_area
        };

        if reflex(a, b, d) || reflex(c, d, b) {
            self.triangle(a, b, c);
            self.triangle(c, d, a);
        } else {
            self.triangle(a, b, d);
            self.triangle(c, d, b);
        }
    }
}

#[cfg(test)]
use crate::edge::EdgeIdx;
#[cfg(test)]
use crate::math::point;
#[cfg(test)]
use crate::{FillStyles, StrokeId};

#[cfg(test)]
fn slab(from: Point, to: Point, ctrl: Option<Point>, left: u32, right: u32) -> Slab {
    Slab {
        from,
        to,
        ctrl,
        fills: FillStyles::new(FillId(left), FillId(right)),
        stroke: StrokeId::NONE,
        edge: EdgeIdx(0),
    }
}

#[test]
fn straight_trapezoid() {
    let slabs = [
        slab(point(3.0, 0.0), point(4.0, 1.0), None, 1, 0),
        slab(point(0.0, 0.0), point(0.0, 1.0), None, 0, 1),
    ];

    let mut output = Vec::new();
    let mut tess = TrapezoidTessellator::new();
    tess.tessellate_interval(&slabs, FillId(1), &FillOptions::DEFAULT, &mut output, &mut Vec::new());

    assert_eq!(output.len(), 2);
    for t in &output {
        assert_eq!(t.kind, TriangleKind::Fill);
        assert_eq!(t.fill, FillId(1));
        assert!(t.signed_area() > 0.0);
    }
    let area: f32 = output.iter().map(Triangle::coverage).sum();
    assert!((area - 3.5).abs() < 1e-5);
}

#[test]
fn wrong_fill_is_ignored() {
    let slabs = [
        slab(point(0.0, 0.0), point(0.0, 1.0), None, 0, 1),
        slab(point(3.0, 0.0), point(4.0, 1.0), None, 1, 0),
    ];

    let mut output = Vec::new();
    let mut tess = TrapezoidTessellator::new();
    tess.tessellate_interval(&slabs, FillId(2), &FillOptions::DEFAULT, &mut output, &mut Vec::new());
    assert!(output.is_empty());
}

#[test]
fn coincident_slabs_are_reconciled() {
    // Two regions touching along x = 1. The slabs at x = 1 sort as equal and
    // keep their input order, which is the wrong one here.
    let slabs = [
        slab(point(0.0, 0.0), point(0.0, 1.0), None, 0, 1),
        slab(point(1.0, 0.0), point(1.0, 1.0), None, 0, 2),
        slab(point(1.0, 0.0), point(1.0, 1.0), None, 1, 0),
        slab(point(2.0, 0.0), point(2.0, 1.0), None, 2, 0),
    ];

    let mut tess = TrapezoidTessellator::new();
    for fill in &[FillId(1), FillId(2)] {
        let mut output = Vec::new();
        tess.tessellate_interval(&slabs, *fill, &FillOptions::DEFAULT, &mut output, &mut Vec::new());
        let area: f32 = output.iter().map(Triangle::coverage).sum();
        assert!((area - 1.0).abs() < 1e-5);
    }
}

#[test]
fn curve_classification() {
    // Right boundary bulging out of the region, left boundary bulging in.
    let slabs = [
        slab(point(0.0, 0.0), point(0.0, 2.0), Some(point(0.5, 1.0)), 0, 1),
        slab(point(2.0, 0.0), point(2.0, 2.0), Some(point(3.0, 1.0)), 1, 0),
    ];

    let mut tess = TrapezoidTessellator::new();
    let mut output = Vec::new();
    tess.tessellate_interval(&slabs, FillId(1), &FillOptions::DEFAULT, &mut output, &mut Vec::new());

    let kinds: Vec<TriangleKind> = output.iter().filter(|t| t.kind.is_curve()).map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TriangleKind::CurveInner, TriangleKind::CurveOuter]);
    assert_eq!(output.iter().filter(|t| t.kind == TriangleKind::Fill).count(), 4);
    for t in output.iter().filter(|t| t.kind == TriangleKind::Fill) {
        assert!(t.signed_area() > 0.0);
    }

    // 4 - 2/3 * (0.5 * 2 / 2) + 2/3 * (1 * 2 / 2)
    let area: f32 = output.iter().map(Triangle::coverage).sum();
    assert!((area - (4.0 - 1.0 / 3.0 + 2.0 / 3.0)).abs() < 1e-4);
}

#[test]
fn overlapping_inward_curves() {
    // Both control triangles reach past x = 2 from opposite sides.
    let slabs = [
        slab(point(0.0, 0.0), point(0.0, 4.0), Some(point(3.0, 2.0)), 0, 1),
        slab(point(4.0, 0.0), point(4.0, 4.0), Some(point(1.0, 2.0)), 1, 0),
    ];
    assert!(!chains_ordered(&slabs[0], slabs[0].ctrl, &slabs[1], slabs[1].ctrl, 1e-4));

    let mut tess = TrapezoidTessellator::new();
    let mut output = Vec::new();
    let mut diagnostics = Vec::new();
    tess.tessellate_interval(&slabs, FillId(1), &FillOptions::DEFAULT, &mut output, &mut diagnostics);

    assert!(diagnostics.is_empty());
    assert_eq!(output.len(), 12);
    assert_eq!(output.iter().filter(|t| t.kind == TriangleKind::CurveInner).count(), 4);
    for t in output.iter().filter(|t| t.kind == TriangleKind::Fill) {
        assert!(t.signed_area() > 0.0);
    }
    let area: f32 = output.iter().map(Triangle::coverage).sum();
    assert!((area - 8.0).abs() < 1e-4);

    // Without subdivision, the inward curves are replaced by their chords.
    let mut output = Vec::new();
    let mut diagnostics = Vec::new();
    let options = FillOptions::DEFAULT.with_max_subdivisions(0);
    tess.tessellate_interval(&slabs, FillId(1), &options, &mut output, &mut diagnostics);

    assert_eq!(output.len(), 2);
    assert!(output.iter().all(|t| t.kind == TriangleKind::Fill && t.signed_area() > 0.0));
    assert_eq!(
        diagnostics,
        vec![
            Diagnostic::curve_approximated(FillId(1), point(0.0, 0.0)),
            Diagnostic::curve_approximated(FillId(1), point(4.0, 0.0)),
        ]
    );
}

#[test]
fn boundary_chains() {
    let left = slab(point(0.0, 0.0), point(0.0, 4.0), Some(point(2.0, 1.0)), 0, 1);
    assert_eq!(boundary_x(&left, left.ctrl, 0.5), 1.0);
    assert_eq!(boundary_x(&left, left.ctrl, 1.0), 2.0);
    assert!((boundary_x(&left, left.ctrl, 3.0) - 2.0 / 3.0).abs() < 1e-6);
    assert_eq!(boundary_x(&left, None, 3.0), 0.0);

    let right = slab(point(3.0, 0.0), point(3.0, 4.0), Some(point(1.0, 3.0)), 1, 0);
    // At y = 3 the left chain is at 2/3 and the right one at 1.
    assert!(chains_ordered(&left, left.ctrl, &right, right.ctrl, 0.0));
    let deeper = slab(point(3.0, 0.0), point(3.0, 4.0), Some(point(1.0, 1.0)), 1, 0);
    assert!(!chains_ordered(&left, left.ctrl, &deeper, deeper.ctrl, 0.0));
}

#[test]
fn even_odd_pairs_and_crossing() {
    let slabs = [
        slab(point(0.0, 0.0), point(0.0, 1.0), None, 1, 0),
        slab(point(2.0, 0.0), point(2.0, 1.0), None, 0, 1),
    ];

    let mut tess = TrapezoidTessellator::new();
    let mut output = Vec::new();
    tess.tessellate_interval(&slabs, FillId(1), &FillOptions::even_odd(), &mut output, &mut Vec::new());
    assert_eq!(output.len(), 2);

    assert!(crossed(&slabs[1], &slabs[0]));
    assert!(!crossed(&slabs[0], &slabs[1]));
    assert!(!crossed(&slabs[0], &slabs[0]));
}
