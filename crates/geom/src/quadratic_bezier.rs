use crate::scalar::Scalar;
use crate::{Line, Point};
use arrayvec::ArrayVec;

use core::mem;

/// A 2d curve segment defined by three points: the beginning of the segment, a control
/// point and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)² * from + 2 * (1 - t) * t * ctrl + t² * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadraticBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> QuadraticBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;

        self.from * one_t2 + self.ctrl.to_vector() * S::TWO * one_t * t + self.to.to_vector() * t2
    }

    /// Sample the x coordinate of the curve at t (expecting t between 0 and 1).
    pub fn x(&self, t: S) -> S {
        let t2 = t * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;

        self.from.x * one_t2 + self.ctrl.x * S::TWO * one_t * t + self.to.x * t2
    }

    /// Sample the y coordinate of the curve at t (expecting t between 0 and 1).
    pub fn y(&self, t: S) -> S {
        let t2 = t * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;

        self.from.y * one_t2 + self.ctrl.y * S::TWO * one_t * t + self.to.y * t2
    }

    /// Return the y inflection point or None if this curve is y-monotonic.
    ///
    /// The returned parameter is strictly inside `(0, 1)`.
    pub fn local_y_extremum_t(&self) -> Option<S> {
        let div = self.from.y - S::TWO * self.ctrl.y + self.to.y;
        if div == S::ZERO {
            return None;
        }
        let t = (self.from.y - self.ctrl.y) / div;
        if t > S::ZERO && t < S::ONE {
            return Some(t);
        }

        None
    }

    /// Invokes a callback for each y-monotonic part of the segment.
    ///
    /// There are at most two parts. When the curve is split at its extremum, the
    /// control point of each part is clamped into the y range of its endpoints so
    /// that rounding cannot produce a tiny local extremum.
    pub fn for_each_y_monotonic<F>(&self, cb: &mut F)
    where
        F: FnMut(&QuadraticBezierSegment<S>),
    {
        match self.local_y_extremum_t() {
            Some(t) => {
                let (mut a, mut b) = self.split(t);
                a.clamp_ctrl_y();
                b.clamp_ctrl_y();
                cb(&a);
                cb(&b);
            }
            None => {
                cb(self);
            }
        }
    }

    fn clamp_ctrl_y(&mut self) {
        let (min, max) = if self.from.y <= self.to.y {
            (self.from.y, self.to.y)
        } else {
            (self.to.y, self.from.y)
        };
        self.ctrl.y = self.ctrl.y.max(min).min(max);
    }

    /// Computes the parameters at which the curve crosses the horizontal line at `y`.
    ///
    /// The roots are not filtered against `[0, 1]`: callers decide how much slack
    /// they accept around the curve's end points. Roots come sorted in increasing
    /// order.
    pub fn solve_t_for_y(&self, y: S) -> ArrayVec<S, 2> {
        let mut result = ArrayVec::new();

        // y(t) = a * t² + b * t + c
        let a = self.from.y - S::TWO * self.ctrl.y + self.to.y;
        let b = S::TWO * (self.ctrl.y - self.from.y);
        let c = self.from.y - y;

        let scale = S::abs(a) + S::abs(b) + S::abs(c);
        if scale == S::ZERO {
            return result;
        }

        if S::abs(a) <= S::EPSILON * scale {
            // Degenerates into a linear equation.
            if b != S::ZERO {
                result.push(-c / b);
            }
            return result;
        }

        let mut discriminant = b * b - S::FOUR * a * c;
        if discriminant < S::ZERO {
            if discriminant > -S::EPSILON * b * b {
                // Tangent to the line, up to rounding.
                discriminant = S::ZERO;
            } else {
                return result;
            }
        }

        let sqrt = discriminant.sqrt();
        let q = if b < S::ZERO {
            -S::HALF * (b - sqrt)
        } else {
            -S::HALF * (b + sqrt)
        };

        if q == S::ZERO {
            // b and the discriminant are both zero, which also means c is zero.
            result.push(S::ZERO);
            return result;
        }

        let mut t1 = q / a;
        let mut t2 = c / q;
        if t1 > t2 {
            mem::swap(&mut t1, &mut t2);
        }

        result.push(t1);
        if t2 != t1 {
            result.push(t2);
        }

        result
    }

    /// Split this curve into two sub-curves.
    pub fn split(&self, t: S) -> (QuadraticBezierSegment<S>, QuadraticBezierSegment<S>) {
        let split_point = self.sample(t);

        (
            QuadraticBezierSegment {
                from: self.from,
                ctrl: self.from.lerp(self.ctrl, t),
                to: split_point,
            },
            QuadraticBezierSegment {
                from: split_point,
                ctrl: self.ctrl.lerp(self.to, t),
                to: self.to,
            },
        )
    }

    /// Return the curve after the split point.
    pub fn after_split(&self, t: S) -> QuadraticBezierSegment<S> {
        QuadraticBezierSegment {
            from: self.sample(t),
            ctrl: self.ctrl.lerp(self.to, t),
            to: self.to,
        }
    }

    /// Signed distance between the control point and the line supporting the
    /// baseline.
    ///
    /// Uses the sign convention of `Line::signed_distance_to_point`. Returns the
    /// distance between the control point and `from` when the end points are
    /// equal.
    pub fn ctrl_signed_distance(&self) -> S {
        let baseline = self.to - self.from;
        if baseline.square_length() == S::ZERO {
            return (self.ctrl - self.from).length();
        }

        Line {
            point: self.from,
            vector: baseline,
        }
        .signed_distance_to_point(&self.ctrl)
    }

    /// Returns whether the curve can be treated as its baseline, given a
    /// maximum distance between the control point and the baseline.
    pub fn is_linear(&self, tolerance: S) -> bool {
        S::abs(self.ctrl_signed_distance()) <= tolerance
    }
}

#[cfg(test)]
use crate::point;

#[cfg(test)]
fn fuzzy_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[cfg(test)]
fn y_monotonic_parts(curve: &QuadraticBezierSegment<f32>) -> ArrayVec<QuadraticBezierSegment<f32>, 2> {
    let mut parts = ArrayVec::new();
    curve.for_each_y_monotonic(&mut |part| parts.push(*part));

    parts
}

#[test]
fn y_extremum() {
    let curve = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(1.0, 2.0),
        to: point(2.0, 0.0),
    };

    assert_eq!(curve.local_y_extremum_t(), Some(0.5));
    assert!(fuzzy_eq(curve.y(0.5), 1.0));

    // The extremum sits at an end point: the curve is already monotonic.
    let monotonic = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(1.0, 0.0),
        to: point(2.0, 2.0),
    };
    assert_eq!(monotonic.local_y_extremum_t(), None);
}

#[test]
fn y_monotonic_parts_meet_at_the_extremum() {
    let curve = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(1.0, 2.0),
        to: point(2.0, 0.0),
    };

    let parts = y_monotonic_parts(&curve);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].from, curve.from);
    assert_eq!(parts[1].to, curve.to);
    assert_eq!(parts[0].to, parts[1].from);
    assert!(fuzzy_eq(parts[0].to.y, 1.0));
    assert!(fuzzy_eq(parts[0].to.x, 1.0));

    for part in &parts {
        assert_eq!(part.local_y_extremum_t(), None);
        assert!(part.ctrl.y >= 0.0 && part.ctrl.y <= 1.0);
    }
}

#[test]
fn monotonic_curve_is_a_single_part() {
    let curve = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(3.0, 1.0),
        to: point(0.0, 2.0),
    };

    let parts = y_monotonic_parts(&curve);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0], curve);
}

#[test]
fn solve_t_for_y() {
    let curve = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(1.0, 1.0),
        to: point(0.0, 2.0),
    };

    // Evenly spaced control point, y(t) = 2t.
    let roots = curve.solve_t_for_y(0.5);
    assert_eq!(roots.len(), 1);
    assert!(fuzzy_eq(roots[0], 0.25));

    let curve = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(2.0, 0.0),
        to: point(2.0, 4.0),
    };

    // y(t) = 4t²
    let roots = curve.solve_t_for_y(1.0);
    let in_range: ArrayVec<f32, 2> = roots.iter().cloned().filter(|t| *t >= 0.0 && *t <= 1.0).collect();
    assert_eq!(in_range.len(), 1);
    assert!(fuzzy_eq(in_range[0], 0.5));
    assert!(fuzzy_eq(curve.y(in_range[0]), 1.0));

    let curve = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(1.0, 2.0),
        to: point(2.0, 0.0),
    };

    // Two crossings on both sides of the extremum.
    let roots = curve.solve_t_for_y(0.5);
    assert_eq!(roots.len(), 2);
    assert!(roots[0] < roots[1]);
    for t in &roots {
        assert!(fuzzy_eq(curve.y(*t), 0.5));
    }

    // Above the extremum: no crossing.
    assert!(curve.solve_t_for_y(1.5).is_empty());
}

#[test]
fn split_matches_sample() {
    let curve = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(4.0, 1.0),
        to: point(1.0, 5.0),
    };

    let (a, b) = curve.split(0.3);
    assert_eq!(a.to, curve.sample(0.3));
    assert_eq!(b, curve.after_split(0.3));

    for i in 0..=10 {
        let t = i as f32 / 10.0;
        let pa = a.sample(t);
        let expected = curve.sample(t * 0.3);
        assert!(fuzzy_eq(pa.x, expected.x) && fuzzy_eq(pa.y, expected.y));
        assert!(fuzzy_eq(a.x(t), expected.x));
    }
}

#[test]
fn linear_detection() {
    let flat = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(0.05, 1.0),
        to: point(0.0, 2.0),
    };
    assert!(flat.is_linear(0.1));

    let bulging = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(-1.0, 1.0),
        to: point(0.0, 2.0),
    };
    assert!(!bulging.is_linear(0.1));
    // Pointing towards +y, the -x side is the positive side.
    assert!(fuzzy_eq(bulging.ctrl_signed_distance(), 1.0));

    let reversed = QuadraticBezierSegment {
        from: bulging.to,
        ctrl: bulging.ctrl,
        to: bulging.from,
    };
    assert!(fuzzy_eq(reversed.ctrl_signed_distance(), -1.0));
}
