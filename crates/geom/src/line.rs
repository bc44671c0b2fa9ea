use crate::scalar::Scalar;
use crate::{Point, Vector};

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment<S> {
    pub from: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> LineSegment<S> {
    /// Sample the x coordinate of the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn x(&self, t: S) -> S {
        self.from.x * (S::ONE - t) + self.to.x * t
    }

    /// Horizontal segments solve to their start.
    pub fn solve_t_for_y(&self, y: S) -> S {
        let dy = self.to.y - self.from.y;
        if dy == S::ZERO {
            return S::ZERO;
        }

        (y - self.from.y) / dy
    }

    pub fn solve_x_for_y(&self, y: S) -> S {
        self.x(self.solve_t_for_y(y))
    }
}

/// An infinite line defined by a point and a vector.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Line<S> {
    pub point: Point<S>,
    pub vector: Vector<S>,
}

impl<S: Scalar> Line<S> {
    /// Signed distance between the line and a point.
    ///
    /// The result is positive when `p` lies on the positive side of the line's
    /// vector (the sign of `vector.cross(p - point)`). For a line pointing
    /// towards +y, the positive side is the -x side.
    pub fn signed_distance_to_point(&self, p: &Point<S>) -> S {
        let v = *p - self.point;
        self.vector.cross(v) / self.vector.length()
    }
}

#[cfg(test)]
use crate::point;

#[cfg(test)]
fn fuzzy_eq_f32(a: f32, b: f32, epsilon: f32) -> bool {
    f32::abs(a - b) <= epsilon
}

#[test]
fn solve_x_for_y() {
    let segment = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(4.0, 8.0),
    };

    assert!(fuzzy_eq_f32(segment.solve_x_for_y(2.0), 1.0, 1e-6));
    assert!(fuzzy_eq_f32(segment.solve_x_for_y(8.0), 4.0, 1e-6));

    let upwards = LineSegment {
        from: segment.to,
        to: segment.from,
    };
    assert!(fuzzy_eq_f32(upwards.solve_x_for_y(6.0), 3.0, 1e-6));

    let horizontal = LineSegment {
        from: point(1.0f32, 3.0),
        to: point(5.0, 3.0),
    };
    assert_eq!(horizontal.solve_t_for_y(3.0), 0.0);
}

#[test]
fn signed_distance_sign_convention() {
    // A line going down the y axis.
    let line = Line {
        point: point(0.0f32, 0.0),
        vector: crate::vector(0.0, 10.0),
    };

    assert!(line.signed_distance_to_point(&point(-1.0, 5.0)) > 0.0);
    assert!(line.signed_distance_to_point(&point(1.0, 5.0)) < 0.0);
    assert!(fuzzy_eq_f32(
        line.signed_distance_to_point(&point(-2.0, 3.0)),
        2.0,
        1e-6
    ));
}
