use crate::scalar::Scalar;
use crate::Point;

/// A 2D triangle defined by three points `a`, `b` and `c`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Triangle<S> {
    pub a: Point<S>,
    pub b: Point<S>,
    pub c: Point<S>,
}

impl<S: Scalar> Triangle<S> {
    /// Positive when `a, b, c` turn counter-clockwise in a y-up frame.
    #[inline]
    pub fn signed_area(&self) -> S {
        (self.b - self.a).cross(self.c - self.a) * S::HALF
    }

    #[inline]
    pub fn area(&self) -> S {
        S::abs(self.signed_area())
    }
}

#[test]
fn test_triangle_area() {
    use crate::point;

    let t = Triangle {
        a: point(0.0f32, 0.0),
        b: point(2.0, 0.0),
        c: point(0.0, 3.0),
    };
    let clockwise = Triangle { b: t.c, c: t.b, ..t };

    assert_eq!(t.signed_area(), 3.0);
    assert_eq!(clockwise.signed_area(), -3.0);
    assert_eq!(clockwise.area(), 3.0);

    let degenerate = Triangle {
        a: point(0.0f32, 0.0),
        b: point(1.0, 1.0),
        c: point(3.0, 3.0),
    };
    assert_eq!(degenerate.area(), 0.0);
}
