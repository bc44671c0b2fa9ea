#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]
#![no_std]

//! Simple 2D geometric primitives on top of euclid.
//!
//! This crate is reexported in [quill](../quill/index.html).
//!
//! # Overview.
//!
//! This crate implements the maths the curve-preserving fill tessellator needs:
//!
//! - lines and line segments,
//! - quadratic bézier curves,
//! - triangles.
//!
//! # Sweep-friendly curves
//!
//! The tessellator sweeps a horizontal line from top (smallest y) to bottom
//! (largest y). Everything it does to a curve boils down to two questions:
//!
//! - where does the curve change vertical direction
//!   ([`QuadraticBezierSegment::local_y_extremum_t`]), so that it can be cut into
//!   y-monotonic pieces,
//! - at which parameter does a y-monotonic piece cross a given horizontal line
//!   ([`QuadraticBezierSegment::solve_t_for_y`]), so that it can be cut at each
//!   scan stop without approximating it with line segments.
//!
//! Curves are always split with de Casteljau's algorithm, which means every
//! sub-curve is itself an exact quadratic bézier curve.

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod line;
pub mod quadratic_bezier;
mod triangle;

#[doc(inline)]
pub use crate::line::{Line, LineSegment};
#[doc(inline)]
pub use crate::quadratic_bezier::QuadraticBezierSegment;
#[doc(inline)]
pub use crate::triangle::Triangle;

pub use crate::scalar::Scalar;

mod scalar {
    pub(crate) use num_traits::Float;

    use core::fmt::{Debug, Display};
    use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

    pub trait Scalar:
        Float + Sized + Display + Debug + AddAssign + SubAssign + MulAssign + DivAssign
    {
        const HALF: Self;
        const ZERO: Self;
        const ONE: Self;
        const TWO: Self;
        const FOUR: Self;

        const EPSILON: Self;
    }

    impl Scalar for f32 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const FOUR: Self = 4.0;

        const EPSILON: Self = 1e-4;
    }

    impl Scalar for f64 {
        const HALF: Self = 0.5;
        const ZERO: Self = 0.0;
        const ONE: Self = 1.0;
        const TWO: Self = 2.0;
        const FOUR: Self = 4.0;

        const EPSILON: Self = 1e-8;
    }
}

/// Alias for `euclid::default::Point2D`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D`.
pub use euclid::default::Vector2D as Vector;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector<S>(x: S, y: S) -> Vector<S> {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point<S>(x: S, y: S) -> Point<S> {
    Point::new(x, y)
}

/// Returns whether both coordinates of the point are finite (neither `NaN` nor infinite).
#[inline]
pub fn is_finite_point<S: Scalar>(p: Point<S>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
