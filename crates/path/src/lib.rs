#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::match_like_matches_macro)]
//! Data structures to describe fill regions with curved boundaries.
//!
//! A [`Path`](path/struct.Path.html) is a sequence of sub-paths made of line
//! segments and quadratic bézier curves. Every segment records the fill region
//! on each of its sides (see [`FillStyles`](struct.FillStyles.html)), which is
//! what the tessellator uses to tell the inside of a region from the outside.
//!
//! This crate is reexported in [quill](../quill/index.html).
//!
//! # Examples
//!
//! ```
//! # extern crate quill_path;
//! # fn main() {
//! use quill_path::{FillId, FillStyles, Path};
//! use quill_path::math::point;
//!
//! let mut builder = Path::builder();
//! // Counter-clockwise in a y-up frame: the interior is on the left.
//! builder.set_fills(FillStyles::new(FillId(1), FillId::NONE));
//! builder.begin(point(0.0, 0.0));
//! builder.line_to(point(0.0, 2.0));
//! builder.quadratic_bezier_to(point(-1.0, 3.0), point(-2.0, 2.0));
//! builder.line_to(point(-2.0, 0.0));
//! builder.close();
//!
//! let path = builder.build();
//!
//! for segment in path.segments() {
//!     println!("{:?}", segment);
//! }
//! # }
//! ```
//!

pub use quill_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod path;

#[doc(inline)]
pub use crate::path::{Builder, Path, PathSegment, SegmentKind, SubPath};

use std::fmt;
use std::u32;

pub mod math {
    //! f32 version of the quill_geom types used everywhere. Most other quill crates
    //! reexport them.

    use crate::geom::euclid;

    /// Alias for ```euclid::default::Point2D<f32>```.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for ```euclid::default::Vector2D<f32>```.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }
}

/// Selects how the tessellator decides which side of a boundary is inside a
/// region.
///
/// This is not a winding number rule. With `FillStyles`, a region is bounded by
/// the segments that carry its id on the side facing it, and the slabs on
/// either side of the region are paired by their fill ids. With `EvenOdd`, only
/// the fact that a segment borders the region matters: the bordering slabs of
/// each interval are paired two by two from the left.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FillRule {
    EvenOdd,
    FillStyles,
}

impl Default for FillRule {
    fn default() -> Self {
        FillRule::FillStyles
    }
}

/// Identifies a fill region (a fill style of the shape).
///
/// `FillId::NONE` is the outside of every region.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct FillId(pub u32);

impl FillId {
    pub const NONE: Self = FillId(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self == FillId::NONE
    }
}

impl fmt::Debug for FillId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for FillId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the stroke style of a segment.
///
/// Carried through tessellation untouched.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct StrokeId(pub u32);

impl StrokeId {
    pub const NONE: Self = StrokeId(0);
    pub const INVALID: Self = StrokeId(u32::MAX);
}

impl fmt::Debug for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The fill regions on each side of a segment.
///
/// Sides are relative to the direction of the segment: for a segment going
/// towards positive y, `left` is the negative x side and `right` the positive
/// x side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct FillStyles {
    pub left: FillId,
    pub right: FillId,
}

impl FillStyles {
    pub const NONE: Self = FillStyles {
        left: FillId::NONE,
        right: FillId::NONE,
    };

    #[inline]
    pub const fn new(left: FillId, right: FillId) -> Self {
        FillStyles { left, right }
    }

    /// The fill styles as seen when walking the segment backwards.
    #[inline]
    pub fn swapped(self) -> Self {
        FillStyles {
            left: self.right,
            right: self.left,
        }
    }

    /// Returns whether `fill` is on either side.
    #[inline]
    pub fn borders(self, fill: FillId) -> bool {
        self.left == fill || self.right == fill
    }
}

#[test]
fn fill_styles() {
    let styles = FillStyles::new(FillId(1), FillId(2));
    assert_eq!(styles.swapped(), FillStyles::new(FillId(2), FillId(1)));
    assert_eq!(styles.swapped().swapped(), styles);
    assert!(styles.borders(FillId(2)));
    assert!(!styles.borders(FillId(3)));
    assert!(FillStyles::NONE.borders(FillId::NONE));
    assert!(FillId::default().is_none());
}
