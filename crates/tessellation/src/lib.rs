#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]

//! Curve-preserving fill tessellation.
//!
//! This crate is reexported in [quill](../quill/index.html).
//!
//! ## Overview
//!
//! The [`FillTessellator`](struct.FillTessellator.html) turns the region of a
//! [`Path`](../quill_path/struct.Path.html) that carries a given [`FillId`] into
//! a list of triangles. Quadratic bézier boundaries are never flattened: each
//! curved boundary of the output produces one triangle made of the curve's end
//! points and control point, meant to be rendered with the implicit test of
//! Loop and Blinn.
//!
//! ## The tessellation pipeline
//!
//! 1. Curved segments are split where their y coordinate changes direction, so
//!    that every edge is monotonic in y (see [`split_y_monotonic`]).
//! 2. Edges are oriented from top (smallest y) to bottom, and their end point
//!    y coordinates form the stops of the sweep (see [`EdgeList`] and [`ScanSet`]).
//! 3. A horizontal sweep line visits the stops in increasing order. Between two
//!    consecutive stops, every edge crossing the interval is cut into a
//!    [`Slab`] (see [`SweepLine`]). Curves are cut at the exact parameter where
//!    they cross the stop, using de Casteljau subdivision.
//! 4. The slabs of an interval are sorted from left to right and adjacent
//!    slabs bounding the target region are turned into triangles (see
//!    [`TrapezoidTessellator`]).
//!
//! ## Triangle kinds
//!
//! Each produced [`Triangle`] has a [`TriangleKind`]:
//!
//! * `Fill`: solid coverage.
//! * `CurveInner`: a curve triangle `(from, ctrl, to)` that adds the region
//!   between the curve and its control point.
//! * `CurveOuter`: a curve triangle that removes the region between the curve
//!   and its control point from the solid triangles that cover it.
//!
//! With the canonical coordinates `(0, 0)`, `(1/2, 0)` and `(1, 1)` assigned to
//! `from`, `ctrl` and `to`, the region between the curve and its control point
//! is where `u² - v > 0`. It covers a third of the triangle, so the area of the
//! filled region is the sum of the `Fill` triangle areas, plus a third of the
//! `CurveInner` triangle areas, minus a third of the `CurveOuter` triangle areas.
//!
//! ## Output
//!
//! The [`geometry_builder`](geometry_builder/index.html) module provides the
//! [`TriangleBuilder`](geometry_builder/trait.TriangleBuilder.html) trait as well as
//! vertex and index buffers with per-vertex Loop-Blinn coordinates.
//!
//! ## Examples
//!
//! ```
//! use quill_tessellation::{tessellate, TriangleKind};
//! use quill_tessellation::path::{FillId, FillStyles, Path};
//! use quill_tessellation::math::point;
//!
//! // A lens made of two curves.
//! let mut builder = Path::builder();
//! builder.set_fills(FillStyles::new(FillId(1), FillId::NONE));
//! builder.begin(point(0.0, 0.0));
//! builder.quadratic_bezier_to(point(1.0, 1.0), point(0.0, 2.0));
//! builder.quadratic_bezier_to(point(-1.0, 1.0), point(0.0, 0.0));
//! builder.close();
//! let path = builder.build();
//!
//! let result = tessellate(&path, FillId(1));
//! assert!(result.diagnostics.is_empty());
//!
//! let curves = result
//!     .triangles
//!     .iter()
//!     .filter(|t| t.kind == TriangleKind::CurveOuter)
//!     .count();
//! assert_eq!(curves, 2);
//! ```

pub use quill_path as path;

#[cfg(test)]
use quill_extra as extra;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

#[cfg(debug_assertions)]
macro_rules! tess_log {
    ($obj:ident, $fmt:expr) => (
        if $obj.log {
            log::debug!($fmt);
        }
    );
    ($obj:ident, $fmt:expr, $($arg:tt)*) => (
        if $obj.log {
            log::debug!($fmt, $($arg)*);
        }
    );
}

#[cfg(not(debug_assertions))]
macro_rules! tess_log {
    ($obj:ident, $fmt:expr) => {};
    ($obj:ident, $fmt:expr, $($arg:tt)*) => {};
}

mod edge;
mod error;
mod fill;
pub mod geometry_builder;
mod sweep;
mod trapezoid;

#[cfg(test)]
mod fill_tests;

pub use crate::path::math;

pub use crate::path::geom;

#[doc(inline)]
pub use crate::edge::*;

#[doc(inline)]
pub use crate::sweep::*;

#[doc(inline)]
pub use crate::trapezoid::*;

#[doc(inline)]
pub use crate::fill::*;

#[doc(inline)]
pub use crate::geometry_builder::{
    BuffersBuilder, CurveVertex, NoOutput, Positions, TriangleBuilder, VertexBuffers,
    VertexConstructor,
};

#[doc(inline)]
pub use crate::error::*;

pub use crate::path::{FillId, FillRule, FillStyles, StrokeId};

use core::ops::{Add, Sub};

/// Parameters for the fill tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct FillOptions {
    /// How the inside of the region is determined.
    ///
    /// With `FillStyles`, adjacent slabs are paired according to the fill ids on
    /// their sides. With `EvenOdd`, only the slabs that border the region are
    /// kept and they are paired two by two from left to right.
    ///
    /// Default value: `FillStyles`.
    pub fill_rule: FillRule,

    /// Distance under which two positions are considered equal.
    ///
    /// Used to merge scan stops, discard zero-height edges and snap the
    /// sweep line to edge end points.
    ///
    /// Default value: `FillOptions::DEFAULT_EPSILON`.
    pub epsilon: f32,

    /// Maximum distance between a control point and its chord under which a
    /// curve is treated as a straight line.
    ///
    /// Default value: `FillOptions::DEFAULT_FLATNESS_TOLERANCE`.
    pub flatness_tolerance: f32,

    /// How many times a pair of slabs can be split in half when their curved
    /// boundaries cross each other. Inward curves that still cross after the
    /// last split are replaced by their chords.
    ///
    /// Default value: `FillOptions::DEFAULT_MAX_SUBDIVISIONS`.
    pub max_subdivisions: u32,
}

impl FillOptions {
    pub const DEFAULT_FILL_RULE: FillRule = FillRule::FillStyles;
    pub const DEFAULT_EPSILON: f32 = 1e-4;
    pub const DEFAULT_FLATNESS_TOLERANCE: f32 = 0.1;
    pub const DEFAULT_MAX_SUBDIVISIONS: u32 = 2;

    pub const DEFAULT: Self = FillOptions {
        fill_rule: Self::DEFAULT_FILL_RULE,
        epsilon: Self::DEFAULT_EPSILON,
        flatness_tolerance: Self::DEFAULT_FLATNESS_TOLERANCE,
        max_subdivisions: Self::DEFAULT_MAX_SUBDIVISIONS,
    };

    #[inline]
    pub fn fill_styles() -> Self {
        Self::DEFAULT
    }

    #[inline]
    pub fn even_odd() -> Self {
        Self::DEFAULT.with_fill_rule(FillRule::EvenOdd)
    }

    #[inline]
    pub fn tolerance(tolerance: f32) -> Self {
        Self::DEFAULT.with_flatness_tolerance(tolerance)
    }

    #[inline]
    pub const fn with_fill_rule(mut self, rule: FillRule) -> Self {
        self.fill_rule = rule;
        self
    }

    #[inline]
    pub const fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[inline]
    pub const fn with_flatness_tolerance(mut self, tolerance: f32) -> Self {
        self.flatness_tolerance = tolerance;
        self
    }

    #[inline]
    pub const fn with_max_subdivisions(mut self, max: u32) -> Self {
        self.max_subdivisions = max;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), UnsupportedParameter> {
        if self.epsilon.is_nan() {
            return Err(UnsupportedParameter::EpsilonIsNaN);
        }
        if self.epsilon < 0.0 {
            return Err(UnsupportedParameter::NegativeEpsilon);
        }
        if self.flatness_tolerance.is_nan() {
            return Err(UnsupportedParameter::ToleranceIsNaN);
        }
        if self.flatness_tolerance < 0.0 {
            return Err(UnsupportedParameter::NegativeTolerance);
        }

        Ok(())
    }
}

impl Default for FillOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

type Index = u32;

/// A vertex offset in a geometry.
///
/// The `VertexId`s are only valid between `TriangleBuilder::begin_geometry` and
/// `TriangleBuilder::end_geometry`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexId(pub Index);

impl VertexId {
    pub const INVALID: VertexId = VertexId(u32::MAX);

    pub fn offset(self) -> Index {
        self.0
    }

    pub fn from_usize(v: usize) -> Self {
        VertexId(v as Index)
    }
}

impl Add<u32> for VertexId {
    type Output = Self;
    fn add(self, rhs: u32) -> Self {
        VertexId(self.0 + rhs)
    }
}

impl Sub<u32> for VertexId {
    type Output = Self;
    fn sub(self, rhs: u32) -> Self {
        VertexId(self.0 - rhs)
    }
}

impl From<VertexId> for u8 {
    fn from(v: VertexId) -> Self {
        v.0 as u8
    }
}
impl From<VertexId> for u16 {
    fn from(v: VertexId) -> Self {
        v.0 as u16
    }
}
impl From<VertexId> for u32 {
    fn from(v: VertexId) -> Self {
        v.0
    }
}
impl From<VertexId> for usize {
    fn from(v: VertexId) -> Self {
        v.0 as usize
    }
}

#[test]
fn test_default_options() {
    let options = FillOptions::default();

    assert_eq!(options.fill_rule, FillRule::FillStyles);
    assert_eq!(options.flatness_tolerance, 0.1);
    assert_eq!(options.max_subdivisions, 2);
    assert!(options.validate().is_ok());
    assert_eq!(FillOptions::even_odd().fill_rule, FillRule::EvenOdd);
}

#[test]
fn test_invalid_options() {
    assert_eq!(
        FillOptions::default().with_epsilon(f32::NAN).validate(),
        Err(UnsupportedParameter::EpsilonIsNaN)
    );
    assert_eq!(
        FillOptions::default().with_epsilon(-1.0).validate(),
        Err(UnsupportedParameter::NegativeEpsilon)
    );
    assert_eq!(
        FillOptions::tolerance(f32::NAN).validate(),
        Err(UnsupportedParameter::ToleranceIsNaN)
    );
    assert_eq!(
        FillOptions::tolerance(-0.5).validate(),
        Err(UnsupportedParameter::NegativeTolerance)
    );
}
