use crate::math::Point;
use crate::FillId;

use std::fmt;
use thiserror::Error;

/// The fill tessellator's result type.
///
/// On success, contains the diagnostics of a best-effort tessellation.
pub type TessellationResult = Result<Vec<Diagnostic>, TessellationError>;

/// An error that can happen while generating geometry.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryBuilderError {
    #[error("Invalid vertex")]
    InvalidVertex,
    #[error("Too many vertices")]
    TooManyVertices,
}

#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedParameter {
    #[error("Epsilon is not a number")]
    EpsilonIsNaN,
    #[error("Epsilon is negative")]
    NegativeEpsilon,
    #[error("Flatness tolerance is not a number")]
    ToleranceIsNaN,
    #[error("Flatness tolerance is negative")]
    NegativeTolerance,
}

/// The fill tessellator's error enumeration.
///
/// Problems with the input geometry are not errors: they are either ignored
/// or reported as [`Diagnostic`]s.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum TessellationError {
    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(#[from] UnsupportedParameter),
    #[error("Geometry builder error: {0}")]
    GeometryBuilder(#[from] GeometryBuilderError),
}

/// The kind of a [`Diagnostic`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum DiagnosticKind {
    /// A curve was replaced by its chord for one interval, either because no
    /// root was found at a scan stop or because it still crossed the
    /// opposite boundary once the subdivision budget was spent.
    CurveApproximated,
    /// No segment of the path borders the requested fill.
    EmptyRegion,
}

/// A non-fatal problem found while tessellating.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub fill: FillId,
    /// Where the problem happened, if it has a location.
    pub position: Option<Point>,
}

impl Diagnostic {
    pub fn curve_approximated(fill: FillId, position: Point) -> Self {
        Diagnostic {
            kind: DiagnosticKind::CurveApproximated,
            fill,
            position: Some(position),
        }
    }

    pub fn empty_region(fill: FillId) -> Self {
        Diagnostic {
            kind: DiagnosticKind::EmptyRegion,
            fill,
            position: None,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::CurveApproximated => write!(f, "curve approximated by its chord"),
            DiagnosticKind::EmptyRegion => write!(f, "no segment borders the fill"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(p) => write!(f, "fill {}: {} at ({}, {})", self.fill, self.kind, p.x, p.y),
            None => write!(f, "fill {}: {}", self.fill, self.kind),
        }
    }
}

#[test]
fn error_messages() {
    let err: TessellationError = UnsupportedParameter::EpsilonIsNaN.into();
    assert_eq!(err.to_string(), "Unsupported parameter: Epsilon is not a number");

    let err: TessellationError = GeometryBuilderError::TooManyVertices.into();
    assert_eq!(err.to_string(), "Geometry builder error: Too many vertices");

    let d = Diagnostic::curve_approximated(FillId(3), Point::new(1.0, 2.5));
    assert_eq!(d.to_string(), "fill 3: curve approximated by its chord at (1, 2.5)");
    assert_eq!(
        Diagnostic::empty_region(FillId(7)).to_string(),
        "fill 7: no segment borders the fill"
    );
}
