#![deny(bare_trait_objects)]

//! Tessellation of 2D fill regions that keeps quadratic bézier curves intact.
//!
//! # Crates
//!
//! This meta-crate (`quill`) reexports the following sub-crates for convenience:
//!
//! * **quill_tessellation** - The fill tessellator.
//! * **quill_path** - The path data model, where each segment knows the fill
//!   regions on both of its sides.
//! * **quill_geom** - Line segments, quadratic bézier curves and triangles.
//! * **quill_extra** - A textual path format, mostly for tests and the command line.
//!
//! Each `quill_<name>` crate is reexported as a `<name>` module in `quill`.
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! `quill_extra` is disabled by default. It can be added with the `extra` feature flag.
//!
//! # Example
//!
//! ```
//! use quill::math::{point, Point};
//! use quill::path::{FillId, FillStyles, Path};
//! use quill::tessellation::*;
//!
//! // A quarter disc.
//! let mut builder = Path::builder();
//! builder.set_fills(FillStyles::new(FillId(1), FillId::NONE));
//! builder.begin(point(0.0, 0.0));
//! builder.line_to(point(1.0, 0.0));
//! builder.quadratic_bezier_to(point(1.0, 1.0), point(0.0, 1.0));
//! builder.close();
//! let path = builder.build();
//!
//! let mut geometry: VertexBuffers<Point, u16> = VertexBuffers::new();
//! let mut tessellator = FillTessellator::new();
//! let diagnostics = tessellator.tessellate_path(
//!     &path,
//!     FillId(1),
//!     &FillOptions::default(),
//!     &mut geometry_builder::simple_builder(&mut geometry),
//! ).unwrap();
//!
//! assert!(diagnostics.is_empty());
//! // The tessellated geometry is ready to be uploaded to the GPU.
//! println!(" -- {} vertices {} indices",
//!     geometry.vertices.len(),
//!     geometry.indices.len()
//! );
//! ```
//!
//! # Rendering
//!
//! `Fill` triangles are rendered as solid geometry. For curve triangles, the
//! fragment shader evaluates `u² - v` with the interpolated coordinates
//! provided in `geometry_builder::CurveVertex`: `CurveInner` triangles cover the
//! fragments where it is positive, `CurveOuter` triangles remove them.

pub extern crate quill_tessellation;
#[cfg(feature = "extra")]
pub extern crate quill_extra;

#[cfg(feature = "extra")]
pub use quill_extra as extra;
pub use quill_tessellation as tessellation;
pub use tessellation::geom;
pub use tessellation::path;

pub use path::math;
