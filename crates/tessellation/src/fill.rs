use crate::edge::EdgeList;
use crate::error::{Diagnostic, TessellationError, TessellationResult};
use crate::geometry_builder::TriangleBuilder;
use crate::path::Path;
use crate::sweep::SweepLine;
use crate::trapezoid::{TrapezoidTessellator, Triangle};
use crate::{FillId, FillOptions};

use std::mem;

/// The triangles of one fill region along with the problems met while
/// producing them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Tessellation {
    pub triangles: Vec<Triangle>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Tessellation {
    /// Whether the tessellation completed without any diagnostic.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The triangles if there was no diagnostic, the diagnostics otherwise.
    pub fn into_result(self) -> Result<Vec<Triangle>, Vec<Diagnostic>> {
        if self.diagnostics.is_empty() {
            Ok(self.triangles)
        } else {
            Err(self.diagnostics)
        }
    }

    /// The area covered by the triangles once rasterized.
    pub fn area(&self) -> f32 {
        self.triangles.iter().map(Triangle::coverage).sum()
    }
}

/// Tessellates the region of `path` bordered by `fill` with the default options.
///
/// Builds a temporary [`FillTessellator`]. Reuse a tessellator to avoid
/// reallocating its buffers across calls.
pub fn tessellate(path: &Path, fill: FillId) -> Tessellation {
    let mut tessellator = FillTessellator::new();
    let diagnostics = tessellator.run(path, fill, &FillOptions::DEFAULT);

    Tessellation {
        triangles: mem::take(&mut tessellator.triangles),
        diagnostics,
    }
}

/// A fill tessellator preserving quadratic bézier curves.
///
/// ## Overview
///
/// The tessellator takes a [`Path`](../quill_path/struct.Path.html), the id of
/// the fill region to tessellate and [`FillOptions`]. Each segment of the path
/// tells which fill regions are on its left and on its right, which is how the
/// tessellator knows where the region is. Segments that do not border the
/// region are still useful with the default `FillStyles` rule: they separate
/// other regions from it.
///
/// Degenerate input (zero-height edges, `NaN` or infinite coordinates) is
/// skipped. Problems that the tessellator works around are reported as
/// [`Diagnostic`]s next to the best-effort output.
///
/// The tessellator keeps its buffers between calls. It does not hold any other
/// state.
///
/// # Examples
///
/// ```
/// use quill_tessellation::{FillOptions, FillTessellator, TriangleKind};
/// use quill_tessellation::path::{FillId, FillStyles, Path};
/// use quill_tessellation::math::point;
///
/// // A unit square.
/// let mut builder = Path::builder();
/// builder.set_fills(FillStyles::new(FillId(1), FillId::NONE));
/// builder.begin(point(0.0, 0.0));
/// builder.line_to(point(1.0, 0.0));
/// builder.line_to(point(1.0, 1.0));
/// builder.line_to(point(0.0, 1.0));
/// builder.close();
/// let path = builder.build();
///
/// let mut tessellator = FillTessellator::new();
/// let result = tessellator
///     .tessellate(&path, FillId(1), &FillOptions::default())
///     .unwrap();
///
/// assert_eq!(result.triangles.len(), 2);
/// assert!(result.triangles.iter().all(|t| t.kind == TriangleKind::Fill));
/// assert!((result.area() - 1.0).abs() < 1e-5);
/// ```
pub struct FillTessellator {
    edges: EdgeList,
    sweep: SweepLine,
    trapezoids: TrapezoidTessellator,
    triangles: Vec<Triangle>,
    log: bool,
}

impl Default for FillTessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl FillTessellator {
    /// Constructor.
    pub fn new() -> Self {
        #[cfg(all(debug_assertions, feature = "std"))]
        let log = std::env::var("QUILL_FORCE_LOGGING").is_ok();
        #[cfg(not(all(debug_assertions, feature = "std")))]
        let log = false;

        let mut tessellator = FillTessellator {
            edges: EdgeList::new(),
            sweep: SweepLine::new(),
            trapezoids: TrapezoidTessellator::new(),
            triangles: Vec::new(),
            log: false,
        };
        tessellator.set_logging(log);

        tessellator
    }

    /// Enable/disable some verbose logging during the tessellation, for
    /// debugging purposes.
    pub fn set_logging(&mut self, is_enabled: bool) {
        self.log = is_enabled;
        self.sweep.log = is_enabled;
        self.trapezoids.log = is_enabled;
    }

    /// Tessellates the region `fill` of a path into a triangle builder.
    ///
    /// On success, returns the diagnostics of the tessellation.
    pub fn tessellate_path(
        &mut self,
        path: &Path,
        fill: FillId,
        options: &FillOptions,
        output: &mut dyn TriangleBuilder,
    ) -> TessellationResult {
        options.validate()?;

        let diagnostics = self.run(path, fill, options);

        output.begin_geometry();
        for triangle in &self.triangles {
            if let Err(e) = output.add_triangle(triangle) {
                tess_log!(self, "geometry builder error: {:?}", e);
                output.abort_geometry();
                return Err(e.into());
            }
        }
        output.end_geometry();

        Ok(diagnostics)
    }

    /// Tessellates the region `fill` of a path.
    pub fn tessellate(
        &mut self,
        path: &Path,
        fill: FillId,
        options: &FillOptions,
    ) -> Result<Tessellation, TessellationError> {
        options.validate()?;

        let diagnostics = self.run(path, fill, options);

        Ok(Tessellation {
            triangles: self.triangles.clone(),
            diagnostics,
        })
    }

    /// Tessellates every fill region of a path, in increasing id order.
    pub fn tessellate_all(
        &mut self,
        path: &Path,
        options: &FillOptions,
    ) -> Result<Vec<(FillId, Tessellation)>, TessellationError> {
        options.validate()?;

        let mut result = Vec::new();
        for fill in path.fill_ids() {
            let diagnostics = self.run(path, fill, options);
            result.push((
                fill,
                Tessellation {
                    triangles: self.triangles.clone(),
                    diagnostics,
                },
            ));
        }

        Ok(result)
    }

    /// Runs the pipeline with validated options, leaving the triangles in
    /// `self.triangles`.
    fn run(&mut self, path: &Path, fill: FillId, options: &FillOptions) -> Vec<Diagnostic> {
        self.triangles.clear();
        let mut diagnostics = Vec::new();

        tess_log!(self, "tessellating fill {} of {} segments", fill, path.num_segments());

        if !fill.is_none() {
            self.edges
                .build(path, fill, options.fill_rule, options.epsilon);
        }

        if fill.is_none() || !self.edges.borders_target() {
            diagnostics.push(Diagnostic::empty_region(fill));
        } else {
            self.sweep.begin(
                self.edges.edges(),
                self.edges.scan_set(),
                fill,
                options.epsilon,
            );

            while let Some(interval) = self.sweep.next_interval(&mut diagnostics) {
                self.trapezoids.tessellate_interval(
                    interval.slabs,
                    fill,
                    options,
                    &mut self.triangles,
                    &mut diagnostics,
                );
            }
        }

        for diagnostic in &diagnostics {
            log::warn!("{}", diagnostic);
        }

        tess_log!(self, "fill {}: {} triangles", fill, self.triangles.len());

        diagnostics
    }
}
