use crate::commands::{FillSelection, TessellateCmd};
use quill::path::FillId;
use quill::tessellation::{
    FillTessellator, Tessellation, TessellationError, Triangle, TriangleKind,
};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TessError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Tessellation(#[from] TessellationError),
}

pub fn tessellate(mut cmd: TessellateCmd) -> Result<(), TessError> {
    let mut tessellator = FillTessellator::new();

    let results = match cmd.fills {
        FillSelection::One(fill) => {
            vec![(fill, tessellator.tessellate(&cmd.path, fill, &cmd.options)?)]
        }
        FillSelection::All => tessellator.tessellate_all(&cmd.path, &cmd.options)?,
    };

    for (fill, tessellation) in &results {
        log::info!(
            "fill {}: {} triangles, {} diagnostics",
            fill,
            tessellation.triangles.len(),
            tessellation.diagnostics.len()
        );
    }

    write_output(&results, cmd.count, &mut *cmd.output)?;

    Ok(())
}

pub fn write_output(
    results: &[(FillId, Tessellation)],
    count: bool,
    output: &mut dyn io::Write,
) -> Result<(), io::Error> {
    if count {
        let num = |kind: TriangleKind| {
            results
                .iter()
                .flat_map(|(_, t)| t.triangles.iter())
                .filter(|t| t.kind == kind)
                .count()
        };
        let diagnostics: usize = results.iter().map(|(_, t)| t.diagnostics.len()).sum();

        writeln!(output, "fills: {}", results.len())?;
        writeln!(output, "fill triangles: {}", num(TriangleKind::Fill))?;
        writeln!(output, "inner curve triangles: {}", num(TriangleKind::CurveInner))?;
        writeln!(output, "outer curve triangles: {}", num(TriangleKind::CurveOuter))?;
        writeln!(output, "diagnostics: {}", diagnostics)?;

        return Ok(());
    }

    for (_, tessellation) in results {
        for triangle in &tessellation.triangles {
            writeln!(output, "{}", format_triangle(triangle))?;
        }
    }

    Ok(())
}

fn kind_name(kind: TriangleKind) -> &'static str {
    match kind {
        TriangleKind::Fill => "fill",
        TriangleKind::CurveInner => "inner",
        TriangleKind::CurveOuter => "outer",
    }
}

pub fn format_triangle(triangle: &Triangle) -> String {
    let [a, b, c] = triangle.vertices;
    format!(
        "{} {} ({}, {}) ({}, {}) ({}, {})",
        kind_name(triangle.kind),
        triangle.fill,
        a.x,
        a.y,
        b.x,
        b.y,
        c.x,
        c.y
    )
}

#[cfg(test)]
use quill::extra::parser::parse_path;
#[cfg(test)]
use quill::tessellation::tessellate as tessellate_fill;

#[test]
fn triangle_lines() {
    let path = parse_path("F 1 0 M 0 0 L 2 0 L 2 1 L 0 1 Z").unwrap();
    let results = vec![(FillId(1), tessellate_fill(&path, FillId(1)))];

    let mut output = Vec::new();
    write_output(&results, false, &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.starts_with("fill 1 (")));
    assert_eq!(lines[0], "fill 1 (0, 0) (2, 0) (0, 1)");
}

#[test]
fn counts() {
    let path = parse_path("F 1 0 M 0 0 Q 1 1 0 2 Q -1 1 0 0 Z").unwrap();
    let results = vec![(FillId(1), tessellate_fill(&path, FillId(1)))];

    let mut output = Vec::new();
    write_output(&results, true, &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();

    assert_eq!(
        text,
        "fills: 1\n\
         fill triangles: 2\n\
         inner curve triangles: 0\n\
         outer curve triangles: 2\n\
         diagnostics: 0\n"
    );
}
