use quill::path::{FillId, Path};
use quill::tessellation::FillOptions;
use std::io;

/// Which fill regions to tessellate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FillSelection {
    One(FillId),
    All,
}

pub struct TessellateCmd {
    pub path: Path,
    pub fills: FillSelection,
    pub options: FillOptions,
    pub count: bool,
    pub output: Box<dyn io::Write>,
}
