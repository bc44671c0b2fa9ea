#![deny(bare_trait_objects)]

//! Optional utilities for quill: a text format for filled paths.

extern crate quill_path as path;

pub use path::geom::euclid;
pub use path::math;

pub mod parser;
