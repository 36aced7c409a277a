//! Block tree to clause hierarchy.

mod builder;

pub use builder::{DocumentBuild, StructureBuilder};
