//! Clause Chunker - Recover clause structure from layout converter output.
//!
//! This crate reads the block trees produced by a PDF layout converter,
//! rebuilds the numbered clause hierarchy of the document, and writes every
//! clause as a standalone JSON chunk linked to its parent and children.
//!
//! # Example
//!
//! ```
//! use clause_chunker::chunk::flatten;
//! use clause_chunker::structure::StructureBuilder;
//! use clause_chunker::types::{Block, BlockTree};
//!
//! let tree = BlockTree::new(vec![
//!     Block::new("SectionHeader", "<h2>4.3</h2>"),
//!     Block::new("SectionHeader", "<h2>General requirements</h2>"),
//!     Block::new("Text", "<p>Enclosures shall be earthed.</p>"),
//! ]);
//!
//! let build = StructureBuilder::default().build("en-60204", &tree);
//! let chunks = flatten("en-60204", &build.schema.clauses);
//!
//! assert_eq!(chunks[0].chunk_id, "4.3");
//! assert_eq!(chunks[0].parent_id.as_deref(), Some("4"));
//! assert_eq!(chunks[0].requirements[0].keyword, "shall");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Directory layout, environment configuration and key helpers
//! - [`types`]: Block input model and clause output model
//! - [`error`]: Error types and Result alias
//! - [`extract`]: Pattern extractors (clause headings, requirements, captions)
//! - [`registry`]: Extensible block handler system
//! - [`structure`]: Block tree to clause hierarchy
//! - [`chunk`]: Clause hierarchy to linked chunks
//! - [`collect`]: Input discovery
//! - [`writer`]: Atomic file output
//! - [`pipeline`]: Stage orchestration with per-document reports
//! - [`cli`]: Command-line interface

pub mod chunk;
pub mod cli;
pub mod collect;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod registry;
pub mod structure;
pub mod types;
pub mod writer;

// Re-export commonly used items
pub use chunk::{emit_chunks, flatten, parent_id, Chunk, ChunkSink, DirectorySink};
pub use config::{safe_key, PipelineConfig};
pub use error::{ChunkerError, Result};
pub use structure::{DocumentBuild, StructureBuilder};
pub use types::{Block, BlockTree, Clause, DocumentSchema};
