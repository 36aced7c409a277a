//! Clause hierarchy to flat, linked chunks.
//!
//! Each clause becomes one [`Chunk`] that stands on its own: it names its
//! parent and children by id only, so chunks can be stored and fetched
//! independently.

mod emitter;
mod schema;
mod sink;

pub use emitter::{emit_chunks, flatten, parent_id, Chunk};
pub use schema::{load_schema, SchemaStatus};
pub use sink::{ChunkSink, DirectorySink};
