use std::path::PathBuf;

use super::emitter::Chunk;
use crate::config::safe_key;
use crate::error::Result;
use crate::writer::write_json;

/// Destination for emitted chunks.
pub trait ChunkSink {
    /// Store one chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the chunk cannot be stored.
    fn accept(&mut self, chunk: Chunk) -> Result<()>;
}

impl ChunkSink for Vec<Chunk> {
    fn accept(&mut self, chunk: Chunk) -> Result<()> {
        self.push(chunk);
        Ok(())
    }
}

/// Writes each chunk to `<root>/<document_id>/<safe clause id>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    written: usize,
}

impl DirectorySink {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: 0,
        }
    }

    /// File a chunk is stored at.
    #[must_use]
    pub fn chunk_path(&self, chunk: &Chunk) -> PathBuf {
        self.root
            .join(&chunk.document_id)
            .join(format!("{}.json", safe_key(&chunk.chunk_id)))
    }

    /// Number of chunk files written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ChunkSink for DirectorySink {
    fn accept(&mut self, chunk: Chunk) -> Result<()> {
        let path = self.chunk_path(&chunk);
        write_json(&path, &chunk)?;
        self.written += 1;
        tracing::trace!(path = %path.display(), "Wrote chunk");
        Ok(())
    }
}
