//! Structure builder that walks a block tree using the handler registry.

use std::fs;
use std::path::Path;

use crate::config::{document_id_from_path, validate_document_id};
use crate::error::{ChunkerError, Result};
use crate::registry::{
    create_asset_registry, create_default_registry, BlockRegistry, BuildState, ExtractedAsset,
};
use crate::types::{Block, BlockTree, DocumentSchema};

/// Result of building one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBuild {
    pub schema: DocumentSchema,

    /// Decoded images, empty unless asset handlers are registered.
    pub assets: Vec<ExtractedAsset>,
}

/// Walks block trees and dispatches blocks to their registered handlers.
///
/// Skipped block types are dropped together with their subtree. Every other
/// block is handed to its handler, if any, and its children are visited
/// afterwards, so content nested below unknown block types is still found.
pub struct StructureBuilder {
    registry: BlockRegistry,
}

impl StructureBuilder {
    /// Create a builder with the given registry.
    #[must_use]
    pub fn new(registry: BlockRegistry) -> Self {
        Self { registry }
    }

    /// Create a builder that also collects tables, figures and images.
    #[must_use]
    pub fn with_assets() -> Self {
        Self::new(create_asset_registry())
    }

    /// Build the clause hierarchy for one document.
    ///
    /// A tree without a `children` array builds an empty document; use
    /// [`convert_file`](Self::convert_file) to reject such input.
    #[must_use]
    pub fn build(&self, document_id: &str, tree: &BlockTree) -> DocumentBuild {
        let mut state = BuildState::new(document_id);
        for block in tree.children.iter().flatten() {
            self.walk(block, &mut state);
        }

        tracing::debug!(
            document_id,
            clauses = state.clauses.len(),
            assets = state.assets.len(),
            "Built clause hierarchy"
        );

        DocumentBuild {
            schema: DocumentSchema {
                document_id: state.document_id,
                statistics: state.statistics,
                clauses: state.clauses.into_values().collect(),
            },
            assets: state.assets,
        }
    }

    /// Load a block tree file and build it.
    ///
    /// The document id is the file stem.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if its root has
    /// no `children` array, or if the file stem is not a usable document id.
    pub fn convert_file(&self, path: &Path) -> Result<DocumentBuild> {
        let document_id = document_id_from_path(path)
            .ok_or_else(|| ChunkerError::InvalidDocumentId(path.display().to_string()))?;
        validate_document_id(&document_id)?;

        let raw = fs::read_to_string(path).map_err(|source| ChunkerError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
        let tree: BlockTree =
            serde_json::from_str(&raw).map_err(|source| ChunkerError::ParseInput {
                path: path.to_path_buf(),
                source,
            })?;
        if tree.children.is_none() {
            return Err(ChunkerError::MissingChildren(path.to_path_buf()));
        }

        Ok(self.build(&document_id, &tree))
    }

    fn walk(&self, block: &Block, state: &mut BuildState) {
        let kind = block.kind();
        if self.registry.should_skip(kind) {
            tracing::trace!(block_type = kind.as_str(), "Dropping block subtree");
            return;
        }

        if let Some(handler) = self.registry.get_handler(kind) {
            handler.handle(block, state);
        }

        for child in &block.children {
            self.walk(child, state);
        }
    }
}

impl Default for StructureBuilder {
    fn default() -> Self {
        Self::new(create_default_registry())
    }
}
