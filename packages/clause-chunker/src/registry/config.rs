//! Registry configuration for layout converter block trees.

use super::core::BlockRegistry;
use super::handlers::{
    CaptionHandler, PictureHandler, SectionHeaderHandler, TableHandler, TextHandler,
};
use crate::types::BlockType;

/// Create the registry for clause structure recovery.
///
/// Section headers drive clause resolution, text blocks feed the current
/// clause, and running page headers/footers are dropped with their subtree.
/// Every other block type is passed through to its children.
#[must_use]
pub fn create_default_registry() -> BlockRegistry {
    let mut registry = BlockRegistry::new();

    registry.register(BlockType::SectionHeader, SectionHeaderHandler);
    registry.register(BlockType::Text, TextHandler);

    registry.skip([BlockType::PageHeader, BlockType::PageFooter]);

    registry
}

/// Create the default registry plus table, figure and picture handlers.
///
/// These handlers fill the clause `tables`/`figures` lists, the document
/// statistics and the extracted image list.
#[must_use]
pub fn create_asset_registry() -> BlockRegistry {
    let mut registry = create_default_registry();

    registry.register(BlockType::Caption, CaptionHandler);
    registry.register(BlockType::Table, TableHandler);
    registry.register(BlockType::Figure, PictureHandler);
    registry.register(BlockType::Picture, PictureHandler);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_default_registry() {
        let registry = create_default_registry();

        assert!(registry.has_handler(BlockType::SectionHeader));
        assert!(registry.has_handler(BlockType::Text));
        assert!(!registry.has_handler(BlockType::Table));
        assert!(!registry.has_handler(BlockType::Picture));

        assert!(registry.should_skip(BlockType::PageHeader));
        assert!(registry.should_skip(BlockType::PageFooter));
        assert!(!registry.should_skip(BlockType::Other));
    }

    #[test]
    fn test_create_asset_registry() {
        let registry = create_asset_registry();

        assert!(registry.has_handler(BlockType::SectionHeader));
        assert!(registry.has_handler(BlockType::Caption));
        assert!(registry.has_handler(BlockType::Table));
        assert!(registry.has_handler(BlockType::Figure));
        assert!(registry.has_handler(BlockType::Picture));
        assert!(registry.should_skip(BlockType::PageFooter));
    }
}
