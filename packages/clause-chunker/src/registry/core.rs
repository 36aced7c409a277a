//! Block registry for mapping block types to handlers.

use std::collections::{HashMap, HashSet};

use super::handler::BlockHandler;
use crate::types::BlockType;

/// Registry mapping block types to handlers.
///
/// Skipped types are dropped together with their whole subtree.
pub struct BlockRegistry {
    handlers: HashMap<BlockType, Box<dyn BlockHandler>>,
    skip_types: HashSet<BlockType>,
}

impl BlockRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            skip_types: HashSet::new(),
        }
    }

    /// Register a handler for a block type, replacing any previous one.
    pub fn register(&mut self, block_type: BlockType, handler: impl BlockHandler + 'static) {
        self.handlers.insert(block_type, Box::new(handler));
    }

    /// Mark block types to be dropped without visiting their children.
    pub fn skip(&mut self, block_types: impl IntoIterator<Item = BlockType>) {
        self.skip_types.extend(block_types);
    }

    /// Get the handler for a block type.
    ///
    /// Returns `None` for skipped and unregistered types.
    #[must_use]
    pub fn get_handler(&self, block_type: BlockType) -> Option<&dyn BlockHandler> {
        if self.skip_types.contains(&block_type) {
            return None;
        }
        self.handlers.get(&block_type).map(|h| h.as_ref())
    }

    /// Check if a block type should be skipped.
    #[must_use]
    pub fn should_skip(&self, block_type: BlockType) -> bool {
        self.skip_types.contains(&block_type)
    }

    /// Check if a handler is registered for a block type.
    #[must_use]
    pub fn has_handler(&self, block_type: BlockType) -> bool {
        self.handlers.contains_key(&block_type)
    }

    /// Return set of all registered block types.
    #[must_use]
    pub fn registered_types(&self) -> HashSet<BlockType> {
        self.handlers.keys().copied().collect()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
