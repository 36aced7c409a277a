//! Block handler trait definition.

use super::types::BuildState;
use crate::types::Block;

/// Trait for block handlers.
///
/// A handler reacts to one block type by updating the parsing context and
/// the clause mapping. It never recurses: the structure builder visits
/// children after the handler returns.
pub trait BlockHandler: Send + Sync {
    /// Process one block.
    fn handle(&self, block: &Block, state: &mut BuildState);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingHandler;

    impl BlockHandler for CountingHandler {
        fn handle(&self, _block: &Block, state: &mut BuildState) {
            state.statistics.total_tables += 1;
        }
    }

    #[test]
    fn test_handler_trait() {
        let handler = CountingHandler;
        let mut state = BuildState::new("doc");

        handler.handle(&Block::new("Table", "<table/>"), &mut state);
        handler.handle(&Block::new("Table", "<table/>"), &mut state);

        assert_eq!(state.statistics.total_tables, 2);
    }
}
