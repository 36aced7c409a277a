//! Block handler registry for extensible structure recovery.
//!
//! Handlers are registered per block type, so new converter block types can
//! be supported without touching the tree walk. Types without a handler are
//! ignored; their children are still visited.

mod config;
mod core;
mod handler;
pub mod handlers;
mod types;

pub use config::{create_asset_registry, create_default_registry};
pub use core::BlockRegistry;
pub use handler::BlockHandler;
pub use types::{BuildState, ExtractedAsset, ParsingContext};
