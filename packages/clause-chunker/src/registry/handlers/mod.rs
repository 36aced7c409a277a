//! Handler implementations for converter block types.

mod assets;
mod structural;

pub use assets::{CaptionHandler, PictureHandler, TableHandler};
pub use structural::{SectionHeaderHandler, TextHandler};
