//! Handlers for captions, tables and images.
//!
//! Only registered by [`create_asset_registry`](crate::registry::create_asset_registry).
//! Image payloads are decoded here but written by the pipeline, so the walk
//! itself performs no I/O.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::config::safe_key;
use crate::extract::{detect_image_format, extract_figure_number, extract_table_number};
use crate::registry::handler::BlockHandler;
use crate::registry::types::{BuildState, ExtractedAsset};
use crate::types::{Block, FigureRef, TableRef};

/// Handler for `Caption` blocks.
///
/// Stores the caption until the next table or image consumes it.
pub struct CaptionHandler;

impl BlockHandler for CaptionHandler {
    fn handle(&self, block: &Block, state: &mut BuildState) {
        let text = block.plain_text();
        if !text.is_empty() {
            state.context.pending_caption = Some(text);
        }
    }
}

/// Handler for `Table` blocks.
pub struct TableHandler;

impl BlockHandler for TableHandler {
    fn handle(&self, block: &Block, state: &mut BuildState) {
        state.statistics.total_tables += 1;

        let caption = state.context.pending_caption.take();
        let number = caption
            .as_deref()
            .and_then(extract_table_number)
            .or_else(|| extract_table_number(&block.plain_text()));

        if let Some(clause) = state.current_clause_mut() {
            clause.tables.push(TableRef { number, caption });
        }
    }
}

/// Handler for `Figure` and `Picture` blocks.
///
/// Every embedded image is decoded, counted and attached to the current
/// clause; images outside any clause are counted as miscellaneous.
pub struct PictureHandler;

impl BlockHandler for PictureHandler {
    fn handle(&self, block: &Block, state: &mut BuildState) {
        let caption = state.context.pending_caption.take();
        let number = caption.as_deref().and_then(extract_figure_number);

        for (name, payload) in &block.images {
            let data = match decode_image(payload) {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!(
                        document_id = %state.document_id,
                        image = %name,
                        error = %err,
                        "Undecodable image payload, skipping"
                    );
                    continue;
                }
            };
            let extension = detect_image_format(&data);
            state.statistics.total_images += 1;

            let clause_id = state.context.current_clause_id.clone();
            let asset = match state.current_clause_mut() {
                Some(clause) => {
                    let file_name = format!(
                        "{}_img{}{extension}",
                        safe_key(&clause.id),
                        clause.figures.len() + 1
                    );
                    clause.figures.push(FigureRef {
                        number: number.clone(),
                        caption: caption.clone(),
                        file: Some(file_name.clone()),
                    });
                    state.statistics.clause_images += 1;
                    ExtractedAsset {
                        clause_id,
                        file_name,
                        data,
                    }
                }
                None => {
                    state.statistics.misc_images += 1;
                    ExtractedAsset {
                        clause_id: None,
                        file_name: format!("img{}{extension}", state.statistics.misc_images),
                        data,
                    }
                }
            };
            state.assets.push(asset);
        }
    }
}

/// Decode a base64 payload, accepting an optional `data:` URI prefix.
fn decode_image(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let encoded = match payload.strip_prefix("data:") {
        Some(uri) => uri.split_once(',').map_or(uri, |(_, data)| data),
        None => payload,
    };
    STANDARD.decode(encoded.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_B64: &str = "iVBORw0KGgo=";
    const JPEG_B64: &str = "/9j/4AAQ";

    fn state_in_clause(id: &str) -> BuildState {
        let mut state = BuildState::new("doc");
        state.open_clause(id, Some("Title".to_string()));
        state
    }

    #[test]
    fn test_decode_image_variants() {
        assert_eq!(
            decode_image(PNG_B64).unwrap(),
            b"\x89PNG\r\n\x1a\n".to_vec()
        );
        assert_eq!(
            decode_image("data:image/png;base64,iVBORw0KGgo=").unwrap(),
            b"\x89PNG\r\n\x1a\n".to_vec()
        );
        assert!(decode_image("not base64!").is_err());
    }

    #[test]
    fn test_caption_is_stored() {
        let mut state = BuildState::new("doc");
        CaptionHandler.handle(&Block::new("Caption", "<p>Table 3 - Ratings</p>"), &mut state);
        assert_eq!(
            state.context.pending_caption.as_deref(),
            Some("Table 3 - Ratings")
        );
    }

    #[test]
    fn test_table_uses_pending_caption() {
        let mut state = state_in_clause("5.1");
        CaptionHandler.handle(&Block::new("Caption", "Table 3 - Ratings"), &mut state);
        TableHandler.handle(&Block::new("Table", "<table><tr><td>x</td></tr></table>"), &mut state);

        assert_eq!(state.statistics.total_tables, 1);
        assert!(state.context.pending_caption.is_none());
        assert_eq!(
            state.clauses["5.1"].tables,
            vec![TableRef {
                number: Some("3".to_string()),
                caption: Some("Table 3 - Ratings".to_string()),
            }]
        );
    }

    #[test]
    fn test_table_outside_clause_is_only_counted() {
        let mut state = BuildState::new("doc");
        TableHandler.handle(&Block::new("Table", "<table/>"), &mut state);

        assert_eq!(state.statistics.total_tables, 1);
        assert!(state.clauses.is_empty());
    }

    #[test]
    fn test_table_number_from_own_text() {
        let mut state = state_in_clause("2");
        TableHandler.handle(&Block::new("Table", "<th>Table 7 Values</th>"), &mut state);
        assert_eq!(state.clauses["2"].tables[0].number.as_deref(), Some("7"));
    }

    #[test]
    fn test_picture_in_clause() {
        let mut state = state_in_clause("A/1");
        CaptionHandler.handle(&Block::new("Caption", "Figure 2 Layout"), &mut state);
        let picture = Block::new("Picture", "")
            .with_image("/page/1/Picture/0", PNG_B64)
            .with_image("/page/1/Picture/1", JPEG_B64);
        PictureHandler.handle(&picture, &mut state);

        assert_eq!(state.statistics.total_images, 2);
        assert_eq!(state.statistics.clause_images, 2);
        assert_eq!(state.statistics.misc_images, 0);

        let figures = &state.clauses["A/1"].figures;
        assert_eq!(figures.len(), 2);
        assert_eq!(figures[0].number.as_deref(), Some("2"));
        assert_eq!(figures[0].file.as_deref(), Some("A_1_img1.png"));
        assert_eq!(figures[1].file.as_deref(), Some("A_1_img2.jpg"));

        assert_eq!(state.assets.len(), 2);
        assert_eq!(state.assets[0].clause_id.as_deref(), Some("A/1"));
    }

    #[test]
    fn test_picture_outside_clause_is_misc() {
        let mut state = BuildState::new("doc");
        let picture = Block::new("Figure", "").with_image("logo", PNG_B64);
        PictureHandler.handle(&picture, &mut state);

        assert_eq!(state.statistics.total_images, 1);
        assert_eq!(state.statistics.misc_images, 1);
        assert_eq!(state.assets[0].file_name, "img1.png");
        assert!(state.assets[0].clause_id.is_none());
    }

    #[test]
    fn test_undecodable_image_is_skipped() {
        let mut state = state_in_clause("1");
        let picture = Block::new("Picture", "").with_image("bad", "%%%");
        PictureHandler.handle(&picture, &mut state);

        assert_eq!(state.statistics.total_images, 0);
        assert!(state.assets.is_empty());
        assert!(state.clauses["1"].figures.is_empty());
    }
}
