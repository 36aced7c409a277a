//! Handlers that drive clause resolution and content attachment.
//!
//! Converted layouts often split "4.3" and "General requirements" into two
//! consecutive header blocks; the section header handler joins them through
//! the pending clause number on the parsing context.

use crate::extract::{extract_requirement, parse_clause_heading, ClauseHeading};
use crate::registry::handler::BlockHandler;
use crate::registry::types::BuildState;
use crate::types::{Block, ContentItem};

/// Handler for `SectionHeader` blocks.
///
/// - "4.2 Scope" opens clause 4.2 titled "Scope".
/// - "4.3" is remembered as the pending number.
/// - Any other text, even an empty one, becomes the title of the pending
///   number, if there is one.
/// - Otherwise the header is dropped.
pub struct SectionHeaderHandler;

impl BlockHandler for SectionHeaderHandler {
    fn handle(&self, block: &Block, state: &mut BuildState) {
        let text = block.plain_text();
        if text.is_empty() && state.context.pending_clause_number.is_none() {
            return;
        }

        match parse_clause_heading(&text) {
            Some(ClauseHeading::Titled { id, title }) => {
                state.open_clause(&id, Some(title));
            }
            Some(ClauseHeading::NumberOnly { id }) => {
                state.context.defer_number(id);
            }
            None => {
                if let Some(id) = state.context.take_pending_number() {
                    state.open_clause(&id, Some(text));
                } else {
                    tracing::debug!(
                        document_id = %state.document_id,
                        header = %text,
                        "Section header without clause number, dropping"
                    );
                }
            }
        }
    }
}

/// Handler for `Text` blocks.
///
/// Appends the paragraph to the current clause and records its requirement,
/// if any. Text before the first clause has nowhere to go and is dropped.
pub struct TextHandler;

impl BlockHandler for TextHandler {
    fn handle(&self, block: &Block, state: &mut BuildState) {
        let text = block.plain_text();
        if text.is_empty() {
            return;
        }

        let Some(clause) = state.current_clause_mut() else {
            return;
        };

        let requirement = extract_requirement(&text);
        if let Some(req) = &requirement {
            tracing::trace!(
                clause_id = %clause.id,
                kind = req.kind.as_str(),
                keyword = %req.keyword,
                "Requirement extracted"
            );
        }
        clause.content.push(ContentItem::paragraph(text));
        clause.requirements.extend(requirement);
    }
}
