//! State carried through one document's tree walk.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::config::MISC_ASSET_DIR;
use crate::types::{Clause, DocumentStatistics};

/// Clause resolution state for one document.
///
/// Holds the clause currently receiving content and a clause number seen
/// without a title, waiting for the next header to supply one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsingContext {
    /// Clause that paragraphs are appended to.
    pub current_clause_id: Option<String>,

    /// Clause number from a number-only header.
    pub pending_clause_number: Option<String>,

    /// Caption text waiting for the table or figure it describes.
    pub pending_caption: Option<String>,
}

impl ParsingContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `clause_id` current and drop all pending state.
    pub fn enter_clause(&mut self, clause_id: impl Into<String>) {
        self.current_clause_id = Some(clause_id.into());
        self.pending_clause_number = None;
        self.pending_caption = None;
    }

    /// Remember a clause number until a title arrives.
    pub fn defer_number(&mut self, clause_id: impl Into<String>) {
        self.pending_clause_number = Some(clause_id.into());
    }

    /// Take the pending clause number, if any.
    pub fn take_pending_number(&mut self) -> Option<String> {
        self.pending_clause_number.take()
    }
}

/// Decoded image produced by the walk, written out by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtractedAsset {
    /// Clause the image belongs to, `None` for images outside any clause.
    pub clause_id: Option<String>,

    /// File name including the sniffed extension.
    pub file_name: String,

    pub data: Vec<u8>,
}

impl ExtractedAsset {
    /// Path relative to the document's asset directory.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        match self.clause_id {
            Some(_) => PathBuf::from(&self.file_name),
            None => PathBuf::from(MISC_ASSET_DIR).join(&self.file_name),
        }
    }
}

impl fmt::Debug for ExtractedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractedAsset")
            .field("clause_id", &self.clause_id)
            .field("file_name", &self.file_name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Everything a handler may read or update while a document is walked.
#[derive(Debug)]
pub struct BuildState {
    pub document_id: String,

    pub context: ParsingContext,

    /// Clauses keyed by id, in first-seen order.
    pub clauses: IndexMap<String, Clause>,

    pub statistics: DocumentStatistics,

    pub assets: Vec<ExtractedAsset>,
}

impl BuildState {
    /// Create the state for a fresh document.
    #[must_use]
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            context: ParsingContext::new(),
            clauses: IndexMap::new(),
            statistics: DocumentStatistics::default(),
            assets: Vec::new(),
        }
    }

    /// Make `clause_id` the current clause, creating it on first sight.
    ///
    /// An existing clause keeps its title and content. Returns `true` when
    /// the clause was created.
    pub fn open_clause(&mut self, clause_id: &str, title: Option<String>) -> bool {
        let created = !self.clauses.contains_key(clause_id);
        if created {
            self.clauses
                .insert(clause_id.to_string(), Clause::new(clause_id, title));
        } else {
            tracing::debug!(
                document_id = %self.document_id,
                clause_id,
                "Clause seen again, resuming existing clause"
            );
        }
        self.context.enter_clause(clause_id);
        created
    }

    /// The clause currently receiving content, if it exists.
    pub fn current_clause_mut(&mut self) -> Option<&mut Clause> {
        let id = self.context.current_clause_id.as_deref()?;
        self.clauses.get_mut(id)
    }
}
