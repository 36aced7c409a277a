use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::validate_document_id;
use crate::error::{ChunkerError, Result};
use crate::types::{Clause, DocumentSchema, DocumentStatistics};

/// Outcome of loading a schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Schema with a document id and at least one clause.
    Ready(DocumentSchema),

    /// Nothing to emit; `reason` says why.
    Skipped { reason: String },
}

#[derive(Deserialize)]
struct RawSchema {
    #[serde(default)]
    document_id: Option<String>,
    #[serde(default)]
    statistics: DocumentStatistics,
    #[serde(default)]
    clauses: Option<Vec<Clause>>,
}

/// Load an intermediate schema file for chunk emission.
///
/// A schema without a document id or without clauses is returned as
/// [`SchemaStatus::Skipped`] rather than as an error.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if its document
/// id is not usable as a storage key.
pub fn load_schema(path: &Path) -> Result<SchemaStatus> {
    let raw = fs::read_to_string(path).map_err(|source| ChunkerError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let schema: RawSchema =
        serde_json::from_str(&raw).map_err(|source| ChunkerError::ParseInput {
            path: path.to_path_buf(),
            source,
        })?;

    let Some(document_id) = schema.document_id.filter(|id| !id.is_empty()) else {
        return Ok(SchemaStatus::Skipped {
            reason: "missing document_id".to_string(),
        });
    };
    let clauses = schema.clauses.unwrap_or_default();
    if clauses.is_empty() {
        return Ok(SchemaStatus::Skipped {
            reason: "no clauses".to_string(),
        });
    }
    validate_document_id(&document_id).map_err(|err| ChunkerError::InvalidSchema {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    Ok(SchemaStatus::Ready(DocumentSchema {
        document_id,
        statistics: schema.statistics,
        clauses,
    }))
}
