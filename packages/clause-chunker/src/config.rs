//! Configuration constants, directory layout and validation helpers.

use std::path::{Path, PathBuf};

use crate::error::{ChunkerError, Result};

/// Default base directory for pipeline data.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Environment variable overriding the base data directory.
pub const DATA_DIR_ENV: &str = "CLAUSE_CHUNKER_DATA_DIR";

/// Environment variable enabling table/figure/picture handlers.
pub const ASSETS_ENV: &str = "CLAUSE_CHUNKER_ASSETS";

/// Per-document layout converter output, one directory per document.
pub const MARKER_JSON_DIR: &str = "output/marker_json";

/// Flat directory of block-tree JSON files, one per document.
pub const BLOCK_TREE_DIR: &str = "output/output_json";

/// Directory receiving the intermediate clause schema files.
pub const SCHEMA_DIR: &str = "output/output_schema";

/// Directory receiving per-clause chunk files.
pub const CHUNK_DIR: &str = "output/output_json_chunk";

/// Directory receiving extracted image assets.
pub const ASSET_DIR: &str = "output/output_images";

/// Subdirectory for images found outside any clause.
pub const MISC_ASSET_DIR: &str = "misc";

/// Suffix of converter sidecar files that are not block trees.
pub const META_SUFFIX: &str = "_meta.json";

/// Suffix of intermediate schema files.
pub const SCHEMA_SUFFIX: &str = "_final_schema.json";

/// Directory layout and feature switches for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Per-document converter output (`<doc>/<doc>.json`).
    pub marker_dir: PathBuf,

    /// Flat directory of block-tree files.
    pub input_dir: PathBuf,

    /// Output directory for schema files.
    pub schema_dir: PathBuf,

    /// Output directory for chunk files.
    pub chunk_dir: PathBuf,

    /// Output directory for extracted images.
    pub asset_dir: PathBuf,

    /// Register the table/figure/picture handlers.
    pub extract_assets: bool,
}

impl PipelineConfig {
    /// Build the default layout below `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            marker_dir: data_dir.join(MARKER_JSON_DIR),
            input_dir: data_dir.join(BLOCK_TREE_DIR),
            schema_dir: data_dir.join(SCHEMA_DIR),
            chunk_dir: data_dir.join(CHUNK_DIR),
            asset_dir: data_dir.join(ASSET_DIR),
            extract_assets: false,
        }
    }

    /// Read the configuration from the environment.
    ///
    /// `CLAUSE_CHUNKER_DATA_DIR` sets the base directory (default `data`),
    /// `CLAUSE_CHUNKER_ASSETS` enables asset handlers unless it is `0` or `false`.
    #[must_use]
    pub fn from_env() -> Self {
        let data_dir =
            std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());

        let extract_assets = std::env::var(ASSETS_ENV)
            .ok()
            .map(|v| v != "false" && v != "0")
            .unwrap_or(false);

        Self::new(data_dir).with_assets(extract_assets)
    }

    #[must_use]
    pub fn with_marker_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.marker_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_chunk_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chunk_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_assets(mut self, enabled: bool) -> Self {
        self.extract_assets = enabled;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

/// Make a clause id usable as a file name or storage key.
///
/// Only `/` is substituted; the chunk itself keeps the unmodified id.
///
/// # Examples
/// ```
/// use clause_chunker::config::safe_key;
///
/// assert_eq!(safe_key("4.2.1"), "4.2.1");
/// assert_eq!(safe_key("A/1"), "A_1");
/// ```
#[must_use]
pub fn safe_key(clause_id: &str) -> String {
    clause_id.replace('/', "_")
}

/// Validate a document id before it is used as a directory name.
///
/// # Examples
/// ```
/// use clause_chunker::config::validate_document_id;
///
/// assert!(validate_document_id("iec-61508-2").is_ok());
/// assert!(validate_document_id("EN 60204-1..2018").is_ok());
/// assert!(validate_document_id("").is_err());
/// assert!(validate_document_id("../etc").is_err());
/// ```
pub fn validate_document_id(document_id: &str) -> Result<()> {
    let trimmed = document_id.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || document_id.contains('/')
        || document_id.contains('\\')
    {
        return Err(ChunkerError::InvalidDocumentId(document_id.to_string()));
    }
    Ok(())
}

/// Document id of a block tree file: its file stem.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use clause_chunker::config::document_id_from_path;
///
/// assert_eq!(document_id_from_path(Path::new("in/iec61508.json")).as_deref(), Some("iec61508"));
/// ```
#[must_use]
pub fn document_id_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(ToString::to_string)
}
