//! Pipeline stages: collect, build schemas, emit chunks.
//!
//! Each stage works through a directory of documents. A document that fails
//! is logged and recorded in the [`StageReport`]; the remaining documents
//! are still processed. Only problems with the stage's own input directory
//! abort a stage.

use std::path::{Path, PathBuf};

use crate::chunk::{emit_chunks, load_schema, DirectorySink, SchemaStatus};
use crate::collect::{collect_marker_outputs, find_block_trees, find_schema_files};
use crate::config::{PipelineConfig, SCHEMA_SUFFIX};
use crate::error::Result;
use crate::structure::{DocumentBuild, StructureBuilder};
use crate::writer::{write_bytes, write_json};

/// A document a stage did not process, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageIssue {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Documents handled successfully.
    pub processed: usize,

    /// Files written (schemas, chunks, images or collected inputs).
    pub written: usize,

    pub skipped: Vec<StageIssue>,

    pub failed: Vec<StageIssue>,
}

impl StageReport {
    /// True when no document failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn skip(&mut self, path: &Path, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(path = %path.display(), reason = %message, "Skipping document");
        self.skipped.push(StageIssue {
            path: path.to_path_buf(),
            message,
        });
    }

    fn fail(&mut self, path: &Path, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(path = %path.display(), error = %message, "Document failed");
        self.failed.push(StageIssue {
            path: path.to_path_buf(),
            message,
        });
    }
}

/// Reports of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub collect: StageReport,
    pub build: StageReport,
    pub chunk: StageReport,
}

impl PipelineReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.collect.is_success() && self.build.is_success() && self.chunk.is_success()
    }
}

/// Copy converter output into the block tree directory.
///
/// # Errors
///
/// Returns an error if the converter output directory is unusable or a
/// copy fails.
pub fn collect_stage(config: &PipelineConfig) -> Result<StageReport> {
    let collected = collect_marker_outputs(&config.marker_dir, &config.input_dir)?;
    Ok(StageReport {
        processed: collected.len(),
        written: collected.len(),
        ..StageReport::default()
    })
}

/// Build a schema file for every block tree in the input directory.
///
/// Schemas go to `<schema_dir>/<doc>_final_schema.json`; images, when asset
/// extraction is enabled, to `<asset_dir>/<doc>/`.
///
/// # Errors
///
/// Returns an error if the input directory is missing or unreadable.
pub fn build_schemas(config: &PipelineConfig) -> Result<StageReport> {
    let builder = if config.extract_assets {
        StructureBuilder::with_assets()
    } else {
        StructureBuilder::default()
    };

    let mut report = StageReport::default();
    for path in find_block_trees(&config.input_dir)? {
        let build = match builder.convert_file(&path) {
            Ok(build) => build,
            Err(err) => {
                report.fail(&path, err.to_string());
                continue;
            }
        };
        match write_build(config, &build) {
            Ok(written) => {
                tracing::info!(
                    document_id = %build.schema.document_id,
                    clauses = build.schema.clause_count(),
                    "Schema written"
                );
                report.processed += 1;
                report.written += written;
            }
            Err(err) => report.fail(&path, err.to_string()),
        }
    }
    Ok(report)
}

fn write_build(config: &PipelineConfig, build: &DocumentBuild) -> Result<usize> {
    let document_id = &build.schema.document_id;
    let schema_path = config
        .schema_dir
        .join(format!("{document_id}{SCHEMA_SUFFIX}"));
    write_json(&schema_path, &build.schema)?;

    let asset_root = config.asset_dir.join(document_id);
    for asset in &build.assets {
        write_bytes(&asset_root.join(asset.relative_path()), &asset.data)?;
    }
    Ok(1 + build.assets.len())
}

/// Emit chunk files for every schema in the schema directory.
///
/// # Errors
///
/// Returns an error if the schema directory is missing or unreadable.
pub fn emit_all_chunks(config: &PipelineConfig) -> Result<StageReport> {
    let mut sink = DirectorySink::new(&config.chunk_dir);
    let mut report = StageReport::default();

    for path in find_schema_files(&config.schema_dir)? {
        match load_schema(&path) {
            Ok(SchemaStatus::Ready(schema)) => {
                match emit_chunks(&schema.document_id, &schema.clauses, &mut sink) {
                    Ok(emitted) => {
                        tracing::info!(
                            document_id = %schema.document_id,
                            chunks = emitted,
                            "Chunks written"
                        );
                        report.processed += 1;
                        report.written += emitted;
                    }
                    Err(err) => report.fail(&path, err.to_string()),
                }
            }
            Ok(SchemaStatus::Skipped { reason }) => report.skip(&path, reason),
            Err(err) => report.fail(&path, err.to_string()),
        }
    }
    Ok(report)
}

/// Run collect, build and chunk in order.
///
/// Collection is skipped when the converter output directory does not exist,
/// so block trees may also be placed in the input directory directly.
///
/// # Errors
///
/// Returns the first stage-level error.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    let collect = if config.marker_dir.is_dir() {
        collect_stage(config)?
    } else {
        tracing::info!(
            path = %config.marker_dir.display(),
            "No converter output directory, skipping collection"
        );
        StageReport::default()
    };
    let build = build_schemas(config)?;
    let chunk = emit_all_chunks(config)?;

    Ok(PipelineReport {
        collect,
        build,
        chunk,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChunkerError;
    use std::fs;
    use tempfile::tempdir;

    const DOC: &str = r#"{"children": [{"block_type": "Page", "children": [
        {"block_type": "SectionHeader", "html": "<h1>1 Scope</h1>"},
        {"block_type": "Text", "html": "<p>Devices shall be tested.</p>"}
    ]}]}"#;

    fn config(root: &Path) -> PipelineConfig {
        PipelineConfig::new(root)
    }

    #[test]
    fn test_build_schemas_reports_failures() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(&config.input_dir).unwrap();
        fs::write(config.input_dir.join("good.json"), DOC).unwrap();
        fs::write(config.input_dir.join("bad.json"), "not json").unwrap();
        fs::write(config.input_dir.join("good_meta.json"), "{}").unwrap();

        let report = build_schemas(&config).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.written, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].path.ends_with("bad.json"));
        assert!(config.schema_dir.join("good_final_schema.json").is_file());
    }

    #[test]
    fn test_emit_all_chunks_skips_empty_schema() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(&config.schema_dir).unwrap();
        fs::write(
            config.schema_dir.join("empty_final_schema.json"),
            r#"{"document_id": "empty", "clauses": []}"#,
        )
        .unwrap();

        let report = emit_all_chunks(&config).unwrap();

        assert_eq!(report.processed, 0);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.is_success());
    }

    #[test]
    fn test_missing_input_dir_is_stage_error() {
        let dir = tempdir().unwrap();
        let result = build_schemas(&config(dir.path()));
        assert!(matches!(result, Err(ChunkerError::MissingDirectory(_))));
    }

    #[test]
    fn test_run_without_marker_dir() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(&config.input_dir).unwrap();
        fs::write(config.input_dir.join("doc.json"), DOC).unwrap();

        let report = run(&config).unwrap();

        assert!(report.is_success());
        assert_eq!(report.collect, StageReport::default());
        assert_eq!(report.build.processed, 1);
        assert_eq!(report.chunk.written, 1);
        assert!(config.chunk_dir.join("doc").join("1.json").is_file());
    }
}
