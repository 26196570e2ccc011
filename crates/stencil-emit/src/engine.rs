use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use stencil_core::{TableDocument, is_document_path};

use crate::errors::EmitError;
use crate::mock::MockTemplate;
use crate::model::{DocumentFailure, DocumentReport, EngineOptions, RunReport};
use crate::output::write_bytes_atomic;
use crate::validator::ValidatorModule;

/// Extension of written mock templates.
pub const MOCK_EXTENSION: &str = "yml";
/// Suffix of written validator modules.
pub const VALIDATOR_EXTENSION: &str = "schema.js";

/// Both artifacts of one document, built but not yet written.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub mock: MockTemplate,
    pub validator: ValidatorModule,
    pub report: DocumentReport,
}

/// Run both rule chains over a document. Pure: nothing is written.
pub fn transform(document: &TableDocument) -> Artifacts {
    let mock = MockTemplate::build(document);
    let validator = ValidatorModule::collect(document);

    let mut report = DocumentReport::new(&document.name);
    report.columns = document.columns.len() as u64;

    for column in &document.columns {
        for reason in column.classify().degradations() {
            warn!(
                table = %document.name,
                column = %column.name,
                raw_type = %column.raw_type,
                reason = %reason,
                "column degraded"
            );
            report.record_degradation(&column.name, reason);
        }
    }

    for entry in &mock.entries {
        debug!(
            table = %document.name,
            column = %entry.column,
            rule = entry.rule,
            directive = %entry.directive,
            "mock directive selected"
        );
        report.record_mock_rule(entry.rule);
    }
    report.omitted = mock.omitted.clone();
    report.unknown = mock.unknown_columns().map(str::to_string).collect();

    for field in &validator.fields {
        report.record_validation_rule(field.rule_name);
    }
    report.validator_dropped = validator.dropped.clone();

    Artifacts {
        mock,
        validator,
        report,
    }
}

/// Walks a model directory and writes artifacts for every table document.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    options: EngineOptions,
}

impl TransformEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Table documents directly inside `model_dir`, sorted by file name.
    pub fn discover(model_dir: &Path) -> Result<Vec<PathBuf>, EmitError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(model_dir)? {
            let path = entry?.path();
            if path.is_file() && is_document_path(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Load one document and write its artifacts.
    ///
    /// Both artifacts are rendered before anything is written, and each file
    /// is replaced atomically.
    pub fn run_document(&self, path: &Path) -> Result<DocumentReport, EmitError> {
        let document = TableDocument::load(path)?;
        let Artifacts {
            mock,
            validator,
            mut report,
        } = transform(&document);
        report.source = Some(path.to_path_buf());

        let targets = &self.options.targets;
        let mock_output = match &targets.mock_dir {
            Some(dir) => Some((
                dir.join(format!("{}.{MOCK_EXTENSION}", document.name)),
                mock.to_yaml()?,
            )),
            None => None,
        };
        let validator_output = match &targets.validator_dir {
            Some(dir) if !validator.is_empty() => Some((
                dir.join(format!("{}.{VALIDATOR_EXTENSION}", document.name)),
                validator.render(),
            )),
            Some(_) => {
                info!(
                    table = %document.name,
                    "no validation rules, validator skipped"
                );
                None
            }
            None => None,
        };

        if let Some((out_path, text)) = mock_output {
            write_bytes_atomic(&out_path, text.as_bytes())?;
            info!(
                table = %document.name,
                entries = mock.entries.len(),
                unknown = report.unknown.len(),
                path = %out_path.display(),
                "mock template written"
            );
            report.mock_path = Some(out_path);
        }

        if let Some((out_path, text)) = validator_output {
            if let Err(err) = write_bytes_atomic(&out_path, text.as_bytes()) {
                // a failed document keeps no artifact
                if let Some(mock_path) = report.mock_path.take() {
                    if let Err(cleanup) = std::fs::remove_file(&mock_path) {
                        warn!(
                            table = %document.name,
                            path = %mock_path.display(),
                            error = %cleanup,
                            "failed to remove mock template of failed document"
                        );
                    }
                }
                return Err(err);
            }
            info!(
                table = %document.name,
                fields = validator.fields.len(),
                dropped = validator.dropped.len(),
                path = %out_path.display(),
                "validator written"
            );
            report.validator_path = Some(out_path);
        }

        Ok(report)
    }

    /// Transform every document of `model_dir`, sequentially.
    pub fn run(&self, model_dir: &Path) -> Result<RunReport, EmitError> {
        let start = Instant::now();
        let paths = Self::discover(model_dir)?;
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = RunReport::new(run_id.clone(), model_dir.to_path_buf(), self.options.clone());

        info!(
            run_id = %run_id,
            model_dir = %model_dir.display(),
            documents = paths.len(),
            keep_going = self.options.keep_going,
            "transform started"
        );

        let duplicates = duplicate_tables(&paths);

        for path in paths {
            let shared = table_name(&path).and_then(|table| duplicates.get_key_value(&table));
            let outcome = match shared {
                Some((table, shared)) => Err(EmitError::DuplicateTable {
                    table: table.clone(),
                    paths: shared.clone(),
                }),
                None => self.run_document(&path),
            };
            match outcome {
                Ok(document) => report.record_document(document),
                Err(err) if self.options.keep_going => {
                    warn!(path = %path.display(), error = %err, "document failed");
                    report.record_failure(DocumentFailure {
                        source: path,
                        error: err.to_string(),
                    });
                }
                Err(err) => {
                    warn!(run_id = %run_id, path = %path.display(), error = %err, "transform aborted");
                    return Err(EmitError::for_document(path, err));
                }
            }
        }

        info!(
            run_id = %run_id,
            documents = report.totals.documents,
            failed = report.totals.failed,
            unknown = report.totals.unknown,
            duration_ms = start.elapsed().as_millis() as u64,
            "transform finished"
        );

        Ok(report)
    }
}

fn table_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Tables declared by more than one document, with every declaring path.
fn duplicate_tables(paths: &[PathBuf]) -> BTreeMap<String, Vec<PathBuf>> {
    let mut by_table: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in paths {
        if let Some(table) = table_name(path) {
            by_table.entry(table).or_default().push(path.clone());
        }
    }
    by_table.retain(|_, shared| shared.len() > 1);
    by_table
}
