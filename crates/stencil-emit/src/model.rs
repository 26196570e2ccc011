use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use stencil_core::Degradation;

/// Where artifacts are written. A `None` directory skips that artifact.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtifactTargets {
    pub mock_dir: Option<PathBuf>,
    pub validator_dir: Option<PathBuf>,
}

/// Options for the transform engine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineOptions {
    pub targets: ArtifactTargets,
    /// Record failed documents and continue instead of stopping at the first one.
    pub keep_going: bool,
}

/// Degradation observed on one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDegradation {
    pub column: String,
    #[serde(flatten)]
    pub reason: Degradation,
}

/// Summary of one transformed document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentReport {
    pub source: Option<PathBuf>,
    pub table: String,
    pub columns: u64,
    pub mock_entries: u64,
    pub omitted: Vec<String>,
    pub unknown: Vec<String>,
    pub mock_rule_usage: BTreeMap<String, u64>,
    pub validator_fields: u64,
    pub validator_dropped: Vec<String>,
    pub validation_rule_usage: BTreeMap<String, u64>,
    pub degradations: Vec<ColumnDegradation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mock_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator_path: Option<PathBuf>,
}

impl DocumentReport {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn record_mock_rule(&mut self, rule: &str) {
        self.mock_entries += 1;
        *self.mock_rule_usage.entry(rule.to_string()).or_insert(0) += 1;
    }

    pub fn record_validation_rule(&mut self, rule: &str) {
        self.validator_fields += 1;
        *self.validation_rule_usage.entry(rule.to_string()).or_insert(0) += 1;
    }

    pub fn record_degradation(&mut self, column: &str, reason: Degradation) {
        self.degradations.push(ColumnDegradation {
            column: column.to_string(),
            reason,
        });
    }
}

/// A document that could not be transformed.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    pub source: PathBuf,
    pub error: String,
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunTotals {
    pub documents: u64,
    pub failed: u64,
    pub columns: u64,
    pub mock_entries: u64,
    pub unknown: u64,
    pub validator_files: u64,
    pub validator_dropped: u64,
    pub degradations: u64,
}

/// Report for a transform run over a model directory.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: String,
    pub model_dir: PathBuf,
    pub options: EngineOptions,
    pub documents: Vec<DocumentReport>,
    pub failures: Vec<DocumentFailure>,
    pub totals: RunTotals,
}

impl RunReport {
    pub fn new(run_id: String, model_dir: PathBuf, options: EngineOptions) -> Self {
        Self {
            run_id,
            started_at: chrono::Utc::now().to_rfc3339(),
            model_dir,
            options,
            documents: Vec::new(),
            failures: Vec::new(),
            totals: RunTotals::default(),
        }
    }

    pub fn record_document(&mut self, report: DocumentReport) {
        let totals = &mut self.totals;
        totals.documents += 1;
        totals.columns += report.columns;
        totals.mock_entries += report.mock_entries;
        totals.unknown += report.unknown.len() as u64;
        totals.validator_dropped += report.validator_dropped.len() as u64;
        totals.degradations += report.degradations.len() as u64;
        if report.validator_path.is_some() {
            totals.validator_files += 1;
        }
        self.documents.push(report);
    }

    pub fn record_failure(&mut self, failure: DocumentFailure) {
        self.totals.failed += 1;
        self.failures.push(failure);
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}
