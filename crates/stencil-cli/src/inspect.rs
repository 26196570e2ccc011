use std::fmt::Write as _;

use serde::Serialize;

use stencil_core::{Degradation, TableDocument};
use stencil_rules::{MockOutcome, map_mock, map_validation};

/// How each column of a document moves through both rule chains.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInspection {
    pub column: String,
    pub raw_type: String,
    pub family: String,
    pub parameter: Option<u32>,
    pub allow_null: bool,
    /// `None` when the column is omitted from the mock template.
    pub mock_rule: Option<&'static str>,
    pub mock_directive: Option<String>,
    pub validation_rule: Option<&'static str>,
    pub validation: Option<String>,
    pub degradations: Vec<Degradation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentInspection {
    pub table: String,
    pub columns: Vec<ColumnInspection>,
}

pub fn inspect_document(document: &TableDocument) -> DocumentInspection {
    let columns = document
        .columns
        .iter()
        .map(|descriptor| {
            let column = descriptor.classify();
            let (mock_rule, mock_directive) = match map_mock(&column) {
                MockOutcome::Omitted => (None, None),
                MockOutcome::Mapped { rule, directive } => {
                    (Some(rule), Some(directive.to_string()))
                }
            };
            let (validation_rule, validation) = match map_validation(&column) {
                Some((name, rule)) => (Some(name), Some(rule.to_string())),
                None => (None, None),
            };

            ColumnInspection {
                column: descriptor.name.clone(),
                raw_type: descriptor.raw_type.clone(),
                family: column.family().to_string(),
                parameter: column.parameter(),
                allow_null: column.allow_null(),
                mock_rule,
                mock_directive,
                validation_rule,
                validation,
                degradations: column.degradations(),
            }
        })
        .collect();

    DocumentInspection {
        table: document.name.clone(),
        columns,
    }
}

impl DocumentInspection {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "table {} ({} columns)", self.table, self.columns.len());

        for column in &self.columns {
            let family = match column.parameter {
                Some(parameter) => format!("{}({parameter})", column.family),
                None => column.family.clone(),
            };
            let nullable = if column.allow_null { " null" } else { "" };
            let _ = writeln!(out, "  {} [{family}{nullable}]", column.column);

            match (column.mock_rule, &column.mock_directive) {
                (Some(rule), Some(directive)) => {
                    let _ = writeln!(out, "    mock       {directive}  ({rule})");
                }
                _ => {
                    let _ = writeln!(out, "    mock       omitted");
                }
            }
            match (column.validation_rule, &column.validation) {
                (Some(rule), Some(expression)) => {
                    let _ = writeln!(out, "    validator  {expression}  ({rule})");
                }
                _ => {
                    let _ = writeln!(out, "    validator  dropped");
                }
            }
            for degradation in &column.degradations {
                let _ = writeln!(out, "    degraded   {degradation}");
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEMS_YAML: &str = r#"
attributes:
  id:
    type: INT
  title:
    type: VARCHAR(abc)
    allowNull: true
  outline:
    type: POLYGON
"#;

    fn items() -> TableDocument {
        TableDocument::from_yaml_str("items", ITEMS_YAML).expect("parse items")
    }

    #[test]
    fn inspection_follows_both_chains() {
        let inspection = inspect_document(&items());
        assert_eq!(inspection.columns.len(), 3);

        let id = &inspection.columns[0];
        assert_eq!(id.mock_rule, None);
        assert_eq!(id.validation_rule, Some("integer"));
        assert_eq!(id.validation.as_deref(), Some("z.int()"));

        let title = &inspection.columns[1];
        assert_eq!(title.family, "VARCHAR");
        assert_eq!(title.parameter, None);
        assert_eq!(title.mock_rule, Some("base_type"));
        assert_eq!(title.validation.as_deref(), Some("z.string().nullable(true)"));
        assert!(matches!(
            title.degradations.as_slice(),
            [Degradation::MalformedParameter { .. }]
        ));

        let outline = &inspection.columns[2];
        assert_eq!(outline.mock_rule, Some("unknown"));
        assert_eq!(outline.mock_directive.as_deref(), Some("@unknown"));
        assert_eq!(outline.validation_rule, None);
    }

    #[test]
    fn text_rendering_marks_omitted_and_dropped_columns() {
        let text = inspect_document(&items()).render_text();

        assert!(text.starts_with("table items (3 columns)\n"));
        assert!(text.contains("  id [INT]\n    mock       omitted\n"));
        assert!(text.contains("  title [VARCHAR null]\n"));
        assert!(text.contains("    degraded   malformed type parameter 'ABC'\n"));
        assert!(text.contains("  outline [POLYGON]\n    mock       @unknown  (unknown)\n    validator  dropped\n"));
    }

    #[test]
    fn json_output_carries_degradation_kind() {
        let json = serde_json::to_value(inspect_document(&items())).expect("serialize inspection");
        assert_eq!(json["table"], "items");
        assert_eq!(json["columns"][1]["degradations"][0]["kind"], "malformed_parameter");
        assert_eq!(json["columns"][0]["mock_rule"], serde_json::Value::Null);
    }
}
