use serde_yaml::{Mapping, Value};

use stencil_core::TableDocument;
use stencil_rules::{MockDirective, MockOutcome, map_mock};

/// One template entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MockEntry {
    pub column: String,
    /// Column name plus the `|N` cardinality marker when the directive has one.
    pub key: String,
    pub rule: &'static str,
    pub directive: MockDirective,
}

/// Mock template for one table, in column declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct MockTemplate {
    pub table: String,
    pub entries: Vec<MockEntry>,
    /// Columns left out of the template.
    pub omitted: Vec<String>,
}

impl MockTemplate {
    pub fn build(document: &TableDocument) -> Self {
        let mut entries = Vec::with_capacity(document.columns.len());
        let mut omitted = Vec::new();

        for column in &document.columns {
            match map_mock(&column.classify()) {
                MockOutcome::Omitted => omitted.push(column.name.clone()),
                MockOutcome::Mapped { rule, directive } => entries.push(MockEntry {
                    column: column.name.clone(),
                    key: directive.template_key(&column.name),
                    rule,
                    directive,
                }),
            }
        }

        Self {
            table: document.name.clone(),
            entries,
            omitted,
        }
    }

    /// Columns marked `@unknown`, which need a hand-written directive.
    pub fn unknown_columns(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.directive.is_unknown())
            .map(|entry| entry.column.as_str())
    }

    pub fn to_mapping(&self) -> Mapping {
        let mut mapping = Mapping::with_capacity(self.entries.len());
        for entry in &self.entries {
            mapping.insert(Value::String(entry.key.clone()), entry.directive.to_value());
        }
        mapping
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.to_mapping())
    }
}
