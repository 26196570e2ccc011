use std::fmt::Write as _;

use stencil_core::TableDocument;
use stencil_rules::{ValidationRule, field_expression, map_validation};

/// Module header of every generated validator.
const PRELUDE: &str = "import z from 'zod';\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorField {
    pub column: String,
    pub rule_name: &'static str,
    pub rule: ValidationRule,
}

impl ValidatorField {
    pub fn expression(&self) -> String {
        field_expression(&self.column, &self.rule)
    }
}

/// Validator module for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorModule {
    pub table: String,
    pub fields: Vec<ValidatorField>,
    /// Columns without a validation rule.
    pub dropped: Vec<String>,
}

impl ValidatorModule {
    /// Run the validation chain over every column, keeping dropped columns.
    pub fn collect(document: &TableDocument) -> Self {
        let mut fields = Vec::new();
        let mut dropped = Vec::new();

        for column in &document.columns {
            match map_validation(&column.classify()) {
                Some((rule_name, rule)) => fields.push(ValidatorField {
                    column: column.name.clone(),
                    rule_name,
                    rule,
                }),
                None => dropped.push(column.name.clone()),
            }
        }

        Self {
            table: document.name.clone(),
            fields,
            dropped,
        }
    }

    /// The module to write, or `None` when no column produced a rule.
    pub fn build(document: &TableDocument) -> Option<Self> {
        let module = Self::collect(document);
        (!module.is_empty()).then_some(module)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Generated source exporting a single validator object literal.
    ///
    /// Lines end with `\n` and the closing `})` is followed by a newline,
    /// unlike the `\r\n` output of the earlier generator.
    pub fn render(&self) -> String {
        let mut source = String::from(PRELUDE);
        source.push_str("export default z.object({\n");
        for field in &self.fields {
            let _ = writeln!(source, "\t{},", field.expression());
        }
        source.push_str("})\n");
        source
    }
}
