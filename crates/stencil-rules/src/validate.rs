//! Validation-rule chain.
//!
//! Independent of the mock chain. A column whose family matches no entry of
//! [`VALIDATION_RULES`] gets no rule and is left out of the validator.

use std::fmt;

use stencil_core::{ClassifiedColumn, TypeFamily};

/// Shape accepted for a column, before nullability is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    Object,
    /// Rendered `z.date()`; validators from the earlier generator spelled it `z.data()`.
    Date,
    String { max_length: Option<u32> },
    /// `max` is `2^parameter`, not a byte-width bound.
    Integer { max: Option<u128> },
    Number,
    Boolean,
}

/// Rule fragment for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRule {
    pub kind: RuleKind,
    pub nullable: bool,
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RuleKind::Object => f.write_str("z.object()")?,
            RuleKind::Date => f.write_str("z.date()")?,
            RuleKind::String { max_length } => {
                f.write_str("z.string()")?;
                if let Some(max_length) = max_length {
                    write!(f, ".max({max_length})")?;
                }
            }
            RuleKind::Integer { max } => {
                f.write_str("z.int()")?;
                if let Some(max) = max {
                    write!(f, ".max({max})")?;
                }
            }
            RuleKind::Number => f.write_str("z.number()")?,
            RuleKind::Boolean => f.write_str("z.boolean()")?,
        }

        if self.nullable {
            f.write_str(".nullable(true)")?;
            match self.kind {
                RuleKind::Integer { .. } | RuleKind::Number => f.write_str(".default(0)")?,
                RuleKind::Boolean => f.write_str(".default(false)")?,
                _ => {}
            }
        }

        Ok(())
    }
}

/// One entry of the validation chain.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRuleEntry {
    pub name: &'static str,
    pub apply: fn(&ClassifiedColumn<'_>) -> Option<RuleKind>,
}

/// The validation chain, highest priority first.
pub const VALIDATION_RULES: &[ValidationRuleEntry] = &[
    ValidationRuleEntry {
        name: "json_object",
        apply: json_object,
    },
    ValidationRuleEntry {
        name: "date",
        apply: date,
    },
    ValidationRuleEntry {
        name: "string",
        apply: string,
    },
    ValidationRuleEntry {
        name: "integer",
        apply: integer,
    },
    ValidationRuleEntry {
        name: "number",
        apply: number,
    },
    ValidationRuleEntry {
        name: "boolean",
        apply: boolean,
    },
];

/// Select the validation rule for a column, if any.
pub fn map_validation(column: &ClassifiedColumn<'_>) -> Option<(&'static str, ValidationRule)> {
    VALIDATION_RULES.iter().find_map(|entry| {
        (entry.apply)(column).map(|kind| {
            (
                entry.name,
                ValidationRule {
                    kind,
                    nullable: column.allow_null(),
                },
            )
        })
    })
}

/// Field expression for the validator object literal.
///
/// Names that are not plain identifiers are emitted as quoted keys.
pub fn field_expression(column: &str, rule: &ValidationRule) -> String {
    if is_identifier(column) {
        format!("{column} : {rule}")
    } else {
        let quoted = serde_json::Value::String(column.to_string());
        format!("{quoted} : {rule}")
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn json_object(column: &ClassifiedColumn<'_>) -> Option<RuleKind> {
    column.family().is_json().then_some(RuleKind::Object)
}

fn date(column: &ClassifiedColumn<'_>) -> Option<RuleKind> {
    column.family().is_temporal().then_some(RuleKind::Date)
}

fn string(column: &ClassifiedColumn<'_>) -> Option<RuleKind> {
    column.family().is_string().then(|| RuleKind::String {
        max_length: column.parameter(),
    })
}

fn integer(column: &ClassifiedColumn<'_>) -> Option<RuleKind> {
    column.family().is_integer().then(|| RuleKind::Integer {
        max: column
            .parameter()
            .and_then(|parameter| 1_u128.checked_shl(parameter)),
    })
}

fn number(column: &ClassifiedColumn<'_>) -> Option<RuleKind> {
    column.family().is_decimal().then_some(RuleKind::Number)
}

fn boolean(column: &ClassifiedColumn<'_>) -> Option<RuleKind> {
    matches!(column.family(), TypeFamily::Boolean).then_some(RuleKind::Boolean)
}
