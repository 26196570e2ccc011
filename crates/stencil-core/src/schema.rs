use std::fmt;

use crate::types::{Degradation, TypeClass, TypeFamily, classify};

/// One table document: an ordered list of column descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDocument {
    /// Base name of the source document, used to name the artifacts.
    pub name: String,
    /// `model_name` declared inside the document, when present.
    pub model_name: Option<String>,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDocument {
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Canonical per-column schema metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Declared type, e.g. `VARCHAR(255)`. Empty when the document had none.
    pub raw_type: String,
    pub allow_null: bool,
    pub comment: Option<String>,
    pub bounds: Bounds,
}

impl ColumnDescriptor {
    /// Descriptor with only a name and a declared type.
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_type: raw_type.into(),
            allow_null: false,
            comment: None,
            bounds: Bounds::Absent,
        }
    }

    pub fn nullable(mut self, allow_null: bool) -> Self {
        self.allow_null = allow_null;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Attach the derived type class to this descriptor.
    pub fn classify(&self) -> ClassifiedColumn<'_> {
        let (class, type_degradation) = classify(&self.raw_type).into_parts();
        ClassifiedColumn {
            descriptor: self,
            class,
            type_degradation,
        }
    }
}

/// Numeric literal taken from `validate.min` / `validate.max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundValue {
    Int(i64),
    Float(f64),
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Int(value) => write!(f, "{value}"),
            BoundValue::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            BoundValue::Float(value) => write!(f, "{value}"),
        }
    }
}

/// State of the optional `validate` bounds of a column.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Bounds {
    #[default]
    Absent,
    Range {
        min: BoundValue,
        max: BoundValue,
    },
    /// Only one side was declared.
    Partial,
    /// Declared but unreadable.
    Malformed(String),
}

impl Bounds {
    pub fn range(&self) -> Option<(BoundValue, BoundValue)> {
        match self {
            Bounds::Range { min, max } => Some((*min, *max)),
            _ => None,
        }
    }

    pub fn degradation(&self) -> Option<Degradation> {
        match self {
            Bounds::Absent | Bounds::Range { .. } => None,
            Bounds::Partial => Some(Degradation::MissingBounds),
            Bounds::Malformed(reason) => Some(Degradation::MalformedBounds {
                reason: reason.clone(),
            }),
        }
    }
}

/// A descriptor together with its derived type class.
#[derive(Debug, Clone)]
pub struct ClassifiedColumn<'a> {
    pub descriptor: &'a ColumnDescriptor,
    pub class: TypeClass,
    type_degradation: Option<Degradation>,
}

impl<'a> ClassifiedColumn<'a> {
    pub fn name(&self) -> &'a str {
        &self.descriptor.name
    }

    pub fn comment(&self) -> Option<&'a str> {
        self.descriptor.comment.as_deref()
    }

    pub fn allow_null(&self) -> bool {
        self.descriptor.allow_null
    }

    pub fn bounds(&self) -> &'a Bounds {
        &self.descriptor.bounds
    }

    pub fn family(&self) -> &TypeFamily {
        &self.class.family
    }

    pub fn parameter(&self) -> Option<u32> {
        self.class.parameter
    }

    /// Every degradation observed while reading this column.
    pub fn degradations(&self) -> Vec<Degradation> {
        self.type_degradation
            .iter()
            .cloned()
            .chain(self.descriptor.bounds.degradation())
            .collect()
    }
}
