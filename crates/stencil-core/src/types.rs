use std::fmt;

use serde::Serialize;

/// Canonical SQL type family: the uppercased type name without its parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Json,
    Jsonb,
    Varchar,
    Char,
    Text,
    MediumText,
    LongText,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Decimal,
    Numeric,
    Boolean,
    Timestamp,
    DateTime,
    /// Any family the rule chains have no dedicated handling for.
    Other(String),
}

impl TypeFamily {
    /// Map an uppercased family name onto a known family.
    pub fn from_name(name: &str) -> Self {
        match name {
            "JSON" => TypeFamily::Json,
            "JSONB" => TypeFamily::Jsonb,
            "VARCHAR" => TypeFamily::Varchar,
            "CHAR" => TypeFamily::Char,
            "TEXT" => TypeFamily::Text,
            "MEDIUMTEXT" => TypeFamily::MediumText,
            "LONGTEXT" => TypeFamily::LongText,
            "TINYINT" => TypeFamily::TinyInt,
            "SMALLINT" => TypeFamily::SmallInt,
            "INT" => TypeFamily::Int,
            "BIGINT" => TypeFamily::BigInt,
            "DECIMAL" => TypeFamily::Decimal,
            "NUMERIC" => TypeFamily::Numeric,
            "BOOLEAN" => TypeFamily::Boolean,
            "TIMESTAMP" => TypeFamily::Timestamp,
            "DATETIME" => TypeFamily::DateTime,
            other => TypeFamily::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeFamily::Json => "JSON",
            TypeFamily::Jsonb => "JSONB",
            TypeFamily::Varchar => "VARCHAR",
            TypeFamily::Char => "CHAR",
            TypeFamily::Text => "TEXT",
            TypeFamily::MediumText => "MEDIUMTEXT",
            TypeFamily::LongText => "LONGTEXT",
            TypeFamily::TinyInt => "TINYINT",
            TypeFamily::SmallInt => "SMALLINT",
            TypeFamily::Int => "INT",
            TypeFamily::BigInt => "BIGINT",
            TypeFamily::Decimal => "DECIMAL",
            TypeFamily::Numeric => "NUMERIC",
            TypeFamily::Boolean => "BOOLEAN",
            TypeFamily::Timestamp => "TIMESTAMP",
            TypeFamily::DateTime => "DATETIME",
            TypeFamily::Other(name) => name,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, TypeFamily::Json | TypeFamily::Jsonb)
    }

    pub fn is_string(&self) -> bool {
        matches!(
            self,
            TypeFamily::Varchar
                | TypeFamily::Char
                | TypeFamily::Text
                | TypeFamily::MediumText
                | TypeFamily::LongText
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            TypeFamily::TinyInt | TypeFamily::SmallInt | TypeFamily::Int | TypeFamily::BigInt
        )
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self, TypeFamily::Decimal | TypeFamily::Numeric)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, TypeFamily::Timestamp | TypeFamily::DateTime)
    }
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Family plus the optional length/precision parameter of a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeClass {
    pub family: TypeFamily,
    pub parameter: Option<u32>,
}

/// Named reason a column was read with a degraded interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// The declared type is missing, empty or not a string.
    MalformedType,
    /// The parenthesized parameter is not a positive integer.
    MalformedParameter { raw: String },
    /// Only one of `validate.min` / `validate.max` is present.
    MissingBounds,
    /// `validate` is present but not a pair of numbers.
    MalformedBounds { reason: String },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::MalformedType => f.write_str("malformed type"),
            Degradation::MalformedParameter { raw } => {
                write!(f, "malformed type parameter '{raw}'")
            }
            Degradation::MissingBounds => f.write_str("partial validate bounds"),
            Degradation::MalformedBounds { reason } => {
                write!(f, "malformed validate bounds: {reason}")
            }
        }
    }
}

/// Result of classifying a declared type: always a class, sometimes degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Exact(TypeClass),
    Degraded(TypeClass, Degradation),
}

impl Classification {
    pub fn class(&self) -> &TypeClass {
        match self {
            Classification::Exact(class) | Classification::Degraded(class, _) => class,
        }
    }

    pub fn degradation(&self) -> Option<&Degradation> {
        match self {
            Classification::Exact(_) => None,
            Classification::Degraded(_, reason) => Some(reason),
        }
    }

    pub fn into_parts(self) -> (TypeClass, Option<Degradation>) {
        match self {
            Classification::Exact(class) => (class, None),
            Classification::Degraded(class, reason) => (class, Some(reason)),
        }
    }
}

/// Classify a declared column type such as `VARCHAR(255)`.
///
/// The text before the first `(` is uppercased into the family; the leading
/// digits after it become the parameter. Never fails: an empty type or an
/// unreadable parameter yields a [`Classification::Degraded`] result.
pub fn classify(raw_type: &str) -> Classification {
    let upper = raw_type.to_uppercase();
    let (name, rest) = match upper.split_once('(') {
        Some((name, rest)) => (name.trim(), Some(rest)),
        None => (upper.trim(), None),
    };

    let family = TypeFamily::from_name(name);
    if name.is_empty() {
        return Classification::Degraded(
            TypeClass {
                family,
                parameter: None,
            },
            Degradation::MalformedType,
        );
    }

    let Some(rest) = rest else {
        return Classification::Exact(TypeClass {
            family,
            parameter: None,
        });
    };

    match parse_parameter(rest) {
        Some(parameter) => Classification::Exact(TypeClass {
            family,
            parameter: Some(parameter),
        }),
        None => Classification::Degraded(
            TypeClass {
                family,
                parameter: None,
            },
            Degradation::MalformedParameter {
                raw: rest.trim_end_matches(')').to_string(),
            },
        ),
    }
}

// Leading digit run, so `10,2)` reads as 10. Zero counts as absent.
fn parse_parameter(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse::<u32>().ok().filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_family_and_parameter() {
        let class = classify("varchar(255)");
        assert_eq!(
            class,
            Classification::Exact(TypeClass {
                family: TypeFamily::Varchar,
                parameter: Some(255),
            })
        );
    }

    #[test]
    fn reads_leading_digits_of_precision_pair() {
        let class = classify("DECIMAL(10,2)");
        assert_eq!(class.class().family, TypeFamily::Decimal);
        assert_eq!(class.class().parameter, Some(10));
        assert!(class.degradation().is_none());
    }

    #[test]
    fn type_without_parameter_is_exact() {
        let class = classify("boolean");
        assert_eq!(class.class().family, TypeFamily::Boolean);
        assert_eq!(class.class().parameter, None);
        assert!(class.degradation().is_none());
    }

    #[test]
    fn unparsable_parameter_degrades() {
        let class = classify("CHAR(abc)");
        assert_eq!(class.class().family, TypeFamily::Char);
        assert_eq!(class.class().parameter, None);
        assert_eq!(
            class.degradation(),
            Some(&Degradation::MalformedParameter {
                raw: "ABC".to_string()
            })
        );
    }

    #[test]
    fn zero_parameter_counts_as_absent() {
        let class = classify("INT(0)");
        assert_eq!(class.class().parameter, None);
        assert!(class.degradation().is_some());
    }

    #[test]
    fn unknown_family_keeps_uppercased_name() {
        let class = classify("geometry(Point, 4326)");
        assert_eq!(
            class.class().family,
            TypeFamily::Other("GEOMETRY".to_string())
        );
        assert!(class.degradation().is_some());
    }

    #[test]
    fn empty_type_degrades_instead_of_failing() {
        let class = classify("   ");
        assert_eq!(class.class().family, TypeFamily::Other(String::new()));
        assert_eq!(class.degradation(), Some(&Degradation::MalformedType));
    }

    #[test]
    fn classification_is_deterministic() {
        for raw in ["TEXT", "int(11)", "JSONB", "numeric(x)", "(", "DATETIME("] {
            assert_eq!(classify(raw), classify(raw), "{raw}");
        }
    }
}
