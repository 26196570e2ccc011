//! Mock-directive chain.
//!
//! Rules run in the order of [`MOCK_RULES`]; the first rule whose `apply`
//! returns a directive decides the column. The `id` column never reaches the
//! chain: it is omitted from mock templates.

use std::fmt;

use serde_yaml::{Mapping, Value};

use stencil_core::{BoundValue, ClassifiedColumn, TypeFamily};

/// Column left out of every mock template.
pub const PRIMARY_KEY_COLUMN: &str = "id";

/// Name of the final catch-all rule.
pub const UNKNOWN_RULE: &str = "unknown";

/// Instruction for the downstream mock engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MockDirective {
    /// Fixed nested object, produced exactly once.
    JsonSample,
    Date,
    Version,
    ImageUrl,
    VideoUrl,
    Pick(Vec<String>),
    BoundedInteger {
        min: BoundValue,
        max: BoundValue,
    },
    Uuid,
    Title,
    Email,
    NumericString(Option<u32>),
    Ip,
    LowerString(u32),
    Paragraph {
        min: u8,
        max: u8,
    },
    IntegerRange {
        max: u64,
    },
    Float,
    Boolean,
    DateTime,
    /// No rule applies; a human has to author this column.
    Unknown,
}

impl MockDirective {
    /// Cardinality marker appended to the template key as `|N`.
    pub fn cardinality(&self) -> Option<u32> {
        match self {
            MockDirective::JsonSample => Some(1),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, MockDirective::Unknown)
    }

    /// Template key for a column carrying this directive.
    pub fn template_key(&self, column: &str) -> String {
        match self.cardinality() {
            Some(count) => format!("{column}|{count}"),
            None => column.to_string(),
        }
    }

    /// Template value: a literal object for the JSON sample, a directive string otherwise.
    pub fn to_value(&self) -> Value {
        match self {
            MockDirective::JsonSample => {
                let mut sample = Mapping::new();
                sample.insert("test1".into(), "test1".into());
                sample.insert("test2".into(), "test2".into());
                Value::Mapping(sample)
            }
            other => Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for MockDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockDirective::JsonSample => f.write_str(r#"{"test1":"test1","test2":"test2"}"#),
            MockDirective::Date => f.write_str("@date"),
            MockDirective::Version => {
                f.write_str(r#"@string("number",2).@string("number",2).@string("number",3)"#)
            }
            MockDirective::ImageUrl => f.write_str(r#"@url("https").@pick(png,jpg,svg)"#),
            MockDirective::VideoUrl => f.write_str(r#"@url("https").@pick(mp4,mov,avi)"#),
            MockDirective::Pick(values) => {
                let values = serde_json::to_string(values).map_err(|_| fmt::Error)?;
                write!(f, "@pick({values})")
            }
            MockDirective::BoundedInteger { min, max } => write!(f, "@integer({min},{max})"),
            MockDirective::Uuid => f.write_str("@uuid"),
            MockDirective::Title => f.write_str("@ctitle(3, 10)"),
            MockDirective::Email => f.write_str("@email"),
            MockDirective::NumericString(Some(length)) => {
                write!(f, r#"@string("number", {length})"#)
            }
            MockDirective::NumericString(None) => f.write_str(r#"@string("number")"#),
            MockDirective::Ip => f.write_str("@ip"),
            MockDirective::LowerString(length) => write!(f, r#"@string("lower",{length})"#),
            MockDirective::Paragraph { min, max } => write!(f, "@paragraph({min}, {max})"),
            MockDirective::IntegerRange { max } => write!(f, "@integer(0, {max})"),
            MockDirective::Float => f.write_str("@float(0, 100, 2, 6)"),
            MockDirective::Boolean => f.write_str("@boolean"),
            MockDirective::DateTime => f.write_str("@datetime"),
            MockDirective::Unknown => f.write_str("@unknown"),
        }
    }
}

/// One entry of the mock chain.
#[derive(Debug, Clone, Copy)]
pub struct MockRule {
    pub name: &'static str,
    /// Returns the directive when the rule matches the column.
    pub apply: fn(&ClassifiedColumn<'_>) -> Option<MockDirective>,
}

/// The mock chain, highest priority first.
pub const MOCK_RULES: &[MockRule] = &[
    MockRule {
        name: "json_sample",
        apply: json_sample,
    },
    MockRule {
        name: "date_suffix",
        apply: date_suffix,
    },
    MockRule {
        name: "version_name",
        apply: version_name,
    },
    MockRule {
        name: "image_name",
        apply: image_name,
    },
    MockRule {
        name: "video_name",
        apply: video_name,
    },
    MockRule {
        name: "comment_pick",
        apply: comment_pick,
    },
    MockRule {
        name: "validate_bounds",
        apply: validate_bounds,
    },
    MockRule {
        name: "id_suffix",
        apply: id_suffix,
    },
    MockRule {
        name: "name_title",
        apply: name_title,
    },
    MockRule {
        name: "email_suffix",
        apply: email_suffix,
    },
    MockRule {
        name: "number_suffix",
        apply: number_suffix,
    },
    MockRule {
        name: "ip_suffix",
        apply: ip_suffix,
    },
    MockRule {
        name: "base_type",
        apply: base_type,
    },
    MockRule {
        name: UNKNOWN_RULE,
        apply: unknown,
    },
];

/// Outcome of running the mock chain on one column.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    /// The column is left out of the template.
    Omitted,
    Mapped {
        rule: &'static str,
        directive: MockDirective,
    },
}

/// Select the mock directive for a column.
pub fn map_mock(column: &ClassifiedColumn<'_>) -> MockOutcome {
    if column.name() == PRIMARY_KEY_COLUMN {
        return MockOutcome::Omitted;
    }

    MOCK_RULES
        .iter()
        .find_map(|rule| {
            (rule.apply)(column).map(|directive| MockOutcome::Mapped {
                rule: rule.name,
                directive,
            })
        })
        .unwrap_or(MockOutcome::Mapped {
            rule: UNKNOWN_RULE,
            directive: MockDirective::Unknown,
        })
}

fn json_sample(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    column
        .family()
        .is_json()
        .then_some(MockDirective::JsonSample)
}

fn date_suffix(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    column
        .name()
        .ends_with("date")
        .then_some(MockDirective::Date)
}

fn version_name(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    column
        .name()
        .contains("version")
        .then_some(MockDirective::Version)
}

fn image_name(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    column
        .name()
        .contains("image")
        .then_some(MockDirective::ImageUrl)
}

fn video_name(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    column
        .name()
        .contains("video")
        .then_some(MockDirective::VideoUrl)
}

fn comment_pick(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    let comment = column.comment().filter(|comment| comment.contains('/'))?;
    let candidates = comment.split_whitespace().last()?;
    Some(MockDirective::Pick(
        candidates.split('/').map(str::to_string).collect(),
    ))
}

fn validate_bounds(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    let (min, max) = column.bounds().range()?;
    Some(MockDirective::BoundedInteger { min, max })
}

fn id_suffix(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    let name = column.name();
    (name == PRIMARY_KEY_COLUMN || name.ends_with("_id")).then_some(MockDirective::Uuid)
}

fn name_title(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    (column.name() == "name").then_some(MockDirective::Title)
}

fn email_suffix(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    column
        .name()
        .ends_with("email")
        .then_some(MockDirective::Email)
}

fn number_suffix(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    let name = column.name();
    (name.ends_with("number") || name.ends_with("_no"))
        .then(|| MockDirective::NumericString(column.parameter()))
}

fn ip_suffix(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    let name = column.name();
    (name.ends_with("ip") || name.ends_with("ip_address")).then_some(MockDirective::Ip)
}

fn base_type(column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    base_type_directive(column.family(), column.parameter())
}

fn unknown(_column: &ClassifiedColumn<'_>) -> Option<MockDirective> {
    Some(MockDirective::Unknown)
}

/// Default directive of the base-type table, keyed by family.
pub fn base_type_directive(family: &TypeFamily, parameter: Option<u32>) -> Option<MockDirective> {
    let directive = match family {
        TypeFamily::Varchar => MockDirective::LowerString(parameter.unwrap_or(255)),
        TypeFamily::Char => MockDirective::LowerString(parameter.unwrap_or(1)),
        TypeFamily::Text => MockDirective::Paragraph { min: 1, max: 3 },
        TypeFamily::MediumText => MockDirective::Paragraph { min: 2, max: 5 },
        TypeFamily::LongText => MockDirective::Paragraph { min: 3, max: 7 },
        TypeFamily::TinyInt => MockDirective::IntegerRange { max: 255 },
        TypeFamily::SmallInt => MockDirective::IntegerRange { max: 32_767 },
        TypeFamily::Int => MockDirective::IntegerRange { max: 2_147_483_647 },
        TypeFamily::BigInt => MockDirective::IntegerRange {
            max: 9_007_199_254_740_991,
        },
        TypeFamily::Decimal | TypeFamily::Numeric => MockDirective::Float,
        TypeFamily::Boolean => MockDirective::Boolean,
        TypeFamily::Timestamp => MockDirective::DateTime,
        _ => return None,
    };
    Some(directive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_directive_grammar() {
        assert_eq!(
            MockDirective::Pick(vec!["a".to_string(), "b".to_string()]).to_string(),
            r#"@pick(["a","b"])"#
        );
        assert_eq!(
            MockDirective::BoundedInteger {
                min: BoundValue::Int(0),
                max: BoundValue::Int(120),
            }
            .to_string(),
            "@integer(0,120)"
        );
        assert_eq!(
            MockDirective::IntegerRange { max: 255 }.to_string(),
            "@integer(0, 255)"
        );
        assert_eq!(
            MockDirective::NumericString(Some(11)).to_string(),
            r#"@string("number", 11)"#
        );
        assert_eq!(
            MockDirective::LowerString(64).to_string(),
            r#"@string("lower",64)"#
        );
    }

    #[test]
    fn json_sample_is_keyed_with_cardinality() {
        let directive = MockDirective::JsonSample;
        assert_eq!(directive.template_key("profile"), "profile|1");
        assert_eq!(MockDirective::Email.template_key("email"), "email");

        let Value::Mapping(sample) = directive.to_value() else {
            panic!("json sample should be a mapping");
        };
        assert_eq!(sample.len(), 2);
        assert_eq!(sample.get("test1"), Some(&Value::from("test1")));
    }

    #[test]
    fn chain_ends_with_catch_all() {
        let last = MOCK_RULES.last().expect("non-empty chain");
        assert_eq!(last.name, UNKNOWN_RULE);
    }
}
