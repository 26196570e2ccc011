//! Priority-ordered rule chains mapping classified columns to directives.
//!
//! Two independent chains share the column shape: [`MOCK_RULES`] picks the
//! synthetic-value directive of a column and [`VALIDATION_RULES`] picks its
//! validation rule. Both are plain ordered slices evaluated first-match-wins.

pub mod mock;
pub mod validate;

pub use mock::{
    MOCK_RULES, MockDirective, MockOutcome, MockRule, PRIMARY_KEY_COLUMN, UNKNOWN_RULE,
    base_type_directive, map_mock,
};
pub use validate::{
    RuleKind, VALIDATION_RULES, ValidationRule, ValidationRuleEntry, field_expression,
    map_validation,
};
