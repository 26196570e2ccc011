//! Artifact emitters for stencil.
//!
//! This crate turns table documents into mock templates (`<table>.yml`) and
//! validator modules (`<table>.schema.js`), and drives whole model
//! directories through the rule chains with [`TransformEngine`].

pub mod engine;
pub mod errors;
pub mod mock;
pub mod model;
pub mod output;
pub mod validator;

pub use engine::{Artifacts, MOCK_EXTENSION, TransformEngine, VALIDATOR_EXTENSION, transform};
pub use errors::EmitError;
pub use mock::{MockEntry, MockTemplate};
pub use model::{
    ArtifactTargets, ColumnDegradation, DocumentFailure, DocumentReport, EngineOptions,
    RunReport, RunTotals,
};
pub use validator::{ValidatorField, ValidatorModule};
