//! Core contracts for stencil.
//!
//! This crate defines the column descriptor model, the type classifier and
//! the table document loader shared by the rule chains and the emitters.

pub mod error;
pub mod loader;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use loader::{DOCUMENT_EXTENSIONS, is_document_path};
pub use schema::{BoundValue, Bounds, ClassifiedColumn, ColumnDescriptor, TableDocument};
pub use types::{Classification, Degradation, TypeClass, TypeFamily, classify};
