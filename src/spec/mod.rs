//! Typed representation of GraphQL schemas and query documents.

mod field_type;
mod fragments;
mod query;
mod schema;
mod selection;

use displaydoc::Display;
use thiserror::Error;

pub(crate) use field_type::FieldType;
pub(crate) use fragments::Fragments;
pub use query::Query;
pub(crate) use query::OperationKind;
pub use schema::Schema;
pub(crate) use selection::Selection;

/// GraphQL parsing errors.
#[derive(Error, Display, Debug, Clone)]
#[non_exhaustive]
pub enum SpecError {
    /// parsing error(s): {0}
    ParsingError(String),
}
