use displaydoc::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::BoxError;

use crate::json_ext::{Object, Path};
use crate::spec::SpecError;

/// Error raised while applying scalar transforms to a request or a response.
///
/// A failing transform is fatal for the operation it was applied to: the
/// caller receives no rewritten tree, since a partially converted one would be
/// inconsistent downstream.
#[derive(Error, Display, Debug)]
pub enum CodecError {
    /// query could not be parsed: {0}
    Parse(#[from] SpecError),

    /// could not {direction} scalar '{type_name}' at path '{path}': {source}
    Transform {
        /// Which direction failed, `encode` or `decode`.
        direction: &'static str,

        /// Name of the scalar type whose transform failed.
        type_name: String,

        /// The resolved path the transform was being applied at.
        path: Path,

        /// The error returned by the transform itself.
        #[source]
        source: BoxError,
    },
}

/// A GraphQL error as found in the `errors` array of a response.
#[derive(Error, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Default)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct Error {
    /// The error message.
    pub message: String,

    /// The locations of the error in the query.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub locations: Vec<Location>,

    /// The path of the error.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<Path>,

    /// The optional graphql extensions.
    #[serde(skip_serializing_if = "Object::is_empty", default)]
    pub extensions: Object,
}

/// A location in a query.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    /// The line number.
    pub line: u32,

    /// The column number.
    pub column: u32,
}
