use serde::{Deserialize, Serialize};
use serde_json_bytes::Value;
use typed_builder::TypedBuilder;

use crate::error::Error;
use crate::json_ext::Object;

/// A GraphQL response as received from a server.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(setter(into)))]
pub struct Response {
    /// The response data.
    #[serde(skip_serializing_if = "Value::is_null", default)]
    #[builder(default)]
    pub data: Value,

    /// The optional graphql errors encountered.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    #[builder(default)]
    pub errors: Vec<Error>,

    /// The optional graphql extensions.
    #[serde(skip_serializing_if = "Object::is_empty", default)]
    #[builder(default)]
    pub extensions: Object,
}
