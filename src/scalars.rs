//! Registration of scalar transforms, keyed by scalar type name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json_bytes::Value;
use tower::BoxError;

/// A scalar transform: total over present (non-null) values, fallible.
pub type TransformFn = Arc<dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync>;

/// The transforms registered for one scalar type.
///
/// A missing direction means that direction is a no-op for this type.
#[derive(Clone, Default)]
pub struct ScalarMapping {
    encode: Option<TransformFn>,
    decode: Option<TransformFn>,
}

impl ScalarMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the transform applied to variables before a request is sent.
    pub fn encode<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.encode = Some(Arc::new(transform));
        self
    }

    /// Register the transform applied to response data before it is emitted.
    pub fn decode<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.decode = Some(Arc::new(transform));
        self
    }
}

impl fmt::Debug for ScalarMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarMapping")
            .field("encode", &self.encode.is_some())
            .field("decode", &self.decode.is_some())
            .finish()
    }
}

/// All registered scalar transforms, keyed by scalar type name.
///
/// A type name absent from the map has no transform at all; such scalars pass
/// through both directions untouched. Immutable once handed to a codec.
#[derive(Clone, Debug, Default)]
pub struct ScalarMap {
    map: HashMap<String, ScalarMapping>,
}

impl ScalarMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `mapping` for the scalar type named `type_name`.
    pub fn with(mut self, type_name: impl Into<String>, mapping: ScalarMapping) -> Self {
        self.map.insert(type_name.into(), mapping);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn encoder(&self, type_name: &str) -> Option<&TransformFn> {
        self.map.get(type_name)?.encode.as_ref()
    }

    pub(crate) fn decoder(&self, type_name: &str) -> Option<&TransformFn> {
        self.map.get(type_name)?.decode.as_ref()
    }

    pub(crate) fn has_encoder(&self, type_name: &str) -> bool {
        self.encoder(type_name).is_some()
    }

    pub(crate) fn has_decoder(&self, type_name: &str) -> bool {
        self.decoder(type_name).is_some()
    }
}
