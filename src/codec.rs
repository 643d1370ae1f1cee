use std::sync::Arc;

use dashmap::DashMap;
use serde_json_bytes::Value;

use crate::error::CodecError;
use crate::json_ext::map_at_path;
use crate::request::Request;
use crate::resolve::{resolve_input_paths, resolve_output_paths, ScalarPath};
use crate::response::Response;
use crate::scalars::ScalarMap;
use crate::spec::{Query, Schema, SpecError};

/// Applies registered scalar transforms to requests and responses.
///
/// Holds the schema and the scalar map for its whole lifetime and memoizes
/// resolved paths per query string, since resolution is a pure function of
/// the document. Cheap to share: all state is immutable apart from the memo,
/// which tolerates concurrent duplicate computation.
#[derive(Debug)]
pub struct ScalarCodec {
    schema: Arc<Schema>,
    scalars: ScalarMap,
    resolved: DashMap<String, Arc<ResolvedPaths>>,
}

#[derive(Debug)]
struct ResolvedPaths {
    input: Vec<ScalarPath>,
    output: Vec<ScalarPath>,
}

impl ScalarCodec {
    pub fn new(schema: Arc<Schema>, scalars: ScalarMap) -> Self {
        Self {
            schema,
            scalars,
            resolved: DashMap::new(),
        }
    }

    /// Resolve and memoize the paths for `query` ahead of time.
    ///
    /// Optional: both codec directions resolve lazily. This surfaces parse
    /// errors eagerly instead of falling back to pass-through.
    pub fn warm_up(&self, query: &str) -> Result<(), CodecError> {
        self.resolve(query).map(|_| ()).map_err(CodecError::from)
    }

    fn resolve(&self, query: &str) -> Result<Arc<ResolvedPaths>, SpecError> {
        if let Some(resolved) = self.resolved.get(query) {
            return Ok(Arc::clone(&resolved));
        }
        let parsed = Query::parse(query, &self.schema)?;
        let resolved = Arc::new(ResolvedPaths {
            input: resolve_input_paths(&parsed, &self.schema, &self.scalars),
            output: resolve_output_paths(&parsed, &self.schema, &self.scalars),
        });
        self.resolved
            .insert(query.to_string(), Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Encode the request's variables with the registered encode transforms.
    ///
    /// Requests whose document resolves to no input paths come back
    /// untouched. An unparsable document is passed through as well: the host
    /// pipeline is the place where that failure surfaces.
    pub fn encode_request(&self, mut request: Request) -> Result<Request, CodecError> {
        if self.scalars.is_empty() || request.variables.is_empty() {
            return Ok(request);
        }
        let resolved = match self.resolve(&request.query) {
            Ok(resolved) => resolved,
            Err(err) => {
                failfast_debug!("could not parse query, leaving variables as-is: {}", err);
                return Ok(request);
            }
        };
        if resolved.input.is_empty() {
            return Ok(request);
        }

        let mut variables = Value::Object(std::mem::take(&mut request.variables));
        for scalar_path in &resolved.input {
            let encode = match self.scalars.encoder(&scalar_path.type_name) {
                Some(encode) => encode,
                None => continue,
            };
            variables = map_at_path(variables, &scalar_path.path, encode.as_ref()).map_err(
                |source| CodecError::Transform {
                    direction: "encode",
                    type_name: scalar_path.type_name.clone(),
                    path: scalar_path.path.clone(),
                    source,
                },
            )?;
        }
        if let Value::Object(variables) = variables {
            request.variables = variables;
        }
        Ok(request)
    }

    /// Decode the response's data with the registered decode transforms.
    ///
    /// `query` is the document the response answers. Responses without data
    /// pass through unchanged.
    pub fn decode_response(
        &self,
        query: &str,
        mut response: Response,
    ) -> Result<Response, CodecError> {
        if self.scalars.is_empty() || response.data.is_null() {
            return Ok(response);
        }
        let resolved = match self.resolve(query) {
            Ok(resolved) => resolved,
            Err(err) => {
                failfast_debug!("could not parse query, leaving data as-is: {}", err);
                return Ok(response);
            }
        };
        if resolved.output.is_empty() {
            return Ok(response);
        }

        let mut data = std::mem::take(&mut response.data);
        for scalar_path in &resolved.output {
            let decode = match self.scalars.decoder(&scalar_path.type_name) {
                Some(decode) => decode,
                None => continue,
            };
            data = map_at_path(data, &scalar_path.path, decode.as_ref()).map_err(|source| {
                CodecError::Transform {
                    direction: "decode",
                    type_name: scalar_path.type_name.clone(),
                    path: scalar_path.path.clone(),
                    source,
                }
            })?;
        }
        response.data = data;
        Ok(response)
    }
}
