//! Mounts a [`ScalarCodec`] around a service that executes GraphQL requests.

use std::sync::Arc;
use std::task::Poll;

use futures::future::BoxFuture;
use tower::{BoxError, Layer};
use tower_service::Service;

use crate::codec::ScalarCodec;
use crate::request::Request;
use crate::response::Response;

/// Wraps an inner service so that variables are encoded before the request
/// reaches it and response data is decoded before it is returned.
#[derive(Clone)]
pub struct ScalarCodecLayer {
    codec: Arc<ScalarCodec>,
}

impl ScalarCodecLayer {
    pub fn new(codec: Arc<ScalarCodec>) -> Self {
        Self { codec }
    }
}

impl<S> Layer<S> for ScalarCodecLayer
where
    S: Service<Request, Response = Response, Error = BoxError>,
{
    type Service = ScalarCodecService<S>;

    fn layer(&self, service: S) -> Self::Service {
        ScalarCodecService {
            codec: Arc::clone(&self.codec),
            service,
        }
    }
}

pub struct ScalarCodecService<S>
where
    S: Service<Request, Response = Response, Error = BoxError>,
{
    codec: Arc<ScalarCodec>,
    service: S,
}

impl<S> Service<Request> for ScalarCodecService<S>
where
    S: Service<Request, Response = Response, Error = BoxError>,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Response, BoxError>>;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let codec = Arc::clone(&self.codec);

        let req = match codec.encode_request(req) {
            Ok(req) => req,
            Err(err) => return Box::pin(futures::future::ready(Err(err.into()))),
        };
        let query = req.query.clone();
        let response = self.service.call(req);

        Box::pin(async move {
            let response = response.await?;
            codec.decode_response(&query, response).map_err(Into::into)
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::{json, Value};
    use test_log::test;
    use tower::{ServiceBuilder, ServiceExt};

    use super::*;
    use crate::json_ext::Object;
    use crate::scalars::{ScalarMap, ScalarMapping};
    use crate::spec::Schema;

    fn codec() -> Arc<ScalarCodec> {
        let schema: Schema = "
        scalar EncodedString
        type Query {
            echo(value: EncodedString): EncodedString
        }"
        .parse()
        .expect("could not parse schema");
        let scalars = ScalarMap::new().with(
            "EncodedString",
            ScalarMapping::new()
                .encode(|value| match value {
                    Value::String(s) => {
                        Ok(Value::String(format!("enc:{}", s.as_str()).into()))
                    }
                    other => Ok(other),
                })
                .decode(|value| match value {
                    Value::String(s) => Ok(Value::String(
                        s.as_str().strip_prefix("enc:").unwrap_or(s.as_str()).to_string().into(),
                    )),
                    other => Ok(other),
                }),
        );
        Arc::new(ScalarCodec::new(Arc::new(schema), scalars))
    }

    #[test(tokio::test)]
    async fn encodes_outgoing_variables_and_decodes_incoming_data() {
        // the inner service answers with the variables it observed
        let service = ServiceBuilder::new()
            .layer(ScalarCodecLayer::new(codec()))
            .service(tower::service_fn(|req: Request| async move {
                let observed = req
                    .variables
                    .get("value")
                    .cloned()
                    .unwrap_or_default();
                let mut data = Object::new();
                data.insert("echo", observed);
                Ok::<_, BoxError>(Response::builder().data(Value::Object(data)).build())
            }));

        let response = service
            .oneshot(
                Request::builder()
                    .query("query($value: EncodedString) { echo(value: $value) }")
                    .variables(match json!({"value": "a"}) {
                        Value::Object(object) => object,
                        _ => unreachable!(),
                    })
                    .build(),
            )
            .await
            .expect("service call failed");

        // the wire saw "enc:a", the caller sees "a" again
        assert_eq!(response.data, json!({"echo": "a"}));
    }
}
