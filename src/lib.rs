//! Schema-directed encoding and decoding of custom GraphQL scalar values.
//!
//! Given a query and the schema it was written against, this crate statically
//! resolves every position in request variables and response data that holds
//! a custom scalar with a registered transform, then rewrites exactly those
//! positions: variables are encoded before a request is forwarded, response
//! data is decoded before it reaches the caller. Everything else passes
//! through untouched.
//!
//! Resolution is purely static: it never looks at runtime values, only at the
//! document and the schema, so resolved paths can be (and are) memoized per
//! query string.

#![cfg_attr(feature = "failfast", allow(unreachable_code))]

macro_rules! failfast_debug {
    ($($tokens:tt)+) => {{
        tracing::debug!($($tokens)+);
        #[cfg(feature = "failfast")]
        panic!(
            "failfast triggered. \
            Please remove the feature failfast if you don't want to see these panics"
        );
    }};
}

mod codec;
mod error;
mod json_ext;
mod layers;
mod request;
mod resolve;
mod response;
mod scalars;
mod spec;

pub use codec::*;
pub use error::*;
pub use json_ext::*;
pub use layers::*;
pub use request::*;
pub use resolve::*;
pub use response::*;
pub use scalars::*;
pub use spec::*;
