//! Invocation dispatcher
//!
//! `ResolveDescriptor -> ParseBody -> SelectExecutor -> Execute -> BuildEnvelope`.
//! Every exit, including failures, is an [`InvocationResult`] with a JSON body.

mod body;
#[allow(clippy::module_inception)]
mod dispatcher;
mod envelope;
mod types;


pub use body::parse_body;
pub use dispatcher::Dispatcher;
pub use envelope::{META_KEY, wrap_result};
pub use types::{
    ContentKind, EXECUTION_TIME_HEADER, InvocationRequest, InvocationResult, RawRequest,
    ResultMeta,
};
