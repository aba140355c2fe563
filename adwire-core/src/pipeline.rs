//! # Call Pipeline
//!
//! The ordered set of behaviors applied to every RPC a resolved service
//! client issues, identical for the unary and server-streaming shapes:
//!
//! 1. **Headers** ([`headers`]) - caller-supplied interceptors run first,
//!    then the mandatory identity headers are attached closest to the
//!    transport.
//! 2. **Logging** ([`logging`]) - one structured event per call, with
//!    sensitive header values redacted.
//! 3. **Failure translation** ([`failure`]) - outermost; non-success
//!    transport outcomes carrying trailer-encoded failure details become a
//!    single [`DomainFailure`], everything else passes through raw.
pub mod failure;
pub mod headers;
pub mod logging;
pub mod options;

pub use failure::{DomainFailure, ErrorDetail};
pub use headers::RequestInterceptor;
pub use options::ChannelOptions;
