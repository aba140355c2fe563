//! # Adwire Core
//!
//! `adwire-core` is a dynamic client library for a versioned advertising API
//! served over gRPC. Instead of hand-writing per-version imports, callers ask
//! an [`client::AdsClient`] for "a service client named X in version V" or
//! "a message type named Y" and get live instances resolved from a versioned
//! descriptor catalog.
//!
//! ## Key Components
//!
//! * **[`catalog::Catalog`]:** A read-only registry of message, enum and
//!   service descriptors, partitioned per API version into the `common`,
//!   `enums`, `errors`, `resources` and `services` sub-namespaces.
//! * **[`client::AdsClient`]:** The main entry point. It owns the client
//!   configuration and resolves service clients and message types by name.
//! * **[`client::ServiceClient`]:** A resolved, ready-to-call service client.
//!   Every RPC it issues passes through a fixed pipeline: identity headers,
//!   structured logging and uniform failure translation.
//! * **[`pipeline::DomainFailure`]:** The single normalized error shape all
//!   API-level failures are translated into.
//!
//! ## Calling conventions
//!
//! The core is async: resolved service clients suspend only at the transport
//! boundary. A [`client::blocking`] facade wraps any resolved client for
//! synchronous callers; it blocks on a caller-provided runtime handle and the
//! core never starts or owns a runtime of its own.
//!
//! ## Re-exports
//!
//! This crate re-exports `prost`, `prost-reflect` and `tonic` to ensure that
//! consumers use compatible versions of these underlying dependencies.
pub mod catalog;
pub mod client;
pub mod config;
pub mod pipeline;
pub mod transport;

// Re-exports
pub use prost;
pub use prost_reflect;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
