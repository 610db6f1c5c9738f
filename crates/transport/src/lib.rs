//! `backoffice-transport`: HTTP plumbing for the back-office client.
//!
//! Every request goes through [`ApiClient::send`], which runs the response
//! interceptors registered at construction (most importantly the
//! [`FaultClassifier`]) before the caller sees a failure.

pub mod auth_api;
pub mod client;
pub mod error;
pub mod fault;
pub mod outcome;
pub mod path;
pub mod request;
pub mod transport;

pub use client::{ApiClient, ApiClientBuilder, ResponseInterceptor};
pub use error::{ApiError, codes};
pub use fault::{FaultAction, FaultClassifier};
pub use outcome::{ApiOutcome, field_errors_from_body};
pub use path::{PUBLIC_PATH_PREFIXES, PublicPaths, resolve_request_path};
pub use request::{HttpRequest, HttpResponse, Method, RequestDescriptor};
pub use transport::{ReqwestTransport, Transport, TransportFailure};
