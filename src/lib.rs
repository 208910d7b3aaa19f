//! Fluent construction and execution of HTTP requests with typed, classified
//! responses.
//!
//! Requests are assembled with [`HttpRequestBuilder`], sent through a
//! [`Transport`], and answered with an [`HttpResponse`] whose body is decoded
//! into an [`Envelope`]. Server errors (5xx) are reported as
//! [`Error::Server`]; client errors (4xx) are returned as data.

pub mod builder;
pub mod config;
pub mod context;
pub mod debug;
pub mod error;
pub mod http;
pub mod response;

pub use builder::HttpRequestBuilder;
pub use config::ClientConfig;
pub use context::RequestContext;
pub use debug::{DebugCollector, DiagnosticSink, HttpStatement};
pub use error::{BodyFormat, Error, NetworkFailure, Result};
pub use http::{HttpTransport, Transport};
pub use response::{Envelope, HttpResponse};
