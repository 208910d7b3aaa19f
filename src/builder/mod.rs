//! Fluent request builder.
//!
//! A builder collects the method, URL, headers, query parameters, body and
//! timeout of one request. Nothing touches the network until
//! [`HttpRequestBuilder::execute`] or [`HttpRequestBuilder::get_result`] is
//! awaited.
//!
//! ```no_run
//! # async fn demo() -> hrb::Result<()> {
//! use hrb::{HttpRequestBuilder, RequestContext};
//!
//! let mut request = HttpRequestBuilder::<serde_json::Value>::get(
//!     RequestContext::background(),
//!     "https://api.example.com/v1/items",
//! )
//! .set_query_params([("page", "1")]);
//!
//! let response = request.get_result().await?;
//! println!("{} success={}", response.status, response.result.success);
//! # Ok(())
//! # }
//! ```

mod body;
mod execute;

use log::error;
use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ClientConfig, DEFAULT_TIMEOUT};
use crate::context::RequestContext;
use crate::debug::DiagnosticSink;
use crate::error::{BodyFormat, Result};
use crate::http::HttpTransport;
use crate::response::HttpResponse;

/// Builds and executes one HTTP request whose response body is decoded into
/// an [`Envelope<E>`](crate::Envelope).
///
/// A builder is meant for a single logical request. Executing it again sends
/// the request again and replaces the previously captured response.
pub struct HttpRequestBuilder<E, T = HttpTransport> {
    url: String,
    method: Method,
    headers: BTreeMap<String, String>,
    query_params: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
    body_error: Option<(BodyFormat, String)>,
    timeout: Duration,
    strict_decoding: bool,
    transport: T,
    context: RequestContext,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
    response: Option<HttpResponse<E>>,
    exec_time: Duration,
}

impl<E> HttpRequestBuilder<E, HttpTransport> {
    pub fn new(method: Method, ctx: RequestContext, url: impl Into<String>) -> Self {
        Self::from_parts(method, ctx, url.into(), HttpTransport::default())
    }

    pub fn get(ctx: RequestContext, url: impl Into<String>) -> Self {
        Self::new(Method::GET, ctx, url)
    }

    pub fn post(ctx: RequestContext, url: impl Into<String>) -> Self {
        Self::new(Method::POST, ctx, url)
    }

    pub fn put(ctx: RequestContext, url: impl Into<String>) -> Self {
        Self::new(Method::PUT, ctx, url)
    }

    pub fn patch(ctx: RequestContext, url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, ctx, url)
    }

    pub fn delete(ctx: RequestContext, url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, ctx, url)
    }

    /// Creates a builder with the timeout, decoding mode and transport taken
    /// from `config`.
    pub fn configured(
        method: Method,
        ctx: RequestContext,
        url: impl Into<String>,
        config: &ClientConfig,
    ) -> Result<Self> {
        let transport = config.transport()?;
        Ok(
            Self::from_parts(method, ctx, url.into(), transport)
                .set_timeout(config.timeout)
                .set_strict_decoding(config.strict_decoding),
        )
    }
}

impl<E, T> HttpRequestBuilder<E, T> {
    fn from_parts(method: Method, ctx: RequestContext, url: String, transport: T) -> Self {
        Self {
            url,
            method,
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            body: None,
            body_error: None,
            timeout: DEFAULT_TIMEOUT,
            strict_decoding: true,
            transport,
            context: ctx,
            diagnostics: None,
            response: None,
            exec_time: Duration::ZERO,
        }
    }

    /// Swaps the transport the request is sent through.
    pub fn with_transport<U>(self, transport: U) -> HttpRequestBuilder<E, U> {
        HttpRequestBuilder {
            url: self.url,
            method: self.method,
            headers: self.headers,
            query_params: self.query_params,
            body: self.body,
            body_error: self.body_error,
            timeout: self.timeout,
            strict_decoding: self.strict_decoding,
            transport,
            context: self.context,
            diagnostics: self.diagnostics,
            response: None,
            exec_time: Duration::ZERO,
        }
    }

    /// Attaches a sink that receives a statement for every decoded execution.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Replaces all headers. Names are kept as supplied.
    pub fn set_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Replaces all query parameters.
    pub fn set_query_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query_params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Overrides the default 30 second timeout. A zero timeout disables the
    /// per-request limit; the context deadline still applies.
    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// When disabled, a body that does not decode into the envelope leaves
    /// the envelope at its default instead of failing the call.
    pub fn set_strict_decoding(mut self, strict: bool) -> Self {
        self.strict_decoding = strict;
        self
    }

    /// Serializes `value` as the JSON body and sets `Content-Type: application/json`.
    ///
    /// A serialization failure is logged and reported when the request is executed.
    pub fn set_json_body<B: Serialize + ?Sized>(self, value: &B) -> Self {
        self.set_body(BodyFormat::Json, value)
    }

    /// Serializes `value` as the XML body and sets `Content-Type: application/xml`.
    ///
    /// A serialization failure is logged and reported when the request is executed.
    pub fn set_xml_body<B: Serialize + ?Sized>(self, value: &B) -> Self {
        self.set_body(BodyFormat::Xml, value)
    }

    fn set_body<B: Serialize + ?Sized>(mut self, format: BodyFormat, value: &B) -> Self {
        match body::encode(format, value) {
            Ok(bytes) => {
                self.body = Some(bytes);
                self.body_error = None;
                self.headers
                    .retain(|name, _| !name.eq_ignore_ascii_case("content-type"));
                self.headers.insert(
                    "Content-Type".to_string(),
                    format.content_type().to_string(),
                );
            }
            Err(message) => {
                error!("Failed to encode {} request body: {}", format, message);
                self.body_error = Some((format, message));
            }
        }
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.query_params
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn strict_decoding(&self) -> bool {
        self.strict_decoding
    }

    /// Response captured by the last [`execute`](Self::execute), or by a
    /// [`get_result`](Self::get_result) that ended in an error after the
    /// round trip. After a network or body read failure only `url` and
    /// `method` are filled in.
    pub fn last_response(&self) -> Option<&HttpResponse<E>> {
        self.response.as_ref()
    }

    /// Wall-clock time of the last round trip.
    pub fn exec_time(&self) -> Duration {
        self.exec_time
    }
}
