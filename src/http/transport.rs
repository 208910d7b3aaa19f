//! Pass-through transport around a reqwest client.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Request, Response};

/// Executes one prepared request and returns the raw response.
///
/// Implementations must not retry and must not read the response body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> reqwest::Result<Response>;
}

/// Default transport: forwards to a reqwest [`Client`], observing each request
/// and response on the way through.
///
/// Observation is wired but silent unless traffic logging is enabled.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
    log_traffic: bool,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            log_traffic: false,
        }
    }

    /// Enables debug logging of request lines and response statuses.
    pub fn with_traffic_logging(mut self, enabled: bool) -> Self {
        self.log_traffic = enabled;
        self
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    fn on_request(&self, request: &Request) {
        if self.log_traffic {
            debug!(
                "--> {} {} ({} headers)",
                request.method(),
                request.url(),
                request.headers().len()
            );
        }
    }

    fn on_response(&self, response: &Response) {
        if self.log_traffic {
            debug!(
                "<-- {} {} ({:?} bytes)",
                response.status(),
                response.url(),
                response.content_length()
            );
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: Request) -> reqwest::Result<Response> {
        self.on_request(&request);
        let response = self.client.execute(request).await?;
        self.on_response(&response);
        Ok(response)
    }
}
