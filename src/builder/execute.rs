//! Request execution, response decoding and status classification.

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Request, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Instant;

use super::HttpRequestBuilder;
use crate::debug::{HTTP_CATEGORY, HttpStatement, format_duration};
use crate::error::{Error, NetworkFailure, Result};
use crate::http::{Transport, compose_url};
use crate::response::{Envelope, HttpResponse};

impl<E, T> HttpRequestBuilder<E, T>
where
    E: DeserializeOwned + Default,
    T: Transport,
{
    /// Sends the request and captures status, headers and body without
    /// decoding. The result is available through [`last_response`](Self::last_response).
    ///
    /// Any HTTP status counts as success here; only failures to build, send
    /// or read the request are errors.
    #[tracing::instrument(skip(self), fields(method = %self.method, url = %self.url))]
    pub async fn execute(&mut self) -> Result<()> {
        let response = self.send().await?;
        self.response = Some(response);
        Ok(())
    }

    /// Sends the request, decodes the body into an [`Envelope<E>`] and
    /// classifies the status.
    ///
    /// 4xx responses are returned as ordinary results. 5xx responses become
    /// [`Error::Server`]; the captured response then stays on the builder.
    #[tracing::instrument(skip(self), fields(method = %self.method, url = %self.url))]
    pub async fn get_result(&mut self) -> Result<HttpResponse<E>> {
        let mut response = self.send().await?;

        // A bare `null` body leaves the envelope at its default.
        let decoded = serde_json::from_slice::<Option<Envelope<E>>>(&response.body)
            .map(Option::unwrap_or_default);
        match decoded {
            Ok(envelope) => response.result = envelope,
            Err(e) if self.strict_decoding => {
                self.response = Some(response);
                return Err(Error::Unmarshal(e));
            }
            Err(e) => debug!(
                "Ignoring undecodable body of {} {}: {}",
                response.method, response.url, e
            ),
        }

        self.record(&response);

        if response.status_code >= 500 {
            let err = Error::Server {
                method: response.method.clone(),
                url: response.url.clone(),
                status: response.status_code,
            };
            self.response = Some(response);
            return Err(err);
        }

        Ok(response)
    }

    async fn send(&mut self) -> Result<HttpResponse<E>> {
        self.response = None;

        let start = Instant::now();
        let result = self.round_trip().await;
        self.exec_time = start.elapsed();

        debug!("{} {} finished in {:?}", self.method, self.url, self.exec_time);

        if let Err(Error::Network { method, url, .. } | Error::BodyRead { method, url, .. }) =
            &result
        {
            self.response = Some(HttpResponse::new(url.clone(), method.clone()));
        }
        result
    }

    async fn round_trip(&self) -> Result<HttpResponse<E>> {
        if let Some((format, message)) = &self.body_error {
            return Err(Error::Encoding {
                format: *format,
                message: message.clone(),
            });
        }

        let final_url = compose_url(&self.url, &self.query_params).map_err(|source| {
            Error::InvalidUrl {
                url: self.url.clone(),
                source,
            }
        })?;
        let request = self.build_request(&final_url)?;

        debug!("Sending {} {}...", self.method, final_url);

        let exchange = async {
            match self.transport.execute(request).await {
                Ok(response) => read_response(response, &self.method, &final_url).await,
                Err(e) => Err(network_error(
                    &self.method,
                    &final_url,
                    NetworkFailure::Transport(e),
                )),
            }
        };

        match self.context.run(exchange).await {
            Ok(result) => result,
            Err(failure) => Err(network_error(&self.method, &final_url, failure)),
        }
    }

    fn build_request(&self, final_url: &str) -> Result<Request> {
        let url = Url::parse(final_url).map_err(|source| Error::InvalidUrl {
            url: final_url.to_string(),
            source,
        })?;

        let mut request = Request::new(self.method.clone(), url);
        if !self.timeout.is_zero() {
            *request.timeout_mut() = Some(self.timeout);
        }

        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                self.construction_error(final_url, format!("invalid header name {:?}: {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                self.construction_error(
                    final_url,
                    format!("invalid value for header {}: {}", name, e),
                )
            })?;
            request.headers_mut().insert(header_name, header_value);
        }

        if let Some(body) = &self.body {
            *request.body_mut() = Some(body.clone().into());
        }

        Ok(request)
    }

    fn construction_error(&self, url: &str, reason: String) -> Error {
        Error::RequestConstruction {
            method: self.method.clone(),
            url: url.to_string(),
            reason,
        }
    }

    fn record(&self, response: &HttpResponse<E>) {
        let Some(sink) = &self.diagnostics else {
            return;
        };

        let statement = HttpStatement {
            time: format_duration(self.exec_time),
            status: response.status_code,
            timeout: format_duration(self.timeout),
            method: self.method.to_string(),
            url: response.url.clone(),
            body: self
                .body
                .as_deref()
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default(),
            query_params: self.query_params.clone(),
            headers: self.headers.clone(),
            error: String::new(),
            response: None,
            duration: self.exec_time,
        };

        sink.cat(HTTP_CATEGORY);
        sink.add_statement(HTTP_CATEGORY, self.exec_time, vec![statement]);
        sink.calculate_total_time();
    }
}

fn network_error(method: &Method, url: &str, source: NetworkFailure) -> Error {
    Error::Network {
        method: method.clone(),
        url: url.to_string(),
        source,
    }
}

async fn read_response<E: Default>(
    response: Response,
    method: &Method,
    url: &str,
) -> Result<HttpResponse<E>> {
    let status = response.status();
    let headers = collect_headers(response.headers());

    let body = response.bytes().await.map_err(|source| {
        // A timeout while streaming the body is still a timeout of the round trip.
        if source.is_timeout() {
            network_error(method, url, NetworkFailure::Transport(source))
        } else {
            Error::BodyRead {
                method: method.clone(),
                url: url.to_string(),
                source,
            }
        }
    })?;

    let mut captured = HttpResponse::new(url, method.clone());
    captured.status = status_line(status);
    captured.status_code = status.as_u16();
    captured.headers = headers;
    captured.body = body.to_vec();
    Ok(captured)
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;
    use crate::debug::{DebugCollector, DiagnosticSink, MockDiagnosticSink};
    use crate::http::MockTransport;
    use mockall::predicate::eq;
    use mockito::Matcher;
    use serde::Deserialize;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Item {
        id: u32,
    }

    fn canned(status: u16, body: &'static str) -> reqwest::Result<Response> {
        let response = http::Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        Ok(Response::from(response))
    }

    fn items_request() -> HttpRequestBuilder<Item> {
        HttpRequestBuilder::get(RequestContext::background(), "http://api.test/items")
    }

    /// Accepts connections and never answers.
    async fn silent_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_get_result_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/items")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("x-rate-limit", "10")
            .with_body(r#"{"success":true,"data":{"id":1}}"#)
            .create_async()
            .await;

        let url = format!("{}/v1/items", server.url());
        let mut request = HttpRequestBuilder::<Item>::get(RequestContext::background(), url.clone())
            .set_query_params([("page", "1")]);
        let response = request.get_result().await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.status, "200 OK");
        assert_eq!(response.method, Method::GET);
        assert_eq!(response.url, format!("{}?page=1", url));
        assert_eq!(response.headers["x-rate-limit"], "10");
        assert!(response.result.success);
        assert_eq!(response.result.data, Item { id: 1 });
        assert!(response.errors_map.is_empty());
        assert!(request.last_response().is_none());
    }

    #[tokio::test]
    async fn test_get_result_server_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/items")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body(r#"{"success":false,"data":null}"#)
            .create_async()
            .await;

        let url = format!("{}/v1/items", server.url());
        let mut request = HttpRequestBuilder::<Item>::get(RequestContext::background(), url.clone())
            .set_query_params([("page", "1")]);
        let err = request.get_result().await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, Error::Server { status: 503, .. }));
        let message = err.to_string();
        assert!(message.contains("GET"));
        assert!(message.contains(&format!("{}?page=1", url)));
        assert!(message.contains("503"));

        let retained = request.last_response().unwrap();
        assert_eq!(retained.status_code, 503);
        assert_eq!(retained.text(), r#"{"success":false,"data":null}"#);
    }

    #[tokio::test]
    async fn test_get_result_client_error_is_data() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/items")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "test"})))
            .with_status(404)
            .with_body(r#"{"success":false,"data":null}"#)
            .create_async()
            .await;

        let mut request = HttpRequestBuilder::<Value>::post(
            RequestContext::background(),
            format!("{}/v1/items", server.url()),
        )
        .set_json_body(&json!({"name": "test"}));
        let response = request.get_result().await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status_code, 404);
        assert_eq!(response.status, "404 Not Found");
        assert!(response.is_client_error());
        assert!(!response.result.success);
        assert_eq!(response.result.data, Value::Null);
    }

    #[tokio::test]
    async fn test_status_classification() {
        for status in [200u16, 201, 202, 400, 401, 404, 422, 499, 500, 502, 503, 599] {
            let mut transport = MockTransport::new();
            transport
                .expect_execute()
                .times(1)
                .returning(move |_| canned(status, r#"{"success":true,"data":{"id":7}}"#));

            let mut request = items_request().with_transport(transport);
            let result = request.get_result().await;

            if status >= 500 {
                let err = result.unwrap_err();
                assert_eq!(err.status(), Some(status), "status {}", status);
            } else {
                let response = result.unwrap();
                assert_eq!(response.status_code, status);
                assert_eq!(response.result.data, Item { id: 7 });
            }
        }
    }

    #[tokio::test]
    async fn test_strict_decoding_rejects_non_json() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| canned(200, "<html>maintenance</html>"));

        let mut request = items_request().with_transport(transport);
        let err = request.get_result().await.unwrap_err();

        assert!(matches!(err, Error::Unmarshal(_)));
        assert_eq!(
            request.last_response().unwrap().text(),
            "<html>maintenance</html>"
        );
    }

    #[tokio::test]
    async fn test_strict_decoding_applies_to_client_errors() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| canned(400, "bad request"));

        let mut request = items_request().with_transport(transport);
        let err = request.get_result().await.unwrap_err();
        assert!(matches!(err, Error::Unmarshal(_)));
    }

    #[tokio::test]
    async fn test_lenient_decoding_yields_default_envelope() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| canned(200, "<html>maintenance</html>"));

        let mut request = items_request()
            .set_strict_decoding(false)
            .with_transport(transport);
        let response = request.get_result().await.unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.result, Envelope::default());
        assert_eq!(response.text(), "<html>maintenance</html>");
    }

    #[tokio::test]
    async fn test_lenient_decoding_still_classifies_server_errors() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| canned(502, "bad gateway"));

        let mut request = items_request()
            .set_strict_decoding(false)
            .with_transport(transport);
        let err = request.get_result().await.unwrap_err();
        assert!(matches!(err, Error::Server { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_execute_captures_raw_response_without_decoding() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/v1/items/1")
            .match_header("x-request-id", "abc")
            .with_status(500)
            .with_body("not json")
            .create_async()
            .await;

        let mut sink = MockDiagnosticSink::new();
        sink.expect_cat().never();
        sink.expect_add_statement().never();
        sink.expect_calculate_total_time().never();

        let mut request = HttpRequestBuilder::<Item>::delete(
            RequestContext::background(),
            format!("{}/v1/items/1", server.url()),
        )
        .set_headers([("X-Request-Id", "abc")])
        .with_diagnostics(Arc::new(sink));
        request.execute().await.unwrap();

        mock.assert_async().await;
        let response = request.last_response().unwrap();
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, b"not json");
        assert_eq!(response.result, Envelope::default());
    }

    #[tokio::test]
    async fn test_execute_unreachable_host() {
        let mut request = HttpRequestBuilder::<Item>::get(
            RequestContext::background(),
            "http://127.0.0.1:9/items",
        )
        .set_timeout(Duration::from_secs(5));
        let err = request.execute().await.unwrap_err();

        assert!(err.is_network());
        let placeholder = request.last_response().unwrap();
        assert_eq!(placeholder.url, "http://127.0.0.1:9/items");
        assert_eq!(placeholder.method, Method::GET);
        assert_eq!(placeholder.status_code, 0);
        assert!(placeholder.body.is_empty());
    }

    #[tokio::test]
    async fn test_zero_timeout_means_no_limit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/items")
            .with_status(200)
            .with_body(r#"{"success":true,"data":{"id":2}}"#)
            .create_async()
            .await;

        let mut request = HttpRequestBuilder::<Item>::get(
            RequestContext::background(),
            format!("{}/v1/items", server.url()),
        )
        .set_timeout(Duration::ZERO);
        let response = request.get_result().await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.result.data, Item { id: 2 });
    }

    #[tokio::test]
    async fn test_zero_timeout_is_not_sent_to_transport() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|request: &Request| request.timeout().is_none())
            .times(1)
            .returning(|_| canned(200, r#"{"success":true}"#));

        let mut request = items_request()
            .set_timeout(Duration::ZERO)
            .with_transport(transport);
        request.execute().await.unwrap();
    }

    #[tokio::test]
    async fn test_null_body_decodes_to_default_envelope() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| canned(200, "null"));

        let mut request = items_request().with_transport(transport);
        let response = request.get_result().await.unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.result, Envelope::default());
    }

    #[tokio::test]
    async fn test_json_body_replaces_lowercase_content_type() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|request: &Request| {
                let values: Vec<_> = request.headers().get_all("content-type").iter().collect();
                values.len() == 1 && values[0] == "application/json"
            })
            .times(1)
            .returning(|_| canned(200, r#"{"success":true}"#));

        let mut request = HttpRequestBuilder::<Value>::post(
            RequestContext::background(),
            "http://api.test/items",
        )
        .set_headers([("content-type", "text/plain")])
        .set_json_body(&json!({"name": "test"}))
        .with_transport(transport);

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers()["Content-Type"], "application/json");
        request.get_result().await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let url = silent_server().await;

        let mut request = HttpRequestBuilder::<Item>::get(RequestContext::background(), url)
            .set_timeout(Duration::from_millis(100));
        let err = request.get_result().await.unwrap_err();

        assert!(err.is_network());
        assert!(err.is_timeout());
        assert!(request.exec_time() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_context_deadline_is_network_error() {
        let url = silent_server().await;

        let ctx = RequestContext::background().with_timeout(Duration::from_millis(100));
        let mut request = HttpRequestBuilder::<Item>::get(ctx, url);
        let err = request.execute().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Network {
                source: NetworkFailure::DeadlineExceeded,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_transport() {
        let token = CancellationToken::new();
        token.cancel();

        let mut transport = MockTransport::new();
        transport.expect_execute().never();

        let ctx = RequestContext::background().with_cancellation(token);
        let mut request = HttpRequestBuilder::<Item>::get(ctx, "http://api.test/items")
            .with_transport(transport);
        let err = request.get_result().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Network {
                source: NetworkFailure::Cancelled,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_request_carries_timeout_headers_and_body() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|request: &Request| {
                *request.method() == Method::PUT
                    && request.url().as_str() == "http://api.test/items/1?lang=en"
                    && request.timeout() == Some(&Duration::from_secs(3))
                    && request.headers()["content-type"] == "application/json"
                    && request.headers()["x-tenant"] == "acme"
                    && request.body().and_then(|b| b.as_bytes()) == Some(&br#"{"id":1}"#[..])
            })
            .times(1)
            .returning(|_| canned(200, r#"{"success":true}"#));

        let mut request =
            HttpRequestBuilder::<Value>::put(RequestContext::background(), "http://api.test/items/1")
                .set_headers([("X-Tenant", "acme")])
                .set_query_params([("lang", "en")])
                .set_timeout(Duration::from_secs(3))
                .set_json_body(&json!({"id": 1}))
                .with_transport(transport);

        let response = request.get_result().await.unwrap();
        assert!(response.result.success);
        assert_eq!(response.result.data, Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let mut request =
            HttpRequestBuilder::<Item>::get(RequestContext::background(), "not a url");
        let err = request.execute().await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));

        let mut request =
            HttpRequestBuilder::<Item>::get(RequestContext::background(), "::bad::")
                .set_query_params([("page", "1")]);
        let err = request.execute().await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { ref url, .. } if url == "::bad::"));
    }

    #[tokio::test]
    async fn test_invalid_header_is_construction_error() {
        let mut transport = MockTransport::new();
        transport.expect_execute().never();

        let mut request = items_request()
            .set_headers([("bad header", "x")])
            .with_transport(transport);
        let err = request.execute().await.unwrap_err();

        assert!(matches!(err, Error::RequestConstruction { .. }));
        assert!(err.to_string().contains("bad header"));
    }

    #[tokio::test]
    async fn test_encoding_failure_reported_on_execute() {
        let mut transport = MockTransport::new();
        transport.expect_execute().never();

        let mut bad = HashMap::new();
        bad.insert((1, 2), "pair");

        let mut request =
            HttpRequestBuilder::<Item>::post(RequestContext::background(), "http://api.test/items")
                .set_json_body(&bad)
                .with_transport(transport);
        let err = request.get_result().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Encoding {
                format: crate::error::BodyFormat::Json,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_body_read_failure_is_reported() {
        let mut transport = MockTransport::new();
        transport.expect_execute().returning(|_| {
            let chunks = futures_util::stream::iter(vec![
                Ok::<_, std::io::Error>(b"{\"succ".to_vec()),
                Err(std::io::Error::other("connection reset")),
            ]);
            let response = http::Response::builder()
                .status(200)
                .body(reqwest::Body::wrap_stream(chunks))
                .unwrap();
            Ok(Response::from(response))
        });

        let mut request = items_request().with_transport(transport);
        let err = request.get_result().await.unwrap_err();

        assert!(matches!(err, Error::BodyRead { .. }));
        assert!(!err.is_network());
        assert_eq!(request.last_response().unwrap().url, "http://api.test/items");
    }

    #[tokio::test]
    async fn test_diagnostics_recorded_for_decoded_call() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| canned(201, r#"{"success":true,"data":{"id":3}}"#));

        let mut sink = MockDiagnosticSink::new();
        sink.expect_cat()
            .with(eq(HTTP_CATEGORY))
            .times(1)
            .return_const(());
        sink.expect_add_statement()
            .withf(|category, duration, statements| {
                if category != HTTP_CATEGORY || statements.len() != 1 {
                    return false;
                }
                let st = &statements[0];
                st.duration == *duration
                    && st.status == 201
                    && st.method == "POST"
                    && st.url == "http://api.test/items?dry_run=true"
                    && st.body == r#"{"name":"test"}"#
                    && st.query_params["dry_run"] == "true"
                    && st.headers["Content-Type"] == "application/json"
                    && st.timeout == "30s"
                    && st.response.is_none()
            })
            .times(1)
            .return_const(());
        sink.expect_calculate_total_time().times(1).return_const(());

        let mut request =
            HttpRequestBuilder::<Item>::post(RequestContext::background(), "http://api.test/items")
                .set_query_params([("dry_run", "true")])
                .set_json_body(&json!({"name": "test"}))
                .with_diagnostics(Arc::new(sink))
                .with_transport(transport);

        let response = request.get_result().await.unwrap();
        assert_eq!(response.result.data, Item { id: 3 });
    }

    #[tokio::test]
    async fn test_diagnostics_recorded_before_server_error() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| canned(500, r#"{"success":false}"#));

        let collector = Arc::new(DebugCollector::new());
        let sink: Arc<dyn DiagnosticSink> = collector.clone();

        let mut request = items_request()
            .with_diagnostics(sink)
            .with_transport(transport);
        assert!(request.get_result().await.is_err());

        let statements = collector.statements(HTTP_CATEGORY);
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].status, 500);
        assert_eq!(collector.report().categories, vec!["http"]);
        assert_eq!(collector.total_time(), statements[0].duration);
    }

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(StatusCode::OK), "200 OK");
        assert_eq!(
            status_line(StatusCode::SERVICE_UNAVAILABLE),
            "503 Service Unavailable"
        );
        assert_eq!(status_line(StatusCode::from_u16(599).unwrap()), "599");
    }

    #[test]
    fn test_collect_headers_joins_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        let collected = collect_headers(&headers);
        assert_eq!(collected["set-cookie"], "a=1, b=2");
        assert_eq!(collected["content-type"], "text/plain");
    }
}
