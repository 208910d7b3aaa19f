//! Response shapes: the decoded envelope and the per-execution result.

use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Wrapper the remote service is expected to answer with:
/// `{"success": <bool>, "data": <E>}`.
///
/// Missing fields and a `null` payload decode to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "E: Deserialize<'de> + Default"))]
pub struct Envelope<E> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: E,
}

fn null_as_default<'de, D, E>(deserializer: D) -> Result<E, D::Error>
where
    D: Deserializer<'de>,
    E: Deserialize<'de> + Default,
{
    Ok(Option::<E>::deserialize(deserializer)?.unwrap_or_default())
}

/// Everything captured from one execution.
#[derive(Debug, Clone)]
pub struct HttpResponse<E> {
    /// Final request target, query parameters included.
    pub url: String,
    pub method: Method,
    /// Status line, e.g. `200 OK`.
    pub status: String,
    pub status_code: u16,
    /// Raw body bytes, kept even when decoding fails.
    pub body: Vec<u8>,
    /// Response headers; repeated headers are joined with `", "`.
    pub headers: BTreeMap<String, String>,
    pub result: Envelope<E>,
    /// Reserved for structured error payloads; currently always empty.
    pub errors_map: HashMap<String, serde_json::Value>,
}

impl<E: Default> HttpResponse<E> {
    pub(crate) fn new(url: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            method,
            status: String::new(),
            status_code: 0,
            body: Vec::new(),
            headers: BTreeMap::new(),
            result: Envelope::default(),
            errors_map: HashMap::new(),
        }
    }
}

impl<E> HttpResponse<E> {
    /// Body as UTF-8 text, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }
}
