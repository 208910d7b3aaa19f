//! Merges configured query parameters into a base URL.

use std::collections::BTreeMap;
use url::Url;

/// Returns the request target for `base` with `params` merged into its query.
///
/// With no parameters the base string is returned untouched, including any
/// query it already carries. Otherwise every configured key replaces all
/// same-named pairs of the base query, and the query is re-encoded with keys
/// in sorted order.
pub fn compose_url(
    base: &str,
    params: &BTreeMap<String, String>,
) -> Result<String, url::ParseError> {
    if params.is_empty() {
        return Ok(base.to_string());
    }

    let mut url = Url::parse(base)?;

    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url.query_pairs() {
        merged
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    for (key, value) in params {
        merged.insert(key.clone(), vec![value.clone()]);
    }

    url.query_pairs_mut()
        .clear()
        .extend_pairs(
            merged
                .iter()
                .flat_map(|(key, values)| values.iter().map(move |value| (key, value))),
        );

    Ok(url.to_string())
}
