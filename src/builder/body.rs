//! Request body encoding.

use serde::Serialize;

use crate::error::BodyFormat;

/// Serializes `value` in the given format.
///
/// Errors are returned as text so the builder can hold on to them until the
/// request is executed.
pub(crate) fn encode<T>(format: BodyFormat, value: &T) -> Result<Vec<u8>, String>
where
    T: Serialize + ?Sized,
{
    match format {
        BodyFormat::Json => serde_json::to_vec(value).map_err(|e| e.to_string()),
        BodyFormat::Xml => quick_xml::se::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| e.to_string()),
    }
}
