//! Converters from raw stored bytes to typed values.
//!
//! Entries carry no type tag, so the reader picks the converter. Every
//! function here matches [`Converter`] and can be passed to
//! [`Cache::get_with`](crate::Cache::get_with); custom converters only need
//! the same shape.

use crate::error::Result;
use serde::de::DeserializeOwned;

/// A pluggable decoding function.
pub type Converter<T> = fn(&[u8]) -> Result<T>;

/// Return the bytes unchanged.
pub fn raw(bytes: &[u8]) -> Result<Vec<u8>> {
    Ok(bytes.to_vec())
}

/// Decode UTF-8 text.
pub fn utf8(bytes: &[u8]) -> Result<String> {
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Parse a decimal integer literal, ignoring surrounding whitespace.
pub fn integer(bytes: &[u8]) -> Result<i64> {
    let text = utf8(bytes)?;
    Ok(text.trim().parse::<i64>()?)
}

/// Parse a floating-point literal, ignoring surrounding whitespace.
pub fn float(bytes: &[u8]) -> Result<f64> {
    let text = utf8(bytes)?;
    Ok(text.trim().parse::<f64>()?)
}

/// Deserialize JSON text.
pub fn json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}
