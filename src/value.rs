//! Encoding of native values into the store's byte representation.
//!
//! Text and bytes are stored verbatim, numbers as their decimal literal.
//! Floats with no fractional part keep a trailing `.0` (`1.0`, not `1`) so
//! they read back as floats.

use crate::error::{Error, Result};
use serde::Serialize;

/// A value that can be written to the backing store.
pub trait StoreValue {
    /// Encode `self` into the bytes handed to the backend.
    fn to_store_bytes(&self) -> Result<Vec<u8>>;
}

impl<T: StoreValue + ?Sized> StoreValue for &T {
    fn to_store_bytes(&self) -> Result<Vec<u8>> {
        (**self).to_store_bytes()
    }
}

impl StoreValue for str {
    fn to_store_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }
}

impl StoreValue for String {
    fn to_store_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }
}

impl StoreValue for [u8] {
    fn to_store_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl<const N: usize> StoreValue for [u8; N] {
    fn to_store_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl StoreValue for Vec<u8> {
    fn to_store_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.clone())
    }
}

macro_rules! integer_store_value {
    ($($ty:ty),*) => {
        $(
            impl StoreValue for $ty {
                fn to_store_bytes(&self) -> Result<Vec<u8>> {
                    Ok(self.to_string().into_bytes())
                }
            }
        )*
    };
}

// Only types that read back losslessly through `convert::integer` (i64).
integer_store_value!(i8, i16, i32, i64, u8, u16, u32);

fn float_literal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl StoreValue for f64 {
    fn to_store_bytes(&self) -> Result<Vec<u8>> {
        Ok(float_literal(*self).into_bytes())
    }
}

impl StoreValue for f32 {
    fn to_store_bytes(&self) -> Result<Vec<u8>> {
        // Widening through the shortest f32 literal keeps 0.1f32 as "0.1".
        let widened = self.to_string().parse::<f64>().unwrap_or(f64::from(*self));
        Ok(float_literal(widened).into_bytes())
    }
}

/// Wrapper storing any `Serialize` value as JSON text.
///
/// Read it back with [`convert::json`](crate::convert::json) or
/// [`Cache::get_json`](crate::Cache::get_json).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T: Serialize> StoreValue for Json<T> {
    fn to_store_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.0).map_err(|e| Error::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<V: StoreValue>(value: V) -> Vec<u8> {
        value.to_store_bytes().expect("Failed to encode")
    }

    #[test]
    fn test_text_and_bytes_are_verbatim() {
        assert_eq!(encode("hello"), b"hello".to_vec());
        assert_eq!(encode(String::from("héllo")), "héllo".as_bytes().to_vec());
        assert_eq!(encode(b"\x00\xff"), vec![0x00, 0xff]);
        assert_eq!(encode(vec![1u8, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_integers_are_decimal() {
        assert_eq!(encode(42), b"42".to_vec());
        assert_eq!(encode(-7i64), b"-7".to_vec());
        assert_eq!(encode(i64::MIN), b"-9223372036854775808".to_vec());
        assert_eq!(encode(u32::MAX), b"4294967295".to_vec());
    }

    #[test]
    fn test_floats_keep_fraction_marker() {
        assert_eq!(encode(3.25), b"3.25".to_vec());
        assert_eq!(encode(1.0), b"1.0".to_vec());
        assert_eq!(encode(-0.5f32), b"-0.5".to_vec());
        assert_eq!(encode(0.1f32), b"0.1".to_vec());
    }

    #[test]
    fn test_json_wrapper() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        assert_eq!(encode(Json(Point { x: 1, y: 2 })), br#"{"x":1,"y":2}"#.to_vec());
    }
}
