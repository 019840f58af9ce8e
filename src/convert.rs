//! String to typed-value conversion for leaf params.

use std::path::PathBuf;

use crate::error::ConversionError;

/// Converts a raw tree string into a typed field value.
///
/// Implement this for application types that should be usable as params,
/// param-list elements or dictionary values.
pub trait FromTreeValue: Sized {
    /// Whether a field of this type may be absent from the tree.
    const OPTIONAL: bool = false;

    fn from_tree_value(raw: &str) -> Result<Self, ConversionError>;
}

macro_rules! from_str_impl {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromTreeValue for $ty {
                fn from_tree_value(raw: &str) -> Result<Self, ConversionError> {
                    raw.parse::<$ty>()
                        .map_err(|e| ConversionError::new(e.to_string()))
                }
            }
        )*
    };
}

from_str_impl!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
from_str_impl!(toml::value::Datetime);

impl FromTreeValue for String {
    fn from_tree_value(raw: &str) -> Result<Self, ConversionError> {
        Ok(raw.to_owned())
    }
}

impl FromTreeValue for PathBuf {
    fn from_tree_value(raw: &str) -> Result<Self, ConversionError> {
        Ok(PathBuf::from(raw))
    }
}

impl FromTreeValue for char {
    fn from_tree_value(raw: &str) -> Result<Self, ConversionError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(ConversionError::new("expected a single character")),
        }
    }
}

impl FromTreeValue for bool {
    fn from_tree_value(raw: &str) -> Result<Self, ConversionError> {
        match raw {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConversionError::unspecified()),
        }
    }
}

impl<T: FromTreeValue> FromTreeValue for Option<T> {
    const OPTIONAL: bool = true;

    fn from_tree_value(raw: &str) -> Result<Self, ConversionError> {
        T::from_tree_value(raw).map(Some)
    }
}
