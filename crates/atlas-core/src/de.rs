//! Lenient deserialization helpers.
//!
//! Diagram payloads come from a collaborative store and from generated
//! output; both send explicit `null` for fields they do not know. These
//! helpers make `null` behave like a missing field.

use serde::{Deserialize, Deserializer};

/// Deserializes `null` as `T::default()`.
///
/// Use together with `#[serde(default)]` so a missing field also defaults.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes `null` as `default`, for fields whose default is not
/// `T::default()`.
pub(crate) fn null_as<'de, D, T>(deserializer: D, default: T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or(default))
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
