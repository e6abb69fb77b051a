use serde::{Deserialize, Deserializer};

/// Deserializes a field that was present in the payload, keeping an explicit
/// `null` distinct from an absent key.
///
/// Pair with `#[serde(default, deserialize_with = "present")]` on an
/// `Option<Option<T>>`: absent is `None`, `null` is `Some(None)`.
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trims a free-text value and drops it when nothing is left.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|text| text.trim().to_string()).filter(|text| !text.is_empty())
}
