//! Core domain types
//!
//! These types mirror the JSON documents exchanged with Gate. They are
//! decoded from API responses, used once, and discarded; nothing here is
//! cached or persisted.

pub mod execution;
pub mod pipeline;

use serde::{Deserialize, Deserializer};

/// Decode an explicit `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
