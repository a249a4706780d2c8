use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serializer, de};
use std::sync::Arc;

/// A reference-counted container for shared, immutable data like images.
pub type SharedData = Arc<Vec<u8>>;

/// Serde adapter carrying binary payloads as base64 strings in JSON.
///
/// Use with `#[serde(with = "offerdoc_types::data::base64_bytes")]` on a
/// `SharedData` field.
pub mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(data: &SharedData, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data.as_slice()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SharedData, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        // Data URLs are accepted as well; only the payload after the comma is decoded.
        let payload = match encoded.split_once(',') {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => encoded.as_str(),
        };
        STANDARD
            .decode(payload.trim())
            .map(Arc::new)
            .map_err(de::Error::custom)
    }
}

/// Like [`base64_bytes`] for optional payloads; `null` and a missing field
/// both mean `None` when combined with `#[serde(default)]`.
pub mod optional_base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(
        data: &Option<SharedData>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match data {
            Some(data) => base64_bytes::serialize(data, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SharedData>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "base64_bytes")] SharedData);

        let wrapper = Option::<Wrapper>::deserialize(deserializer)?;
        Ok(wrapper.map(|Wrapper(data)| data))
    }
}
