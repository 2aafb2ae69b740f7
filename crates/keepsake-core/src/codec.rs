//! Codecs: the capability that turns an entity into bytes and back.
//!
//! A store never knows the concrete shape of what it persists. It is handed
//! a [`Codec`] at construction time and only ever sees bytes. Two serde-backed
//! codecs are provided:
//!
//! - [`JsonCodec`] - human-readable, used for the configuration slot
//! - [`CborCodec`] - compact binary, used for history records
//!
//! Decoding never panics and never yields a default value: malformed input is
//! always reported as [`CoreError::Corrupt`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CoreError, Result};

/// Encode/decode capability for entities of type `T`.
///
/// Implementations must round-trip losslessly: for every value `v` they
/// accept, `decode(&encode(&v)?)? == v`.
pub trait Codec<T>: Send + Sync {
    /// Serialize a value.
    fn encode(&self, value: &T) -> Result<Vec<u8>>;

    /// Deserialize a value, failing with [`CoreError::Corrupt`] on bad input.
    fn decode(&self, bytes: &[u8]) -> Result<T>;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact JSON output.
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented JSON output, for files people are expected to open.
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map_err(|e| CoreError::Encoding(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::corrupt(format!("json: {}", e)))
    }
}

/// CBOR codec backed by `ciborium`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborCodec;

impl<T> Codec<T> for CborCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf).map_err(|e| CoreError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T> {
        ciborium::from_reader(bytes).map_err(|e| CoreError::corrupt(format!("cbor: {}", e)))
    }
}
