//! Envelope Serializer
//!
//! Every occupied slot stores a JSON envelope:
//!
//! ```text
//! {"key":"client:1","type":"client","data":{"id":1,"name":"Client 1"}}
//! ```
//!
//! The embedded key lets lookups confirm identity after a fingerprint match,
//! so two keys sharing a 32-bit fingerprint never shadow each other.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::Result;

/// A value type with a fixed kind tag for its envelope
///
/// ```
/// use serde::Serialize;
/// use slotkv::Record;
///
/// #[derive(Serialize)]
/// struct Client {
///     id: i64,
///     name: String,
/// }
///
/// impl Record for Client {
///     const KIND: &'static str = "client";
/// }
/// ```
pub trait Record: Serialize {
    const KIND: &'static str;
}

/// Wrapper stored in a slot payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Original key, compared exactly on lookup
    pub key: String,

    /// Caller-supplied value kind
    #[serde(rename = "type")]
    pub kind: String,

    /// Serialized value, kept verbatim
    pub data: Box<RawValue>,
}

impl Envelope {
    /// Wrap `value` with its key and kind
    pub fn new<T: Serialize + ?Sized>(key: &str, kind: &str, value: &T) -> Result<Self> {
        Ok(Self {
            key: key.to_string(),
            kind: kind.to_string(),
            data: serde_json::value::to_raw_value(value)?,
        })
    }

    /// Serialize `(key, kind, value)` into payload bytes
    pub fn marshal<T: Serialize + ?Sized>(key: &str, kind: &str, value: &T) -> Result<Vec<u8>> {
        Self::new(key, kind, value)?.to_bytes()
    }

    /// Parse payload bytes back into an envelope
    pub fn unmarshal(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize the wrapped value
    pub fn value<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(self.data.get())?)
    }

    /// The wrapped value as stored
    pub fn raw_data(&self) -> &str {
        self.data.get()
    }

    /// The wrapped value, pretty-printed
    pub fn pretty_data(&self) -> Result<String> {
        let value: serde_json::Value = self.value()?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}
