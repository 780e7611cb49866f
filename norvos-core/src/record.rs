//! Record payloads and request decoding

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// TTL written when a payload omits `ttl` or sets it to 0.
pub const DEFAULT_TTL: i64 = 300;

/// SkyDNS service record, stored as JSON at the record key.
///
/// Numeric fields are stored as given; only a zero TTL is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    /// Target address or name.
    pub host: String,
    #[serde(default)]
    pub port: i64,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub weight: i64,
    /// Seconds; 0 means [`DEFAULT_TTL`].
    #[serde(default)]
    pub ttl: i64,
    /// Number of labels to strip from the target when answering.
    #[serde(default, rename = "targetstrip")]
    pub target_strip: i64,
}

impl RecordPayload {
    /// Copy of the payload with a zero TTL replaced by [`DEFAULT_TTL`].
    #[must_use]
    pub fn with_default_ttl(mut self) -> Self {
        if self.ttl == 0 {
            self.ttl = DEFAULT_TTL;
        }
        self
    }

    /// Stored representation.
    pub fn encode(&self) -> CoreResult<String> {
        serde_json::to_string(self)
            .map_err(|e| CoreError::InvalidInput(format!("record cannot be encoded: {e}")))
    }
}

/// Create/Update input: `{"name": ..., "host": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordRequest {
    pub name: String,
    #[serde(flatten)]
    pub payload: RecordPayload,
}

/// Read/Delete input: `{"name": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

/// Decode a Create/Update request and apply the default TTL.
pub fn decode_record_request(raw: &[u8]) -> CoreResult<RecordRequest> {
    let mut request: RecordRequest = decode(raw)?;
    request.payload = request.payload.with_default_ttl();
    Ok(request)
}

/// Decode a Read/Delete request.
pub fn decode_name_request(raw: &[u8]) -> CoreResult<NameRequest> {
    decode(raw)
}

fn decode<T: for<'de> Deserialize<'de>>(raw: &[u8]) -> CoreResult<T> {
    serde_json::from_slice(raw).map_err(|e| CoreError::InvalidInput(format!("malformed request: {e}")))
}
