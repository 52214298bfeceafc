//! Request envelope (JSON).
//!
//! The payload is stored as `RawValue`: it is only parsed once the command
//! name has been resolved to a concrete request type, and parsing never
//! touches the original bytes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{Result, WsRpcError};

/// Correlation metadata shared by requests and responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandMeta {
    /// Opaque correlation token, echoed verbatim in the reply.
    #[serde(default)]
    pub id: String,
    /// Dispatch name.
    #[serde(default)]
    pub command: String,
}

impl CommandMeta {
    pub fn new(id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            command: command.into(),
        }
    }
}

/// Inbound request envelope (one data frame).
///
/// Missing `id`/`command` default to empty strings so that an envelope
/// without a name still gets an "unknown command" reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub command: String,
    /// Request payload, kept raw until dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Box<RawValue>>,
}

impl Envelope {
    /// Build an envelope from metadata and an already-encoded payload.
    pub fn new(meta: CommandMeta, request: Option<Box<RawValue>>) -> Self {
        Self {
            id: meta.id,
            command: meta.command,
            request,
        }
    }

    /// Parse one data frame's bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| WsRpcError::InvalidEnvelope(e.to_string()))
    }

    pub fn meta(&self) -> CommandMeta {
        CommandMeta::new(self.id.clone(), self.command.clone())
    }

    /// Raw payload text; an absent payload reads as `null`.
    pub fn payload(&self) -> &str {
        self.request.as_deref().map_or("null", RawValue::get)
    }

    /// Decode the payload into `T` without consuming the envelope.
    pub fn decode_request<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(self.payload()).map_err(|e| WsRpcError::Decode {
            command: self.command.clone(),
            reason: e.to_string(),
        })
    }
}
