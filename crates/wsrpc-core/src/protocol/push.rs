//! Server-initiated messages.

use serde::Serialize;

/// Implemented by any payload the server pushes to a client outside the
/// request/response flow.
pub trait PushMessage: Serialize {
    /// Discriminator written to the `type` field.
    fn message_type(&self) -> &str;
}

/// Wire wrapper: `{ "type": ..., "message": ... }`.
#[derive(Debug, Serialize)]
pub struct Pushed<'a, M> {
    #[serde(rename = "type")]
    pub message_type: &'a str,
    pub message: &'a M,
}

impl<'a, M: PushMessage> Pushed<'a, M> {
    pub fn new(message: &'a M) -> Self {
        Self {
            message_type: message.message_type(),
            message,
        }
    }
}
