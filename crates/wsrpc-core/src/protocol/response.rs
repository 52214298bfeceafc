//! Response envelope (JSON).
//!
//! Exactly one of `error` / `response` is populated. The fields are private so
//! the only way to build a `Response` is through [`Response::ok`] or
//! [`Response::err`]; deserialization re-checks the same rule.

use serde::{Deserialize, Deserializer, Serialize};

use super::envelope::CommandMeta;

/// Correlated reply to one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "WireResponse<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Response<T> {
    id: String,
    command: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<T>,
}

impl<T> Response<T> {
    /// Success reply carrying `reply`.
    pub fn ok(meta: CommandMeta, reply: T) -> Self {
        Self {
            id: meta.id,
            command: meta.command,
            ok: true,
            error: None,
            response: Some(reply),
        }
    }

    /// Error reply carrying `message`.
    pub fn err(meta: CommandMeta, message: impl Into<String>) -> Self {
        Self {
            id: meta.id,
            command: meta.command,
            ok: false,
            error: Some(message.into()),
            response: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn meta(&self) -> CommandMeta {
        CommandMeta::new(self.id.clone(), self.command.clone())
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn response(&self) -> Option<&T> {
        self.response.as_ref()
    }

    /// Collapse into the populated side.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match (self.response, self.error) {
            (Some(r), _) => Ok(r),
            (None, Some(e)) => Err(e),
            (None, None) => Err(String::new()),
        }
    }
}

/// Unchecked wire shape; converted into `Response` only if consistent.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct WireResponse<T> {
    #[serde(default)]
    id: String,
    #[serde(default)]
    command: String,
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    // A present `null` still counts as a payload (e.g. `()` replies).
    #[serde(default, deserialize_with = "present")]
    response: Option<T>,
}

fn present<'de, D, T>(d: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(d).map(Some)
}

impl<T> TryFrom<WireResponse<T>> for Response<T> {
    type Error = String;

    fn try_from(w: WireResponse<T>) -> std::result::Result<Self, Self::Error> {
        let meta = CommandMeta::new(w.id, w.command);
        match (w.ok, w.error, w.response) {
            (true, None, Some(r)) => Ok(Response::ok(meta, r)),
            (false, Some(e), None) => Ok(Response::err(meta, e)),
            (true, Some(_), _) => Err("ok response carries an error".into()),
            (true, None, None) => Err("ok response without payload".into()),
            (false, None, _) => Err("error response without message".into()),
            (false, Some(_), Some(_)) => Err("error response carries a payload".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn unit_reply_keeps_null_payload() {
        let r = Response::ok(CommandMeta::new("7", "ping"), ());
        let s = serde_json::to_string(&r).unwrap();
        assert_eq!(s, r#"{"id":"7","command":"ping","ok":true,"response":null}"#);

        let back: Response<()> = serde_json::from_str(&s).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn into_result_prefers_populated_side() {
        let ok = Response::ok(CommandMeta::default(), 3);
        assert_eq!(ok.into_result(), Ok(3));

        let err = Response::<i32>::err(CommandMeta::default(), "nope");
        assert_eq!(err.into_result(), Err("nope".to_string()));
    }
}
