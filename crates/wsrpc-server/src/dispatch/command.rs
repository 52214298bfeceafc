//! Typed commands.
//!
//! A `Command<Req, Rep>` is what application code receives after dispatch:
//! the envelope metadata, the decoded request, and the write handle used to
//! answer. `ok`/`err` are the only way to produce a response, so the reply
//! always carries the id and command name of the request it answers.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use wsrpc_core::error::Result;
use wsrpc_core::protocol::{CommandMeta, Envelope, Response};

use crate::connection::Outbound;

/// Undecoded command: the request is the untouched envelope.
pub type RawCommand = Command<Envelope, serde_json::Value>;

pub struct Command<Req, Rep> {
    meta: CommandMeta,
    /// Decoded request payload.
    pub request: Req,
    out: Outbound,
    _reply: PhantomData<fn(Rep)>,
}

impl RawCommand {
    pub fn from_envelope(envelope: Envelope, out: Outbound) -> Self {
        Self {
            meta: envelope.meta(),
            request: envelope,
            out,
            _reply: PhantomData,
        }
    }
}

impl<Req: DeserializeOwned, Rep> Command<Req, Rep> {
    /// Decode `raw`'s payload into `Req`, keeping its metadata and write
    /// handle. Never writes to the connection.
    pub fn from_raw(raw: RawCommand) -> Result<Self> {
        let request = raw.request.decode_request()?;
        Ok(Self {
            meta: raw.meta,
            request,
            out: raw.out,
            _reply: PhantomData,
        })
    }
}

impl<Req, Rep> Command<Req, Rep> {
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    pub fn name(&self) -> &str {
        &self.meta.command
    }

    pub fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    /// Answer with an error. Use `format!` for formatted messages.
    pub async fn err(&self, message: impl Into<String>) -> Result<()> {
        let response = Response::<()>::err(self.meta.clone(), message);
        self.out.send_raw(&response).await
    }
}

impl<Req, Rep: Serialize> Command<Req, Rep> {
    /// Answer with a success payload.
    pub async fn ok(&self, reply: Rep) -> Result<()> {
        let response = Response::ok(self.meta.clone(), reply);
        self.out.send_raw(&response).await
    }
}

impl<Req: fmt::Debug, Rep> fmt::Debug for Command<Req, Rep> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.meta.id)
            .field("command", &self.meta.command)
            .field("request", &self.request)
            .finish()
    }
}
