//! Command palette: command name -> prototype.
//!
//! The palette is generic over the application's command enum `C`. Each entry
//! knows how to turn a raw command into one variant of `C`; the handler then
//! matches on `C` to get back the concrete `Command<Req, Rep>`:
//!
//! ```ignore
//! enum Cmd {
//!     Sum(Command<SumRequest, SumResponse>),
//!     Negate(Command<i64, i64>),
//! }
//!
//! let palette = Palette::new()
//!     .register("sum", Cmd::Sum)?
//!     .register("negate", Cmd::Negate)?;
//! ```
//!
//! Built once at startup and shared read-only behind an `Arc`.

use std::collections::HashMap;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use wsrpc_core::error::{Result, WsRpcError};

use super::command::{Command, RawCommand};

/// Capability stored in the palette: build a typed `C` from a raw command.
pub trait Upgrade<C>: Send + Sync {
    fn upgrade(&self, raw: RawCommand) -> Result<C>;
}

/// Prototype for `Command<Req, Rep>`, wrapped into `C` by a variant constructor.
struct Prototype<Req, Rep, C> {
    wrap: fn(Command<Req, Rep>) -> C,
    _types: PhantomData<fn() -> (Req, Rep)>,
}

impl<Req, Rep, C> Upgrade<C> for Prototype<Req, Rep, C>
where
    Req: DeserializeOwned,
{
    fn upgrade(&self, raw: RawCommand) -> Result<C> {
        Command::<Req, Rep>::from_raw(raw).map(self.wrap)
    }
}

pub struct Palette<C> {
    commands: HashMap<String, Box<dyn Upgrade<C>>>,
}

impl<C: 'static> Palette<C> {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register `name` as a `Command<Req, Rep>`, wrapped by `wrap` (usually an
    /// enum variant). Duplicate names are rejected.
    pub fn register<Req, Rep>(
        mut self,
        name: impl Into<String>,
        wrap: fn(Command<Req, Rep>) -> C,
    ) -> Result<Self>
    where
        Req: DeserializeOwned + 'static,
        Rep: 'static,
    {
        let prototype = Prototype {
            wrap,
            _types: PhantomData,
        };
        self.insert(name, Box::new(prototype))?;
        Ok(self)
    }

    /// Register a custom prototype.
    pub fn insert(&mut self, name: impl Into<String>, prototype: Box<dyn Upgrade<C>>) -> Result<()> {
        let name = name.into();
        if self.commands.contains_key(&name) {
            return Err(WsRpcError::DuplicateCommand(name));
        }
        tracing::debug!(command = %name, "command registered");
        self.commands.insert(name, prototype);
        Ok(())
    }
}

impl<C> Palette<C> {
    pub fn resolve(&self, name: &str) -> Option<&dyn Upgrade<C>> {
        self.commands.get(name).map(|p| p.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<C: 'static> Default for Palette<C> {
    fn default() -> Self {
        Self::new()
    }
}
