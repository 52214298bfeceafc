use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use wsrpc_core::error::Result;

use crate::dispatch::{Command, Handler, Palette};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumRequest {
    pub a: i64,
    pub b: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumResponse {
    pub sum: i64,
}

pub type SumCommand = Command<SumRequest, SumResponse>;

// request and reply do not have to be structs
pub type NegateCommand = Command<i64, i64>;

/// 09 F9 11 02: the start of the AACS key, refused as a result.
pub const ILLEGAL_NUMBER: i64 = 0x09F9_1102;

#[derive(Debug)]
pub enum ArithCommand {
    Sum(SumCommand),
    Negate(NegateCommand),
}

pub fn palette() -> Result<Palette<ArithCommand>> {
    Palette::new()
        .register("sum", ArithCommand::Sum)?
        .register("negate", ArithCommand::Negate)
}

#[derive(Default)]
pub struct ArithService;

impl ArithService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler<ArithCommand> for ArithService {
    async fn handle(&self, cmd: ArithCommand) -> Result<()> {
        match cmd {
            ArithCommand::Sum(cmd) => match cmd.request.a.checked_add(cmd.request.b) {
                Some(ILLEGAL_NUMBER) => cmd.err("illegal number detected").await,
                Some(sum) => cmd.ok(SumResponse { sum }).await,
                None => cmd.err("sum overflows i64").await,
            },
            ArithCommand::Negate(cmd) => match cmd.request.checked_neg() {
                Some(n) => cmd.ok(n).await,
                None => cmd.err(format!("cannot negate {}", cmd.request)).await,
            },
        }
    }
}
