#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments, type_alias_bounds)]

//! # Replay-Instrument
//! Replay-Instrument contains the value vocabulary shared across the Replay backtesting
//! ecosystem: exact [`Money`](money::Money) arithmetic tagged with a
//! [`Currency`](money::Currency), the [`InstrumentId`](instrument::InstrumentId) identity of a
//! tradable symbol at a venue, `SmolStr` backed identifier newtypes, and the order/position
//! side enums with bidirectional string forms.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// [`Money`](money::Money) and [`Currency`](money::Currency) exact arithmetic.
pub mod money;

/// [`InstrumentId`](instrument::InstrumentId) identity of a tradable symbol at a venue.
pub mod instrument;

/// `SmolStr` backed identifier newtypes.
///
/// eg/ `ExecutionId`, `PositionId`, etc.
pub mod identifier;

/// Side of an order - Undefined, Buy or Sell.
///
/// `Undefined` exists only as a wire-level placeholder; operations that derive position state
/// from an order side reject it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum OrderSide {
    #[serde(alias = "undefined", alias = "UNDEFINED")]
    Undefined,
    #[serde(alias = "buy", alias = "BUY", alias = "b")]
    Buy,
    #[serde(alias = "sell", alias = "SELL", alias = "s")]
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Undefined => "UNDEFINED",
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl Display for OrderSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ParseSideError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "UNDEFINED" | "undefined" => Ok(OrderSide::Undefined),
            "BUY" | "buy" | "b" => Ok(OrderSide::Buy),
            "SELL" | "sell" | "s" => Ok(OrderSide::Sell),
            unrecognised => Err(ParseSideError(SmolStr::new(unrecognised))),
        }
    }
}

/// Side of a position - Flat, Long or Short.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum PositionSide {
    #[serde(alias = "flat", alias = "FLAT")]
    Flat,
    #[serde(alias = "long", alias = "LONG")]
    Long,
    #[serde(alias = "short", alias = "SHORT")]
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Flat => "FLAT",
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
        }
    }
}

impl Display for PositionSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PositionSide {
    type Err = ParseSideError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "FLAT" | "flat" => Ok(PositionSide::Flat),
            "LONG" | "long" => Ok(PositionSide::Long),
            "SHORT" | "short" => Ok(PositionSide::Short),
            unrecognised => Err(ParseSideError(SmolStr::new(unrecognised))),
        }
    }
}

/// Input string matched no known side variant.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Error)]
#[error("unrecognised side: {0}")]
pub struct ParseSideError(pub SmolStr);
