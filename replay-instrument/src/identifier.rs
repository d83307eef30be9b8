use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Sentinel value carried by identifiers that support the null protocol.
const NULL_ID: &str = "NULL";

/// Unique identifier of a fill assigned by the execution venue.
///
/// Used as the idempotency key when folding fills into a position.
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display, From,
)]
pub struct ExecutionId(pub SmolStr);

impl ExecutionId {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self(SmolStr::new(id))
    }
}

/// Client assigned order identifier.
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display, From,
)]
pub struct ClientOrderId(pub SmolStr);

impl ClientOrderId {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self(SmolStr::new(id))
    }
}

/// Venue assigned order identifier.
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display, From,
)]
pub struct OrderId(pub SmolStr);

impl OrderId {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self(SmolStr::new(id))
    }
}

/// Identifier of the trading strategy an order or position belongs to.
///
/// Supports the null sentinel protocol - a [`StrategyId::null`] value marks the absence of a
/// strategy association and is rejected where a real strategy is required.
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display, From,
)]
pub struct StrategyId(pub SmolStr);

impl StrategyId {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self(SmolStr::new(id))
    }

    pub fn null() -> Self {
        Self::new(NULL_ID)
    }

    pub fn is_null(&self) -> bool {
        self.0 == NULL_ID
    }

    pub fn not_null(&self) -> bool {
        !self.is_null()
    }
}

/// Identifier of the trading account fills are booked against.
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display, From,
)]
pub struct AccountId(pub SmolStr);

impl AccountId {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self(SmolStr::new(id))
    }
}

/// Identifier of a directional position in one instrument.
///
/// Supports the null sentinel protocol - see [`StrategyId`].
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display, From,
)]
pub struct PositionId(pub SmolStr);

impl PositionId {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self(SmolStr::new(id))
    }

    pub fn null() -> Self {
        Self::new(NULL_ID)
    }

    pub fn is_null(&self) -> bool {
        self.0 == NULL_ID
    }

    pub fn not_null(&self) -> bool {
        !self.is_null()
    }
}
