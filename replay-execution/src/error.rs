use replay_instrument::{OrderSide, identifier::ExecutionId, money::MoneyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contains error variants that can occur when constructing or updating a
/// [`Position`](crate::position::Position).
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize, Error)]
pub enum PositionError {
    #[error("required identifier is null: {0}")]
    NullIdentifier(String),

    #[error("cannot derive a position side from order side: {0}")]
    InvalidOrderSide(OrderSide),

    #[error("execution already applied: {0}")]
    DuplicateExecution(ExecutionId),

    #[error("money arithmetic: {0}")]
    Money(#[from] MoneyError),
}
