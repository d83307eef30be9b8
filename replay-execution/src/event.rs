use derive_more::Constructor;
use replay_instrument::{
    OrderSide,
    identifier::{AccountId, ClientOrderId, ExecutionId, OrderId, PositionId, StrategyId},
    instrument::InstrumentId,
    money::{Currency, Money},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Event describing one fill of an order at the execution venue.
///
/// `currency` is the quote currency of the filled instrument; `commission` may be denominated
/// in any currency. `execution_ns` is expected to be non-decreasing across the fills applied
/// to a single position - a caller-side precondition, not enforced by the engine.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize, Constructor)]
pub struct OrderFilled {
    pub client_order_id: ClientOrderId,
    pub order_id: OrderId,
    pub execution_id: ExecutionId,
    pub position_id: PositionId,
    pub strategy_id: StrategyId,
    pub account_id: AccountId,
    pub instrument: InstrumentId,
    pub order_side: OrderSide,
    pub fill_price: Decimal,
    pub fill_qty: Decimal,
    pub currency: Currency,
    pub is_inverse: bool,
    pub commission: Money,
    pub execution_ns: i64,
}

impl Display for OrderFilled {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ instrument: {}, side: {}, qty: {}, price: {}, execution_id: {}, execution_ns: {} }}",
            self.instrument,
            self.order_side,
            self.fill_qty,
            self.fill_price,
            self.execution_id,
            self.execution_ns
        )
    }
}
