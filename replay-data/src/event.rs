use chrono::{DateTime, Utc};
use derive_more::{Constructor, From};
use replay_instrument::{OrderSide, instrument::InstrumentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::{Display, Formatter};

/// Identifier of a trade assigned by the matching engine that produced it.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, From)]
pub struct TradeId(pub SmolStr);

impl TradeId {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self(SmolStr::new(id))
    }
}

impl Display for TradeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-of-book bid/ask observation for one instrument, timestamped in nanoseconds.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize, Constructor)]
pub struct QuoteTick {
    pub instrument: InstrumentId,
    pub bid: Decimal,
    pub ask: Decimal,
    pub bid_size: Decimal,
    pub ask_size: Decimal,
    pub ts_ns: i64,
}

impl QuoteTick {
    /// Calculate the mid-price by taking the average of the bid and ask prices.
    pub fn mid_price(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }

    /// Return the observation timestamp as a `DateTime<Utc>`.
    pub fn time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.ts_ns)
    }
}

impl Display for QuoteTick {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}x{} @ {}/{} ({})",
            self.instrument, self.bid_size, self.ask_size, self.bid, self.ask, self.ts_ns
        )
    }
}

/// Last-traded price and size observation for one instrument, timestamped in nanoseconds.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize, Constructor)]
pub struct TradeTick {
    pub instrument: InstrumentId,
    pub price: Decimal,
    pub size: Decimal,
    pub match_id: TradeId,
    pub aggressor_side: OrderSide,
    pub ts_ns: i64,
}

impl TradeTick {
    /// Return the observation timestamp as a `DateTime<Utc>`.
    pub fn time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.ts_ns)
    }
}

impl Display for TradeTick {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} @ {} ({})",
            self.instrument, self.aggressor_side, self.size, self.price, self.ts_ns
        )
    }
}

/// One market observation - a quote or a trade.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize, From)]
pub enum Tick {
    Quote(QuoteTick),
    Trade(TradeTick),
}

impl Tick {
    pub fn instrument(&self) -> &InstrumentId {
        match self {
            Tick::Quote(quote) => &quote.instrument,
            Tick::Trade(trade) => &trade.instrument,
        }
    }

    pub fn ts_ns(&self) -> i64 {
        match self {
            Tick::Quote(quote) => quote.ts_ns,
            Tick::Trade(trade) => trade.ts_ns,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.ts_ns())
    }
}

impl Display for Tick {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Tick::Quote(quote) => write!(f, "{quote}"),
            Tick::Trade(trade) => write!(f, "{trade}"),
        }
    }
}
