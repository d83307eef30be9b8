use crate::event::TradeId;
use fnv::FnvHashMap;
use replay_instrument::{OrderSide, instrument::InstrumentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Co-indexed quote columns for one instrument, sorted by `ts_ns` ascending.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct QuoteColumns {
    pub bid: Vec<Decimal>,
    pub ask: Vec<Decimal>,
    pub bid_size: Vec<Decimal>,
    pub ask_size: Vec<Decimal>,
    pub ts_ns: Vec<i64>,
}

impl QuoteColumns {
    pub fn len(&self) -> usize {
        self.ts_ns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ts_ns.is_empty()
    }

    /// All columns hold one value per row.
    pub(crate) fn is_coherent(&self) -> bool {
        let rows = self.ts_ns.len();
        self.bid.len() == rows
            && self.ask.len() == rows
            && self.bid_size.len() == rows
            && self.ask_size.len() == rows
    }
}

/// Co-indexed trade columns for one instrument, sorted by `ts_ns` ascending.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct TradeColumns {
    pub price: Vec<Decimal>,
    pub size: Vec<Decimal>,
    pub match_id: Vec<TradeId>,
    pub aggressor_side: Vec<OrderSide>,
    pub ts_ns: Vec<i64>,
}

impl TradeColumns {
    pub fn len(&self) -> usize {
        self.ts_ns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ts_ns.is_empty()
    }

    /// All columns hold one value per row.
    pub(crate) fn is_coherent(&self) -> bool {
        let rows = self.ts_ns.len();
        self.price.len() == rows
            && self.size.len() == rows
            && self.match_id.len() == rows
            && self.aggressor_side.len() == rows
    }
}

/// Read-only provider of per-instrument columnar tick data.
///
/// Instruments are assigned a dense `usize` index in first-seen registration order, used to key
/// data in a memory efficient way when the per-instrument column groups are merged into global
/// runs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DataContainer {
    instruments: Vec<InstrumentId>,
    indexes: FnvHashMap<InstrumentId, usize>,
    quotes: FnvHashMap<usize, QuoteColumns>,
    trades: FnvHashMap<usize, TradeColumns>,
}

impl DataContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the quote column group for the provided instrument, registering the instrument if
    /// it has not been seen before. Replaces any group previously attached for it.
    pub fn add_quotes(&mut self, instrument: InstrumentId, columns: QuoteColumns) {
        let index = self.index_or_register(instrument);
        self.quotes.insert(index, columns);
    }

    /// Attach the trade column group for the provided instrument, registering the instrument if
    /// it has not been seen before. Replaces any group previously attached for it.
    pub fn add_trades(&mut self, instrument: InstrumentId, columns: TradeColumns) {
        let index = self.index_or_register(instrument);
        self.trades.insert(index, columns);
    }

    fn index_or_register(&mut self, instrument: InstrumentId) -> usize {
        if let Some(index) = self.indexes.get(&instrument) {
            return *index;
        }
        let index = self.instruments.len();
        self.instruments.push(instrument.clone());
        self.indexes.insert(instrument, index);
        index
    }

    /// Return the instrument catalog, positioned by dense index.
    pub fn instruments(&self) -> &[InstrumentId] {
        &self.instruments
    }

    /// Find the dense index associated with the provided [`InstrumentId`].
    pub fn instrument_index(&self, instrument: &InstrumentId) -> Option<usize> {
        self.indexes.get(instrument).copied()
    }

    /// Borrow the quote column group of the instrument at `index`, if one is attached.
    pub fn quotes(&self, index: usize) -> Option<&QuoteColumns> {
        self.quotes.get(&index)
    }

    /// Borrow the trade column group of the instrument at `index`, if one is attached.
    pub fn trades(&self, index: usize) -> Option<&TradeColumns> {
        self.trades.get(&index)
    }

    /// True if no column group holds any rows.
    pub fn is_empty(&self) -> bool {
        self.quotes.values().all(QuoteColumns::is_empty)
            && self.trades.values().all(TradeColumns::is_empty)
    }

    /// Earliest timestamp across all attached column groups.
    ///
    /// Relies on the per-group sort invariant, so only first rows are inspected.
    pub fn min_ts_ns(&self) -> Option<i64> {
        self.quotes
            .values()
            .filter_map(|columns| columns.ts_ns.first())
            .chain(self.trades.values().filter_map(|columns| columns.ts_ns.first()))
            .min()
            .copied()
    }

    /// Latest timestamp across all attached column groups.
    pub fn max_ts_ns(&self) -> Option<i64> {
        self.quotes
            .values()
            .filter_map(|columns| columns.ts_ns.last())
            .chain(self.trades.values().filter_map(|columns| columns.ts_ns.last()))
            .max()
            .copied()
    }

    /// Describe the execution resolution available per instrument.
    ///
    /// eg/ `"EUR/USD.SIM=quote_tick,trade_tick"`.
    pub fn execution_resolutions(&self) -> Vec<String> {
        self.instruments
            .iter()
            .enumerate()
            .map(|(index, instrument)| {
                let mut description = format!("{instrument}=");
                let has_quotes = self.quotes.get(&index).is_some_and(|c| !c.is_empty());
                let has_trades = self.trades.get(&index).is_some_and(|c| !c.is_empty());
                match (has_quotes, has_trades) {
                    (true, true) => description.push_str("quote_tick,trade_tick"),
                    (true, false) => description.push_str("quote_tick"),
                    (false, true) => description.push_str("trade_tick"),
                    (false, false) => description.push_str("none"),
                }
                description
            })
            .collect()
    }

    /// Render the catalog for logging.
    pub(crate) fn describe(&self) -> String {
        let mut description = String::new();
        for resolution in self.execution_resolutions() {
            let _ = write!(description, "{resolution}; ");
        }
        description
    }
}
