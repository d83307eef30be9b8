use crate::{
    container::DataContainer,
    error::DataError,
    event::{QuoteTick, Tick, TradeId, TradeTick},
};
use replay_instrument::{OrderSide, instrument::InstrumentId};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// Pull-based market data generator armed with a `[start_ns, stop_ns]` replay window.
///
/// Implementations yield ticks in non-decreasing global timestamp order, with every quote
/// preceding every trade sharing its timestamp.
pub trait MarketDataProducer {
    /// Bind a replay window and position the stream at its start.
    ///
    /// Fails with [`DataError::WindowInvalid`] unless
    /// `min_ts_ns <= start_ns <= stop_ns <= max_ts_ns`.
    fn setup(&mut self, start_ns: i64, stop_ns: i64) -> Result<(), DataError>;

    /// Re-position the stream at the start of the armed window.
    fn reset(&mut self);

    /// Return the next [`Tick`], or `None` once the armed window is exhausted.
    fn next(&mut self) -> Option<Tick>;

    /// True while the armed window still holds unconsumed ticks.
    fn has_data(&self) -> bool;
}

/// Globally time-sorted quote columns merged across all instruments.
///
/// Rows carry the dense instrument index so tick materialization is a single catalog lookup.
#[derive(Debug, Clone, Default)]
struct QuoteRun {
    instrument: Vec<usize>,
    bid: Vec<Decimal>,
    ask: Vec<Decimal>,
    bid_size: Vec<Decimal>,
    ask_size: Vec<Decimal>,
    ts_ns: Vec<i64>,
}

impl QuoteRun {
    fn len(&self) -> usize {
        self.ts_ns.len()
    }

    fn is_empty(&self) -> bool {
        self.ts_ns.is_empty()
    }

    fn materialize(&self, row: usize, instruments: &[InstrumentId]) -> Option<QuoteTick> {
        if row >= self.len() {
            return None;
        }
        Some(QuoteTick {
            instrument: instruments[self.instrument[row]].clone(),
            bid: self.bid[row],
            ask: self.ask[row],
            bid_size: self.bid_size[row],
            ask_size: self.ask_size[row],
            ts_ns: self.ts_ns[row],
        })
    }

    fn sort(&mut self) {
        let order = sort_order(&self.ts_ns);
        self.instrument = permute(&self.instrument, &order);
        self.bid = permute(&self.bid, &order);
        self.ask = permute(&self.ask, &order);
        self.bid_size = permute(&self.bid_size, &order);
        self.ask_size = permute(&self.ask_size, &order);
        self.ts_ns = permute(&self.ts_ns, &order);
    }

    fn bound(&mut self, start_ns: i64, stop_ns: i64) {
        let first = self.ts_ns.partition_point(|&ts| ts < start_ns);
        let last = self.ts_ns.partition_point(|&ts| ts <= stop_ns);
        window(&mut self.instrument, first, last);
        window(&mut self.bid, first, last);
        window(&mut self.ask, first, last);
        window(&mut self.bid_size, first, last);
        window(&mut self.ask_size, first, last);
        window(&mut self.ts_ns, first, last);
    }
}

/// Globally time-sorted trade columns merged across all instruments.
#[derive(Debug, Clone, Default)]
struct TradeRun {
    instrument: Vec<usize>,
    price: Vec<Decimal>,
    size: Vec<Decimal>,
    match_id: Vec<TradeId>,
    aggressor_side: Vec<OrderSide>,
    ts_ns: Vec<i64>,
}

impl TradeRun {
    fn len(&self) -> usize {
        self.ts_ns.len()
    }

    fn is_empty(&self) -> bool {
        self.ts_ns.is_empty()
    }

    fn materialize(&self, row: usize, instruments: &[InstrumentId]) -> Option<TradeTick> {
        if row >= self.len() {
            return None;
        }
        Some(TradeTick {
            instrument: instruments[self.instrument[row]].clone(),
            price: self.price[row],
            size: self.size[row],
            match_id: self.match_id[row].clone(),
            aggressor_side: self.aggressor_side[row],
            ts_ns: self.ts_ns[row],
        })
    }

    fn sort(&mut self) {
        let order = sort_order(&self.ts_ns);
        self.instrument = permute(&self.instrument, &order);
        self.price = permute(&self.price, &order);
        self.size = permute(&self.size, &order);
        self.match_id = permute(&self.match_id, &order);
        self.aggressor_side = permute(&self.aggressor_side, &order);
        self.ts_ns = permute(&self.ts_ns, &order);
    }

    fn bound(&mut self, start_ns: i64, stop_ns: i64) {
        let first = self.ts_ns.partition_point(|&ts| ts < start_ns);
        let last = self.ts_ns.partition_point(|&ts| ts <= stop_ns);
        window(&mut self.instrument, first, last);
        window(&mut self.price, first, last);
        window(&mut self.size, first, last);
        window(&mut self.match_id, first, last);
        window(&mut self.aggressor_side, first, last);
        window(&mut self.ts_ns, first, last);
    }
}

/// Stable ascending-timestamp permutation, so rows of equal timestamp keep instrument
/// registration order across replays.
fn sort_order(ts_ns: &[i64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ts_ns.len()).collect();
    order.sort_by_key(|&row| ts_ns[row]);
    order
}

fn permute<T: Clone>(column: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&row| column[row].clone()).collect()
}

/// Restrict a column to the half-open row range `[first, last)` in place.
fn window<T>(column: &mut Vec<T>, first: usize, last: usize) {
    column.truncate(last);
    column.drain(..first);
}

fn merge_quotes(container: &DataContainer) -> QuoteRun {
    let mut run = QuoteRun::default();
    for index in 0..container.instruments().len() {
        let Some(columns) = container.quotes(index) else {
            continue;
        };
        run.instrument.extend(std::iter::repeat_n(index, columns.len()));
        run.bid.extend_from_slice(&columns.bid);
        run.ask.extend_from_slice(&columns.ask);
        run.bid_size.extend_from_slice(&columns.bid_size);
        run.ask_size.extend_from_slice(&columns.ask_size);
        run.ts_ns.extend_from_slice(&columns.ts_ns);
    }
    run.sort();
    run
}

fn merge_trades(container: &DataContainer) -> TradeRun {
    let mut run = TradeRun::default();
    for index in 0..container.instruments().len() {
        let Some(columns) = container.trades(index) else {
            continue;
        };
        run.instrument.extend(std::iter::repeat_n(index, columns.len()));
        run.price.extend_from_slice(&columns.price);
        run.size.extend_from_slice(&columns.size);
        run.match_id.extend_from_slice(&columns.match_id);
        run.aggressor_side.extend_from_slice(&columns.aggressor_side);
        run.ts_ns.extend_from_slice(&columns.ts_ns);
    }
    run.sort();
    run
}

/// Validate every attached column group's shape and sort invariant, returning the container's
/// timestamp bounds.
fn validate_container(container: &DataContainer) -> Result<(i64, i64), DataError> {
    for (index, instrument) in container.instruments().iter().enumerate() {
        if let Some(columns) = container.quotes(index) {
            if !columns.is_coherent() {
                return Err(DataError::ContainerMalformed(format!(
                    "quote columns for {instrument} differ in length"
                )));
            }
            if !columns.ts_ns.is_sorted() {
                return Err(DataError::ContainerMalformed(format!(
                    "quote timestamps for {instrument} are not ascending"
                )));
            }
        }
        if let Some(columns) = container.trades(index) {
            if !columns.is_coherent() {
                return Err(DataError::ContainerMalformed(format!(
                    "trade columns for {instrument} differ in length"
                )));
            }
            if !columns.ts_ns.is_sorted() {
                return Err(DataError::ContainerMalformed(format!(
                    "trade timestamps for {instrument} are not ascending"
                )));
            }
        }
    }

    match (container.min_ts_ns(), container.max_ts_ns()) {
        (Some(min_ts_ns), Some(max_ts_ns)) => Ok((min_ts_ns, max_ts_ns)),
        _ => Err(DataError::ContainerMalformed(
            "container holds no tick rows".to_string(),
        )),
    }
}

/// Validate the container then the requested window against its bounds, returning the bounds.
pub(crate) fn validate_window(
    container: &DataContainer,
    start_ns: i64,
    stop_ns: i64,
) -> Result<(i64, i64), DataError> {
    let (min_ts_ns, max_ts_ns) = validate_container(container)?;
    if start_ns > stop_ns || start_ns < min_ts_ns || stop_ns > max_ts_ns {
        return Err(DataError::WindowInvalid {
            start_ns,
            stop_ns,
            min_ts_ns,
            max_ts_ns,
        });
    }
    Ok((min_ts_ns, max_ts_ns))
}

/// Merging producer core.
///
/// `setup` precomputes one globally time-sorted run per tick kind, restricted to the armed
/// window, then `next` interleaves the two runs through a pair of cursors with one
/// materialized look-ahead tick each - constant work per call, with `reset` rewinding in O(1)
/// and no re-merge.
#[derive(Debug)]
pub struct TickProducer {
    container: Arc<DataContainer>,
    quote_run: Option<QuoteRun>,
    trade_run: Option<TradeRun>,
    quote_cursor: usize,
    trade_cursor: usize,
    next_quote: Option<QuoteTick>,
    next_trade: Option<TradeTick>,
    has_data: bool,
}

impl TickProducer {
    pub fn new(container: Arc<DataContainer>) -> Self {
        Self {
            container,
            quote_run: None,
            trade_run: None,
            quote_cursor: 0,
            trade_cursor: 0,
            next_quote: None,
            next_trade: None,
            has_data: false,
        }
    }

    pub fn container(&self) -> &DataContainer {
        &self.container
    }

    /// Release the merged runs and look-ahead slots.
    pub fn clear(&mut self) {
        self.quote_run = None;
        self.trade_run = None;
        self.quote_cursor = 0;
        self.trade_cursor = 0;
        self.next_quote = None;
        self.next_trade = None;
        self.has_data = false;
    }

    fn stage_look_aheads(&mut self) {
        self.next_quote = self
            .quote_run
            .as_ref()
            .and_then(|run| run.materialize(self.quote_cursor, self.container.instruments()));
        self.next_trade = self
            .trade_run
            .as_ref()
            .and_then(|run| run.materialize(self.trade_cursor, self.container.instruments()));
        self.has_data = self.next_quote.is_some() || self.next_trade.is_some();
    }

    fn emit_quote(&mut self) -> Option<Tick> {
        let staged = self.next_quote.take()?;
        self.quote_cursor += 1;
        self.next_quote = self
            .quote_run
            .as_ref()
            .and_then(|run| run.materialize(self.quote_cursor, self.container.instruments()));
        Some(Tick::Quote(staged))
    }

    fn emit_trade(&mut self) -> Option<Tick> {
        let staged = self.next_trade.take()?;
        self.trade_cursor += 1;
        self.next_trade = self
            .trade_run
            .as_ref()
            .and_then(|run| run.materialize(self.trade_cursor, self.container.instruments()));
        Some(Tick::Trade(staged))
    }
}

impl MarketDataProducer for TickProducer {
    fn setup(&mut self, start_ns: i64, stop_ns: i64) -> Result<(), DataError> {
        validate_window(&self.container, start_ns, stop_ns)?;

        let mut quote_run = merge_quotes(&self.container);
        quote_run.bound(start_ns, stop_ns);
        let mut trade_run = merge_trades(&self.container);
        trade_run.bound(start_ns, stop_ns);

        debug!(
            start_ns,
            stop_ns,
            quotes = quote_run.len(),
            trades = trade_run.len(),
            catalog = %self.container.describe(),
            "merged columnar data for replay window"
        );

        self.quote_run = (!quote_run.is_empty()).then_some(quote_run);
        self.trade_run = (!trade_run.is_empty()).then_some(trade_run);
        self.quote_cursor = 0;
        self.trade_cursor = 0;
        self.stage_look_aheads();

        Ok(())
    }

    fn reset(&mut self) {
        self.quote_cursor = 0;
        self.trade_cursor = 0;
        self.stage_look_aheads();
    }

    fn next(&mut self) -> Option<Tick> {
        let emit_quote = match (&self.next_quote, &self.next_trade) {
            // Quotes precede trades at equal timestamps
            (Some(quote), Some(trade)) => quote.ts_ns <= trade.ts_ns,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => return None,
        };

        let tick = if emit_quote {
            self.emit_quote()
        } else {
            self.emit_trade()
        };
        self.has_data = self.next_quote.is_some() || self.next_trade.is_some();
        tick
    }

    fn has_data(&self) -> bool {
        self.has_data
    }
}
