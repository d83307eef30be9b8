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

//! # Replay-Data
//! Replay-Data turns per-instrument columnar tick datasets into the single deterministic,
//! globally time-ordered stream a backtest engine consumes.
//!
//! At a high-level, it provides:
//! * [`Tick`](event::Tick) market events ([`QuoteTick`](event::QuoteTick) top-of-book updates
//!   and [`TradeTick`](event::TradeTick) executions) timestamped in nanoseconds.
//! * A read-only [`DataContainer`](container::DataContainer) holding each instrument's quote
//!   and trade column groups plus timestamp-range metadata.
//! * A [`TickProducer`](producer::TickProducer) that merges all column groups into one
//!   time-sorted run bounded by a `[start_ns, stop_ns]` replay window, with an O(1) look-ahead
//!   per tick kind and quotes winning timestamp ties.
//! * A [`CachedTickProducer`](cache::CachedTickProducer) that materializes the first full
//!   traversal so repeated replays (eg/ parameter sweeps) skip the merge entirely.

/// Market event data structures - [`QuoteTick`](event::QuoteTick),
/// [`TradeTick`](event::TradeTick) and the [`Tick`](event::Tick) wrapper.
pub mod event;

/// Read-only columnar [`DataContainer`](container::DataContainer) and its per-instrument
/// column groups.
pub mod container;

/// The [`MarketDataProducer`](producer::MarketDataProducer) seam and the merging
/// [`TickProducer`](producer::TickProducer) core.
pub mod producer;

/// Replay cache - [`CachedTickProducer`](cache::CachedTickProducer).
pub mod cache;

/// Contains the [`DataError`](error::DataError) variants producers surface.
pub mod error;
