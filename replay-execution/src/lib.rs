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

//! # Replay-Execution
//! Replay-Execution folds ordered [`OrderFilled`](event::OrderFilled) events into per-position
//! accounting state: running side, signed and absolute quantity, size-weighted average
//! open/close prices, realized and unrealized P&L with exact decimal arithmetic, cumulative
//! commissions per currency, and the position's temporal lifecycle.
//!
//! Direction flips, partial closes, inverse instruments and multi-currency commissions are all
//! handled by [`Position::apply`](position::Position::apply); duplicate executions are rejected
//! before any state mutation, so a failed apply leaves the position untouched.

/// The [`OrderFilled`](event::OrderFilled) event consumed by the position engine.
pub mod event;

/// [`Position`](position::Position) accounting state and the `calculate_*` P&L routines.
pub mod position;

/// Contains the [`PositionError`](error::PositionError) variants the engine surfaces.
pub mod error;
