use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contains error variants that can occur when producing market data from a
/// [`DataContainer`](crate::container::DataContainer).
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Error)]
pub enum DataError {
    #[error(
        "invalid replay window: [{start_ns}, {stop_ns}] outside container bounds [{min_ts_ns}, {max_ts_ns}]"
    )]
    WindowInvalid {
        start_ns: i64,
        stop_ns: i64,
        min_ts_ns: i64,
        max_ts_ns: i64,
    },

    #[error("malformed container: {0}")]
    ContainerMalformed(String),
}
