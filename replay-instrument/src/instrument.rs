use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// Unique identity of a tradable symbol at a venue, rendered as `"{symbol}.{venue}"`.
///
/// eg/ `InstrumentId::new("EUR/USD", "SIM")` <-> `"EUR/USD.SIM"`.
///
/// The venue is the component after the last `.`, so symbols may themselves contain dots.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct InstrumentId {
    pub symbol: SmolStr,
    pub venue: SmolStr,
}

impl InstrumentId {
    pub fn new<S, V>(symbol: S, venue: V) -> Self
    where
        S: AsRef<str>,
        V: AsRef<str>,
    {
        Self {
            symbol: SmolStr::new(symbol),
            venue: SmolStr::new(venue),
        }
    }
}

impl Display for InstrumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.symbol, self.venue)
    }
}

impl FromStr for InstrumentId {
    type Err = ParseInstrumentIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.rsplit_once('.') {
            Some((symbol, venue)) if !symbol.is_empty() && !venue.is_empty() => {
                Ok(Self::new(symbol, venue))
            }
            _ => Err(ParseInstrumentIdError(SmolStr::new(value))),
        }
    }
}

impl Serialize for InstrumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InstrumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let value = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        InstrumentId::from_str(value.as_ref()).map_err(serde::de::Error::custom)
    }
}

/// Input string was not of the `"{symbol}.{venue}"` form.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Error)]
#[error("invalid InstrumentId: expected \"{{symbol}}.{{venue}}\", got: {0}")]
pub struct ParseInstrumentIdError(pub SmolStr);
