use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, StrExt};
use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt::{Display, Formatter},
    ops::{Div, Mul, Neg},
};
use thiserror::Error;

/// Uppercase `SmolStr` currency code used to tag [`Money`] values.
///
/// eg/ `Currency::new("USD")`, `Currency::new("BTC")`.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct Currency(SmolStr);

impl Currency {
    /// Construct a new uppercase [`Self`] from the provided `Into<SmolStr>`.
    pub fn new<S>(code: S) -> Self
    where
        S: Into<SmolStr>,
    {
        let code = code.into();
        if code.chars().all(|char| char.is_ascii_uppercase() || char.is_ascii_digit()) {
            Self(code)
        } else {
            Self(code.to_uppercase_smolstr())
        }
    }

    /// Return the currency code `SmolStr` of [`Self`].
    pub fn code(&self) -> &SmolStr {
        &self.0
    }
}

impl From<&str> for Currency {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<SmolStr> for Currency {
    fn from(value: SmolStr) -> Self {
        Self::new(value)
    }
}

impl From<String> for Currency {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for Currency {
    fn borrow(&self) -> &str {
        self.0.borrow()
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> serde::de::Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let code = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        Ok(Currency::new(code.as_ref()))
    }
}

/// Exact `Decimal` amount tagged with the [`Currency`] it is denominated in.
///
/// Addition and subtraction are only defined within one currency, so both are checked
/// operations failing with [`MoneyError::CurrencyMismatch`] across currencies. Scalar
/// multiplication, division and negation preserve the currency and are total.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Construct a zero amount of the provided [`Currency`].
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Add `other` to [`Self`], failing if the currencies differ.
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_currency(other)?;
        Ok(Money::new(self.amount + other.amount, self.currency.clone()))
    }

    /// Subtract `other` from [`Self`], failing if the currencies differ.
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_currency(other)?;
        Ok(Money::new(self.amount - other.amount, self.currency.clone()))
    }

    fn check_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                lhs: self.currency.clone(),
                rhs: other.currency.clone(),
            })
        }
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money::new(-self.amount, self.currency)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Money::new(self.amount * rhs, self.currency)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, rhs: Decimal) -> Self::Output {
        Money::new(self.amount / rhs, self.currency)
    }
}

impl PartialOrd for Money {
    /// Amount ordering within one currency - `None` across currencies.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.currency == other.currency).then(|| self.amount.cmp(&other.amount))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Contains error variants that can occur when operating on [`Money`] values.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Error)]
pub enum MoneyError {
    #[error("currency mismatch: {lhs} != {rhs}")]
    CurrencyMismatch { lhs: Currency, rhs: Currency },
}
