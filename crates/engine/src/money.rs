use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::EngineError;

/// Number of fractional digits every amount is kept at.
pub const MONEY_SCALE: u32 = 2;

/// A money amount with exactly two fractional digits (rubles and kopecks).
///
/// Amounts are plain decimals, never binary floats. The only way to get a
/// `Money` out of an arbitrary decimal is [`Money::round`], which applies
/// round-half-up (away from zero) at the third fractional digit.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(Money::round(dec!(12.345)).to_string(), "12.35");
/// assert_eq!(Money::round(dec!(12.344)).to_string(), "12.34");
/// assert_eq!(Money::round(dec!(0.125)).to_string(), "0.13");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().to_string(), "10.00");
/// assert_eq!("10,5".parse::<Money>().unwrap().to_string(), "10.50");
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Rounds `raw` to two decimal places, midpoint away from zero.
    ///
    /// Values with more than 26 integer digits cannot carry two fractional
    /// digits in a [`Decimal`] and keep a smaller scale; use
    /// [`Money::checked_round`] where such inputs are possible.
    #[must_use]
    pub fn round(raw: Decimal) -> Self {
        let mut value =
            raw.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(MONEY_SCALE);
        Self(value)
    }

    /// Like [`Money::round`], but `None` when the result cannot be held with
    /// exactly two fractional digits.
    #[must_use]
    pub fn checked_round(raw: Decimal) -> Option<Self> {
        let money = Self::round(raw);
        (money.0.scale() == MONEY_SCALE).then_some(money)
    }

    /// Creates an amount from integer kopecks.
    #[must_use]
    pub fn from_kopecks(kopecks: i64) -> Self {
        Self(Decimal::new(kopecks, MONEY_SCALE))
    }

    /// Returns the amount as a decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns the raw value in kopecks.
    #[must_use]
    pub fn kopecks(self) -> i128 {
        let mut value = self.0;
        value.rescale(MONEY_SCALE);
        value.mantissa()
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Formats the amount as `"{rubles} руб. {kopecks} коп."`.
    #[must_use]
    pub fn to_rubles_string(self) -> String {
        let kopecks = self.kopecks();
        let sign = if kopecks < 0 { "-" } else { "" };
        let abs = kopecks.unsigned_abs();
        format!("{sign}{} руб. {} коп.", abs / 100, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        value.rescale(MONEY_SCALE);
        fmt::Display::fmt(&value, f)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into an amount.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Rejects more than 2 fractional digits (`12.345`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let value = Decimal::from_str(&trimmed.replace(',', "."))
            .map_err(|_| EngineError::InvalidAmount(format!("invalid amount: {s}")))?;
        if value.scale() > MONEY_SCALE {
            return Err(EngineError::InvalidAmount("too many decimals".to_string()));
        }
        Money::checked_round(value)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))
    }
}
