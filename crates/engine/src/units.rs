//! The unit table and the lookups built on top of it.
//!
//! Every unit belongs to a [`Category`] and carries a `weight`: how many of
//! this unit make one base unit of the same category. The base unit of each
//! category has weight 1 and `is_base == true`.
//!
//! The table is a `static` and is never mutated, so every function here is a
//! plain read and may be called from any thread.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Kind of measurement. Units are only convertible inside one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Length,
    Volume,
    Mass,
    Count,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Length,
        Category::Volume,
        Category::Mass,
        Category::Count,
    ];

    /// Human readable label shown next to unit pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Category::Length => "длина",
            Category::Volume => "объем",
            Category::Mass => "масса",
            Category::Count => "шт",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A measurement unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unit {
    pub symbol: &'static str,
    pub category: Category,
    /// Number of this unit in one base unit (`1` for the base unit itself).
    pub weight: Decimal,
    pub is_base: bool,
}

impl Unit {
    const fn new(
        symbol: &'static str,
        category: Category,
        weight: Decimal,
        is_base: bool,
    ) -> Self {
        Self {
            symbol,
            category,
            weight,
            is_base,
        }
    }
}

/// All known units, in display order.
pub static UNITS: [Unit; 10] = [
    Unit::new("шт", Category::Count, dec!(1), true),
    Unit::new("м", Category::Length, dec!(1), true),
    Unit::new("дм", Category::Length, dec!(10), false),
    Unit::new("см", Category::Length, dec!(100), false),
    Unit::new("мм", Category::Length, dec!(1000), false),
    Unit::new("м³", Category::Volume, dec!(1), true),
    Unit::new("л", Category::Volume, dec!(1000), false),
    Unit::new("мл", Category::Volume, dec!(1000000), false),
    Unit::new("кг", Category::Mass, dec!(1), true),
    Unit::new("г", Category::Mass, dec!(1000), false),
];

/// Looks up a unit by its exact symbol.
#[must_use]
pub fn unit(symbol: &str) -> Option<&'static Unit> {
    UNITS.iter().find(|unit| unit.symbol == symbol)
}

/// Category of `symbol`, or `None` if the symbol is not registered.
#[must_use]
pub fn category_of(symbol: &str) -> Option<Category> {
    unit(symbol).map(|unit| unit.category)
}

/// All units of `category`, in table order.
#[must_use]
pub fn units_in_category(category: Category) -> Vec<&'static Unit> {
    UNITS
        .iter()
        .filter(|unit| unit.category == category)
        .collect()
}

/// Symbols sharing a category with `symbol` (including `symbol` itself).
///
/// Used to fill the unit picker when an existing catalog entry is re-priced.
/// Returns `None` for an unregistered symbol.
#[must_use]
pub fn units_same_category_as(symbol: &str) -> Option<Vec<&'static str>> {
    let category = category_of(symbol)?;
    Some(
        units_in_category(category)
            .into_iter()
            .map(|unit| unit.symbol)
            .collect(),
    )
}

/// Every registered symbol, in table order.
#[must_use]
pub fn all_symbols() -> Vec<&'static str> {
    UNITS.iter().map(|unit| unit.symbol).collect()
}

/// The base unit of `category`.
///
/// # Panics
///
/// Panics if the unit table does not hold exactly one base unit for
/// `category`. That is a defect in [`UNITS`], caught by [`check_catalog`] at
/// startup and by the tests.
#[must_use]
pub fn base_unit_of(category: Category) -> &'static Unit {
    match base_unit_in(&UNITS, category) {
        Ok(unit) => unit,
        Err(err) => panic!("{err}"),
    }
}

/// Verifies the invariants of [`UNITS`].
///
/// Meant to be called once at process start so a broken table aborts the
/// program instead of surfacing later as a wrong price.
pub fn check_catalog() -> ResultEngine<()> {
    check_table(&UNITS)
}

fn base_unit_in(table: &[Unit], category: Category) -> ResultEngine<&Unit> {
    let mut bases = table
        .iter()
        .filter(|unit| unit.category == category && unit.is_base);
    match (bases.next(), bases.next()) {
        (Some(base), None) => Ok(base),
        (None, _) => Err(EngineError::Configuration(format!(
            "no base unit for category {category}"
        ))),
        (Some(_), Some(_)) => Err(EngineError::Configuration(format!(
            "more than one base unit for category {category}"
        ))),
    }
}

fn check_table(table: &[Unit]) -> ResultEngine<()> {
    for (index, unit) in table.iter().enumerate() {
        if unit.weight <= Decimal::ZERO {
            return Err(EngineError::Configuration(format!(
                "unit \"{}\" has non-positive weight {}",
                unit.symbol, unit.weight
            )));
        }
        if table[..index].iter().any(|other| other.symbol == unit.symbol) {
            return Err(EngineError::Configuration(format!(
                "unit \"{}\" is declared twice",
                unit.symbol
            )));
        }
    }

    for category in Category::ALL {
        let base = base_unit_in(table, category)?;
        if base.weight != Decimal::ONE {
            return Err(EngineError::Configuration(format!(
                "base unit \"{}\" must have weight 1, found {}",
                base.symbol, base.weight
            )));
        }
    }
    Ok(())
}
