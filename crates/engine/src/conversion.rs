//! Unit conversion and pricing.
//!
//! All arithmetic is done on [`Decimal`]; rounding happens only when a
//! [`Money`] is produced ([`price_for_quantity`] and [`unit_price_per_base`]).
//!
//! Two failure policies live side by side here:
//! - [`normalize_to_base`] needs the exact category of its unit and fails with
//!   [`EngineError::UnknownUnit`];
//! - [`ratio`] (and therefore [`price_for_quantity`]) falls back to an
//!   identity ratio when a symbol is unknown, so unit pickers can be filled
//!   without pre-validation.

use rust_decimal::Decimal;

use crate::{EngineError, Money, ResultEngine, units};

/// Expresses `value` (measured in `symbol`) in the base unit of its category.
///
/// Returns the base symbol and the converted value. The value is not rounded.
///
/// # Examples
///
/// ```rust
/// use engine::conversion::normalize_to_base;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(normalize_to_base("г", dec!(2500)).unwrap(), ("кг", dec!(2.5)));
/// ```
pub fn normalize_to_base(symbol: &str, value: Decimal) -> ResultEngine<(&'static str, Decimal)> {
    let unit = units::unit(symbol).ok_or_else(|| EngineError::UnknownUnit(symbol.to_string()))?;
    let base = units::base_unit_of(unit.category);

    let normalized = value
        .checked_div(unit.weight)
        .and_then(|v| v.checked_mul(base.weight))
        .ok_or_else(|| EngineError::Overflow(format!("normalizing {value} {symbol}")))?;

    Ok((base.symbol, normalized))
}

/// Factor turning a quantity in `current` into the scale of `target`:
/// `weight(target) / weight(current)`.
///
/// Unknown symbols give `1`. The categories of the two units are not compared,
/// so a cross-category pair yields a ratio of raw weights; callers that care
/// check [`units::category_of`] first.
#[must_use]
pub fn ratio(current: &str, target: &str) -> Decimal {
    match (units::unit(current), units::unit(target)) {
        (Some(current), Some(target)) => target.weight / current.weight,
        _ => {
            tracing::debug!(current, target, "unknown unit in ratio, using identity");
            Decimal::ONE
        }
    }
}

/// Cost of `quantity` of `requested_unit` for a catalog entry priced at
/// `unit_price` per one `catalog_unit`.
///
/// The product is rounded once, to kopecks, half away from zero. A zero
/// quantity gives a zero price; rejecting it is up to the caller.
///
/// Fails only with [`EngineError::Overflow`] when the product leaves the
/// decimal range or has no room left for two fractional digits.
pub fn price_for_quantity(
    unit_price: Decimal,
    quantity: Decimal,
    requested_unit: &str,
    catalog_unit: &str,
) -> ResultEngine<Money> {
    let r = ratio(requested_unit, catalog_unit);
    unit_price
        .checked_mul(quantity)
        .and_then(|v| v.checked_mul(r))
        .and_then(Money::checked_round)
        .ok_or_else(|| {
            EngineError::Overflow(format!(
                "pricing {quantity} {requested_unit} at {unit_price} per {catalog_unit}"
            ))
        })
}

/// Price of one `purchase_unit` given `total_price` paid for
/// `quantity_bought` of them, rounded to kopecks.
///
/// The unit is returned unchanged; no unit conversion happens here.
pub fn unit_price_per_base<'a>(
    total_price: Decimal,
    quantity_bought: Decimal,
    purchase_unit: &'a str,
) -> ResultEngine<(&'a str, Money)> {
    if quantity_bought <= Decimal::ZERO {
        return Err(EngineError::InvalidQuantity(format!(
            "quantity bought must be greater than 0, got {quantity_bought}"
        )));
    }

    let per_unit = total_price
        .checked_div(quantity_bought)
        .and_then(Money::checked_round)
        .ok_or_else(|| {
            EngineError::Overflow(format!("dividing {total_price} by {quantity_bought}"))
        })?;
    Ok((purchase_unit, per_unit))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::units::{Category, UNITS, all_symbols, base_unit_of};

    #[test]
    fn normalize_grams_to_kilograms() {
        assert_eq!(normalize_to_base("г", dec!(2500)), Ok(("кг", dec!(2.5))));
    }

    #[test]
    fn normalize_finer_units() {
        assert_eq!(normalize_to_base("мл", dec!(250)), Ok(("м³", dec!(0.00025))));
        assert_eq!(normalize_to_base("см", dec!(150)), Ok(("м", dec!(1.5))));
        assert_eq!(normalize_to_base("дм", dec!(3)), Ok(("м", dec!(0.3))));
    }

    #[test]
    fn normalize_base_is_identity() {
        for category in Category::ALL {
            let base = base_unit_of(category);
            for value in [dec!(0), dec!(1), dec!(12.345), dec!(-7.5)] {
                assert_eq!(normalize_to_base(base.symbol, value), Ok((base.symbol, value)));
            }
        }
    }

    #[test]
    fn normalize_does_not_round() {
        assert_eq!(normalize_to_base("мм", dec!(1)), Ok(("м", dec!(0.001))));
    }

    #[test]
    fn normalize_unknown_unit() {
        assert_eq!(
            normalize_to_base("xyz", dec!(1)),
            Err(EngineError::UnknownUnit("xyz".to_string()))
        );
    }

    #[test]
    fn ratio_with_itself_is_one() {
        for symbol in all_symbols() {
            assert_eq!(ratio(symbol, symbol), Decimal::ONE, "{symbol}");
        }
    }

    #[test]
    fn ratio_is_invertible() {
        for a in &UNITS {
            for b in &UNITS {
                assert_eq!(
                    ratio(a.symbol, b.symbol) * ratio(b.symbol, a.symbol),
                    Decimal::ONE,
                    "{} / {}",
                    a.symbol,
                    b.symbol
                );
            }
        }
    }

    #[test]
    fn ratio_direction() {
        assert_eq!(ratio("см", "м"), dec!(0.01));
        assert_eq!(ratio("м", "см"), dec!(100));
        assert_eq!(ratio("г", "кг"), dec!(0.001));
    }

    #[test]
    fn ratio_unknown_is_identity() {
        assert_eq!(ratio("xyz", "м"), Decimal::ONE);
        assert_eq!(ratio("м", "xyz"), Decimal::ONE);
        assert_eq!(ratio("", ""), Decimal::ONE);
    }

    #[test]
    fn ratio_does_not_check_categories() {
        // grams against metres: raw weights, 1 / 1000
        assert_eq!(ratio("г", "м"), dec!(0.001));
    }

    #[test]
    fn centimetres_of_metre_priced_good() {
        assert_eq!(
            price_for_quantity(dec!(100.00), dec!(100), "см", "м"),
            Ok(Money::from_kopecks(10000))
        );
        assert_eq!(
            price_for_quantity(dec!(100.00), dec!(50), "см", "м"),
            Ok(Money::from_kopecks(5000))
        );
    }

    #[test]
    fn grams_of_kilogram_priced_good() {
        assert_eq!(
            price_for_quantity(dec!(89.90), dec!(250), "г", "кг"),
            Ok(Money::round(dec!(22.475)))
        );
        assert_eq!(
            price_for_quantity(dec!(89.90), dec!(250), "г", "кг"),
            Ok(Money::from_kopecks(2248))
        );
    }

    #[test]
    fn price_rounds_half_up() {
        assert_eq!(
            price_for_quantity(dec!(12.345), dec!(1), "шт", "шт"),
            Ok(Money::from_kopecks(1235))
        );
        assert_eq!(
            price_for_quantity(dec!(12.344), dec!(1), "шт", "шт"),
            Ok(Money::from_kopecks(1234))
        );
    }

    #[test]
    fn price_zero_quantity() {
        assert_eq!(
            price_for_quantity(dec!(100), Decimal::ZERO, "см", "м"),
            Ok(Money::ZERO)
        );
    }

    #[test]
    fn price_unknown_unit_uses_identity() {
        assert_eq!(
            price_for_quantity(dec!(10), dec!(3), "xyz", "м"),
            Ok(Money::from_kopecks(3000))
        );
    }

    #[test]
    fn price_is_repeatable() {
        let first = price_for_quantity(dec!(33.33), dec!(7), "мл", "л");
        let second = price_for_quantity(dec!(33.33), dec!(7), "мл", "л");
        assert_eq!(first, second);
    }

    #[test]
    fn price_overflow_is_reported() {
        assert!(matches!(
            price_for_quantity(Decimal::MAX, dec!(10), "шт", "шт"),
            Err(EngineError::Overflow(_))
        ));
    }

    #[test]
    fn price_without_room_for_kopecks_is_overflow() {
        assert!(matches!(
            price_for_quantity(Decimal::MAX, dec!(1), "шт", "шт"),
            Err(EngineError::Overflow(_))
        ));
        assert!(matches!(
            unit_price_per_base(Decimal::MAX, dec!(1), "шт"),
            Err(EngineError::Overflow(_))
        ));
    }

    #[test]
    fn per_unit_price() {
        assert_eq!(
            unit_price_per_base(dec!(50.00), dec!(4), "шт"),
            Ok(("шт", Money::from_kopecks(1250)))
        );
        assert_eq!(
            unit_price_per_base(dec!(10), dec!(3), "кг"),
            Ok(("кг", Money::from_kopecks(333)))
        );
        assert_eq!(
            unit_price_per_base(dec!(0.25), dec!(2), "л"),
            Ok(("л", Money::from_kopecks(13)))
        );
    }

    #[test]
    fn per_unit_price_rejects_non_positive_quantity() {
        assert!(matches!(
            unit_price_per_base(dec!(50), Decimal::ZERO, "шт"),
            Err(EngineError::InvalidQuantity(_))
        ));
        assert!(matches!(
            unit_price_per_base(dec!(50), dec!(-1), "шт"),
            Err(EngineError::InvalidQuantity(_))
        ));
    }
}
