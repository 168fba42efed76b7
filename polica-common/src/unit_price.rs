//! Deterministic unit-price conversion shared by the archive writer
//! (`polica-adapters`) and the golden-record pipeline (`polica-normalizer`):
//! both turn a raw shelf price into a per-kg/per-L/per-piece figure using the
//! exact same rules (spec.md §4.G), so the formula lives here once.

use bigdecimal::{BigDecimal, Zero};

use crate::types::{BaseUnitType, Variant};

/// The three possible unit-price projections of one price observation.
/// Exactly one field is ever `Some`, matching the product's `base_unit_type`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitPrices {
    pub price_per_kg: Option<BigDecimal>,
    pub price_per_l: Option<BigDecimal>,
    pub price_per_piece: Option<BigDecimal>,
}

/// Computes `UnitPrices` for `price` against a product's `base_unit_type`
/// and its first declared packaging `variant`, per spec.md §4.G:
///
/// - WEIGHT: `unit="g"` → `price / value * 1000`; `unit="kg"` → `price / value`.
/// - VOLUME: `unit="ml"` → `price / value * 1000`; `unit="l"` → `price / value`.
/// - COUNT: `piece_count > 0` → `price / piece_count`; else `unit="kom"` → `price / value`.
///
/// Any division-by-zero, missing field, or unit mismatch yields `None` for
/// that metric rather than erroring — normalization failures are per-EAN,
/// not fatal to the whole batch (spec.md §4.F step 7).
pub fn compute_unit_prices(
    price: &BigDecimal,
    base_unit_type: BaseUnitType,
    variant: Option<&Variant>,
) -> UnitPrices {
    let Some(variant) = variant else {
        return UnitPrices::default();
    };

    let value = BigDecimal::try_from(variant.value).ok();
    let piece_count = variant.piece_count.and_then(|p| BigDecimal::try_from(p).ok());

    match base_unit_type {
        BaseUnitType::Weight => UnitPrices {
            price_per_kg: match variant.unit.as_str() {
                "g" => divide(price, value.as_ref()).map(|p| p * BigDecimal::from(1000)),
                "kg" => divide(price, value.as_ref()),
                _ => None,
            },
            ..Default::default()
        },
        BaseUnitType::Volume => UnitPrices {
            price_per_l: match variant.unit.as_str() {
                "ml" => divide(price, value.as_ref()).map(|p| p * BigDecimal::from(1000)),
                "l" => divide(price, value.as_ref()),
                _ => None,
            },
            ..Default::default()
        },
        BaseUnitType::Count => UnitPrices {
            price_per_piece: if piece_count.as_ref().is_some_and(|c| !c.is_zero()) {
                divide(price, piece_count.as_ref())
            } else if variant.unit == "kom" {
                divide(price, value.as_ref())
            } else {
                None
            },
            ..Default::default()
        },
    }
}

/// `a / b`, `None` if `b` is absent or zero (division-by-zero guard from
/// spec.md §4.G).
fn divide(a: &BigDecimal, b: Option<&BigDecimal>) -> Option<BigDecimal> {
    match b {
        Some(b) if !b.is_zero() => Some(a / b),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn bd(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn weight_grams_converts_to_per_kg() {
        let variant = Variant {
            unit: "g".into(),
            value: 400.0,
            piece_count: None,
        };
        let result = compute_unit_prices(&bd("8.00"), BaseUnitType::Weight, Some(&variant));
        assert_eq!(result.price_per_kg, Some(bd("20")));
        assert_eq!(result.price_per_l, None);
        assert_eq!(result.price_per_piece, None);
    }

    #[test]
    fn count_with_piece_count_divides_by_pieces() {
        let variant = Variant {
            unit: "g".into(),
            value: 400.0,
            piece_count: Some(4.0),
        };
        let result = compute_unit_prices(&bd("12.00"), BaseUnitType::Count, Some(&variant));
        assert_eq!(result.price_per_piece, Some(bd("3")));
    }

    #[test]
    fn volume_ml_converts_to_per_l() {
        let variant = Variant {
            unit: "ml".into(),
            value: 500.0,
            piece_count: None,
        };
        let result = compute_unit_prices(&bd("2.50"), BaseUnitType::Volume, Some(&variant));
        assert_eq!(result.price_per_l, Some(bd("5")));
    }

    #[test]
    fn zero_value_yields_none_instead_of_panicking() {
        let variant = Variant {
            unit: "kg".into(),
            value: 0.0,
            piece_count: None,
        };
        let result = compute_unit_prices(&bd("5.00"), BaseUnitType::Weight, Some(&variant));
        assert_eq!(result.price_per_kg, None);
    }

    #[test]
    fn missing_variant_yields_all_none() {
        let result = compute_unit_prices(&bd("5.00"), BaseUnitType::Weight, None);
        assert_eq!(result, UnitPrices::default());
    }

    #[test]
    fn count_without_piece_count_or_kom_unit_yields_none() {
        let variant = Variant {
            unit: "g".into(),
            value: 400.0,
            piece_count: None,
        };
        let result = compute_unit_prices(&bd("5.00"), BaseUnitType::Count, Some(&variant));
        assert_eq!(result.price_per_piece, None);
    }
}
