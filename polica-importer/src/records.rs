//! Raw row shapes read back out of the archive CSVs (spec.md §6), mirroring
//! what `polica-adapters::archive` writes. Field parsing is lenient: empty
//! strings become `None` rather than failing the row.

use bigdecimal::BigDecimal;
use serde::Deserialize;

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoreRow {
    pub store_id: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub r#type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub zipcode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductRow {
    pub product_id: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub barcode: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub quantity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PriceRow {
    pub store_id: String,
    pub product_id: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub unit_price: String,
    #[serde(default)]
    pub best_price_30: String,
    #[serde(default)]
    pub anchor_price: String,
    #[serde(default)]
    pub special_price: String,
}

/// Coerces an empty or zero-valued price cell to `None`, per spec.md §4.D
/// step 6 ("coerce empty/zero price strings to null").
pub(crate) fn parse_optional_price(raw: &str) -> Option<BigDecimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed: BigDecimal = trimmed.parse().ok()?;
    if parsed == BigDecimal::from(0) {
        None
    } else {
        Some(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_price_string_is_none() {
        assert_eq!(parse_optional_price(""), None);
    }

    #[test]
    fn zero_price_is_none() {
        assert_eq!(parse_optional_price("0"), None);
        assert_eq!(parse_optional_price("0.00"), None);
    }

    #[test]
    fn nonzero_price_parses() {
        assert_eq!(parse_optional_price("1.29"), Some(BigDecimal::from_str("1.29").unwrap()));
    }

    use std::str::FromStr;
}
