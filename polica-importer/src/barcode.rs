//! Barcode cleaning (spec.md §4.D step 5): an accepted barcode is either the
//! synthetic `"<chain>:<product_id>"` form or at least 8 decimal digits;
//! anything else (garbled scans, chain-internal SKUs mislabeled as EANs) is
//! replaced with the synthetic form so every product still gets a stable key.

pub(crate) fn clean_barcode(chain: &str, product_id: &str, barcode: Option<&str>) -> String {
    let synthetic = || format!("{chain}:{product_id}");

    match barcode {
        Some(b) if is_synthetic(chain, b) => b.to_string(),
        Some(b) if b.len() >= 8 && b.chars().all(|c| c.is_ascii_digit()) => b.to_string(),
        _ => synthetic(),
    }
}

fn is_synthetic(chain: &str, barcode: &str) -> bool {
    barcode.starts_with(&format!("{chain}:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_valid_long_digit_barcode() {
        assert_eq!(clean_barcode("konzum", "P1", Some("3858881234567")), "3858881234567");
    }

    #[test]
    fn keeps_existing_synthetic_barcode() {
        assert_eq!(clean_barcode("konzum", "P1", Some("konzum:P1")), "konzum:P1");
    }

    #[test]
    fn synthesizes_for_short_or_non_numeric_barcode() {
        assert_eq!(clean_barcode("konzum", "P1", Some("ABC123")), "konzum:P1");
        assert_eq!(clean_barcode("konzum", "P1", Some("1234")), "konzum:P1");
    }

    #[test]
    fn synthesizes_when_missing() {
        assert_eq!(clean_barcode("konzum", "P1", None), "konzum:P1");
    }
}
