//! Shared CSV reading conventions for chain adapters (spec.md §9): a
//! comma-delimited dialect with a header row, falling back to `cp1250`
//! decoding when a source's CSV export isn't valid UTF-8 (common among
//! the legacy export tools some Croatian chains still run).

use encoding_rs::WINDOWS_1250;

/// Decodes raw bytes as UTF-8, falling back to Windows-1250 (cp1250) if the
/// bytes aren't valid UTF-8. Lossless when the input actually is UTF-8.
pub fn decode_with_cp1250_fallback(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (cow, _, had_errors) = WINDOWS_1250.decode(bytes);
            if had_errors {
                tracing::warn!("cp1250 decoding produced replacement characters");
            }
            cow.into_owned()
        }
    }
}

/// Builds a `csv::ReaderBuilder` with the shared dialect: comma-delimited,
/// header row present, flexible field counts (some chains emit ragged rows
/// for optional trailing columns).
pub fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.delimiter(b',').has_headers(true).flexible(true);
    builder
}

/// Builds a `csv::WriterBuilder` matching the dialect used for our own
/// archive CSVs (spec.md §6): comma-delimited, header row written.
pub fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(b',').has_headers(true);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_utf8_as_is() {
        let bytes = "Čokolada, 12.50".as_bytes();
        assert_eq!(decode_with_cp1250_fallback(bytes), "Čokolada, 12.50");
    }

    #[test]
    fn falls_back_to_cp1250_on_invalid_utf8() {
        let (encoded, _, _) = WINDOWS_1250.encode("Čokolada");
        let decoded = decode_with_cp1250_fallback(&encoded);
        assert_eq!(decoded, "Čokolada");
    }
}
