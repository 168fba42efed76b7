#[derive(Debug)]
pub enum ConversionError {
    FailedSerialization,
    InvalidDateTime,
    BigDecimalConversion,
}
