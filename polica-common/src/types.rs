use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// The physical quantity a `GProduct`'s variants are expressed in.
///
/// Drives which `price_per_*` column is computed for every `GPrice`
/// belonging to that product (see `polica-normalizer`'s unit-price math).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum BaseUnitType {
    Weight,
    Volume,
    Count,
}

/// One declared packaging variant of a golden product, e.g. `{unit: "g", value: 400}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    pub unit: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece_count: Option<f64>,
}

/// Shared terminal/non-terminal status vocabulary for `CrawlRun` and `ImportRun`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum RunStatus {
    Started,
    Success,
    Failed,
    Skipped,
}

impl RunStatus {
    /// `STARTED` is the only non-terminal status; everything else is final
    /// for a given `(chain, date)` pair.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_status_terminal() {
        assert!(!RunStatus::Started.is_terminal());
        assert!(RunStatus::Success.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Skipped.is_terminal());
    }

    #[test]
    fn base_unit_type_round_trips_through_serde() {
        let json = serde_json::to_string(&BaseUnitType::Weight).unwrap();
        assert_eq!(json, "\"WEIGHT\"");
        let back: BaseUnitType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BaseUnitType::Weight);
    }
}
