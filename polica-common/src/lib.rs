pub mod csv_dialect;
pub mod errors;
pub mod telemetry;
pub mod types;
pub mod unit_price;

pub use types::{BaseUnitType, RunStatus, Variant};
pub use unit_price::{compute_unit_prices, UnitPrices};
