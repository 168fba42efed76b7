//! One module per Croatian chain covered by spec.md §4.A. Each adapter
//! exposes a pure `parse_response` so its CSV/JSON dialect quirks are
//! unit-testable against canned fixture bodies without a mock HTTP server.

pub mod common;
pub mod eurospin;
pub mod kaufland;
pub mod konzum;
pub mod lidl;
pub mod plodine;
pub mod spar;
pub mod studenac;
pub mod tommy;

pub use eurospin::EurospinAdapter;
pub use kaufland::KauflandAdapter;
pub use konzum::KonzumAdapter;
pub use lidl::LidlAdapter;
pub use plodine::PlodineAdapter;
pub use spar::SparAdapter;
pub use studenac::StudenacAdapter;
pub use tommy::TommyAdapter;
