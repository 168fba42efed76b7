//! Builds the set of concrete chain adapters to crawl (spec.md §4.A). Each
//! chain's per-store index URL is process-global configuration (spec.md
//! §5), read from a `<CHAIN>_INDEX_URL` environment variable.

use polica_adapters::sources::{
    EurospinAdapter, KauflandAdapter, KonzumAdapter, LidlAdapter, PlodineAdapter, SparAdapter,
    StudenacAdapter, TommyAdapter,
};
use polica_adapters::ChainAdapter;

/// All chains the orchestrator knows how to crawl, in a fixed order so
/// logs and `--chains` filtering are deterministic.
pub(crate) fn all_adapters(client: reqwest::Client) -> Vec<Box<dyn ChainAdapter>> {
    vec![
        Box::new(KonzumAdapter::new(client.clone(), index_url("KONZUM"))),
        Box::new(LidlAdapter::new(client.clone(), index_url("LIDL"))),
        Box::new(SparAdapter::new(client.clone(), index_url("SPAR"))),
        Box::new(PlodineAdapter::new(client.clone(), index_url("PLODINE"))),
        Box::new(KauflandAdapter::new(client.clone(), index_url("KAUFLAND"))),
        Box::new(EurospinAdapter::new(client.clone(), index_url("EUROSPIN"))),
        Box::new(StudenacAdapter::new(client.clone(), index_url("STUDENAC"))),
        Box::new(TommyAdapter::new(client, index_url("TOMMY"))),
    ]
}

fn index_url(chain: &str) -> String {
    std::env::var(format!("{chain}_INDEX_URL")).unwrap_or_else(|_| {
        panic!("missing {chain}_INDEX_URL environment variable for chain adapter registry")
    })
}
