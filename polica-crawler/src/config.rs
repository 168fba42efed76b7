use clap::Parser;

/// spec.md §4.C's ingestion orchestrator invoked as a CLI: a root directory
/// to archive into, the date to crawl, and an optional subset of chains.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct CrawlerArgs {
    /// Root directory archives are written under as `<root>/<date>/<chain>.zip`.
    #[arg(long, env = "CRAWL_ARCHIVE_ROOT")]
    pub(crate) root: std::path::PathBuf,

    /// Date to crawl for (defaults to today in UTC).
    #[arg(long, env = "CRAWL_DATE")]
    pub(crate) crawl_date: Option<chrono::NaiveDate>,

    /// Comma-separated subset of chain codes to crawl (defaults to all
    /// registered chains).
    #[arg(long, env = "CRAWL_CHAINS", value_delimiter = ',')]
    pub(crate) chains: Option<Vec<String>>,

    /// HTTP client timeout, in seconds, for every adapter fetch.
    #[arg(long, env = "CRAWL_HTTP_TIMEOUT_SECS", default_value = "30")]
    pub(crate) http_timeout_secs: u64,

    /// OpenTelemetry endpoint for telemetry data
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub(crate) otel_endpoint: Option<String>,
}

pub(crate) fn load_configuration() -> CrawlerArgs {
    CrawlerArgs::parse()
}
