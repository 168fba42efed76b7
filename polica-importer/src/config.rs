use clap::Parser;

/// spec.md §4.D's import engine invoked as a CLI: a directory of per-chain
/// `.zip` archives plus the date they were crawled for.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct ImporterArgs {
    /// Directory containing one `<chain>.zip` per chain to import.
    #[arg(long, env = "IMPORT_ARCHIVE_DIR")]
    pub(crate) archive_dir: std::path::PathBuf,

    /// Date the archives were crawled for (defaults to today in UTC).
    #[arg(long, env = "IMPORT_DATE")]
    pub(crate) import_date: Option<chrono::NaiveDate>,

    /// Max number of chains imported concurrently (spec.md §4.D).
    #[arg(long, env = "IMPORT_CONCURRENCY", default_value = "4")]
    pub(crate) concurrency: usize,

    /// Per-chain import timeout in seconds.
    #[arg(long, env = "IMPORT_TIMEOUT_SECS", default_value = "600")]
    pub(crate) timeout_secs: u64,

    /// OpenTelemetry endpoint for telemetry data
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub(crate) otel_endpoint: Option<String>,
}

pub(crate) fn load_configuration() -> ImporterArgs {
    ImporterArgs::parse()
}
