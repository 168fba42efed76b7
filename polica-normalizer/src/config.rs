use clap::{Parser, Subcommand};

/// spec.md §4.E's golden-record orchestrator invoked as a CLI. With no
/// subcommand it supervises both passes end to end, spawning short-lived
/// worker processes (`normalize`/`best-offer`) over the OS process boundary
/// per spec.md §5's "OS-level worker processes, not threads" note. The
/// subcommands exist as a separate, directly-invocable entry point for that
/// re-exec, and are not meant to be run by hand in normal operation.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct NormalizerArgs {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,

    /// Number of worker processes run concurrently per pass.
    #[arg(long, env = "NORMALIZER_WORKER_COUNT", default_value = "4")]
    pub(crate) worker_count: usize,

    /// Number of products (pass F) or golden products (pass G) a single
    /// worker invocation claims per batch.
    #[arg(long, env = "NORMALIZER_BATCH_SIZE", default_value = "200")]
    pub(crate) batch_size: i64,

    /// Chat-completion model used to synthesize canonical records.
    #[arg(long, env = "NORMALIZER_CHAT_MODEL", default_value = "gpt-4o-mini")]
    pub(crate) chat_model: String,

    /// Embedding model used for `text_for_embedding`.
    #[arg(long, env = "NORMALIZER_EMBEDDING_MODEL", default_value = "text-embedding-3-small")]
    pub(crate) embedding_model: String,

    /// OpenTelemetry endpoint for telemetry data
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub(crate) otel_endpoint: Option<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Runs one batch of spec.md §4.F for `[start_id, start_id + batch_size)`.
    Normalize {
        #[arg(long)]
        start_id: uuid::Uuid,
        #[arg(long)]
        batch_size: i64,
        #[arg(long, default_value = "gpt-4o-mini")]
        chat_model: String,
        #[arg(long, default_value = "text-embedding-3-small")]
        embedding_model: String,
    },
    /// Runs one batch of spec.md §4.G for `[start_id, start_id + batch_size)`.
    BestOffer {
        #[arg(long)]
        start_id: uuid::Uuid,
        #[arg(long)]
        batch_size: i64,
    },
}

pub(crate) fn load_configuration() -> NormalizerArgs {
    NormalizerArgs::parse()
}
