mod common;

mod best_offer_monotonicity;
mod crawl_run_lifecycle;
mod golden_record_pipeline;
mod import_idempotence;
