use chrono::NaiveDate;
use polica_common::RunStatus;
use polica_entities::{ImportCounters, ImportRun};
use rstest::rstest;

use crate::common::containers::{test_db, TestDb};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

/// spec.md §8 scenario 2: re-running a `SUCCESS` import for the same
/// `(chain_name, import_date)` must be a no-op, not a second import.
#[rstest]
#[tokio::test]
async fn success_import_blocks_a_second_attempt_for_the_same_day(#[future] test_db: TestDb) {
    let db = test_db.await;
    let conn = db.pool.get().await.unwrap();

    let run = conn
        .interact(move |conn| ImportRun::try_start(conn, None, "spar", date(), Some("/archives/spar.zip".into())))
        .await
        .unwrap()
        .unwrap()
        .expect("first attempt should claim the slot");

    conn.interact(move |conn| ImportRun::finish(conn, run.id, RunStatus::Success, None, ImportCounters::default(), 3.0))
        .await
        .unwrap()
        .unwrap();

    let second_attempt = conn
        .interact(move |conn| ImportRun::try_start(conn, None, "spar", date(), Some("/archives/spar.zip".into())))
        .await
        .unwrap()
        .unwrap();
    assert!(second_attempt.is_none(), "a second try_start for the same key must not claim a new row");

    let stored = conn
        .interact(move |conn| ImportRun::get_by_chain_and_date(conn, "spar", date()))
        .await
        .unwrap()
        .unwrap()
        .expect("the original run should still be there");
    assert_eq!(stored.status(), RunStatus::Success);
}

/// A `FAILED` run is not terminal for retry purposes: the operator (or the
/// importer's own retry loop) can reset it back to `STARTED` and try again.
#[rstest]
#[tokio::test]
async fn failed_import_can_be_restarted(#[future] test_db: TestDb) {
    let db = test_db.await;
    let conn = db.pool.get().await.unwrap();

    let run = conn
        .interact(move |conn| ImportRun::try_start(conn, None, "plodine", date(), None))
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    conn.interact(move |conn| {
        ImportRun::finish(conn, run.id, RunStatus::Failed, Some("timed out".into()), ImportCounters::default(), 600.0)
    })
    .await
    .unwrap()
    .unwrap();

    let run_id = run.id;
    let restarted = conn
        .interact(move |conn| ImportRun::restart(conn, run_id, None, Some("/archives/plodine.zip".into())))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restarted.status(), RunStatus::Started);
    assert!(restarted.error.is_none());
}
