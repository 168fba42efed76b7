use chrono::NaiveDate;
use polica_common::RunStatus;
use polica_entities::CrawlRun;
use rstest::rstest;

use crate::common::containers::{test_db, TestDb};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

#[rstest]
#[tokio::test]
async fn started_run_is_not_terminal_until_finished(#[future] test_db: TestDb) {
    let db = test_db.await;
    let conn = db.pool.get().await.unwrap();

    let run = conn
        .interact(move |conn| CrawlRun::start(conn, "konzum", date()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(run.status(), RunStatus::Started);
    assert!(!run.status().is_terminal());

    let run_id = run.id;
    let finished = conn
        .interact(move |conn| CrawlRun::finish(conn, run_id, RunStatus::Success, None, 10, 100, 500, 1.5))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finished.status(), RunStatus::Success);
    assert!(finished.status().is_terminal());
    assert_eq!(finished.n_stores, 10);
}

#[rstest]
#[tokio::test]
async fn latest_for_chain_and_date_returns_the_most_recent_attempt(#[future] test_db: TestDb) {
    let db = test_db.await;
    let conn = db.pool.get().await.unwrap();

    // crawl_runs carries no uniqueness constraint: a chain may be retried
    // several times for the same date, and each attempt is its own row.
    let first = conn
        .interact(move |conn| CrawlRun::start(conn, "lidl", date()))
        .await
        .unwrap()
        .unwrap();
    conn.interact(move |conn| CrawlRun::finish(conn, first.id, RunStatus::Failed, Some("boom".into()), 0, 0, 0, 0.1))
        .await
        .unwrap()
        .unwrap();

    let second = conn
        .interact(move |conn| CrawlRun::start(conn, "lidl", date()))
        .await
        .unwrap()
        .unwrap();
    let second_id = second.id;
    conn.interact(move |conn| CrawlRun::finish(conn, second_id, RunStatus::Success, None, 5, 50, 200, 2.0))
        .await
        .unwrap()
        .unwrap();

    let latest = conn
        .interact(move |conn| CrawlRun::latest_for_chain_and_date(conn, "lidl", date()))
        .await
        .unwrap()
        .unwrap()
        .expect("a latest run should exist");
    assert_eq!(latest.id, second_id);
    assert_eq!(latest.status(), RunStatus::Success);
}
