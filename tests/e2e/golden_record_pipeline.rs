use polica_entities::{Chain, ChainProduct, GProduct, NewChainProduct, NewGProduct, NewProduct, Product};
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

use crate::common::containers::{test_db, TestDb};

/// spec.md §4.E/§4.F: a product with unprocessed chain products shows up in
/// the orchestrator's batch query; once every chain product sharing its EAN
/// is marked processed, it no longer does.
#[rstest]
#[tokio::test]
async fn product_leaves_the_unprocessed_range_once_marked(#[future] test_db: TestDb) {
    let db = test_db.await;
    let conn = db.pool.get().await.unwrap();

    let chain = conn.interact(|conn| Chain::upsert_by_code(conn, "konzum")).await.unwrap().unwrap();
    let product = conn
        .interact(|conn| {
            Product::insert_many(
                conn,
                vec![NewProduct { ean: "3850102055555", brand: None, name: None, quantity: None, unit: None }],
            )
        })
        .await
        .unwrap()
        .unwrap()
        .remove(0);

    let product_id = product.id;
    let chain_id = chain.id;
    conn.interact(move |conn| {
        ChainProduct::insert_many_ignore_conflicts(
            conn,
            vec![NewChainProduct {
                chain_id,
                product_id,
                code: "K-555".into(),
                name: "Mlijeko 1L".into(),
                brand: Some("Dukat".into()),
                category: Some("Mliječni proizvodi".into()),
                unit: Some("l".into()),
                quantity: Some("1".into()),
            }],
        )
    })
    .await
    .unwrap()
    .unwrap();

    let before = conn
        .interact(move |conn| ChainProduct::unprocessed_product_ids_in_range(conn, Uuid::nil(), 100))
        .await
        .unwrap()
        .unwrap();
    assert!(before.contains(&product_id));

    let chain_products = conn
        .interact(move |conn| ChainProduct::by_product_ids(conn, &[product_id]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(chain_products.len(), 1);

    let ids: Vec<Uuid> = chain_products.iter().map(|cp| cp.id).collect();
    conn.interact(move |conn| ChainProduct::mark_processed(conn, &ids)).await.unwrap().unwrap();

    let after = conn
        .interact(move |conn| ChainProduct::unprocessed_product_ids_in_range(conn, Uuid::nil(), 100))
        .await
        .unwrap()
        .unwrap();
    assert!(!after.contains(&product_id));
}

/// spec.md §4.F step 5: inserting a golden record twice for the same EAN is
/// a no-op on the second attempt rather than an error.
#[rstest]
#[tokio::test]
async fn golden_record_insert_is_idempotent_per_ean(#[future] test_db: TestDb) {
    let db = test_db.await;
    let conn = db.pool.get().await.unwrap();

    let ean = "3850102066666".to_string();
    let new_g_product = |ean: String| NewGProduct {
        ean,
        canonical_name: "Kruh polubijeli 500g".into(),
        brand: None,
        category: "Pekarski proizvodi".into(),
        base_unit_type: "WEIGHT".into(),
        variants: json!([{"unit": "g", "value": 500.0}]),
        text_for_embedding: "Polubijeli kruh 500 grama".into(),
        keywords: json!(["kruh", "kruh", "kruh", "kruh", "kruh", "kruh", "kruh", "kruh"]),
        is_generic_product: true,
        seasonal_start_month: None,
        seasonal_end_month: None,
        embedding: json!(vec![0.0_f32; 768]),
    };

    let first = conn
        .interact({
            let ean = ean.clone();
            move |conn| GProduct::insert_if_absent(conn, new_g_product(ean))
        })
        .await
        .unwrap()
        .unwrap();
    assert!(first.is_some());

    let second = conn
        .interact({
            let ean = ean.clone();
            move |conn| GProduct::insert_if_absent(conn, new_g_product(ean))
        })
        .await
        .unwrap()
        .unwrap();
    assert!(second.is_none(), "re-inserting the same EAN must be a no-op, not an error");

    let exists = conn.interact(move |conn| GProduct::exists_for_ean(conn, &ean)).await.unwrap().unwrap();
    assert!(exists);
}
