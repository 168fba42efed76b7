use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::Utc;
use polica_entities::{CandidateOffer, Chain, GProduct, GProductBestOffer, NewGProduct, NewStore, Store};
use rstest::rstest;
use serde_json::json;

use crate::common::containers::{test_db, TestDb};

fn bd(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn new_g_product(ean: &str) -> NewGProduct {
    NewGProduct {
        ean: ean.to_string(),
        canonical_name: "Mlijeko 1L".into(),
        brand: Some("Dukat".into()),
        category: "Mliječni proizvodi".into(),
        base_unit_type: "VOLUME".into(),
        variants: json!([{"unit": "l", "value": 1.0}]),
        text_for_embedding: "Dukat mlijeko 1 litra".into(),
        keywords: json!(["mlijeko", "mlijeko", "mlijeko", "mlijeko", "mlijeko", "mlijeko", "mlijeko", "mlijeko"]),
        is_generic_product: false,
        seasonal_start_month: None,
        seasonal_end_month: None,
        embedding: json!(vec![0.0_f32; 768]),
    }
}

/// spec.md §4.G / §3: `g_product_best_offers` is a running minimum. A later,
/// worse observation must never overwrite a previously recorded better one.
#[rstest]
#[tokio::test]
async fn best_offer_only_ever_improves(#[future] test_db: TestDb) {
    let db = test_db.await;
    let conn = db.pool.get().await.unwrap();

    let ean = "3850102012345".to_string();
    let g_product = conn
        .interact({
            let ean = ean.clone();
            move |conn| GProduct::insert_if_absent(conn, new_g_product(&ean))
        })
        .await
        .unwrap()
        .unwrap()
        .expect("fresh ean should insert");

    let chain = conn.interact(|conn| Chain::upsert_by_code(conn, "konzum")).await.unwrap().unwrap();
    let store = conn
        .interact(move |conn| {
            Store::upsert(
                conn,
                NewStore {
                    chain_id: chain.id,
                    code: "K001".into(),
                    type_: None,
                    address: None,
                    city: None,
                    zipcode: None,
                    lat: None,
                    lon: None,
                    phone: None,
                },
            )
        })
        .await
        .unwrap()
        .unwrap();

    let product_id = g_product.id;
    let store_id = store.id;

    let fold = |price_per_l: &'static str| {
        let conn = db.pool.get();
        let price = bd(price_per_l);
        async move {
            conn.await
                .unwrap()
                .interact(move |conn| {
                    GProductBestOffer::upsert_if_better(
                        conn,
                        CandidateOffer {
                            product_id,
                            store_id,
                            unit_price_per_kg: None,
                            unit_price_per_l: Some(price),
                            unit_price_per_piece: None,
                            seasonal_price: None,
                            observed_at: Utc::now(),
                        },
                    )
                })
                .await
                .unwrap()
                .unwrap()
        }
    };

    fold("8.50").await;
    fold("6.00").await;
    // A higher price observed later must not overwrite the 6.00 low.
    fold("7.25").await;

    let stored = conn
        .interact(move |conn| GProductBestOffer::get(conn, product_id))
        .await
        .unwrap()
        .unwrap()
        .expect("best offer row should exist");
    assert_eq!(stored.best_unit_price_per_l, Some(bd("6.00")));
    assert_eq!(stored.best_price_store_id, Some(store_id));
}

#[rstest]
#[tokio::test]
async fn best_offer_is_idempotent_on_repeated_equal_observations(#[future] test_db: TestDb) {
    let db = test_db.await;
    let conn = db.pool.get().await.unwrap();

    let ean = "3850102099999".to_string();
    let g_product = conn
        .interact({
            let ean = ean.clone();
            move |conn| GProduct::insert_if_absent(conn, new_g_product(&ean))
        })
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let chain = conn.interact(|conn| Chain::upsert_by_code(conn, "lidl")).await.unwrap().unwrap();
    let store = conn
        .interact(move |conn| {
            Store::upsert(
                conn,
                NewStore {
                    chain_id: chain.id,
                    code: "L001".into(),
                    type_: None,
                    address: None,
                    city: None,
                    zipcode: None,
                    lat: None,
                    lon: None,
                    phone: None,
                },
            )
        })
        .await
        .unwrap()
        .unwrap();

    for _ in 0..3 {
        let product_id = g_product.id;
        let store_id = store.id;
        conn.interact(move |conn| {
            GProductBestOffer::upsert_if_better(
                conn,
                CandidateOffer {
                    product_id,
                    store_id,
                    unit_price_per_kg: None,
                    unit_price_per_l: Some(bd("5.00")),
                    unit_price_per_piece: None,
                    seasonal_price: None,
                    observed_at: Utc::now(),
                },
            )
        })
        .await
        .unwrap()
        .unwrap();
    }

    let stored = conn
        .interact(move |conn| GProductBestOffer::get(conn, g_product.id))
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(stored.best_unit_price_per_l, Some(bd("5.00")));
}
