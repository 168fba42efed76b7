//! The per-EAN normalizer worker (spec.md §4.F steps 2-7): aggregate a
//! product's chain-reported variants, synthesize (or reuse) a golden
//! record, embed it, and mark the source rows processed. Every step past
//! the aggregate read is wrapped so a single bad EAN never poisons the rest
//! of a batch — `process_one_product` returns `Err` and the caller moves on.

use std::str::FromStr;
use std::sync::Arc;

use deadpool_diesel::postgres::Pool;
use polica_common::BaseUnitType;
use polica_entities::{ChainProduct, GProduct, InfraError, NewGProduct, Product};
use serde_json::json;
use uuid::Uuid;

use crate::aggregate::ProductAggregate;
use crate::error::NormalizerError;
use crate::provider::{CanonicalDraft, EmbeddingProvider, NormalizerProvider};

/// Processes one `products.id` from the orchestrator's unprocessed range.
/// Returns the number of `chain_products` marked processed.
pub async fn process_one_product(
    pool: &Pool,
    normalizer: &Arc<dyn NormalizerProvider>,
    embedder: &Arc<dyn EmbeddingProvider>,
    product_id: Uuid,
) -> Result<usize, NormalizerError> {
    let (ean, aggregate) = load_aggregate(pool, product_id).await?;
    if aggregate.chain_product_ids.is_empty() {
        return Ok(0);
    }

    let already_exists = {
        let conn = pool.get().await.map_err(InfraError::from)?;
        let ean = ean.clone();
        conn.interact(move |conn| GProduct::exists_for_ean(conn, &ean))
            .await
            .map_err(InfraError::from)??
    };

    if !already_exists {
        let draft = normalizer.synthesize(&aggregate).await?;
        let validated = validate_draft(draft)?;
        let embedding = embedder.embed(&validated.text_for_embedding).await?;

        let new_g_product = NewGProduct {
            ean: ean.clone(),
            canonical_name: validated.canonical_name,
            brand: validated.brand,
            category: validated.category,
            base_unit_type: validated.base_unit_type,
            variants: json!(validated.variants),
            text_for_embedding: validated.text_for_embedding,
            keywords: json!(validated.keywords),
            is_generic_product: validated.is_generic_product,
            seasonal_start_month: validated.seasonal_start_month,
            seasonal_end_month: validated.seasonal_end_month,
            embedding: json!(embedding),
        };

        let conn = pool.get().await.map_err(InfraError::from)?;
        conn.interact(move |conn| GProduct::insert_if_absent(conn, new_g_product))
            .await
            .map_err(InfraError::from)??;
    }

    let chain_product_ids = aggregate.chain_product_ids.clone();
    let conn = pool.get().await.map_err(InfraError::from)?;
    let marked = conn
        .interact(move |conn| ChainProduct::mark_processed(conn, &chain_product_ids))
        .await
        .map_err(InfraError::from)??;

    Ok(marked)
}

async fn load_aggregate(pool: &Pool, product_id: Uuid) -> Result<(String, ProductAggregate), NormalizerError> {
    let conn = pool.get().await.map_err(InfraError::from)?;
    conn.interact(move |conn| {
        let product = Product::get(conn, product_id)?;
        let chain_products = ChainProduct::by_product_ids(conn, &[product_id])?;
        Ok((product.ean.clone(), ProductAggregate::from_chain_products(product.ean, &chain_products)))
    })
    .await
    .map_err(InfraError::from)?
    .map_err(NormalizerError::from)
}

/// Rejects an LLM response that would violate a `g_products` invariant
/// (spec.md §8): an unparseable `base_unit_type`, a keyword list not of
/// length 8, or an empty canonical name.
fn validate_draft(draft: CanonicalDraft) -> Result<CanonicalDraft, NormalizerError> {
    if draft.canonical_name.trim().is_empty() {
        return Err(NormalizerError::InvalidCanonicalRecord("canonical_name is empty".into()));
    }
    if BaseUnitType::from_str(&draft.base_unit_type).is_err() {
        return Err(NormalizerError::InvalidCanonicalRecord(format!(
            "unrecognized base_unit_type: {}",
            draft.base_unit_type
        )));
    }
    if draft.keywords.len() != 8 {
        return Err(NormalizerError::InvalidCanonicalRecord(format!(
            "expected exactly 8 keywords, got {}",
            draft.keywords.len()
        )));
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft(keywords: usize) -> CanonicalDraft {
        CanonicalDraft {
            canonical_name: "Mlijeko 1L".into(),
            brand: Some("Dukat".into()),
            category: "Mliječni proizvodi".into(),
            base_unit_type: "VOLUME".into(),
            variants: vec![polica_common::Variant { unit: "l".into(), value: 1.0, piece_count: None }],
            text_for_embedding: "Dukat mlijeko 1 litra punomasno".into(),
            keywords: vec!["x".to_string(); keywords],
            is_generic_product: false,
            seasonal_start_month: None,
            seasonal_end_month: None,
        }
    }

    #[test]
    fn rejects_wrong_keyword_count() {
        let err = validate_draft(sample_draft(5)).unwrap_err();
        assert!(matches!(err, NormalizerError::InvalidCanonicalRecord(_)));
    }

    #[test]
    fn rejects_unknown_base_unit_type() {
        let mut draft = sample_draft(8);
        draft.base_unit_type = "MASS".into();
        assert!(validate_draft(draft).is_err());
    }

    #[test]
    fn accepts_well_formed_draft() {
        assert!(validate_draft(sample_draft(8)).is_ok());
    }
}
