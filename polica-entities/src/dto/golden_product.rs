use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use polica_common::{BaseUnitType, Variant};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::g_product::GProduct;
use crate::models::g_product_best_offer::GProductBestOffer;

/// Public-facing projection of a `GProduct`, decoding its `jsonb` columns
/// into typed values. The raw `embedding` vector is intentionally not
/// exposed here (spec.md §9).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GoldenProductDto {
    pub id: Uuid,
    pub ean: String,
    pub canonical_name: String,
    pub brand: Option<String>,
    pub category: String,
    pub base_unit_type: BaseUnitType,
    pub variants: Vec<Variant>,
    pub keywords: Vec<String>,
    pub is_generic_product: bool,
    pub seasonal_start_month: Option<i16>,
    pub seasonal_end_month: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GProduct> for GoldenProductDto {
    fn from(p: GProduct) -> Self {
        Self {
            id: p.id,
            ean: p.ean.clone(),
            canonical_name: p.canonical_name.clone(),
            brand: p.brand.clone(),
            category: p.category.clone(),
            base_unit_type: p.base_unit_type(),
            variants: p.variants(),
            keywords: p.keywords(),
            is_generic_product: p.is_generic_product,
            seasonal_start_month: p.seasonal_start_month,
            seasonal_end_month: p.seasonal_end_month,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GProductBestOfferDto {
    pub product_id: Uuid,
    pub best_unit_price_per_kg: Option<BigDecimal>,
    pub best_unit_price_per_l: Option<BigDecimal>,
    pub best_unit_price_per_piece: Option<BigDecimal>,
    pub lowest_price_in_season: Option<BigDecimal>,
    pub best_price_store_id: Option<Uuid>,
    pub best_price_found_at: Option<DateTime<Utc>>,
}

impl From<GProductBestOffer> for GProductBestOfferDto {
    fn from(o: GProductBestOffer) -> Self {
        Self {
            product_id: o.product_id,
            best_unit_price_per_kg: o.best_unit_price_per_kg,
            best_unit_price_per_l: o.best_unit_price_per_l,
            best_unit_price_per_piece: o.best_unit_price_per_piece,
            lowest_price_in_season: o.lowest_price_in_season,
            best_price_store_id: o.best_price_store_id,
            best_price_found_at: o.best_price_found_at,
        }
    }
}
