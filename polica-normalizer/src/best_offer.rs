//! Unit-price and best-offer maintenance (spec.md §4.G): for one golden
//! product, recompute every `g_prices` row from its raw `prices`, then fold
//! each observation into the product's running best offer.

use chrono::Utc;
use deadpool_diesel::postgres::Pool;
use polica_common::compute_unit_prices;
use polica_entities::{
    CandidateOffer, ChainProduct, GProduct, GProductBestOffer, GPrice, InfraError, NewGPrice, Price,
};
use uuid::Uuid;

use crate::error::NormalizerError;

/// Recomputes unit prices and folds best-offer candidates for one
/// `g_products.id`. Returns the number of `g_prices` rows written.
pub async fn process_one_g_product(pool: &Pool, g_product_id: Uuid) -> Result<usize, NormalizerError> {
    let conn = pool.get().await.map_err(InfraError::from)?;
    let (g_product, rows) = conn
        .interact(move |conn| {
            let g_product = GProduct::get(conn, g_product_id)?;
            let chain_products = ChainProduct::by_product_ids(conn, &product_ids_for_ean(conn, &g_product.ean)?)?;
            let chain_product_ids: Vec<Uuid> = chain_products.iter().map(|cp| cp.id).collect();
            let prices = Price::for_chain_product_ids(conn, &chain_product_ids)?;
            Ok::<_, diesel::result::Error>((g_product, prices))
        })
        .await
        .map_err(InfraError::from)??;

    let base_unit_type = g_product.base_unit_type();
    let variant = g_product.variants().into_iter().next();
    let in_season_today = is_in_season(g_product.seasonal_start_month, g_product.seasonal_end_month, Utc::now());

    let mut written = 0usize;
    for row in rows {
        let current_price = row.special_price.clone().or_else(|| row.regular_price.clone());
        let Some(current_price) = current_price else {
            continue;
        };
        let unit_prices = compute_unit_prices(&current_price, base_unit_type, variant.as_ref());

        let new_g_price = NewGPrice {
            product_id: g_product.id,
            store_id: row.store_id,
            price_date: row.price_date,
            regular_price: row.regular_price.clone(),
            special_price: row.special_price.clone(),
            price_per_kg: unit_prices.price_per_kg.clone(),
            price_per_l: unit_prices.price_per_l.clone(),
            price_per_piece: unit_prices.price_per_piece.clone(),
            is_on_special_offer: row.special_price.is_some(),
        };

        let conn = pool.get().await.map_err(InfraError::from)?;
        conn.interact(move |conn| GPrice::upsert(conn, new_g_price))
            .await
            .map_err(InfraError::from)??;
        written += 1;

        let candidate = CandidateOffer {
            product_id: g_product.id,
            store_id: row.store_id,
            unit_price_per_kg: unit_prices.price_per_kg,
            unit_price_per_l: unit_prices.price_per_l,
            unit_price_per_piece: unit_prices.price_per_piece,
            seasonal_price: in_season_today.then(|| current_price.clone()),
            observed_at: Utc::now(),
        };
        let conn = pool.get().await.map_err(InfraError::from)?;
        conn.interact(move |conn| GProductBestOffer::upsert_if_better(conn, candidate))
            .await
            .map_err(InfraError::from)??;
    }

    Ok(written)
}

fn product_ids_for_ean(
    conn: &mut diesel::PgConnection,
    ean: &str,
) -> Result<Vec<Uuid>, diesel::result::Error> {
    use polica_entities::Product;
    Ok(vec![Product::get_by_ean(conn, ean)?.id])
}

/// Whether `at` falls within a seasonal window, handling December→January
/// wraparound (e.g. `start=11, end=2` covers Nov, Dec, Jan, Feb). A product
/// with no declared window is always "in season" for best-offer purposes.
fn is_in_season(start: Option<i16>, end: Option<i16>, at: chrono::DateTime<Utc>) -> bool {
    use chrono::Datelike;
    let (Some(start), Some(end)) = (start, end) else {
        return true;
    };
    let month = i16::try_from(at.month()).unwrap_or(1);
    if start <= end {
        (start..=end).contains(&month)
    } else {
        month >= start || month <= end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_month(month: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, month, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn no_window_is_always_in_season() {
        assert!(is_in_season(None, None, at_month(1)));
    }

    #[test]
    fn simple_window_respects_bounds() {
        assert!(is_in_season(Some(6), Some(8), at_month(7)));
        assert!(!is_in_season(Some(6), Some(8), at_month(9)));
    }

    #[test]
    fn wraparound_window_spans_year_end() {
        assert!(is_in_season(Some(11), Some(2), at_month(12)));
        assert!(is_in_season(Some(11), Some(2), at_month(1)));
        assert!(!is_in_season(Some(11), Some(2), at_month(6)));
    }
}
