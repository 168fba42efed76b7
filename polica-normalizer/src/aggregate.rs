//! Groups the `ChainProduct` rows sharing a `Product` into the name/brand/
//! category/unit variants the normalizer provider synthesizes a golden
//! record from (spec.md §4.F step 1).

use polica_entities::ChainProduct;

/// Deduplicated, order-preserving view of how every chain describes the
/// same EAN.
#[derive(Debug, Clone)]
pub struct ProductAggregate {
    pub ean: String,
    pub name_variations: Vec<String>,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    pub units: Vec<String>,
    pub quantities: Vec<String>,
    /// `ChainProduct.id`s folded into this aggregate, marked processed once
    /// the golden record (or the decision to skip one) is durable.
    pub chain_product_ids: Vec<uuid::Uuid>,
}

impl ProductAggregate {
    pub fn from_chain_products(ean: String, chain_products: &[ChainProduct]) -> Self {
        let mut aggregate = Self {
            ean,
            name_variations: Vec::new(),
            brands: Vec::new(),
            categories: Vec::new(),
            units: Vec::new(),
            quantities: Vec::new(),
            chain_product_ids: Vec::with_capacity(chain_products.len()),
        };

        for cp in chain_products {
            push_unique(&mut aggregate.name_variations, &cp.name);
            if let Some(brand) = &cp.brand {
                push_unique(&mut aggregate.brands, brand);
            }
            if let Some(category) = &cp.category {
                push_unique(&mut aggregate.categories, category);
            }
            if let Some(unit) = &cp.unit {
                push_unique(&mut aggregate.units, unit);
            }
            if let Some(quantity) = &cp.quantity {
                push_unique(&mut aggregate.quantities, quantity);
            }
            aggregate.chain_product_ids.push(cp.id);
        }

        aggregate
    }
}

fn push_unique(into: &mut Vec<String>, value: &str) {
    if !into.iter().any(|existing| existing.eq_ignore_ascii_case(value)) {
        into.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn chain_product(name: &str, brand: Option<&str>) -> ChainProduct {
        ChainProduct {
            id: Uuid::new_v4(),
            chain_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            code: "code".into(),
            name: name.into(),
            brand: brand.map(String::from),
            category: None,
            unit: None,
            quantity: None,
            is_processed: false,
        }
    }

    #[test]
    fn dedups_case_insensitively() {
        let rows = vec![
            chain_product("Mlijeko 1L", Some("Dukat")),
            chain_product("MLIJEKO 1L", Some("dukat")),
            chain_product("Mlijeko, 1 litra", Some("Dukat")),
        ];
        let aggregate = ProductAggregate::from_chain_products("3850102012345".into(), &rows);
        assert_eq!(aggregate.name_variations.len(), 2);
        assert_eq!(aggregate.brands, vec!["Dukat"]);
        assert_eq!(aggregate.chain_product_ids.len(), 3);
    }
}
