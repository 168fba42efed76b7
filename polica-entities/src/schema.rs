// Hand-maintained to mirror what `diesel print-schema` would emit against
// the migrations in `./migrations/`.

diesel::table! {
    chains (id) {
        id -> Uuid,
        code -> Varchar,
    }
}

diesel::table! {
    stores (id) {
        id -> Uuid,
        chain_id -> Uuid,
        code -> Varchar,
        #[sql_name = "type"]
        type_ -> Nullable<Varchar>,
        address -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        zipcode -> Nullable<Varchar>,
        lat -> Nullable<Double>,
        lon -> Nullable<Double>,
        phone -> Nullable<Varchar>,
    }
}

diesel::table! {
    products (id) {
        id -> Uuid,
        ean -> Varchar,
        brand -> Nullable<Varchar>,
        name -> Nullable<Varchar>,
        quantity -> Nullable<Varchar>,
        unit -> Nullable<Varchar>,
    }
}

diesel::table! {
    chain_products (id) {
        id -> Uuid,
        chain_id -> Uuid,
        product_id -> Uuid,
        code -> Varchar,
        name -> Varchar,
        brand -> Nullable<Varchar>,
        category -> Nullable<Varchar>,
        unit -> Nullable<Varchar>,
        quantity -> Nullable<Varchar>,
        is_processed -> Bool,
    }
}

diesel::table! {
    prices (chain_product_id, store_id, price_date) {
        chain_product_id -> Uuid,
        store_id -> Uuid,
        price_date -> Date,
        regular_price -> Nullable<Numeric>,
        special_price -> Nullable<Numeric>,
        unit_price -> Nullable<Numeric>,
        best_price_30 -> Nullable<Numeric>,
        anchor_price -> Nullable<Numeric>,
    }
}

diesel::table! {
    chain_prices (chain_product_id, price_date) {
        chain_product_id -> Uuid,
        price_date -> Date,
        min_price -> Numeric,
        max_price -> Numeric,
        avg_price -> Numeric,
    }
}

diesel::table! {
    chain_stats (chain_id, price_date) {
        chain_id -> Uuid,
        price_date -> Date,
        price_count -> Int8,
        store_count -> Int8,
    }
}

diesel::table! {
    g_products (id) {
        id -> Uuid,
        ean -> Varchar,
        canonical_name -> Varchar,
        brand -> Nullable<Varchar>,
        category -> Varchar,
        base_unit_type -> Varchar,
        variants -> Jsonb,
        text_for_embedding -> Text,
        keywords -> Jsonb,
        is_generic_product -> Bool,
        seasonal_start_month -> Nullable<Int2>,
        seasonal_end_month -> Nullable<Int2>,
        embedding -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    g_prices (product_id, store_id, price_date) {
        product_id -> Uuid,
        store_id -> Uuid,
        price_date -> Date,
        regular_price -> Nullable<Numeric>,
        special_price -> Nullable<Numeric>,
        price_per_kg -> Nullable<Numeric>,
        price_per_l -> Nullable<Numeric>,
        price_per_piece -> Nullable<Numeric>,
        is_on_special_offer -> Bool,
    }
}

diesel::table! {
    g_product_best_offers (product_id) {
        product_id -> Uuid,
        best_unit_price_per_kg -> Nullable<Numeric>,
        best_unit_price_per_l -> Nullable<Numeric>,
        best_unit_price_per_piece -> Nullable<Numeric>,
        lowest_price_in_season -> Nullable<Numeric>,
        best_price_store_id -> Nullable<Uuid>,
        best_price_found_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    crawl_runs (id) {
        id -> Uuid,
        chain_name -> Varchar,
        crawl_date -> Date,
        status -> Varchar,
        error -> Nullable<Text>,
        n_stores -> Int4,
        n_products -> Int4,
        n_prices -> Int4,
        elapsed -> Double,
        timestamp -> Timestamptz,
    }
}

diesel::table! {
    import_runs (id) {
        id -> Uuid,
        crawl_run_id -> Nullable<Uuid>,
        chain_name -> Varchar,
        import_date -> Date,
        status -> Varchar,
        error -> Nullable<Text>,
        counters -> Jsonb,
        elapsed -> Double,
        timestamp -> Timestamptz,
        unzipped_path -> Nullable<Varchar>,
    }
}

diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Varchar,
        password_hash -> Varchar,
        display_name -> Nullable<Varchar>,
        is_verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    user_personal_data (user_id) {
        user_id -> Uuid,
        full_name -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
    }
}

diesel::table! {
    user_locations (id) {
        id -> Uuid,
        user_id -> Uuid,
        label -> Nullable<Varchar>,
        lat -> Double,
        lon -> Double,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    chat_messages (id) {
        id -> Uuid,
        user_id -> Uuid,
        session_id -> Uuid,
        sender -> Varchar,
        content -> Nullable<Text>,
        tool_calls -> Nullable<Jsonb>,
        tool_outputs -> Nullable<Jsonb>,
        ai_response -> Nullable<Text>,
        timestamp -> Timestamptz,
    }
}

diesel::table! {
    shopping_lists (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    shopping_list_items (id) {
        id -> Uuid,
        shopping_list_id -> Uuid,
        product_id -> Nullable<Uuid>,
        note -> Nullable<Varchar>,
        quantity -> Nullable<Numeric>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(stores -> chains (chain_id));
diesel::joinable!(chain_products -> chains (chain_id));
diesel::joinable!(chain_products -> products (product_id));
diesel::joinable!(g_prices -> g_products (product_id));
diesel::joinable!(g_prices -> stores (store_id));
diesel::joinable!(g_product_best_offers -> g_products (product_id));
diesel::joinable!(user_locations -> users (user_id));
diesel::joinable!(user_personal_data -> users (user_id));
diesel::joinable!(shopping_lists -> users (user_id));
diesel::joinable!(shopping_list_items -> shopping_lists (shopping_list_id));
diesel::joinable!(chat_messages -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    chains,
    stores,
    products,
    chain_products,
    prices,
    chain_prices,
    chain_stats,
    g_products,
    g_prices,
    g_product_best_offers,
    crawl_runs,
    import_runs,
    users,
    user_personal_data,
    user_locations,
    chat_messages,
    shopping_lists,
    shopping_list_items,
);
