use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/stores", store_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::signup))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn store_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::store::create_store,
            handlers::store::list_stores
        ))
        .routes(routes!(
            handlers::store::get_store,
            handlers::store::update_store,
            handlers::store::delete_store
        ))
        .nest("/{store_id}/categories", category_routes())
        .nest("/{store_id}/products", product_routes())
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::category::create_category,
            handlers::category::category_tree
        ))
        .routes(routes!(
            handlers::category::get_category,
            handlers::category::update_category,
            handlers::category::delete_category
        ))
        .nest("/{category_id}/variants", variant_routes())
}

fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::product::create_product,
            handlers::product::list_products
        ))
        .routes(routes!(
            handlers::product::get_product,
            handlers::product::update_product,
            handlers::product::delete_product
        ))
        .routes(routes!(handlers::product::delete_product_item))
        .routes(routes!(handlers::product::delete_product_image))
}

fn variant_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::variant::create_variant,
            handlers::variant::list_variants
        ))
        .routes(routes!(
            handlers::variant::get_variant,
            handlers::variant::update_variant,
            handlers::variant::delete_variant
        ))
        .routes(routes!(handlers::variant::delete_variant_option))
}
