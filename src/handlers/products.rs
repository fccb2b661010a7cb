use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde_json::{json, Value};

use super::client_ip;
use crate::middleware::auth::CurrentUser;
use crate::models::{Product, ProductInput};
use crate::state::AppState;
use crate::storage::StorageError;

fn storage_error(e: StorageError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": format!("Storage error: {}", e)
        })),
    )
}

fn admin_only() -> (StatusCode, Json<Value>) {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "Only admin can modify products."
        })),
    )
}

pub async fn list_products(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<Value>)> {
    let products = state.products.list().await.map_err(storage_error)?;

    state
        .audit
        .log_read(
            current.user_id(),
            "products",
            None,
            "Viewed product list",
            &client_ip(&headers),
        )
        .await;

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(payload): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, Json<Value>)> {
    if !current.is_admin() {
        return Err(admin_only());
    }

    let product = state
        .products
        .create(&payload, current.user_id())
        .await
        .map_err(storage_error)?;

    state
        .audit
        .log_create(
            current.user_id(),
            "products",
            product.product_id,
            format!("Created product {}", product.product_name),
            &client_ip(&headers),
        )
        .await;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(product_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<ProductInput>,
) -> Result<Json<Product>, (StatusCode, Json<Value>)> {
    if !current.is_admin() {
        return Err(admin_only());
    }

    let product = match state.products.update(product_id, &payload).await {
        Ok(product) => product,
        Err(StorageError::NotFound) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Product not found."
                })),
            ));
        }
        Err(e) => return Err(storage_error(e)),
    };

    state
        .audit
        .log_update(
            current.user_id(),
            "products",
            product_id,
            format!("Updated product {}", product_id),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(product_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !current.is_admin() {
        return Err(admin_only());
    }

    match state.products.delete(product_id).await {
        Ok(()) => {}
        Err(StorageError::NotFound) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Product not found."
                })),
            ));
        }
        Err(e) => return Err(storage_error(e)),
    }

    state
        .audit
        .log_delete(
            current.user_id(),
            "products",
            product_id,
            format!("Deleted product {}", product_id),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(json!({
        "message": "Product deleted."
    })))
}
