//! Product route handlers.
//!
//! The catalog is static, so these handlers are pure lookups. A missing
//! product is a navigable dead end, not a failure: the 404 body carries a
//! `continue_shopping` link back to the listing.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use mono_core::catalog::{self, Product};
use mono_core::types::ProductId;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
}

/// Body for the product not-found state.
#[derive(Debug, Serialize)]
pub struct ProductNotFoundBody {
    pub error: String,
    /// Navigational escape hatch back to the listing.
    pub continue_shopping: &'static str,
}

/// List catalog products, optionally filtered by category and featured flag.
pub async fn index(
    State(_state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<Product>>> {
    let mut products: Vec<&'static Product> = match query.category.as_deref() {
        Some(name) => {
            let category = catalog::Category::from_name(name)
                .ok_or_else(|| AppError::BadRequest(format!("unknown category: {name}")))?;
            catalog::by_category(category)
        }
        None => catalog::all().iter().collect(),
    };

    if query.featured == Some(true) {
        products.retain(|p| p.featured);
    }

    Ok(Json(products.into_iter().cloned().collect()))
}

/// Show a single product.
pub async fn show(State(_state): State<AppState>, Path(id): Path<i32>) -> Response {
    let product_id = ProductId::new(id);
    catalog::find(product_id).map_or_else(
        || {
            (
                StatusCode::NOT_FOUND,
                Json(ProductNotFoundBody {
                    error: format!("Product {product_id} not found"),
                    continue_shopping: "/products",
                }),
            )
                .into_response()
        },
        |product| Json(product.clone()).into_response(),
    )
}
