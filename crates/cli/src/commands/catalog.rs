//! Inspect the product catalog.

use mono_core::catalog::{self, Category, Product};
use mono_core::types::ProductId;

/// List catalog products as pretty-printed JSON, optionally filtered.
///
/// # Errors
///
/// Returns an error for an unknown category name or if serialization fails.
pub fn list(category: Option<&str>, featured_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut products: Vec<&'static Product> = match category {
        Some(name) => {
            let category = Category::from_name(name)
                .ok_or_else(|| format!("unknown category: {name}"))?;
            catalog::by_category(category)
        }
        None => catalog::all().iter().collect(),
    };

    if featured_only {
        products.retain(|p| p.featured);
    }

    tracing::info!(count = products.len(), "listing catalog products");
    println!("{}", serde_json::to_string_pretty(&products)?);
    Ok(())
}

/// Show a single product as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error for an unknown product id or if serialization fails.
pub fn show(id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = ProductId::new(id);
    let product =
        catalog::find(product_id).ok_or_else(|| format!("product {product_id} not found"))?;
    println!("{}", serde_json::to_string_pretty(product)?);
    Ok(())
}
