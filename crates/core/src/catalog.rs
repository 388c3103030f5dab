//! The static product catalog.
//!
//! Products are defined at build time and never mutated. The catalog is the
//! single source of product data for the storefront; cart lines and wishlist
//! entries copy from it.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Headphones,
    Earbuds,
    Accessories,
}

impl Category {
    /// Parse a category from a case-insensitive name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "headphones" => Some(Self::Headphones),
            "earbuds" => Some(Self::Earbuds),
            "accessories" => Some(Self::Accessories),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Headphones => write!(f, "Headphones"),
            Self::Earbuds => write!(f, "Earbuds"),
            Self::Accessories => write!(f, "Accessories"),
        }
    }
}

/// A catalog product.
///
/// `price` is kept as the authored display string (e.g. `"$699"`); checkout
/// parses it into a decimal via [`crate::types::Price`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub images: Vec<String>,
    pub release_date: String,
    pub featured_description: String,
    pub category: Category,
    pub featured: bool,
}

fn product(
    id: i32,
    name: &str,
    description: &str,
    price: &str,
    image_dir: &str,
    image_names: &[&str],
    release_date: &str,
    featured_description: &str,
    category: Category,
    featured: bool,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: price.to_owned(),
        image: format!("{image_dir}/{}", image_names.first().copied().unwrap_or_default()),
        images: image_names
            .iter()
            .map(|n| format!("{image_dir}/{n}"))
            .collect(),
        release_date: release_date.to_owned(),
        featured_description: featured_description.to_owned(),
        category,
        featured,
    }
}

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        // Headphones
        product(
            5,
            "MONO SPACE",
            "The sound of absolute silence",
            "$699",
            "/assets/images/shop/headphones/mono-space",
            &[
                "mono-space.png",
                "mono-space-1.png",
                "mono-space-2.png",
                "mono-space-3.png",
            ],
            "2024-02-01",
            "Crafted in pristine white with our most advanced noise-canceling \
             technology. Mono Space delivers an ethereal audio experience wrapped \
             in minimalistic luxury.",
            Category::Headphones,
            true,
        ),
        product(
            2,
            "MONO GO",
            "Uncompromised portable audio.",
            "$499",
            "/assets/images/shop/headphones/mono-go",
            &["mono-go.png", "mono-go-1.png", "mono-go-2.png", "mono-go-3.png"],
            "2024-01-20",
            "Designed for the sophisticated traveler. Finished in ceramic white, \
             Mono Go combines high-fidelity sound with an ultra-portable form factor.",
            Category::Headphones,
            false,
        ),
        // Earbuds
        product(
            1,
            "MONO ONE",
            "Studio-grade wireless perfection.",
            "$599",
            "/assets/images/shop/earbuds/mono-one",
            &[
                "mono-one.png",
                "mono-one-1.jpeg",
                "mono-one-2.jpeg",
                "mono-one-3.jpeg",
            ],
            "2025-11-15",
            "Encased in an alabaster finish, Mono One resets the standard for \
             wireless audio. Immerse yourself in rich, expansive soundstages.",
            Category::Earbuds,
            true,
        ),
        product(
            3,
            "MONO LITE",
            "Essential luxury for everyday.",
            "$299",
            "/assets/images/shop/earbuds/mono-lite",
            &[
                "mono-lite.png",
                "mono-lite-1.jpeg",
                "mono-lite-2.png",
                "mono-lite-3.png",
            ],
            "2023-06-20",
            "Feather-light soft white construction meets all-day battery life. \
             Mono Lite offers premium aesthetics and performance in our most \
             accessible form.",
            Category::Earbuds,
            false,
        ),
        product(
            4,
            "MONO SPORT",
            "Elite performance, zero distractions.",
            "$450",
            "/assets/images/shop/earbuds/mono-sport",
            &[
                "mono-sports.png",
                "mono-sports-1.png",
                "mono-sports-2.png",
                "mono-sports-3.png",
            ],
            "2024-01-10",
            "Engineered for excellence in glacial white. IPX5 sweat resistance \
             meets audiophile-quality sound for the discerning athlete.",
            Category::Earbuds,
            false,
        ),
    ]
});

/// All catalog products, in display order.
#[must_use]
pub fn all() -> &'static [Product] {
    &PRODUCTS
}

/// Look up a product by id.
#[must_use]
pub fn find(id: ProductId) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

/// Products in a category, preserving display order.
#[must_use]
pub fn by_category(category: Category) -> Vec<&'static Product> {
    PRODUCTS.iter().filter(|p| p.category == category).collect()
}

/// Featured products.
#[must_use]
pub fn featured() -> Vec<&'static Product> {
    PRODUCTS.iter().filter(|p| p.featured).collect()
}

/// Pick a product to recommend at checkout: the first catalog product not
/// already in the cart, falling back to the first product.
#[must_use]
pub fn recommend_for(cart_ids: &[ProductId]) -> Option<&'static Product> {
    PRODUCTS
        .iter()
        .find(|p| !cart_ids.contains(&p.id))
        .or_else(|| PRODUCTS.first())
}
