use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{TryOnError, TryOnResult};

/// Catalog product identifier.
pub type ProductId = u32;

/// Audience tag of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Men's products.
    Male,
    /// Women's products.
    Female,
    /// Listed for every audience.
    Unisex,
}

impl Gender {
    /// Whether a product tagged `self` should be listed for the `filter` audience.
    pub fn matches(self, filter: Gender) -> bool {
        self == filter || self == Gender::Unisex
    }
}

impl std::str::FromStr for Gender {
    type Err = TryOnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unisex" => Ok(Self::Unisex),
            other => Err(TryOnError::validation(format!(
                "unknown gender '{other}' (expected male, female or unisex)"
            ))),
        }
    }
}

/// Catalog entry. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique id, assigned when the catalog is loaded.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Reference image name inside the products namespace.
    pub image_name: String,
    /// Price in smallest currency unit (e.g., paise, cents).
    pub price_minor: u64,
    /// Audience tag.
    pub gender: Gender,
}

/// Read-only product catalog, shared across requests.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(products: Vec<Product>) -> TryOnResult<Self> {
        let mut seen = HashSet::with_capacity(products.len());
        for p in &products {
            if !seen.insert(p.id) {
                return Err(TryOnError::validation(format!(
                    "duplicate product id {} in catalog",
                    p.id
                )));
            }
        }
        Ok(Self { products })
    }

    /// The built-in demo catalog.
    pub fn seeded() -> Self {
        let product = |id, name: &str, image_name: &str, price_minor, gender| Product {
            id,
            name: name.to_string(),
            image_name: image_name.to_string(),
            price_minor,
            gender,
        };
        Self {
            products: vec![
                product(1, "Red Dress", "dress1.png", 199_900, Gender::Female),
                product(2, "Blue Dress", "dress2.png", 179_900, Gender::Female),
                product(3, "Casual Shirt", "shirt1.png.jfif", 129_900, Gender::Male),
                product(4, "Black T-Shirt", "tshirt1.png", 89_900, Gender::Unisex),
            ],
        }
    }

    /// Parse a catalog from a JSON array of products.
    pub fn from_reader<R: std::io::Read>(r: R) -> TryOnResult<Self> {
        let products: Vec<Product> = serde_json::from_reader(r)
            .map_err(|e| TryOnError::validation(format!("parse catalog JSON: {e}")))?;
        Self::new(products)
    }

    /// Parse a catalog from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TryOnResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TryOnError::validation(format!("open catalog JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Exact id lookup.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Whether a product with `id` exists.
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Products in load order, optionally restricted to an audience (unisex always included).
    pub fn list(&self, gender: Option<Gender>) -> Vec<&Product> {
        match gender {
            None => self.products.iter().collect(),
            Some(g) => self.products.iter().filter(|p| p.gender.matches(g)).collect(),
        }
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// `true` when the catalog holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/product.rs"]
mod tests;
