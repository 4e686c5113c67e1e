//! Validation of untrusted request inputs.
//!
//! Format detection is content-based: file names never influence decoding.

use crate::{
    assets::{
        decode::{PersonImage, ProductImage, decode_rgba8},
        store::ImageStore,
    },
    catalog::product::{Catalog, Product, ProductId},
    foundation::error::{TryOnError, TryOnResult},
};

/// Decode an uploaded photo into RGBA8.
pub fn decode_person_image(raw: &[u8]) -> TryOnResult<PersonImage> {
    decode_rgba8(raw)
        .map(PersonImage::from_rgba)
        .map_err(|e| TryOnError::invalid_person(e.to_string()))
}

/// Look up `product_id` in `catalog`.
pub fn resolve_product(catalog: &Catalog, product_id: ProductId) -> TryOnResult<&Product> {
    catalog
        .get(product_id)
        .ok_or(TryOnError::ProductNotFound { product_id })
}

/// Read and decode the reference image of `product`.
///
/// A reference that cannot be read is [`TryOnError::ProductImageMissing`]; one that reads but
/// does not decode is [`TryOnError::InvalidProductImage`].
pub fn load_product_image(store: &dyn ImageStore, product: &Product) -> TryOnResult<ProductImage> {
    let bytes = store.load_reference(&product.image_name)?;
    decode_rgba8(&bytes)
        .map(ProductImage::from_rgba)
        .map_err(|e| {
            TryOnError::invalid_product(format!("'{}': {e}", product.image_name))
        })
}

#[cfg(test)]
#[path = "../tests/unit/ingest.rs"]
mod tests;
