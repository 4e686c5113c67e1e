use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::{
    catalog::product::{Catalog, ProductId},
    foundation::error::{TryOnError, TryOnResult},
};

fn default_quantity() -> u32 {
    1
}

/// One cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog id of the product.
    pub product_id: ProductId,
    /// Units of the product, at least 1. Defaults to 1 when absent on the wire.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartItem {
    /// Build a cart line.
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Process-wide shopping cart.
///
/// All mutations go through one mutex; readers get snapshots.
#[derive(Debug, Default)]
pub struct Cart {
    lines: Mutex<Vec<CartItem>>,
}

impl Cart {
    /// Empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> TryOnResult<MutexGuard<'_, Vec<CartItem>>> {
        self.lines
            .lock()
            .map_err(|_| TryOnError::Storage(anyhow::anyhow!("cart lock poisoned")))
    }

    /// Add `item` to the cart and return the resulting lines.
    ///
    /// Ids unknown to `catalog` are ignored. Adding an id already in the cart increments that
    /// line's quantity instead of appending a second line.
    pub fn add(&self, catalog: &Catalog, item: CartItem) -> TryOnResult<Vec<CartItem>> {
        if item.quantity == 0 {
            return Err(TryOnError::validation("cart quantity must be >= 1"));
        }

        let mut lines = self.lock()?;
        if !catalog.contains(item.product_id) {
            tracing::debug!(product_id = item.product_id, "ignoring unknown product");
            return Ok(lines.clone());
        }

        match lines.iter_mut().find(|l| l.product_id == item.product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => lines.push(item),
        }
        Ok(lines.clone())
    }

    /// Snapshot of the current lines.
    pub fn items(&self) -> TryOnResult<Vec<CartItem>> {
        Ok(self.lock()?.clone())
    }

    /// Remove every line.
    pub fn clear(&self) -> TryOnResult<()> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/cart.rs"]
mod tests;
