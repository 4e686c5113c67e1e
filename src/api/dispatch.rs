use std::{path::Path, sync::Arc};

use crate::{
    api::messages::{Command, ProductView, Reply},
    catalog::{
        cart::{Cart, CartItem},
        product::{Catalog, Gender},
    },
    foundation::error::{TryOnError, TryOnResult},
    session::try_on::{TryOnRequest, TryOnService},
};

/// Long-lived handles shared by every command: catalog, cart and the try-on pipeline.
#[derive(Debug, Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    cart: Arc<Cart>,
    service: TryOnService,
}

impl AppState {
    /// State sharing `service`'s catalog, with an empty cart.
    pub fn new(service: TryOnService) -> Self {
        Self {
            catalog: service.catalog().clone(),
            cart: Arc::new(Cart::new()),
            service,
        }
    }

    /// Product catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Shared cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Try-on pipeline.
    pub fn service(&self) -> &TryOnService {
        &self.service
    }

    /// Execute `cmd`, turning request-level failures into [`Reply::Error`].
    ///
    /// Only storage failures come back as `Err`.
    pub fn respond(&self, cmd: Command) -> TryOnResult<Reply> {
        self.dispatch(cmd).or_else(Reply::from_error)
    }

    /// Execute `cmd` with typed errors.
    #[tracing::instrument(skip(self))]
    pub fn dispatch(&self, cmd: Command) -> TryOnResult<Reply> {
        match cmd {
            Command::Health => Ok(Reply::message("Virtual Try-On API is running")),
            Command::ListProducts { gender } => {
                Ok(Reply::Products(self.list_products(gender.as_deref())))
            }
            Command::GetCart => Ok(Reply::Cart(self.cart.items()?)),
            Command::AddToCart {
                product_id,
                quantity,
            } => {
                let item = CartItem::new(product_id, quantity);
                Ok(Reply::Cart(self.cart.add(&self.catalog, item)?))
            }
            Command::ClearCart => {
                self.cart.clear()?;
                Ok(Reply::message("Cart cleared"))
            }
            Command::TryOn {
                photo_path,
                product_id,
                gender,
            } => {
                let req = read_request(&photo_path, product_id, gender)?;
                Ok(Reply::TryOn(self.service.try_on(&req)?))
            }
        }
    }

    fn list_products(&self, gender: Option<&str>) -> Vec<ProductView> {
        // An unrecognized audience still sees unisex products.
        let filter = gender.map(|g| g.parse::<Gender>().unwrap_or(Gender::Unisex));
        let store = self.service.store();
        self.catalog
            .list(filter)
            .into_iter()
            .map(|p| ProductView {
                image_url: store.reference_url(&p.image_name),
                product: p.clone(),
            })
            .collect()
    }
}

/// Build a [`TryOnRequest`] from a photo on disk; the file name becomes the upload hint.
pub fn read_request(
    photo_path: &Path,
    product_id: u32,
    gender: String,
) -> TryOnResult<TryOnRequest> {
    let person_photo = std::fs::read(photo_path).map_err(|e| {
        TryOnError::validation(format!("read photo '{}': {e}", photo_path.display()))
    })?;
    let file_name = photo_path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);
    Ok(TryOnRequest {
        person_photo,
        file_name,
        product_id,
        gender,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/api/dispatch.rs"]
mod tests;
