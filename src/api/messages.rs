use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{
        cart::CartItem,
        product::{Product, ProductId},
    },
    foundation::error::{TryOnError, TryOnResult},
    session::try_on::TryOnResponse,
};

fn default_quantity() -> u32 {
    1
}

/// Client command, one JSON object tagged by `op`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Liveness check.
    Health,
    /// List catalog products.
    ListProducts {
        /// Audience filter; unisex products are always included.
        #[serde(default)]
        gender: Option<String>,
    },
    /// Current cart lines.
    GetCart,
    /// Add a product to the cart.
    AddToCart {
        /// Catalog id; unknown ids leave the cart unchanged.
        product_id: ProductId,
        /// Units to add, 1 when absent.
        #[serde(default = "default_quantity")]
        quantity: u32,
    },
    /// Empty the cart.
    ClearCart,
    /// Overlay a product onto a photo.
    TryOn {
        /// Path of the person photo to upload.
        photo_path: PathBuf,
        /// Catalog id of the product.
        product_id: ProductId,
        /// Echoed back verbatim.
        gender: String,
    },
}

impl Command {
    /// Parse one JSON command.
    pub fn parse(line: &str) -> TryOnResult<Self> {
        serde_json::from_str(line)
            .map_err(|e| TryOnError::validation(format!("parse command JSON: {e}")))
    }
}

/// Product as listed to clients, with its reference image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    /// Catalog entry, flattened into the same object.
    #[serde(flatten)]
    pub product: Product,
    /// URL of the product's reference image.
    pub image_url: String,
}

/// Request-level failure as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Caller-facing message.
    pub error: String,
}

/// Reply to a [`Command`]. Each variant serializes to its bare payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Plain status message.
    Message {
        /// Message text.
        message: String,
    },
    /// Product listing.
    Products(Vec<ProductView>),
    /// Cart lines.
    Cart(Vec<CartItem>),
    /// Successful try-on.
    TryOn(TryOnResponse),
    /// Request-level failure.
    Error(ErrorBody),
}

impl Reply {
    /// Build a [`Reply::Message`].
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message {
            message: msg.into(),
        }
    }

    /// Wire form of a request-level error; storage failures are handed back unchanged.
    pub fn from_error(err: TryOnError) -> TryOnResult<Self> {
        match err.public_message() {
            Some(error) => Ok(Self::Error(ErrorBody { error })),
            None => Err(err),
        }
    }

    /// `true` for [`Reply::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/api/messages.rs"]
mod tests;
