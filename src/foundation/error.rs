/// Convenience result type used across the try-on engine.
pub type TryOnResult<T> = Result<T, TryOnError>;

/// Error taxonomy for try-on requests and their supporting stores.
///
/// The first four variants are request-level failures caused by bad input or missing data.
/// They are reported to the caller and never abort the process. [`TryOnError::Storage`] wraps
/// unexpected environment failures (disk full, unwritable output directory) and is meant to
/// propagate.
#[derive(thiserror::Error, Debug)]
pub enum TryOnError {
    /// No catalog entry carries the requested id.
    #[error("product not found: id {product_id}")]
    ProductNotFound {
        /// Requested product id.
        product_id: u32,
    },

    /// The catalog entry exists but its reference image cannot be read.
    #[error("product image missing: '{reference}'")]
    ProductImageMissing {
        /// The product's image reference as stored in the catalog.
        reference: String,
    },

    /// Uploaded bytes are not a decodable raster image.
    #[error("invalid person image: {0}")]
    InvalidPersonImage(String),

    /// Stored reference bytes exist but cannot be decoded.
    #[error("invalid product image: {0}")]
    InvalidProductImage(String),

    /// Malformed configuration or command input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unexpected storage or environment failure.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TryOnError {
    /// Build a [`TryOnError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TryOnError::InvalidPersonImage`] value.
    pub fn invalid_person(msg: impl Into<String>) -> Self {
        Self::InvalidPersonImage(msg.into())
    }

    /// Build a [`TryOnError::InvalidProductImage`] value.
    pub fn invalid_product(msg: impl Into<String>) -> Self {
        Self::InvalidProductImage(msg.into())
    }

    /// `true` for failures caused by the request itself rather than the environment.
    pub fn is_request_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }

    /// Caller-facing message for request-level failures.
    ///
    /// Returns `None` for [`TryOnError::Storage`], which is not reported through the
    /// request channel.
    pub fn public_message(&self) -> Option<String> {
        match self {
            Self::ProductNotFound { .. } => Some("Product not found".to_string()),
            Self::ProductImageMissing { .. } => {
                Some("Product image file not found on server".to_string())
            }
            Self::InvalidPersonImage(_) => Some("Invalid person image".to_string()),
            Self::InvalidProductImage(_) => Some("Invalid product image".to_string()),
            Self::Validation(msg) => Some(msg.clone()),
            Self::Storage(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
