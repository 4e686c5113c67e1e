//! Virtual try-on engine.
//!
//! Overlays a catalog product's reference image onto an uploaded person photo and persists the
//! composite under a unique, addressable name. A small in-memory catalog and cart sit beside the
//! pipeline.
//!
//! # Pipeline overview
//!
//! 1. **Ingest**: resolve the product id, persist the raw upload, decode it to RGBA8
//! 2. **Load**: read and decode the product's reference image
//! 3. **Composite**: scale the product to half the person width, center it, anchor it a third
//!    of the way down, and paste it with its own alpha as the mask
//! 4. **Store**: write the composite as PNG under a fresh UUID and return its URL
//!
//! Each step fails with its own [`TryOnError`] kind; a failed request never writes a composite.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod assets;
mod catalog;
mod foundation;
mod ingest;
mod render;
mod session;

pub use api::dispatch::{AppState, read_request};
pub use api::messages::{Command, ErrorBody, ProductView, Reply};
pub use assets::decode::{PersonImage, ProductImage, decode_rgba8};
pub use assets::store::{DEFAULT_UPLOAD_EXTENSION, FsImageStore, ImageStore, StoredArtifact};
pub use catalog::cart::{Cart, CartItem};
pub use catalog::product::{Catalog, Gender, Product, ProductId};
pub use foundation::config::StorageLayout;
pub use foundation::error::{TryOnError, TryOnResult};
pub use ingest::{decode_person_image, load_product_image, resolve_product};
pub use render::composite::{
    CompositeResult, DEFAULT_VERTICAL_DIVISOR, DEFAULT_WIDTH_FRACTION, Placement,
    PlacementParams, Rgba8, composite, compute_placement, mask_blend, paste_masked,
    visible_window,
};
pub use render::resample::resize_window;
pub use session::try_on::{Stage, TryOnRequest, TryOnResponse, TryOnService};
