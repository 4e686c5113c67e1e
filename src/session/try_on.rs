use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    assets::store::ImageStore,
    catalog::product::{Catalog, ProductId},
    foundation::error::{TryOnError, TryOnResult},
    ingest,
    render::composite::{PlacementParams, composite},
};

#[derive(Clone, Debug)]
/// One try-on request.
pub struct TryOnRequest {
    /// Raw uploaded bytes, untrusted.
    pub person_photo: Vec<u8>,
    /// Client-side file name; only used to pick the scratch upload extension.
    pub file_name: Option<String>,
    /// Catalog id of the product to overlay.
    pub product_id: ProductId,
    /// Echoed back verbatim.
    pub gender: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Successful try-on outcome.
pub struct TryOnResponse {
    /// Product id from the request.
    pub product_id: ProductId,
    /// Gender string from the request, unchecked.
    pub gender: String,
    /// Addressable URL of the stored composite.
    pub try_on_image_url: String,
}

/// Pipeline progress of a single request. A failure is terminal at whatever stage it occurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet.
    Start,
    /// Product id matched a catalog entry.
    ProductResolved,
    /// Upload persisted to scratch storage and decoded.
    PersonDecoded,
    /// Reference image read and decoded.
    ProductImageLoaded,
    /// Composite built in memory.
    Composited,
    /// Composite written to the output namespace.
    Saved,
    /// Response assembled.
    Done,
}

/// Sequences ingestion, composition and storage for try-on requests.
///
/// Holds only shared read-only state, so one instance can serve many threads.
#[derive(Clone)]
pub struct TryOnService {
    catalog: Arc<Catalog>,
    store: Arc<dyn ImageStore>,
    placement: PlacementParams,
}

impl std::fmt::Debug for TryOnService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryOnService")
            .field("catalog_len", &self.catalog.len())
            .field("placement", &self.placement)
            .finish()
    }
}

impl TryOnService {
    /// Service over `catalog` and `store` with the default placement heuristic.
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn ImageStore>) -> Self {
        Self {
            catalog,
            store,
            placement: PlacementParams::default(),
        }
    }

    /// Replace the default placement heuristic.
    pub fn with_placement(mut self, placement: PlacementParams) -> Self {
        self.placement = placement;
        self
    }

    /// Shared catalog handle.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Shared image store handle.
    pub fn store(&self) -> &Arc<dyn ImageStore> {
        &self.store
    }

    /// Placement heuristic in use.
    pub fn placement(&self) -> PlacementParams {
        self.placement
    }

    /// Run one request to completion.
    ///
    /// The raw upload is persisted to scratch storage before decoding and kept even when the
    /// request later fails. No composite is written unless every step succeeds.
    #[tracing::instrument(skip_all, fields(product_id = req.product_id))]
    pub fn try_on(&self, req: &TryOnRequest) -> TryOnResult<TryOnResponse> {
        let mut stage = Stage::Start;
        let out = self.run(req, &mut stage);
        match &out {
            Ok(resp) => tracing::info!(url = %resp.try_on_image_url, "try-on done"),
            Err(e) if e.is_request_error() => {
                tracing::warn!(?stage, error = %e, "try-on rejected")
            }
            Err(e) => tracing::error!(?stage, error = %e, "try-on storage failure"),
        }
        out
    }

    fn run(&self, req: &TryOnRequest, stage: &mut Stage) -> TryOnResult<TryOnResponse> {
        let product = ingest::resolve_product(&self.catalog, req.product_id)?;
        advance(stage, Stage::ProductResolved);

        self.store
            .save_upload(&req.person_photo, req.file_name.as_deref())?;
        let person = ingest::decode_person_image(&req.person_photo)?;
        advance(stage, Stage::PersonDecoded);

        let product_img = ingest::load_product_image(self.store.as_ref(), product)?;
        advance(stage, Stage::ProductImageLoaded);

        let result = composite(&person, &product_img, self.placement);
        advance(stage, Stage::Composited);

        let saved = self.store.save_output(&result.image)?;
        advance(stage, Stage::Saved);

        let url = saved.url.ok_or_else(|| {
            TryOnError::Storage(anyhow::anyhow!("output namespace returned no url"))
        })?;
        advance(stage, Stage::Done);

        Ok(TryOnResponse {
            product_id: req.product_id,
            gender: req.gender.clone(),
            try_on_image_url: url,
        })
    }

    /// Run independent requests on a rayon pool, returning results in input order.
    ///
    /// `threads` overrides the worker count; `Some(0)` is rejected.
    pub fn try_on_batch(
        &self,
        reqs: &[TryOnRequest],
        threads: Option<usize>,
    ) -> TryOnResult<Vec<TryOnResult<TryOnResponse>>> {
        let pool = build_thread_pool(threads)?;
        Ok(pool.install(|| reqs.par_iter().map(|r| self.try_on(r)).collect()))
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::debug!(from = ?*stage, to = ?next, "stage");
    *stage = next;
}

fn build_thread_pool(threads: Option<usize>) -> TryOnResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TryOnError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TryOnError::Storage(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/try_on.rs"]
mod tests;
