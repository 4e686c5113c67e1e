use std::{
    fs::OpenOptions,
    io::{Cursor, Write},
    path::{Component, Path, PathBuf},
};

use anyhow::Context;
use uuid::Uuid;

use crate::foundation::{
    config::StorageLayout,
    error::{TryOnError, TryOnResult},
};

/// Extension used for scratch uploads whose file name carries none.
pub const DEFAULT_UPLOAD_EXTENSION: &str = "png";

#[derive(Clone, Debug, PartialEq, Eq)]
/// A write-once file persisted by an [`ImageStore`].
pub struct StoredArtifact {
    /// Globally unique token; storage key and public resource name.
    pub token: Uuid,
    /// File name inside its namespace (`<token>.<ext>`).
    pub file_name: String,
    /// Location on disk.
    pub path: PathBuf,
    /// Addressable URL, or `None` for namespaces that are not served.
    pub url: Option<String>,
}

/// Durable storage for reference images, generated composites and scratch uploads.
///
/// Writers never coordinate: each artifact gets a fresh random token, so concurrent
/// requests cannot collide on a name.
pub trait ImageStore: Send + Sync {
    /// Byte-exact read of a product reference image.
    ///
    /// Fails with [`TryOnError::ProductImageMissing`] when `name` does not resolve to a
    /// readable file inside the reference namespace.
    fn load_reference(&self, name: &str) -> TryOnResult<Vec<u8>>;

    /// Encode `image` losslessly (PNG) and persist it under a fresh token.
    fn save_output(&self, image: &image::RgbaImage) -> TryOnResult<StoredArtifact>;

    /// Persist raw upload bytes under a fresh token, keeping the hint's extension.
    fn save_upload(&self, bytes: &[u8], file_name_hint: Option<&str>)
    -> TryOnResult<StoredArtifact>;

    /// Public URL of a reference image.
    fn reference_url(&self, name: &str) -> String;
}

#[derive(Clone, Debug)]
/// [`ImageStore`] backed by the three directories of a [`StorageLayout`].
pub struct FsImageStore {
    layout: StorageLayout,
}

impl FsImageStore {
    /// Location of reference `name` inside the products directory.
    ///
    /// `None` unless `name` is a relative path of plain segments. Backslashes count as separators.
    fn reference_path(&self, name: &str) -> Option<PathBuf> {
        let name = name.replace('\\', "/");
        let mut path = self.layout.products_dir.clone();
        let mut segments = 0;
        for component in Path::new(&name).components() {
            match component {
                Component::Normal(seg) => {
                    path.push(seg);
                    segments += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        (segments > 0).then_some(path)
    }

    /// Open the store, creating the upload, output and reference directories if needed.
    pub fn open(layout: StorageLayout) -> TryOnResult<Self> {
        for dir in [
            &layout.uploads_dir,
            &layout.outputs_dir,
            &layout.products_dir,
        ] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create storage dir '{}'", dir.display()))?;
        }
        Ok(Self { layout })
    }

    /// Layout this store was opened with.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }
}

impl ImageStore for FsImageStore {
    #[tracing::instrument(skip(self))]
    fn load_reference(&self, name: &str) -> TryOnResult<Vec<u8>> {
        let missing = || TryOnError::ProductImageMissing {
            reference: name.to_string(),
        };
        let path = self.reference_path(name).ok_or_else(missing)?;
        std::fs::read(&path).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "reference image unreadable");
            missing()
        })
    }

    fn save_output(&self, image: &image::RgbaImage) -> TryOnResult<StoredArtifact> {
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode composite as png")?;

        let token = Uuid::new_v4();
        let file_name = format!("{token}.png");
        let path = self.layout.outputs_dir.join(&file_name);
        write_new(&path, &buf)?;

        let url = StorageLayout::join_url(&self.layout.outputs_url_prefix, &file_name);
        tracing::info!(%url, bytes = buf.len(), "saved composite");
        Ok(StoredArtifact {
            token,
            file_name,
            path,
            url: Some(url),
        })
    }

    fn save_upload(
        &self,
        bytes: &[u8],
        file_name_hint: Option<&str>,
    ) -> TryOnResult<StoredArtifact> {
        let ext = file_name_hint
            .and_then(upload_extension)
            .unwrap_or(DEFAULT_UPLOAD_EXTENSION);

        let token = Uuid::new_v4();
        let file_name = format!("{token}.{ext}");
        let path = self.layout.uploads_dir.join(&file_name);
        write_new(&path, bytes)?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved scratch upload");
        Ok(StoredArtifact {
            token,
            file_name,
            path,
            url: None,
        })
    }

    fn reference_url(&self, name: &str) -> String {
        StorageLayout::join_url(&self.layout.products_url_prefix, name)
    }
}

/// Extension of an uploaded file name, if it is a plain alphanumeric token.
fn upload_extension(file_name: &str) -> Option<&str> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

fn write_new(path: &Path, bytes: &[u8]) -> TryOnResult<()> {
    let mut f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("create '{}'", path.display()))?;
    f.write_all(bytes)
        .with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
