use std::path::{Path, PathBuf};

/// Directory and URL layout for the three storage namespaces.
///
/// Generated composites and product references are exposed read-only under URL prefixes;
/// scratch uploads are kept on disk only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageLayout {
    /// Scratch directory for raw uploaded photos.
    pub uploads_dir: PathBuf,
    /// Directory receiving generated composites.
    pub outputs_dir: PathBuf,
    /// Read-only directory holding product reference images.
    pub products_dir: PathBuf,
    /// URL prefix under which `outputs_dir` is served.
    pub outputs_url_prefix: String,
    /// URL prefix under which `products_dir` is served.
    pub products_url_prefix: String,
}

impl StorageLayout {
    /// Standard `uploads/`, `outputs/` and `products/` layout below `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            uploads_dir: root.join("uploads"),
            outputs_dir: root.join("outputs"),
            products_dir: root.join("products"),
            outputs_url_prefix: "/outputs".to_string(),
            products_url_prefix: "/products".to_string(),
        }
    }

    /// Join a URL prefix and a file name with exactly one `/` between them.
    pub(crate) fn join_url(prefix: &str, file_name: &str) -> String {
        format!("{}/{}", prefix.trim_end_matches('/'), file_name)
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::under(".")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
