//! SVG document sources.
//!
//! The reconciler never touches the filesystem directly; it asks the
//! [`SvgSource`] resource for a document by url.  The desktop build resolves
//! `/`-rooted urls against the asset directory, tests swap in a
//! [`MemoryFetcher`].

use crate::error::{SandboxError, SandboxResult};
use bevy::prelude::*;
use std::collections::HashMap;
use std::path::{Component as PathComponent, Path, PathBuf};
use std::sync::Arc;

/// Url → raw SVG text.
///
/// Implementations must be callable from the IO task pool.
pub trait SvgFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> SandboxResult<String>;
}

/// The fetcher used by the reconciler.
#[derive(Resource, Clone)]
pub struct SvgSource(pub Arc<dyn SvgFetcher>);

impl SvgSource {
    pub fn new(fetcher: impl SvgFetcher) -> Self {
        Self(Arc::new(fetcher))
    }
}

impl Default for SvgSource {
    fn default() -> Self {
        Self::new(AssetDirFetcher::new(crate::constants::ASSET_ROOT))
    }
}

/// Resolves urls like `/header/cookie.svg` against a root directory.
#[derive(Debug, Clone)]
pub struct AssetDirFetcher {
    root: PathBuf,
}

impl AssetDirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a url onto a path under the root, refusing `..` and absolute
    /// components once the leading `/` is stripped.
    pub fn resolve(&self, url: &str) -> SandboxResult<PathBuf> {
        let relative = Path::new(url.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, PathComponent::Normal(_) | PathComponent::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(SandboxError::InvalidAssetPath(url.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl SvgFetcher for AssetDirFetcher {
    fn fetch(&self, url: &str) -> SandboxResult<String> {
        let path = self.resolve(url)?;
        std::fs::read_to_string(&path).map_err(|e| SandboxError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// In-memory documents keyed by url.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    docs: HashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, doc: impl Into<String>) -> Self {
        self.docs.insert(url.into(), doc.into());
        self
    }
}

impl SvgFetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> SandboxResult<String> {
        self.docs.get(url).cloned().ok_or_else(|| SandboxError::Fetch {
            url: url.to_string(),
            reason: "not found".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_strips_leading_slash() {
        let fetcher = AssetDirFetcher::new("assets");
        assert_eq!(
            fetcher.resolve("/header/cookie.svg").unwrap(),
            PathBuf::from("assets/header/cookie.svg")
        );
    }

    #[test]
    fn resolve_rejects_parent_traversal() {
        let fetcher = AssetDirFetcher::new("assets");
        assert!(matches!(
            fetcher.resolve("/../secrets.svg"),
            Err(SandboxError::InvalidAssetPath(_))
        ));
        assert!(fetcher.resolve("/").is_err());
    }

    #[test]
    fn missing_file_is_fetch_error() {
        let fetcher = AssetDirFetcher::new("definitely/not/here");
        assert!(matches!(
            fetcher.fetch("/a.svg"),
            Err(SandboxError::Fetch { .. })
        ));
    }

    #[test]
    fn memory_fetcher_serves_registered_docs_only() {
        let fetcher = MemoryFetcher::new().with("/a.svg", "<svg/>");
        assert_eq!(fetcher.fetch("/a.svg").unwrap(), "<svg/>");
        assert!(fetcher.fetch("/b.svg").is_err());
    }
}
