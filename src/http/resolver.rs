//! Maps request targets onto the filesystem and enforces web root containment.
//!
//! Resolution canonicalizes the candidate path, following symlinks and `..`
//! segments, and then requires the result to sit at or below the canonical
//! web root. The comparison is made on path components, so a sibling such as
//! `/srv/www-secret` is never treated as being inside `/srv/www`.
//!
//! Containment and existence are reported separately: a path that cannot be
//! canonicalized (missing, dangling symlink, permission denied) is a
//! [`ResolveError`], which the handler answers with 404. A path that does
//! canonicalize but lands outside the root is a [`ResolvedTarget`] with
//! `within_root == false`, answered with 403.

use std::io;
use std::path::{Path, PathBuf};

use crate::bootstrap::DEFAULT_DOCUMENT;

/// Outcome of a successful canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub absolute_path: PathBuf,
    pub within_root: bool,
}

#[derive(Debug)]
pub enum ResolveError {
    /// The candidate path could not be canonicalized
    NotFound(io::Error),
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::NotFound(e) => write!(f, "path not found: {}", e),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resolves request targets against one canonical web root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Canonicalizes `web_root` once; fails if it does not exist.
    pub fn new(web_root: &Path) -> io::Result<Self> {
        Ok(Self {
            root: std::fs::canonicalize(web_root)?,
        })
    }

    /// The canonical web root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a request target such as `/css/site.css`.
    ///
    /// `/` is served as the default document.
    pub async fn resolve(&self, request_path: &str) -> Result<ResolvedTarget, ResolveError> {
        let candidate = self.candidate(request_path);

        let absolute_path = tokio::fs::canonicalize(&candidate)
            .await
            .map_err(ResolveError::NotFound)?;

        Ok(ResolvedTarget {
            within_root: absolute_path.starts_with(&self.root),
            absolute_path,
        })
    }

    /// Joins the target onto the root without normalizing it.
    ///
    /// Leading separators are dropped first; `Path::join` would otherwise
    /// treat the target as absolute and discard the root.
    fn candidate(&self, request_path: &str) -> PathBuf {
        let relative = if request_path == "/" {
            DEFAULT_DOCUMENT
        } else {
            request_path.trim_start_matches('/')
        };

        self.root.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_maps_to_default_document() {
        let resolver = PathResolver {
            root: PathBuf::from("/srv/www"),
        };

        assert_eq!(resolver.candidate("/"), PathBuf::from("/srv/www/index.html"));
    }

    #[test]
    fn absolute_looking_targets_stay_under_root() {
        let resolver = PathResolver {
            root: PathBuf::from("/srv/www"),
        };

        assert_eq!(
            resolver.candidate("//etc/passwd"),
            PathBuf::from("/srv/www/etc/passwd")
        );
        assert_eq!(
            resolver.candidate("/../secret"),
            PathBuf::from("/srv/www/../secret")
        );
    }

    #[test]
    fn containment_is_component_aware() {
        let root = Path::new("/srv/www");

        assert!(Path::new("/srv/www").starts_with(root));
        assert!(Path::new("/srv/www/a/b").starts_with(root));
        assert!(!Path::new("/srv/www-secret/x").starts_with(root));
    }
}
