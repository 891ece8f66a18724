//! Cache-artifact management: identity, staleness, and atomic persistence.
//!
//! No locking is used. Generation is a pure function of the applied-language
//! list and file contents, so concurrent regeneration by independent
//! processes is safe as long as replacement is atomic: artifacts are written
//! to a temporary file in the cache directory and renamed into place, so a
//! reader never observes a partial write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::compiler::{CompiledCatalog, CATALOG_FORMAT_VERSION};
use crate::error::{I18nError, Result};

/// Decides whether a cached artifact is valid, persists fresh ones, and
/// loads valid ones.
pub struct CacheManager {
    cache_dir: PathBuf,
    prefix: String,
    file_template: String,
    file_mode: u32,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf, prefix: String, file_template: String, file_mode: u32) -> Self {
        Self {
            cache_dir,
            prefix,
            file_template,
            file_mode,
        }
    }

    /// Deterministic artifact path for a primary applied language.
    ///
    /// The identity hash covers the catalog format version, the source path
    /// template, and the primary language, so a change to any of them maps
    /// to a different artifact instead of a false cache hit.
    pub fn artifact_path(&self, primary: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(CATALOG_FORMAT_VERSION.to_string());
        hasher.update(b"\n");
        hasher.update(&self.file_template);
        hasher.update(b"\n");
        hasher.update(primary);
        let digest = hasher.finalize();

        let identity: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
        self.cache_dir
            .join(format!("{}_{identity}_{primary}.cache.json", self.prefix))
    }

    /// Load the artifact at `path` if it is still valid.
    ///
    /// Valid means: the file exists, its modification time is at least the
    /// primary source file's, and it deserializes to the current format
    /// version. A corrupt or outdated artifact is treated as stale, never as
    /// a hard error.
    pub fn load_fresh(
        &self,
        path: &Path,
        primary_source: &Path,
    ) -> Result<Option<CompiledCatalog>> {
        let artifact_mtime = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            Err(_) => {
                debug!(path = %path.display(), "no cache artifact, regenerating");
                return Ok(None);
            }
        };

        let source_mtime = fs::metadata(primary_source)
            .and_then(|m| m.modified())
            .map_err(|source| I18nError::Io {
                path: primary_source.to_path_buf(),
                source,
            })?;

        if artifact_mtime < source_mtime {
            debug!(path = %path.display(), "cache artifact older than source, regenerating");
            return Ok(None);
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable cache artifact, regenerating");
                return Ok(None);
            }
        };

        match serde_json::from_str::<CompiledCatalog>(&text) {
            Ok(catalog) if catalog.version == CATALOG_FORMAT_VERSION => {
                debug!(path = %path.display(), "cache artifact fresh, reusing");
                Ok(Some(catalog))
            }
            Ok(catalog) => {
                debug!(
                    found = catalog.version,
                    expected = CATALOG_FORMAT_VERSION,
                    "cache artifact from another format version, regenerating"
                );
                Ok(None)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache artifact, regenerating");
                Ok(None)
            }
        }
    }

    /// Persist an artifact atomically (write-temp-then-rename).
    pub fn store(&self, path: &Path, catalog: &CompiledCatalog) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).map_err(|source| I18nError::CacheWrite {
            path: path.to_path_buf(),
            source,
        })?;

        let json =
            serde_json::to_vec_pretty(catalog).map_err(|e| I18nError::CacheWrite {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.cache_dir).map_err(|source| {
            I18nError::CacheWrite {
                path: path.to_path_buf(),
                source,
            }
        })?;
        io::Write::write_all(&mut tmp, &json).map_err(|source| I18nError::CacheWrite {
            path: path.to_path_buf(),
            source,
        })?;
        tmp.persist(path).map_err(|e| I18nError::CacheWrite {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        // Any later process may need to regenerate the same artifact.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(self.file_mode)).map_err(
                |source| I18nError::CacheWrite {
                    path: path.to_path_buf(),
                    source,
                },
            )?;
        }

        debug!(path = %path.display(), entries = catalog.entries.len(), "cache artifact written");
        Ok(())
    }
}
