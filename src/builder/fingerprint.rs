//! Script fingerprinting.
//!
//! The rendered script is hashed together with the tool version and the
//! hash is stored next to the script. When the hash is unchanged and the
//! script is still on disk, rewriting it is skipped so the executor sees
//! an untouched file.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs::{read_to_string, write_string};
use crate::util::hash::Fingerprint;

/// File holding the fingerprint of the last written script.
pub const FINGERPRINT_FILE: &str = "build_cache.txt";

/// Fingerprint of one rendered script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFingerprint(String);

impl ScriptFingerprint {
    /// Fingerprint `script`.
    pub fn of(script: &str) -> Self {
        let mut fp = Fingerprint::new();
        fp.update_str(env!("CARGO_PKG_VERSION")).update_str(script);
        ScriptFingerprint(fp.finish())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fingerprint store living in the cache directory.
#[derive(Debug, Clone)]
pub struct FingerprintCache {
    path: PathBuf,
}

impl FingerprintCache {
    /// Store inside `cache_dir`.
    pub fn new(cache_dir: &Path) -> Self {
        FingerprintCache {
            path: cache_dir.join(FINGERPRINT_FILE),
        }
    }

    /// Get the fingerprint file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last recorded fingerprint, if any.
    pub fn load(&self) -> Option<ScriptFingerprint> {
        if !self.path.is_file() {
            return None;
        }
        match read_to_string(&self.path) {
            Ok(content) => {
                let hash = content.trim();
                (!hash.is_empty()).then(|| ScriptFingerprint(hash.to_string()))
            }
            Err(err) => {
                tracing::debug!("ignoring unreadable fingerprint: {:#}", err);
                None
            }
        }
    }

    /// Whether `script_path` exists and was written from `current`.
    pub fn is_fresh(&self, script_path: &Path, current: &ScriptFingerprint) -> bool {
        script_path.is_file() && self.load().as_ref() == Some(current)
    }

    /// Record `fingerprint` as the last written script.
    pub fn save(&self, fingerprint: &ScriptFingerprint) -> Result<()> {
        write_string(&self.path, fingerprint.as_str())
    }
}
