//! On-disk project layout.
//!
//! Three flat key→file surfaces under one project root: `fragments/` keyed by
//! 1-based fragment index, `backgrounds/` as the fixed bed catalog, `output/`
//! keyed by a user-chosen mix name. No subdirectories, no metadata sidecars. The
//! store resolves keys to paths and owns the per-output-name export locks; it
//! never creates the directories itself.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::foundation::core::FragmentId;
use crate::foundation::error::{VoxweaveError, VoxweaveResult};

/// Validate a flat asset key: a bare file stem, no path structure.
pub(crate) fn validate_asset_name(name: &str) -> VoxweaveResult<()> {
    if name.is_empty() {
        return Err(VoxweaveError::validation("asset name must be non-empty"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(VoxweaveError::validation(
            "asset names must not contain path separators",
        ));
    }
    if name == "." || name == ".." {
        return Err(VoxweaveError::validation(
            "asset names must not be directory references",
        ));
    }
    Ok(())
}

/// Path resolution and export locking for one narration project root.
pub struct ProjectStore {
    root: PathBuf,
    output_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fragments_dir(&self) -> PathBuf {
        self.root.join("fragments")
    }

    pub fn backgrounds_dir(&self) -> PathBuf {
        self.root.join("backgrounds")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    /// Persisted location of one fragment: `fragments/fragment<N>.mp3`.
    pub fn fragment_path(&self, id: FragmentId) -> PathBuf {
        self.fragments_dir().join(format!("fragment{id}.mp3"))
    }

    /// Catalog entry for a named background bed.
    pub fn background_path(&self, name: &str) -> VoxweaveResult<PathBuf> {
        validate_asset_name(name)?;
        Ok(self.backgrounds_dir().join(format!("{name}.mp3")))
    }

    /// Final-mix location for a user-chosen output name.
    pub fn output_path(&self, name: &str) -> VoxweaveResult<PathBuf> {
        validate_asset_name(name)?;
        Ok(self.output_dir().join(format!("{name}.mp3")))
    }

    /// Sorted background catalog (file stems of `backgrounds/*.mp3`).
    ///
    /// A missing catalog directory is an empty catalog, not an error.
    pub fn list_backgrounds(&self) -> VoxweaveResult<Vec<String>> {
        let dir = self.backgrounds_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Ok(Vec::new()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                VoxweaveError::validation(format!(
                    "failed to read background catalog '{}': {e}",
                    dir.display()
                ))
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("mp3") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Mutex guarding exports for one output name.
    ///
    /// Holding the returned lock across compose + export preserves "last writer
    /// wins, no partial overwrite" for concurrent requests on the same name.
    pub fn output_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .output_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(name.to_string()).or_default().clone()
    }
}
