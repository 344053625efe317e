//! Writing rendered records through `object_store`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectStorePath;
use object_store::{DynObjectStore, ObjectStoreExt, PutPayload};
use tracing::{debug, error};

/// Folder for per-car records, relative to the output root.
pub const CARS_DIR: &str = "Cars";

/// Folder for hitbox preset records, relative to the output root.
pub const HITBOXES_DIR: &str = "Hitboxes";

/// A rendered document and where it goes, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub relative_path: String,
    pub contents: String,
}

impl OutputFile {
    #[must_use]
    pub fn car(name: &str, contents: String) -> Self {
        Self {
            relative_path: format!("{CARS_DIR}/{name}.json"),
            contents,
        }
    }

    #[must_use]
    pub fn preset(index: usize, contents: String) -> Self {
        Self {
            relative_path: format!("{HITBOXES_DIR}/{index}.json"),
            contents,
        }
    }
}

/// Opens a local object store rooted at `root`, creating the directory if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or opened.
pub fn open_output_store(root: &Path) -> Result<Arc<DynObjectStore>> {
    std::fs::create_dir_all(root)
        .with_context(|| format!("Failed to create output directory {}", root.display()))?;

    let store = LocalFileSystem::new_with_prefix(root)
        .with_context(|| format!("Failed to open output directory {}", root.display()))?;

    Ok(Arc::new(store))
}

/// Writes one file.
///
/// # Errors
///
/// Returns an error if the write fails.
pub async fn write_file(store: &Arc<DynObjectStore>, file: &OutputFile) -> Result<()> {
    let location = ObjectStorePath::from(file.relative_path.as_str());
    let payload = PutPayload::from(Bytes::from(file.contents.clone()));

    store
        .put(&location, payload)
        .await
        .with_context(|| format!("Failed to write {}", file.relative_path))?;

    debug!(path = %location, "Wrote record");
    Ok(())
}

/// Writes every file, logging failures without stopping. Returns how many succeeded.
pub async fn write_all(store: &Arc<DynObjectStore>, files: &[OutputFile]) -> usize {
    let mut written = 0;

    for file in files {
        match write_file(store, file).await {
            Ok(()) => written += 1,
            Err(e) => {
                error!(
                    path = %file.relative_path,
                    error = %format!("{e:#}"),
                    "Failed to write record, skipping"
                );
            }
        }
    }

    written
}
