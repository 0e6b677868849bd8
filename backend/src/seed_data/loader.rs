//! Startup wiring for the in-memory inventory.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::info;

use crate::outbound::memory::{InventorySeed, MemoryInventory};
use crate::seed_data::config::InventorySettings;

/// Errors returned while preparing the in-memory inventory.
#[derive(Debug, Error)]
pub enum SeedLoadError {
    /// Seed file could not be read.
    #[error("failed to read seed file at {path}: {source}")]
    SeedRead {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Seed document is not valid.
    #[error("seed parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Build seeded in-memory stores from settings.
///
/// # Examples
///
/// ```rust,no_run
/// use inventory::seed_data::{InventorySettings, build_memory_inventory};
///
/// # fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = InventorySettings {
///     seed_enabled: true,
///     seed_path: None,
///     latency_min_ms: 0,
///     latency_max_ms: 0,
///     default_low_stock_threshold: 5,
/// };
/// let stores = build_memory_inventory(&settings)?;
/// # let _ = stores;
/// # Ok(())
/// # }
/// ```
pub fn build_memory_inventory(
    settings: &InventorySettings,
) -> Result<MemoryInventory, SeedLoadError> {
    let seed = if !settings.seed_enabled {
        info!(reason = "disabled", "inventory seeding skipped");
        InventorySeed::default()
    } else if let Some(path) = settings.seed_path.as_deref() {
        let seed = load_seed(path)?;
        info!(path = %path.display(), products = seed.products.len(), "inventory seed loaded");
        seed
    } else {
        let seed = InventorySeed::bundled()?;
        info!(products = seed.products.len(), "bundled inventory seed loaded");
        seed
    };
    Ok(MemoryInventory::seeded(seed, settings.latency()))
}

fn load_seed(path: &Path) -> Result<InventorySeed, SeedLoadError> {
    let read_error = |source: std::io::Error| SeedLoadError::SeedRead {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "seed path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let payload = dir.read(Path::new(file_name)).map_err(read_error)?;
    let contents = String::from_utf8(payload).map_err(|source| {
        read_error(std::io::Error::new(std::io::ErrorKind::InvalidData, source))
    })?;
    Ok(InventorySeed::from_json(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use rstest::{fixture, rstest};
    use tempfile::NamedTempFile;

    use crate::domain::ports::{CategoryRepository, ProductRepository};

    #[fixture]
    fn settings() -> InventorySettings {
        InventorySettings {
            seed_enabled: true,
            seed_path: None,
            latency_min_ms: 0,
            latency_max_ms: 0,
            default_low_stock_threshold: 5,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn bundled_seed_is_used_by_default(settings: InventorySettings) {
        let stores = build_memory_inventory(&settings).expect("stores build");
        assert_eq!(stores.products.get_all().await.expect("list").len(), 7);
        assert_eq!(stores.categories.get_all().await.expect("list").len(), 4);
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_seeding_starts_empty(mut settings: InventorySettings) {
        settings.seed_enabled = false;
        let stores = build_memory_inventory(&settings).expect("stores build");
        assert!(stores.products.get_all().await.expect("list").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn seed_file_overrides_bundled_seed(mut settings: InventorySettings) {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(br#"{ "categories": [{ "id": 3, "name": "Paint" }] }"#)
            .expect("write seed");
        settings.seed_path = Some(file.path().to_path_buf());

        let stores = build_memory_inventory(&settings).expect("stores build");

        assert!(stores.products.get_all().await.expect("list").is_empty());
        let categories = stores.categories.get_all().await.expect("list");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Paint");
    }

    #[rstest]
    fn missing_seed_file_reports_path(mut settings: InventorySettings) {
        settings.seed_path = Some(PathBuf::from("./definitely-missing-seed.json"));
        let Err(error) = build_memory_inventory(&settings) else {
            panic!("missing file should fail");
        };
        assert!(matches!(error, SeedLoadError::SeedRead { .. }));
        assert!(error.to_string().contains("definitely-missing-seed.json"));
    }

    #[rstest]
    fn malformed_seed_file_is_a_parse_error(mut settings: InventorySettings) {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"{ not json").expect("write seed");
        settings.seed_path = Some(file.path().to_path_buf());

        let Err(error) = build_memory_inventory(&settings) else {
            panic!("malformed file should fail");
        };
        assert!(matches!(error, SeedLoadError::Parse(_)));
    }
}
