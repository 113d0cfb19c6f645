//! Reference data loaded from JSON files on disk.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use delta_fortune::{ContainerCatalog, DataLoader, MapCatalog, OperatorRoster, SkinDrawConfig};
use log::debug;
use thiserror::Error;

pub const OPERATORS_FILE: &str = "operators_data.json";
pub const MAPS_FILE: &str = "enhanced_map_zones.json";
pub const CONTAINERS_FILE: &str = "containers_data.json";
pub const DRAW_CONFIG_FILE: &str = "skin_draw.json";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads the three reference documents, plus an optional draw table, from a
/// directory.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl Default for FsLoader {
    fn default() -> Self {
        Self::new(Self::default_root())
    }
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace `static/assets/data` directory.
    pub fn default_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("static")
            .join("assets")
            .join("data")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, file: &str) -> Result<(PathBuf, String), AssetError> {
        let path = self.root.join(file);
        debug!("reading {}", path.display());
        match fs::read_to_string(&path) {
            Ok(json) => Ok((path, json)),
            Err(source) => Err(AssetError::Io { path, source }),
        }
    }

    fn parse<T>(
        &self,
        file: &str,
        parse: impl FnOnce(&str) -> Result<T, serde_json::Error>,
    ) -> Result<T, AssetError> {
        let (path, json) = self.read(file)?;
        parse(&json).map_err(|source| AssetError::Parse { path, source })
    }
}

impl DataLoader for FsLoader {
    type Error = AssetError;

    fn load_operators(&self) -> Result<OperatorRoster, Self::Error> {
        self.parse(OPERATORS_FILE, OperatorRoster::from_json)
    }

    fn load_maps(&self) -> Result<MapCatalog, Self::Error> {
        self.parse(MAPS_FILE, MapCatalog::from_json)
    }

    fn load_containers(&self) -> Result<ContainerCatalog, Self::Error> {
        self.parse(CONTAINERS_FILE, ContainerCatalog::from_json)
    }

    fn load_draw_config(&self) -> Result<Option<SkinDrawConfig>, Self::Error> {
        if !self.root.join(DRAW_CONFIG_FILE).is_file() {
            return Ok(None);
        }
        self.parse(DRAW_CONFIG_FILE, |json| serde_json::from_str(json))
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "delta-fortune-assets-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_root_loads_bundled_files() {
        let loader = FsLoader::default();
        assert!(!loader.load_operators().unwrap().operators.is_empty());
        assert_eq!(loader.load_maps().unwrap().maps.len(), 4);
        assert_eq!(loader.load_containers().unwrap().containers.len(), 10);
        assert!(loader.load_draw_config().unwrap().is_none());
    }

    #[test]
    fn missing_and_malformed_files_name_the_path() {
        let dir = temp_dir("broken");
        fs::write(dir.join(OPERATORS_FILE), "{ not json").unwrap();
        let loader = FsLoader::new(&dir);

        let err = loader.load_operators().unwrap_err();
        assert!(matches!(err, AssetError::Parse { .. }));
        assert!(err.to_string().contains(OPERATORS_FILE));

        let err = loader.load_maps().unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains(MAPS_FILE));
    }

    #[test]
    fn draw_override_is_picked_up() {
        let dir = temp_dir("draw");
        let mut draw = SkinDrawConfig::default();
        draw.character.base_red_probability = 0.2;
        fs::write(
            dir.join(DRAW_CONFIG_FILE),
            serde_json::to_string(&draw).unwrap(),
        )
        .unwrap();
        let loaded = FsLoader::new(&dir).load_draw_config().unwrap().unwrap();
        assert!((loaded.character.base_red_probability - 0.2).abs() < f64::EPSILON);
    }
}
