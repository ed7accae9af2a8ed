//! Device registry.

use std::path::{Path, PathBuf};

use intelliclima_types::{Device, House};
use tracing::info;

use crate::error::Result;
use crate::{default_data_dir, read_json, write_json};

/// File name of the registry inside the data directory.
pub const HOUSES_FILE: &str = "houses.json";

/// `houses.json`: houses and their devices, as last discovered.
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
}

impl Registry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Registry in `dir/houses.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(HOUSES_FILE))
    }

    pub fn open_default() -> Self {
        Self::in_dir(default_data_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved houses. Empty if the registry was never written.
    pub fn load(&self) -> Result<Vec<House>> {
        Ok(read_json::<Vec<House>>(&self.path)?.unwrap_or_default())
    }

    pub fn save(&self, houses: &[House]) -> Result<()> {
        write_json(&self.path, houses)?;
        info!(
            "Saved {} houses with {} devices to {}",
            houses.len(),
            houses.iter().map(|h| h.devices.len()).sum::<usize>(),
            self.path.display()
        );
        Ok(())
    }

    /// All saved devices, in registry order.
    pub fn devices(&self) -> Result<Vec<Device>> {
        Ok(self
            .load()?
            .into_iter()
            .flat_map(|house| house.devices)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn houses() -> Vec<House> {
        vec![
            House::new(
                1201,
                "Casa Mare",
                vec![
                    Device::new(31377, true, "ECO", 1201)
                        .with_serial("31377ABC")
                        .with_name("Sala"),
                    Device::new(31378, false, "ECO", 1201),
                ],
            ),
            House::new(1300, "Unknown", vec![]),
        ]
    }

    #[test]
    fn test_load_without_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Registry::in_dir(dir.path()).load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_keeps_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::in_dir(dir.path());

        registry.save(&houses()).unwrap();

        let loaded = registry.load().unwrap();
        assert_eq!(loaded, houses());
        assert_eq!(loaded[0].devices[1].serial, None);
        assert_eq!(registry.devices().unwrap().len(), 2);
    }

    #[test]
    fn test_file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::in_dir(dir.path());
        registry.save(&houses()).unwrap();

        let text = fs::read_to_string(registry.path()).unwrap();
        assert!(text.contains('\n'));
        assert!(text.contains("\"type\": \"ECO\""));
    }

    #[test]
    fn test_missing_and_empty_fields_load_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::in_dir(dir.path());
        fs::write(
            registry.path(),
            r#"[{"id": 1, "name": "Casa", "devices": [
                {"id": 10, "is_master": true, "type": "ECO", "house_id": 1},
                {"id": 11, "is_master": false, "type": "ECO", "house_id": 1, "serial": "", "name": ""}
            ]}]"#,
        )
        .unwrap();

        let devices = registry.devices().unwrap();
        assert_eq!(devices.len(), 2);
        assert!(devices.iter().all(|d| d.serial.is_none() && d.name.is_none()));
    }
}
