///! Gpredict module writer

use crate::module::sat::{unique_ids, NoradId};
use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Ground station file referenced by generated modules
pub const DEFAULT_QTH: &str = "Home.qth";

/// Gpredict's module directory under the user configuration directory
/// (`$XDG_CONFIG_HOME/Gpredict/modules` on Linux)
pub fn default_module_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("Gpredict").join("modules"))
}

/// A named list of satellites for Gpredict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpredictModule {
    pub name: String,
    /// Unique NORAD IDs, in insertion order
    pub satellites: Vec<NoradId>,
    pub qth_file: String,
}

impl GpredictModule {
    /// Create a module; duplicate IDs are dropped, keeping first-seen order
    pub fn new(name: impl Into<String>, satellites: impl IntoIterator<Item = NoradId>) -> Self {
        Self {
            name: name.into(),
            satellites: unique_ids(satellites.into_iter().map(Some)),
            qth_file: DEFAULT_QTH.to_string(),
        }
    }

    pub fn with_qth_file(mut self, qth_file: impl Into<String>) -> Self {
        self.qth_file = qth_file.into();
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}.mod", self.name)
    }

    /// Write `<dest_dir>/<name>.mod`, replacing any existing file
    ///
    /// The destination directory must already exist.
    pub async fn save(&self, dest_dir: &Path) -> Result<PathBuf> {
        let path = dest_dir.join(self.file_name());

        fs::write(&path, self.to_string())
            .await
            .context(format!("Failed to write module file: {:?}", path))?;

        tracing::info!(
            "Wrote module {} ({} satellites) to {}",
            self.name,
            self.satellites.len(),
            path.display()
        );

        Ok(path)
    }
}

impl fmt::Display for GpredictModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let satellites = self
            .satellites
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(";");

        write!(
            f,
            "[GLOBAL]\nSATELLITES={}\nQTHFILE={}\n",
            satellites, self.qth_file
        )
    }
}

/// Format and save a module with the default ground station file
pub async fn write_module(
    name: &str,
    dest_dir: &Path,
    satellites: impl IntoIterator<Item = NoradId>,
) -> Result<PathBuf> {
    GpredictModule::new(name, satellites).save(dest_dir).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let module = GpredictModule::new("AMSAT_All_Beacons", [25544, 7530]);
        assert_eq!(
            module.to_string(),
            "[GLOBAL]\nSATELLITES=25544;7530\nQTHFILE=Home.qth\n"
        );
    }

    #[test]
    fn test_format_deduplicates() {
        let module = GpredictModule::new("AMSAT_All_Digi", [25544, 25544, 7530]);
        assert!(module.to_string().contains("SATELLITES=25544;7530\n"));
    }

    #[test]
    fn test_format_empty() {
        let module = GpredictModule::new("AMSAT_All_Digi", []);
        assert_eq!(module.to_string(), "[GLOBAL]\nSATELLITES=\nQTHFILE=Home.qth\n");
    }

    #[test]
    fn test_custom_qth() {
        let module = GpredictModule::new("X", [1]).with_qth_file("Portable.qth");
        assert!(module.to_string().ends_with("QTHFILE=Portable.qth\n"));
    }

    #[tokio::test]
    async fn test_write_module_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_module("AMSAT_All_Repeaters", dir.path(), [43017, 7530])
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("AMSAT_All_Repeaters.mod"));
        let first = std::fs::read(&path).unwrap();

        write_module("AMSAT_All_Repeaters", dir.path(), [43017, 7530])
            .await
            .unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_write_module_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AMSAT_All_Beacons.mod");
        std::fs::write(&path, "[GLOBAL]\nSATELLITES=1;2;3;4;5;6;7;8;9\nQTHFILE=Old.qth\n").unwrap();

        write_module("AMSAT_All_Beacons", dir.path(), [7530]).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[GLOBAL]\nSATELLITES=7530\nQTHFILE=Home.qth\n"
        );
    }

    #[tokio::test]
    async fn test_write_module_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(write_module("X", &missing, [1]).await.is_err());
    }
}
