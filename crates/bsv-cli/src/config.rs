use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use bsv_service::ServiceConfig;
use bsv_store::FsStoreConfig;

/// Contents of the `--config` TOML file.
///
/// ```toml
/// [service]
/// verify_on_put = true
/// fetch_timeout_ms = 2000
///
/// [store]
/// sync_on_write = false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub service: ServiceConfig,
    pub store: FsStoreConfig,
}

impl CliConfig {
    /// Load from `path`, or fall back to defaults when no file was given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_is_default() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn load_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bsv.toml");
        std::fs::write(
            &path,
            "[service]\nverify_on_put = true\nannounce_timeout_ms = 50\n\n[store]\nsync_on_write = false\n",
        )
        .unwrap();

        let cfg = CliConfig::load(Some(&path)).unwrap();
        assert!(cfg.service.verify_on_put);
        assert!(cfg.service.verify_fetched);
        assert_eq!(cfg.service.announce_timeout_ms, Some(50));
        assert!(!cfg.store.sync_on_write);
        assert!(!cfg.store.read_only);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[service\n").unwrap();
        assert!(CliConfig::load(Some(&path)).is_err());
    }
}
