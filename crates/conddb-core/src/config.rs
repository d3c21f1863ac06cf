use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::content::{DirectoryPolicy, JsonDirectories, ListDirectories, RejectDirectories};
use crate::error::{CondDbError, CondDbResult};

/// How a connection answers queries that land on a directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryMode {
    #[default]
    Reject,
    List,
    Json,
}

impl DirectoryMode {
    pub fn policy(&self) -> Box<dyn DirectoryPolicy> {
        match self {
            Self::Reject => Box::new(RejectDirectories),
            Self::List => Box::new(ListDirectories),
            Self::Json => Box::new(JsonDirectories),
        }
    }
}

/// Settings for opening a [`Connection`](crate::Connection).
///
/// ```toml
/// repository = "/data/conditions.git"
/// default_tag = "v1.0.0"
/// directory_policy = "json"
/// log_level = "debug"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub repository: PathBuf,
    pub default_tag: Option<String>,
    pub directory_policy: DirectoryMode,
    /// Tracing filter directive, e.g. `info` or `conddb_core=debug`.
    pub log_level: Option<String>,
}

impl ConnectionConfig {
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self {
            repository: repository.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> CondDbResult<Self> {
        toml::from_str(text).map_err(|e| CondDbError::Usage(format!("invalid configuration: {e}")))
    }

    pub fn load(path: &Path) -> CondDbResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CondDbError::Usage(format!("cannot read configuration {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ConnectionConfig::default();
        assert_eq!(c.repository, PathBuf::new());
        assert!(c.default_tag.is_none());
        assert_eq!(c.directory_policy, DirectoryMode::Reject);
        assert!(c.log_level.is_none());
    }

    #[test]
    fn parses_full_file() {
        let c = ConnectionConfig::from_toml_str(
            r#"
            repository = "/data/conditions.git"
            default_tag = "v1.0.0"
            directory_policy = "json"
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(c.repository, PathBuf::from("/data/conditions.git"));
        assert_eq!(c.default_tag.as_deref(), Some("v1.0.0"));
        assert_eq!(c.directory_policy, DirectoryMode::Json);
        assert_eq!(c.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn missing_keys_take_defaults() {
        let c = ConnectionConfig::from_toml_str(r#"repository = "repo""#).unwrap();
        assert_eq!(c, ConnectionConfig::new("repo"));
    }

    #[test]
    fn unknown_policy_is_a_usage_error() {
        let err = ConnectionConfig::from_toml_str(r#"directory_policy = "explode""#).unwrap_err();
        assert!(matches!(err, CondDbError::Usage(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conddb.toml");
        std::fs::write(&path, "default_tag = \"main\"\ndirectory_policy = \"list\"\n").unwrap();
        let c = ConnectionConfig::load(&path).unwrap();
        assert_eq!(c.default_tag.as_deref(), Some("main"));
        assert_eq!(c.directory_policy, DirectoryMode::List);

        assert!(matches!(
            ConnectionConfig::load(&dir.path().join("missing.toml")),
            Err(CondDbError::Usage(_))
        ));
    }

    #[test]
    fn round_trips_through_toml() {
        let mut c = ConnectionConfig::new("/repo");
        c.default_tag = Some("calib".into());
        c.directory_policy = DirectoryMode::List;
        let text = toml::to_string(&c).unwrap();
        assert_eq!(ConnectionConfig::from_toml_str(&text).unwrap(), c);
    }
}
