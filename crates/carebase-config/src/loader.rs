//! Configuration loader with multi-source merging

use crate::CarebaseConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Git-tracked deployment config, relative to the project directory.
pub const PROJECT_CONFIG_FILE: &str = "carebase.toml";

/// Gitignored developer overrides, relative to the project directory.
pub const LOCAL_CONFIG_FILE: &str = "carebase.local.toml";

/// A file layer of the merged configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// ~/.config/carebase/config.toml
    User,
    /// carebase.toml
    Project,
    /// carebase.local.toml
    Local,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigSource::User => "user",
            ConfigSource::Project => "project",
            ConfigSource::Local => "local",
        })
    }
}

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    include_user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "CAREBASE".to_string(),
            include_user_config: true,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "CAREBASE")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Skip ~/.config/carebase/config.toml (hermetic loads, tests)
    pub fn without_user_config(mut self) -> Self {
        self.include_user_config = false;
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn project_config_file(&self) -> PathBuf {
        self.project_dir.join(PROJECT_CONFIG_FILE)
    }

    pub fn local_config_file(&self) -> PathBuf {
        self.project_dir.join(LOCAL_CONFIG_FILE)
    }

    /// Per-user defaults, when enabled and the platform has a config dir.
    fn user_config_file(&self) -> Option<PathBuf> {
        if !self.include_user_config {
            return None;
        }
        ProjectDirs::from("org", "Carebase", "carebase")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Config files that exist, lowest precedence first.
    pub fn sources(&self) -> Vec<(ConfigSource, PathBuf)> {
        [
            (ConfigSource::User, self.user_config_file()),
            (ConfigSource::Project, Some(self.project_config_file())),
            (ConfigSource::Local, Some(self.local_config_file())),
        ]
        .into_iter()
        .filter_map(|(source, path)| path.filter(|p| p.exists()).map(|p| (source, p)))
        .collect()
    }

    /// Load configuration from all sources with proper precedence
    ///
    /// Defaults, then [`sources`](Self::sources), then environment variables
    /// (`CAREBASE_ACL__AUDIT=false`, `CAREBASE_LOGGING__LEVEL=debug`).
    pub fn load(&self) -> Result<CarebaseConfig> {
        let defaults = CarebaseConfig::default();
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&defaults)?);

        for (source, path) in self.sources() {
            tracing::debug!(%source, path = %path.display(), "Reading config file");
            builder = builder.add_source(
                config::File::from(path)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Double underscore nests, so single underscores stay inside keys.
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let carebase_config: CarebaseConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        carebase_config
            .validate()
            .context("Configuration failed validation")?;

        Ok(carebase_config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default(&self) -> CarebaseConfig {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carebase_acl::Permission;
    use std::fs;
    use tempfile::tempdir;

    fn loader(dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(dir)
            .with_env_prefix("CAREBASE_TEST_UNSET")
            .without_user_config()
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path()).load().expect("Failed to load config");

        assert_eq!(config, CarebaseConfig::default());
    }

    #[test]
    fn test_load_project_config() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let config_content = r#"
[project]
name = "st-mary"

[acl]
audit = false

[[acl.routes]]
path = "/dashboard/wards"
permission = "departments"

[logging]
level = "debug"
"#;
        fs::write(project_dir.join("carebase.toml"), config_content)
            .expect("Failed to write config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert_eq!(config.project.name, "st-mary");
        assert!(!config.acl.audit);
        assert!(config.acl.consistency_check);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.acl.routes.len(), 1);
        assert_eq!(config.acl.routes[0].permission, Permission::Departments);
    }

    #[test]
    fn test_local_overrides() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("carebase.toml"),
            r#"
[logging]
level = "info"
"#,
        )
        .expect("Failed to write project config");

        fs::write(
            project_dir.join("carebase.local.toml"),
            r#"
[logging]
level = "trace"
"#,
        )
        .expect("Failed to write local config");

        let config = loader(project_dir).load().expect("Failed to load config");

        // Local config should override project config
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_unknown_permission_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("carebase.toml"),
            r#"
[[acl.routes]]
path = "/dashboard/wards"
permission = "wards.manage"
"#,
        )
        .expect("Failed to write config");

        assert!(loader(project_dir).load().is_err());
        assert_eq!(
            loader(project_dir).load_or_default(),
            CarebaseConfig::default()
        );
    }

    #[test]
    fn test_invalid_level_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("carebase.toml"),
            "[logging]\nlevel = \"loud\"\n",
        )
        .expect("Failed to write config");

        let err = loader(project_dir).load().unwrap_err();
        assert!(format!("{err:#}").contains("logging.level"));
    }

    #[test]
    fn test_load_file_errors() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("missing.toml");

        assert!(matches!(
            CarebaseConfig::load_file(&missing),
            Err(crate::ConfigError::ReadError { .. })
        ));

        let broken = temp_dir.path().join("broken.toml");
        fs::write(&broken, "[acl\naudit = ").expect("Failed to write config");
        assert!(matches!(
            CarebaseConfig::load_file(&broken),
            Err(crate::ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_sources_in_precedence_order() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();
        let loader = loader(project_dir);

        assert!(loader.sources().is_empty());
        assert_eq!(loader.project_dir(), project_dir);
        assert_eq!(loader.project_config_file(), project_dir.join("carebase.toml"));
        assert_eq!(loader.local_config_file(), project_dir.join("carebase.local.toml"));

        fs::write(loader.local_config_file(), "[logging]\nlevel = \"debug\"\n")
            .expect("Failed to write local config");
        assert_eq!(
            loader.sources(),
            vec![(ConfigSource::Local, loader.local_config_file())]
        );

        fs::write(loader.project_config_file(), "[project]\nname = \"st-mary\"\n")
            .expect("Failed to write project config");
        let sources: Vec<ConfigSource> = loader.sources().into_iter().map(|(s, _)| s).collect();
        assert_eq!(sources, vec![ConfigSource::Project, ConfigSource::Local]);
    }
}
