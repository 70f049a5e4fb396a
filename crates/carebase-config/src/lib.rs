//! Configuration management for Carebase
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (CAREBASE_* prefix, highest precedence)
//! 2. carebase.local.toml (gitignored, local overrides)
//! 3. carebase.toml (git-tracked, deployment config)
//! 4. ~/.config/carebase/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)

use std::fs;
use std::path::Path;
use std::sync::Arc;

use carebase_acl::{PermissionResolver, PermissionTable, RouteRule, RouteTable};
use serde::{Deserialize, Serialize};

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::{ConfigLoader, ConfigSource, LOCAL_CONFIG_FILE, PROJECT_CONFIG_FILE};

/// Log levels accepted by `[logging] level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main Carebase configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarebaseConfig {
    pub project: ProjectConfig,
    pub acl: AclConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "carebase".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Log access decisions made by route guards.
    pub audit: bool,

    /// Run the table consistency check at startup.
    pub consistency_check: bool,

    /// Route requirements added to (or replacing) the built-in route table.
    pub routes: Vec<RouteRule>,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            audit: true,
            consistency_check: true,
            routes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CarebaseConfig {
    /// Parse a single TOML file, without layering.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Create a development configuration
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
            ..Default::default()
        }
    }

    /// Create a production configuration
    pub fn production() -> Self {
        Self {
            acl: AclConfig {
                consistency_check: false,
                ..Default::default()
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
            ..Default::default()
        }
    }

    /// Checks values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {LOG_LEVELS:?}, got {:?}",
                self.logging.level
            )));
        }

        for rule in &self.acl.routes {
            if !rule.path.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "acl.routes path {:?} must start with '/'",
                    rule.path
                )));
            }
        }

        Ok(())
    }

    /// Built-in route table overlaid with `[[acl.routes]]`.
    pub fn route_table(&self) -> RouteTable {
        RouteTable::standard().with_rules(&self.acl.routes)
    }

    /// Resolver over the built-in permission table and the effective routes.
    pub fn resolver(&self) -> PermissionResolver {
        PermissionResolver::new(
            Arc::new(PermissionTable::standard()),
            Arc::new(self.route_table()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carebase_acl::Permission;

    #[test]
    fn test_default_config() {
        let config = CarebaseConfig::default();
        assert_eq!(config.project.name, "carebase");
        assert!(config.acl.audit);
        assert!(config.acl.consistency_check);
        assert!(config.acl.routes.is_empty());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_development_config() {
        let config = CarebaseConfig::development();
        assert_eq!(config.logging.level, "debug");
        assert!(config.acl.consistency_check);
    }

    #[test]
    fn test_production_config() {
        let config = CarebaseConfig::production();
        assert_eq!(config.logging.level, "warn");
        assert!(!config.acl.consistency_check);
        assert!(config.acl.audit);
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let mut config = CarebaseConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_relative_route() {
        let mut config = CarebaseConfig::default();
        config
            .acl
            .routes
            .push(RouteRule::new("dashboard/wards", Permission::Departments));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_route_table_overlay() {
        let mut config = CarebaseConfig::default();
        config
            .acl
            .routes
            .push(RouteRule::new("/dashboard/wards", Permission::Departments));

        let routes = config.route_table();
        assert_eq!(
            routes.required_permission("/dashboard/wards"),
            Some(Permission::Departments)
        );
        assert_eq!(
            routes.required_permission("/dashboard/staff/register"),
            Some(Permission::StaffRegister)
        );

        let resolver = config.resolver();
        let nobody = carebase_acl::PermissionSet::empty();
        assert!(!resolver.can_access_route(&nobody, "/dashboard/wards"));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = CarebaseConfig::development();
        config
            .acl
            .routes
            .push(RouteRule::new("/dashboard/wards", Permission::Departments));

        let text = toml::to_string_pretty(&config).unwrap();
        let back: CarebaseConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
