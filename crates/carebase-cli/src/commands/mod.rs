//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use carebase_acl::{PermissionResolver, consistency};
use carebase_config::{CarebaseConfig, ConfigLoader};
use tracing_subscriber::EnvFilter;

pub mod access;
pub mod check;
pub mod config;
pub mod resolve;
pub mod roles;
pub mod routes;
pub mod version;

/// Loaded configuration and the resolver built from it.
pub struct App {
    pub loader: ConfigLoader,
    pub config: CarebaseConfig,
    pub resolver: PermissionResolver,
}

impl App {
    /// Loads configuration, starts logging and runs the startup check.
    pub fn load(project: &Path) -> Result<Self> {
        let app = Self::load_without_startup_check(project)?;

        if app.config.acl.consistency_check {
            consistency::check(app.resolver.table(), app.resolver.routes()).log();
        }

        Ok(app)
    }

    /// Loads configuration and starts logging.
    pub fn load_without_startup_check(project: &Path) -> Result<Self> {
        let loader = ConfigLoader::new().with_project_dir(project);
        let config = loader
            .load()
            .with_context(|| format!("Failed to load configuration from {}", project.display()))?;

        init_logging(&config.logging.level);

        let resolver = config.resolver();
        tracing::debug!(
            project = %config.project.name,
            routes = resolver.routes().len(),
            "Resolver ready"
        );

        Ok(Self {
            loader,
            config,
            resolver,
        })
    }
}

/// `RUST_LOG` wins over `[logging] level`. Logs go to stderr so stdout stays parseable.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
