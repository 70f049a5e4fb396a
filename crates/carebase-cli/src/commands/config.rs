//! Configuration management commands.

use std::process::ExitCode;

use anyhow::{Result, bail};
use carebase_config::{ConfigSource, PROJECT_CONFIG_FILE};

use super::App;
use crate::style::colors::SemanticStyle;
use crate::style::{print_labeled, print_success, print_warn};

/// Show the effective configuration.
pub fn show(app: &App, format: &str) -> Result<ExitCode> {
    let config = &app.config;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(config)?),
        "toml" => println!("{}", toml::to_string_pretty(config)?),
        "text" => {
            println!("{}", "Carebase Configuration".header());
            println!();

            println!("Project:");
            print_labeled("Name", &config.project.name);
            println!();

            println!("Access control:");
            print_labeled("Audit", &config.acl.audit.to_string());
            print_labeled("Consistency check", &config.acl.consistency_check.to_string());
            print_labeled("Route overrides", &config.acl.routes.len().to_string());
            for rule in &config.acl.routes {
                println!("    {} -> {}", rule.path, rule.permission);
            }
            println!();

            println!("Logging:");
            print_labeled("Level", &config.logging.level);
        }
        other => bail!("Unknown format '{other}' (expected text, json or toml)"),
    }

    Ok(ExitCode::SUCCESS)
}

/// Validate configuration files.
///
/// Loading already validated the merged result; this reports what was read.
pub fn validate(app: &App) -> Result<ExitCode> {
    let sources = app.loader.sources();

    if !sources.iter().any(|(source, _)| *source == ConfigSource::Project) {
        print_warn(&format!(
            "No {PROJECT_CONFIG_FILE} in {}; using defaults",
            app.loader.project_dir().display()
        ));
    }
    for (source, path) in &sources {
        print_labeled(&format!("{source} config"), &path.display().to_string());
    }

    print_success("Configuration is valid");
    Ok(ExitCode::SUCCESS)
}
