//! Carebase access-control CLI.
//!
//! Inspects the permission and route tables the clinic dashboard uses to
//! decide what each role may see.
//!
//! # Quick Start
//!
//! ```bash
//! # What can a nurse who also works the front desk do?
//! carebase resolve --role nurse --role receptionist
//!
//! # May a doctor open patient registration?
//! carebase access --role doctor /dashboard/patients/register
//!
//! # Check the tables (and any carebase.toml route overrides)
//! carebase check
//! ```

mod commands;
mod style;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use carebase_acl::RoleSlug;
use clap::{Parser, Subcommand};

use commands::App;

/// Carebase - role-based access control for the clinic dashboard.
#[derive(Parser)]
#[command(name = "carebase")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory containing carebase.toml.
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// List every role and the permissions it grants.
    Roles,

    /// Show the combined permissions of one or more roles.
    Resolve {
        /// Role slug (repeatable).
        #[arg(short, long = "role")]
        roles: Vec<RoleSlug>,

        /// JSON user record whose `roles` are added to --role.
        #[arg(short, long)]
        session: Option<PathBuf>,

        /// Print the permission set as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check whether the given roles may open a route (exit 1 on deny).
    Access {
        /// Role slug (repeatable).
        #[arg(short, long = "role")]
        roles: Vec<RoleSlug>,

        /// Route path, e.g. /dashboard/patients/register.
        route: String,
    },

    /// List gated routes, optionally with a verdict for the given roles.
    Routes {
        /// Role slug (repeatable).
        #[arg(short, long = "role")]
        roles: Vec<RoleSlug>,
    },

    /// Run the table consistency check (exit 1 on issues).
    Check,

    /// Configuration management.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Output format (text, json, toml).
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate configuration files.
    Validate,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.no_color {
        style::set_no_color(true);
    }

    let project = cli.project;

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Roles => commands::roles::run(&App::load(&project)?),
        Commands::Resolve {
            roles,
            session,
            json,
        } => commands::resolve::run(&App::load(&project)?, &roles, session.as_deref(), json),
        Commands::Access { roles, route } => {
            commands::access::run(&App::load(&project)?, &roles, &route)
        }
        Commands::Routes { roles } => commands::routes::run(&App::load(&project)?, &roles),
        Commands::Check => commands::check::run(&App::load_without_startup_check(&project)?),
        Commands::Config { command } => match command {
            ConfigCommands::Show { format } => {
                commands::config::show(&App::load(&project)?, &format)
            }
            ConfigCommands::Validate => {
                commands::config::validate(&App::load_without_startup_check(&project)?)
            }
        },
    }
}
