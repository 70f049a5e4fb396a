//! Checks a single route against a set of roles.

use std::process::ExitCode;

use anyhow::Result;
use carebase_acl::{RoleAssignment, RoleSlug, RouteGuard};

use super::App;
use crate::style::{print_error, print_labeled, print_success};

pub fn run(app: &App, roles: &[RoleSlug], route: &str) -> Result<ExitCode> {
    let assignments: Vec<RoleAssignment> =
        roles.iter().copied().map(RoleAssignment::from).collect();

    let mut guard = RouteGuard::for_roles(app.resolver.clone(), &assignments);
    if !app.config.acl.audit {
        guard = guard.without_audit();
    }

    let required = app.resolver.routes().required_permission(route);

    match guard.enforce_route(route) {
        Ok(()) => {
            print_success(&format!("allow {route}"));
            match required {
                Some(permission) => print_labeled("Requires", permission.as_str()),
                None => print_labeled("Requires", "nothing (unmapped route)"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            print_error(&format!("deny {route}"));
            print_labeled("Reason", &err.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}
