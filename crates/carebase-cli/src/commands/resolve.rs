//! Resolves the combined permissions of a set of roles.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use carebase_acl::{RoleAssignment, RoleSlug, SessionUser};
use serde_json::json;

use super::App;
use crate::style::colors::SemanticStyle;
use crate::style::{print_labeled, print_warn};

pub fn run(app: &App, roles: &[RoleSlug], session: Option<&Path>, json: bool) -> Result<ExitCode> {
    let mut assignments: Vec<RoleAssignment> =
        roles.iter().copied().map(RoleAssignment::from).collect();

    let mut user_id = None;
    if let Some(path) = session {
        let payload = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file {}", path.display()))?;
        let user = SessionUser::from_json(&payload)
            .with_context(|| format!("Failed to parse session file {}", path.display()))?;
        assignments.extend(user.assignments());
        user_id = user.id;
    }

    let permissions = app.resolver.resolve(&assignments);

    if json {
        let output = json!({
            "user": user_id,
            "roles": assignments.iter().map(|a| a.slug).collect::<Vec<_>>(),
            "permissions": permissions,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    if assignments.is_empty() {
        print_warn("No roles given; the empty role list grants nothing.");
    }

    let names = assignments
        .iter()
        .map(|a| a.slug.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if let Some(id) = &user_id {
        print_labeled("User", &id.to_string());
    }
    print_labeled("Roles", &names);
    print_labeled("Permissions", &permissions.len().to_string());
    let high_risk = if permissions.has_high_risk_permission() {
        "yes"
    } else {
        "no"
    };
    print_labeled("High risk", high_risk);

    // Grouped by feature area; sets iterate in declaration order.
    let mut area = None;
    for permission in permissions.iter() {
        if area != Some(permission.namespace()) {
            area = Some(permission.namespace());
            println!();
            println!("{}", permission.namespace().header());
        }
        if permission.is_high_risk() {
            println!("  {} {}", permission, "(high risk)".warning());
        } else {
            println!("  {permission}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
