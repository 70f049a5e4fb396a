//! Lists the gated routes.

use std::process::ExitCode;

use anyhow::Result;
use carebase_acl::{RoleAssignment, RoleSlug, RouteGuard};
use comfy_table::Cell;

use super::App;
use crate::style::{print_table, styled_table, verdict_cell};

pub fn run(app: &App, roles: &[RoleSlug]) -> Result<ExitCode> {
    let routes = app.resolver.routes();

    if roles.is_empty() {
        let mut out = styled_table(&["Route", "Requires"]);
        for (path, permission) in routes.iter() {
            out.add_row(vec![path, permission.as_str()]);
        }
        print_table(&out, routes.len(), "route");
        return Ok(ExitCode::SUCCESS);
    }

    let assignments: Vec<RoleAssignment> =
        roles.iter().copied().map(RoleAssignment::from).collect();
    let guard = RouteGuard::for_roles(app.resolver.clone(), &assignments).without_audit();

    let mut out = styled_table(&["Route", "Requires", "Verdict"]);
    for (path, permission) in routes.iter() {
        out.add_row(vec![
            Cell::new(path),
            Cell::new(permission),
            verdict_cell(guard.can_access(path)),
        ]);
    }
    print_table(&out, routes.len(), "route");

    Ok(ExitCode::SUCCESS)
}
