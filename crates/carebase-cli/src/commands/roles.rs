//! Lists the permission table.

use std::process::ExitCode;

use anyhow::Result;

use super::App;
use crate::style::{print_table, styled_table};

pub fn run(app: &App) -> Result<ExitCode> {
    let table = app.resolver.table();
    let mut out = styled_table(&["Role", "Name", "Kind", "Permissions"]);

    for (role, permissions) in table.iter() {
        let kind = if role.is_portal() { "portal" } else { "staff" };
        let granted = permissions
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        out.add_row(vec![
            role.as_str(),
            role.display_name(),
            kind,
            granted.as_str(),
        ]);
    }

    print_table(&out, table.len(), "role");
    Ok(ExitCode::SUCCESS)
}
