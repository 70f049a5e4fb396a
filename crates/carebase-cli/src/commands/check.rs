//! Runs the table consistency check.

use std::process::ExitCode;

use anyhow::Result;
use carebase_acl::consistency;

use super::App;
use crate::style::{print_error, print_success};

pub fn run(app: &App) -> Result<ExitCode> {
    let report = consistency::check(app.resolver.table(), app.resolver.routes());
    report.log();

    if report.is_clean() {
        print_success(&format!(
            "{} roles and {} routes are consistent",
            app.resolver.table().len(),
            app.resolver.routes().len()
        ));
        return Ok(ExitCode::SUCCESS);
    }

    for issue in report.issues() {
        print_error(&issue.to_string());
    }
    Ok(ExitCode::FAILURE)
}
