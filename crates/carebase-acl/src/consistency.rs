//! Development-time table consistency check.
//!
//! Misconfiguration only ever reduces access, so nothing here fails hard:
//! the check returns a report and the caller decides what to do with it.

use std::fmt::{self, Display};

use tracing::{info, warn};

use crate::permissions::Permission;
use crate::roles::RoleSlug;
use crate::routes::RouteTable;
use crate::table::PermissionTable;

/// A single problem found by [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// A known role has no table entry and therefore grants nothing.
    MissingRole(RoleSlug),

    /// A route requires a permission no role grants, so nobody can open it.
    UnreachableRoute { route: String, permission: Permission },
}

impl Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyIssue::MissingRole(role) => {
                write!(f, "role '{role}' has no permission table entry")
            }
            ConsistencyIssue::UnreachableRoute { route, permission } => {
                write!(f, "route '{route}' requires '{permission}', which no role grants")
            }
        }
    }
}

/// Outcome of a consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsistencyReport {
    issues: Vec<ConsistencyIssue>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ConsistencyIssue] {
        &self.issues
    }

    /// Emits one `warn` event per issue.
    pub fn log(&self) {
        if self.is_clean() {
            info!("Access tables are consistent");
            return;
        }
        for issue in &self.issues {
            warn!(issue = %issue, "Access table inconsistency");
        }
    }
}

/// Checks the tables against the closed role enumeration and each other.
pub fn check(table: &PermissionTable, routes: &RouteTable) -> ConsistencyReport {
    let mut issues: Vec<ConsistencyIssue> = RoleSlug::ALL
        .iter()
        .copied()
        .filter(|role| !table.contains_role(*role))
        .map(ConsistencyIssue::MissingRole)
        .collect();

    issues.extend(
        routes
            .iter()
            .filter(|(_, permission)| !table.granted_anywhere(*permission))
            .map(|(route, permission)| ConsistencyIssue::UnreachableRoute {
                route: route.to_string(),
                permission,
            }),
    );

    ConsistencyReport { issues }
}
