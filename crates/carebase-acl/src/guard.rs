//! Page guards and navigation filtering.
//!
//! Wraps a resolved permission set with fallible checks for callers that
//! want an error value, and logs every decision.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::permissions::{Permission, PermissionSet};
use crate::resolver::PermissionResolver;
use crate::session::RoleAssignment;

/// Error type for guard checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The route is gated by a permission the user does not hold.
    #[error("Access to route '{route}' denied: requires {required}")]
    RouteDenied { route: String, required: Permission },

    /// The user does not hold a required permission.
    #[error("Missing permission: {required}")]
    MissingPermission { required: Permission },
}

/// Result type for guard checks.
pub type Result<T> = std::result::Result<T, AccessError>;

/// Access guard for one user's permission set.
pub struct RouteGuard {
    resolver: PermissionResolver,
    permissions: Arc<PermissionSet>,

    /// Whether to log access decisions.
    audit_enabled: bool,
}

impl RouteGuard {
    /// Creates a guard over an already resolved permission set.
    pub fn new(resolver: PermissionResolver, permissions: impl Into<Arc<PermissionSet>>) -> Self {
        Self {
            resolver,
            permissions: permissions.into(),
            audit_enabled: true,
        }
    }

    /// Creates a guard for the given role assignments.
    pub fn for_roles(resolver: PermissionResolver, roles: &[RoleAssignment]) -> Self {
        let permissions = resolver.resolve(roles);
        Self::new(resolver, permissions)
    }

    /// Disables decision logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns whether the user may open `route`.
    pub fn can_access(&self, route: &str) -> bool {
        self.resolver.can_access_route(&self.permissions, route)
    }

    /// Checks that the user may open `route`.
    ///
    /// **Audit:** grants are logged at `info`, denials at `warn`.
    pub fn enforce_route(&self, route: &str) -> Result<()> {
        let Some(required) = self.resolver.routes().required_permission(route) else {
            return Ok(());
        };

        let allowed = self.permissions.has(required);

        if self.audit_enabled {
            if allowed {
                info!(
                    route = %route,
                    permission = %required,
                    high_risk = required.is_high_risk(),
                    "Route access granted"
                );
            } else {
                warn!(route = %route, permission = %required, "Route access denied");
            }
        }

        if allowed {
            Ok(())
        } else {
            Err(AccessError::RouteDenied {
                route: route.to_string(),
                required,
            })
        }
    }

    /// Checks that the user holds `required`.
    pub fn enforce_permission(&self, required: Permission) -> Result<()> {
        if self.permissions.has(required) {
            return Ok(());
        }

        if self.audit_enabled {
            warn!(permission = %required, "Permission check failed");
        }

        Err(AccessError::MissingPermission { required })
    }

    /// Keeps the routes the user may open, preserving order.
    ///
    /// **Audit:** logs hidden routes (if any).
    pub fn filter_routes(&self, routes: &[String]) -> Vec<String> {
        let (visible, hidden): (Vec<&String>, Vec<&String>) =
            routes.iter().partition(|route| self.can_access(route));

        if self.audit_enabled && !hidden.is_empty() {
            info!(hidden_routes = ?hidden, "Navigation entries hidden by permissions");
        }

        visible.into_iter().cloned().collect()
    }

    /// Returns every gated route the user may open, in path order.
    pub fn accessible_routes(&self) -> Vec<&str> {
        self.resolver
            .routes()
            .iter()
            .filter(|(_, required)| self.permissions.has(*required))
            .map(|(path, _)| path)
            .collect()
    }
}
