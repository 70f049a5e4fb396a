//! Permission resolution.
//!
//! Computes a user's effective permissions as the union of the grants of
//! every assigned role, and answers route questions against the injected
//! route table. Every operation is pure and total.

use std::sync::Arc;

use tracing::debug;

use crate::permissions::{Permission, PermissionSet};
use crate::roles::RoleSlug;
use crate::routes::RouteTable;
use crate::session::{RoleAssignment, SessionUser};
use crate::table::PermissionTable;

/// Resolves role assignments into permission sets.
///
/// Cloning is cheap: both tables are shared.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    table: Arc<PermissionTable>,
    routes: Arc<RouteTable>,
}

impl PermissionResolver {
    /// Creates a resolver over the given tables.
    pub fn new(table: Arc<PermissionTable>, routes: Arc<RouteTable>) -> Self {
        Self { table, routes }
    }

    /// Creates a resolver over the built-in tables.
    pub fn standard() -> Self {
        Self::new(
            Arc::new(PermissionTable::standard()),
            Arc::new(RouteTable::standard()),
        )
    }

    /// Returns the union of the permissions granted by `roles`.
    ///
    /// No roles means no permissions.
    ///
    /// # Examples
    ///
    /// ```
    /// use carebase_acl::{Permission, PermissionResolver, RoleAssignment, RoleSlug};
    ///
    /// let resolver = PermissionResolver::standard();
    /// let permissions = resolver.resolve(&[RoleAssignment::new(RoleSlug::Patient)]);
    ///
    /// assert!(permissions.has(Permission::Dashboard));
    /// assert!(permissions.has(Permission::Settings));
    /// assert_eq!(permissions.len(), 2);
    /// ```
    pub fn resolve(&self, roles: &[RoleAssignment]) -> PermissionSet {
        self.resolve_roles(roles.iter().map(|r| r.slug))
    }

    /// Same as [`resolve`](Self::resolve) for bare role slugs.
    pub fn resolve_roles(&self, roles: impl IntoIterator<Item = RoleSlug>) -> PermissionSet {
        let mut permissions = PermissionSet::empty();
        for role in roles {
            permissions.extend_from(self.table.lookup(role));
        }
        debug!(granted = permissions.len(), "Resolved permissions");
        permissions
    }

    /// Resolves raw slugs. Slugs outside the known set contribute nothing.
    pub fn resolve_slugs<'a>(&self, slugs: impl IntoIterator<Item = &'a str>) -> PermissionSet {
        let mut permissions = PermissionSet::empty();
        for slug in slugs {
            permissions.extend_from(self.table.lookup_slug(slug));
        }
        permissions
    }

    /// Resolves the roles carried by a session user record.
    pub fn resolve_user(&self, user: &SessionUser) -> PermissionSet {
        self.resolve(&user.assignments())
    }

    /// Returns whether `permissions` contains `permission`.
    pub fn has(&self, permissions: &PermissionSet, permission: Permission) -> bool {
        permissions.has(permission)
    }

    /// Returns whether `permissions` contains any of `wanted` (false when
    /// `wanted` is empty).
    pub fn has_any(&self, permissions: &PermissionSet, wanted: &[Permission]) -> bool {
        permissions.has_any(wanted)
    }

    /// Returns whether `permissions` contains all of `wanted` (true when
    /// `wanted` is empty).
    pub fn has_all(&self, permissions: &PermissionSet, wanted: &[Permission]) -> bool {
        permissions.has_all(wanted)
    }

    /// Returns whether `permissions` opens `route`. Unmapped routes are open.
    pub fn can_access_route(&self, permissions: &PermissionSet, route: &str) -> bool {
        self.routes.can_access(permissions, route)
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(slugs: &[RoleSlug]) -> Vec<RoleAssignment> {
        slugs.iter().copied().map(RoleAssignment::new).collect()
    }

    #[test]
    fn test_resolve_empty() {
        let resolver = PermissionResolver::standard();
        assert!(resolver.resolve(&[]).is_empty());
        assert!(resolver.resolve_slugs([]).is_empty());
    }

    #[test]
    fn test_resolve_is_union() {
        let resolver = PermissionResolver::standard();

        let pharmacist = resolver.resolve(&roles(&[RoleSlug::Pharmacist]));
        let accountant = resolver.resolve(&roles(&[RoleSlug::Accountant]));
        let both = resolver.resolve(&roles(&[RoleSlug::Pharmacist, RoleSlug::Accountant]));

        assert_eq!(both, pharmacist.union(&accountant));
        assert!(both.has(Permission::PharmacyDispense));
        assert!(both.has(Permission::BillingPayments));
    }

    #[test]
    fn test_resolve_order_independent() {
        let resolver = PermissionResolver::standard();

        assert_eq!(
            resolver.resolve(&roles(&[RoleSlug::Nurse, RoleSlug::HrManager])),
            resolver.resolve(&roles(&[RoleSlug::HrManager, RoleSlug::Nurse]))
        );
    }

    #[test]
    fn test_resolve_uses_injected_table() {
        let table = PermissionTable::empty().with_role(RoleSlug::Nurse, vec![Permission::Reports]);
        let resolver = PermissionResolver::new(Arc::new(table), Arc::new(RouteTable::empty()));

        let nurse = resolver.resolve(&roles(&[RoleSlug::Nurse]));
        assert_eq!(nurse, PermissionSet::new(vec![Permission::Reports]));

        // Roles missing from the injected table grant nothing
        assert!(resolver.resolve(&roles(&[RoleSlug::Doctor])).is_empty());

        // Empty route table: everything is open
        assert!(resolver.can_access_route(&PermissionSet::empty(), "/dashboard/staff/register"));
    }

    #[test]
    fn test_resolve_slugs_ignores_unknown() {
        let resolver = PermissionResolver::standard();

        let with_unknown = resolver.resolve_slugs(["patient", "janitor"]);
        let without = resolver.resolve_slugs(["patient"]);
        assert_eq!(with_unknown, without);
        assert!(resolver.resolve_slugs(["janitor"]).is_empty());
    }

    #[test]
    fn test_resolve_user() {
        let resolver = PermissionResolver::standard();
        let user =
            SessionUser::from_json(r#"{"roles":[{"slug":"receptionist"},{"slug":"ghost"}]}"#)
                .unwrap();

        let permissions = resolver.resolve_user(&user);
        assert_eq!(
            permissions,
            resolver.resolve(&roles(&[RoleSlug::Receptionist]))
        );
        assert!(resolver.resolve_user(&SessionUser::default()).is_empty());
    }

    #[test]
    fn test_query_delegates() {
        let resolver = PermissionResolver::standard();
        let nurse = resolver.resolve(&roles(&[RoleSlug::Nurse]));

        assert!(resolver.has(&nurse, Permission::PatientsVitals));
        assert!(!resolver.has(&nurse, Permission::PatientsRegister));
        assert!(resolver.has_any(&nurse, &[Permission::Billing, Permission::PatientsVitals]));
        assert!(!resolver.has_any(&nurse, &[]));
        assert!(resolver.has_all(&nurse, &[]));
        assert!(!resolver.has_all(&nurse, &[Permission::Dashboard, Permission::Billing]));
    }

    #[test]
    fn test_can_access_route() {
        let resolver = PermissionResolver::standard();
        let receptionist = resolver.resolve(&roles(&[RoleSlug::Receptionist]));

        assert!(resolver.can_access_route(&receptionist, "/dashboard/appointment-check-ins"));
        assert!(!resolver.can_access_route(&receptionist, "/dashboard/patient-vitals"));
        assert!(resolver.can_access_route(&receptionist, "/dashboard/help"));
    }
}
