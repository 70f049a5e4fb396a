//! Route gating.
//!
//! Maps navigable paths to the single permission each requires. Matching is
//! by exact string: no wildcards and no inheritance from parent paths, so
//! `/dashboard/staff/register/bulk` is open even though
//! `/dashboard/staff/register` is gated. Paths missing from the table are
//! open to everyone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::permissions::{Permission, PermissionSet};

/// A single route requirement, as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// Exact route path.
    pub path: String,

    /// Permission required to open the route.
    pub permission: Permission,
}

impl RouteRule {
    pub fn new(path: impl Into<String>, permission: Permission) -> Self {
        Self {
            path: path.into(),
            permission,
        }
    }
}

/// Immutable mapping from route path to required permission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, Permission>,
}

impl RouteTable {
    /// Creates a table with no gated routes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Gates `path` behind `permission`, replacing any earlier requirement.
    pub fn with_route(mut self, path: impl Into<String>, permission: Permission) -> Self {
        self.routes.insert(path.into(), permission);
        self
    }

    /// Overlays configured rules. A later rule for the same path wins.
    pub fn with_rules<'a>(mut self, rules: impl IntoIterator<Item = &'a RouteRule>) -> Self {
        for rule in rules {
            self.routes.insert(rule.path.clone(), rule.permission);
        }
        self
    }

    /// Returns the permission required for `route`, if the route is gated.
    pub fn required_permission(&self, route: &str) -> Option<Permission> {
        self.routes.get(route).copied()
    }

    /// Returns whether a holder of `permissions` may open `route`.
    pub fn can_access(&self, permissions: &PermissionSet, route: &str) -> bool {
        match self.required_permission(route) {
            Some(required) => permissions.has(required),
            None => true,
        }
    }

    /// Iterates over gated routes in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Permission)> + '_ {
        self.routes.iter().map(|(path, p)| (path.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The built-in dashboard routes.
    ///
    /// `/dashboard/patient-vitals` and `/dashboard/appointment-check-ins`
    /// sit outside the `/dashboard/patients` and `/dashboard/appointments`
    /// trees; they are kept as declared.
    pub fn standard() -> Self {
        use Permission as P;

        [
            ("/dashboard", P::Dashboard),
            ("/dashboard/patients", P::Patients),
            ("/dashboard/patients/register", P::PatientsRegister),
            ("/dashboard/patients/list", P::PatientsList),
            ("/dashboard/patients/records", P::PatientsRecords),
            ("/dashboard/patient-vitals", P::PatientsVitals),
            ("/dashboard/appointments", P::Appointments),
            ("/dashboard/appointments/schedule", P::AppointmentsSchedule),
            ("/dashboard/appointments/list", P::AppointmentsList),
            ("/dashboard/appointment-check-ins", P::AppointmentsCheckIns),
            ("/dashboard/billing", P::Billing),
            ("/dashboard/billing/invoices", P::BillingInvoices),
            ("/dashboard/billing/payments", P::BillingPayments),
            ("/dashboard/billing/insurance", P::BillingInsurance),
            ("/dashboard/pharmacy", P::Pharmacy),
            ("/dashboard/pharmacy/inventory", P::PharmacyInventory),
            ("/dashboard/pharmacy/dispense", P::PharmacyDispense),
            ("/dashboard/pharmacy/suppliers", P::PharmacySuppliers),
            ("/dashboard/laboratory", P::Laboratory),
            ("/dashboard/laboratory/orders", P::LaboratoryOrders),
            ("/dashboard/laboratory/results", P::LaboratoryResults),
            ("/dashboard/staff", P::Staff),
            ("/dashboard/staff/register", P::StaffRegister),
            ("/dashboard/staff/list", P::StaffList),
            ("/dashboard/staff/roles", P::StaffRoles),
            ("/dashboard/departments", P::Departments),
            ("/dashboard/reports", P::Reports),
            ("/dashboard/audit-logs", P::AuditLogs),
            ("/dashboard/tenants", P::Tenants),
            ("/dashboard/settings", P::Settings),
        ]
        .into_iter()
        .fold(Self::empty(), |table, (path, permission)| {
            table.with_route(path, permission)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_route_is_open() {
        let routes = RouteTable::standard();
        let nobody = PermissionSet::empty();

        assert!(routes.can_access(&nobody, "/dashboard/unknown-path"));
        assert!(routes.can_access(&nobody, "/login"));
        assert!(routes.can_access(&nobody, ""));
    }

    #[test]
    fn test_mapped_route_requires_permission() {
        let routes = RouteTable::standard();

        assert_eq!(
            routes.required_permission("/dashboard/staff/register"),
            Some(Permission::StaffRegister)
        );
        assert!(!routes.can_access(&PermissionSet::empty(), "/dashboard/staff/register"));

        let hr = PermissionSet::new(vec![Permission::StaffRegister]);
        assert!(routes.can_access(&hr, "/dashboard/staff/register"));
    }

    #[test]
    fn test_exact_match_only() {
        let routes = RouteTable::standard();
        let nobody = PermissionSet::empty();

        // Sub-paths and near-misses are not gated
        assert!(routes.can_access(&nobody, "/dashboard/staff/register/bulk"));
        assert!(routes.can_access(&nobody, "/dashboard/staff/register/"));
        assert!(routes.can_access(&nobody, "/Dashboard/staff/register"));
    }

    #[test]
    fn test_parent_grant_does_not_open_child() {
        let routes = RouteTable::standard();
        let billing_only = PermissionSet::new(vec![Permission::Billing]);

        assert!(routes.can_access(&billing_only, "/dashboard/billing"));
        assert!(!routes.can_access(&billing_only, "/dashboard/billing/invoices"));
    }

    #[test]
    fn test_literal_sibling_routes() {
        let routes = RouteTable::standard();

        assert_eq!(
            routes.required_permission("/dashboard/patient-vitals"),
            Some(Permission::PatientsVitals)
        );
        assert_eq!(
            routes.required_permission("/dashboard/appointment-check-ins"),
            Some(Permission::AppointmentsCheckIns)
        );
    }

    #[test]
    fn test_with_rules_overlays() {
        let rules = vec![
            RouteRule::new("/dashboard/reports", Permission::AuditLogs),
            RouteRule::new("/dashboard/wards", Permission::Departments),
        ];
        let routes = RouteTable::standard().with_rules(&rules);

        assert_eq!(
            routes.required_permission("/dashboard/reports"),
            Some(Permission::AuditLogs)
        );
        assert_eq!(
            routes.required_permission("/dashboard/wards"),
            Some(Permission::Departments)
        );
        assert_eq!(routes.len(), RouteTable::standard().len() + 1);
    }

    #[test]
    fn test_later_rule_wins() {
        let rules = vec![
            RouteRule::new("/dashboard/x", Permission::Reports),
            RouteRule::new("/dashboard/x", Permission::Settings),
        ];
        let routes = RouteTable::empty().with_rules(&rules);

        assert_eq!(
            routes.required_permission("/dashboard/x"),
            Some(Permission::Settings)
        );
    }

    #[test]
    fn test_route_rule_deserializes_token() {
        let rule: RouteRule =
            serde_json::from_str(r#"{"path":"/dashboard/wards","permission":"departments"}"#)
                .unwrap();
        assert_eq!(rule, RouteRule::new("/dashboard/wards", Permission::Departments));

        let bad = serde_json::from_str::<RouteRule>(r#"{"path":"/x","permission":"wards"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_every_standard_route_is_under_dashboard() {
        for (path, _) in RouteTable::standard().iter() {
            assert!(path.starts_with("/dashboard"), "{path}");
        }
    }
}
