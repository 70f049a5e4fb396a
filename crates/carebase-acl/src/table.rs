//! The role to permission table.
//!
//! Built once, then shared read-only (usually behind an `Arc`) by every
//! resolver and session. Nothing mutates a table after construction; the
//! builder methods consume and return it.

use std::collections::HashMap;

use crate::permissions::{Permission, PermissionSet};
use crate::roles::RoleSlug;

/// Immutable mapping from role slug to the permissions the role grants.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionTable {
    entries: HashMap<RoleSlug, PermissionSet>,
    empty: PermissionSet,
}

impl PermissionTable {
    /// Creates a table with no entries. Every lookup yields the empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the permissions for a role, replacing any earlier entry.
    pub fn with_role(mut self, role: RoleSlug, permissions: impl Into<PermissionSet>) -> Self {
        self.entries.insert(role, permissions.into());
        self
    }

    /// Returns the exact permission set declared for `role`.
    ///
    /// A role without an entry grants nothing.
    pub fn lookup(&self, role: RoleSlug) -> &PermissionSet {
        self.entries.get(&role).unwrap_or(&self.empty)
    }

    /// Looks up a raw slug. Unknown slugs yield the empty set.
    pub fn lookup_slug(&self, slug: &str) -> &PermissionSet {
        match slug.parse::<RoleSlug>() {
            Ok(role) => self.lookup(role),
            Err(_) => &self.empty,
        }
    }

    /// Returns whether `role` has an entry (possibly empty).
    pub fn contains_role(&self, role: RoleSlug) -> bool {
        self.entries.contains_key(&role)
    }

    /// Returns whether at least one role grants `permission`.
    pub fn granted_anywhere(&self, permission: Permission) -> bool {
        self.entries.values().any(|set| set.contains(permission))
    }

    /// Returns the roles that grant `permission`, in declaration order.
    pub fn roles_granting(&self, permission: Permission) -> Vec<RoleSlug> {
        RoleSlug::ALL
            .iter()
            .copied()
            .filter(|role| self.lookup(*role).contains(permission))
            .collect()
    }

    /// Iterates over the entries in role declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (RoleSlug, &PermissionSet)> + '_ {
        RoleSlug::ALL
            .iter()
            .filter_map(|role| self.entries.get(role).map(|set| (*role, set)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in clinic table.
    ///
    /// | Role           | Grants                                                      |
    /// |----------------|-------------------------------------------------------------|
    /// | super_admin    | everything                                                  |
    /// | admin          | everything except tenant administration                     |
    /// | doctor         | patients, appointments, laboratory, pharmacy area, reports  |
    /// | nurse          | patient records and vitals, check-ins, lab results          |
    /// | receptionist   | registration, scheduling, check-ins, invoices               |
    /// | pharmacist     | pharmacy inventory, dispensing, suppliers                   |
    /// | lab_technician | laboratory orders and results                               |
    /// | accountant     | billing, reports                                            |
    /// | hr_manager     | staff, departments, reports                                 |
    /// | patient        | dashboard, settings                                         |
    /// | guardian       | dashboard, settings                                         |
    pub fn standard() -> Self {
        use Permission as P;

        let admin: Vec<Permission> = Permission::ALL
            .iter()
            .copied()
            .filter(|p| *p != P::Tenants)
            .collect();

        Self::empty()
            .with_role(RoleSlug::SuperAdmin, PermissionSet::all())
            .with_role(RoleSlug::Admin, admin)
            .with_role(
                RoleSlug::Doctor,
                vec![
                    P::Dashboard,
                    P::Patients,
                    P::PatientsRegister,
                    P::PatientsList,
                    P::PatientsRecords,
                    P::PatientsVitals,
                    P::Appointments,
                    P::AppointmentsSchedule,
                    P::AppointmentsList,
                    P::Laboratory,
                    P::LaboratoryOrders,
                    P::LaboratoryResults,
                    P::Pharmacy,
                    P::Reports,
                    P::Settings,
                ],
            )
            .with_role(
                RoleSlug::Nurse,
                vec![
                    P::Dashboard,
                    P::Patients,
                    P::PatientsList,
                    P::PatientsRecords,
                    P::PatientsVitals,
                    P::Appointments,
                    P::AppointmentsList,
                    P::AppointmentsCheckIns,
                    P::Laboratory,
                    P::LaboratoryResults,
                    P::Settings,
                ],
            )
            .with_role(
                RoleSlug::Receptionist,
                vec![
                    P::Dashboard,
                    P::Patients,
                    P::PatientsRegister,
                    P::PatientsList,
                    P::Appointments,
                    P::AppointmentsSchedule,
                    P::AppointmentsList,
                    P::AppointmentsCheckIns,
                    P::Billing,
                    P::BillingInvoices,
                    P::Settings,
                ],
            )
            .with_role(
                RoleSlug::Pharmacist,
                vec![
                    P::Dashboard,
                    P::Patients,
                    P::PatientsList,
                    P::Pharmacy,
                    P::PharmacyInventory,
                    P::PharmacyDispense,
                    P::PharmacySuppliers,
                    P::Settings,
                ],
            )
            .with_role(
                RoleSlug::LabTechnician,
                vec![
                    P::Dashboard,
                    P::Patients,
                    P::PatientsList,
                    P::Laboratory,
                    P::LaboratoryOrders,
                    P::LaboratoryResults,
                    P::Settings,
                ],
            )
            .with_role(
                RoleSlug::Accountant,
                vec![
                    P::Dashboard,
                    P::Billing,
                    P::BillingInvoices,
                    P::BillingPayments,
                    P::BillingInsurance,
                    P::Reports,
                    P::Settings,
                ],
            )
            .with_role(
                RoleSlug::HrManager,
                vec![
                    P::Dashboard,
                    P::Staff,
                    P::StaffRegister,
                    P::StaffList,
                    P::Departments,
                    P::Reports,
                    P::Settings,
                ],
            )
            .with_role(RoleSlug::Patient, vec![P::Dashboard, P::Settings])
            .with_role(RoleSlug::Guardian, vec![P::Dashboard, P::Settings])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_exhaustive() {
        let table = PermissionTable::standard();
        for role in RoleSlug::ALL {
            assert!(table.contains_role(*role), "missing entry for {role}");
        }
        assert_eq!(table.len(), RoleSlug::ALL.len());
    }

    #[test]
    fn test_portal_roles_are_minimal() {
        let table = PermissionTable::standard();
        let minimal = PermissionSet::new(vec![Permission::Dashboard, Permission::Settings]);

        assert_eq!(table.lookup(RoleSlug::Patient), &minimal);
        assert_eq!(table.lookup(RoleSlug::Guardian), &minimal);
    }

    #[test]
    fn test_super_admin_holds_everything() {
        let table = PermissionTable::standard();
        assert_eq!(table.lookup(RoleSlug::SuperAdmin), &PermissionSet::all());
    }

    #[test]
    fn test_admin_lacks_tenant_administration() {
        let table = PermissionTable::standard();
        let admin = table.lookup(RoleSlug::Admin);

        assert!(!admin.contains(Permission::Tenants));
        assert_eq!(admin.len(), Permission::ALL.len() - 1);
    }

    #[test]
    fn test_doctor_pharmacy_area_only() {
        // Entry to the area does not carry the fine-grained pharmacy grants
        let table = PermissionTable::standard();
        let doctor = table.lookup(RoleSlug::Doctor);

        assert!(doctor.contains(Permission::Pharmacy));
        assert!(!doctor.contains(Permission::PharmacyInventory));
        assert!(!doctor.contains(Permission::PharmacyDispense));
    }

    #[test]
    fn test_missing_role_yields_empty_set() {
        let table = PermissionTable::empty().with_role(RoleSlug::Doctor, vec![Permission::Dashboard]);

        assert!(table.lookup(RoleSlug::Nurse).is_empty());
        assert!(!table.contains_role(RoleSlug::Nurse));
    }

    #[test]
    fn test_lookup_slug() {
        let table = PermissionTable::standard();

        assert_eq!(table.lookup_slug("doctor"), table.lookup(RoleSlug::Doctor));
        assert!(table.lookup_slug("janitor").is_empty());
        assert!(table.lookup_slug("").is_empty());
    }

    #[test]
    fn test_with_role_replaces_entry() {
        let table = PermissionTable::empty()
            .with_role(RoleSlug::Nurse, vec![Permission::Dashboard])
            .with_role(RoleSlug::Nurse, vec![Permission::Settings]);

        let nurse = table.lookup(RoleSlug::Nurse);
        assert_eq!(nurse.len(), 1);
        assert!(nurse.contains(Permission::Settings));
    }

    #[test]
    fn test_roles_granting() {
        let table = PermissionTable::standard();

        assert_eq!(
            table.roles_granting(Permission::Tenants),
            vec![RoleSlug::SuperAdmin]
        );
        assert!(
            table
                .roles_granting(Permission::PharmacyDispense)
                .contains(&RoleSlug::Pharmacist)
        );
        assert!(table.granted_anywhere(Permission::StaffRoles));
        assert!(!PermissionTable::empty().granted_anywhere(Permission::Dashboard));
    }

    #[test]
    fn test_iter_follows_declaration_order() {
        let table = PermissionTable::standard();
        let roles: Vec<RoleSlug> = table.iter().map(|(role, _)| role).collect();
        assert_eq!(roles, RoleSlug::ALL);
    }
}
