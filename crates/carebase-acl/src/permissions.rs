//! Permission tokens and permission sets.
//!
//! Every token is an independent set member. The dotted names
//! (`billing`, `billing.invoices`) only group tokens by feature area:
//! holding `billing` grants nothing under `billing.*`.

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! permissions {
    ($( $(#[$meta:meta])* $variant:ident => $token:literal, )+) => {
        /// Capability token gating a feature or route.
        ///
        /// Serializes as its wire token, e.g. `"patients.register"`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum Permission {
            $(
                $(#[$meta])*
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl Permission {
            /// Every permission, in declaration order.
            pub const ALL: &'static [Permission] = &[$(Permission::$variant),+];

            /// Returns the wire token for this permission.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Permission::$variant => $token,)+
                }
            }
        }
    };
}

permissions! {
    /// Landing dashboard.
    Dashboard => "dashboard",

    /// Patients area.
    Patients => "patients",
    /// Register a new patient.
    PatientsRegister => "patients.register",
    PatientsList => "patients.list",
    /// Medical records and encounter history.
    PatientsRecords => "patients.records",
    /// Vital signs capture.
    PatientsVitals => "patients.vitals",

    Appointments => "appointments",
    AppointmentsSchedule => "appointments.schedule",
    AppointmentsList => "appointments.list",
    /// Front-desk check-in queue.
    AppointmentsCheckIns => "appointments.check_ins",

    Billing => "billing",
    BillingInvoices => "billing.invoices",
    /// Record and refund payments.
    BillingPayments => "billing.payments",
    BillingInsurance => "billing.insurance",

    Pharmacy => "pharmacy",
    /// Stock levels, batches and expiry.
    PharmacyInventory => "pharmacy.inventory",
    PharmacyDispense => "pharmacy.dispense",
    PharmacySuppliers => "pharmacy.suppliers",

    Laboratory => "laboratory",
    LaboratoryOrders => "laboratory.orders",
    LaboratoryResults => "laboratory.results",

    Staff => "staff",
    /// Onboard a staff member.
    StaffRegister => "staff.register",
    StaffList => "staff.list",
    /// Assign and revoke staff roles.
    StaffRoles => "staff.roles",

    Departments => "departments",
    Reports => "reports",
    AuditLogs => "audit_logs",
    /// Tenant (hospital/clinic) administration across the installation.
    Tenants => "tenants",
    /// Account and preference settings.
    Settings => "settings",
}

impl Permission {
    /// Returns the feature area this token is filed under (`billing` for
    /// `billing.invoices`).
    ///
    /// Only for grouping output. Access decisions never look at it.
    pub fn namespace(&self) -> &'static str {
        let token = self.as_str();
        token.split_once('.').map_or(token, |(area, _)| area)
    }

    /// Returns whether grants of this permission warrant extra audit detail.
    pub fn is_high_risk(&self) -> bool {
        matches!(
            self,
            Permission::StaffRegister
                | Permission::StaffRoles
                | Permission::BillingPayments
                | Permission::AuditLogs
                | Permission::Tenants
        )
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known permission token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown permission token: {0:?}")]
pub struct ParsePermissionError(pub String);

impl FromStr for Permission {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParsePermissionError(s.to_string()))
    }
}

/// Set of permissions held by a role or a user.
///
/// Membership is the only observable contract; iteration order is the
/// declaration order of [`Permission`] and carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: BTreeSet<Permission>,
}

impl PermissionSet {
    /// Creates a permission set from a list of permissions.
    pub fn new(permissions: Vec<Permission>) -> Self {
        permissions.into_iter().collect()
    }

    /// Creates an empty permission set.
    pub fn empty() -> Self {
        Self {
            permissions: BTreeSet::new(),
        }
    }

    /// Creates a set holding every known permission.
    pub fn all() -> Self {
        Permission::ALL.iter().copied().collect()
    }

    /// Returns whether this set contains the given permission.
    pub fn contains(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Alias of [`contains`](Self::contains) matching the query vocabulary
    /// used by page guards.
    pub fn has(&self, permission: Permission) -> bool {
        self.contains(permission)
    }

    /// Returns whether at least one of `permissions` is held.
    ///
    /// An empty query is never satisfied.
    pub fn has_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.contains(*p))
    }

    /// Returns whether every one of `permissions` is held.
    ///
    /// An empty query is always satisfied.
    pub fn has_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.contains(*p))
    }

    /// Adds a permission to the set.
    pub fn grant(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Removes a permission from the set.
    pub fn revoke(&mut self, permission: Permission) {
        self.permissions.remove(&permission);
    }

    /// Adds every permission of `other` to this set.
    pub fn extend_from(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().copied());
    }

    /// Returns the union of two sets.
    pub fn union(&self, other: &PermissionSet) -> PermissionSet {
        let mut out = self.clone();
        out.extend_from(other);
        out
    }

    /// Returns whether every permission of this set is also in `other`.
    pub fn is_subset(&self, other: &PermissionSet) -> bool {
        self.permissions.is_subset(&other.permissions)
    }

    /// Returns all permissions in the set.
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.permissions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Returns whether any permission in the set is high-risk.
    pub fn has_high_risk_permission(&self) -> bool {
        self.permissions.iter().any(Permission::is_high_risk)
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(permissions: Vec<Permission>) -> Self {
        Self::new(permissions)
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, permission) in self.permissions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(permission.as_str())?;
        }
        f.write_str("}")
    }
}
