//! Role slugs.
//!
//! The set of roles is closed. Staff roles cover hospital operations;
//! portal roles (`patient`, `guardian`) are the patient-facing accounts and
//! only reach the dashboard and their own settings.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role a user can be assigned.
///
/// Serializes as its slug (`super_admin`, `lab_technician`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSlug {
    /// Installation-wide administrator.
    ///
    /// **Permissions:** every permission, including tenant administration.
    SuperAdmin,

    /// Administrator of a single hospital or clinic (tenant).
    ///
    /// **Permissions:** everything inside the tenant, no tenant administration.
    Admin,

    Doctor,

    Nurse,

    /// Front desk: registration, scheduling, check-ins, invoicing.
    Receptionist,

    Pharmacist,

    LabTechnician,

    /// Billing and finance.
    Accountant,

    /// Staff records and departments.
    HrManager,

    /// Patient portal account.
    Patient,

    /// Parent or carer acting for a patient.
    Guardian,
}

impl RoleSlug {
    /// Every role, in declaration order.
    pub const ALL: &'static [RoleSlug] = &[
        RoleSlug::SuperAdmin,
        RoleSlug::Admin,
        RoleSlug::Doctor,
        RoleSlug::Nurse,
        RoleSlug::Receptionist,
        RoleSlug::Pharmacist,
        RoleSlug::LabTechnician,
        RoleSlug::Accountant,
        RoleSlug::HrManager,
        RoleSlug::Patient,
        RoleSlug::Guardian,
    ];

    /// Returns the slug for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleSlug::SuperAdmin => "super_admin",
            RoleSlug::Admin => "admin",
            RoleSlug::Doctor => "doctor",
            RoleSlug::Nurse => "nurse",
            RoleSlug::Receptionist => "receptionist",
            RoleSlug::Pharmacist => "pharmacist",
            RoleSlug::LabTechnician => "lab_technician",
            RoleSlug::Accountant => "accountant",
            RoleSlug::HrManager => "hr_manager",
            RoleSlug::Patient => "patient",
            RoleSlug::Guardian => "guardian",
        }
    }

    /// Returns a human-readable role name.
    pub fn display_name(&self) -> &'static str {
        match self {
            RoleSlug::SuperAdmin => "Super Admin",
            RoleSlug::Admin => "Hospital Admin",
            RoleSlug::Doctor => "Doctor",
            RoleSlug::Nurse => "Nurse",
            RoleSlug::Receptionist => "Receptionist",
            RoleSlug::Pharmacist => "Pharmacist",
            RoleSlug::LabTechnician => "Lab Technician",
            RoleSlug::Accountant => "Accountant",
            RoleSlug::HrManager => "HR Manager",
            RoleSlug::Patient => "Patient",
            RoleSlug::Guardian => "Guardian",
        }
    }

    /// Returns whether this is a patient-facing portal role.
    pub fn is_portal(&self) -> bool {
        matches!(self, RoleSlug::Patient | RoleSlug::Guardian)
    }
}

impl Display for RoleSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known role slug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role slug: {0:?}")]
pub struct ParseRoleError(pub String);

impl FromStr for RoleSlug {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleSlug::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for role in RoleSlug::ALL {
            assert_eq!(role.as_str().parse::<RoleSlug>(), Ok(*role));
            assert_eq!(role.to_string(), role.as_str());
        }
    }

    #[test]
    fn test_serde_matches_as_str() {
        for role in RoleSlug::ALL {
            let json = serde_json::to_string(role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_unknown_slug() {
        assert_eq!(
            "janitor".parse::<RoleSlug>(),
            Err(ParseRoleError("janitor".to_string()))
        );
        // Slugs are case-sensitive
        assert!("Doctor".parse::<RoleSlug>().is_err());
        assert!(serde_json::from_str::<RoleSlug>("\"janitor\"").is_err());
    }

    #[test]
    fn test_portal_roles() {
        assert!(RoleSlug::Patient.is_portal());
        assert!(RoleSlug::Guardian.is_portal());
        assert!(!RoleSlug::Doctor.is_portal());
        assert!(!RoleSlug::SuperAdmin.is_portal());

        let portal: Vec<RoleSlug> = RoleSlug::ALL
            .iter()
            .copied()
            .filter(RoleSlug::is_portal)
            .collect();
        assert_eq!(portal, vec![RoleSlug::Patient, RoleSlug::Guardian]);
    }

    #[test]
    fn test_all_is_exhaustive() {
        assert_eq!(RoleSlug::ALL.len(), 11);
        assert_eq!(RoleSlug::ALL.first(), Some(&RoleSlug::SuperAdmin));
        assert_eq!(RoleSlug::ALL.last(), Some(&RoleSlug::Guardian));
    }
}
