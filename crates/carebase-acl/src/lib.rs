//! # carebase-acl: Role-Based Access Control for Carebase
//!
//! Decides what a signed-in clinic user may see:
//! - **Permission table**: which permissions each role grants
//! - **Permission resolver**: a user's effective permissions across all of
//!   their roles (set union)
//! - **Route gating**: which dashboard paths a permission set opens
//! - **Permission cache**: memoized sets per user context
//!
//! This layer drives navigation and page rendering. It is not a security
//! boundary; the API server enforces permissions on its own.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  SessionUser (roles from the auth layer)     │
//! └─────────────────┬───────────────────────────┘
//!                   │ assignments()
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  PermissionCache                             │
//! │  └─ PermissionResolver                       │
//! │     ├─ PermissionTable  (role → permissions) │
//! │     └─ RouteTable       (route → permission) │
//! └─────────────────┬───────────────────────────┘
//!                   │ PermissionSet
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  RouteGuard / UI queries                     │
//! │  has · has_any · has_all · can_access_route  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Semantics
//!
//! | Situation                         | Outcome                      |
//! |-----------------------------------|------------------------------|
//! | No roles                          | empty permission set         |
//! | Role without a table entry        | grants nothing               |
//! | Unrecognized slug in session data | ignored (grants nothing)     |
//! | Route not in the route table      | open to everyone             |
//! | `has_any(&[])`                    | `false`                      |
//! | `has_all(&[])`                    | `true`                       |
//! | `billing` granted                 | `billing.invoices` NOT implied |
//!
//! ## Examples
//!
//! ```
//! use carebase_acl::{Permission, PermissionResolver, RoleAssignment, RoleSlug};
//!
//! let resolver = PermissionResolver::standard();
//! let roles = vec![
//!     RoleAssignment::new(RoleSlug::Nurse),
//!     RoleAssignment::new(RoleSlug::Receptionist),
//! ];
//! let permissions = resolver.resolve(&roles);
//!
//! assert!(permissions.has(Permission::PatientsVitals));
//! assert!(permissions.has_all(&[Permission::PatientsRegister, Permission::BillingInvoices]));
//! assert!(!permissions.has_any(&[]));
//!
//! assert!(resolver.can_access_route(&permissions, "/dashboard/patients/register"));
//! assert!(!resolver.can_access_route(&permissions, "/dashboard/staff/register"));
//! assert!(resolver.can_access_route(&permissions, "/dashboard/unknown-path"));
//! ```
//!
//! ### From a session payload
//!
//! ```
//! use carebase_acl::{PermissionCache, PermissionResolver, SessionEvent, SessionUser};
//!
//! let cache = PermissionCache::new(PermissionResolver::standard());
//! let user = SessionUser::from_json(r#"{"roles":[{"slug":"doctor"},{"slug":"intern"}]}"#)?;
//!
//! let roles = user.assignments(); // "intern" is not a known role and is dropped
//! let permissions = cache.permissions(&roles);
//! assert!(cache.can_access_route(&roles, "/dashboard/patients/register"));
//!
//! cache.handle(SessionEvent::Logout);
//! assert!(!cache.is_warm());
//! # let _ = permissions;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod consistency;
pub mod guard;
pub mod permissions;
pub mod resolver;
pub mod roles;
pub mod routes;
pub mod session;
pub mod table;

// Re-export commonly used types
pub use cache::{CacheStats, PermissionCache, SessionEvent};
pub use consistency::{ConsistencyIssue, ConsistencyReport};
pub use guard::{AccessError, RouteGuard};
pub use permissions::{ParsePermissionError, Permission, PermissionSet};
pub use resolver::PermissionResolver;
pub use roles::{ParseRoleError, RoleSlug};
pub use routes::{RouteRule, RouteTable};
pub use session::{RoleAssignment, SessionError, SessionUser, UserId};
pub use table::PermissionTable;


// Kani proofs for bounded model checking
#[cfg(kani)]
mod kani_proofs;
