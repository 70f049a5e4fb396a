//! Role assignments as delivered by the authentication layer.
//!
//! Two entry points:
//! - [`RoleAssignment`] is strict: deserializing an unknown slug fails.
//! - [`SessionUser`] is lenient: it accepts whatever role list the server
//!   sends (absent, `null`, or a list of `{ "slug": ... }` objects) and
//!   drops slugs it does not recognise, so they grant nothing.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::roles::RoleSlug;

/// Error type for session payload parsing.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The payload is not a valid user record.
    #[error("Malformed session payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A role assigned to a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub slug: RoleSlug,

    /// Display name sent by the server, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RoleAssignment {
    pub fn new(slug: RoleSlug) -> Self {
        Self { slug, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<RoleSlug> for RoleAssignment {
    fn from(slug: RoleSlug) -> Self {
        Self::new(slug)
    }
}

/// A role assignment before slug validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRoleAssignment {
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Server-side user identifier. Backends hand out either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(id) => write!(f, "{id}"),
            UserId::Text(id) => f.write_str(id),
        }
    }
}

/// The authenticated user, as far as access control is concerned.
///
/// Other fields of the server's user record are ignored. The id only labels
/// log events; it never affects resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,

    #[serde(default)]
    pub roles: Option<Vec<RawRoleAssignment>>,
}

impl SessionUser {
    /// Parses a user record from JSON.
    pub fn from_json(payload: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Returns the recognised role assignments.
    ///
    /// Unrecognised slugs are logged and skipped.
    pub fn assignments(&self) -> Vec<RoleAssignment> {
        let Some(roles) = &self.roles else {
            return Vec::new();
        };

        roles
            .iter()
            .filter_map(|raw| match raw.slug.parse::<RoleSlug>() {
                Ok(slug) => Some(RoleAssignment {
                    slug,
                    name: raw.name.clone(),
                }),
                Err(_) => {
                    warn!(user = ?self.id, slug = %raw.slug, "Ignoring unrecognized role slug");
                    None
                }
            })
            .collect()
    }

    /// Returns whether the record carries no role entries at all.
    pub fn has_no_roles(&self) -> bool {
        self.roles.as_ref().is_none_or(Vec::is_empty)
    }
}
