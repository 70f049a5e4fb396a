//! Memoized permission sets for a user context.
//!
//! The cache holds the derived set for one role list at a time, keyed on a
//! content hash of that list. A different role list, or any session event,
//! replaces the entry wholesale; entries are never patched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::permissions::PermissionSet;
use crate::resolver::PermissionResolver;
use crate::roles::RoleSlug;
use crate::session::RoleAssignment;

/// Session lifecycle events that invalidate the cached permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Login,
    Logout,
    /// The user's role assignments were changed server-side.
    RolesChanged,
}

/// Content hash of a role list.
///
/// Slugs are sorted and de-duplicated first: the union does not depend on
/// order or multiplicity, so neither does the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleListKey([u8; 32]);

impl RoleListKey {
    pub fn of(roles: &[RoleAssignment]) -> Self {
        let mut slugs: Vec<RoleSlug> = roles.iter().map(|r| r.slug).collect();
        slugs.sort_unstable();
        slugs.dedup();

        let mut hasher = blake3::Hasher::new();
        for slug in slugs {
            hasher.update(slug.as_str().as_bytes());
            hasher.update(&[0]);
        }
        Self(*hasher.finalize().as_bytes())
    }
}

#[derive(Debug)]
struct CachedEntry {
    key: RoleListKey,
    permissions: Arc<PermissionSet>,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizing front for a [`PermissionResolver`].
///
/// Shareable across threads. Repeated calls with an unchanged role list
/// return the same `Arc`.
#[derive(Debug)]
pub struct PermissionCache {
    resolver: PermissionResolver,
    entry: RwLock<Option<CachedEntry>>,
    /// Bumped by every invalidation, under the write lock.
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PermissionCache {
    pub fn new(resolver: PermissionResolver) -> Self {
        Self {
            resolver,
            entry: RwLock::new(None),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the permission set for `roles`, computing it on a miss.
    pub fn permissions(&self, roles: &[RoleAssignment]) -> Arc<PermissionSet> {
        let key = RoleListKey::of(roles);

        if let Ok(guard) = self.entry.read() {
            if let Some(entry) = guard.as_ref().filter(|e| e.key == key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Arc::clone(&entry.permissions);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let generation = self.generation.load(Ordering::Acquire);
        let permissions = Arc::new(self.resolver.resolve(roles));
        self.store(
            generation,
            CachedEntry {
                key,
                permissions: Arc::clone(&permissions),
            },
        );

        permissions
    }

    /// Writes `entry` back unless the cache was invalidated after `generation`
    /// was read. A result computed before a logout is returned to its caller
    /// but never cached.
    fn store(&self, generation: u64, entry: CachedEntry) {
        match self.entry.write() {
            Ok(mut guard) => {
                if self.generation.load(Ordering::Acquire) != generation {
                    debug!("Permission cache invalidated during resolution, not storing");
                    return;
                }
                *guard = Some(entry);
                debug!("Permission cache refreshed");
            }
            Err(_) => warn!("Permission cache lock poisoned, serving uncached permissions"),
        }
    }

    /// Shorthand for a route check against the cached set.
    pub fn can_access_route(&self, roles: &[RoleAssignment], route: &str) -> bool {
        let permissions = self.permissions(roles);
        self.resolver.can_access_route(&permissions, route)
    }

    /// Drops the cached entry.
    pub fn invalidate(&self) {
        let mut guard = match self.entry.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Reacts to a session lifecycle event.
    pub fn handle(&self, event: SessionEvent) {
        debug!(?event, "Invalidating permission cache");
        self.invalidate();
    }

    /// Returns whether an entry is currently cached.
    pub fn is_warm(&self) -> bool {
        self.entry.read().is_ok_and(|guard| guard.is_some())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }
}
