//! Kani bounded model checking proofs for permission queries.
//!
//! - Proof #1: Empty any-query is never satisfied
//! - Proof #2: Empty all-query is always satisfied
//! - Proof #3: Unmapped routes are open to every permission set
//! - Proof #4: Union never loses a grant

use crate::{Permission, PermissionSet, RouteTable};

fn any_permission() -> Permission {
    let index: usize = kani::any();
    kani::assume(index < Permission::ALL.len());
    Permission::ALL[index]
}

fn any_small_set() -> PermissionSet {
    let mut set = PermissionSet::empty();
    if kani::any() {
        set.grant(any_permission());
    }
    if kani::any() {
        set.grant(any_permission());
    }
    set
}

//=============================================================================
// Proof #1 / #2: Vacuous truth asymmetry
//=============================================================================

#[cfg(kani)]
#[kani::proof]
#[kani::unwind(4)]
fn verify_empty_query_asymmetry() {
    let set = any_small_set();

    assert!(!set.has_any(&[]));
    assert!(set.has_all(&[]));
}

//=============================================================================
// Proof #3: Default-allow for unmapped routes
//=============================================================================

#[cfg(kani)]
#[kani::proof]
#[kani::unwind(4)]
fn verify_unmapped_route_open() {
    let routes = RouteTable::empty().with_route("/dashboard/staff", Permission::Staff);
    let set = any_small_set();

    assert!(routes.can_access(&set, "/dashboard/help"));
    assert_eq!(
        routes.can_access(&set, "/dashboard/staff"),
        set.has(Permission::Staff)
    );
}

//=============================================================================
// Proof #4: Union monotonicity
//=============================================================================

#[cfg(kani)]
#[kani::proof]
#[kani::unwind(4)]
fn verify_union_keeps_grants() {
    let a = any_small_set();
    let b = any_small_set();
    let p = any_permission();

    let u = a.union(&b);
    if a.has(p) || b.has(p) {
        assert!(u.has(p));
    }
}
