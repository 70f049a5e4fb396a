//! Version command implementation.

use carebase_acl::{Permission, RoleSlug};

use crate::style::print_labeled;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

pub fn run() {
    println!("{NAME} {VERSION}");
    println!();
    println!("Role-based access control for the clinic dashboard.");
    println!();
    println!("Tables:");
    print_labeled("Roles", &RoleSlug::ALL.len().to_string());
    print_labeled("Permissions", &Permission::ALL.len().to_string());
    println!();
    println!("Build info:");
    print_labeled("Target", std::env::consts::ARCH);
    print_labeled("OS", std::env::consts::OS);
}
