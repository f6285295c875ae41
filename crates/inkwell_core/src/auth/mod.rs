//! Authentication and ownership scoping.
//!
//! # Responsibility
//! - Hash and verify credentials.
//! - Resolve session identities into users and gate page/block access.

pub mod password;
pub mod scope;

pub use password::{hash_password, verify_password};
pub use scope::{
    authorize_block_access, authorize_page_access, owned_block, owned_page,
    require_current_user, resolve_current_user, Denial,
};
