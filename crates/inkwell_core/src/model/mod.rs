//! Domain model for users, pages and blocks.
//!
//! # Responsibility
//! - Define the canonical records shared by repositories and services.
//! - Own content-shape and title rules that hold on every write.
//!
//! # Invariants
//! - Every record is identified by a stable v4 UUID.
//! - Ownership flows User -> Page -> Block; blocks carry no owner field.

pub mod block;
pub mod content;
pub mod page;
pub mod user;
