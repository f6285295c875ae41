//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate authorization, repositories and word accounting into
//!   request-sized operations.
//! - Take the resolved `User` as an explicit argument; there is no ambient
//!   current-user state.

pub mod account_service;
pub mod block_service;
pub mod error;
pub mod page_service;
pub mod stats_service;
