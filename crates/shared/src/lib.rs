//! Shared utilities for the EventHub backend.
//!
//! This crate contains code used across layers:
//! - JWT token generation and validation
//! - Password hashing
//! - Custom request validators

pub mod jwt;
pub mod password;
pub mod validation;
