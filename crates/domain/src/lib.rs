//! Domain layer for the EventHub backend.
//!
//! Contains the domain models, request/response DTOs, and the notifier
//! capability used by the registration handlers.

pub mod models;
pub mod services;
