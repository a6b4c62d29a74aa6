//! Domain service seams.

pub mod notifier;

pub use notifier::{NoopNotifier, RegistrationNotifier};
