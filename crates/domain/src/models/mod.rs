//! Domain model definitions.

pub mod event;
pub mod registration;
pub mod user;

pub use event::Event;
pub use registration::Registration;
pub use user::{User, UserRole};
