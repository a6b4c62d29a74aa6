//! Application services.

pub mod auth;
pub mod live;

pub use auth::{AuthError, AuthService};
pub use live::LiveUpdateHub;
