//! Entity definitions (database row mappings).

pub mod event;
pub mod registration;
pub mod user;

pub use event::{EventEntity, EventWithStatsEntity};
pub use registration::{
    RegistrationEntity, RegistrationWithEventEntity, RegistrationWithUserEntity,
};
pub use user::UserEntity;
