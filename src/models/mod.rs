pub mod auth;
pub mod entity;
pub mod stats;

pub use auth::AuthTokenInfo;
pub use entity::{resolve_field, Entity, EntityKind, FieldValue};
