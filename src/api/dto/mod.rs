//! Data Transfer Objects for REST request/response serialization.
//!
//! Request DTOs validate themselves into domain values (`into_new`,
//! `into_patch`, ...) so handlers stay thin.

pub mod building_dto;
pub mod common_dto;
pub mod event_dto;
pub mod membership_dto;
pub mod organization_dto;
pub mod profile_dto;

pub use building_dto::*;
pub use common_dto::*;
pub use event_dto::*;
pub use membership_dto::*;
pub use organization_dto::*;
pub use profile_dto::*;
