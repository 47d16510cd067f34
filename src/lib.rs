//! # campus-events
//!
//! REST backend for a campus events platform. Organizations host events
//! at buildings; profiles join organizations as members or admins; every
//! event mutation is authorized against the hosting organization and
//! recorded in an append-only audit trail.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers + DTO validation (api/)
//!     │
//!     ├── Services (service/)
//!     │     ├── MembershipAuthority (fail-closed role checks)
//!     │     ├── EventService (guarded, audited mutations)
//!     │     └── delete_building_cascade
//!     │
//!     ├── IdentityResolver (auth/)
//!     │
//!     └── Store (persistence/)
//!           ├── PgStore (PostgreSQL via sqlx)
//!           └── MemoryStore
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
