//! # TikiChat Server Library
//!
//! Chat room membership and occupancy backend:
//! - Chat room creation, discovery and ranking
//! - Joining and leaving rooms under a capacity limit
//! - Local and social sign-up, JWT login with refresh rotation
//! - Host subscriptions (follow / unfollow)
//!
//! ## Architecture
//!
//! - **Domain Layer**: Entities and repository traits
//! - **Application Layer**: Transactional services and DTOs
//! - **Infrastructure Layer**: PostgreSQL and in-memory stores, metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! tikichat_server/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities and repository traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Stores, unit of work, metrics
//! +-- presentation/   HTTP routes, handlers, middleware
//! +-- shared/         Errors, snowflake IDs, validation
//! ```

pub mod config;

pub mod domain;

pub mod application;

pub mod infrastructure;

pub mod presentation;

pub mod shared;

// Application startup and state management
pub mod startup;

pub mod telemetry;
