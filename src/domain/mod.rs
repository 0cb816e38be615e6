//! # Domain Layer
//!
//! The domain layer contains the core business types of the chat room
//! service. It is independent of any external frameworks or infrastructure
//! concerns.
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Occupancy is only changed through the repository's atomic operations

pub mod entities;

// Re-export commonly used types
pub use entities::*;
