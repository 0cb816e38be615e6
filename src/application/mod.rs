//! Application Layer
//!
//! Transactional services over the unit of work, plus the request and
//! response DTOs the HTTP layer speaks.

pub mod dto;
pub mod services;
