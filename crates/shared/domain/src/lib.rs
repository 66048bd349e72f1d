//! # Domain Models
//!
//! Pure data shared by every crate: configuration, registration records, constants
//! and the feature slice registry. No I/O and no business rules live here.

pub mod config;
pub mod constants;
pub mod registration;
pub mod registry;
