//! # Availo Domain
//!
//! Business domain types for the availability aggregation engine.
//!
//! This crate contains:
//! - Domain data types (CalendarConnection, BusyPeriod, TimeSlot, etc.)
//! - Domain error types and Result definitions
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Availo crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
