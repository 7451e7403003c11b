//! # Availo Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The availability aggregation engine (merge, slots, timezone, ranking)
//! - Port/adapter interfaces (traits)
//! - The unified aggregation service
//!
//! ## Architecture Principles
//! - Only depends on `availo-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod availability;
pub mod ports;

// Re-export specific items to avoid ambiguity
pub use availability::merge::merge;
pub use availability::ranker::{format_slot, rank_slots};
pub use availability::service::{AvailabilityService, ProviderRegistry};
pub use availability::slots::generate_slots;
pub use availability::timezone::{end_of_day, resolve_timezone, start_of_day, to_zoned};
pub use ports::{
    AccessTokenSource, AvailabilityProvider, ConnectionStore, FreeBusyQuery, TokenRefreshSink,
};
