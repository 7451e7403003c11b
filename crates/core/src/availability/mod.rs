//! Availability aggregation engine
//!
//! Data flow: service → provider adapters → raw UTC busy periods → merge →
//! timezone rendering → slot generation → ranking.

pub mod fan_out;
pub mod merge;
pub mod ranker;
pub mod service;
pub mod slots;
pub mod timezone;
