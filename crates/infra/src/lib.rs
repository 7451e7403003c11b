//! # Availo Infra
//!
//! Infrastructure adapters for the availability engine:
//! - Retrying HTTP client
//! - Google and Microsoft calendar provider adapters
//! - OAuth token brokering (refresh-on-expiry)
//! - Conversions from external errors into domain errors

pub mod calendar;
pub mod errors;
pub mod http;

pub use calendar::config::CalendarApiConfig;
pub use calendar::providers::{
    create_provider, default_registry, GoogleProvider, MicrosoftProvider,
};
pub use calendar::token::TokenBroker;
pub use errors::InfraError;
pub use http::HttpClient;
