//! Calendar provider integrations
//!
//! Free/busy adapters for:
//! - Google Calendar
//! - Microsoft Calendar (Outlook/365)
//!
//! plus OAuth token brokering for provider calls.

pub mod config;
pub mod providers;
pub mod token;

pub use config::CalendarApiConfig;
pub use providers::{create_provider, default_registry, GoogleProvider, MicrosoftProvider};
pub use token::TokenBroker;
