//! Provider adapters and factory

pub mod google;
pub mod microsoft;

use std::sync::Arc;

use availo_core::ports::AvailabilityProvider;
use availo_core::ProviderRegistry;
use availo_domain::ProviderKind;
pub use google::GoogleProvider;
pub use microsoft::MicrosoftProvider;

use super::config::CalendarApiConfig;
use crate::http::HttpClient;

/// Create the adapter for a provider.
///
/// The match is exhaustive: adding a backend extends [`ProviderKind`] and
/// fails compilation here until an adapter exists.
pub fn create_provider(
    kind: ProviderKind,
    http: HttpClient,
    config: &CalendarApiConfig,
) -> Arc<dyn AvailabilityProvider> {
    match kind {
        ProviderKind::Google => Arc::new(GoogleProvider::new(http, config)),
        ProviderKind::Microsoft => Arc::new(MicrosoftProvider::new(http, config)),
    }
}

/// Registry with every supported backend registered.
pub fn default_registry(http: &HttpClient, config: &CalendarApiConfig) -> ProviderRegistry {
    ProviderRegistry::new()
        .register(create_provider(ProviderKind::Google, http.clone(), config))
        .register(create_provider(ProviderKind::Microsoft, http.clone(), config))
}
