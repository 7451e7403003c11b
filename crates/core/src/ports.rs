//! Port interfaces consumed by the availability service
//!
//! Everything the engine needs from the outside world (provider APIs, the
//! connection store, token refresh) arrives through these traits, so the
//! service is testable with in-memory fakes.

use async_trait::async_trait;
use availo_domain::{
    BusyPeriod, CalendarConnection, OAuthCredentials, ProviderKind, Result,
};
use chrono::{DateTime, Utc};

/// Parameters for one provider free/busy fetch
#[derive(Debug, Clone)]
pub struct FreeBusyQuery {
    pub access_token: String,
    pub calendar_ids: Vec<String>,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
}

/// Trait for calendar backend adapters
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Which backend this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Fetch busy periods for the given calendars within the window.
    ///
    /// Returned periods are always UTC instants. Events missing a start or
    /// end are dropped at this boundary.
    async fn fetch_busy_periods(&self, query: &FreeBusyQuery) -> Result<Vec<BusyPeriod>>;
}

/// Trait for the external store of calendar connections
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// All calendar connections for an account, connected or not.
    async fn connections_for_account(&self, account_id: &str)
        -> Result<Vec<CalendarConnection>>;
}

/// Trait resolving a usable access token for a connection
///
/// Implementations may refresh expired tokens; the service never inspects
/// credential state itself.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self, connection: &CalendarConnection) -> Result<String>;
}

/// Capability invoked when a connection's access token is rotated
///
/// Supplied explicitly so persistence of refreshed tokens is a visible
/// collaboration instead of a side effect buried in client construction.
#[async_trait]
pub trait TokenRefreshSink: Send + Sync {
    async fn token_refreshed(
        &self,
        connection_id: &str,
        credentials: &OAuthCredentials,
    ) -> Result<()>;
}
