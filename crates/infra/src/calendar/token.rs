//! OAuth token brokering for provider calls
//!
//! Connections arrive from the store with possibly-expired access tokens.
//! The broker hands back the stored token while it is comfortably valid,
//! otherwise refreshes it against the provider's token endpoint and
//! reports the rotated credentials through the injected sink so the
//! owning store can persist them. Initial consent flows live outside this
//! engine entirely.

use std::sync::Arc;

use async_trait::async_trait;
use availo_core::ports::{AccessTokenSource, TokenRefreshSink};
use availo_domain::constants::TOKEN_REFRESH_SKEW_SECONDS;
use availo_domain::{
    AvailoError, CalendarConnection, OAuthCredentials, ProviderKind, Result,
};
use chrono::{Duration, Utc};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use super::config::CalendarApiConfig;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Token broker with refresh-on-expiry
pub struct TokenBroker {
    http: HttpClient,
    config: CalendarApiConfig,
    sink: Arc<dyn TokenRefreshSink>,
}

impl TokenBroker {
    pub fn new(
        http: HttpClient,
        config: CalendarApiConfig,
        sink: Arc<dyn TokenRefreshSink>,
    ) -> Self {
        Self { http, config, sink }
    }

    fn token_url(&self, provider: ProviderKind) -> &str {
        match provider {
            ProviderKind::Google => &self.config.google_token_url,
            ProviderKind::Microsoft => &self.config.microsoft_token_url,
        }
    }

    async fn refresh(&self, connection: &CalendarConnection) -> Result<OAuthCredentials> {
        let (client_id, client_secret) = client_credentials(connection.provider)?;

        let mut form = vec![
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", connection.credentials.refresh_token.clone()),
            ("grant_type", "refresh_token".to_string()),
        ];
        if connection.provider == ProviderKind::Microsoft {
            form.push(("scope", "Calendars.Read offline_access".to_string()));
        }

        let request = self
            .http
            .request(Method::POST, self.token_url(connection.provider))
            .form(&form);
        let response = self.http.send(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InfraError(AvailoError::Auth(format!(
                "Token refresh failed ({}): {}",
                status, error_text
            )))
            .into());
        }

        let refreshed: TokenRefreshResponse = response.json().await.map_err(|e| {
            InfraError(AvailoError::Auth(format!("Failed to parse token response: {}", e)))
        })?;

        Ok(OAuthCredentials {
            access_token: refreshed.access_token,
            refresh_token: connection.credentials.refresh_token.clone(),
            expires_at: Utc::now() + Duration::seconds(refreshed.expires_in),
        })
    }
}

#[async_trait]
impl AccessTokenSource for TokenBroker {
    /// Stored token while valid; refresh plus sink notification otherwise.
    async fn access_token(&self, connection: &CalendarConnection) -> Result<String> {
        let expiry_floor = Utc::now() + Duration::seconds(TOKEN_REFRESH_SKEW_SECONDS);
        if connection.credentials.expires_at > expiry_floor {
            return Ok(connection.credentials.access_token.clone());
        }

        debug!(
            connection_id = %connection.id,
            provider = %connection.provider,
            "access token expired or expiring; refreshing"
        );

        let refreshed = self.refresh(connection).await?;
        self.sink.token_refreshed(&connection.id, &refreshed).await?;
        Ok(refreshed.access_token)
    }
}

/// OAuth client credentials come from the environment, per provider.
fn client_credentials(provider: ProviderKind) -> Result<(String, String)> {
    let (id_var, secret_var) = match provider {
        ProviderKind::Google => ("GOOGLE_CALENDAR_CLIENT_ID", "GOOGLE_CALENDAR_CLIENT_SECRET"),
        ProviderKind::Microsoft => {
            ("MICROSOFT_CALENDAR_CLIENT_ID", "MICROSOFT_CALENDAR_CLIENT_SECRET")
        }
    };

    let client_id =
        std::env::var(id_var).map_err(|_| AvailoError::Auth(format!("{id_var} not set")))?;
    let client_secret = std::env::var(secret_var)
        .map_err(|_| AvailoError::Auth(format!("{secret_var} not set")))?;

    Ok((client_id, client_secret))
}

#[derive(Debug, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
    expires_in: i64,
}
