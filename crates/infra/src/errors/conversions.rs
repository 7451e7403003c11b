//! Conversions from external infrastructure errors into domain errors.

use availo_domain::AvailoError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AvailoError);

impl From<InfraError> for AvailoError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AvailoError> for InfraError {
    fn from(value: AvailoError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AvailoError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        if value.is_timeout() {
            return InfraError(AvailoError::Network("HTTP request timed out".into()));
        }

        if value.is_connect() {
            return InfraError(AvailoError::Network("HTTP connection failure".into()));
        }

        if let Some(status) = value.status() {
            let code = status.as_u16();
            let message = format!(
                "HTTP {} {}",
                code,
                status.canonical_reason().unwrap_or("unknown status")
            );

            let mapped = match code {
                401 | 403 => AvailoError::Auth(message),
                404 => AvailoError::NotFound(message),
                429 => AvailoError::Network(message),
                400..=499 => AvailoError::InvalidInput(message),
                _ => AvailoError::Network(message),
            };
            return InfraError(mapped);
        }

        InfraError(AvailoError::Network(value.to_string()))
    }
}
