//! Calendar API endpoint configuration

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const MICROSOFT_GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";
const MICROSOFT_TOKEN_URL: &str =
    "https://login.microsoftonline.com/common/oauth2/v2.0/token";

/// Endpoints for the calendar backends.
///
/// Defaults target the live APIs; tests point the bases at a local mock
/// server instead.
#[derive(Debug, Clone)]
pub struct CalendarApiConfig {
    pub google_api_base: String,
    pub google_token_url: String,
    pub microsoft_graph_base: String,
    pub microsoft_token_url: String,
}

impl Default for CalendarApiConfig {
    fn default() -> Self {
        Self {
            google_api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
            google_token_url: GOOGLE_TOKEN_URL.to_string(),
            microsoft_graph_base: MICROSOFT_GRAPH_API_BASE.to_string(),
            microsoft_token_url: MICROSOFT_TOKEN_URL.to_string(),
        }
    }
}

impl CalendarApiConfig {
    /// Config with every endpoint rooted at one base URL (mock servers).
    pub fn with_base(base: &str) -> Self {
        Self {
            google_api_base: base.to_string(),
            google_token_url: format!("{base}/google-token"),
            microsoft_graph_base: base.to_string(),
            microsoft_token_url: format!("{base}/microsoft-token"),
        }
    }
}
