//! HTTP client for the Plaid asset report API.

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use finvault_core::errors::{Error, Result};
use finvault_core::plaid::{AssetReport, AssetReportClient, AssetReportToken};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// History window requested for new asset reports.
pub const DEFAULT_DAYS_REQUESTED: u32 = 730;

const PLAID_SANDBOX_BASE: &str = "https://sandbox.plaid.com";
const PLAID_DEVELOPMENT_BASE: &str = "https://development.plaid.com";
const PLAID_PRODUCTION_BASE: &str = "https://production.plaid.com";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaidEnvironment {
    #[default]
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => PLAID_SANDBOX_BASE,
            Self::Development => PLAID_DEVELOPMENT_BASE,
            Self::Production => PLAID_PRODUCTION_BASE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for PlaidEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaidEnvironment {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(Error::invalid_input(format!(
                "Invalid Plaid environment: {}. Expected sandbox, development, or production.",
                other
            ))),
        }
    }
}

/// Credentials and endpoint settings for the Plaid API.
#[derive(Clone)]
pub struct PlaidConfig {
    pub client_id: String,
    pub secret: String,
    pub environment: PlaidEnvironment,
    /// Overrides the environment's host (used for tests and proxies).
    pub base_url: Option<String>,
    pub days_requested: u32,
    pub timeout: Duration,
}

impl PlaidConfig {
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            secret: secret.into(),
            environment: PlaidEnvironment::default(),
            base_url: None,
            days_requested: DEFAULT_DAYS_REQUESTED,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_environment(mut self, environment: PlaidEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_days_requested(mut self, days_requested: u32) -> Self {
        self.days_requested = days_requested;
        self
    }

    fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

impl fmt::Debug for PlaidConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaidConfig")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("days_requested", &self.days_requested)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateReportRequest<'a> {
    client_id: &'a str,
    secret: &'a str,
    access_tokens: [&'a str; 1],
    days_requested: u32,
    options: CreateReportOptions,
}

#[derive(Debug, Serialize)]
struct CreateReportOptions {
    client_report_id: String,
    user: ReportUser,
}

#[derive(Debug, Serialize)]
struct ReportUser {
    client_user_id: String,
}

#[derive(Debug, Serialize)]
struct GetReportRequest<'a> {
    client_id: &'a str,
    secret: &'a str,
    asset_report_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct GetReportResponse {
    report: AssetReport,
}

/// Error body returned by Plaid on non-2xx responses.
#[derive(Debug, Deserialize)]
struct PlaidErrorResponse {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the Plaid asset report endpoints.
///
/// ```ignore
/// let client = PlaidApiClient::new(PlaidConfig::new("client-id", "secret"))?;
/// let token = client.create_asset_report("access-sandbox-...", 42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PlaidApiClient {
    client: reqwest::Client,
    base_url: String,
    config: PlaidConfig,
}

impl PlaidApiClient {
    pub fn new(config: PlaidConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.resolved_base_url(),
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[Plaid] POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Request failed: {}", e)))?;

        self.parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<PlaidErrorResponse>(&body) {
                let msg = match (err.error_code, err.error_message) {
                    (Some(code), Some(message)) => format!("{}: {}", code, message),
                    (Some(code), None) => code,
                    (None, Some(message)) => message,
                    (None, None) => format!("HTTP {}", status),
                };
                return Err(Error::Provider(msg));
            }
            return Err(Error::Provider(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Provider(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl AssetReportClient for PlaidApiClient {
    async fn create_asset_report(
        &self,
        access_token: &str,
        user_id: i32,
    ) -> Result<AssetReportToken> {
        let request = CreateReportRequest {
            client_id: &self.config.client_id,
            secret: &self.config.secret,
            access_tokens: [access_token],
            days_requested: self.config.days_requested,
            options: CreateReportOptions {
                client_report_id: format!("finvault-{}", user_id),
                user: ReportUser {
                    client_user_id: user_id.to_string(),
                },
            },
        };
        self.post("/asset_report/create", &request).await
    }

    async fn get_asset_report(&self, asset_report_token: &str) -> Result<AssetReport> {
        let request = GetReportRequest {
            client_id: &self.config.client_id,
            secret: &self.config.secret,
            asset_report_token,
        };
        let response: GetReportResponse = self.post("/asset_report/get", &request).await?;
        Ok(response.report)
    }
}
