//! HTTP client for the QBank reports API
//!
//! Issues the four read-only report queries for a fixed calendar-year
//! range, carrying the student's bearer credential on every call.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{Error, Result};

use super::normalize;
use super::types::{AccuracyEvolution, AnsweredSummary, DailyAnswered};
use super::QuestionReports;

/// HTTP client for the QBank reports API.
#[derive(Debug)]
pub struct QBankClient {
    http_client: reqwest::Client,
    base_url: String,
    /// Inclusive year bounds sent as `startAt`/`endAt`
    start_at: String,
    end_at: String,
}

impl QBankClient {
    /// Create a client for one student's bearer credential and report year.
    ///
    /// Returns an error if the credential cannot be carried as an HTTP
    /// header or the underlying client cannot be constructed.
    pub fn new(config: &ApiConfig, token: &str, year: i32) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = format!("Bearer {}", token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|_| Error::Auth("credential contains invalid characters".to_string()))?,
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            start_at: format!("{}-01-01", year),
            end_at: format!("{}-12-31", year),
        })
    }

    /// GET one report endpoint, returning the raw JSON payload.
    ///
    /// 401/403 become authentication errors so the caller can prompt
    /// for re-authentication; any other non-success status surfaces as
    /// a typed fetch failure carrying the status and a body snippet.
    async fn fetch_report(&self, path: &str) -> Result<Value> {
        let url = format!(
            "{}{}?startAt={}&endAt={}",
            self.base_url, path, self.start_at, self.end_at
        );

        tracing::debug!(url = %url, "fetching report");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_else(|_| "unknown".to_string());
            let snippet: String = body.chars().take(256).collect();
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                Err(Error::Auth(format!(
                    "reports API rejected the credential ({})",
                    status
                )))
            } else {
                Err(Error::UpstreamFetch {
                    status: status.as_u16(),
                    body: snippet,
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl QuestionReports for QBankClient {
    async fn daily_answered(&self) -> Result<Vec<DailyAnswered>> {
        let raw = self.fetch_report("/reports/questions/answered/daily").await?;
        Ok(normalize::normalize_daily(&raw))
    }

    async fn answered_summary(&self) -> Result<AnsweredSummary> {
        let raw = self.fetch_report("/reports/questions/answered").await?;
        Ok(normalize::normalize_answered(&raw))
    }

    async fn ever_wrong_count(&self) -> Result<i64> {
        let raw = self
            .fetch_report("/reports/questions/ever-answered-wrong")
            .await?;
        Ok(normalize::normalize_ever_wrong(&raw))
    }

    async fn accuracy_evolution(&self) -> Result<AccuracyEvolution> {
        let raw = self
            .fetch_report("/reports/graph/right-answers-evolution")
            .await?;
        Ok(normalize::normalize_evolution(&raw))
    }
}
