use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::models::{AnalyzeRequest, CsvPayload, FeedbackRecord};

pub const ANALYZE_FAILED: &str = "Failed to analyze comment";
pub const UPLOAD_FAILED: &str = "Failed to upload CSV";
pub const EXPORT_FAILED: &str = "Failed to export CSV";
pub const LIST_FAILED: &str = "Failed to load feedback";

/// The external sentiment-analysis backend.
#[allow(async_fn_in_trait)]
pub trait AnalysisService {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<FeedbackRecord>;
    async fn analyze_csv(&self, payload: &CsvPayload) -> Result<Vec<FeedbackRecord>>;
    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>>;
    /// Raw CSV text of everything the service has stored.
    async fn export_csv(&self) -> Result<String>;
}

pub struct HttpAnalysisService {
    client: Client,
    base_url: String,
}

impl HttpAnalysisService {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.service_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<FeedbackRecord> {
        log::debug!("POST /api/analyze ({} chars)", request.comment.len());
        let response = self
            .client
            .post(self.url("/api/analyze"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            log::warn!("analyze returned {}", response.status());
            return Err(DashboardError::service(ANALYZE_FAILED));
        }

        Ok(response.json::<FeedbackRecord>().await?)
    }

    async fn analyze_csv(&self, payload: &CsvPayload) -> Result<Vec<FeedbackRecord>> {
        log::debug!(
            "POST /api/analyze-csv ({}, {} bytes)",
            payload.file_name,
            payload.contents.len()
        );
        let part = Part::bytes(payload.contents.clone())
            .file_name(payload.file_name.clone())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/api/analyze-csv"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log::warn!("analyze-csv returned {status}");
            return Err(DashboardError::service(upload_error_message(&body)));
        }

        Ok(records_field(&serde_json::from_str(&body)?, "results"))
    }

    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>> {
        let response = self.client.get(self.url("/api/feedback")).send().await?;
        if !response.status().is_success() {
            log::warn!("feedback listing returned {}", response.status());
            return Err(DashboardError::service(LIST_FAILED));
        }

        let body: Value = response.json().await?;
        Ok(records_field(&body, "feedback"))
    }

    async fn export_csv(&self) -> Result<String> {
        let response = self.client.get(self.url("/api/export-csv")).send().await?;
        if !response.status().is_success() {
            log::warn!("export returned {}", response.status());
            return Err(DashboardError::service(EXPORT_FAILED));
        }

        let body: Value = response.json().await?;
        match body.get("csv").and_then(Value::as_str) {
            Some(csv) => Ok(csv.to_string()),
            None => Err(DashboardError::service(EXPORT_FAILED)),
        }
    }
}

/// Service-provided `error` text, else the generic upload failure.
pub fn upload_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| UPLOAD_FAILED.to_string())
}

/// Pulls a record array out of a response body. A missing or non-array
/// field reads as empty; elements that do not parse are skipped.
pub fn records_field(body: &Value, field: &str) -> Vec<FeedbackRecord> {
    let Some(items) = body.get(field).and_then(Value::as_array) else {
        log::warn!("response field {field:?} is missing or not an array");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| {
            match serde_json::from_value::<FeedbackRecord>(item.clone()) {
                Ok(record) => Some(record),
                Err(err) => {
                    log::warn!("skipping {field}[{position}]: {err}");
                    None
                }
            }
        })
        .collect()
}
