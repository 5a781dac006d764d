use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::client::AnalysisService;
use crate::error::{DashboardError, Result};
use crate::models::{AnalyzeRequest, CsvPayload, FeedbackRecord};

pub const EMPTY_COMMENT: &str = "Please enter a comment";
pub const NO_FILE: &str = "Please select a CSV file";
pub const NOT_CSV: &str = "Please upload a CSV file";

/// Admits one pending request at a time.
#[derive(Debug, Default)]
pub struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    pub fn try_acquire(&self) -> Result<InFlightToken<'_>> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(DashboardError::Busy);
        }
        Ok(InFlightToken { flag: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the guard when dropped, whatever the request's outcome.
pub struct InFlightToken<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightToken<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct ManualEntry {
    in_flight: InFlight,
}

impl ManualEntry {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.in_flight.is_busy()
    }

    pub async fn submit<S: AnalysisService>(
        &self,
        service: &S,
        comment: &str,
        department: Option<&str>,
    ) -> Result<FeedbackRecord> {
        let request = build_request(comment, department)?;
        let _token = self.in_flight.try_acquire()?;
        service.analyze(&request).await
    }
}

fn build_request(comment: &str, department: Option<&str>) -> Result<AnalyzeRequest> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(DashboardError::validation(EMPTY_COMMENT));
    }

    let department = department
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok(AnalyzeRequest {
        comment: comment.to_string(),
        department,
    })
}

#[derive(Debug, Default)]
pub struct CsvUpload {
    in_flight: InFlight,
}

impl CsvUpload {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Records come back in the order the service returned them.
    pub async fn submit<S: AnalysisService>(
        &self,
        service: &S,
        file: Option<&Path>,
    ) -> Result<Vec<FeedbackRecord>> {
        let file = file.ok_or_else(|| DashboardError::validation(NO_FILE))?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        if !file_name.ends_with(".csv") {
            return Err(DashboardError::validation(NOT_CSV));
        }

        let _token = self.in_flight.try_acquire()?;
        let contents = tokio::fs::read(file).await?;
        let payload = CsvPayload {
            file_name,
            contents,
        };

        let records = service.analyze_csv(&payload).await?;
        log::info!("{} analyzed {} rows", payload.file_name, records.len());
        Ok(records)
    }
}
