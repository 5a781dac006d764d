use std::path::{Path, PathBuf};

use crate::aggregate::{self, DepartmentBreakdown, SentimentCounts};
use crate::client::AnalysisService;
use crate::error::Result;
use crate::models::FeedbackRecord;
use crate::submit::InFlight;

pub const EXPORT_MEDIA_TYPE: &str = "text/csv";

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub file_name: String,
    pub media_type: &'static str,
    pub path: PathBuf,
    pub bytes: usize,
    pub rows: usize,
}

/// Records held for the lifetime of one dashboard session, newest first.
#[derive(Debug, Default)]
pub struct FeedbackSession {
    records: Vec<FeedbackRecord>,
    export_in_flight: InFlight,
}

impl FeedbackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn replace(&mut self, records: Vec<FeedbackRecord>) {
        self.records = records;
    }

    pub fn prepend(&mut self, record: FeedbackRecord) {
        self.records.insert(0, record);
    }

    /// The batch keeps its own order ahead of existing records.
    pub fn prepend_all(&mut self, mut records: Vec<FeedbackRecord>) {
        records.append(&mut self.records);
        self.records = records;
    }

    /// Prepends freshly analyzed records onto a list that was loaded after
    /// they were stored. Records whose id is already present are skipped;
    /// records without an id are always added. Returns how many were added.
    pub fn merge_submitted(&mut self, records: Vec<FeedbackRecord>) -> usize {
        let fresh: Vec<FeedbackRecord> = records
            .into_iter()
            .filter(|record| {
                record.id.is_none() || !self.records.iter().any(|stored| stored.id == record.id)
            })
            .collect();
        let added = fresh.len();
        self.prepend_all(fresh);
        added
    }

    pub fn distribution(&self) -> SentimentCounts {
        aggregate::sentiment_distribution(&self.records)
    }

    pub fn breakdown(&self) -> DepartmentBreakdown {
        aggregate::department_breakdown(&self.records)
    }

    /// Seeds the session from the service's stored feedback. A failed load
    /// leaves the session empty.
    pub async fn load<S: AnalysisService>(&mut self, service: &S) {
        match service.list_feedback().await {
            Ok(records) => {
                log::info!("loaded {} stored feedback records", records.len());
                self.replace(records);
            }
            Err(err) => {
                log::error!("error fetching feedback data: {err}");
                self.replace(Vec::new());
            }
        }
    }

    /// Writes the service's CSV export into `dir` exactly as received.
    pub async fn export<S: AnalysisService>(
        &self,
        service: &S,
        dir: &Path,
        file_name: &str,
    ) -> Result<ExportedFile> {
        let _token = self.export_in_flight.try_acquire()?;
        let csv = service.export_csv().await?;

        let path = dir.join(file_name);
        tokio::fs::write(&path, csv.as_bytes()).await?;

        let rows = count_rows(&csv)?;
        log::info!("exported {rows} rows to {}", path.display());

        Ok(ExportedFile {
            file_name: file_name.to_string(),
            media_type: EXPORT_MEDIA_TYPE,
            path,
            bytes: csv.len(),
            rows,
        })
    }
}

/// Data rows in a CSV payload with a header line.
pub fn count_rows(csv: &str) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv.as_bytes());
    let mut rows = 0usize;
    for record in reader.records() {
        record?;
        rows += 1;
    }
    Ok(rows)
}
