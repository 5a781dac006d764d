use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Maps a service label onto a bucket. Anything unrecognized lands in
    /// `Neutral` so a bad label can never open a fourth bucket.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "neutral" => Sentiment::Neutral,
            other => {
                log::warn!("unrecognized sentiment label {other:?}, counting it as neutral");
                Sentiment::Neutral
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(label) => Ok(Sentiment::from_label(&label)),
            other => {
                log::warn!("non-string sentiment {other}, counting it as neutral");
                Ok(Sentiment::Neutral)
            }
        }
    }
}

fn missing_sentiment() -> Sentiment {
    log::warn!("record without sentiment, counting it as neutral");
    Sentiment::Neutral
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default = "missing_sentiment")]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl FeedbackRecord {
    /// Department as given, or `None` when missing or blank.
    pub fn department(&self) -> Option<&str> {
        self.department
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Department label used for grouping.
    pub fn department_label(&self) -> &str {
        self.department().unwrap_or(UNKNOWN_DEPARTMENT)
    }
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// A CSV file ready to be posted to `/api/analyze-csv`.
#[derive(Debug, Clone)]
pub struct CsvPayload {
    pub file_name: String,
    pub contents: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_record() {
        let record: FeedbackRecord = serde_json::from_str(
            r#"{"id":7,"comment":"Great course","department":"CS","sentiment":"positive","score":0.8,"timestamp":"2025-03-01 10:00:00"}"#,
        )
        .unwrap();

        assert_eq!(record.id, Some(7));
        assert_eq!(record.sentiment, Sentiment::Positive);
        assert_eq!(record.department_label(), "CS");
        assert_eq!(record.timestamp.as_deref(), Some("2025-03-01 10:00:00"));
    }

    #[test]
    fn unknown_sentiment_falls_back_to_neutral() {
        let record: FeedbackRecord =
            serde_json::from_str(r#"{"comment":"hm","sentiment":"mixed","score":0.1}"#).unwrap();
        assert_eq!(record.sentiment, Sentiment::Neutral);

        let record: FeedbackRecord =
            serde_json::from_str(r#"{"comment":"hm","sentiment":null}"#).unwrap();
        assert_eq!(record.sentiment, Sentiment::Neutral);
        assert_eq!(record.score, 0.0);

        let record: FeedbackRecord = serde_json::from_str(r#"{"comment":"hm"}"#).unwrap();
        assert_eq!(record.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn non_string_sentiment_falls_back_to_neutral() {
        let record: FeedbackRecord = serde_json::from_str(
            r#"{"id":7,"comment":"Great course","sentiment":1,"score":0.8}"#,
        )
        .unwrap();
        assert_eq!(record.id, Some(7));
        assert_eq!(record.sentiment, Sentiment::Neutral);

        let record: FeedbackRecord =
            serde_json::from_str(r#"{"comment":"odd","sentiment":{"label":"positive"}}"#)
                .unwrap();
        assert_eq!(record.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(Sentiment::from_label(" Negative "), Sentiment::Negative);
        assert_eq!(Sentiment::from_label("POSITIVE"), Sentiment::Positive);
    }

    #[test]
    fn blank_department_is_unknown() {
        let record: FeedbackRecord = serde_json::from_str(
            r#"{"comment":"ok","department":"   ","sentiment":"neutral","score":0.0}"#,
        )
        .unwrap();
        assert_eq!(record.department(), None);
        assert_eq!(record.department_label(), UNKNOWN_DEPARTMENT);
    }

    #[test]
    fn analyze_request_omits_missing_department() {
        let body = serde_json::to_value(AnalyzeRequest {
            comment: "Nice".to_string(),
            department: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"comment": "Nice"}));
    }
}
