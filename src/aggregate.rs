use std::collections::HashMap;
use std::ops::AddAssign;

use crate::models::{FeedbackRecord, Sentiment};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn new(positive: usize, negative: usize, neutral: usize) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Share of `sentiment` in percent; zero when there are no counts.
    pub fn percent(&self, sentiment: Sentiment) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(sentiment) as f64 * 100.0 / total as f64
        }
    }

    /// Whole percent with halves rounded up, as shown on charts.
    pub fn rounded_percent(&self, sentiment: Sentiment) -> usize {
        self.percent(sentiment).round() as usize
    }
}

impl AddAssign for SentimentCounts {
    fn add_assign(&mut self, other: Self) {
        self.positive += other.positive;
        self.negative += other.negative;
        self.neutral += other.neutral;
    }
}

/// Per-department counts in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentBreakdown {
    entries: Vec<(String, SentimentCounts)>,
}

impl DepartmentBreakdown {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn get(&self, department: &str) -> Option<&SentimentCounts> {
        self.entries
            .iter()
            .find(|(name, _)| name == department)
            .map(|(_, counts)| counts)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SentimentCounts)> {
        self.entries
            .iter()
            .map(|(name, counts)| (name.as_str(), counts))
    }

    pub fn departments(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Componentwise sum over every department.
    pub fn totals(&self) -> SentimentCounts {
        let mut totals = SentimentCounts::default();
        for (_, counts) in &self.entries {
            totals += *counts;
        }
        totals
    }
}

pub fn sentiment_distribution(records: &[FeedbackRecord]) -> SentimentCounts {
    let mut counts = SentimentCounts::default();
    for record in records {
        counts.record(record.sentiment);
    }
    counts
}

pub fn department_breakdown(records: &[FeedbackRecord]) -> DepartmentBreakdown {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(String, SentimentCounts)> = Vec::new();

    for record in records {
        let department = record.department_label();
        let slot = *index.entry(department).or_insert_with(|| {
            entries.push((department.to_string(), SentimentCounts::default()));
            entries.len() - 1
        });
        entries[slot].1.record(record.sentiment);
    }

    DepartmentBreakdown { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_DEPARTMENT;

    fn sample_record(sentiment: Sentiment, department: Option<&str>) -> FeedbackRecord {
        FeedbackRecord {
            id: None,
            comment: "comment".to_string(),
            department: department.map(str::to_string),
            sentiment,
            score: 0.0,
            timestamp: None,
        }
    }

    fn mixed_records() -> Vec<FeedbackRecord> {
        vec![
            sample_record(Sentiment::Positive, Some("Mathematics")),
            sample_record(Sentiment::Negative, Some("CS")),
            sample_record(Sentiment::Neutral, None),
            sample_record(Sentiment::Positive, Some("CS")),
            sample_record(Sentiment::Negative, Some("")),
            sample_record(Sentiment::Neutral, Some("Mathematics")),
            sample_record(Sentiment::Positive, Some("History")),
        ]
    }

    #[test]
    fn empty_input_yields_zeroed_distribution_and_empty_breakdown() {
        assert_eq!(sentiment_distribution(&[]), SentimentCounts::new(0, 0, 0));
        let breakdown = department_breakdown(&[]);
        assert!(breakdown.is_empty());
        assert_eq!(breakdown.len(), 0);
    }

    #[test]
    fn three_record_scenario() {
        let records = vec![
            sample_record(Sentiment::Positive, Some("CS")),
            sample_record(Sentiment::Negative, Some("CS")),
            sample_record(Sentiment::Neutral, None),
        ];

        assert_eq!(sentiment_distribution(&records), SentimentCounts::new(1, 1, 1));

        let breakdown = department_breakdown(&records);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown.get("CS"), Some(&SentimentCounts::new(1, 1, 0)));
        assert_eq!(
            breakdown.get(UNKNOWN_DEPARTMENT),
            Some(&SentimentCounts::new(0, 0, 1))
        );
    }

    #[test]
    fn distribution_sums_to_record_count() {
        let records = mixed_records();
        assert_eq!(sentiment_distribution(&records).total(), records.len());
    }

    #[test]
    fn breakdown_totals_match_distribution() {
        let records = mixed_records();
        let breakdown = department_breakdown(&records);
        assert_eq!(breakdown.totals(), sentiment_distribution(&records));

        for (department, counts) in breakdown.iter() {
            let expected = records
                .iter()
                .filter(|record| record.department_label() == department)
                .count();
            assert_eq!(counts.total(), expected);
        }
    }

    #[test]
    fn breakdown_keeps_first_seen_order() {
        let breakdown = department_breakdown(&mixed_records());
        let order: Vec<&str> = breakdown.departments().collect();
        assert_eq!(order, vec!["Mathematics", "CS", UNKNOWN_DEPARTMENT, "History"]);
    }

    #[test]
    fn missing_and_empty_departments_share_unknown_bucket() {
        let breakdown = department_breakdown(&mixed_records());
        assert_eq!(
            breakdown.get(UNKNOWN_DEPARTMENT),
            Some(&SentimentCounts::new(0, 1, 1))
        );
        assert!(breakdown.get("").is_none());
    }

    #[test]
    fn percent_is_zero_without_counts() {
        let counts = SentimentCounts::default();
        assert_eq!(counts.percent(Sentiment::Positive), 0.0);

        let counts = SentimentCounts::new(1, 1, 2);
        assert!((counts.percent(Sentiment::Neutral) - 50.0).abs() < 0.001);
    }

    #[test]
    fn rounded_percent_rounds_halves_up() {
        let counts = SentimentCounts::new(1, 0, 7);
        assert_eq!(counts.rounded_percent(Sentiment::Positive), 13);
        assert_eq!(counts.rounded_percent(Sentiment::Neutral), 88);
        assert_eq!(SentimentCounts::default().rounded_percent(Sentiment::Negative), 0);
    }
}
