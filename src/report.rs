use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::aggregate::{department_breakdown, sentiment_distribution};
use crate::models::{FeedbackRecord, Sentiment};
use crate::view::{format_score, format_timestamp};

/// Most negative first; ties keep input order.
pub fn most_negative(records: &[FeedbackRecord], limit: usize) -> Vec<&FeedbackRecord> {
    let mut sorted: Vec<&FeedbackRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.into_iter().take(limit).collect()
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|parsed| parsed.naive_utc())
        })
}

/// Newest first; records without a readable timestamp are left out.
pub fn most_recent(records: &[FeedbackRecord], limit: usize) -> Vec<&FeedbackRecord> {
    let mut dated: Vec<(NaiveDateTime, &FeedbackRecord)> = records
        .iter()
        .filter_map(|record| {
            record
                .timestamp
                .as_deref()
                .and_then(parse_timestamp)
                .map(|at| (at, record))
        })
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.into_iter().take(limit).map(|(_, record)| record).collect()
}

pub fn build_report(
    scope: Option<&str>,
    generated: NaiveDate,
    records: &[FeedbackRecord],
) -> String {
    let distribution = sentiment_distribution(records);
    let breakdown = department_breakdown(records);

    let mut output = String::new();
    let scope_label = scope.unwrap_or("all stored feedback");

    let _ = writeln!(output, "# Student Feedback Sentiment Report");
    let _ = writeln!(
        output,
        "Generated {} for {} ({} comments)",
        generated,
        scope_label,
        records.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Sentiment Mix");

    if records.is_empty() {
        let _ = writeln!(output, "No feedback recorded yet.");
    } else {
        for sentiment in Sentiment::ALL {
            let _ = writeln!(
                output,
                "- {}: {} ({}%)",
                sentiment.title(),
                distribution.get(sentiment),
                distribution.rounded_percent(sentiment)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sentiment by Department");

    if breakdown.is_empty() {
        let _ = writeln!(output, "No departments to compare.");
    } else {
        let _ = writeln!(output, "| Department | Positive | Negative | Neutral |");
        let _ = writeln!(output, "|---|---|---|---|");
        for (department, counts) in breakdown.iter() {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                department, counts.positive, counts.negative, counts.neutral
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Negative Comments");

    let negative: Vec<&FeedbackRecord> = most_negative(records, 5)
        .into_iter()
        .filter(|record| record.sentiment == Sentiment::Negative)
        .collect();
    if negative.is_empty() {
        let _ = writeln!(output, "No negative comments.");
    } else {
        for record in negative {
            let _ = writeln!(
                output,
                "- ({}, {}) {}",
                record.department_label(),
                format_score(record.score),
                record.comment
            );
        }
    }

    let recent = most_recent(records, 5);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Comments");

    if recent.is_empty() {
        let _ = writeln!(output, "No dated comments.");
    } else {
        for record in recent {
            let _ = writeln!(
                output,
                "- {} ({}, {}): {}",
                record
                    .timestamp
                    .as_deref()
                    .map(format_timestamp)
                    .unwrap_or_default(),
                record.department_label(),
                record.sentiment,
                record.comment
            );
        }
    }

    output
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
