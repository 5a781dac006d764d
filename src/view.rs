//! Terminal rendering for the results table and sentiment charts.

use std::fmt::Write;

use ansi_term::Colour;
use chrono::{DateTime, NaiveDateTime};

use crate::aggregate::{
    department_breakdown, sentiment_distribution, DepartmentBreakdown, SentimentCounts,
};
use crate::models::{FeedbackRecord, Sentiment};

pub const NO_FEEDBACK: &str =
    "No feedback data available. Upload a CSV or enter feedback manually.";

const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreShade {
    StrongPositive,
    Positive,
    Neutral,
    Negative,
    StrongNegative,
}

pub fn score_shade(score: f64) -> ScoreShade {
    if score >= 0.5 {
        ScoreShade::StrongPositive
    } else if score >= 0.05 {
        ScoreShade::Positive
    } else if score <= -0.5 {
        ScoreShade::StrongNegative
    } else if score <= -0.05 {
        ScoreShade::Negative
    } else {
        ScoreShade::Neutral
    }
}

pub fn sentiment_icon(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "[+]",
        Sentiment::Negative => "[-]",
        Sentiment::Neutral => "[=]",
    }
}

fn sentiment_colour(sentiment: Sentiment) -> Colour {
    match sentiment {
        Sentiment::Positive => Colour::Green,
        Sentiment::Negative => Colour::Red,
        Sentiment::Neutral => Colour::Fixed(245),
    }
}

pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

/// Backend timestamps are SQLite `YYYY-MM-DD HH:MM:SS`; RFC 3339 is also
/// accepted. Anything else is shown as received.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.naive_utc().format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

pub struct View {
    pub color: bool,
    pub comment_width: usize,
}

impl View {
    pub fn new(color: bool, comment_width: usize) -> Self {
        Self {
            color,
            comment_width: comment_width.max(10),
        }
    }

    #[cfg(test)]
    fn plain() -> Self {
        Self::new(false, 60)
    }

    fn shade(&self, text: &str, shade: ScoreShade) -> String {
        if !self.color {
            return text.to_string();
        }
        let style = match shade {
            ScoreShade::StrongPositive => Colour::Green.bold(),
            ScoreShade::Positive => Colour::Green.normal(),
            ScoreShade::StrongNegative => Colour::Red.bold(),
            ScoreShade::Negative => Colour::Red.normal(),
            ScoreShade::Neutral => Colour::Fixed(245).normal(),
        };
        style.paint(text).to_string()
    }

    fn paint(&self, text: &str, sentiment: Sentiment) -> String {
        if self.color {
            sentiment_colour(sentiment).paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn results_table(&self, records: &[FeedbackRecord]) -> String {
        if records.is_empty() {
            return format!("{NO_FEEDBACK}\n");
        }

        let department_width = records
            .iter()
            .map(|record| record.department().unwrap_or("-").chars().count())
            .max()
            .unwrap_or(1)
            .clamp("Department".len(), 24);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<14} {:>6}  {:<dw$}  Comment",
            "Sentiment",
            "Score",
            "Department",
            dw = department_width
        );
        let _ = writeln!(
            out,
            "{}",
            "-".repeat(14 + 1 + 6 + 2 + department_width + 2 + self.comment_width)
        );

        for record in records {
            let label = format!(
                "{} {}",
                sentiment_icon(record.sentiment),
                record.sentiment.title()
            );
            let department = truncate(record.department().unwrap_or("-"), department_width);
            let padding = department_width.saturating_sub(department.chars().count());
            let lines = textwrap::wrap(&record.comment, self.comment_width);

            let first = lines.first().map(|line| &**line).unwrap_or("");
            let _ = writeln!(
                out,
                "{}{} {}  {}{}  {}",
                self.paint(&label, record.sentiment),
                " ".repeat(14usize.saturating_sub(label.chars().count())),
                self.shade(
                    &format!("{:>6}", format_score(record.score)),
                    score_shade(record.score)
                ),
                department,
                " ".repeat(padding),
                first
            );
            for line in lines.iter().skip(1) {
                let _ = writeln!(
                    out,
                    "{:indent$}{}",
                    "",
                    line,
                    indent = 14 + 1 + 6 + 2 + department_width + 2
                );
            }
        }

        out
    }

    /// Always drawn, zeroed when there is nothing to count.
    pub fn distribution_chart(&self, counts: &SentimentCounts) -> String {
        let total = counts.total();
        let mut out = String::new();
        let _ = writeln!(out, "Sentiment Distribution ({total} comments)");

        for sentiment in Sentiment::ALL {
            let count = counts.get(sentiment);
            let width = if total == 0 {
                0
            } else {
                (count * BAR_WIDTH + total / 2) / total
            };
            let _ = writeln!(
                out,
                "  {:<9} {:>4} {:>4}%  {}",
                sentiment.title(),
                count,
                counts.rounded_percent(sentiment),
                self.paint(&"#".repeat(width), sentiment)
            );
        }

        out
    }

    /// `None` when there are no departments to draw.
    pub fn department_chart(&self, breakdown: &DepartmentBreakdown) -> Option<String> {
        if breakdown.is_empty() {
            return None;
        }

        let widest = breakdown
            .iter()
            .map(|(_, counts)| counts.total())
            .max()
            .unwrap_or(0)
            .max(1);
        let name_width = breakdown
            .departments()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .min(24);

        let mut out = String::new();
        let _ = writeln!(out, "Sentiment by Department ({})", breakdown.len());
        for (department, counts) in breakdown.iter() {
            let mut bar = String::new();
            for sentiment in Sentiment::ALL {
                let segment = counts.get(sentiment) * BAR_WIDTH / widest;
                bar.push_str(&self.paint(&"#".repeat(segment), sentiment));
            }
            let _ = writeln!(
                out,
                "  {:<nw$}  +{:<3} -{:<3} ={:<3} {}",
                truncate(department, name_width),
                counts.positive,
                counts.negative,
                counts.neutral,
                bar,
                nw = name_width
            );
        }

        Some(out)
    }

    pub fn charts(&self, records: &[FeedbackRecord]) -> String {
        let mut out = self.distribution_chart(&sentiment_distribution(records));
        if let Some(chart) = self.department_chart(&department_breakdown(records)) {
            out.push('\n');
            out.push_str(&chart);
        }
        out
    }

    pub fn dashboard(&self, records: &[FeedbackRecord]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Sentiment Analysis Results");
        let _ = writeln!(out);
        out.push_str(&self.charts(records));
        let _ = writeln!(out);
        let _ = writeln!(out, "Feedback Results");
        let _ = writeln!(out);
        out.push_str(&self.results_table(records));
        out
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}
