// Rendering extracted vectors as text, JSON or CSV

use crate::feature::{Feature, FeatureVector, Score};
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

/// One analyzed URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRow {
    pub url: String,
    pub features: FeatureVector,
}

impl ExtractionRow {
    pub fn new(url: impl Into<String>, features: FeatureVector) -> Self {
        Self {
            url: url.into(),
            features,
        }
    }
}

pub fn render(rows: &[ExtractionRow], format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(rows)),
        ReportFormat::Json => Ok(generate_json_report(rows)?),
        ReportFormat::Csv => generate_csv_report(rows),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

fn colored_score(score: Score) -> String {
    let value = format!("{:>2}", score.value());
    match score {
        Score::Phishing => value.red().bold().to_string(),
        Score::Suspicious => value.yellow().to_string(),
        Score::Legitimate => value.green().to_string(),
    }
}

pub fn generate_text_report(rows: &[ExtractionRow]) -> String {
    let rule = "━".repeat(60);
    let mut report = String::new();

    for row in rows {
        report.push_str(&format!("{}\n", rule));
        report.push_str(&format!("URL: {}\n", row.url.bright_white().bold()));
        report.push_str(&format!("{}\n", rule));

        for (feature, score) in row.features.iter() {
            report.push_str(&format!(
                "  {:02}  {:<28} {}\n",
                feature.index() + 1,
                feature.name(),
                colored_score(score)
            ));
        }

        let flagged = row
            .features
            .iter()
            .filter(|(_, score)| *score == Score::Phishing)
            .count();
        report.push_str(&format!(
            "\n  {} of {} features phishing-indicative\n\n",
            flagged,
            row.features.len()
        ));
    }

    report
}

pub fn generate_json_report(rows: &[ExtractionRow]) -> Result<String, serde_json::Error> {
    let rows: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            let features: serde_json::Map<String, serde_json::Value> = row
                .features
                .iter()
                .map(|(feature, score)| (feature.name().to_string(), score.value().into()))
                .collect();
            serde_json::json!({
                "url": row.url,
                "features": features,
            })
        })
        .collect();

    let json_report = serde_json::json!({
        "metadata": {
            "generator": "Phishline",
            "version": env!("CARGO_PKG_VERSION"),
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "format": "json",
        },
        "feature_order": Feature::names().collect::<Vec<_>>(),
        "rows": rows,
    });

    serde_json::to_string_pretty(&json_report)
}

/// A `url` column followed by the 30 feature columns.
pub fn generate_csv_report(rows: &[ExtractionRow]) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["url"];
    header.extend(Feature::names());
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.url.clone()];
        record.extend(row.features.values().iter().map(|value| value.to_string()));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Buffer(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_str("csv"), Some(ReportFormat::Csv));
        assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::from_str("html"), None);
    }

    #[test]
    fn test_csv_header_layout() {
        let csv = generate_csv_report(&[]).unwrap();
        let header = csv.lines().next().unwrap();
        let columns: Vec<&str> = header.split(',').collect();

        assert_eq!(columns.len(), 31);
        assert_eq!(columns[0], "url");
        assert_eq!(columns[1], "having_IP_Address");
        assert_eq!(columns[30], "Statistical_report");
    }
}
