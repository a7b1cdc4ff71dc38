//! JSON output generation for the API.
//!
//! Each topic carries either an `articles` array (possibly empty) or an
//! `error` string, never both, so clients can tell "nothing new" apart from
//! "could not load".

use crate::models::RadarReport;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`RadarReport`] to `{json_output_dir}/{date}/radar.json`.
///
/// Creates the dated directory when needed and overwrites an earlier report
/// from the same day.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(
    report: &RadarReport,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let full_json_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        report.local_date
    );
    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = format!("{}/radar.json", full_json_dir);
    fs::write(&path, json).await?;
    info!(%path, topics = report.topics.len(), "Wrote JSON report");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleRecord, TopicFeed};

    #[tokio::test]
    async fn test_write_report_creates_dated_file() {
        let dir = std::env::temp_dir().join(format!("fleet_radar_json_{}", std::process::id()));
        let report = RadarReport {
            title: "Radar".to_string(),
            tagline: String::new(),
            local_date: "2026-10-16".to_string(),
            local_time: "09:00 AM".to_string(),
            topics: vec![TopicFeed {
                slug: "tires".to_string(),
                label: "Tires".to_string(),
                heading: "Tire Suppliers".to_string(),
                description: String::new(),
                articles: Some(vec![ArticleRecord {
                    title: "Goodyear Opens Retread Plant".to_string(),
                    link: "https://example.com/gy".to_string(),
                    published_at: "Oct 15, 2026".to_string(),
                    source: "Tire Business".to_string(),
                }]),
                error: None,
            }],
        };

        let path = write_report(&report, &dir.to_string_lossy()).await.unwrap();
        assert!(path.ends_with("2026-10-16/radar.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: RadarReport = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.topics[0].articles.as_ref().unwrap()[0].source, "Tire Business");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
