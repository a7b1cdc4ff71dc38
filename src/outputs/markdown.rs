//! Markdown rendering of a [`RadarReport`].
//!
//! Every topic renders in one of three states:
//!
//! | State | Rendered as |
//! |-------|-------------|
//! | error | `> ⚠️ Failed to load news feed.` |
//! | no articles | an italic "no major events" notice |
//! | articles | a bullet per headline with date and source |

use crate::models::{RadarReport, TopicFeed};
use crate::parser::RECENCY_DAYS;
use crate::utils::slugify_title;
use std::error::Error;
use std::fmt::{self, Write};
use tokio::fs;
use tracing::{info, instrument};

const ERROR_BANNER: &str = "> ⚠️ Failed to load news feed.";

/// Render the whole report as a Markdown document.
pub fn report_to_markdown(report: &RadarReport) -> String {
    let mut md = String::new();
    // Writing into a String cannot fail.
    let _ = render_report(&mut md, report);
    md
}

fn render_report(md: &mut String, report: &RadarReport) -> fmt::Result {
    writeln!(md, "# {}\n", report.title)?;
    if !report.tagline.is_empty() {
        writeln!(md, "{}\n", report.tagline)?;
    }
    writeln!(
        md,
        "_Last synced: {} {}_ · 🗓️ Past {} Days\n",
        report.local_date, report.local_time, RECENCY_DAYS
    )?;

    for topic in &report.topics {
        writeln!(md, "- [{}](#{})", topic.label, slugify_title(&topic.heading))?;
    }
    writeln!(md)?;

    for topic in &report.topics {
        render_topic(md, topic)?;
    }
    Ok(())
}

fn render_topic(md: &mut String, topic: &TopicFeed) -> fmt::Result {
    writeln!(md, "## {}\n", topic.heading)?;
    if !topic.description.is_empty() {
        writeln!(md, "{}\n", topic.description)?;
    }

    if topic.error.is_some() {
        return writeln!(md, "{ERROR_BANNER}\n");
    }

    match topic.articles.as_deref() {
        Some(articles) if !articles.is_empty() => {
            for article in articles {
                writeln!(md, "- **[{}]({})**  ", article.title, article.link)?;
                writeln!(md, "  📅 {} | 🏢 {}", article.published_at, article.source)?;
            }
            writeln!(md)
        }
        _ => writeln!(
            md,
            "_No major events reported in this category in the past {RECENCY_DAYS} days._\n"
        ),
    }
}

/// Write the rendered report to `{markdown_output_dir}/{date}_radar.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir))]
pub async fn write_markdown(
    report: &RadarReport,
    markdown_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let path = format!(
        "{}/{}_radar.md",
        markdown_output_dir.trim_end_matches('/'),
        report.local_date
    );
    fs::write(&path, report_to_markdown(report)).await?;
    info!(%path, "Wrote Markdown report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;

    fn topic(heading: &str, articles: Option<Vec<ArticleRecord>>, error: Option<&str>) -> TopicFeed {
        TopicFeed {
            slug: slugify_title(heading),
            label: heading.to_string(),
            heading: heading.to_string(),
            description: format!("About {heading}"),
            articles,
            error: error.map(str::to_string),
        }
    }

    fn report(topics: Vec<TopicFeed>) -> RadarReport {
        RadarReport {
            title: "🚛 Class 7 & 8 Fleet Radar".to_string(),
            tagline: "Heavy-duty fleets".to_string(),
            local_date: "2026-10-16".to_string(),
            local_time: "09:30 AM".to_string(),
            topics,
        }
    }

    #[test]
    fn test_renders_three_topic_states() {
        let articles = vec![ArticleRecord {
            title: "Peterbilt Unveils Model 579 Update".to_string(),
            link: "https://example.com/pb".to_string(),
            published_at: "Oct 15, 2026".to_string(),
            source: "FleetOwner".to_string(),
        }];
        let md = report_to_markdown(&report(vec![
            topic("Class 8 Truck Manufacturers", Some(articles), None),
            topic("Fleet M&A & Bankruptcies", Some(vec![]), None),
            topic("Class 8 Tire Suppliers", None, Some("Failed to load feeds.")),
        ]));

        assert!(md.starts_with("# 🚛 Class 7 & 8 Fleet Radar\n"));
        assert!(md.contains("_Last synced: 2026-10-16 09:30 AM_ · 🗓️ Past 14 Days"));
        assert!(md.contains("- **[Peterbilt Unveils Model 579 Update](https://example.com/pb)**"));
        assert!(md.contains("  📅 Oct 15, 2026 | 🏢 FleetOwner"));
        assert!(md.contains("_No major events reported in this category in the past 14 days._"));
        assert!(md.contains("> ⚠️ Failed to load news feed."));
        assert!(!md.contains("Failed to load feeds."));
    }

    #[test]
    fn test_table_of_contents_links_headings() {
        let md = report_to_markdown(&report(vec![topic("Fleet M&A & Bankruptcies", Some(vec![]), None)]));
        assert!(md.contains("- [Fleet M&A & Bankruptcies](#fleet-ma--bankruptcies)"));
        assert!(md.contains("## Fleet M&A & Bankruptcies\n\nAbout Fleet M&A & Bankruptcies"));
    }

    #[tokio::test]
    async fn test_write_markdown_uses_dated_filename() {
        let dir = std::env::temp_dir().join(format!("fleet_radar_md_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let path = write_markdown(&report(vec![]), &dir.to_string_lossy())
            .await
            .unwrap();
        assert!(path.ends_with("2026-10-16_radar.md"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("Fleet Radar"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
