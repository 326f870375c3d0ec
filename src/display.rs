//! Helpers for presenting a [`VersionComparison`].
//!
//! Colors are plain tags; mapping them to terminal escapes, embed colors or
//! anything else is up to the caller.

use chrono::DateTime;
use serde::Serialize;

use crate::types::{UpdateStatus, VersionComparison};

/// Display color for a line of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayColor {
    Green,
    Red,
    Purple,
    Blue,
    Cyan,
    White,
}

impl UpdateStatus {
    /// The color a status message is shown in.
    pub fn color(&self) -> DisplayColor {
        match self {
            Self::UpToDate => DisplayColor::Green,
            Self::Outdated => DisplayColor::Red,
            Self::Ahead => DisplayColor::Purple,
            Self::Error | Self::FetchFailed | Self::InvalidVersion => DisplayColor::Red,
        }
    }
}

/// One line of a rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub color: DisplayColor,
    pub text: String,
}

impl ReportLine {
    fn new(color: DisplayColor, text: impl Into<String>) -> Self {
        Self {
            color,
            text: text.into(),
        }
    }
}

/// Formats an ISO-8601 timestamp as "M/D/YYYY", e.g. "6/1/2025".
///
/// Returns "Unknown" for an empty string and "Invalid Date" if it does not parse.
pub fn format_release_date(iso_date: &str) -> String {
    if iso_date.is_empty() {
        return "Unknown".to_string();
    }

    match DateTime::parse_from_rfc3339(iso_date) {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(_) => "Invalid Date".to_string(),
    }
}

/// Renders the status message followed by the release link, name and date.
pub fn report(comparison: &VersionComparison) -> Vec<ReportLine> {
    let mut lines = vec![ReportLine::new(
        comparison.status.color(),
        comparison.message.as_str(),
    )];

    let Some(release) = comparison
        .release_info
        .as_ref()
        .filter(|release| !release.html_url.is_empty())
    else {
        return lines;
    };

    lines.push(ReportLine::new(
        DisplayColor::Blue,
        format!("Release URL: {}", release.html_url),
    ));
    if !release.name.is_empty() {
        lines.push(ReportLine::new(
            DisplayColor::White,
            format!("Release Name: {}", release.name),
        ));
    }
    if !release.published_at.is_empty() {
        lines.push(ReportLine::new(
            DisplayColor::Cyan,
            format!("Published: {}", format_release_date(&release.published_at)),
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReleaseInfo;
    use crate::version::compare;

    fn release() -> ReleaseInfo {
        ReleaseInfo {
            tag_name: "v2.0.0".to_string(),
            name: "Version 2.0.0".to_string(),
            html_url: "https://github.com/acme/widget/releases/tag/v2.0.0".to_string(),
            published_at: "2025-06-01T09:11:43Z".to_string(),
            body: "Notes".to_string(),
        }
    }

    #[test]
    fn test_format_release_date() {
        assert_eq!(format_release_date("2025-06-01T09:11:43Z"), "6/1/2025");
        assert_eq!(format_release_date("2024-12-25T00:00:00+00:00"), "12/25/2024");
        assert_eq!(format_release_date(""), "Unknown");
        assert_eq!(format_release_date("last tuesday"), "Invalid Date");
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(UpdateStatus::UpToDate.color(), DisplayColor::Green);
        assert_eq!(UpdateStatus::Outdated.color(), DisplayColor::Red);
        assert_eq!(UpdateStatus::Ahead.color(), DisplayColor::Purple);
        assert_eq!(UpdateStatus::FetchFailed.color(), DisplayColor::Red);
    }

    #[test]
    fn test_report_with_release() {
        let lines = report(&compare("1.0.0", &release()));

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].color, DisplayColor::Red);
        assert_eq!(
            lines[1],
            ReportLine::new(
                DisplayColor::Blue,
                "Release URL: https://github.com/acme/widget/releases/tag/v2.0.0"
            )
        );
        assert_eq!(lines[2].text, "Release Name: Version 2.0.0");
        assert_eq!(lines[3], ReportLine::new(DisplayColor::Cyan, "Published: 6/1/2025"));
    }

    #[test]
    fn test_report_skips_empty_release_fields() {
        let bare = ReleaseInfo {
            name: String::new(),
            published_at: String::new(),
            ..release()
        };
        let lines = report(&compare("2.0.0", &bare));

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].color, DisplayColor::Green);
    }

    #[test]
    fn test_report_without_release_url() {
        let no_url = ReleaseInfo {
            html_url: String::new(),
            ..release()
        };
        assert_eq!(report(&compare("2.0.0", &no_url)).len(), 1);
    }
}
