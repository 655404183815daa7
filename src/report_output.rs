/*!
 * Output formats for scan results: console summary, JSON and CSV.
 */

use std::fmt::Write as _;
use std::path::Path;

use crate::errors::OutputError;
use crate::file_utils::FileManager;
use crate::language_utils::UNDEFINED_LANGUAGE;
use crate::library_scan::ScanResult;
use crate::media_info::TrackMetadataReport;
use crate::name_suggester;

const CSV_HEADER: [&str; 9] = [
    "filename",
    "video_tracks",
    "audio_tracks",
    "subtitle_tracks",
    "audio_languages",
    "subtitle_languages",
    "resolution",
    "suggested_name",
    "error",
];

fn join_languages<'a>(languages: impl Iterator<Item = Option<&'a str>>) -> String {
    languages
        .map(|language| language.unwrap_or(UNDEFINED_LANGUAGE))
        .collect::<Vec<_>>()
        .join("+")
}

fn audio_languages(report: &TrackMetadataReport) -> String {
    join_languages(report.audio_tracks.iter().map(|t| t.language.as_deref()))
}

fn subtitle_languages(report: &TrackMetadataReport) -> String {
    join_languages(report.subtitle_tracks.iter().map(|t| t.language.as_deref()))
}

/// Human-readable summary of scan results
pub fn format_summary(results: &[ScanResult]) -> String {
    let mut out = String::new();
    for result in results {
        let report = &result.report;
        let _ = writeln!(out, "{}", report.filename);

        if let Some(error) = &report.error {
            let _ = writeln!(out, "  error: {}", error);
            continue;
        }

        for track in &report.video_tracks {
            let dimensions = match track.dimensions() {
                Some((w, h)) => format!("{}x{}", w, h),
                None => "unknown size".to_string(),
            };
            let _ = writeln!(
                out,
                "  video: {} ({})",
                dimensions,
                track.codec.as_deref().unwrap_or("unknown codec")
            );
        }
        if !report.audio_tracks.is_empty() {
            let _ = writeln!(out, "  audio: {}", audio_languages(report).replace('+', ", "));
        }
        if !report.subtitle_tracks.is_empty() {
            let _ = writeln!(out, "  subtitles: {}", subtitle_languages(report).replace('+', ", "));
        }
        if let Some(name) = &result.suggested_name {
            let _ = writeln!(out, "  suggested: {}", name);
        }
    }
    out
}

/// Pretty JSON array of scan results
pub fn to_json(results: &[ScanResult]) -> Result<String, OutputError> {
    serde_json::to_string_pretty(results).map_err(|e| OutputError::Serialize(e.to_string()))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut row = fields
        .iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

/// CSV table with one row per scanned file
pub fn to_csv(results: &[ScanResult]) -> String {
    let mut out = csv_row(&CSV_HEADER);
    for result in results {
        let report = &result.report;
        let fields = [
            report.filename.clone(),
            report.video_tracks.len().to_string(),
            report.audio_tracks.len().to_string(),
            report.subtitle_tracks.len().to_string(),
            audio_languages(report),
            subtitle_languages(report),
            name_suggester::resolution_tag(report).unwrap_or_default(),
            result.suggested_name.clone().unwrap_or_default(),
            report.error.clone().unwrap_or_default(),
        ];
        out.push_str(&csv_row(&fields));
    }
    out
}

pub fn write_json<P: AsRef<Path>>(path: P, results: &[ScanResult]) -> Result<(), OutputError> {
    FileManager::write_atomically(path, to_json(results)?.as_bytes())
}

pub fn write_csv<P: AsRef<Path>>(path: P, results: &[ScanResult]) -> Result<(), OutputError> {
    FileManager::write_atomically(path, to_csv(results).as_bytes())
}
