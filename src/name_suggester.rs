/*!
 * Canonical file names for library entries.
 *
 * A suggested name has the shape
 * `<title>/<title> - [<edition>] [<languages>] [<resolution>].<ext>`.
 * The title and edition are recovered from the current file name; languages
 * and resolution are always recomputed from the probed tracks.
 *
 * Recovering the title is a best-effort heuristic keyed on the first `" - "`
 * and the first `[`. Titles that themselves contain either sequence before
 * the tag group will be split in the wrong place.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::language_utils;
use crate::media_info::TrackMetadataReport;

// @const: A `+`-joined list of short language codes, e.g. `DE+EN`
static LANGUAGE_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2,3}(\+[A-Za-z]{2,3})*$").unwrap());

// @const: Any height label, including ones below the table, e.g. `144p`
static RESOLUTION_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)\d+p$").unwrap());

// @const: Height thresholds, highest first
const RESOLUTION_LABELS: &[(u32, &str)] = &[
    (4320, "4320p"),
    (2160, "2160p"),
    (1440, "1440p"),
    (1080, "1080p"),
    (720, "720p"),
    (576, "576p"),
    (480, "480p"),
    (360, "360p"),
    (240, "240p"),
];

/// Title, edition and extension recovered from an existing file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameComponents {
    pub title: String,
    pub edition: Option<String>,
    pub extension: String,
}

impl NameComponents {
    /// Split a file name (directory components are ignored) into its parts
    pub fn parse(filename: &str) -> Self {
        let path = Path::new(filename);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let (title, edition) = split_title_and_edition(&stem);

        NameComponents {
            title,
            edition,
            extension,
        }
    }
}

fn split_title_and_edition(stem: &str) -> (String, Option<String>) {
    let Some(bracket) = stem.find('[') else {
        return (stem.trim().to_string(), None);
    };

    let Some(dash) = stem[..bracket].find(" - ") else {
        return (stem[..bracket].trim().to_string(), None);
    };

    let title = stem[..dash].trim().to_string();
    let between = stem[dash + 3..bracket].trim();
    if !between.is_empty() {
        return (title, Some(between.to_string()));
    }

    // Name we produced earlier: the edition, if any, is the first bracket group
    let edition = first_bracket_group(&stem[bracket..])
        .filter(|group| !group.is_empty() && !is_generated_tag(group))
        .map(|group| group.to_string());

    (title, edition)
}

fn first_bracket_group(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(rest[..end].trim())
}

fn is_generated_tag(group: &str) -> bool {
    LANGUAGE_TAG_REGEX.is_match(group)
        || RESOLUTION_TAG_REGEX.is_match(group)
        || group.eq_ignore_ascii_case("4K")
}

/// Standard label for a pixel height, e.g. `1080` -> `1080p`
pub fn resolution_label(height: u32) -> String {
    RESOLUTION_LABELS
        .iter()
        .find(|(threshold, _)| height >= *threshold)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("{}p", height))
}

/// Resolution label of the first video track that has both dimensions
pub fn resolution_tag(report: &TrackMetadataReport) -> Option<String> {
    report
        .primary_dimensions()
        .map(|(_, height)| resolution_label(height))
}

/// Distinct display languages of all audio tracks, in first-seen order
pub fn audio_languages(report: &TrackMetadataReport, undefined_language: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::with_capacity(report.audio_tracks.len());
    for track in &report.audio_tracks {
        let code = language_utils::resolve_display_code(track.language.as_deref(), undefined_language);
        if !languages.contains(&code) {
            languages.push(code);
        }
    }
    languages
}

/// `+`-joined language list, e.g. `DE+EN`; `None` when there are no audio tracks
pub fn language_tag(report: &TrackMetadataReport, undefined_language: &str) -> Option<String> {
    let languages = audio_languages(report, undefined_language);
    if languages.is_empty() {
        None
    } else {
        Some(languages.join("+"))
    }
}

/// Suggest a canonical relative path for the file described by `report`
///
/// Missing metadata never fails: absent languages fall back to
/// `undefined_language` and a missing resolution drops its tag.
pub fn suggest_name(report: &TrackMetadataReport, undefined_language: &str) -> String {
    let components = NameComponents::parse(&report.filename);

    let tags: Vec<String> = [
        components.edition.clone(),
        language_tag(report, undefined_language),
        resolution_tag(report),
    ]
    .into_iter()
    .flatten()
    .map(|tag| format!("[{}]", tag))
    .collect();

    let mut name = components.title.clone();
    if !tags.is_empty() {
        name.push_str(" - ");
        name.push_str(&tags.join(" "));
    }
    if !components.extension.is_empty() {
        name.push('.');
        name.push_str(&components.extension);
    }

    format!("{}/{}", components.title, name)
}
