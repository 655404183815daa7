/*!
 * Tests for console, JSON and CSV output of scan results
 */

use serde_json::{json, Value};
use vidmux::library_scan::ScanResult;
use vidmux::media_info::TrackMetadataReport;
use vidmux::report_output::{format_summary, to_csv, to_json};
use crate::common::report;

fn sample_results() -> Vec<ScanResult> {
    let probed = report(json!({
        "filename": "Heat (1995)/Heat, Part 1.mkv",
        "video_tracks": [{"width": 1920, "height": 800, "codec": "hevc"}],
        "audio_tracks": [{"language": "eng"}, {}],
        "subtitle_tracks": [{"language": "ger"}],
    }));

    vec![
        ScanResult::with_suggestion(probed, "en"),
        ScanResult::with_suggestion(TrackMetadataReport::failed("broken.mp4", "probe failed"), "en"),
    ]
}

/// Test the CSV layout and quoting
#[test]
fn test_to_csv_withProbedAndFailedFiles_shouldWriteOneRowEach() {
    let csv = to_csv(&sample_results());
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "filename,video_tracks,audio_tracks,subtitle_tracks,audio_languages,subtitle_languages,resolution,suggested_name,error"
    );
    assert_eq!(
        lines[1],
        "\"Heat (1995)/Heat, Part 1.mkv\",1,2,1,eng+und,ger,720p,\"Heat, Part 1/Heat, Part 1 - [EN] [720p].mkv\","
    );
    assert_eq!(lines[2], "broken.mp4,0,0,0,,,,,probe failed");
}

/// Test that JSON keeps scan order and optional fields
#[test]
fn test_to_json_withResults_shouldProduceArrayInOrder() {
    let value: Value = serde_json::from_str(&to_json(&sample_results()).unwrap()).unwrap();
    let array = value.as_array().unwrap();

    assert_eq!(array.len(), 2);
    assert_eq!(array[0]["filename"], "Heat (1995)/Heat, Part 1.mkv");
    assert_eq!(array[0]["video_tracks"][0]["height"], 800);
    assert!(array[0]["audio_tracks"][1].get("language").is_none());
    assert_eq!(array[0]["suggested_name"], "Heat, Part 1/Heat, Part 1 - [EN] [720p].mkv");
    assert!(array[0].get("error").is_none());
    assert_eq!(array[1]["error"], "probe failed");
    assert!(array[1].get("suggested_name").is_none());
}

/// Test the console summary
#[test]
fn test_format_summary_withResults_shouldListTracks() {
    let summary = format_summary(&sample_results());

    assert!(summary.contains("Heat (1995)/Heat, Part 1.mkv\n"));
    assert!(summary.contains("  video: 1920x800 (hevc)\n"));
    assert!(summary.contains("  audio: eng, und\n"));
    assert!(summary.contains("  subtitles: ger\n"));
    assert!(summary.contains("  suggested: Heat, Part 1/Heat, Part 1 - [EN] [720p].mkv\n"));
    assert!(summary.contains("broken.mp4\n  error: probe failed\n"));
}
