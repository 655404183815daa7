/*!
 * Library scan tests using a probe double instead of ffprobe
 */

use std::fs;
use anyhow::Result;
use serde_json::{json, Value};
use vidmux::app_config::Config;
use vidmux::app_controller::{Controller, ScanOptions};
use vidmux::library_scan::LibraryScanner;
use crate::common::{self, CannedProbe, report};

fn extensions() -> Vec<String> {
    Config::default().extensions
}

fn sample_probe() -> CannedProbe {
    CannedProbe::new()
        .with(
            "Alien (1979).mkv",
            report(json!({
                "filename": "/ignored/by/scanner.mkv",
                "video_tracks": [{"width": 1920, "height": 1080, "codec": "h264"}],
                "audio_tracks": [{"language": "eng"}, {"language": "ger"}],
            })),
        )
        .with(
            "Heat (1995) - Extended [EN].MP4",
            report(json!({
                "filename": "x",
                "video_tracks": [{"width": 1280, "height": 720}],
                "audio_tracks": [{}],
            })),
        )
}

/// Test that a scan probes matching files in lexical order with relative names
#[test]
fn test_scan_withNestedLibrary_shouldReturnReportsInLexicalOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "Heat (1995)/Heat (1995) - Extended [EN].MP4", "")?;
    common::create_test_file(root, "Alien (1979)/Alien (1979).mkv", "")?;
    common::create_test_file(root, "Alien (1979)/Alien (1979).srt", "")?;
    common::create_test_file(root, "readme.txt", "")?;

    let scanner = LibraryScanner::new(sample_probe());
    let reports = scanner.scan(root, &extensions())?;

    let names: Vec<&str> = reports.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(
        names,
        vec!["Alien (1979)/Alien (1979).mkv", "Heat (1995)/Heat (1995) - Extended [EN].MP4"]
    );
    assert_eq!(reports[0].audio_tracks.len(), 2);
    assert!(reports.iter().all(|r| r.error.is_none()));
    Ok(())
}

/// Test that one failing probe does not abort the scan
#[test]
fn test_scan_withFailingProbe_shouldRecordErrorAndContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "Alien (1979).mkv", "")?;
    common::create_test_file(root, "Broken.avi", "")?;
    common::create_test_file(root, "Zodiac.mov", "")?;

    let scanner = LibraryScanner::new(sample_probe());
    let reports = scanner.scan(root, &extensions())?;

    assert_eq!(reports.len(), 3);
    assert!(reports[0].error.is_none());
    assert_eq!(reports[1].filename, "Broken.avi");
    assert!(reports[1].error.as_deref().unwrap().contains("Invalid data"));
    assert!(reports[1].video_tracks.is_empty());
    assert!(reports[2].is_failed());
    Ok(())
}

/// Test that a custom extension list restricts the scan
#[test]
fn test_scan_withCustomExtensions_shouldOnlyIncludeThose() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "Alien (1979).mkv", "")?;
    common::create_test_file(root, "Other.mp4", "")?;

    let scanner = LibraryScanner::new(sample_probe());
    let reports = scanner.scan(root, &["MKV".to_string()])?;

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].filename, "Alien (1979).mkv");
    Ok(())
}

/// Test the controller writing JSON and CSV reports with suggested names
#[test]
fn test_run_scan_with_withJsonAndCsv_shouldWriteBothReports() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let library = temp_dir.path().join("library");
    common::create_test_file(&library, "Alien (1979).mkv", "")?;
    common::create_test_file(&library, "Heat (1995) - Extended [EN].MP4", "")?;

    let controller = Controller::with_config(Config::default())?;
    let mut options = ScanOptions::from_config(library.clone(), controller.config());
    options.json = Some(temp_dir.path().join("scan.json"));
    options.csv = Some(temp_dir.path().join("scan.csv"));
    options.suggest_names = true;

    let results = controller.run_scan_with(&LibraryScanner::new(sample_probe()), &options)?;

    assert_eq!(
        results[0].suggested_name.as_deref(),
        Some("Alien (1979)/Alien (1979) - [EN+DE] [1080p].mkv")
    );
    assert_eq!(
        results[1].suggested_name.as_deref(),
        Some("Heat (1995)/Heat (1995) - [Extended] [EN] [720p].MP4")
    );

    let json: Value = serde_json::from_str(&fs::read_to_string(temp_dir.path().join("scan.json"))?)?;
    assert_eq!(json.as_array().map(|a| a.len()), Some(2));
    assert_eq!(json[1]["filename"], "Heat (1995) - Extended [EN].MP4");

    let csv = fs::read_to_string(temp_dir.path().join("scan.csv"))?;
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().nth(1).unwrap().starts_with("Alien (1979).mkv,1,2,0,eng+ger,,1080p,"));
    Ok(())
}

/// Test that an unwritable report destination fails the scan command
#[test]
fn test_run_scan_with_withMissingOutputDirectory_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "Alien (1979).mkv", "")?;

    let controller = Controller::with_config(Config::default())?;
    let mut options = ScanOptions::from_config(temp_dir.path().to_path_buf(), controller.config());
    options.json = Some(temp_dir.path().join("missing").join("scan.json"));

    let result = controller.run_scan_with(&LibraryScanner::new(sample_probe()), &options);
    assert!(result.is_err());
    Ok(())
}
