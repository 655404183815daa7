/*!
 * # vidmux - video library tooling
 *
 * A Rust library for inspecting the tracks of a video library and keeping
 * its file names and subtitles tidy.
 *
 * ## Features
 *
 * - Scan a library with ffprobe and report video, audio and subtitle tracks
 * - Export scan results as a console summary, JSON or CSV
 * - Suggest canonical file names that encode edition, audio languages and
 *   resolution, e.g. `Title/Title - [Director's Cut] [DE+EN] [1080p].mkv`
 * - Shift all timestamps of an SRT file, optionally in place with a backup
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Command dispatch for the CLI
 * - `media_info`: Track metadata model
 * - `probe`: ffprobe-backed track probing behind the `TrackProbe` trait
 * - `library_scan`: Directory traversal and per-file probing
 * - `name_suggester`: Canonical file name suggestion
 * - `report_output`: Console, JSON and CSV output of scan results
 * - `subtitle_processor`: SRT parsing, shifting and writing
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod library_scan;
pub mod media_info;
pub mod name_suggester;
pub mod probe;
pub mod report_output;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Command, Controller, ScanOptions, ShiftOptions};
pub use errors::{AppError, CaptionError, OutputError, ProbeError, ShiftError};
pub use library_scan::{LibraryScanner, ScanResult};
pub use media_info::{AudioTrack, SubtitleTrack, TrackMetadataReport, VideoTrack};
pub use name_suggester::{NameComponents, suggest_name};
pub use probe::{FfprobeProbe, TrackProbe};
pub use subtitle_processor::{SrtDocument, SrtEntry, TimeShift, shift_srt_text};
