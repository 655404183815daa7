use log::debug;
use serde_json::{Value, from_str};
use std::path::Path;
use std::process::Command;

use crate::errors::ProbeError;
use crate::media_info::{AudioTrack, SubtitleTrack, TrackMetadataReport, VideoTrack};

// @module: Track metadata probing

/// Source of per-file track metadata
///
/// The scan only depends on this trait, so tests can hand out canned
/// reports without launching any external tool.
pub trait TrackProbe {
    /// Inspect the tracks of one media file
    fn probe(&self, path: &Path) -> Result<TrackMetadataReport, ProbeError>;
}

/// Probe backed by the `ffprobe` command line tool
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    // @field: ffprobe executable
    program: String,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl FfprobeProbe {
    pub fn new(program: impl Into<String>) -> Self {
        FfprobeProbe { program: program.into() }
    }

    /// Parse the JSON written by `ffprobe -print_format json -show_streams`
    pub fn parse_output(path: &Path, json: &str) -> Result<TrackMetadataReport, ProbeError> {
        let unreadable = |message: String| ProbeError::Unreadable {
            path: path.to_path_buf(),
            message,
        };

        if json.trim().is_empty() {
            return Err(unreadable("empty output".to_string()));
        }

        let json: Value = from_str(json).map_err(|e| unreadable(e.to_string()))?;
        let streams = json
            .get("streams")
            .and_then(|s| s.as_array())
            .ok_or_else(|| unreadable("missing 'streams' array".to_string()))?;

        let mut report = TrackMetadataReport::new(path.to_string_lossy());

        for stream in streams {
            let codec = str_field(stream, "codec_name");
            let language = tag(stream, "language");
            let title = tag(stream, "title");

            match stream.get("codec_type").and_then(|v| v.as_str()) {
                Some("video") => {
                    // Cover art is stored as a single-frame video stream
                    let attached_pic = stream
                        .get("disposition")
                        .and_then(|d| d.get("attached_pic"))
                        .and_then(|v| v.as_u64())
                        .unwrap_or(0);
                    if attached_pic == 1 {
                        debug!("Skipping attached picture stream in {:?}", path);
                        continue;
                    }
                    report.video_tracks.push(VideoTrack {
                        width: u32_field(stream, "width"),
                        height: u32_field(stream, "height"),
                        codec,
                    });
                }
                Some("audio") => report.audio_tracks.push(AudioTrack {
                    language,
                    codec,
                    channels: u32_field(stream, "channels"),
                    title,
                }),
                Some("subtitle") => report.subtitle_tracks.push(SubtitleTrack {
                    language,
                    codec,
                    title,
                }),
                _ => {}
            }
        }

        Ok(report)
    }
}

impl TrackProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<TrackMetadataReport, ProbeError> {
        let output = Command::new(&self.program)
            .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
            .arg(path)
            .output()
            .map_err(|e| ProbeError::Launch {
                tool: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                trimmed => trimmed.to_string(),
            };
            return Err(ProbeError::Failed {
                path: path.to_path_buf(),
                message,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_output(path, &stdout)
    }
}

fn str_field(stream: &Value, key: &str) -> Option<String> {
    stream.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

fn u32_field(stream: &Value, key: &str) -> Option<u32> {
    stream
        .get(key)
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
}

fn tag(stream: &Value, key: &str) -> Option<String> {
    stream
        .get("tags")
        .and_then(|t| t.get(key))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
