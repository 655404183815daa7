/*!
 * Track metadata model shared by the probe, the library scan and the name suggester.
 *
 * Every optional attribute stays an `Option` all the way through, so a
 * missing width is never confused with a width of zero.
 */

use serde::{Deserialize, Serialize};

/// A single video stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoTrack {
    /// Width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Codec name as reported by the probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
}

impl VideoTrack {
    /// Both dimensions, if the probe supplied them
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

/// A single audio stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTrack {
    /// ISO 639-2 language tag; `None` or `"und"` both mean undefined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A single subtitle stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Tracks of one media file, in container order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadataReport {
    /// File name, relative to the scanned library root when produced by a scan
    pub filename: String,

    #[serde(default)]
    pub video_tracks: Vec<VideoTrack>,

    #[serde(default)]
    pub audio_tracks: Vec<AudioTrack>,

    #[serde(default)]
    pub subtitle_tracks: Vec<SubtitleTrack>,

    /// Set when probing this file failed; the track lists are then empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrackMetadataReport {
    /// Create an empty report for a file
    pub fn new(filename: impl Into<String>) -> Self {
        TrackMetadataReport {
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// Create a report marking a failed probe
    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        TrackMetadataReport {
            filename: filename.into(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Whether this report carries a probe error marker
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// First video track that reports both width and height
    pub fn primary_dimensions(&self) -> Option<(u32, u32)> {
        self.video_tracks.iter().find_map(VideoTrack::dimensions)
    }
}
