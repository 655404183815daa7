use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, info};

use crate::errors::{AppError, CaptionError, OutputError, ShiftError};
use crate::file_utils::FileManager;

// @module: SRT parsing, timestamp shifting and serialization

// @const: One SRT timestamp, hours unbounded
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2}),(\d{3})$").unwrap()
});

const BOM: char = '\u{feff}';

/// A signed timestamp offset, in whole milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeShift {
    millis: i64,
}

impl TimeShift {
    /// Build a shift from seconds, rounded to the nearest millisecond
    pub fn from_seconds(seconds: f64) -> Result<Self, ShiftError> {
        if !seconds.is_finite() {
            return Err(ShiftError::NotFinite(seconds));
        }
        // `as` saturates for values beyond i64
        Ok(TimeShift { millis: (seconds * 1000.0).round() as i64 })
    }

    pub fn from_millis(millis: i64) -> Self {
        TimeShift { millis }
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    /// Apply the shift to a timestamp, clamping at zero
    pub fn apply(&self, timestamp_ms: u64) -> u64 {
        let shifted = i128::from(timestamp_ms) + i128::from(self.millis);
        u64::try_from(shifted.max(0)).unwrap_or(u64::MAX)
    }
}

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtEntry {
    // @field: Sequence number, always >= 1
    pub index: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Text lines, verbatim
    pub lines: Vec<String>,
}

impl SrtEntry {
    pub fn new(index: usize, start_time_ms: u64, end_time_ms: u64, lines: Vec<String>) -> Self {
        SrtEntry {
            index,
            start_time_ms,
            end_time_ms,
            lines,
        }
    }

    /// Parse an SRT timestamp (`H:MM:SS,mmm`) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Option<u64> {
        let caps = TIMESTAMP_REGEX.captures(timestamp.trim())?;
        let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());

        Self::to_millis(field(1)?, field(2)?, field(3)?, field(4)?)
    }

    fn to_millis(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return None;
        }
        hours
            .checked_mul(3_600_000)?
            .checked_add(minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    ///
    /// Hours are always written with at least two digits, so a source
    /// timestamp like `0:00:01,000` comes back as `00:00:01,000`.
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Shift both bounds independently; returns whether either one changed
    pub fn shift(&mut self, shift: TimeShift) -> bool {
        let start = shift.apply(self.start_time_ms);
        let end = shift.apply(self.end_time_ms);
        let changed = start != self.start_time_ms || end != self.end_time_ms;
        self.start_time_ms = start;
        self.end_time_ms = end;
        changed
    }

    fn write_with(&self, f: &mut fmt::Formatter, newline: &str) -> fmt::Result {
        write!(f, "{}{}", self.index, newline)?;
        write!(
            f,
            "{} --> {}{}",
            Self::format_timestamp(self.start_time_ms),
            Self::format_timestamp(self.end_time_ms),
            newline
        )?;
        for line in &self.lines {
            write!(f, "{}{}", line, newline)?;
        }
        write!(f, "{}", newline)
    }
}

impl fmt::Display for SrtEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_with(f, "\n")
    }
}

/// A whole SRT file in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SrtDocument {
    /// Entries in file order
    pub entries: Vec<SrtEntry>,

    /// The source started with a UTF-8 byte order mark
    pub has_bom: bool,

    /// The source used `\r\n` line endings
    pub crlf: bool,
}

impl SrtDocument {
    /// Parse SRT text
    ///
    /// Entries are separated by one or more blank lines. Each entry needs a
    /// positive index line followed by a range line; text lines are kept as
    /// they are.
    pub fn parse(content: &str) -> Result<Self, CaptionError> {
        let has_bom = content.starts_with(BOM);
        let body = content.strip_prefix(BOM).unwrap_or(content);
        let crlf = body.contains("\r\n");

        let mut entries = Vec::new();
        let mut lines = body.lines().enumerate().map(|(i, line)| (i + 1, line)).peekable();

        loop {
            while lines.next_if(|(_, line)| line.trim().is_empty()).is_some() {}

            let Some((index_line_no, index_line)) = lines.next() else {
                break;
            };
            let index = index_line
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|index| *index >= 1)
                .ok_or_else(|| CaptionError::Malformed {
                    line: index_line_no,
                    message: format!("expected a positive entry index, found '{}'", index_line.trim()),
                })?;

            let (range_line_no, range_line) = match lines.next() {
                Some((no, line)) if !line.trim().is_empty() => (no, line),
                Some((no, _)) => {
                    return Err(CaptionError::Malformed {
                        line: no,
                        message: format!("missing timestamp line for entry {}", index),
                    });
                }
                None => {
                    return Err(CaptionError::Malformed {
                        line: index_line_no + 1,
                        message: format!("unexpected end of file after entry index {}", index),
                    });
                }
            };
            let (start_time_ms, end_time_ms) =
                Self::parse_range(range_line).ok_or_else(|| CaptionError::Malformed {
                    line: range_line_no,
                    message: format!(
                        "expected 'HH:MM:SS,mmm --> HH:MM:SS,mmm', found '{}'",
                        range_line.trim()
                    ),
                })?;

            let mut text = Vec::new();
            while let Some((_, line)) = lines.next_if(|(_, line)| !line.trim().is_empty()) {
                text.push(line.to_string());
            }

            entries.push(SrtEntry::new(index, start_time_ms, end_time_ms, text));
        }

        debug!("Parsed {} subtitle entries", entries.len());

        Ok(SrtDocument {
            entries,
            has_bom,
            crlf,
        })
    }

    fn parse_range(line: &str) -> Option<(u64, u64)> {
        let (start, end) = line.split_once("-->")?;
        Some((SrtEntry::parse_timestamp(start)?, SrtEntry::parse_timestamp(end)?))
    }

    /// Shift every entry and return how many of them changed
    pub fn shift(&mut self, shift: TimeShift) -> usize {
        self.entries
            .iter_mut()
            .map(|entry| entry.shift(shift))
            .filter(|changed| *changed)
            .count()
    }
}

impl fmt::Display for SrtDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.has_bom {
            write!(f, "{}", BOM)?;
        }
        let newline = if self.crlf { "\r\n" } else { "\n" };
        for entry in &self.entries {
            entry.write_with(f, newline)?;
        }
        Ok(())
    }
}

/// Shift all timestamps in SRT text by `seconds`
///
/// The delta is validated before the text is parsed. Returns the new text
/// and the number of entries whose start or end changed.
pub fn shift_srt_text(content: &str, seconds: f64) -> Result<(String, usize), AppError> {
    let shift = TimeShift::from_seconds(seconds)?;
    let mut document = SrtDocument::parse(content)?;
    let changed = document.shift(shift);
    Ok((document.to_string(), changed))
}

/// Where shifted subtitles are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftOutput {
    /// Print to standard output
    Stdout,
    /// Write to a separate file
    File(PathBuf),
    /// Rewrite the input, keeping a backup with the given suffix
    InPlace { backup_suffix: String },
}

/// Result of shifting a subtitle file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftOutcome {
    /// Number of entries with a changed start or end
    pub changed: usize,
    /// Backup created for an in-place rewrite
    pub backup: Option<PathBuf>,
}

/// Shift an SRT file and write the result to `output`
pub fn process_file<P: AsRef<Path>>(input: P, shift: TimeShift, output: &ShiftOutput) -> Result<ShiftOutcome, AppError> {
    let input = input.as_ref();

    if !FileManager::file_exists(input) {
        return Err(AppError::File(format!("Subtitle file not found: {}", input.display())));
    }
    let content = FileManager::read_to_string(input).map_err(|e| AppError::File(format!("{:#}", e)))?;
    let mut document = SrtDocument::parse(&content)?;
    let changed = document.shift(shift);
    let text = document.to_string();

    let backup = match output {
        ShiftOutput::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| OutputError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            None
        }
        ShiftOutput::File(path) => {
            FileManager::write_atomically(path, text.as_bytes())?;
            info!("Wrote shifted subtitles to {:?}", path);
            None
        }
        ShiftOutput::InPlace { backup_suffix } => {
            let backup = FileManager::create_backup(input, backup_suffix)?;
            FileManager::write_atomically(input, text.as_bytes())?;
            info!("Rewrote {:?} (backup: {:?})", input, backup);
            Some(backup)
        }
    };

    Ok(ShiftOutcome { changed, backup })
}
