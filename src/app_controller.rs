use anyhow::{Result, Context, anyhow};
use log::{info, warn};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::ShiftError;
use crate::library_scan::{LibraryScanner, ScanResult};
use crate::probe::{FfprobeProbe, TrackProbe};
use crate::report_output;
use crate::subtitle_processor::{self, ShiftOutcome, ShiftOutput, TimeShift};

// @module: Application controller dispatching the vidmux commands

/// Settings for a library scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    /// Library root directory
    pub library: PathBuf,
    /// Extensions to include, e.g. `.mkv`
    pub extensions: Vec<String>,
    /// Print a summary to stdout
    pub print: bool,
    /// Write a JSON report here
    pub json: Option<PathBuf>,
    /// Write a CSV report here
    pub csv: Option<PathBuf>,
    /// Attach a suggested canonical name to each file
    pub suggest_names: bool,
    /// Language shown for audio tracks without a language tag
    pub undefined_language: String,
}

impl ScanOptions {
    /// Scan options for `library` with everything else taken from `config`
    pub fn from_config(library: PathBuf, config: &Config) -> Self {
        ScanOptions {
            library,
            extensions: config.extensions.clone(),
            print: false,
            json: None,
            csv: None,
            suggest_names: false,
            undefined_language: config.undefined_language.clone(),
        }
    }

    fn has_output(&self) -> bool {
        self.print || self.json.is_some() || self.csv.is_some()
    }
}

/// Settings for shifting an SRT file
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftOptions {
    pub input: PathBuf,
    pub shift: TimeShift,
    pub output: ShiftOutput,
    /// Report how many entries changed
    pub show_count: bool,
}

impl ShiftOptions {
    /// Validate the delta up front so a bad value never reaches the parser
    pub fn new(input: PathBuf, seconds: f64, output: ShiftOutput, show_count: bool) -> Result<Self, ShiftError> {
        Ok(ShiftOptions {
            input,
            shift: TimeShift::from_seconds(seconds)?,
            output,
            show_count,
        })
    }
}

/// A fully resolved command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Scan(ScanOptions),
    ShiftSubtitles(ShiftOptions),
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one command
    pub fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Scan(options) => {
                self.run_scan(&options)?;
            }
            Command::ShiftSubtitles(options) => {
                self.run_shift(&options)?;
            }
        }
        Ok(())
    }

    /// Scan a library with ffprobe and write the requested outputs
    pub fn run_scan(&self, options: &ScanOptions) -> Result<Vec<ScanResult>> {
        let probe = FfprobeProbe::new(self.config.ffprobe_path.clone());
        self.run_scan_with(&LibraryScanner::new(probe), options)
    }

    /// Scan a library with the given scanner and write the requested outputs
    pub fn run_scan_with<P: TrackProbe>(&self, scanner: &LibraryScanner<P>, options: &ScanOptions) -> Result<Vec<ScanResult>> {
        if options.extensions.is_empty() {
            return Err(anyhow!("No file extensions given"));
        }

        let start_time = Instant::now();
        let progress = Self::scan_progress_bar();
        let reports = scanner
            .scan_with_progress(&options.library, &options.extensions, &progress)
            .with_context(|| format!("Failed to scan library: {}", options.library.display()))?;

        let results: Vec<ScanResult> = reports
            .into_iter()
            .map(|report| {
                if options.suggest_names {
                    ScanResult::with_suggestion(report, &options.undefined_language)
                } else {
                    ScanResult::from(report)
                }
            })
            .collect();

        if options.print || !options.has_output() {
            print!("{}", report_output::format_summary(&results));
        }
        if let Some(path) = &options.json {
            report_output::write_json(path, &results)?;
            info!("Wrote JSON report to {:?}", path);
        }
        if let Some(path) = &options.csv {
            report_output::write_csv(path, &results)?;
            info!("Wrote CSV report to {:?}", path);
        }

        info!(
            "Scanned {} file(s) in {:.1}s",
            results.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(results)
    }

    /// Shift an SRT file as described by `options`
    pub fn run_shift(&self, options: &ShiftOptions) -> Result<ShiftOutcome> {
        if options.shift.millis() == 0 {
            warn!("Shift is zero, timestamps stay unchanged");
        }

        let outcome = subtitle_processor::process_file(&options.input, options.shift, &options.output)
            .with_context(|| format!("Failed to shift subtitles in {}", options.input.display()))?;

        // stdout may carry the subtitles themselves
        if options.show_count {
            eprintln!("Changed timestamps: {}", outcome.changed);
        }
        Ok(outcome)
    }

    fn scan_progress_bar() -> ProgressBar {
        let progress = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);
        progress
    }
}
