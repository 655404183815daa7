// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{error, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use vidmux::app_config::{Config, LogLevel};
use vidmux::app_controller::{Command, Controller, ScanOptions, ShiftOptions};
use vidmux::subtitle_processor::ShiftOutput;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan videos of a library, e.g. for audio and subtitle tracks
    Scan(ScanArgs),

    /// Shift timestamps of a SRT file
    #[command(name = "srt-tools")]
    SrtTools(SrtToolsArgs),

    /// Generate shell completions for vidmux
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Path to the video library directory
    #[arg(value_name = "LIBRARY")]
    library: PathBuf,

    /// File extensions to include (default: .mp4 .mkv .avi .mov)
    #[arg(long, value_name = "EXTENSION", num_args = 1..)]
    extensions: Option<Vec<String>>,

    /// Print results to the console
    #[arg(long = "print")]
    show: bool,

    /// Path to output JSON file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Path to output CSV file
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Suggest a canonical file name for every video
    #[arg(long)]
    suggest_names: bool,

    /// Language used for audio tracks without a language tag (e.g. 'en')
    #[arg(long, value_name = "CODE")]
    undefined_language: Option<String>,
}

#[derive(Args, Debug)]
struct SrtToolsArgs {
    /// Original SRT file
    #[arg(value_name = "INPUT")]
    input_file: PathBuf,

    /// Timeshift in seconds (e.g. 1.5 or -0.8)
    #[arg(short, long, value_name = "SECONDS", allow_negative_numbers = true)]
    shift: f64,

    /// Output SRT file (if not provided: stdout or --inplace)
    #[arg(short, long = "output", value_name = "FILE", conflicts_with = "inplace")]
    output_file: Option<PathBuf>,

    /// Overwrite original file (a backup will be created)
    #[arg(long)]
    inplace: bool,

    /// Show number of changed timestamps
    #[arg(long)]
    show_count: bool,
}

/// vidmux - Inspect and modify video/audio/subtitle tracks using FFmpeg
#[derive(Parser, Debug)]
#[command(name = "vidmux")]
#[command(version)]
#[command(about = "Inspect and modify video/audio/subtitle tracks using FFmpeg")]
#[command(long_about = "vidmux scans video libraries with ffprobe and shifts SRT subtitles.

EXAMPLES:
    vidmux scan /movies --print                       # List tracks of every video
    vidmux scan /movies --json scan.json --csv scan.csv
    vidmux scan /movies --print --suggest-names       # Show canonical file names
    vidmux srt-tools movie.srt -s 1.5                 # Print shifted subtitles
    vidmux srt-tools movie.srt -s -0.8 --inplace      # Rewrite, keeping movie.srt.bak
    vidmux completions bash > vidmux.bash             # Generate bash completions

CONFIGURATION:
    Settings are read from vidmux.json when it exists. You can specify a
    different file with --config. Command line flags take precedence.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", value_name = "FILE", global = true, default_value = "vidmux.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Start at info; the configured level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "vidmux", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load(&cli.config_path)?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.into());

    let command = resolve_command(cli.command, &mut config)?;
    let controller = Controller::with_config(config)?;
    controller.run(command)
}

/// Turn parsed arguments into a validated command, applying CLI overrides to `config`
fn resolve_command(command: Commands, config: &mut Config) -> Result<Command> {
    match command {
        Commands::Scan(args) => {
            if let Some(extensions) = args.extensions {
                config.extensions = extensions;
            }
            if let Some(language) = args.undefined_language {
                config.undefined_language = language;
            }

            let mut options = ScanOptions::from_config(args.library, config);
            options.print = args.show;
            options.json = args.json;
            options.csv = args.csv;
            options.suggest_names = args.suggest_names;
            Ok(Command::Scan(options))
        }
        Commands::SrtTools(args) => {
            let output = match (args.output_file, args.inplace) {
                (Some(path), false) => ShiftOutput::File(path),
                (None, true) => ShiftOutput::InPlace {
                    backup_suffix: config.backup_suffix.clone(),
                },
                (None, false) => ShiftOutput::Stdout,
                (Some(_), true) => return Err(anyhow!("--output and --inplace cannot be combined")),
            };
            let options = ShiftOptions::new(args.input_file, args.shift, output, args.show_count)?;
            Ok(Command::ShiftSubtitles(options))
        }
        Commands::Completions { .. } => Err(anyhow!("completions are handled before dispatch")),
    }
}
