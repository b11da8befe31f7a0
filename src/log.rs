//! Initialisation of the program logger.
//!
//! Messages are written to the console and, when an output directory is given, to
//! `retrofit_info.log` and `retrofit_debug.log` in that directory. Warnings and errors go to
//! stderr, everything else to stdout.
use anyhow::{Result, bail, ensure};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::Arguments;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// The default log level for the program.
///
/// Used as a fallback if the user hasn't specified something else with the `RETROFIT_LOG_LEVEL`
/// environment variable or the settings file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The file name for the log file containing messages about the ordinary operation of the program
const LOG_INFO_FILE_NAME: &str = "retrofit_info.log";

/// The file name for the log file containing all messages, including debug output
const LOG_DEBUG_FILE_NAME: &str = "retrofit_debug.log";

/// Set when the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Parse a log level from a string, ignoring case
pub fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => bail!("Unknown log level: {log_level}"),
    };

    Ok(level)
}

/// Initialise the program logger.
///
/// The `RETROFIT_LOG_LEVEL` environment variable takes precedence over `log_level_from_settings`.
///
/// # Arguments
///
/// * `log_level_from_settings` - The log level specified in the program settings
/// * `log_file_path` - Directory in which to write log files, if any
pub fn init(log_level_from_settings: &str, log_file_path: Option<&Path>) -> Result<()> {
    ensure!(!is_logger_initialised(), "Logger already initialised");

    let log_level = env::var("RETROFIT_LOG_LEVEL")
        .unwrap_or_else(|_| log_level_from_settings.to_string());
    let log_level = parse_log_level(&log_level)?;

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let stdout_colour = std::io::stdout().is_terminal();
    let stderr_colour = std::io::stderr().is_terminal();

    let mut dispatch = Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .format(move |out, message, record| {
                    write_log_coloured(out, message, record, stdout_colour, colours);
                })
                .level(log_level)
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() <= LevelFilter::Warn)
                .format(move |out, message, record| {
                    write_log_coloured(out, message, record, stderr_colour, colours);
                })
                .level(log_level)
                .chain(std::io::stderr()),
        );

    if let Some(log_file_path) = log_file_path {
        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .level(LevelFilter::Info)
                    .format(write_log_plain)
                    .chain(fern::log_file(log_file_path.join(LOG_INFO_FILE_NAME))?),
            )
            .chain(
                Dispatch::new()
                    .level(LevelFilter::Debug)
                    .format(write_log_plain)
                    .chain(fern::log_file(log_file_path.join(LOG_DEBUG_FILE_NAME))?),
            );
    }

    dispatch.apply()?;
    LOGGER_INIT.get_or_init(|| ());

    Ok(())
}

/// Write a log message to the console, with the level in colour if supported
fn write_log_coloured(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: ColoredLevelConfig,
) {
    if use_colour {
        out.finish(format_args!(
            "[{} {} {}] {}",
            Local::now().format("%H:%M:%S"),
            colours.color(record.level()),
            record.target(),
            message
        ));
    } else {
        write_log_plain(out, message, record);
    }
}

/// Write a log message without colour
fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    out.finish(format_args!(
        "[{} {} {}] {}",
        Local::now().format("%H:%M:%S"),
        record.level(),
        record.target(),
        message
    ));
}
