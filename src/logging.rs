use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::{self, OpenOptions};
use std::io::{Error, ErrorKind};
use std::path::PathBuf;

/// Initializes the file logger and returns the log path.
///
/// Logs go under the user's data directory so the terminal stays free for
/// the console surface.
pub fn init_logger() -> Result<PathBuf, Error> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::new(ErrorKind::NotFound, "HOME environment variable not set"))?;

    let log_dir = PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("jamlink")
        .join("logs");

    fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("app.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?;

    Ok(log_path)
}
