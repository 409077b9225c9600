//! # Harness
//!
//! Validates the log file passed on the command line once per run and holds
//! it, with the configuration, for every check of the session.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, UlgCheckError};

/// Required log file extension, compared case-insensitively
pub const ULOG_EXTENSION: &str = "ulg";

/// A path that has passed the `.ulg` extension check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Validate a log file path
    ///
    /// # Errors
    ///
    /// Returns [`UlgCheckError::NotULogFile`] if the path is empty, has no
    /// extension, or its extension is not `ulg` in any letter case
    ///
    /// # Examples
    ///
    /// ```
    /// use ulg_checks::harness::LogFile;
    ///
    /// assert!(LogFile::new("/logs/flight.ULG").is_ok());
    /// assert!(LogFile::new("/logs/flight.txt").is_err());
    /// ```
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let is_ulog = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(ULOG_EXTENSION))
            .unwrap_or(false);

        if path.as_os_str().is_empty() || !is_ulog {
            return Err(UlgCheckError::NotULogFile(path.display().to_string()));
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for LogFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Read-only state shared by every check of a run
#[derive(Debug, Clone)]
pub struct Session {
    log_file: LogFile,
    config: Config,
}

impl Session {
    /// Start a session; fails before any check can run
    ///
    /// # Errors
    ///
    /// Returns error if no path was given or the path is not a `.ulg` file
    pub fn start(filepath: Option<PathBuf>, config: Config) -> Result<Self> {
        let log_file = LogFile::new(filepath.ok_or(UlgCheckError::MissingFilePath)?)?;

        if !log_file.path().exists() {
            warn!("Log file {} does not exist, checks will be skipped", log_file);
        }

        info!("Session started for {}", log_file);
        Ok(Self { log_file, config })
    }

    pub fn log_file(&self) -> &LogFile {
        &self.log_file
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ulg() {
        let log = LogFile::new("/tmp/log_0_2019-3-21-11-34-20.ulg").unwrap();
        assert_eq!(log.path(), Path::new("/tmp/log_0_2019-3-21-11-34-20.ulg"));
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert!(LogFile::new("flight.ULG").is_ok());
        assert!(LogFile::new("flight.Ulg").is_ok());
    }

    #[test]
    fn test_rejects_txt() {
        let err = LogFile::new("flight.txt").unwrap_err();
        assert!(matches!(err, UlgCheckError::NotULogFile(_)));
        assert!(err.to_string().contains("not a .ulg file"));
    }

    #[test]
    fn test_rejects_empty_path() {
        assert!(LogFile::new("").is_err());
    }

    #[test]
    fn test_rejects_missing_extension() {
        assert!(LogFile::new("/logs/flight").is_err());
        assert!(LogFile::new("/logs/ulg").is_err());
    }

    #[test]
    fn test_rejects_partial_extension() {
        assert!(LogFile::new("flight.u").is_err());
        assert!(LogFile::new("flight.ulog").is_err());
        assert!(LogFile::new("flight.ulg.txt").is_err());
    }

    #[test]
    fn test_session_requires_path() {
        let result = Session::start(None, Config::default());
        assert!(matches!(result, Err(UlgCheckError::MissingFilePath)));
    }

    #[test]
    fn test_session_rejects_wrong_extension() {
        let result = Session::start(Some(PathBuf::from("flight.csv")), Config::default());
        assert!(matches!(result, Err(UlgCheckError::NotULogFile(_))));
    }

    #[test]
    fn test_session_keeps_missing_file() {
        let session =
            Session::start(Some(PathBuf::from("/nonexistent/flight.ulg")), Config::default())
                .unwrap();
        assert_eq!(session.log_file().to_string(), "/nonexistent/flight.ulg");
        assert_eq!(session.config(), &Config::default());
    }
}
