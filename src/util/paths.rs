//! Path utilities for datapledge data directories

use std::path::PathBuf;

/// Get the base datapledge data directory (~/.datapledge)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".datapledge"))
        .unwrap_or_else(|| PathBuf::from(".datapledge"))
}

/// Get the logs directory (~/.datapledge/logs)
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Get the default log file path (~/.datapledge/logs/datapledge.log)
pub fn log_file_path() -> PathBuf {
    logs_dir().join("datapledge.log")
}

/// Get the default donations output directory (~/.datapledge/donations)
pub fn donations_dir() -> PathBuf {
    data_dir().join("donations")
}

/// Get the config file path (~/.datapledge/config.toml)
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
