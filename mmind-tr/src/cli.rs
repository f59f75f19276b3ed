//! Command-line arguments for mmind-tr
//!
//! Every flag can also be given through an environment variable. Flags left
//! unset fall through to the TOML file and then to compiled defaults.

use clap::Parser;
use mmind_common::config::{CompiledDefaults, ConfigOverrides};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mmind-tr")]
#[command(about = "MeetingMind transcription relay")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MMIND_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "MMIND_BIND")]
    pub bind: Option<String>,

    /// SQLite database file
    #[arg(long, env = "MMIND_DATABASE")]
    pub database: Option<PathBuf>,

    /// Base URL of the transcription service
    #[arg(long, env = "MMIND_TRANSCRIPTION_URL")]
    pub transcription_url: Option<String>,

    /// Upper bound on one transcription call, in seconds
    #[arg(long, env = "MMIND_TRANSCRIPTION_TIMEOUT_SECS")]
    pub transcription_timeout_secs: Option<u64>,

    /// TOML config file
    #[arg(short, long, env = "MMIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "MMIND_LOG")]
    pub log_level: Option<String>,
}

impl Args {
    /// Config file to read: explicit path, else the platform default
    pub fn config_path(&self, defaults: &CompiledDefaults) -> Option<PathBuf> {
        self.config.clone().or_else(|| defaults.config_path.clone())
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            bind: self.bind.clone(),
            database_path: self.database.clone(),
            transcription_url: self.transcription_url.clone(),
            transcription_timeout_secs: self.transcription_timeout_secs,
            log_level: self.log_level.clone(),
        }
    }
}
