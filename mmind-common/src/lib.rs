//! # MeetingMind Common Library
//!
//! Shared code for MeetingMind services including:
//! - Record types for audio files, transcripts and summaries
//! - SQLite schema initialization
//! - Configuration loading (TOML bootstrap, compiled defaults)
//! - The common error type

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
